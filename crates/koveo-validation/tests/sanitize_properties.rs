//! Property tests for the string sanitizers.

use koveo_validation::MemorySink;
use koveo_validation::sanitize::{
    generate_username_from_email, sanitize_address_with, sanitize_html, sanitize_name,
    sanitize_string_with,
};
use proptest::prelude::*;
use proptest::test_runner::Config;

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn sanitized_string_is_bounded_and_encoded(input in any::<String>(), max in 0_usize..600) {
        let sink = MemorySink::new();
        let out = sanitize_string_with(&input, max, &sink);
        prop_assert!(out.chars().count() <= max);
        for c in ['<', '>', '"', '\'', '/'] {
            prop_assert!(!out.contains(c));
        }
        prop_assert!(!out.chars().any(char::is_control));
        if !sink.is_empty() {
            prop_assert_eq!(out, "");
        }
    }

    #[test]
    fn names_contain_only_allowed_characters(input in any::<String>()) {
        let out = sanitize_name(&input, 100);
        prop_assert!(out.chars().count() <= 100);
        prop_assert!(out.chars().all(|c| c.is_alphabetic() || matches!(c, ' ' | '-' | '\'')));
        prop_assert!(!out.contains("  "));
    }

    #[test]
    fn addresses_are_bounded(input in "[ -~àéèçÉ]{0,300}") {
        let sink = MemorySink::new();
        let out = sanitize_address_with(&input, 200, &sink);
        prop_assert!(out.chars().count() <= 200);
        prop_assert!(!out.contains('<') && !out.contains(';'));
    }

    #[test]
    fn usernames_are_lowercase_alphanumeric(email in "[A-Za-z0-9._+-]{0,60}@[a-z]{1,10}\\.ca") {
        let out = generate_username_from_email(&email, 30);
        prop_assert!(out.len() <= 30);
        prop_assert!(out.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn html_output_is_stable(input in "[<>a-z/ =\"']{0,80}") {
        let once = sanitize_html(&input);
        prop_assert_eq!(sanitize_html(&once), once.clone());
        prop_assert!(once.len() <= input.len());
    }
}
