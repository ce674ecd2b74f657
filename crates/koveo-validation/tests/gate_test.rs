//! Integration tests for the input gate.

use std::sync::Arc;
use std::time::Duration;

use koveo_core::error::KoveoError;
use koveo_validation::{
    InMemoryRateLimitStore, InputGate, MemorySink, RateLimitConfig, RateLimiter, ValidationConfig,
    Verdict,
};

fn test_gate(config: ValidationConfig) -> (InputGate, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let limiter = RateLimiter::new(InMemoryRateLimitStore::new(), config.rate_limit).unwrap();
    let gate = InputGate::with_parts(config, sink.clone(), limiter).unwrap();
    (gate, sink)
}

// -----------------------------------------------------------------------
// Text
// -----------------------------------------------------------------------

#[test]
fn attack_input_is_emptied_and_reported() {
    let (gate, sink) = test_gate(ValidationConfig::default());

    assert_eq!(gate.sanitize_string("<script>alert(1)</script>"), "");
    assert_eq!(gate.sanitize_string("{\"$gt\": \"\"}"), "");
    assert_eq!(gate.sanitize_address("1 rue <iframe src=x>"), "");

    let patterns: Vec<_> = sink.drain().into_iter().map(|s| s.pattern).collect();
    assert_eq!(patterns, vec!["script_tag", "nosql_operator", "iframe_tag"]);
}

#[test]
fn encoded_output_has_no_raw_dangerous_characters() {
    let (gate, sink) = test_gate(ValidationConfig::default());
    let out = gate.sanitize_string("O'Brien <b>\"quoted\"</b> & co/op");
    for c in ['<', '>', '"', '\'', '/'] {
        assert!(!out.contains(c), "raw {c:?} in {out:?}");
    }
    assert!(out.starts_with("O&#x27;Brien"));
    assert!(sink.is_empty());
}

#[test]
fn configured_limits_are_applied() {
    let (gate, _) = test_gate(ValidationConfig {
        max_string_length: 10,
        max_name_length: 5,
        max_address_length: 8,
        max_username_length: 4,
        ..Default::default()
    });

    assert_eq!(gate.sanitize_string("abcdefghijklmno"), "abcdefghij");
    assert_eq!(gate.sanitize_name("Geneviève"), "Genev");
    assert_eq!(gate.sanitize_address("1234 rue Laval"), "1234 rue");
    assert_eq!(gate.generate_username_from_email("marie.claude@koveo.ca"), "mari");
}

#[test]
fn rich_text_keeps_allowed_tags() {
    let (gate, _) = test_gate(ValidationConfig::default());
    assert_eq!(
        gate.sanitize_html("<div><strong>Avis</strong> <img src=x onerror=alert(1)></div>"),
        "<div><strong>Avis</strong> </div>"
    );
}

// -----------------------------------------------------------------------
// Contact fields
// -----------------------------------------------------------------------

#[test]
fn email_is_normalized_before_shape_check() {
    let (gate, _) = test_gate(ValidationConfig::default());
    assert_eq!(gate.normalize_email(" Luc@Koveo.CA "), "luc@koveo.ca");
    assert!(gate.validate_email(" Luc@Koveo.CA ").is_valid());
    assert_eq!(
        gate.validate_email("luc@"),
        Verdict::reject("Invalid email address")
    );
}

#[test]
fn postal_code_and_phone_are_optional() {
    let (gate, _) = test_gate(ValidationConfig::default());
    assert!(gate.is_valid_quebec_postal_code("H1A 1B1"));
    assert!(gate.is_valid_quebec_postal_code(""));
    assert!(!gate.is_valid_quebec_postal_code("12345"));
    assert!(gate.is_valid_north_american_phone(""));
    assert!(gate.is_valid_north_american_phone("(418) 555-0142"));
    assert!(!gate.is_valid_north_american_phone("418-555"));
}

// -----------------------------------------------------------------------
// Passwords
// -----------------------------------------------------------------------

#[test]
fn password_policy_and_peppered_hash() {
    let (gate, _) = test_gate(ValidationConfig {
        password_pepper: Some("koveo-pepper".into()),
        ..Default::default()
    });

    assert!(gate.validate_password_strength("Abcdef1!").is_valid());
    let verdict = gate.validate_password_strength("abcdefgh");
    assert!(!verdict.is_valid());
    assert!(verdict.message().unwrap().contains("uppercase"));

    let err = gate.hash_password("abcdefgh").unwrap_err();
    assert!(matches!(err, KoveoError::Validation { .. }));

    let hash = gate.hash_password("Abcdef1!").unwrap();
    assert!(gate.verify_password("Abcdef1!", &hash).unwrap());
    assert!(!gate.verify_password("Abcdef1?", &hash).unwrap());
    assert!(matches!(
        gate.verify_password("Abcdef1!", "garbage"),
        Err(KoveoError::Crypto(_))
    ));
}

// -----------------------------------------------------------------------
// Uploads and throttling
// -----------------------------------------------------------------------

#[test]
fn upload_checks_use_configured_ceiling() {
    let (gate, _) = test_gate(ValidationConfig {
        max_upload_bytes: 1024,
        ..Default::default()
    });
    assert!(
        !gate
            .validate_file_upload("malware.exe", 1000, "application/x-msdownload")
            .is_valid()
    );
    assert!(gate.validate_file_upload("photo.jpg", 1000, "image/jpeg").is_valid());
    assert!(!gate.validate_file_upload("photo.jpg", 2048, "image/jpeg").is_valid());
}

#[test]
fn rate_limit_per_call_and_configured() {
    let (gate, _) = test_gate(ValidationConfig {
        rate_limit: RateLimitConfig::new(2, Duration::from_secs(60)).unwrap(),
        ..Default::default()
    });

    let window = Duration::from_millis(60_000);
    let remaining: Vec<_> = (0..4)
        .map(|_| gate.check_rate_limit_with("user-1", 3, window))
        .map(|d| (d.allowed, d.remaining))
        .collect();
    assert_eq!(remaining, vec![(true, 2), (true, 1), (true, 0), (false, 0)]);

    assert!(gate.check_rate_limit("ip-1").allowed);
    assert!(gate.check_rate_limit("ip-1").allowed);
    assert!(!gate.check_rate_limit("ip-1").allowed);
    gate.reset_rate_limit("ip-1");
    assert_eq!(gate.check_rate_limit("ip-1").remaining, 1);
}

#[test]
fn purge_keeps_live_windows() {
    let (gate, _) = test_gate(ValidationConfig::default());
    assert!(gate.check_rate_limit_with("report", 1, Duration::from_secs(3600)).allowed);
    assert_eq!(gate.purge_rate_limits(), 0);
    assert!(!gate.check_rate_limit_with("report", 1, Duration::from_secs(3600)).allowed);
}

#[test]
fn invalid_config_is_rejected() {
    let config = ValidationConfig {
        max_string_length: 0,
        ..Default::default()
    };
    assert!(InputGate::new(config).is_err());
    assert!(InputGate::new(ValidationConfig::default()).is_ok());
}
