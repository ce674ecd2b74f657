//! Shape predicates for optional contact fields.

use std::sync::LazyLock;

use regex::Regex;

/// Canadian postal code restricted to the Quebec forward sortation
/// letters G, H and J. The internal space is optional.
static QUEBEC_POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[GHJ]\d[ABCEGHJ-NPRSTV-Z] ?\d[ABCEGHJ-NPRSTV-Z]\d$")
        .expect("invalid postal code pattern")
});

static NANP_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+?1[\s.-]?)?(?:\(\d{3}\)|\d{3})[\s.-]?\d{3}[\s.-]?\d{4}$")
        .expect("invalid phone pattern")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$",
    )
    .expect("invalid email pattern")
});

const MAX_EMAIL_LENGTH: usize = 254;

/// Empty input passes: the field is optional.
pub fn is_valid_quebec_postal_code(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || QUEBEC_POSTAL_CODE.is_match(value)
}

/// North American number with optional `+1`, parentheses around the
/// area code, and `.`, `-` or space separators. Empty input passes.
pub fn is_valid_north_american_phone(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || NANP_PHONE.is_match(value)
}

/// Email shape check. Unlike the optional fields above, an empty string
/// is not an email.
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    value.len() <= MAX_EMAIL_LENGTH && EMAIL.is_match(value)
}
