//! Password policy and Argon2id hashing.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use koveo_core::error::KoveoResult;

use crate::error::ValidationError;
use crate::verdict::Verdict;

/// Symbols of which a password must contain at least one.
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Check a candidate password against the policy.
///
/// Every missing requirement is listed in one message, e.g.
/// `Password must contain one uppercase letter, one digit`.
pub fn validate_password_strength(password: &str, min_length: usize) -> Verdict {
    if password.is_empty() {
        return Verdict::reject("Password is required");
    }

    let mut missing = Vec::new();
    if password.chars().count() < min_length {
        missing.push(format!("at least {min_length} characters"));
    }
    if !password.chars().any(char::is_uppercase) {
        missing.push("one uppercase letter".into());
    }
    if !password.chars().any(char::is_lowercase) {
        missing.push("one lowercase letter".into());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("one digit".into());
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        missing.push(format!("one special character ({PASSWORD_SYMBOLS})"));
    }

    if missing.is_empty() {
        Verdict::Valid
    } else {
        Verdict::reject(format!("Password must contain {}", missing.join(", ")))
    }
}

fn peppered<'a>(password: &'a str, pepper: Option<&str>, buf: &'a mut String) -> &'a [u8] {
    match pepper {
        Some(p) => {
            *buf = format!("{p}{password}");
            buf.as_bytes()
        }
        None => password.as_bytes(),
    }
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
pub fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, ValidationError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| ValidationError::Crypto(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut buf = String::new();
    let input = peppered(password, pepper, &mut buf);

    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| ValidationError::Crypto(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against an Argon2id PHC-format hash.
///
/// The pepper must match the one used during hashing. Returns
/// `Ok(false)` on mismatch and `Err(ValidationError::Crypto)` if the
/// stored hash is malformed.
pub fn verify_password(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> Result<bool, ValidationError> {
    let mut buf = String::new();
    let input = peppered(password, pepper, &mut buf);

    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| ValidationError::Crypto(format!("invalid hash format: {e}")))?;

    match Argon2::default().verify_password(input, &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ValidationError::Crypto(format!("verify error: {e}"))),
    }
}

/// Enforce the policy, then hash. A weak password surfaces as
/// [`koveo_core::error::KoveoError::Validation`].
pub fn hash_validated_password(
    password: &str,
    min_length: usize,
    pepper: Option<&str>,
) -> KoveoResult<String> {
    validate_password_strength(password, min_length).into_result()?;
    Ok(hash_password(password, pepper)?)
}

#[cfg(test)]
mod tests {
    use koveo_core::error::KoveoError;

    use super::*;

    #[test]
    fn strong_password_is_valid() {
        assert_eq!(validate_password_strength("Abcdef1!", 8), Verdict::Valid);
        assert!(validate_password_strength("Été-2024?x", 8).is_valid());
    }

    #[test]
    fn missing_categories_are_listed_together() {
        let verdict = validate_password_strength("abcdefgh", 8);
        let message = verdict.message().unwrap();
        assert!(message.contains("uppercase"));
        assert!(message.contains("digit"));
        assert!(message.contains("special character"));
        assert!(!message.contains("lowercase"));
        assert!(!message.contains("characters,"));
    }

    #[test]
    fn short_and_empty_passwords() {
        assert_eq!(
            validate_password_strength("", 8).message(),
            Some("Password is required")
        );
        let message = validate_password_strength("Ab1!", 8);
        assert_eq!(
            message.message(),
            Some("Password must contain at least 8 characters")
        );
    }

    #[test]
    fn correct_password_matches() {
        let hash = hash_password("Hunter2!", None).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Hunter2!", &hash, None).unwrap());
        assert!(!verify_password("wrong", &hash, None).unwrap());
    }

    #[test]
    fn pepper_is_applied() {
        let hash = hash_password("Hunter2!", Some("pepper!")).unwrap();
        assert!(verify_password("Hunter2!", &hash, Some("pepper!")).unwrap());
        // Without pepper should fail.
        assert!(!verify_password("Hunter2!", &hash, None).unwrap());
    }

    #[test]
    fn malformed_hash_returns_error() {
        assert!(matches!(
            verify_password("pw", "not-a-hash", None),
            Err(ValidationError::Crypto(_))
        ));
    }

    #[test]
    fn weak_password_is_not_hashed() {
        let err = hash_validated_password("password", 8, None).unwrap_err();
        assert!(matches!(err, KoveoError::Validation { .. }));
        assert!(hash_validated_password("Passw0rd!", 8, None).is_ok());
    }
}
