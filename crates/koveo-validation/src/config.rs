//! Validation configuration.

use std::time::Duration;

use crate::error::ValidationError;

/// Limits applied by the input gate.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Maximum length of a sanitized free-text string, in characters
    /// (default: 500).
    pub max_string_length: usize,
    /// Maximum length of a person's name (default: 100).
    pub max_name_length: usize,
    /// Maximum length of a street address (default: 200).
    pub max_address_length: usize,
    /// Maximum length of a username derived from an email (default: 30).
    pub max_username_length: usize,
    /// Minimum password length for policy enforcement (default: 8).
    pub min_password_length: usize,
    /// Upload size ceiling in bytes (default: 50 MiB).
    pub max_upload_bytes: u64,
    /// Optional pepper prepended to passwords before Argon2id hashing.
    pub password_pepper: Option<String>,
    pub rate_limit: RateLimitConfig,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_string_length: 500,
            max_name_length: 100,
            max_address_length: 200,
            max_username_length: 30,
            min_password_length: 8,
            max_upload_bytes: 50 * 1024 * 1024,
            password_pepper: None,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ValidationConfig {
    /// Reject limits that would turn every input into an empty string.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let lengths = [
            ("max_string_length", self.max_string_length),
            ("max_name_length", self.max_name_length),
            ("max_address_length", self.max_address_length),
            ("max_username_length", self.max_username_length),
        ];
        for (name, value) in lengths {
            if value == 0 {
                return Err(ValidationError::InvalidConfig(format!(
                    "{name} must be greater than zero"
                )));
            }
        }
        self.rate_limit.validate()
    }
}

/// Fixed-window rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per window (default: 100).
    pub limit: u32,
    /// Window length (default: 15 minutes).
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(limit: u32, window: Duration) -> Result<Self, ValidationError> {
        let config = Self { limit, window };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.window.is_zero() {
            return Err(ValidationError::InvalidConfig(
                "rate limit window must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
