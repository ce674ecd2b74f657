//! Config-driven entry point for request handlers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use koveo_core::error::KoveoResult;
use tracing::info;

use crate::config::{RateLimitConfig, ValidationConfig};
use crate::error::ValidationError;
use crate::format;
use crate::password;
use crate::rate_limit::{InMemoryRateLimitStore, RateLimitDecision, RateLimitStore, RateLimiter};
use crate::sanitize;
use crate::security::{SecuritySink, TracingSink};
use crate::upload;
use crate::verdict::Verdict;

/// Bundles the validation limits, the security sink and the rate
/// limiter so handlers do not pass them around individually.
pub struct InputGate<S = InMemoryRateLimitStore> {
    config: ValidationConfig,
    sink: Arc<dyn SecuritySink>,
    limiter: RateLimiter<S>,
}

impl InputGate<InMemoryRateLimitStore> {
    /// Gate with the tracing sink and an in-process rate-limit store.
    pub fn new(config: ValidationConfig) -> Result<Self, ValidationError> {
        let limiter = RateLimiter::in_memory(config.rate_limit)?;
        Self::with_parts(config, Arc::new(TracingSink), limiter)
    }
}

impl<S: RateLimitStore> InputGate<S> {
    pub fn with_parts(
        config: ValidationConfig,
        sink: Arc<dyn SecuritySink>,
        limiter: RateLimiter<S>,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        info!(
            max_string_length = config.max_string_length,
            rate_limit = config.rate_limit.limit,
            window_secs = config.rate_limit.window.as_secs(),
            "input gate configured"
        );
        Ok(Self {
            config,
            sink,
            limiter,
        })
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn limiter(&self) -> &RateLimiter<S> {
        &self.limiter
    }

    // -----------------------------------------------------------------
    // Text
    // -----------------------------------------------------------------

    pub fn sanitize_string(&self, input: &str) -> String {
        sanitize::sanitize_string_with(input, self.config.max_string_length, self.sink.as_ref())
    }

    pub fn sanitize_html(&self, input: &str) -> String {
        sanitize::sanitize_html(input)
    }

    pub fn sanitize_name(&self, value: &str) -> String {
        sanitize::sanitize_name(value, self.config.max_name_length)
    }

    pub fn sanitize_address(&self, value: &str) -> String {
        sanitize::sanitize_address_with(value, self.config.max_address_length, self.sink.as_ref())
    }

    // -----------------------------------------------------------------
    // Contact fields
    // -----------------------------------------------------------------

    pub fn normalize_email(&self, value: &str) -> String {
        sanitize::normalize_email(value)
    }

    /// Normalize, then check the email shape.
    pub fn validate_email(&self, value: &str) -> Verdict {
        if format::is_valid_email(&sanitize::normalize_email(value)) {
            Verdict::Valid
        } else {
            Verdict::reject("Invalid email address")
        }
    }

    pub fn generate_username_from_email(&self, email: &str) -> String {
        sanitize::generate_username_from_email(email, self.config.max_username_length)
    }

    pub fn is_valid_quebec_postal_code(&self, value: &str) -> bool {
        format::is_valid_quebec_postal_code(value)
    }

    pub fn is_valid_north_american_phone(&self, value: &str) -> bool {
        format::is_valid_north_american_phone(value)
    }

    // -----------------------------------------------------------------
    // Passwords
    // -----------------------------------------------------------------

    pub fn validate_password_strength(&self, password: &str) -> Verdict {
        password::validate_password_strength(password, self.config.min_password_length)
    }

    /// Enforce the password policy, then hash with the configured pepper.
    pub fn hash_password(&self, password: &str) -> KoveoResult<String> {
        password::hash_validated_password(
            password,
            self.config.min_password_length,
            self.config.password_pepper.as_deref(),
        )
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> KoveoResult<bool> {
        Ok(password::verify_password(
            password,
            hash,
            self.config.password_pepper.as_deref(),
        )?)
    }

    // -----------------------------------------------------------------
    // Uploads and throttling
    // -----------------------------------------------------------------

    pub fn validate_file_upload(&self, filename: &str, file_size: u64, mime_type: &str) -> Verdict {
        upload::validate_file_upload(filename, file_size, mime_type, self.config.max_upload_bytes)
    }

    /// Count a request against the configured limit.
    pub fn check_rate_limit(&self, identifier: &str) -> RateLimitDecision {
        self.limiter.check(identifier)
    }

    /// Count a request against a per-call limit and window.
    pub fn check_rate_limit_with(
        &self,
        identifier: &str,
        limit: u32,
        window: Duration,
    ) -> RateLimitDecision {
        self.limiter
            .check_with(identifier, &RateLimitConfig { limit, window }, Instant::now())
    }

    pub fn reset_rate_limit(&self, identifier: &str) {
        self.limiter.reset(identifier);
    }

    /// Drop expired rate-limit windows. Meant for a periodic task.
    pub fn purge_rate_limits(&self) -> usize {
        self.limiter.purge_expired(Instant::now())
    }
}
