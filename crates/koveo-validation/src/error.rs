//! Validation error types.

use koveo_core::error::KoveoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{reason}")]
    Rejected { reason: String },

    #[error("rate limit exceeded for {identifier}")]
    RateLimited { identifier: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<ValidationError> for KoveoError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Rejected { reason } => KoveoError::Validation { message: reason },
            ValidationError::RateLimited { .. } => KoveoError::RateLimited,
            ValidationError::InvalidConfig(msg) => KoveoError::InvalidArgument(msg),
            ValidationError::Crypto(msg) => KoveoError::Crypto(msg),
        }
    }
}
