//! Authorization error types.
//!
//! Access checks themselves return booleans; these errors only surface
//! through the `require_*` guards and raw-id parsing.

use koveo_core::error::KoveoError;
use thiserror::Error;

use crate::resource::ResourceRef;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("access to {resource} denied")]
    Denied { resource: ResourceRef },

    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

impl From<AuthzError> for KoveoError {
    fn from(err: AuthzError) -> Self {
        // Invalid references are reported as denials so callers cannot
        // probe which ids exist.
        KoveoError::AuthorizationDenied {
            reason: match err {
                AuthzError::Denied { .. } => err.to_string(),
                AuthzError::InvalidReference(_) => "access denied".into(),
            },
        }
    }
}
