//! Tagged outcome of a validator.

use koveo_core::error::KoveoResult;
use serde::Serialize;

use crate::error::ValidationError;

/// Result of checking one untrusted value. Malformed input is an
/// ordinary `Rejected`, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    Rejected { reason: String },
}

impl Verdict {
    pub fn reject(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The rejection reason, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Rejected { reason } => Some(reason),
        }
    }

    /// Convert into a result for `?` at the API boundary.
    pub fn into_result(self) -> KoveoResult<()> {
        match self {
            Self::Valid => Ok(()),
            Self::Rejected { reason } => Err(ValidationError::Rejected { reason }.into()),
        }
    }
}
