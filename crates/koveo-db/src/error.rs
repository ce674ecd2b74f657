//! Store-specific error types and conversions.

use koveo_core::error::KoveoError;

/// Store-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable")]
    Unavailable,

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    Conflict { entity: String },

    #[error("integrity violation: {0}")]
    Integrity(String),
}

impl StoreError {
    pub(crate) fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for KoveoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => KoveoError::NotFound { entity, id },
            StoreError::Conflict { entity } => KoveoError::AlreadyExists { entity },
            StoreError::Integrity(message) => KoveoError::Validation { message },
            other => KoveoError::Store(other.to_string()),
        }
    }
}
