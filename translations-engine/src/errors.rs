//! Error types for the overlay engines.

use thiserror::Error;
use translations_repository::TranslationRepositoryError;
use translations_shared::ValidationError;

/// Errors returned by the overlay engines.
///
/// "Nothing found" is never one of these: lookups return `Absent`, empty maps,
/// `false` or `0`.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Caller input was rejected before any storage access.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Batched lookup asked for more records than allowed.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },

    /// The store was unreachable or a statement failed.
    #[error("Storage error: {0}")]
    Storage(#[from] TranslationRepositoryError),
}

impl OverlayError {
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }

    /// Whether the caller can fix the request (as opposed to a storage fault).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, OverlayError::Storage(_))
    }

    /// A message safe to hand to untrusted callers.
    ///
    /// Storage failures are reduced to a generic text; the full error should
    /// be logged instead.
    pub fn public_message(&self) -> String {
        match self {
            OverlayError::Storage(_) => "Translation storage is unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_message_hides_storage_details() {
        let err = OverlayError::from(TranslationRepositoryError::SourceUnavailable(
            "relation \"employees\" does not exist".to_string(),
        ));
        assert!(!err.is_client_error());
        assert_eq!(err.public_message(), "Translation storage is unavailable");
    }

    #[test]
    fn test_public_message_keeps_validation_details() {
        let err = OverlayError::from(ValidationError::UnknownEntityKind("invoices".to_string()));
        assert!(err.is_client_error());
        assert_eq!(err.public_message(), "Validation error: Unknown entity kind: invoices");
    }
}
