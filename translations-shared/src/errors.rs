//! Validation errors raised before any storage access.
use thiserror::Error;

/// Rejections produced while turning caller input into typed coordinates.
///
/// None of these ever reach the storage layer: a request that fails
/// validation is refused at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unknown entity kind: {0}")]
    UnknownEntityKind(String),

    #[error("Field '{field}' is not translatable for {kind}")]
    UnsupportedField { kind: String, field: String },

    #[error("Invalid language code: {0:?}")]
    InvalidLanguageCode(String),

    #[error("Invalid record id: {0}")]
    InvalidRecordId(i64),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
