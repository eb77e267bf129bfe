use thiserror::Error;

/// Represents errors that can occur within the translation repository.
///
/// Only storage-side failures live here. Absence of data is never an error:
/// repository reads return `Option`, empty vectors, `false` or `0` instead.
#[derive(Debug, Error)]
pub enum TranslationRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Source table unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Repository state lock poisoned")]
    LockPoisoned,
}
