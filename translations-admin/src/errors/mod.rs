//! Error types for the administrative binary.
//! Consolidates configuration, storage and engine failures into one type that
//! `main` can report.
use translations_engine::OverlayError;
use translations_repository::TranslationRepositoryError;
use translations_shared::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid configuration value: {0}")]
    InvalidConfig(#[from] ValidationError),
    #[error("Repository error: {0}")]
    Repository(#[from] TranslationRepositoryError),
    #[error("Engine error: {0}")]
    Engine(#[from] OverlayError),
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
    #[error("Tracing initialization failed: {0}")]
    Tracing(String),
}

impl AdminError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
