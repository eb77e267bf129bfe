//! Error types for the translation repository.
//! Consolidates and re-exports error types related to overlay persistence.
mod translation_repository;

pub use translation_repository::TranslationRepositoryError;
