//! # Translations Repository
//! This crate provides the persistence side of the translation overlay store:
//! the `TranslationRepository` and `SourceRecordReader` traits, a PostgreSQL
//! implementation of both with embedded migrations, and an in-memory
//! implementation with identical semantics for tests and database-less use.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::TranslationRepositoryError;
pub use interfaces::{FieldValue, SourceRecordReader, TranslationRepository};
pub use memory::InMemoryTranslationRepository;
pub use postgres::{PostgresSourceReader, PostgresTranslationRepository};
