//! This module defines and re-exports the interfaces for the translation repository.
mod source_records;
mod translations;

pub use source_records::SourceRecordReader;
pub use translations::{FieldValue, TranslationRepository};
