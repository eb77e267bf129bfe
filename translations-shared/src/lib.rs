//! # Translations Shared
//! This crate defines the data structures shared across the translation overlay
//! workspace: the closed set of entity kinds and translatable fields, validated
//! language codes and coordinates, stored entries, and the aggregate types
//! returned by the engines.
pub mod errors;
pub mod types;

pub use errors::ValidationError;
pub use types::{
    BatchTranslations, Coordinate, EntityKind, LanguageCode, LanguageStats, RecordId,
    RecordTranslations, SeedEntry, SeedMode, SourceRecord, TranslatableField, TranslationEntry,
    UpsertOutcome, validate_record_id,
};
