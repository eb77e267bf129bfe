mod coordinate;
mod entity_kind;
mod entry;
mod language;
mod seed;
mod source_record;
mod stats;

use std::collections::HashMap;

pub use coordinate::{validate_record_id, Coordinate, RecordId};
pub use entity_kind::{EntityKind, TranslatableField};
pub use entry::{TranslationEntry, UpsertOutcome};
pub use language::LanguageCode;
pub use seed::{SeedEntry, SeedMode};
pub use source_record::SourceRecord;
pub use stats::LanguageStats;

/// Field name to translated value for one record in one language.
pub type RecordTranslations = HashMap<String, Option<String>>;

/// Record id to its per-field translations, as returned by batched lookups.
pub type BatchTranslations = HashMap<RecordId, RecordTranslations>;
