use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// One stored overlay row, in its persisted shape.
///
/// Coordinate components are kept as the strings found in storage so that
/// rows written before the closed enumerations existed can still be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    pub id: i64,
    pub table_name: String,
    pub record_id: RecordId,
    pub field_name: String,
    pub language_code: String,
    pub translated_value: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TranslationEntry {
    /// An entry counts as completed when it holds non-empty text.
    pub fn is_completed(&self) -> bool {
        self.translated_value
            .as_deref()
            .is_some_and(|value| !value.is_empty())
    }
}

/// What a conflict-resolving write did to its coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl UpsertOutcome {
    pub fn from_inserted(inserted: bool) -> Self {
        if inserted {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        }
    }
}
