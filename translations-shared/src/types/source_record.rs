use serde::{Deserialize, Serialize};

use crate::types::{EntityKind, RecordId, TranslatableField};

/// A row read from an authoritative entity table, reduced to its
/// translatable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub kind: EntityKind,
    pub record_id: RecordId,
    pub fields: Vec<(TranslatableField, Option<String>)>,
}

impl SourceRecord {
    pub fn new(kind: EntityKind, record_id: RecordId) -> Self {
        Self {
            kind,
            record_id,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: TranslatableField, value: Option<&str>) -> Self {
        self.fields.push((field, value.map(str::to_string)));
        self
    }
}
