//! Read side of the overlay store.
//!
//! Lookups validate their coordinates first and then make exactly one storage
//! round-trip. A missing entry is a normal result (`Absent`, an empty map),
//! never an error.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, instrument};
use translations_repository::{FieldValue, TranslationRepository};
use translations_shared::{
    validate_record_id, BatchTranslations, Coordinate, EntityKind, LanguageCode, RecordId,
    RecordTranslations, TranslationEntry,
};

use crate::config::EngineConfig;
use crate::errors::OverlayError;

/// Result of a point lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationLookup {
    /// No entry exists at the coordinate.
    Absent,
    /// An entry exists; its value may itself be NULL.
    Present(Option<String>),
}

impl TranslationLookup {
    /// The stored text, if an entry exists and is not NULL.
    pub fn value(&self) -> Option<&str> {
        match self {
            TranslationLookup::Present(Some(value)) => Some(value),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, TranslationLookup::Absent)
    }

    pub fn into_value(self) -> Option<String> {
        match self {
            TranslationLookup::Present(value) => value,
            TranslationLookup::Absent => None,
        }
    }
}

impl From<Option<Option<String>>> for TranslationLookup {
    fn from(found: Option<Option<String>>) -> Self {
        match found {
            Some(value) => TranslationLookup::Present(value),
            None => TranslationLookup::Absent,
        }
    }
}

/// Resolves the caller's language, falling back to the baseline when none
/// (or a blank code) is supplied.
pub(crate) fn resolve_language(
    config: &EngineConfig,
    language: Option<&str>,
) -> Result<LanguageCode, OverlayError> {
    match language {
        Some(code) if !code.trim().is_empty() => Ok(LanguageCode::new(code)?),
        _ => Ok(config.baseline_language.clone()),
    }
}

/// Builds a validated coordinate from raw caller strings.
pub(crate) fn resolve_coordinate(
    config: &EngineConfig,
    kind: &str,
    record_id: i64,
    field: &str,
    language: Option<&str>,
) -> Result<Coordinate, OverlayError> {
    let kind: EntityKind = kind.parse()?;
    let field = kind.field(field)?;
    let language = resolve_language(config, language)?;
    Ok(Coordinate::new(kind, record_id, field, language)?)
}

fn into_record_translations(values: Vec<FieldValue>) -> RecordTranslations {
    values
        .into_iter()
        .map(|value| (value.field_name, value.translated_value))
        .collect()
}

/// Point, per-record and batched lookups over a [`TranslationRepository`].
pub struct OverlayQueryEngine {
    repository: Arc<dyn TranslationRepository>,
    config: EngineConfig,
}

impl OverlayQueryEngine {
    /// Creates a query engine with the default configuration.
    pub fn new(repository: Arc<dyn TranslationRepository>) -> Self {
        Self::with_config(repository, EngineConfig::default())
    }

    pub fn with_config(repository: Arc<dyn TranslationRepository>, config: EngineConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Looks up one translated field.
    ///
    /// # Arguments
    ///
    /// * `kind` - Entity table name, e.g. `employees`
    /// * `record_id` - Positive record id
    /// * `field` - Translatable field of `kind`
    /// * `language` - Language code, or `None` for the baseline language
    ///
    /// # Returns
    ///
    /// * `Ok(TranslationLookup::Absent)` - Nothing stored at the coordinate
    /// * `Ok(TranslationLookup::Present(value))` - The stored value
    /// * `Err(OverlayError)` - Invalid input or a storage failure
    #[instrument(skip(self))]
    pub async fn get_translation(
        &self,
        kind: &str,
        record_id: i64,
        field: &str,
        language: Option<&str>,
    ) -> Result<TranslationLookup, OverlayError> {
        let coordinate = resolve_coordinate(&self.config, kind, record_id, field, language)?;
        let found = self.repository.find_value(&coordinate).await?;
        Ok(found.into())
    }

    /// Like [`get_translation`](Self::get_translation) but returns the whole
    /// stored row, timestamps included.
    #[instrument(skip(self))]
    pub async fn get_entry(
        &self,
        kind: &str,
        record_id: i64,
        field: &str,
        language: Option<&str>,
    ) -> Result<Option<TranslationEntry>, OverlayError> {
        let coordinate = resolve_coordinate(&self.config, kind, record_id, field, language)?;
        Ok(self.repository.find_entry(&coordinate).await?)
    }

    /// Returns every translated field of one record in one language.
    ///
    /// A record with no entries yields an empty map.
    #[instrument(skip(self))]
    pub async fn get_record_translations(
        &self,
        kind: &str,
        record_id: i64,
        language: Option<&str>,
    ) -> Result<RecordTranslations, OverlayError> {
        let kind: EntityKind = kind.parse()?;
        let language = resolve_language(&self.config, language)?;
        let record_id = validate_record_id(record_id)?;

        let values = self
            .repository
            .find_record(kind, record_id, &language)
            .await?;
        Ok(into_record_translations(values))
    }

    /// Returns the per-field translations of many records with a single read.
    ///
    /// Every requested id appears in the result, mapped to an empty map when
    /// it has no entries. Duplicate ids are collapsed before the batch limit
    /// is checked. An empty id list returns an empty map without touching
    /// storage.
    ///
    /// # Errors
    ///
    /// * `OverlayError::Validation` - Unknown kind, bad language or a non-positive id
    /// * `OverlayError::BatchSizeExceeded` - More distinct ids than `max_batch_size`
    /// * `OverlayError::Storage` - The batched read failed
    #[instrument(skip(self, record_ids), fields(requested = record_ids.len()))]
    pub async fn get_multiple_record_translations(
        &self,
        kind: &str,
        record_ids: &[i64],
        language: Option<&str>,
    ) -> Result<BatchTranslations, OverlayError> {
        let kind: EntityKind = kind.parse()?;
        let language = resolve_language(&self.config, language)?;

        if record_ids.is_empty() {
            debug!("Empty id list, skipping storage read");
            return Ok(BatchTranslations::new());
        }

        let mut distinct = BTreeSet::new();
        for record_id in record_ids {
            distinct.insert(validate_record_id(*record_id)?);
        }
        self.validate_batch_size(distinct.len())?;

        let ids: Vec<RecordId> = distinct.into_iter().collect();
        let values = self.repository.find_records(kind, &ids, &language).await?;

        let mut result: BatchTranslations = ids
            .iter()
            .map(|id| (*id, RecordTranslations::new()))
            .collect();
        for value in values {
            result
                .entry(value.record_id)
                .or_default()
                .insert(value.field_name, value.translated_value);
        }
        Ok(result)
    }

    /// Pages through the entries stored for one language.
    #[instrument(skip(self))]
    pub async fn list_language_entries(
        &self,
        language: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TranslationEntry>, OverlayError> {
        let language = resolve_language(&self.config, language)?;
        let limit = limit.max(0);
        let offset = offset.max(0);
        Ok(self
            .repository
            .list_language(&language, limit, offset)
            .await?)
    }

    fn validate_batch_size(&self, size: usize) -> Result<(), OverlayError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(OverlayError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }
}
