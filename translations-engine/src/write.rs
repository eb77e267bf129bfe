//! Write side of the overlay store.
//!
//! Each operation maps to one conflict-resolving storage statement, so the
//! coordinate uniqueness invariant holds under concurrent callers without any
//! locking here.

use std::sync::Arc;

use tracing::{info, instrument};
use translations_repository::TranslationRepository;
use translations_shared::{validate_record_id, EntityKind, UpsertOutcome};

use crate::config::EngineConfig;
use crate::errors::OverlayError;
use crate::query::resolve_coordinate;

/// Upserts, conditional updates and deletes over a [`TranslationRepository`].
pub struct OverlayWriteEngine {
    repository: Arc<dyn TranslationRepository>,
    config: EngineConfig,
}

impl OverlayWriteEngine {
    pub fn new(repository: Arc<dyn TranslationRepository>) -> Self {
        Self::with_config(repository, EngineConfig::default())
    }

    pub fn with_config(repository: Arc<dyn TranslationRepository>, config: EngineConfig) -> Self {
        Self { repository, config }
    }

    /// Inserts or overwrites the entry at a coordinate.
    ///
    /// # Arguments
    ///
    /// * `kind` - Entity table name
    /// * `record_id` - Positive record id
    /// * `field` - Translatable field of `kind`
    /// * `language` - Language code, or `None` for the baseline language
    /// * `value` - Text to store; `None` stores NULL
    ///
    /// # Returns
    ///
    /// Whether the entry was created or an existing one was overwritten.
    #[instrument(skip(self, value))]
    pub async fn upsert(
        &self,
        kind: &str,
        record_id: i64,
        field: &str,
        language: Option<&str>,
        value: Option<&str>,
    ) -> Result<UpsertOutcome, OverlayError> {
        let coordinate = resolve_coordinate(&self.config, kind, record_id, field, language)?;
        let outcome = self.repository.upsert(&coordinate, value).await?;
        info!(
            kind = %coordinate.kind(),
            record_id,
            field = %coordinate.field(),
            language = %coordinate.language(),
            ?outcome,
            "Translation saved"
        );
        Ok(outcome)
    }

    /// Overwrites the entry only when it already exists.
    ///
    /// Returns `false` without writing anything when no entry exists there,
    /// letting callers answer "not found" instead of creating a row.
    #[instrument(skip(self, value))]
    pub async fn update_if_exists(
        &self,
        kind: &str,
        record_id: i64,
        field: &str,
        language: Option<&str>,
        value: Option<&str>,
    ) -> Result<bool, OverlayError> {
        let coordinate = resolve_coordinate(&self.config, kind, record_id, field, language)?;
        let updated = self.repository.update_existing(&coordinate, value).await?;
        if updated {
            info!(
                kind = %coordinate.kind(),
                record_id,
                field = %coordinate.field(),
                language = %coordinate.language(),
                "Translation updated"
            );
        }
        Ok(updated)
    }

    /// Removes one entry, reporting whether anything was removed.
    #[instrument(skip(self))]
    pub async fn delete_one(
        &self,
        kind: &str,
        record_id: i64,
        field: &str,
        language: Option<&str>,
    ) -> Result<bool, OverlayError> {
        let coordinate = resolve_coordinate(&self.config, kind, record_id, field, language)?;
        let removed = self.repository.delete_one(&coordinate).await?;
        if removed {
            info!(
                kind = %coordinate.kind(),
                record_id,
                field = %coordinate.field(),
                language = %coordinate.language(),
                "Translation deleted"
            );
        }
        Ok(removed)
    }

    /// Removes every field and language entry of a record.
    ///
    /// # Returns
    ///
    /// The number of entries removed, `0` when the record had none.
    #[instrument(skip(self))]
    pub async fn delete_all_for_record(&self, kind: &str, record_id: i64) -> Result<u64, OverlayError> {
        let kind: EntityKind = kind.parse()?;
        let record_id = validate_record_id(record_id)?;
        let removed = self.repository.delete_record(kind, record_id).await?;
        info!(%kind, record_id, removed, "Record translations deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use translations_repository::InMemoryTranslationRepository;
    use translations_shared::ValidationError;

    fn engine() -> (Arc<InMemoryTranslationRepository>, OverlayWriteEngine) {
        let repository = Arc::new(InMemoryTranslationRepository::new());
        let engine = OverlayWriteEngine::new(repository.clone());
        (repository, engine)
    }

    #[tokio::test]
    async fn test_upsert_reports_created_then_updated() {
        let (repository, engine) = engine();

        let first = engine.upsert("contracts", 3, "title", Some("en"), Some("Lease")).await.unwrap();
        let second = engine.upsert("contracts", 3, "title", Some("EN"), Some("Lease v2")).await.unwrap();

        assert_eq!(first, UpsertOutcome::Created);
        assert_eq!(second, UpsertOutcome::Updated);
        assert_eq!(repository.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_defaults_to_baseline_language() {
        let (repository, engine) = engine();
        engine.upsert("tasks", 1, "title", None, Some("Raport")).await.unwrap();

        let coordinate = translations_shared::Coordinate::parse("tasks", 1, "title", "sq").unwrap();
        assert_eq!(
            repository.find_value(&coordinate).await.unwrap(),
            Some(Some("Raport".to_string()))
        );
    }

    #[tokio::test]
    async fn test_upsert_rejects_invalid_input() {
        let (repository, engine) = engine();

        let err = engine.upsert("invoices", 1, "title", None, Some("x")).await.unwrap_err();
        assert!(matches!(err, OverlayError::Validation(ValidationError::UnknownEntityKind(_))));

        let err = engine.upsert("tasks", -1, "title", None, Some("x")).await.unwrap_err();
        assert!(matches!(err, OverlayError::Validation(ValidationError::InvalidRecordId(-1))));

        assert!(repository.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_update_if_exists_never_inserts() {
        let (repository, engine) = engine();

        let updated = engine
            .update_if_exists("employees", 2, "position", Some("en"), Some("Lead"))
            .await
            .unwrap();
        assert!(!updated);
        assert!(repository.is_empty().unwrap());

        engine.upsert("employees", 2, "position", Some("en"), Some("Drejtues")).await.unwrap();
        let updated = engine
            .update_if_exists("employees", 2, "position", Some("en"), Some("Lead"))
            .await
            .unwrap();
        assert!(updated);
    }

    #[tokio::test]
    async fn test_delete_one_and_all_for_record() {
        let (repository, engine) = engine();
        engine.upsert("employees", 4, "name", Some("sq"), Some("Besa")).await.unwrap();
        engine.upsert("employees", 4, "name", Some("en"), Some("Besa")).await.unwrap();
        engine.upsert("employees", 4, "department", Some("en"), Some("HR")).await.unwrap();
        engine.upsert("employees", 5, "name", Some("en"), Some("Dritan")).await.unwrap();

        assert!(engine.delete_one("employees", 4, "name", Some("sq")).await.unwrap());
        assert!(!engine.delete_one("employees", 4, "name", Some("sq")).await.unwrap());

        assert_eq!(engine.delete_all_for_record("employees", 4).await.unwrap(), 2);
        assert_eq!(engine.delete_all_for_record("employees", 4).await.unwrap(), 0);
        assert_eq!(repository.len().unwrap(), 1);
    }
}
