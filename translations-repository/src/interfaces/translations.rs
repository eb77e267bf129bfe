//! This module defines the `TranslationRepository` trait, the storage interface
//! of the overlay store. Implementations must enforce the coordinate uniqueness
//! invariant themselves; callers never check existence before writing.
use translations_shared::{
    Coordinate, EntityKind, LanguageCode, LanguageStats, RecordId, SeedEntry, SeedMode,
    TranslationEntry, UpsertOutcome,
};

use crate::errors::TranslationRepositoryError;

/// One translated field of one record, as returned by record-scoped reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub record_id: RecordId,
    pub field_name: String,
    pub translated_value: Option<String>,
}

/// A trait that defines the interface for interacting with the overlay table.
///
/// Every write is a single conflict-resolving storage operation, so
/// concurrent callers racing on the same coordinate converge on one row and
/// the last committed write wins.
#[async_trait::async_trait]
pub trait TranslationRepository: Send + Sync {
    /// Looks up the value stored at `coordinate`.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - No entry exists at the coordinate
    /// * `Ok(Some(None))` - An entry exists and holds NULL
    /// * `Ok(Some(Some(value)))` - An entry exists and holds `value`
    async fn find_value(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Option<Option<String>>, TranslationRepositoryError>;

    /// Returns the full stored row at `coordinate`, timestamps included.
    async fn find_entry(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Option<TranslationEntry>, TranslationRepositoryError>;

    /// Returns every translated field of one record in one language.
    async fn find_record(
        &self,
        kind: EntityKind,
        record_id: RecordId,
        language: &LanguageCode,
    ) -> Result<Vec<FieldValue>, TranslationRepositoryError>;

    /// Returns every translated field of all `record_ids` in one language
    /// using a single read.
    ///
    /// An empty id slice returns an empty vector without touching storage.
    async fn find_records(
        &self,
        kind: EntityKind,
        record_ids: &[RecordId],
        language: &LanguageCode,
    ) -> Result<Vec<FieldValue>, TranslationRepositoryError>;

    /// Inserts the entry or overwrites its value and `updated_at`.
    async fn upsert(
        &self,
        coordinate: &Coordinate,
        value: Option<&str>,
    ) -> Result<UpsertOutcome, TranslationRepositoryError>;

    /// Overwrites the entry only if it already exists.
    ///
    /// Returns `true` when an entry was found and updated. Never inserts.
    async fn update_existing(
        &self,
        coordinate: &Coordinate,
        value: Option<&str>,
    ) -> Result<bool, TranslationRepositoryError>;

    /// Removes the entry at `coordinate`, returning whether a row was removed.
    async fn delete_one(&self, coordinate: &Coordinate) -> Result<bool, TranslationRepositoryError>;

    /// Removes every field/language entry of a record, returning the count.
    async fn delete_record(
        &self,
        kind: EntityKind,
        record_id: RecordId,
    ) -> Result<u64, TranslationRepositoryError>;

    /// Writes many entries in one statement.
    ///
    /// With [`SeedMode::IfAbsent`] existing coordinates are left untouched;
    /// with [`SeedMode::Overwrite`] they take the seeded value. Duplicate
    /// coordinates in `entries` collapse to the last occurrence.
    ///
    /// # Returns
    ///
    /// The number of rows inserted or updated.
    async fn bulk_seed(
        &self,
        entries: &[SeedEntry],
        mode: SeedMode,
    ) -> Result<u64, TranslationRepositoryError>;

    /// Per-language total and completed counts, ordered by language code.
    async fn language_stats(&self) -> Result<Vec<LanguageStats>, TranslationRepositoryError>;

    /// Distinct language codes present in the store, sorted.
    async fn distinct_languages(&self) -> Result<Vec<String>, TranslationRepositoryError>;

    /// Pages through the entries of one language, ordered by coordinate.
    async fn list_language(
        &self,
        language: &LanguageCode,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TranslationEntry>, TranslationRepositoryError>;

    /// Checks whether the overlay table exists.
    async fn check_tables_created(&self) -> Result<bool, TranslationRepositoryError>;
}
