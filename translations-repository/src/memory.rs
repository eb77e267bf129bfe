//! In-memory implementation of the repository traits.
//!
//! Mirrors the PostgreSQL semantics: one entry per coordinate, overwriting
//! upserts, insert-if-absent seeding, and record-scoped reads that treat
//! absence as an empty result. Source tables are registered explicitly; a kind
//! that was never registered behaves like a missing table.
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use translations_shared::{
    Coordinate, EntityKind, LanguageCode, LanguageStats, RecordId, SeedEntry, SeedMode,
    SourceRecord, TranslationEntry, UpsertOutcome,
};

use crate::{FieldValue, SourceRecordReader, TranslationRepository, TranslationRepositoryError};

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    entries: BTreeMap<Coordinate, TranslationEntry>,
    sources: HashMap<EntityKind, Vec<SourceRecord>>,
}

impl MemoryState {
    fn write(&mut self, coordinate: &Coordinate, value: Option<&str>) -> UpsertOutcome {
        let now = Utc::now();
        if let Some(entry) = self.entries.get_mut(coordinate) {
            entry.translated_value = value.map(str::to_string);
            entry.updated_at = now;
            return UpsertOutcome::Updated;
        }
        self.next_id += 1;
        self.entries.insert(
            coordinate.clone(),
            TranslationEntry {
                id: self.next_id,
                table_name: coordinate.kind().as_str().to_string(),
                record_id: coordinate.record_id(),
                field_name: coordinate.field().as_str().to_string(),
                language_code: coordinate.language().as_str().to_string(),
                translated_value: value.map(str::to_string),
                created_at: now,
                updated_at: now,
            },
        );
        UpsertOutcome::Created
    }

    fn record_fields<'a>(
        &'a self,
        kind: EntityKind,
        record_id: RecordId,
        language: &'a LanguageCode,
    ) -> impl Iterator<Item = FieldValue> + 'a {
        self.entries
            .iter()
            .filter(move |(coord, _)| {
                coord.kind() == kind && coord.record_id() == record_id && coord.language() == language
            })
            .map(|(_, entry)| FieldValue {
                record_id: entry.record_id,
                field_name: entry.field_name.clone(),
                translated_value: entry.translated_value.clone(),
            })
    }
}

/// Process-local overlay store.
#[derive(Default)]
pub struct InMemoryTranslationRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryTranslationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the rows of one source table for backfill to read.
    pub fn with_source_records(
        self,
        kind: EntityKind,
        records: Vec<SourceRecord>,
    ) -> Result<Self, TranslationRepositoryError> {
        self.set_source_records(kind, records)?;
        Ok(self)
    }

    /// Replaces the rows of one source table.
    pub fn set_source_records(
        &self,
        kind: EntityKind,
        records: Vec<SourceRecord>,
    ) -> Result<(), TranslationRepositoryError> {
        self.lock()?.sources.insert(kind, records);
        Ok(())
    }

    /// Number of stored entries across all coordinates.
    pub fn len(&self) -> Result<usize, TranslationRepositoryError> {
        Ok(self.lock()?.entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, TranslationRepositoryError> {
        Ok(self.lock()?.entries.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, TranslationRepositoryError> {
        self.state
            .lock()
            .map_err(|_| TranslationRepositoryError::LockPoisoned)
    }
}

#[async_trait]
impl TranslationRepository for InMemoryTranslationRepository {
    async fn find_value(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Option<Option<String>>, TranslationRepositoryError> {
        Ok(self
            .lock()?
            .entries
            .get(coordinate)
            .map(|entry| entry.translated_value.clone()))
    }

    async fn find_entry(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Option<TranslationEntry>, TranslationRepositoryError> {
        Ok(self.lock()?.entries.get(coordinate).cloned())
    }

    async fn find_record(
        &self,
        kind: EntityKind,
        record_id: RecordId,
        language: &LanguageCode,
    ) -> Result<Vec<FieldValue>, TranslationRepositoryError> {
        let state = self.lock()?;
        Ok(state.record_fields(kind, record_id, language).collect())
    }

    async fn find_records(
        &self,
        kind: EntityKind,
        record_ids: &[RecordId],
        language: &LanguageCode,
    ) -> Result<Vec<FieldValue>, TranslationRepositoryError> {
        if record_ids.is_empty() {
            return Ok(Vec::new());
        }
        // One lock for the whole batch gives the same single-snapshot read as
        // the SQL implementation.
        let state = self.lock()?;
        Ok(state
            .entries
            .iter()
            .filter(|(coord, _)| {
                coord.kind() == kind
                    && coord.language() == language
                    && record_ids.contains(&coord.record_id())
            })
            .map(|(_, entry)| FieldValue {
                record_id: entry.record_id,
                field_name: entry.field_name.clone(),
                translated_value: entry.translated_value.clone(),
            })
            .collect())
    }

    async fn upsert(
        &self,
        coordinate: &Coordinate,
        value: Option<&str>,
    ) -> Result<UpsertOutcome, TranslationRepositoryError> {
        Ok(self.lock()?.write(coordinate, value))
    }

    async fn update_existing(
        &self,
        coordinate: &Coordinate,
        value: Option<&str>,
    ) -> Result<bool, TranslationRepositoryError> {
        let mut state = self.lock()?;
        match state.entries.get_mut(coordinate) {
            Some(entry) => {
                entry.translated_value = value.map(str::to_string);
                entry.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_one(&self, coordinate: &Coordinate) -> Result<bool, TranslationRepositoryError> {
        Ok(self.lock()?.entries.remove(coordinate).is_some())
    }

    async fn delete_record(
        &self,
        kind: EntityKind,
        record_id: RecordId,
    ) -> Result<u64, TranslationRepositoryError> {
        let mut state = self.lock()?;
        let before = state.entries.len();
        state
            .entries
            .retain(|coord, _| !(coord.kind() == kind && coord.record_id() == record_id));
        Ok((before - state.entries.len()) as u64)
    }

    async fn bulk_seed(
        &self,
        entries: &[SeedEntry],
        mode: SeedMode,
    ) -> Result<u64, TranslationRepositoryError> {
        let mut state = self.lock()?;
        let mut written: HashSet<&Coordinate> = HashSet::new();
        for entry in entries {
            let exists = state.entries.contains_key(&entry.coordinate);
            let seeded_here = written.contains(&entry.coordinate);
            if mode == SeedMode::IfAbsent && exists && !seeded_here {
                continue;
            }
            state.write(&entry.coordinate, entry.value.as_deref());
            written.insert(&entry.coordinate);
        }
        Ok(written.len() as u64)
    }

    async fn language_stats(&self) -> Result<Vec<LanguageStats>, TranslationRepositoryError> {
        let state = self.lock()?;
        let mut by_language: BTreeMap<&str, LanguageStats> = BTreeMap::new();
        for entry in state.entries.values() {
            let stats = by_language
                .entry(entry.language_code.as_str())
                .or_insert_with(|| LanguageStats {
                    language_code: entry.language_code.clone(),
                    total: 0,
                    completed: 0,
                });
            stats.total += 1;
            if entry.is_completed() {
                stats.completed += 1;
            }
        }
        Ok(by_language.into_values().collect())
    }

    async fn distinct_languages(&self) -> Result<Vec<String>, TranslationRepositoryError> {
        let state = self.lock()?;
        let mut languages: Vec<String> = state
            .entries
            .values()
            .map(|entry| entry.language_code.clone())
            .collect();
        languages.sort();
        languages.dedup();
        Ok(languages)
    }

    async fn list_language(
        &self,
        language: &LanguageCode,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TranslationEntry>, TranslationRepositoryError> {
        let state = self.lock()?;
        let mut entries: Vec<&TranslationEntry> = state
            .entries
            .values()
            .filter(|entry| entry.language_code == language.as_str())
            .collect();
        entries.sort_by(|a, b| {
            (&a.table_name, a.record_id, &a.field_name).cmp(&(&b.table_name, b.record_id, &b.field_name))
        });
        Ok(entries
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn check_tables_created(&self) -> Result<bool, TranslationRepositoryError> {
        Ok(true)
    }
}

#[async_trait]
impl SourceRecordReader for InMemoryTranslationRepository {
    async fn fetch_records(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<SourceRecord>, TranslationRepositoryError> {
        self.lock()?
            .sources
            .get(&kind)
            .cloned()
            .ok_or_else(|| {
                TranslationRepositoryError::SourceUnavailable(format!(
                    "relation \"{}\" does not exist",
                    kind.as_str()
                ))
            })
    }
}
