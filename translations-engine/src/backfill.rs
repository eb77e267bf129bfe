//! Seeding overlay entries from the authoritative entity tables.
//!
//! For every source row and translatable field, backfill writes one entry in
//! the baseline language and one per secondary language, all holding the
//! row's current text. Rows are written in chunks through
//! [`TranslationRepository::bulk_seed`], one statement per chunk.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, error, info, instrument, warn};
use translations_repository::{SourceRecordReader, TranslationRepository, TranslationRepositoryError};
use translations_shared::{
    validate_record_id, Coordinate, EntityKind, SeedEntry, SeedMode, SourceRecord,
};

use crate::config::EngineConfig;

/// How seeding one entity kind ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KindOutcome {
    /// Every chunk that ran was written.
    Seeded,
    /// Reading or writing failed; the message is the storage error.
    Failed(String),
    /// Not attempted because shutdown was requested first.
    Skipped,
}

/// Per-kind result of a backfill run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindReport {
    pub kind: EntityKind,
    pub records_read: usize,
    pub entries_written: u64,
    pub outcome: KindOutcome,
}

impl KindReport {
    fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            records_read: 0,
            entries_written: 0,
            outcome: KindOutcome::Seeded,
        }
    }

    fn skipped(kind: EntityKind) -> Self {
        Self {
            outcome: KindOutcome::Skipped,
            ..Self::new(kind)
        }
    }
}

/// Result of a whole backfill run.
///
/// A run always produces a report; failures of individual kinds are recorded
/// here rather than returned as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub mode: SeedMode,
    pub kinds: Vec<KindReport>,
    pub cancelled: bool,
}

impl BackfillReport {
    /// True when every kind was seeded and no shutdown interrupted the run.
    pub fn is_complete(&self) -> bool {
        !self.cancelled
            && self
                .kinds
                .iter()
                .all(|report| report.outcome == KindOutcome::Seeded)
    }

    pub fn failed_kinds(&self) -> Vec<EntityKind> {
        self.kinds
            .iter()
            .filter(|report| matches!(report.outcome, KindOutcome::Failed(_)))
            .map(|report| report.kind)
            .collect()
    }

    pub fn total_entries_written(&self) -> u64 {
        self.kinds.iter().map(|report| report.entries_written).sum()
    }
}

/// Returns true once a shutdown signal has been broadcast.
///
/// A lagged receiver has missed at least one signal, which still means
/// shutdown. A closed channel with nothing queued means no signal will ever
/// arrive.
fn shutdown_requested(shutdown: &mut broadcast::Receiver<()>) -> bool {
    match shutdown.try_recv() {
        Ok(()) | Err(TryRecvError::Lagged(_)) => true,
        Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => false,
    }
}

/// Reads source rows and seeds overlay entries for them.
pub struct BackfillEngine {
    repository: Arc<dyn TranslationRepository>,
    sources: Arc<dyn SourceRecordReader>,
    config: EngineConfig,
}

impl BackfillEngine {
    pub fn new(
        repository: Arc<dyn TranslationRepository>,
        sources: Arc<dyn SourceRecordReader>,
    ) -> Self {
        Self::with_config(repository, sources, EngineConfig::default())
    }

    pub fn with_config(
        repository: Arc<dyn TranslationRepository>,
        sources: Arc<dyn SourceRecordReader>,
        config: EngineConfig,
    ) -> Self {
        Self {
            repository,
            sources,
            config,
        }
    }

    /// Seeds only coordinates that have no entry yet, keeping saved
    /// translations intact.
    pub async fn seed_missing(
        &self,
        kinds: &[EntityKind],
        shutdown: &mut broadcast::Receiver<()>,
    ) -> BackfillReport {
        self.run(SeedMode::IfAbsent, kinds, shutdown).await
    }

    /// Overwrites every seeded coordinate with the current source text,
    /// replacing any manual translation.
    pub async fn force_reseed(
        &self,
        kinds: &[EntityKind],
        shutdown: &mut broadcast::Receiver<()>,
    ) -> BackfillReport {
        self.run(SeedMode::Overwrite, kinds, shutdown).await
    }

    /// Runs a backfill over `kinds` (every kind when empty).
    ///
    /// Kinds are processed in order. A kind whose source table cannot be read
    /// or whose writes fail is logged and recorded as
    /// [`KindOutcome::Failed`]; the remaining kinds still run. Shutdown is
    /// checked before each kind and between chunks. Entries already written
    /// stay in place when the run stops early.
    #[instrument(skip(self, kinds, shutdown))]
    pub async fn run(
        &self,
        mode: SeedMode,
        kinds: &[EntityKind],
        shutdown: &mut broadcast::Receiver<()>,
    ) -> BackfillReport {
        let requested = if kinds.is_empty() { &EntityKind::ALL[..] } else { kinds };
        let mut selected: Vec<EntityKind> = Vec::with_capacity(requested.len());
        for kind in requested {
            if !selected.contains(kind) {
                selected.push(*kind);
            }
        }

        info!(
            kinds = ?selected,
            baseline = %self.config.baseline_language,
            secondary = ?self.config.secondary_languages,
            "Starting backfill"
        );

        let mut report = BackfillReport {
            mode,
            kinds: Vec::with_capacity(selected.len()),
            cancelled: false,
        };

        for kind in selected {
            if report.cancelled || shutdown_requested(shutdown) {
                report.cancelled = true;
                report.kinds.push(KindReport::skipped(kind));
                continue;
            }

            let mut kind_report = KindReport::new(kind);
            match self.seed_kind(mode, &mut kind_report, shutdown).await {
                Ok(interrupted) => {
                    info!(
                        %kind,
                        records_read = kind_report.records_read,
                        entries_written = kind_report.entries_written,
                        "Seeded entity kind"
                    );
                    report.cancelled = interrupted;
                }
                Err(e) => {
                    error!(%kind, error = %e, "Failed to seed entity kind, continuing");
                    kind_report.outcome = KindOutcome::Failed(e.to_string());
                }
            }
            report.kinds.push(kind_report);
        }

        if report.cancelled {
            warn!(
                entries_written = report.total_entries_written(),
                "Backfill stopped by shutdown signal"
            );
        } else {
            info!(
                entries_written = report.total_entries_written(),
                failed = report.failed_kinds().len(),
                "Backfill finished"
            );
        }
        report
    }

    /// Seeds one kind, returning whether shutdown interrupted it.
    async fn seed_kind(
        &self,
        mode: SeedMode,
        report: &mut KindReport,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> Result<bool, TranslationRepositoryError> {
        let records = self.sources.fetch_records(report.kind).await?;
        report.records_read = records.len();

        for (index, chunk) in records.chunks(self.config.seed_chunk_size.max(1)).enumerate() {
            if index > 0 && shutdown_requested(shutdown) {
                return Ok(true);
            }
            let entries = self.seed_entries(chunk);
            if entries.is_empty() {
                continue;
            }
            let written = self.repository.bulk_seed(&entries, mode).await?;
            report.entries_written += written;
            debug!(
                kind = %report.kind,
                chunk = index,
                rows = chunk.len(),
                written,
                "Seeded chunk"
            );
        }
        Ok(false)
    }

    /// Expands source rows into one entry per field per seeded language.
    fn seed_entries(&self, records: &[SourceRecord]) -> Vec<SeedEntry> {
        let mut entries = Vec::new();
        for record in records {
            if let Err(e) = validate_record_id(record.record_id) {
                warn!(kind = %record.kind, error = %e, "Skipping source row");
                continue;
            }
            for (field, value) in &record.fields {
                for language in self.config.seeded_languages() {
                    match Coordinate::new(record.kind, record.record_id, *field, language.clone()) {
                        Ok(coordinate) => entries.push(SeedEntry {
                            coordinate,
                            value: value.clone(),
                        }),
                        Err(e) => {
                            warn!(kind = %record.kind, record_id = record.record_id, error = %e, "Skipping source field");
                            break;
                        }
                    }
                }
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use translations_repository::InMemoryTranslationRepository;
    use translations_shared::TranslatableField;

    fn employee(id: i64, name: &str) -> SourceRecord {
        SourceRecord::new(EntityKind::Employees, id).with_field(TranslatableField::Name, Some(name))
    }

    #[test]
    fn test_shutdown_requested() {
        let (tx, mut rx) = broadcast::channel::<()>(1);
        assert!(!shutdown_requested(&mut rx));
        tx.send(()).unwrap();
        assert!(shutdown_requested(&mut rx));

        drop(tx);
        assert!(!shutdown_requested(&mut rx));
    }

    #[test]
    fn test_seed_entries_expand_languages_and_skip_bad_rows() {
        let repository = Arc::new(InMemoryTranslationRepository::new());
        let engine = BackfillEngine::new(repository.clone(), repository);

        let records = vec![
            employee(1, "Alma").with_field(TranslatableField::Department, None),
            employee(0, "Ghost"),
            SourceRecord::new(EntityKind::Employees, 2).with_field(TranslatableField::Title, Some("x")),
        ];
        let entries = engine.seed_entries(&records);

        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|e| e.coordinate.record_id() == 1));
        let languages: Vec<&str> = entries
            .iter()
            .filter(|e| e.coordinate.field() == TranslatableField::Name)
            .map(|e| e.coordinate.language().as_str())
            .collect();
        assert_eq!(languages, vec!["sq", "en"]);
    }

    #[test]
    fn test_report_helpers() {
        let report = BackfillReport {
            mode: SeedMode::IfAbsent,
            kinds: vec![
                KindReport {
                    entries_written: 4,
                    ..KindReport::new(EntityKind::Employees)
                },
                KindReport {
                    outcome: KindOutcome::Failed("boom".to_string()),
                    ..KindReport::new(EntityKind::Contracts)
                },
            ],
            cancelled: false,
        };
        assert!(!report.is_complete());
        assert_eq!(report.failed_kinds(), vec![EntityKind::Contracts]);
        assert_eq!(report.total_entries_written(), 4);
    }

    #[tokio::test]
    async fn test_run_with_no_kinds_covers_all() {
        let repository = Arc::new(
            InMemoryTranslationRepository::new()
                .with_source_records(EntityKind::Employees, vec![employee(1, "Alma")]).unwrap()
                .with_source_records(EntityKind::Contracts, vec![]).unwrap()
                .with_source_records(EntityKind::Tasks, vec![]).unwrap(),
        );
        let engine = BackfillEngine::new(repository.clone(), repository.clone());
        let (_tx, mut rx) = broadcast::channel(1);

        let report = engine.seed_missing(&[], &mut rx).await;

        assert!(report.is_complete());
        assert_eq!(report.kinds.len(), 3);
        assert_eq!(report.total_entries_written(), 2);
        assert_eq!(repository.len().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_report_serializes() {
        let report = BackfillReport {
            mode: SeedMode::Overwrite,
            kinds: vec![KindReport::skipped(EntityKind::Tasks)],
            cancelled: true,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "overwrite");
        assert_eq!(json["kinds"][0]["kind"], "tasks");
        assert_eq!(json["kinds"][0]["outcome"], "skipped");
    }
}
