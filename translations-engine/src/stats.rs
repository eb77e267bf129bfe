//! Per-language completeness counts.

use std::sync::Arc;

use tracing::{instrument, warn};
use translations_repository::TranslationRepository;
use translations_shared::LanguageStats;

use crate::config::EngineConfig;
use crate::errors::OverlayError;

/// Read-only aggregates over the overlay store.
pub struct StatsAggregator {
    repository: Arc<dyn TranslationRepository>,
    config: EngineConfig,
}

impl StatsAggregator {
    pub fn new(repository: Arc<dyn TranslationRepository>) -> Self {
        Self::with_config(repository, EngineConfig::default())
    }

    pub fn with_config(repository: Arc<dyn TranslationRepository>, config: EngineConfig) -> Self {
        Self { repository, config }
    }

    /// Total and completed (non-null, non-empty) entry counts per language,
    /// ordered by language code.
    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> Result<Vec<LanguageStats>, OverlayError> {
        Ok(self.repository.language_stats().await?)
    }

    /// Distinct language codes present in the store.
    ///
    /// Never fails: an empty store or a storage error yields just the baseline
    /// language.
    #[instrument(skip(self))]
    pub async fn get_available_languages(&self) -> Vec<String> {
        let baseline = self.config.baseline_language.as_str().to_string();
        match self.repository.distinct_languages().await {
            Ok(languages) if !languages.is_empty() => languages,
            Ok(_) => vec![baseline],
            Err(e) => {
                warn!(error = %e, "Could not read languages, falling back to baseline");
                vec![baseline]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use translations_repository::InMemoryTranslationRepository;
    use translations_shared::{Coordinate, LanguageCode};

    #[tokio::test]
    async fn test_get_stats_counts_completed() {
        let repository = Arc::new(InMemoryTranslationRepository::new());
        for (id, lang, value) in [(1, "sq", Some("x")), (2, "sq", None), (1, "en", Some("y"))] {
            let coordinate = Coordinate::parse("tasks", id, "title", lang).unwrap();
            repository.upsert(&coordinate, value).await.unwrap();
        }
        let stats = StatsAggregator::new(repository).get_stats().await.unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].language_code, "en");
        assert_eq!((stats[1].total, stats[1].completed, stats[1].pending()), (2, 1, 1));
    }

    #[tokio::test]
    async fn test_available_languages_on_empty_store() {
        let repository = Arc::new(InMemoryTranslationRepository::new());
        let aggregator = StatsAggregator::with_config(
            repository,
            EngineConfig::default().with_baseline_language(LanguageCode::new("de").unwrap()),
        );
        assert_eq!(aggregator.get_available_languages().await, vec!["de"]);
    }
}
