//! Configuration types for the overlay engines.

use std::env;

use tracing::warn;
use translations_shared::{LanguageCode, ValidationError};

/// Default baseline language code.
pub const DEFAULT_BASELINE_LANGUAGE: &str = "sq";

/// Default secondary languages seeded by backfill.
pub const DEFAULT_SECONDARY_LANGUAGES: &str = "en";

/// Default limit on ids per batched lookup.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

/// Default number of source rows written per bulk seed statement.
pub const DEFAULT_SEED_CHUNK_SIZE: usize = 500;

/// Configuration shared by the overlay engines.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Language assumed when a caller supplies none, and the language whose
    /// entries mirror the original record text.
    pub baseline_language: LanguageCode,

    /// Additional languages that backfill seeds with the original text as a
    /// placeholder. Never contains the baseline or duplicates.
    pub secondary_languages: Vec<LanguageCode>,

    /// Maximum number of distinct ids accepted by a batched lookup.
    ///
    /// `None` disables the limit.
    pub max_batch_size: Option<usize>,

    /// Source rows per bulk seed statement during backfill. Shutdown is
    /// checked between chunks.
    pub seed_chunk_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            baseline_language: LanguageCode::albanian(),
            secondary_languages: vec![LanguageCode::english()],
            max_batch_size: Some(DEFAULT_MAX_BATCH_SIZE),
            seed_chunk_size: DEFAULT_SEED_CHUNK_SIZE,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TRANSLATIONS_BASELINE_LANGUAGE`: baseline language (default: sq)
    /// - `TRANSLATIONS_SECONDARY_LANGUAGES`: comma-separated secondary languages (default: en)
    /// - `TRANSLATIONS_MAX_BATCH_SIZE`: batched lookup limit, `0` for unlimited (default: 1000)
    /// - `TRANSLATIONS_SEED_CHUNK_SIZE`: source rows per seed statement (default: 500)
    ///
    /// Unparseable numbers fall back to their defaults with a warning; invalid
    /// language codes are rejected.
    pub fn from_env() -> Result<Self, ValidationError> {
        let baseline = env::var("TRANSLATIONS_BASELINE_LANGUAGE")
            .unwrap_or_else(|_| DEFAULT_BASELINE_LANGUAGE.to_string());
        let secondary = env::var("TRANSLATIONS_SECONDARY_LANGUAGES")
            .unwrap_or_else(|_| DEFAULT_SECONDARY_LANGUAGES.to_string());
        let secondary_languages = secondary
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(LanguageCode::new)
            .collect::<Result<Vec<_>, _>>()?;

        let max_batch_size = match parse_usize_var("TRANSLATIONS_MAX_BATCH_SIZE") {
            Some(0) => None,
            Some(size) => Some(size),
            None => Some(DEFAULT_MAX_BATCH_SIZE),
        };
        let seed_chunk_size = parse_usize_var("TRANSLATIONS_SEED_CHUNK_SIZE")
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_SEED_CHUNK_SIZE);

        Ok(Self {
            max_batch_size,
            seed_chunk_size,
            ..Self::default()
        }
        .with_baseline_language(LanguageCode::new(&baseline)?)
        .with_secondary_languages(secondary_languages))
    }

    pub fn with_baseline_language(mut self, baseline: LanguageCode) -> Self {
        self.baseline_language = baseline;
        let secondary = std::mem::take(&mut self.secondary_languages);
        self.with_secondary_languages(secondary)
    }

    /// Sets the secondary languages, dropping the baseline and duplicates.
    pub fn with_secondary_languages(mut self, languages: Vec<LanguageCode>) -> Self {
        let mut secondary: Vec<LanguageCode> = Vec::with_capacity(languages.len());
        for language in languages {
            if language != self.baseline_language && !secondary.contains(&language) {
                secondary.push(language);
            }
        }
        self.secondary_languages = secondary;
        self
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = Some(max_batch_size);
        self
    }

    /// Removes the batched lookup limit.
    pub fn unlimited(mut self) -> Self {
        self.max_batch_size = None;
        self
    }

    pub fn with_seed_chunk_size(mut self, seed_chunk_size: usize) -> Self {
        self.seed_chunk_size = seed_chunk_size.max(1);
        self
    }

    /// Baseline followed by every secondary language.
    pub fn seeded_languages(&self) -> impl Iterator<Item = &LanguageCode> {
        std::iter::once(&self.baseline_language).chain(self.secondary_languages.iter())
    }
}

fn parse_usize_var(name: &str) -> Option<usize> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "Invalid number in environment, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn lang(code: &str) -> LanguageCode {
        LanguageCode::new(code).unwrap()
    }

    fn clear_env_vars() {
        env::remove_var("TRANSLATIONS_BASELINE_LANGUAGE");
        env::remove_var("TRANSLATIONS_SECONDARY_LANGUAGES");
        env::remove_var("TRANSLATIONS_MAX_BATCH_SIZE");
        env::remove_var("TRANSLATIONS_SEED_CHUNK_SIZE");
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.baseline_language, lang("sq"));
        assert_eq!(config.secondary_languages, vec![lang("en")]);
        assert_eq!(config.max_batch_size, Some(1000));
        assert_eq!(config.seed_chunk_size, 500);
        assert_eq!(config.baseline_language.as_str(), DEFAULT_BASELINE_LANGUAGE);
        assert_eq!(config.secondary_languages[0].as_str(), DEFAULT_SECONDARY_LANGUAGES);
    }

    #[test]
    fn test_secondary_drops_baseline_and_duplicates() {
        let config = EngineConfig::default()
            .with_secondary_languages(vec![lang("en"), lang("sq"), lang("it"), lang("en")]);
        assert_eq!(config.secondary_languages, vec![lang("en"), lang("it")]);
    }

    #[test]
    fn test_changing_baseline_refilters_secondary() {
        let config = EngineConfig::default()
            .with_secondary_languages(vec![lang("en"), lang("it")])
            .with_baseline_language(lang("en"));
        assert_eq!(config.baseline_language, lang("en"));
        assert_eq!(config.secondary_languages, vec![lang("it")]);
    }

    #[test]
    fn test_seeded_languages_order() {
        let config = EngineConfig::default().with_secondary_languages(vec![lang("en"), lang("de")]);
        let seeded: Vec<&str> = config.seeded_languages().map(LanguageCode::as_str).collect();
        assert_eq!(seeded, vec!["sq", "en", "de"]);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env_vars();
        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.baseline_language, lang("sq"));
        assert_eq!(config.secondary_languages, vec![lang("en")]);
        assert_eq!(config.max_batch_size, Some(DEFAULT_MAX_BATCH_SIZE));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env_vars();
        env::set_var("TRANSLATIONS_BASELINE_LANGUAGE", "EN");
        env::set_var("TRANSLATIONS_SECONDARY_LANGUAGES", "sq, it,,en");
        env::set_var("TRANSLATIONS_MAX_BATCH_SIZE", "0");
        env::set_var("TRANSLATIONS_SEED_CHUNK_SIZE", "not-a-number");

        let config = EngineConfig::from_env().unwrap();
        clear_env_vars();

        assert_eq!(config.baseline_language, lang("en"));
        assert_eq!(config.secondary_languages, vec![lang("sq"), lang("it")]);
        assert_eq!(config.max_batch_size, None);
        assert_eq!(config.seed_chunk_size, DEFAULT_SEED_CHUNK_SIZE);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_language() {
        clear_env_vars();
        env::set_var("TRANSLATIONS_SECONDARY_LANGUAGES", "en,fr;--");
        let result = EngineConfig::from_env();
        clear_env_vars();
        assert!(matches!(result, Err(ValidationError::InvalidLanguageCode(_))));
    }
}
