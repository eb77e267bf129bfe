use serde::{Deserialize, Serialize};

/// Completeness counts for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub language_code: String,
    /// Entries stored for the language.
    pub total: i64,
    /// Entries whose value is non-null and non-empty.
    pub completed: i64,
}

impl LanguageStats {
    pub fn pending(&self) -> i64 {
        self.total - self.completed
    }
}
