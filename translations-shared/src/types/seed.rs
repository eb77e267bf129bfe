use serde::{Deserialize, Serialize};

use crate::types::Coordinate;

/// How a bulk seed treats coordinates that already hold a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedMode {
    /// Only insert coordinates that have no entry yet; saved overrides are kept.
    #[default]
    IfAbsent,
    /// Overwrite every seeded coordinate with the source value.
    Overwrite,
}

/// One coordinate/value pair handed to a bulk seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedEntry {
    pub coordinate: Coordinate,
    pub value: Option<String>,
}
