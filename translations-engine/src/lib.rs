//! # Translations Engine
//!
//! The operations callers use to read and write translation overlays, built on
//! the repository traits from `translations-repository`.
//!
//! ## Modules
//!
//! - [`query`]: point, per-record and batched multi-record lookups
//! - [`write`]: idempotent upserts, conditional updates and deletes
//! - [`backfill`]: seeding overlays from the authoritative entity tables
//! - [`stats`]: per-language completeness and available languages
//! - [`config`]: baseline/secondary languages and batch limits
//! - [`errors`]: the engine error type
//!
//! Every engine receives its storage handles explicitly; nothing here reaches
//! for process-wide connection state.

pub mod backfill;
pub mod config;
pub mod errors;
pub mod query;
pub mod stats;
pub mod write;

pub use backfill::{BackfillEngine, BackfillReport, KindOutcome, KindReport};
pub use config::EngineConfig;
pub use errors::OverlayError;
pub use query::{OverlayQueryEngine, TranslationLookup};
pub use stats::StatsAggregator;
pub use write::OverlayWriteEngine;
