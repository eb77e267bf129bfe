//! Translations Admin Library
//!
//! Command-line definitions, dependency wiring and command execution for the
//! administrative trigger of the translation overlay store.

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;

pub use cli::{Cli, Command};
pub use config::{DatabaseConfig, Dependencies};
pub use errors::AdminError;
