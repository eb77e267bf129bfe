//! Configuration module for the administrative binary.
//! Reads connection settings from the environment and wires the engines.
mod dependencies;

pub use dependencies::{DatabaseConfig, Dependencies};
