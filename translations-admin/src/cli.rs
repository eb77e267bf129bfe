//! Command-line interface of the administrative binary.

use clap::{Parser, Subcommand, ValueEnum};
use translations_shared::{EntityKind, SeedMode};

#[derive(Debug, Parser)]
#[command(name = "translations-admin")]
#[command(version)]
#[command(about = "Initialize, backfill and inspect the translation overlay store")]
pub struct Cli {
    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the translations table and indexes
    Init,

    /// Seed overlay entries from the entity tables
    Backfill {
        /// Keep saved translations (if-absent) or replace them (overwrite)
        #[arg(short, long, value_enum, default_value = "if-absent")]
        mode: ModeArg,

        /// Entity kinds to seed (default: all)
        #[arg(short, long = "kind", value_enum)]
        kinds: Vec<KindArg>,
    },

    /// Print per-language totals and completed counts
    Stats,

    /// Print the languages present in the store
    Languages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    IfAbsent,
    Overwrite,
}

impl From<ModeArg> for SeedMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::IfAbsent => SeedMode::IfAbsent,
            ModeArg::Overwrite => SeedMode::Overwrite,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Employees,
    Contracts,
    Tasks,
}

impl From<KindArg> for EntityKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Employees => EntityKind::Employees,
            KindArg::Contracts => EntityKind::Contracts,
            KindArg::Tasks => EntityKind::Tasks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_backfill_defaults_to_if_absent_for_all_kinds() {
        let cli = Cli::try_parse_from(["translations-admin", "backfill"]).unwrap();
        match cli.command {
            Command::Backfill { mode, kinds } => {
                assert_eq!(SeedMode::from(mode), SeedMode::IfAbsent);
                assert!(kinds.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_backfill_parses_mode_and_kinds() {
        let cli = Cli::try_parse_from([
            "translations-admin",
            "backfill",
            "--mode",
            "overwrite",
            "--kind",
            "tasks",
            "-k",
            "employees",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Backfill { mode, kinds } => {
                assert_eq!(mode, ModeArg::Overwrite);
                let kinds: Vec<EntityKind> = kinds.into_iter().map(EntityKind::from).collect();
                assert_eq!(kinds, vec![EntityKind::Tasks, EntityKind::Employees]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["translations-admin", "backfill", "--kind", "invoices"]).is_err());
    }
}
