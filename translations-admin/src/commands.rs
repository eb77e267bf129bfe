//! Execution and output formatting of the administrative commands.

use std::fmt::Write as _;

use tokio::sync::broadcast;
use tracing::info;
use translations_engine::{BackfillReport, KindOutcome};
use translations_repository::TranslationRepository;
use translations_shared::{EntityKind, LanguageStats};

use crate::cli::Command;
use crate::config::Dependencies;
use crate::errors::AdminError;

/// Runs one command and returns the text to print.
pub async fn execute(
    command: Command,
    json: bool,
    deps: &Dependencies,
    shutdown: &mut broadcast::Receiver<()>,
) -> Result<String, AdminError> {
    match command {
        Command::Init => {
            deps.repository.migrate().await?;
            let created = deps.repository.check_tables_created().await?;
            info!(created, "Storage initialized");
            if json {
                Ok(serde_json::json!({ "initialized": created }).to_string())
            } else {
                Ok("Translations table is ready".to_string())
            }
        }
        Command::Backfill { mode, kinds } => {
            let kinds: Vec<EntityKind> = kinds.into_iter().map(EntityKind::from).collect();
            let report = deps.backfill.run(mode.into(), &kinds, shutdown).await;
            if json {
                Ok(serde_json::to_string_pretty(&report)?)
            } else {
                Ok(format_report(&report))
            }
        }
        Command::Stats => {
            let stats = deps.stats.get_stats().await?;
            if json {
                Ok(serde_json::to_string_pretty(&stats)?)
            } else {
                Ok(format_stats(&stats))
            }
        }
        Command::Languages => {
            let languages = deps.stats.get_available_languages().await;
            if json {
                Ok(serde_json::to_string(&languages)?)
            } else {
                Ok(languages.join("\n"))
            }
        }
    }
}

/// One line per language: code, total, completed and pending counts.
pub fn format_stats(stats: &[LanguageStats]) -> String {
    if stats.is_empty() {
        return "No translations stored".to_string();
    }
    let mut out = format!("{:<16} {:>10} {:>10} {:>10}", "language", "total", "completed", "pending");
    for language in stats {
        let _ = write!(
            out,
            "\n{:<16} {:>10} {:>10} {:>10}",
            language.language_code,
            language.total,
            language.completed,
            language.pending()
        );
    }
    out
}

pub fn format_report(report: &BackfillReport) -> String {
    let mut out = String::new();
    for kind in &report.kinds {
        let status = match &kind.outcome {
            KindOutcome::Seeded => "seeded".to_string(),
            KindOutcome::Failed(reason) => format!("failed: {reason}"),
            KindOutcome::Skipped => "skipped".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<10} rows={} written={} {}",
            kind.kind.as_str(),
            kind.records_read,
            kind.entries_written,
            status
        );
    }
    let _ = write!(
        out,
        "total written={}{}",
        report.total_entries_written(),
        if report.cancelled { " (cancelled)" } else { "" }
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use translations_engine::KindReport;
    use translations_shared::SeedMode;

    #[test]
    fn test_format_stats() {
        let stats = vec![
            LanguageStats {
                language_code: "en".to_string(),
                total: 3,
                completed: 1,
            },
            LanguageStats {
                language_code: "sq".to_string(),
                total: 3,
                completed: 3,
            },
        ];
        let text = format_stats(&stats);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("en"));
        assert!(lines[1].trim_end().ends_with('2'));
        assert!(lines[2].trim_end().ends_with('0'));

        assert_eq!(format_stats(&[]), "No translations stored");
    }

    #[test]
    fn test_format_report() {
        let report = BackfillReport {
            mode: SeedMode::IfAbsent,
            kinds: vec![
                KindReport {
                    kind: EntityKind::Employees,
                    records_read: 2,
                    entries_written: 6,
                    outcome: KindOutcome::Seeded,
                },
                KindReport {
                    kind: EntityKind::Contracts,
                    records_read: 0,
                    entries_written: 0,
                    outcome: KindOutcome::Failed("relation \"contracts\" does not exist".to_string()),
                },
            ],
            cancelled: true,
        };
        let text = format_report(&report);
        assert!(text.contains("employees  rows=2 written=6 seeded"));
        assert!(text.contains("failed: relation \"contracts\" does not exist"));
        assert!(text.ends_with("total written=6 (cancelled)"));
    }
}
