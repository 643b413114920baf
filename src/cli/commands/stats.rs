//! Stats command implementation.

use crate::cli::args::{OutputFormat, StatsCommands};
use crate::config::Config;
use crate::error::StudoroError;
use crate::features::recorder::{SqliteStudyStore, StudyStore};
use crate::features::stats::{ReportPeriod, StatsReport};
use crate::features::subjects::SubjectStorage;
use crate::output::{format_profile, format_report, format_sessions};
use crate::storage::Database;

/// Execute stats subcommands.
pub fn stats(
    db: &Database,
    config: &Config,
    cmd: StatsCommands,
    format: OutputFormat,
) -> Result<String, StudoroError> {
    let store = SqliteStudyStore::new(db);
    let subjects = SubjectStorage::new(db);

    match cmd {
        StatsCommands::Summary => {
            let profile = store.fetch_profile()?;
            format_profile(&profile, format)
        }

        StatsCommands::Recent { limit } => {
            let limit = limit.unwrap_or(config.general.recent_sessions);
            let sessions = store.fetch_recent_sessions(limit)?;
            format_sessions(
                &sessions,
                |id| subjects.get(id).ok().map(|s| s.display_name()),
                format,
            )
        }

        StatsCommands::Report { period } => {
            let period = ReportPeriod::parse(&period);
            let report = StatsReport::generate(&store, &subjects, period)?;
            format_report(&report, format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_on_fresh_database() {
        let db = Database::open_in_memory().unwrap();
        let output = stats(&db, &Config::default(), StatsCommands::Summary, OutputFormat::Json).unwrap();
        assert!(output.contains("\"level\": 1"));
        assert!(output.contains("\"xp\": 0"));
    }

    #[test]
    fn test_recent_on_fresh_database() {
        let db = Database::open_in_memory().unwrap();
        let output = stats(
            &db,
            &Config::default(),
            StatsCommands::Recent { limit: None },
            OutputFormat::Pretty,
        )
        .unwrap();
        assert!(output.contains("No sessions"));
    }

    #[test]
    fn test_report_renders() {
        let db = Database::open_in_memory().unwrap();
        let output = stats(
            &db,
            &Config::default(),
            StatsCommands::Report {
                period: "week".to_string(),
            },
            OutputFormat::Pretty,
        )
        .unwrap();
        assert!(output.contains("Study Report: This Week"));
    }
}
