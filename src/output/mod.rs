//! Output formatting for studoro.
//!
//! This module provides formatters for displaying timer and study data in
//! pretty or JSON form.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::core::TimerMachine;
use crate::error::StudoroError;
use crate::features::recorder::{Profile, StudySession};
use crate::features::stats::StatsReport;
use crate::features::subjects::Subject;
use crate::features::tasks::Task;

pub use json::*;
pub use pretty::*;

/// Format the timer state based on output format
///
/// # Errors
///
/// Returns `StudoroError::Parse` if JSON serialization fails.
pub fn format_timer(
    machine: &TimerMachine,
    subject: Option<&Subject>,
    format: OutputFormat,
) -> Result<String, StudoroError> {
    match format {
        OutputFormat::Pretty => Ok(format_timer_pretty(machine, subject)),
        OutputFormat::Json => format_timer_json(machine),
    }
}

/// Format sessions based on output format
///
/// # Errors
///
/// Returns `StudoroError::Parse` if JSON serialization fails.
pub fn format_sessions(
    sessions: &[StudySession],
    subject_name: impl Fn(i64) -> Option<String>,
    format: OutputFormat,
) -> Result<String, StudoroError> {
    match format {
        OutputFormat::Pretty => Ok(format_sessions_pretty(sessions, subject_name)),
        OutputFormat::Json => format_sessions_json(sessions),
    }
}

/// Format subjects based on output format
///
/// # Errors
///
/// Returns `StudoroError::Parse` if JSON serialization fails.
pub fn format_subjects(subjects: &[Subject], format: OutputFormat) -> Result<String, StudoroError> {
    match format {
        OutputFormat::Pretty => Ok(format_subjects_pretty(subjects)),
        OutputFormat::Json => format_subjects_json(subjects),
    }
}

/// Format tasks based on output format
///
/// # Errors
///
/// Returns `StudoroError::Parse` if JSON serialization fails.
pub fn format_tasks(
    tasks: &[Task],
    subject_name: impl Fn(i64) -> Option<String>,
    format: OutputFormat,
) -> Result<String, StudoroError> {
    match format {
        OutputFormat::Pretty => Ok(format_tasks_pretty(tasks, subject_name)),
        OutputFormat::Json => format_tasks_json(tasks),
    }
}

/// Format the profile based on output format
///
/// # Errors
///
/// Returns `StudoroError::Parse` if JSON serialization fails.
pub fn format_profile(profile: &Profile, format: OutputFormat) -> Result<String, StudoroError> {
    match format {
        OutputFormat::Pretty => Ok(format_profile_pretty(profile)),
        OutputFormat::Json => format_profile_json(profile),
    }
}

/// Format a stats report based on output format
///
/// # Errors
///
/// Returns `StudoroError::Parse` if JSON serialization fails.
pub fn format_report(report: &StatsReport, format: OutputFormat) -> Result<String, StudoroError> {
    match format {
        OutputFormat::Pretty => Ok(report.format()),
        OutputFormat::Json => format_report_json(report),
    }
}
