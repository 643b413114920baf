//! JSON output formatting for studoro.

use serde::Serialize;
use serde_json::json;

use crate::core::TimerMachine;
use crate::error::StudoroError;
use crate::features::recorder::{Profile, StudySession};
use crate::features::stats::StatsReport;
use crate::features::subjects::Subject;
use crate::features::tasks::Task;

/// Format the timer state as JSON
///
/// # Errors
///
/// Returns `StudoroError::Parse` if JSON serialization fails.
pub fn format_timer_json(machine: &TimerMachine) -> Result<String, StudoroError> {
    let output = json!({
        "mode": machine.mode(),
        "status": machine.status(),
        "value_seconds": machine.value_seconds(),
        "display": machine.format_value(),
        "session_number": machine.session_number(),
        "subject_id": machine.subject_id(),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format sessions as JSON
///
/// # Errors
///
/// Returns `StudoroError::Parse` if JSON serialization fails.
pub fn format_sessions_json(sessions: &[StudySession]) -> Result<String, StudoroError> {
    let output = json!({
        "count": sessions.len(),
        "items": sessions
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format subjects as JSON
///
/// # Errors
///
/// Returns `StudoroError::Parse` if JSON serialization fails.
pub fn format_subjects_json(subjects: &[Subject]) -> Result<String, StudoroError> {
    let output = json!({
        "count": subjects.len(),
        "items": subjects
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format tasks as JSON
///
/// # Errors
///
/// Returns `StudoroError::Parse` if JSON serialization fails.
pub fn format_tasks_json(tasks: &[Task]) -> Result<String, StudoroError> {
    let output = json!({
        "count": tasks.len(),
        "items": tasks
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the profile as JSON
///
/// # Errors
///
/// Returns `StudoroError::Parse` if JSON serialization fails.
pub fn format_profile_json(profile: &Profile) -> Result<String, StudoroError> {
    Ok(serde_json::to_string_pretty(profile)?)
}

/// Format a stats report as JSON
///
/// # Errors
///
/// Returns `StudoroError::Parse` if JSON serialization fails.
pub fn format_report_json(report: &StatsReport) -> Result<String, StudoroError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Serialize any value as pretty JSON
///
/// # Errors
///
/// Returns `StudoroError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, StudoroError> {
    Ok(serde_json::to_string_pretty(value)?)
}
