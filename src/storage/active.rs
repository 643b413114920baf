//! Persistence for the single active timer.
//!
//! The CLI surface snapshots the timer machine after every command and
//! restores it on the next invocation, together with the timestamp of the
//! last applied tick so elapsed wall seconds can be caught up.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::core::{TimerMode, TimerSnapshot, TimerStatus};
use crate::error::StudoroError;
use crate::storage::Database;

/// Storage for the active timer snapshot.
pub struct ActiveTimerStorage<'a> {
    db: &'a Database,
}

impl<'a> ActiveTimerStorage<'a> {
    /// Create storage over an open database.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Save the snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save(
        &self,
        snapshot: &TimerSnapshot,
        last_tick_at: DateTime<Utc>,
    ) -> Result<(), StudoroError> {
        self.db
            .connection()
            .execute(
                r"INSERT INTO active_timer
                  (id, mode, status, value_seconds, session_number, started_at, subject_id, last_tick_at)
                  VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)
                  ON CONFLICT(id) DO UPDATE SET
                    mode = excluded.mode,
                    status = excluded.status,
                    value_seconds = excluded.value_seconds,
                    session_number = excluded.session_number,
                    started_at = excluded.started_at,
                    subject_id = excluded.subject_id,
                    last_tick_at = excluded.last_tick_at",
                params![
                    mode_to_string(snapshot.mode),
                    status_to_string(snapshot.status),
                    snapshot.value_seconds,
                    snapshot.session_number,
                    snapshot.started_at.map(|t| t.to_rfc3339()),
                    snapshot.subject_id,
                    last_tick_at.to_rfc3339(),
                ],
            )
            .map_err(|e| StudoroError::Database(format!("Failed to save timer state: {e}")))?;

        Ok(())
    }

    /// Load the snapshot and the last-tick timestamp, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn load(&self) -> Result<Option<(TimerSnapshot, DateTime<Utc>)>, StudoroError> {
        let result = self
            .db
            .connection()
            .query_row(
                r"SELECT mode, status, value_seconds, session_number,
                         started_at, subject_id, last_tick_at
                  FROM active_timer WHERE id = 1",
                [],
                row_to_snapshot,
            );

        match result {
            Ok(pair) => Ok(Some(pair)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StudoroError::Database(format!(
                "Failed to load timer state: {e}"
            ))),
        }
    }

    /// Remove the saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn clear(&self) -> Result<(), StudoroError> {
        self.db
            .connection()
            .execute("DELETE FROM active_timer WHERE id = 1", [])
            .map_err(|e| StudoroError::Database(format!("Failed to clear timer state: {e}")))?;
        Ok(())
    }
}

fn row_to_snapshot(row: &Row<'_>) -> Result<(TimerSnapshot, DateTime<Utc>), rusqlite::Error> {
    let mode_str: String = row.get(0)?;
    let status_str: String = row.get(1)?;
    let value_seconds: i64 = row.get(2)?;
    let session_number: u32 = row.get(3)?;
    let started_at_str: Option<String> = row.get(4)?;
    let subject_id: Option<i64> = row.get(5)?;
    let last_tick_str: String = row.get(6)?;

    let started_at = started_at_str.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .ok()
    });

    let last_tick_at = DateTime::parse_from_rfc3339(&last_tick_str)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Ok((
        TimerSnapshot {
            mode: string_to_mode(&mode_str),
            status: string_to_status(&status_str),
            value_seconds,
            session_number,
            started_at,
            subject_id,
        },
        last_tick_at,
    ))
}

fn mode_to_string(mode: TimerMode) -> &'static str {
    match mode {
        TimerMode::Pomodoro => "pomodoro",
        TimerMode::ShortBreak => "short_break",
        TimerMode::LongBreak => "long_break",
        TimerMode::Free => "free",
    }
}

fn string_to_mode(s: &str) -> TimerMode {
    match s {
        "short_break" => TimerMode::ShortBreak,
        "long_break" => TimerMode::LongBreak,
        "free" => TimerMode::Free,
        _ => TimerMode::Pomodoro,
    }
}

fn status_to_string(status: TimerStatus) -> &'static str {
    match status {
        TimerStatus::Idle => "idle",
        TimerStatus::Running => "running",
        TimerStatus::Paused => "paused",
    }
}

fn string_to_status(s: &str) -> TimerStatus {
    match s {
        "running" => TimerStatus::Running,
        "paused" => TimerStatus::Paused,
        _ => TimerStatus::Idle,
    }
}
