//! Persistence collaborator for recorded sessions and the profile.
//!
//! The recorder only sees the [`StudyStore`] trait; the SQLite
//! implementation below is what the application wires in.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Row};

use super::record::{Mood, SessionKind, SessionNotes, StudySession};
use super::rewards::Profile;
use crate::error::StudoroError;
use crate::features::subjects::{Subject, SubjectStorage};
use crate::storage::Database;

/// External record store consumed by the session recorder.
#[cfg_attr(test, mockall::automock)]
pub trait StudyStore {
    /// Persist a session record; returns its new ID.
    fn record_session(&self, session: &StudySession) -> Result<i64, StudoroError>;

    /// Load the gamification profile.
    fn fetch_profile(&self) -> Result<Profile, StudoroError>;

    /// Store the gamification profile.
    fn save_profile(&self, profile: &Profile) -> Result<(), StudoroError>;

    /// Load the most recent sessions, newest first.
    fn fetch_recent_sessions(&self, limit: usize) -> Result<Vec<StudySession>, StudoroError>;

    /// Load all subjects with their current aggregates, sorted by name.
    ///
    /// Consumed after a write to refresh per-subject totals.
    fn fetch_subjects(&self) -> Result<Vec<Subject>, StudoroError>;
}

/// SQLite-backed study store.
pub struct SqliteStudyStore<'a> {
    db: &'a Database,
}

impl<'a> SqliteStudyStore<'a> {
    /// Create a store over an open database.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Sessions whose start falls inside `[start, end)`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn sessions_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StudySession>, StudoroError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, subject_id, kind, started_at, ended_at, duration_minutes,
                         xp_earned, notes, mood, exercises_correct, exercises_wrong
                  FROM study_sessions
                  WHERE started_at >= ?1 AND started_at < ?2
                  ORDER BY started_at DESC",
            )
            .map_err(|e| StudoroError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([start.to_rfc3339(), end.to_rfc3339()], row_to_session)
            .map_err(|e| StudoroError::Database(format!("Failed to query sessions: {e}")))?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row.map_err(|e| StudoroError::Database(e.to_string()))?);
        }

        Ok(sessions)
    }
}

impl StudyStore for SqliteStudyStore<'_> {
    fn record_session(&self, session: &StudySession) -> Result<i64, StudoroError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO study_sessions
              (subject_id, kind, started_at, ended_at, duration_minutes,
               xp_earned, notes, mood, exercises_correct, exercises_wrong)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                session.subject_id,
                session.kind.as_str(),
                session.started_at.to_rfc3339(),
                session.ended_at.to_rfc3339(),
                session.duration_minutes,
                session.xp_earned,
                session.annotations.notes,
                session.annotations.mood.map(Mood::as_str),
                session.annotations.exercises_correct,
                session.annotations.exercises_wrong,
            ],
        )
        .map_err(|e| StudoroError::Database(format!("Failed to insert session: {e}")))?;

        let id = conn.last_insert_rowid();

        // Keep subject aggregates in step with every recorded study session.
        if let Some(subject_id) = session.subject_id {
            if session.kind.is_study() {
                conn.execute(
                    r"UPDATE subjects
                      SET total_sessions = total_sessions + 1,
                          total_minutes = total_minutes + ?1
                      WHERE id = ?2",
                    params![session.duration_minutes, subject_id],
                )
                .map_err(|e| {
                    StudoroError::Database(format!("Failed to update subject totals: {e}"))
                })?;
            }
        }

        Ok(id)
    }

    fn fetch_profile(&self) -> Result<Profile, StudoroError> {
        self.db
            .connection()
            .query_row(
                r"SELECT level, xp, xp_to_next_level, completed_today, last_session_date,
                         current_streak, longest_streak, total_sessions
                  FROM profile WHERE id = 1",
                [],
                row_to_profile,
            )
            .map_err(|e| StudoroError::Database(format!("Failed to load profile: {e}")))
    }

    fn save_profile(&self, profile: &Profile) -> Result<(), StudoroError> {
        self.db
            .connection()
            .execute(
                r"UPDATE profile SET
                  level = ?1,
                  xp = ?2,
                  xp_to_next_level = ?3,
                  completed_today = ?4,
                  last_session_date = ?5,
                  current_streak = ?6,
                  longest_streak = ?7,
                  total_sessions = ?8
                  WHERE id = 1",
                params![
                    profile.level,
                    profile.xp,
                    profile.xp_to_next_level,
                    profile.completed_today,
                    profile.last_session_date.map(|d| d.to_string()),
                    profile.current_streak,
                    profile.longest_streak,
                    profile.total_sessions,
                ],
            )
            .map_err(|e| StudoroError::Database(format!("Failed to save profile: {e}")))?;

        Ok(())
    }

    fn fetch_recent_sessions(&self, limit: usize) -> Result<Vec<StudySession>, StudoroError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, subject_id, kind, started_at, ended_at, duration_minutes,
                         xp_earned, notes, mood, exercises_correct, exercises_wrong
                  FROM study_sessions
                  ORDER BY started_at DESC
                  LIMIT ?1",
            )
            .map_err(|e| StudoroError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([limit], row_to_session)
            .map_err(|e| StudoroError::Database(format!("Failed to query sessions: {e}")))?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row.map_err(|e| StudoroError::Database(e.to_string()))?);
        }

        Ok(sessions)
    }

    fn fetch_subjects(&self) -> Result<Vec<Subject>, StudoroError> {
        SubjectStorage::new(self.db).list()
    }
}

/// Convert a database row to a `StudySession`.
fn row_to_session(row: &Row<'_>) -> Result<StudySession, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let subject_id: Option<i64> = row.get(1)?;
    let kind_str: String = row.get(2)?;
    let started_at_str: String = row.get(3)?;
    let ended_at_str: String = row.get(4)?;
    let duration_minutes: i64 = row.get(5)?;
    let xp_earned: i64 = row.get(6)?;
    let notes: Option<String> = row.get(7)?;
    let mood_str: Option<String> = row.get(8)?;
    let exercises_correct: Option<u32> = row.get(9)?;
    let exercises_wrong: Option<u32> = row.get(10)?;

    let started_at = DateTime::parse_from_rfc3339(&started_at_str)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());
    let ended_at = DateTime::parse_from_rfc3339(&ended_at_str)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(started_at);

    Ok(StudySession {
        id: Some(id),
        subject_id,
        kind: SessionKind::parse(&kind_str),
        started_at,
        ended_at,
        duration_minutes,
        xp_earned,
        annotations: SessionNotes {
            notes,
            mood: mood_str.as_deref().and_then(Mood::parse),
            exercises_correct,
            exercises_wrong,
        },
    })
}

/// Convert a database row to a `Profile`.
fn row_to_profile(row: &Row<'_>) -> Result<Profile, rusqlite::Error> {
    let last_session_date: Option<String> = row.get(4)?;

    Ok(Profile {
        level: row.get(0)?,
        xp: row.get(1)?,
        xp_to_next_level: row.get(2)?,
        completed_today: row.get(3)?,
        last_session_date: last_session_date
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        current_streak: row.get(5)?,
        longest_streak: row.get(6)?,
        total_sessions: row.get(7)?,
    })
}
