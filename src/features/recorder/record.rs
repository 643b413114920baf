//! Recorded study sessions.
//!
//! A `StudySession` is created once per completed (or manually finalized)
//! timer run and is immutable thereafter.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::core::TimerMode;

/// Kind of a recorded session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Completed pomodoro work interval.
    Pomodoro,
    /// Manually finalized free (count-up) session.
    Free,
    /// Completed break interval.
    Break,
}

impl SessionKind {
    /// The kind recorded for a run in the given timer mode.
    #[must_use]
    pub const fn from_mode(mode: TimerMode) -> Self {
        match mode {
            TimerMode::Pomodoro => Self::Pomodoro,
            TimerMode::Free => Self::Free,
            TimerMode::ShortBreak | TimerMode::LongBreak => Self::Break,
        }
    }

    /// Check if sessions of this kind count as study time.
    ///
    /// Breaks are recorded but never earn XP or advance the streak.
    #[must_use]
    pub const fn is_study(self) -> bool {
        matches!(self, Self::Pomodoro | Self::Free)
    }

    /// Display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Pomodoro => "Pomodoro",
            Self::Free => "Free Timer",
            Self::Break => "Break",
        }
    }

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pomodoro => "pomodoro",
            Self::Free => "free",
            Self::Break => "break",
        }
    }

    /// Parse the storage representation; unknown strings fall back to
    /// pomodoro.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "free" => Self::Free,
            "break" => Self::Break,
            _ => Self::Pomodoro,
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How the study session felt, captured when finalizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Great focus.
    Excellent,
    /// Solid session.
    Good,
    /// Neither here nor there.
    Neutral,
    /// Low energy.
    Tired,
    /// Fought the material.
    Frustrated,
}

impl Mood {
    /// Parse a mood from user input.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "excellent" => Some(Self::Excellent),
            "good" => Some(Self::Good),
            "neutral" => Some(Self::Neutral),
            "tired" => Some(Self::Tired),
            "frustrated" => Some(Self::Frustrated),
            _ => None,
        }
    }

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Neutral => "neutral",
            Self::Tired => "tired",
            Self::Frustrated => "frustrated",
        }
    }
}

/// Optional annotations attached when a session is finalized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionNotes {
    /// Free-form notes.
    pub notes: Option<String>,
    /// Session mood.
    pub mood: Option<Mood>,
    /// Exercises answered correctly, if the session involved exercises.
    pub exercises_correct: Option<u32>,
    /// Exercises answered wrongly.
    pub exercises_wrong: Option<u32>,
}

/// A recorded study session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySession {
    /// Database ID (None if not yet persisted).
    pub id: Option<i64>,
    /// Subject the session was attributed to.
    pub subject_id: Option<i64>,
    /// Session kind.
    pub kind: SessionKind,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run ended.
    pub ended_at: DateTime<Utc>,
    /// Duration in whole minutes, never below 1.
    pub duration_minutes: i64,
    /// XP earned by this session.
    pub xp_earned: i64,
    /// Annotations.
    #[serde(flatten)]
    pub annotations: SessionNotes,
}

impl StudySession {
    /// Get start time in the local timezone.
    #[must_use]
    pub fn started_at_local(&self) -> DateTime<Local> {
        self.started_at.with_timezone(&Local)
    }
}

/// Round a run's wall-clock length to whole minutes, floored at 1.
///
/// A run that ended almost immediately still records one minute so no
/// zero-duration rows exist.
#[must_use]
pub fn duration_minutes(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> i64 {
    let ms = (ended_at - started_at).num_milliseconds();
    #[allow(clippy::cast_possible_truncation)]
    let rounded = (ms as f64 / 60_000.0).round() as i64;
    rounded.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).single().unwrap()
    }

    #[test]
    fn test_kind_from_mode() {
        assert_eq!(SessionKind::from_mode(TimerMode::Pomodoro), SessionKind::Pomodoro);
        assert_eq!(SessionKind::from_mode(TimerMode::Free), SessionKind::Free);
        assert_eq!(SessionKind::from_mode(TimerMode::ShortBreak), SessionKind::Break);
        assert_eq!(SessionKind::from_mode(TimerMode::LongBreak), SessionKind::Break);
    }

    #[test]
    fn test_breaks_are_not_study() {
        assert!(SessionKind::Pomodoro.is_study());
        assert!(SessionKind::Free.is_study());
        assert!(!SessionKind::Break.is_study());
    }

    #[test]
    fn test_duration_rounds_to_minutes() {
        // 125 000 ms rounds to 2 minutes.
        let end = t0() + Duration::milliseconds(125_000);
        assert_eq!(duration_minutes(t0(), end), 2);

        // 25 minutes exactly.
        let end = t0() + Duration::minutes(25);
        assert_eq!(duration_minutes(t0(), end), 25);

        // 29 seconds rounds down to zero but floors at 1.
        let end = t0() + Duration::seconds(29);
        assert_eq!(duration_minutes(t0(), end), 1);

        // Instant finalize still records a minute.
        assert_eq!(duration_minutes(t0(), t0()), 1);
    }

    #[test]
    fn test_mood_parse() {
        assert_eq!(Mood::parse("good"), Some(Mood::Good));
        assert_eq!(Mood::parse("TIRED"), Some(Mood::Tired));
        assert_eq!(Mood::parse("meh"), None);
    }

    #[test]
    fn test_kind_storage_round_trip() {
        for kind in [SessionKind::Pomodoro, SessionKind::Free, SessionKind::Break] {
            assert_eq!(SessionKind::parse(kind.as_str()), kind);
        }
    }
}
