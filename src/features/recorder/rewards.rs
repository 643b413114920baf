//! Gamification: XP, levels, and streaks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::SessionKind;
use crate::config::RewardConfig;

/// XP needed to go from `level` to `level + 1`.
const fn level_threshold(level: i64) -> i64 {
    level * 100
}

/// How completed sessions convert to XP.
#[derive(Debug, Clone, Copy)]
pub struct RewardPolicy {
    /// Flat XP for a completed pomodoro.
    pub pomodoro_xp: i64,
    /// XP per minute for a finalized free session.
    pub free_xp_per_minute: i64,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            pomodoro_xp: 25,
            free_xp_per_minute: 1,
        }
    }
}

impl From<&RewardConfig> for RewardPolicy {
    fn from(config: &RewardConfig) -> Self {
        Self {
            pomodoro_xp: config.pomodoro_xp,
            free_xp_per_minute: config.free_xp_per_minute,
        }
    }
}

impl RewardPolicy {
    /// XP awarded for a session of the given kind and length.
    #[must_use]
    pub const fn xp_for(&self, kind: SessionKind, duration_minutes: i64) -> i64 {
        match kind {
            SessionKind::Pomodoro => self.pomodoro_xp,
            SessionKind::Free => self.free_xp_per_minute * duration_minutes,
            SessionKind::Break => 0,
        }
    }
}

/// The user's gamification profile.
///
/// XP only moves up (except on explicit data reset); `level` is the unique
/// integer whose cumulative `level * 100` thresholds bound the XP total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Current level, starting at 1.
    pub level: i64,
    /// Accumulated XP.
    pub xp: i64,
    /// XP required to reach the next level.
    pub xp_to_next_level: i64,
    /// Study sessions completed today.
    pub completed_today: i64,
    /// Date of the most recent qualifying session.
    pub last_session_date: Option<NaiveDate>,
    /// Consecutive days with at least one completed study session.
    pub current_streak: i64,
    /// Longest streak ever reached.
    pub longest_streak: i64,
    /// Lifetime completed study sessions.
    pub total_sessions: i64,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next_level: level_threshold(1),
            completed_today: 0,
            last_session_date: None,
            current_streak: 0,
            longest_streak: 0,
            total_sessions: 0,
        }
    }
}

impl Profile {
    /// Add XP and apply level-ups.
    ///
    /// A single large award can cross several thresholds, so this loops
    /// until the remaining XP sits below the next one.
    pub fn add_xp(&mut self, amount: i64) {
        self.xp += amount.max(0);
        while self.xp >= self.xp_to_next_level {
            self.level += 1;
            self.xp_to_next_level = level_threshold(self.level);
        }
    }

    /// Register a completed study session on the given UTC date.
    ///
    /// Updates the daily counter and the day-boundary streak: a session on
    /// the day after the last one extends the streak, a gap restarts it at
    /// 1, and repeats within the same day leave it unchanged.
    pub fn register_completion(&mut self, today: NaiveDate) {
        match self.last_session_date {
            Some(last) if last == today => {
                self.completed_today += 1;
            }
            Some(last) if today.pred_opt() == Some(last) => {
                self.completed_today = 1;
                self.current_streak += 1;
            }
            _ => {
                self.completed_today = 1;
                self.current_streak = 1;
            }
        }

        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_session_date = Some(today);
        self.total_sessions += 1;
    }

    /// Daily counter as of `today`, zero if the last session was earlier.
    #[must_use]
    pub fn completed_on(&self, today: NaiveDate) -> i64 {
        if self.last_session_date == Some(today) {
            self.completed_today
        } else {
            0
        }
    }

    /// Streak as of `today`: broken (0) once a full day has passed without
    /// a session.
    #[must_use]
    pub fn streak_on(&self, today: NaiveDate) -> i64 {
        match self.last_session_date {
            Some(last) if last == today || today.pred_opt() == Some(last) => self.current_streak,
            _ => 0,
        }
    }
}
