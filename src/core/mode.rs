//! Timer modes and statuses.
//!
//! The mode-to-duration mapping is an exhaustive match so a new mode
//! cannot be added without deciding its duration and tick direction.

use serde::{Deserialize, Serialize};

/// Direction the timer value moves while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDirection {
    /// Value decreases toward zero; zero triggers completion.
    Down,
    /// Value increases without bound; completion is manual.
    Up,
}

/// Timer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerMode {
    /// Focused work countdown (25 minutes).
    Pomodoro,
    /// Short break countdown (5 minutes).
    ShortBreak,
    /// Long break countdown (15 minutes).
    LongBreak,
    /// Count-up stopwatch, finalized manually.
    Free,
}

impl TimerMode {
    /// Starting value in seconds for this mode.
    ///
    /// Countdown modes start at their full duration; `Free` starts at zero.
    #[must_use]
    pub const fn starting_seconds(self) -> i64 {
        match self {
            Self::Pomodoro => 25 * 60,
            Self::ShortBreak => 5 * 60,
            Self::LongBreak => 15 * 60,
            Self::Free => 0,
        }
    }

    /// Which way the value moves on each tick.
    #[must_use]
    pub const fn tick_direction(self) -> TickDirection {
        match self {
            Self::Pomodoro | Self::ShortBreak | Self::LongBreak => TickDirection::Down,
            Self::Free => TickDirection::Up,
        }
    }

    /// Parse a mode from user input.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pomodoro" | "pomo" | "p" => Some(Self::Pomodoro),
            "short" | "short-break" | "sb" => Some(Self::ShortBreak),
            "long" | "long-break" | "lb" => Some(Self::LongBreak),
            "free" | "stopwatch" | "f" => Some(Self::Free),
            _ => None,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Pomodoro => "Pomodoro",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
            Self::Free => "Free Timer",
        }
    }

    /// Check if this is a break mode.
    #[must_use]
    pub const fn is_break(self) -> bool {
        matches!(self, Self::ShortBreak | Self::LongBreak)
    }

    /// Check if starting this mode requires a selected subject.
    ///
    /// Only pomodoro work sessions are attributed to a subject up front.
    #[must_use]
    pub const fn requires_subject(self) -> bool {
        matches!(self, Self::Pomodoro)
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Timer status, orthogonal to mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    /// Not running; value is at the mode's starting point.
    Idle,
    /// Ticking once per second.
    Running,
    /// Stopped mid-run with the value preserved.
    Paused,
}

impl std::fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

/// Format a second count as MM:SS.
#[must_use]
pub fn format_clock(seconds: i64) -> String {
    let total = seconds.abs();
    let minutes = total / 60;
    let secs = total % 60;
    format!("{minutes:02}:{secs:02}")
}
