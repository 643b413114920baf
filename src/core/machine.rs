//! The timer state machine.
//!
//! Owns the countdown/count-up value, the current mode, and the
//! running/paused/idle status. All mutation goes through the transition
//! methods; the surrounding shell (CLI or TUI) owns the single instance
//! and drives ticks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mode::{format_clock, TickDirection, TimerMode, TimerStatus};
use crate::error::StudoroError;

/// Number of completed pomodoros before a long break.
const SESSIONS_UNTIL_LONG_BREAK: u32 = 4;

/// A finished timer run, ready to be recorded.
///
/// Produced at most once per run: the machine surrenders its session-start
/// marker when this is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRun {
    /// Mode the run was in.
    pub mode: TimerMode,
    /// Subject selected for the run, if any.
    pub subject_id: Option<i64>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run ended.
    pub ended_at: DateTime<Utc>,
}

/// Serializable snapshot of the machine, used by the CLI surface to carry
/// the single active timer between process invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Current mode.
    pub mode: TimerMode,
    /// Current status.
    pub status: TimerStatus,
    /// Remaining (countdown) or elapsed (free) seconds.
    pub value_seconds: i64,
    /// 1-based pomodoro cycle position.
    pub session_number: u32,
    /// Session-start timestamp; `None` once completed or reset.
    pub started_at: Option<DateTime<Utc>>,
    /// Selected subject.
    pub subject_id: Option<i64>,
}

/// The timer state machine.
#[derive(Debug, Clone)]
pub struct TimerMachine {
    mode: TimerMode,
    status: TimerStatus,
    value_seconds: i64,
    session_number: u32,
    started_at: Option<DateTime<Utc>>,
    subject_id: Option<i64>,
}

impl Default for TimerMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerMachine {
    /// Create a fresh machine: pomodoro mode, idle, session 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: TimerMode::Pomodoro,
            status: TimerStatus::Idle,
            value_seconds: TimerMode::Pomodoro.starting_seconds(),
            session_number: 1,
            started_at: None,
            subject_id: None,
        }
    }

    /// Create a machine idle in the given mode.
    #[must_use]
    pub const fn with_mode(mode: TimerMode) -> Self {
        Self {
            mode,
            status: TimerStatus::Idle,
            value_seconds: mode.starting_seconds(),
            session_number: 1,
            started_at: None,
            subject_id: None,
        }
    }

    /// Restore a machine from a snapshot.
    #[must_use]
    pub const fn from_snapshot(snapshot: TimerSnapshot) -> Self {
        Self {
            mode: snapshot.mode,
            status: snapshot.status,
            value_seconds: snapshot.value_seconds,
            session_number: snapshot.session_number,
            started_at: snapshot.started_at,
            subject_id: snapshot.subject_id,
        }
    }

    /// Snapshot the machine state.
    #[must_use]
    pub const fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            status: self.status,
            value_seconds: self.value_seconds,
            session_number: self.session_number,
            started_at: self.started_at,
            subject_id: self.subject_id,
        }
    }

    /// Select (or clear) the subject for upcoming pomodoro runs.
    pub fn select_subject(&mut self, subject_id: Option<i64>) {
        self.subject_id = subject_id;
    }

    /// Start or resume the timer.
    ///
    /// Records the session-start timestamp only on the idle-to-running
    /// edge. Starting while already running is a no-op, so a driver cannot
    /// end up with duplicate tick schedules.
    ///
    /// # Errors
    ///
    /// Returns `StudoroError::Validation` (state unchanged) when the mode
    /// requires a subject, subjects exist, and none is selected.
    pub fn start(
        &mut self,
        now: DateTime<Utc>,
        have_subjects: bool,
    ) -> Result<(), StudoroError> {
        if self.status == TimerStatus::Running {
            return Ok(());
        }

        if self.mode.requires_subject() && have_subjects && self.subject_id.is_none() {
            return Err(StudoroError::Validation(
                "Select a subject before starting a pomodoro".to_string(),
            ));
        }

        if self.status == TimerStatus::Idle {
            self.started_at = Some(now);
        }
        self.status = TimerStatus::Running;
        Ok(())
    }

    /// Pause a running timer, preserving the current value.
    pub fn pause(&mut self) {
        if self.status == TimerStatus::Running {
            self.status = TimerStatus::Paused;
        }
    }

    /// Reset to idle at the mode's canonical starting value.
    ///
    /// Clears the session-start marker; any unsaved progress is discarded.
    /// Idempotent.
    pub fn reset(&mut self) {
        self.status = TimerStatus::Idle;
        self.value_seconds = self.mode.starting_seconds();
        self.started_at = None;
    }

    /// Apply one tick (one wall-clock second).
    ///
    /// Returns true when a countdown just reached zero; the machine is
    /// then idle and the caller should finalize via [`Self::finish`].
    /// Free mode counts up indefinitely and never completes automatically.
    pub fn tick(&mut self) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }

        match self.mode.tick_direction() {
            TickDirection::Down => {
                if self.value_seconds > 0 {
                    self.value_seconds -= 1;
                }
                if self.value_seconds == 0 {
                    self.status = TimerStatus::Idle;
                    true
                } else {
                    false
                }
            }
            TickDirection::Up => {
                self.value_seconds += 1;
                false
            }
        }
    }

    /// Apply up to `seconds` ticks, stopping at the completion boundary.
    ///
    /// This is the wall-clock catch-up used by the CLI surface, which
    /// reloads the machine between processes. Returns true if a countdown
    /// completed during the catch-up.
    pub fn advance(&mut self, seconds: i64) -> bool {
        for _ in 0..seconds.max(0) {
            if self.tick() {
                return true;
            }
        }
        false
    }

    /// Switch mode: reset to idle and load the new mode's starting value.
    pub fn set_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.reset();
    }

    /// Reset the timer and advance to the next mode in the cycle.
    ///
    /// Does not record a session or count toward the pomodoro cycle.
    pub fn skip(&mut self) {
        let next = self.next_mode();
        self.set_mode(next);
    }

    /// The mode that follows the current one.
    ///
    /// Pomodoros advance to a short break, or a long break every
    /// 4th session; breaks advance back to pomodoro; the free timer is
    /// outside the cycle and stays put.
    #[must_use]
    pub const fn next_mode(&self) -> TimerMode {
        match self.mode {
            TimerMode::Pomodoro => {
                if self.session_number % SESSIONS_UNTIL_LONG_BREAK == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Pomodoro,
            TimerMode::Free => TimerMode::Free,
        }
    }

    /// Finalize the current run and advance the mode.
    ///
    /// Returns the completed run, or `None` if there is no session-start
    /// marker (never started, already finalized, or reset) — this is the
    /// at-most-once guard for session recording. The marker is taken
    /// before anything else, so a late duplicate call cannot produce a
    /// second record even if persistence of the first is still in flight.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Option<CompletedRun> {
        let started_at = self.started_at.take()?;

        let run = CompletedRun {
            mode: self.mode,
            subject_id: self.subject_id,
            started_at,
            ended_at: now,
        };

        let next = self.next_mode();
        if self.mode == TimerMode::Pomodoro {
            self.session_number += 1;
        }
        self.set_mode(next);

        Some(run)
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> TimerStatus {
        self.status
    }

    /// Remaining (countdown) or elapsed (free) seconds.
    #[must_use]
    pub const fn value_seconds(&self) -> i64 {
        self.value_seconds
    }

    /// 1-based position in the pomodoro cycle.
    #[must_use]
    pub const fn session_number(&self) -> u32 {
        self.session_number
    }

    /// Selected subject.
    #[must_use]
    pub const fn subject_id(&self) -> Option<i64> {
        self.subject_id
    }

    /// Check if the timer is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Progress through a countdown (0.0 - 1.0). Always 0.0 for free mode.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        let total = self.mode.starting_seconds();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.value_seconds as f64 / total as f64)
    }

    /// Format the current value as MM:SS.
    #[must_use]
    pub fn format_value(&self) -> String {
        format_clock(self.value_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).single().unwrap()
    }

    #[test]
    fn test_new_machine_is_idle_pomodoro() {
        let machine = TimerMachine::new();
        assert_eq!(machine.mode(), TimerMode::Pomodoro);
        assert_eq!(machine.status(), TimerStatus::Idle);
        assert_eq!(machine.value_seconds(), 1500);
        assert_eq!(machine.session_number(), 1);
    }

    #[test]
    fn test_countdown_runs_to_completion_exactly_once() {
        let mut machine = TimerMachine::new();
        machine.start(t0(), false).unwrap();

        let mut completions = 0;
        for _ in 0..1500 {
            if machine.tick() {
                completions += 1;
            }
        }

        assert_eq!(completions, 1);
        assert_eq!(machine.value_seconds(), 0);
        assert_eq!(machine.status(), TimerStatus::Idle);
        // Session 1 of 4 advances to a short break.
        assert_eq!(machine.next_mode(), TimerMode::ShortBreak);

        // Further ticks do nothing once idle.
        assert!(!machine.tick());
        assert_eq!(machine.value_seconds(), 0);
    }

    #[test]
    fn test_free_mode_counts_up_without_completing() {
        let mut machine = TimerMachine::with_mode(TimerMode::Free);
        machine.start(t0(), true).unwrap();

        for _ in 0..125 {
            assert!(!machine.tick());
        }
        assert_eq!(machine.value_seconds(), 125);
        assert_eq!(machine.status(), TimerStatus::Running);
    }

    #[test]
    fn test_start_requires_subject_for_pomodoro() {
        let mut machine = TimerMachine::new();

        let err = machine.start(t0(), true).unwrap_err();
        assert!(matches!(err, StudoroError::Validation(_)));
        // Rejection leaves the machine untouched.
        assert_eq!(machine.status(), TimerStatus::Idle);
        assert!(machine.snapshot().started_at.is_none());

        machine.select_subject(Some(7));
        machine.start(t0(), true).unwrap();
        assert_eq!(machine.status(), TimerStatus::Running);
    }

    #[test]
    fn test_start_without_subjects_is_allowed() {
        let mut machine = TimerMachine::new();
        machine.start(t0(), false).unwrap();
        assert_eq!(machine.status(), TimerStatus::Running);
    }

    #[test]
    fn test_breaks_never_require_subject() {
        let mut machine = TimerMachine::with_mode(TimerMode::ShortBreak);
        machine.start(t0(), true).unwrap();
        assert_eq!(machine.status(), TimerStatus::Running);
    }

    #[test]
    fn test_start_twice_is_noop() {
        let mut machine = TimerMachine::new();
        machine.start(t0(), false).unwrap();
        machine.tick();

        let later = t0() + chrono::Duration::seconds(30);
        machine.start(later, false).unwrap();

        // Second start neither resets the value nor moves the start marker.
        assert_eq!(machine.value_seconds(), 1499);
        assert_eq!(machine.snapshot().started_at, Some(t0()));
    }

    #[test]
    fn test_pause_preserves_value_and_resume_keeps_marker() {
        let mut machine = TimerMachine::new();
        machine.start(t0(), false).unwrap();
        for _ in 0..10 {
            machine.tick();
        }

        machine.pause();
        assert_eq!(machine.status(), TimerStatus::Paused);
        assert_eq!(machine.value_seconds(), 1490);
        assert!(!machine.tick());
        assert_eq!(machine.value_seconds(), 1490);

        // Resuming from paused keeps the original start timestamp.
        let later = t0() + chrono::Duration::seconds(60);
        machine.start(later, false).unwrap();
        assert_eq!(machine.snapshot().started_at, Some(t0()));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut machine = TimerMachine::new();
        machine.start(t0(), false).unwrap();
        for _ in 0..100 {
            machine.tick();
        }

        machine.reset();
        assert_eq!(machine.status(), TimerStatus::Idle);
        assert_eq!(machine.value_seconds(), 1500);
        assert!(machine.snapshot().started_at.is_none());

        let first = machine.snapshot();
        machine.reset();
        let second = machine.snapshot();
        assert_eq!(first.status, second.status);
        assert_eq!(first.value_seconds, second.value_seconds);
        assert_eq!(first.started_at, second.started_at);
    }

    #[test]
    fn test_set_mode_discards_progress() {
        let mut machine = TimerMachine::new();
        machine.start(t0(), false).unwrap();
        for _ in 0..200 {
            machine.tick();
        }

        machine.set_mode(TimerMode::ShortBreak);
        assert_eq!(machine.mode(), TimerMode::ShortBreak);
        assert_eq!(machine.status(), TimerStatus::Idle);
        assert_eq!(machine.value_seconds(), 300);
        assert!(machine.snapshot().started_at.is_none());
    }

    #[test]
    fn test_skip_cycles_breaks_back_to_pomodoro() {
        let mut machine = TimerMachine::with_mode(TimerMode::ShortBreak);
        machine.skip();
        assert_eq!(machine.mode(), TimerMode::Pomodoro);

        let mut machine = TimerMachine::with_mode(TimerMode::LongBreak);
        machine.skip();
        assert_eq!(machine.mode(), TimerMode::Pomodoro);
    }

    #[test]
    fn test_skip_from_free_stays_free() {
        let mut machine = TimerMachine::with_mode(TimerMode::Free);
        machine.start(t0(), false).unwrap();
        for _ in 0..30 {
            machine.tick();
        }
        machine.skip();
        assert_eq!(machine.mode(), TimerMode::Free);
        assert_eq!(machine.value_seconds(), 0);
    }

    #[test]
    fn test_fourth_session_earns_long_break() {
        let mut machine = TimerMachine::new();

        for session in 1..=4u32 {
            assert_eq!(machine.session_number(), session);
            machine.start(t0(), false).unwrap();
            while !machine.tick() {}
            let run = machine.finish(t0() + chrono::Duration::minutes(25)).unwrap();
            assert_eq!(run.mode, TimerMode::Pomodoro);

            if session == 4 {
                assert_eq!(machine.mode(), TimerMode::LongBreak);
            } else {
                assert_eq!(machine.mode(), TimerMode::ShortBreak);
            }

            // The break advances back to a pomodoro.
            machine.start(t0(), false).unwrap();
            while !machine.tick() {}
            machine.finish(t0()).unwrap();
            assert_eq!(machine.mode(), TimerMode::Pomodoro);
        }

        assert_eq!(machine.session_number(), 5);
    }

    #[test]
    fn test_finish_is_at_most_once() {
        let mut machine = TimerMachine::new();
        machine.start(t0(), false).unwrap();
        while !machine.tick() {}

        let end = t0() + chrono::Duration::minutes(25);
        assert!(machine.finish(end).is_some());
        assert!(machine.finish(end).is_none());
    }

    #[test]
    fn test_finish_without_start_is_none() {
        let mut machine = TimerMachine::new();
        assert!(machine.finish(t0()).is_none());
    }

    #[test]
    fn test_advance_stops_at_completion_boundary() {
        let mut machine = TimerMachine::with_mode(TimerMode::ShortBreak);
        machine.start(t0(), false).unwrap();

        // Far more wall seconds elapsed than the break's length: the
        // catch-up must stop at zero, not wrap or go negative.
        assert!(machine.advance(10_000));
        assert_eq!(machine.value_seconds(), 0);
        assert_eq!(machine.status(), TimerStatus::Idle);
    }

    #[test]
    fn test_advance_partial() {
        let mut machine = TimerMachine::new();
        machine.start(t0(), false).unwrap();
        assert!(!machine.advance(90));
        assert_eq!(machine.value_seconds(), 1410);
        assert_eq!(machine.status(), TimerStatus::Running);
    }

    #[test]
    fn test_progress() {
        let mut machine = TimerMachine::new();
        machine.start(t0(), false).unwrap();
        assert!((machine.progress() - 0.0).abs() < f64::EPSILON);
        for _ in 0..750 {
            machine.tick();
        }
        assert!((machine.progress() - 0.5).abs() < 0.01);

        let free = TimerMachine::with_mode(TimerMode::Free);
        assert!((free.progress() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut machine = TimerMachine::new();
        machine.select_subject(Some(3));
        machine.start(t0(), true).unwrap();
        for _ in 0..42 {
            machine.tick();
        }

        let restored = TimerMachine::from_snapshot(machine.snapshot());
        assert_eq!(restored.mode(), machine.mode());
        assert_eq!(restored.status(), machine.status());
        assert_eq!(restored.value_seconds(), machine.value_seconds());
        assert_eq!(restored.subject_id(), Some(3));
    }
}
