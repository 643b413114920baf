//! Application state for the TUI.

use chrono::{DateTime, Duration, Utc};

use crate::config::Config;
use crate::core::{Clock, SystemClock, TimerMachine, TimerMode};
use crate::error::StudoroError;
use crate::features::recorder::{
    Profile, RewardPolicy, SessionNotes, SessionRecorder, SqliteStudyStore, StudyStore,
};
use crate::features::subjects::{Subject, SubjectStorage};
use crate::notify::SilentNotifier;
use crate::storage::{ActiveTimerStorage, Database};

/// Application state.
pub struct App<'a> {
    db: &'a Database,
    policy: RewardPolicy,
    clock: SystemClock,
    /// The timer being driven.
    pub machine: TimerMachine,
    /// Profile shown in the sidebar.
    pub profile: Profile,
    /// Available subjects, selectable by number key.
    pub subjects: Vec<Subject>,
    /// Status message to display.
    pub status: Option<String>,
    /// Instant of the last applied tick.
    last_tick: DateTime<Utc>,
}

impl<'a> App<'a> {
    /// Create the app, restoring any saved timer.
    ///
    /// # Errors
    ///
    /// Returns an error if loading state from the database fails.
    pub fn new(db: &'a Database, config: &Config) -> Result<Self, StudoroError> {
        let policy = RewardPolicy::from(&config.rewards);
        let clock = SystemClock;
        let now = clock.now();

        let store = SqliteStudyStore::new(db);
        let notifier = SilentNotifier;
        let recorder = SessionRecorder::new(&store, &notifier, policy);

        let active = ActiveTimerStorage::new(db);
        let machine = match active.load()? {
            Some((snapshot, last_tick_at)) => recorder.resume(snapshot, last_tick_at, now),
            None => TimerMachine::new(),
        };

        let profile = store.fetch_profile()?;
        let subjects = SubjectStorage::new(db).list()?;

        Ok(Self {
            db,
            policy,
            clock,
            machine,
            profile,
            subjects,
            status: Some("Press space to start".to_string()),
            last_tick: now,
        })
    }

    /// Apply any ticks that have come due since the last pass.
    ///
    /// One tick per elapsed wall-clock second; a completed countdown is
    /// recorded and the machine cycles to the next mode.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the snapshot fails.
    pub fn on_tick(&mut self) -> Result<(), StudoroError> {
        let now = self.clock.now();
        let due = (now - self.last_tick).num_seconds();
        if due <= 0 {
            return Ok(());
        }

        let remaining = self.machine.value_seconds();
        let completed = self.machine.advance(due);
        self.last_tick = self.last_tick + Duration::seconds(due);

        if completed {
            let ended_at = self.last_tick - Duration::seconds(due - remaining);
            if let Some(run) = self.machine.finish(ended_at) {
                self.record(&run)?;
            }
        }

        self.save()
    }

    /// Start or pause the timer.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the snapshot fails.
    pub fn toggle(&mut self) -> Result<(), StudoroError> {
        let now = self.clock.now();
        if self.machine.is_running() {
            self.machine.pause();
            self.status = Some("Paused".to_string());
        } else {
            match self.machine.start(now, !self.subjects.is_empty()) {
                Ok(()) => {
                    self.last_tick = now;
                    self.status = Some(format!("{} running", self.machine.mode().display_name()));
                }
                Err(e) => {
                    self.status = Some(e.to_string());
                    return Ok(());
                }
            }
        }
        self.save()
    }

    /// Reset the timer.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the snapshot fails.
    pub fn reset(&mut self) -> Result<(), StudoroError> {
        self.machine.reset();
        self.status = Some("Reset".to_string());
        self.save()
    }

    /// Skip to the next mode without recording.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the snapshot fails.
    pub fn skip(&mut self) -> Result<(), StudoroError> {
        self.machine.skip();
        self.status = Some(format!("Skipped to {}", self.machine.mode().display_name()));
        self.save()
    }

    /// Cycle through the countdown modes.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the snapshot fails.
    pub fn cycle_mode(&mut self) -> Result<(), StudoroError> {
        let next = match self.machine.mode() {
            TimerMode::Pomodoro => TimerMode::ShortBreak,
            TimerMode::ShortBreak => TimerMode::LongBreak,
            TimerMode::LongBreak | TimerMode::Free => TimerMode::Pomodoro,
        };
        self.machine.set_mode(next);
        self.status = Some(next.display_name().to_string());
        self.save()
    }

    /// Toggle free mode on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the snapshot fails.
    pub fn toggle_free(&mut self) -> Result<(), StudoroError> {
        let next = if self.machine.mode() == TimerMode::Free {
            TimerMode::Pomodoro
        } else {
            TimerMode::Free
        };
        self.machine.set_mode(next);
        self.status = Some(next.display_name().to_string());
        self.save()
    }

    /// Finish a free session and record the elapsed time.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the snapshot fails.
    pub fn finish_free(&mut self) -> Result<(), StudoroError> {
        if self.machine.mode() != TimerMode::Free {
            return Ok(());
        }
        if let Some(run) = self.machine.finish(self.clock.now()) {
            self.record(&run)?;
        } else {
            self.status = Some("No active free session".to_string());
        }
        self.save()
    }

    /// Select a subject by its position in the list (0-based).
    pub fn select_subject(&mut self, index: usize) {
        if let Some(subject) = self.subjects.get(index) {
            self.machine.select_subject(subject.id);
            self.status = Some(format!("Studying {}", subject.display_name()));
        }
    }

    /// Name of the currently selected subject.
    #[must_use]
    pub fn selected_subject_name(&self) -> Option<String> {
        let id = self.machine.subject_id()?;
        self.subjects
            .iter()
            .find(|s| s.id == Some(id))
            .map(Subject::display_name)
    }

    /// Persist the timer snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save(&self) -> Result<(), StudoroError> {
        ActiveTimerStorage::new(self.db).save(&self.machine.snapshot(), self.last_tick)
    }

    fn record(&mut self, run: &crate::core::CompletedRun) -> Result<(), StudoroError> {
        let store = SqliteStudyStore::new(self.db);
        let notifier = SilentNotifier;
        let recorder = SessionRecorder::new(&store, &notifier, self.policy);

        let outcome = recorder.record(run, SessionNotes::default());
        if outcome.persisted {
            if let Some(profile) = outcome.profile {
                self.profile = profile;
            }
            let mut message = format!(
                "{} complete (+{} XP)",
                outcome.session.kind.display_name(),
                outcome.session.xp_earned
            );
            if outcome.levels_gained > 0 {
                message.push_str(&format!(" - level {}!", self.profile.level));
            }
            self.status = Some(message);
        } else {
            self.status = Some("Failed to save session".to_string());
        }

        // Keep per-subject aggregates fresh for the sidebar.
        self.subjects = store.fetch_subjects()?;
        Ok(())
    }
}
