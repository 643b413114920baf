//! Session completion bookkeeping.
//!
//! Turns a finished timer run into a persisted `StudySession`, applies
//! the reward policy to the profile, and reports the outcome through the
//! notification collaborator. The timer has already reset by the time
//! this runs, so nothing here blocks or fails the state machine: a
//! persistence failure costs the record and surfaces as an error message.

use chrono::{DateTime, Duration, Utc};

use super::record::{duration_minutes, SessionKind, SessionNotes, StudySession};
use super::rewards::{Profile, RewardPolicy};
use super::storage::StudyStore;
use crate::core::{CompletedRun, TimerMachine, TimerSnapshot, TimerStatus};
use crate::notify::Notifier;

/// Result of recording a run.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    /// The session as built (its `id` is set only when persisted).
    pub session: StudySession,
    /// Profile after the reward update, when the run was a study session
    /// and persistence succeeded.
    pub profile: Option<Profile>,
    /// Levels gained by this completion.
    pub levels_gained: i64,
    /// Whether the record reached the store.
    pub persisted: bool,
}

/// Records completed runs against the persistence collaborator.
pub struct SessionRecorder<'a> {
    store: &'a dyn StudyStore,
    notifier: &'a dyn Notifier,
    policy: RewardPolicy,
}

impl<'a> SessionRecorder<'a> {
    /// Create a recorder.
    #[must_use]
    pub const fn new(
        store: &'a dyn StudyStore,
        notifier: &'a dyn Notifier,
        policy: RewardPolicy,
    ) -> Self {
        Self {
            store,
            notifier,
            policy,
        }
    }

    /// Record a finished run.
    ///
    /// Duration is the run's wall-clock length rounded to whole minutes,
    /// floored at 1. Streak dates are tracked in UTC. Never fails: store
    /// errors degrade to an error notification and an outcome with
    /// `persisted == false`.
    pub fn record(&self, run: &CompletedRun, annotations: SessionNotes) -> RecordOutcome {
        let kind = SessionKind::from_mode(run.mode);
        let minutes = duration_minutes(run.started_at, run.ended_at);
        let xp = self.policy.xp_for(kind, minutes);

        let mut session = StudySession {
            id: None,
            subject_id: run.subject_id,
            kind,
            started_at: run.started_at,
            ended_at: run.ended_at,
            duration_minutes: minutes,
            xp_earned: xp,
            annotations,
        };

        match self.persist(&mut session) {
            Ok((profile, levels_gained)) => {
                self.notifier.success(&success_message(&session, levels_gained));
                RecordOutcome {
                    session,
                    profile,
                    levels_gained,
                    persisted: true,
                }
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Failed to save session: {e}"));
                RecordOutcome {
                    session,
                    profile: None,
                    levels_gained: 0,
                    persisted: false,
                }
            }
        }
    }

    /// Restore a saved machine and catch it up to `now`.
    ///
    /// Applies one tick per wall-clock second since `last_tick_at`. A
    /// countdown that ran out while unobserved is finalized at its actual
    /// boundary instant and recorded.
    pub fn resume(
        &self,
        snapshot: TimerSnapshot,
        last_tick_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> TimerMachine {
        let mut machine = TimerMachine::from_snapshot(snapshot);
        if machine.status() == TimerStatus::Running {
            let elapsed = (now - last_tick_at).num_seconds();
            let remaining = machine.value_seconds();
            if machine.advance(elapsed) {
                let ended_at = last_tick_at + Duration::seconds(remaining);
                if let Some(run) = machine.finish(ended_at) {
                    self.record(&run, SessionNotes::default());
                }
            }
        }
        machine
    }

    /// Write the session and the updated profile.
    fn persist(
        &self,
        session: &mut StudySession,
    ) -> Result<(Option<Profile>, i64), crate::error::StudoroError> {
        let id = self.store.record_session(session)?;
        session.id = Some(id);

        if !session.kind.is_study() {
            return Ok((None, 0));
        }

        let mut profile = self.store.fetch_profile()?;
        let level_before = profile.level;
        profile.add_xp(session.xp_earned);
        profile.register_completion(session.ended_at.date_naive());
        self.store.save_profile(&profile)?;

        let levels_gained = profile.level - level_before;
        Ok((Some(profile), levels_gained))
    }
}

fn success_message(session: &StudySession, levels_gained: i64) -> String {
    let mut message = format!(
        "{} recorded ({} min, +{} XP)",
        session.kind.display_name(),
        session.duration_minutes,
        session.xp_earned
    );
    if levels_gained > 0 {
        message.push_str(" - level up!");
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use mockall::predicate;

    use crate::core::TimerMode;
    use crate::error::StudoroError;
    use crate::features::recorder::storage::{MockStudyStore, SqliteStudyStore};
    use crate::notify::MockNotifier;
    use crate::storage::Database;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).single().unwrap()
    }

    fn run(mode: TimerMode, length: Duration) -> CompletedRun {
        CompletedRun {
            mode,
            subject_id: None,
            started_at: t0(),
            ended_at: t0() + length,
        }
    }

    #[test]
    fn test_pomodoro_completion_awards_flat_xp() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteStudyStore::new(&db);

        let mut notifier = MockNotifier::new();
        notifier
            .expect_success()
            .with(predicate::str::contains("+25 XP"))
            .times(1)
            .return_const(());

        let recorder = SessionRecorder::new(&store, &notifier, RewardPolicy::default());
        let outcome = recorder.record(&run(TimerMode::Pomodoro, Duration::minutes(25)), SessionNotes::default());

        assert!(outcome.persisted);
        assert_eq!(outcome.session.xp_earned, 25);
        assert_eq!(outcome.session.duration_minutes, 25);
        let profile = outcome.profile.unwrap();
        assert_eq!(profile.xp, 25);
        assert_eq!(profile.completed_today, 1);
        assert_eq!(profile.current_streak, 1);
        assert_eq!(profile.total_sessions, 1);
    }

    #[test]
    fn test_free_session_earns_duration_xp() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteStudyStore::new(&db);

        let mut notifier = MockNotifier::new();
        notifier.expect_success().times(1).return_const(());

        let recorder = SessionRecorder::new(&store, &notifier, RewardPolicy::default());
        // 125 seconds rounds to 2 minutes, so 2 XP.
        let outcome = recorder.record(
            &run(TimerMode::Free, Duration::milliseconds(125_000)),
            SessionNotes::default(),
        );

        assert_eq!(outcome.session.duration_minutes, 2);
        assert_eq!(outcome.session.xp_earned, 2);
    }

    #[test]
    fn test_break_is_recorded_without_rewards() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteStudyStore::new(&db);

        let mut notifier = MockNotifier::new();
        notifier.expect_success().times(1).return_const(());

        let recorder = SessionRecorder::new(&store, &notifier, RewardPolicy::default());
        let outcome = recorder.record(&run(TimerMode::ShortBreak, Duration::minutes(5)), SessionNotes::default());

        assert!(outcome.persisted);
        assert_eq!(outcome.session.xp_earned, 0);
        assert!(outcome.profile.is_none());

        let profile = store.fetch_profile().unwrap();
        assert_eq!(profile.total_sessions, 0);
    }

    #[test]
    fn test_level_up_is_reported() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteStudyStore::new(&db);

        // Seed the profile near the first threshold.
        let mut profile = store.fetch_profile().unwrap();
        profile.add_xp(90);
        store.save_profile(&profile).unwrap();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_success()
            .with(predicate::str::contains("level up"))
            .times(1)
            .return_const(());

        let recorder = SessionRecorder::new(&store, &notifier, RewardPolicy::default());
        let outcome = recorder.record(&run(TimerMode::Pomodoro, Duration::minutes(25)), SessionNotes::default());

        assert_eq!(outcome.levels_gained, 1);
        let profile = outcome.profile.unwrap();
        assert_eq!(profile.xp, 115);
        assert_eq!(profile.level, 2);
        assert_eq!(profile.xp_to_next_level, 200);
    }

    #[test]
    fn test_store_failure_surfaces_as_error_notification() {
        let mut store = MockStudyStore::new();
        store
            .expect_record_session()
            .times(1)
            .returning(|_| Err(StudoroError::Database("connection lost".to_string())));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_error()
            .with(predicate::str::contains("connection lost"))
            .times(1)
            .return_const(());

        let recorder = SessionRecorder::new(&store, &notifier, RewardPolicy::default());
        let outcome = recorder.record(&run(TimerMode::Pomodoro, Duration::minutes(25)), SessionNotes::default());

        assert!(!outcome.persisted);
        assert!(outcome.profile.is_none());
    }

    #[test]
    fn test_resume_completes_stale_countdown() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteStudyStore::new(&db);

        let mut notifier = MockNotifier::new();
        notifier.expect_success().times(1).return_const(());

        let mut machine = crate::core::TimerMachine::new();
        machine.start(t0(), false).unwrap();

        let recorder = SessionRecorder::new(&store, &notifier, RewardPolicy::default());
        let resumed = recorder.resume(machine.snapshot(), t0(), t0() + Duration::seconds(2000));

        // Completed at the 1500-second boundary and cycled to the break.
        assert_eq!(resumed.mode(), TimerMode::ShortBreak);
        assert_eq!(resumed.session_number(), 2);

        let sessions = store.fetch_recent_sessions(1).unwrap();
        assert_eq!(sessions[0].duration_minutes, 25);
        assert_eq!(sessions[0].ended_at, t0() + Duration::seconds(1500));
    }

    #[test]
    fn test_resume_leaves_paused_machine_untouched() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteStudyStore::new(&db);
        let notifier = MockNotifier::new();

        let mut machine = crate::core::TimerMachine::new();
        machine.start(t0(), false).unwrap();
        machine.tick();
        machine.pause();

        let recorder = SessionRecorder::new(&store, &notifier, RewardPolicy::default());
        let resumed = recorder.resume(machine.snapshot(), t0(), t0() + Duration::hours(3));

        assert_eq!(resumed.value_seconds(), 1499);
        assert_eq!(resumed.status(), crate::core::TimerStatus::Paused);
    }

    #[test]
    fn test_annotations_are_persisted() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteStudyStore::new(&db);

        let mut notifier = MockNotifier::new();
        notifier.expect_success().times(1).return_const(());

        let annotations = SessionNotes {
            notes: Some("Chapter 5 review".to_string()),
            mood: crate::features::recorder::Mood::parse("good"),
            exercises_correct: Some(8),
            exercises_wrong: Some(2),
        };

        let recorder = SessionRecorder::new(&store, &notifier, RewardPolicy::default());
        recorder.record(&run(TimerMode::Free, Duration::minutes(30)), annotations);

        let recent = store.fetch_recent_sessions(1).unwrap();
        assert_eq!(recent[0].annotations.notes.as_deref(), Some("Chapter 5 review"));
        assert_eq!(recent[0].annotations.exercises_correct, Some(8));
        assert_eq!(recent[0].annotations.exercises_wrong, Some(2));
    }
}
