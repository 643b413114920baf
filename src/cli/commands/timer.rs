//! Timer command implementation.
//!
//! The CLI surface has no resident process, so the timer state lives in
//! the database between invocations. Every command restores the saved
//! snapshot, catches it up to wall-clock time one tick per elapsed
//! second, applies the operation, and saves the snapshot back. A
//! countdown that ran out while no process was watching is finalized and
//! recorded during the catch-up.

use chrono::{DateTime, Utc};

use crate::cli::args::{OutputFormat, TimerCommands};
use crate::config::Config;
use crate::core::{Clock, SystemClock, TimerMachine, TimerMode};
use crate::error::StudoroError;
use crate::features::recorder::{
    Mood, RewardPolicy, SessionNotes, SessionRecorder, SqliteStudyStore,
};
use crate::features::subjects::{Subject, SubjectStorage};
use crate::notify::{Notifier, SilentNotifier, TerminalNotifier};
use crate::output::format_timer;
use crate::storage::{ActiveTimerStorage, Database};

use super::resolve_subject;

/// Execute timer subcommands.
pub fn timer(
    db: &Database,
    config: &Config,
    cmd: TimerCommands,
    format: OutputFormat,
) -> Result<String, StudoroError> {
    let active = ActiveTimerStorage::new(db);
    let store = SqliteStudyStore::new(db);
    let subjects = SubjectStorage::new(db);

    // JSON output stays machine-readable; notifications go quiet.
    let terminal = TerminalNotifier;
    let silent = SilentNotifier;
    let notifier: &dyn Notifier = match format {
        OutputFormat::Pretty => &terminal,
        OutputFormat::Json => &silent,
    };
    let recorder = SessionRecorder::new(&store, notifier, RewardPolicy::from(&config.rewards));

    let now = SystemClock.now();
    let mut machine = restore(&active, &recorder, now)?;

    match cmd {
        TimerCommands::Start { subject, mode } => {
            if let Some(mode) = mode {
                let mode = parse_mode(&mode)?;
                if mode != machine.mode() {
                    machine.set_mode(mode);
                }
            }
            if let Some(reference) = subject {
                let subject = resolve_subject(&subjects, &reference)?;
                machine.select_subject(subject.id);
            }
            machine.start(now, subjects.any()?)?;
            active.save(&machine.snapshot(), now)?;
            render(&machine, &subjects, format)
        }

        TimerCommands::Pause => {
            machine.pause();
            active.save(&machine.snapshot(), now)?;
            render(&machine, &subjects, format)
        }

        TimerCommands::Reset => {
            machine.reset();
            active.save(&machine.snapshot(), now)?;
            render(&machine, &subjects, format)
        }

        TimerCommands::Skip => {
            machine.skip();
            active.save(&machine.snapshot(), now)?;
            render(&machine, &subjects, format)
        }

        TimerCommands::Mode { mode } => {
            let mode = parse_mode(&mode)?;
            machine.set_mode(mode);
            active.save(&machine.snapshot(), now)?;
            render(&machine, &subjects, format)
        }

        TimerCommands::Status => render(&machine, &subjects, format),

        TimerCommands::Finish {
            notes,
            mood,
            correct,
            wrong,
        } => {
            if machine.mode() != TimerMode::Free {
                return Err(StudoroError::Validation(
                    "Only free sessions are finished manually; countdowns complete on their own"
                        .to_string(),
                ));
            }

            let mood = match mood {
                Some(ref s) => Some(Mood::parse(s).ok_or_else(|| {
                    StudoroError::Validation(format!(
                        "Unknown mood '{s}'. Use excellent, good, neutral, tired, or frustrated"
                    ))
                })?),
                None => None,
            };

            let run = machine.finish(now).ok_or_else(|| {
                StudoroError::Validation("No active free session to finish".to_string())
            })?;

            let annotations = SessionNotes {
                notes,
                mood,
                exercises_correct: correct,
                exercises_wrong: wrong,
            };
            let outcome = recorder.record(&run, annotations);

            active.save(&machine.snapshot(), now)?;
            match format {
                OutputFormat::Pretty => render(&machine, &subjects, format),
                OutputFormat::Json => crate::output::to_json(&outcome.session),
            }
        }

        TimerCommands::Cancel => {
            active.clear()?;
            match format {
                OutputFormat::Pretty => Ok("Timer cancelled".to_string()),
                OutputFormat::Json => crate::output::to_json(&serde_json::json!({
                    "cancelled": true
                })),
            }
        }
    }
}

/// Restore the saved timer and catch it up to `now`.
fn restore(
    active: &ActiveTimerStorage,
    recorder: &SessionRecorder,
    now: DateTime<Utc>,
) -> Result<TimerMachine, StudoroError> {
    match active.load()? {
        Some((snapshot, last_tick_at)) => {
            let machine = recorder.resume(snapshot, last_tick_at, now);
            // The catch-up may have completed and recorded a run. Persist
            // the caught-up snapshot before the command logic runs, so a
            // later validation error cannot leave the stale Running
            // snapshot behind and record the same run twice.
            active.save(&machine.snapshot(), now)?;
            Ok(machine)
        }
        None => Ok(TimerMachine::new()),
    }
}

fn parse_mode(s: &str) -> Result<TimerMode, StudoroError> {
    TimerMode::parse(s).ok_or_else(|| {
        StudoroError::Validation(format!(
            "Unknown mode '{s}'. Use pomodoro, short-break, long-break, or free"
        ))
    })
}

fn render(
    machine: &TimerMachine,
    subjects: &SubjectStorage,
    format: OutputFormat,
) -> Result<String, StudoroError> {
    let subject: Option<Subject> = match machine.subject_id() {
        Some(id) => subjects.get(id).ok(),
        None => None,
    };
    format_timer(machine, subject.as_ref(), format)
}
