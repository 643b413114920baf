//! Session recording, rewards, and persistence.

pub mod record;
pub mod recorder;
pub mod rewards;
pub mod storage;

pub use record::{duration_minutes, Mood, SessionKind, SessionNotes, StudySession};
pub use recorder::{RecordOutcome, SessionRecorder};
pub use rewards::{Profile, RewardPolicy};
pub use storage::{SqliteStudyStore, StudyStore};
