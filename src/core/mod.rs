//! Core timer state machine and its collaborator seams.

mod clock;
mod machine;
mod mode;

pub use clock::{Clock, SystemClock};
pub use machine::{CompletedRun, TimerMachine, TimerSnapshot};
pub use mode::{format_clock, TickDirection, TimerMode, TimerStatus};
