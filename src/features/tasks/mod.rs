//! Lightweight to-do list alongside the timer.

pub mod storage;
pub mod task;

pub use storage::TaskStorage;
pub use task::{Priority, Task};
