//! Feature modules.

pub mod recorder;
pub mod stats;
pub mod subjects;
pub mod tasks;
