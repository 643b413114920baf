//! Subjects to study against.

pub mod storage;
pub mod subject;

pub use storage::SubjectStorage;
pub use subject::Subject;
