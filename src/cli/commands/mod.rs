//! Command implementations for studoro.
//!
//! This module contains the implementation of all CLI commands.

mod stats;
mod subject;
mod task;
mod timer;

pub use stats::stats;
pub use subject::subject;
pub use task::task;
pub use timer::timer;

use crate::error::StudoroError;
use crate::features::subjects::{Subject, SubjectStorage};

/// Resolve a subject from a name or numeric id.
pub(crate) fn resolve_subject(
    subjects: &SubjectStorage,
    reference: &str,
) -> Result<Subject, StudoroError> {
    if let Some(subject) = subjects.find_by_name(reference)? {
        return Ok(subject);
    }
    if let Ok(id) = reference.parse::<i64>() {
        return subjects.get(id);
    }
    Err(StudoroError::NotFound(format!(
        "Subject '{reference}' not found"
    )))
}
