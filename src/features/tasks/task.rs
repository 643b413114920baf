//! Task model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Parse a priority from user input.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" | "l" => Some(Self::Low),
            "medium" | "med" | "m" => Some(Self::Medium),
            "high" | "h" => Some(Self::High),
            _ => None,
        }
    }

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A to-do item, optionally tied to a subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Database id, if persisted.
    pub id: Option<i64>,
    /// What to do.
    pub title: String,
    /// Whether the task is done.
    pub completed: bool,
    /// Linked subject, if any.
    pub subject_id: Option<i64>,
    /// Priority, defaults to medium.
    pub priority: Priority,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new unsaved task.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            completed: false,
            subject_id: None,
            priority: Priority::default(),
            created_at: Utc::now(),
        }
    }
}
