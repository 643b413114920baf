//! Subject model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A study subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Database id, if persisted.
    pub id: Option<i64>,
    /// Display name, unique.
    pub name: String,
    /// Optional emoji or short icon.
    pub icon: Option<String>,
    /// Optional display color name.
    pub color: Option<String>,
    /// Weekly study target in hours.
    pub target_hours_per_week: Option<f64>,
    /// Study sessions recorded against this subject.
    pub total_sessions: i64,
    /// Study minutes recorded against this subject.
    pub total_minutes: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Subject {
    /// Create a new unsaved subject.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            icon: None,
            color: None,
            target_hours_per_week: None,
            total_sessions: 0,
            total_minutes: 0,
            created_at: Utc::now(),
        }
    }

    /// Name with its icon prefixed, for display.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.icon {
            Some(icon) => format!("{icon} {}", self.name),
            None => self.name.clone(),
        }
    }

    /// Progress toward the weekly target, when one is set.
    ///
    /// Uses minutes recorded since the given week start.
    #[must_use]
    pub fn weekly_progress(&self, minutes_this_week: i64) -> Option<f64> {
        let target = self.target_hours_per_week?;
        if target <= 0.0 {
            return None;
        }
        Some((minutes_this_week as f64 / 60.0) / target)
    }
}
