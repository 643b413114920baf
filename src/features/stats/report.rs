//! Study reports.
//!
//! Aggregates session history into summaries for the stats commands.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::StudoroError;
use crate::features::recorder::{SessionKind, SqliteStudyStore, StudySession, StudyStore};
use crate::features::subjects::{Subject, SubjectStorage};

/// Report time period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// Today only
    Today,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// All time
    AllTime,
}

impl ReportPeriod {
    /// Get the start and end instants for this period.
    #[must_use]
    pub fn date_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = Utc::now().date_naive();
        let start_date = match self {
            Self::Today => today,
            Self::Week => today - Duration::days(6),
            Self::Month => today - Duration::days(29),
            Self::AllTime => NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(today),
        };

        let start = start_date.and_hms_opt(0, 0, 0).unwrap_or_default();
        let end = today.and_hms_opt(23, 59, 59).unwrap_or_default();
        (
            DateTime::from_naive_utc_and_offset(start, Utc),
            DateTime::from_naive_utc_and_offset(end, Utc),
        )
    }

    /// Parse a period from user input, defaulting to the week view.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "today" | "t" | "d" => Self::Today,
            "month" | "m" | "30d" => Self::Month,
            "all" | "alltime" | "all-time" => Self::AllTime,
            _ => Self::Week,
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "This Week",
            Self::Month => "This Month",
            Self::AllTime => "All Time",
        }
    }
}

/// Study time per subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectStudyTime {
    /// Subject ID
    pub subject_id: Option<i64>,
    /// Subject name
    pub subject_name: String,
    /// Total study minutes
    pub minutes: i64,
    /// Session count
    pub sessions: i64,
    /// Fraction of the subject's weekly target reached (week reports only).
    pub target_progress: Option<f64>,
}

/// Study time per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStudyTime {
    /// Date
    pub date: String,
    /// Total study minutes
    pub minutes: i64,
    /// Session count
    pub sessions: i64,
}

/// Study report data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    /// Report period name
    pub period: String,
    /// Total study time in minutes
    pub total_minutes: i64,
    /// Completed pomodoro count
    pub pomodoro_sessions: i64,
    /// Completed free session count
    pub free_sessions: i64,
    /// XP earned over the period
    pub xp_earned: i64,
    /// Average study session length in minutes
    pub avg_session_minutes: f64,
    /// Study time by day of week
    pub by_day_of_week: [i64; 7],
    /// Study time by subject
    pub by_subject: Vec<SubjectStudyTime>,
    /// Daily breakdown
    pub daily: Vec<DailyStudyTime>,
    /// Current streak in days
    pub current_streak: i64,
    /// Longest streak in days
    pub longest_streak: i64,
    /// Current level
    pub level: i64,
}

impl StatsReport {
    /// Generate a report for the given period.
    pub fn generate(
        store: &SqliteStudyStore,
        subjects: &SubjectStorage,
        period: ReportPeriod,
    ) -> Result<Self, StudoroError> {
        let (start, end) = period.date_range();
        let sessions = store.sessions_in_range(start, end)?;
        let profile = store.fetch_profile()?;

        // Breaks are recorded but carry no study time.
        let study: Vec<&StudySession> = sessions.iter().filter(|s| s.kind.is_study()).collect();

        let total_minutes: i64 = study.iter().map(|s| s.duration_minutes).sum();
        let xp_earned: i64 = study.iter().map(|s| s.xp_earned).sum();
        let pomodoro_sessions = study
            .iter()
            .filter(|s| s.kind == SessionKind::Pomodoro)
            .count() as i64;
        let free_sessions = study
            .iter()
            .filter(|s| s.kind == SessionKind::Free)
            .count() as i64;

        let study_count = study.len() as i64;
        let avg_session_minutes = if study_count > 0 {
            total_minutes as f64 / study_count as f64
        } else {
            0.0
        };

        let mut by_day_of_week = [0i64; 7];
        for session in &study {
            let weekday = session.started_at.weekday().num_days_from_monday() as usize;
            by_day_of_week[weekday] += session.duration_minutes;
        }

        let mut subject_index: HashMap<i64, Subject> = HashMap::new();
        for subject in subjects.list()? {
            if let Some(id) = subject.id {
                subject_index.insert(id, subject);
            }
        }

        let mut subject_map: HashMap<Option<i64>, (i64, i64)> = HashMap::new();
        for session in &study {
            let entry = subject_map.entry(session.subject_id).or_insert((0, 0));
            entry.0 += session.duration_minutes;
            entry.1 += 1;
        }

        let mut by_subject: Vec<SubjectStudyTime> = subject_map
            .into_iter()
            .map(|(subject_id, (minutes, count))| {
                let subject = subject_id.and_then(|id| subject_index.get(&id));
                SubjectStudyTime {
                    subject_id,
                    subject_name: subject
                        .map(Subject::display_name)
                        .unwrap_or_else(|| "(No Subject)".to_string()),
                    minutes,
                    sessions: count,
                    target_progress: if period == ReportPeriod::Week {
                        subject.and_then(|s| s.weekly_progress(minutes))
                    } else {
                        None
                    },
                }
            })
            .collect();
        by_subject.sort_by(|a, b| b.minutes.cmp(&a.minutes));

        let mut daily_map: HashMap<NaiveDate, (i64, i64)> = HashMap::new();
        for session in &study {
            let date = session.started_at.date_naive();
            let entry = daily_map.entry(date).or_insert((0, 0));
            entry.0 += session.duration_minutes;
            entry.1 += 1;
        }

        let mut daily: Vec<DailyStudyTime> = daily_map
            .into_iter()
            .map(|(date, (minutes, count))| DailyStudyTime {
                date: date.to_string(),
                minutes,
                sessions: count,
            })
            .collect();
        daily.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(Self {
            period: period.display_name().to_string(),
            total_minutes,
            pomodoro_sessions,
            free_sessions,
            xp_earned,
            avg_session_minutes,
            by_day_of_week,
            by_subject,
            daily,
            current_streak: profile.streak_on(Utc::now().date_naive()),
            longest_streak: profile.longest_streak,
            level: profile.level,
        })
    }

    /// Format the report for display.
    #[must_use]
    pub fn format(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("📊 Study Report: {}", self.period));
        lines.push("═".repeat(50));
        lines.push(String::new());

        lines.push("Summary".to_string());
        lines.push("─".repeat(40));
        lines.push(format!(
            "  Total study time:    {}",
            format_duration(Duration::minutes(self.total_minutes))
        ));
        lines.push(format!("  Pomodoros:           {}", self.pomodoro_sessions));
        lines.push(format!("  Free sessions:       {}", self.free_sessions));
        lines.push(format!("  XP earned:           {}", self.xp_earned));
        lines.push(format!(
            "  Average session:     {:.0} minutes",
            self.avg_session_minutes
        ));
        lines.push(format!("  Level:               {}", self.level));
        lines.push(format!(
            "  Current streak:      {} day{}",
            self.current_streak,
            if self.current_streak == 1 { "" } else { "s" }
        ));
        lines.push(format!("  Longest streak:      {} days", self.longest_streak));
        lines.push(String::new());

        if self.total_minutes > 0 {
            lines.push("By Day of Week".to_string());
            lines.push("─".repeat(40));
            let days = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
            let max_day = self.by_day_of_week.iter().max().copied().unwrap_or(1).max(1);

            for (i, day) in days.iter().enumerate() {
                let minutes = self.by_day_of_week[i];
                let bar_len = (minutes as f64 / max_day as f64 * 20.0) as usize;
                let bar = "█".repeat(bar_len);
                lines.push(format!("  {day} {minutes:>4}m {bar}"));
            }
            lines.push(String::new());
        }

        if !self.by_subject.is_empty() {
            lines.push("Top Subjects".to_string());
            lines.push("─".repeat(40));

            for subject in self.by_subject.iter().take(5) {
                let name = if subject.subject_name.chars().count() > 25 {
                    let short: String = subject.subject_name.chars().take(22).collect();
                    format!("{short}...")
                } else {
                    subject.subject_name.clone()
                };
                let mut line = format!(
                    "  {:<25} {:>4}m ({} sessions)",
                    name, subject.minutes, subject.sessions
                );
                if let Some(progress) = subject.target_progress {
                    line.push_str(&format!("  {:.0}% of target", progress * 100.0));
                }
                lines.push(line);
            }
            lines.push(String::new());
        }

        if !self.daily.is_empty() {
            lines.push("Recent Days".to_string());
            lines.push("─".repeat(40));

            for day in self.daily.iter().take(7) {
                lines.push(format!(
                    "  {} {:>4}m ({} sessions)",
                    day.date, day.minutes, day.sessions
                ));
            }
        }

        lines.join("\n")
    }
}

/// Format a duration as a human-readable string.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_minutes = d.num_minutes();

    if total_minutes < 1 {
        let seconds = d.num_seconds();
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{}, {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    } else {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::recorder::SessionNotes;
    use crate::storage::Database;

    fn session(kind: SessionKind, subject_id: Option<i64>, minutes: i64) -> StudySession {
        let started = Utc::now() - Duration::minutes(minutes);
        StudySession {
            id: None,
            subject_id,
            kind,
            started_at: started,
            ended_at: started + Duration::minutes(minutes),
            duration_minutes: minutes,
            xp_earned: if kind == SessionKind::Pomodoro { 25 } else { minutes },
            annotations: SessionNotes::default(),
        }
    }

    #[test]
    fn test_report_period_today() {
        let (start, end) = ReportPeriod::Today.date_range();
        assert!(start < end);
        assert_eq!(start.date_naive(), Utc::now().date_naive());
    }

    #[test]
    fn test_report_period_parse() {
        assert_eq!(ReportPeriod::parse("today"), ReportPeriod::Today);
        assert_eq!(ReportPeriod::parse("week"), ReportPeriod::Week);
        assert_eq!(ReportPeriod::parse("month"), ReportPeriod::Month);
        assert_eq!(ReportPeriod::parse("all"), ReportPeriod::AllTime);
        assert_eq!(ReportPeriod::parse("bogus"), ReportPeriod::Week);
    }

    #[test]
    fn test_generate_excludes_breaks() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteStudyStore::new(&db);
        let subjects = SubjectStorage::new(&db);

        let math = subjects.add(&Subject::new("Math")).unwrap();

        store.record_session(&session(SessionKind::Pomodoro, math.id, 25)).unwrap();
        store.record_session(&session(SessionKind::Free, None, 40)).unwrap();
        store.record_session(&session(SessionKind::Break, None, 5)).unwrap();

        let report = StatsReport::generate(&store, &subjects, ReportPeriod::Today).unwrap();
        assert_eq!(report.total_minutes, 65);
        assert_eq!(report.pomodoro_sessions, 1);
        assert_eq!(report.free_sessions, 1);
        assert_eq!(report.xp_earned, 65);
    }

    #[test]
    fn test_generate_groups_by_subject() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteStudyStore::new(&db);
        let subjects = SubjectStorage::new(&db);

        let math = subjects.add(&Subject::new("Math")).unwrap();

        store.record_session(&session(SessionKind::Pomodoro, math.id, 25)).unwrap();
        store.record_session(&session(SessionKind::Pomodoro, math.id, 25)).unwrap();
        store.record_session(&session(SessionKind::Free, None, 10)).unwrap();

        let report = StatsReport::generate(&store, &subjects, ReportPeriod::Week).unwrap();
        assert_eq!(report.by_subject.len(), 2);
        assert_eq!(report.by_subject[0].subject_name, "Math");
        assert_eq!(report.by_subject[0].minutes, 50);
        assert_eq!(report.by_subject[0].sessions, 2);
        assert_eq!(report.by_subject[1].subject_name, "(No Subject)");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(30)), "30 seconds");
        assert_eq!(format_duration(Duration::minutes(1)), "1 minute");
        assert_eq!(format_duration(Duration::minutes(90)), "1 hour, 30 minutes");
        assert_eq!(format_duration(Duration::minutes(120)), "2 hours");
    }

    #[test]
    fn test_week_report_tracks_subject_targets() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteStudyStore::new(&db);
        let subjects = SubjectStorage::new(&db);

        let mut math = Subject::new("Math");
        math.target_hours_per_week = Some(2.0);
        let math = subjects.add(&math).unwrap();

        store.record_session(&session(SessionKind::Pomodoro, math.id, 60)).unwrap();

        let report = StatsReport::generate(&store, &subjects, ReportPeriod::Week).unwrap();
        let progress = report.by_subject[0].target_progress.unwrap();
        assert!((progress - 0.5).abs() < f64::EPSILON);

        // Only the week view measures against the weekly target.
        let report = StatsReport::generate(&store, &subjects, ReportPeriod::AllTime).unwrap();
        assert!(report.by_subject[0].target_progress.is_none());
    }
}
