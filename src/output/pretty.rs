use chrono::{Duration, Utc};
use colored::Colorize;

use crate::core::{TimerMachine, TimerStatus};
use crate::features::recorder::{Profile, StudySession};
use crate::features::stats::format_duration;
use crate::features::subjects::Subject;
use crate::features::tasks::{Priority, Task};

/// Format the timer state for the terminal
pub fn format_timer_pretty(machine: &TimerMachine, subject: Option<&Subject>) -> String {
    let status = match machine.status() {
        TimerStatus::Idle => "idle".dimmed(),
        TimerStatus::Running => "running".green(),
        TimerStatus::Paused => "paused".yellow(),
    };

    let mut output = format!(
        "{} {} [{}]\n",
        machine.mode().display_name().bold(),
        machine.format_value(),
        status
    );

    if let Some(subject) = subject {
        output.push_str(&format!("  {}: {}\n", "Subject".dimmed(), subject.display_name()));
    }
    output.push_str(&format!(
        "  {}: {}\n",
        "Session".dimmed(),
        machine.session_number()
    ));

    output
}

/// Format recent sessions as a pretty list
pub fn format_sessions_pretty(sessions: &[StudySession], subject_name: impl Fn(i64) -> Option<String>) -> String {
    if sessions.is_empty() {
        return "Sessions (0)\n  No sessions recorded yet".to_string();
    }

    let mut output = format!("Sessions ({})\n", sessions.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for session in sessions {
        let when = session.started_at_local().format("%Y-%m-%d %H:%M");
        let subject = session
            .subject_id
            .and_then(&subject_name)
            .unwrap_or_else(|| "-".to_string());

        let mut line = format!(
            "{} {} {:>4}m  {}",
            when.to_string().dimmed(),
            format!("{:<11}", session.kind.display_name()).bold(),
            session.duration_minutes,
            subject
        );

        if session.xp_earned > 0 {
            line.push_str(&format!("  {}", format!("+{} XP", session.xp_earned).cyan()));
        }
        if let Some(mood) = session.annotations.mood {
            line.push_str(&format!("  {}", mood.as_str().dimmed()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format subjects as a pretty list
pub fn format_subjects_pretty(subjects: &[Subject]) -> String {
    if subjects.is_empty() {
        return "Subjects (0)\n  No subjects yet. Add one with: studoro subject add <name>".to_string();
    }

    let mut output = format!("Subjects ({})\n", subjects.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for subject in subjects {
        let id = subject.id.unwrap_or_default();
        let mut line = format!(
            "[{}] {}  {} across {} sessions",
            id,
            subject.display_name().bold(),
            format_duration(Duration::minutes(subject.total_minutes)),
            subject.total_sessions
        );

        if let Some(target) = subject.target_hours_per_week {
            line.push_str(&format!("  {}", format!("target {target}h/week").dimmed()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format tasks as a pretty list
pub fn format_tasks_pretty(tasks: &[Task], subject_name: impl Fn(i64) -> Option<String>) -> String {
    if tasks.is_empty() {
        return "Tasks (0)\n  No open tasks".to_string();
    }

    let mut output = format!("Tasks ({})\n", tasks.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for task in tasks {
        let check = if task.completed {
            "[x]".green()
        } else {
            "[ ]".white()
        };
        let priority = match task.priority {
            Priority::High => "high".red(),
            Priority::Medium => "med".yellow(),
            Priority::Low => "low".dimmed(),
        };

        let mut line = format!(
            "{} [{}] {} ({})",
            check,
            task.id.unwrap_or_default(),
            task.title.bold(),
            priority
        );

        if let Some(subject) = task.subject_id.and_then(&subject_name) {
            line.push_str(&format!("  {}", subject.dimmed()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format the profile as a pretty summary
pub fn format_profile_pretty(profile: &Profile) -> String {
    let today = Utc::now().date_naive();
    let streak = profile.streak_on(today);

    let mut output = format!("{}\n", "Profile".bold());
    output.push_str(&"─".repeat(40));
    output.push('\n');

    output.push_str(&format!("  {}: {}\n", "Level".dimmed(), profile.level));
    output.push_str(&format!(
        "  {}: {} / {}\n",
        "XP".dimmed(),
        profile.xp,
        profile.xp_to_next_level
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Completed today".dimmed(),
        profile.completed_on(today)
    ));
    output.push_str(&format!(
        "  {}: {} day{}\n",
        "Current streak".dimmed(),
        streak,
        if streak == 1 { "" } else { "s" }
    ));
    output.push_str(&format!(
        "  {}: {} days\n",
        "Longest streak".dimmed(),
        profile.longest_streak
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Total sessions".dimmed(),
        profile.total_sessions
    ));

    output
}
