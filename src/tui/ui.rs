//! UI rendering for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::core::{TimerMode, TimerStatus};
use crate::tui::app::App;

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App<'_>) {
    // Create layout: header, clock, gauge, info, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(5), // Clock
            Constraint::Length(3), // Gauge
            Constraint::Min(0),    // Subjects and profile
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_clock(frame, app, chunks[1]);
    render_gauge(frame, app, chunks[2]);
    render_info(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);
}

const fn mode_color(mode: TimerMode) -> Color {
    match mode {
        TimerMode::Pomodoro => Color::Red,
        TimerMode::ShortBreak | TimerMode::LongBreak => Color::Green,
        TimerMode::Free => Color::Cyan,
    }
}

/// Render the header.
fn render_header(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let mut title = format!(
        " {} - session {} ",
        app.machine.mode().display_name(),
        app.machine.session_number()
    );
    if let Some(name) = app.selected_subject_name() {
        title.push_str(&format!("- {name} "));
    }

    let color = mode_color(app.machine.mode());
    let header = Paragraph::new(title)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

    frame.render_widget(header, area);
}

/// Render the big clock.
fn render_clock(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let status = match app.machine.status() {
        TimerStatus::Idle => "idle",
        TimerStatus::Running => "running",
        TimerStatus::Paused => "paused",
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            app.machine.format_value(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(status, Style::default().fg(Color::DarkGray))),
    ];

    let clock = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(clock, area);
}

/// Render the progress gauge.
fn render_gauge(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    // A free timer has no target, so no meaningful progress.
    let ratio = if app.machine.mode() == TimerMode::Free {
        0.0
    } else {
        app.machine.progress().clamp(0.0, 1.0)
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(mode_color(app.machine.mode())))
        .ratio(ratio);

    frame.render_widget(gauge, area);
}

/// Render subjects and the profile.
fn render_info(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let today = chrono::Utc::now().date_naive();
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        format!(
            "Level {}  {} / {} XP",
            app.profile.level, app.profile.xp, app.profile.xp_to_next_level
        ),
        Style::default().fg(Color::Cyan),
    )));
    lines.push(Line::from(Span::styled(
        format!(
            "Streak {} day(s)  Today {}",
            app.profile.streak_on(today),
            app.profile.completed_on(today)
        ),
        Style::default().fg(Color::Yellow),
    )));
    lines.push(Line::from(""));

    if app.subjects.is_empty() {
        lines.push(Line::from(Span::styled(
            "No subjects yet. Add one with: studoro subject add <name>",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for (i, subject) in app.subjects.iter().enumerate().take(9) {
            let selected = app.machine.subject_id().is_some() && app.machine.subject_id() == subject.id;
            let marker = if selected { ">" } else { " " };
            let style = if selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!("{marker} {} {}", i + 1, subject.display_name()),
                style,
            )));
        }
    }

    let info = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Subjects (1-9 to select) "),
    );

    frame.render_widget(info, area);
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let status_text = app
        .status
        .as_deref()
        .unwrap_or("space:start/pause | r:reset | s:skip | m:mode | f:free | ?:help | q:quit");

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}
