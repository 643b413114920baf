//! Terminal User Interface (TUI) for studoro.
//!
//! The full-screen timer. While the TUI is open it drives the machine
//! one tick per second; everything else goes through the same database
//! state as the CLI commands.
//! Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::App;

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::config::Config;
use crate::error::StudoroError;
use crate::storage::Database;

/// Run the TUI application.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run(db: &Database, config: &Config) -> Result<(), StudoroError> {
    // Setup terminal
    enable_raw_mode()
        .map_err(|e| StudoroError::Config(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| StudoroError::Config(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| StudoroError::Config(format!("Failed to create terminal: {e}")))?;

    // Create app state and run main loop
    let mut app = App::new(db, config)?;
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App<'_>) -> Result<(), StudoroError> {
    loop {
        // Draw UI
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| StudoroError::Config(format!("Failed to draw: {e}")))?;

        // Handle events
        if let Some(action) = event::handle_events(app)? {
            match action {
                event::Action::Quit => {
                    app.save()?;
                    break;
                }
                event::Action::Toggle => app.toggle()?,
                event::Action::Reset => app.reset()?,
                event::Action::Skip => app.skip()?,
                event::Action::CycleMode => app.cycle_mode()?,
                event::Action::ToggleFree => app.toggle_free()?,
                event::Action::Finish => app.finish_free()?,
            }
        }

        // Apply any ticks that came due while waiting
        app.on_tick()?;
    }

    Ok(())
}
