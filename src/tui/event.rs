//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};

use crate::error::StudoroError;
use crate::tui::app::App;

/// Action to take after handling an event.
pub enum Action {
    /// Quit the application.
    Quit,
    /// Start or pause the timer.
    Toggle,
    /// Reset the timer.
    Reset,
    /// Skip to the next mode.
    Skip,
    /// Cycle through the countdown modes.
    CycleMode,
    /// Toggle free mode.
    ToggleFree,
    /// Finish a free session.
    Finish,
}

/// Handle terminal events.
///
/// Returns an action to take, or None if no action is needed. The poll
/// timeout is short so the countdown stays visibly live.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events(app: &mut App<'_>) -> Result<Option<Action>, StudoroError> {
    if event::poll(Duration::from_millis(100))
        .map_err(|e| StudoroError::Config(format!("Event poll failed: {e}")))?
    {
        if let Event::Key(key) =
            event::read().map_err(|e| StudoroError::Config(format!("Event read failed: {e}")))?
        {
            // Handle Ctrl+C
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Ok(Some(Action::Quit));
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(Action::Quit)),

                KeyCode::Char(' ') => return Ok(Some(Action::Toggle)),

                KeyCode::Char('r') => return Ok(Some(Action::Reset)),

                KeyCode::Char('s') => return Ok(Some(Action::Skip)),

                KeyCode::Char('m') => return Ok(Some(Action::CycleMode)),

                KeyCode::Char('f') => return Ok(Some(Action::ToggleFree)),

                KeyCode::Enter => return Ok(Some(Action::Finish)),

                // Subject selection by number
                KeyCode::Char(c @ '1'..='9') => {
                    let index = (c as usize) - ('1' as usize);
                    app.select_subject(index);
                }

                KeyCode::Char('?') => {
                    app.status = Some(
                        "space:start/pause | r:reset | s:skip | m:mode | f:free | Enter:finish free | 1-9:subject | q:quit"
                            .to_string(),
                    );
                }

                _ => {}
            }
        }
    }

    Ok(None)
}
