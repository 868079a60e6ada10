//! fermi-tui: Terminal UI for the fermi physics chat client
//!
//! This crate provides the chat interface over `fermi-engine`:
//! - A scrollable transcript rendering each turn tagged by role
//! - An input bar with cursor editing and input history
//! - A status bar with key hints, the model caption, and transient notices
//!
//! The interface accepts one request at a time: while a call is in flight
//! the input bar is inert and the status bar animates a busy indicator.

mod app;
mod event;
pub mod text;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use fermi_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, KeyEvent, KeyEventKind, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fermi_engine::{ChatModel, ModelError};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Frame, Terminal,
};
use std::io::{self, stdout};
use std::sync::Arc;
use tokio::task::JoinHandle;

use widgets::{InputBar, StatusBar, Transcript};

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// This is the main entry point. It sets up the terminal, runs the event
/// loop against the given model, and restores the terminal on exit.
pub async fn run_tui(model: Arc<dyn ChatModel>) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(model.name().to_string());

    // Create event handler (4 Hz tick rate = 250ms)
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events, model).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

/// One in-flight request at most; the handle is polled each frame.
type RequestHandle = JoinHandle<Result<String, ModelError>>;

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    model: Arc<dyn ChatModel>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut request: Option<RequestHandle> = None;

    loop {
        // Draw
        terminal.draw(|frame| draw(frame, app))?;

        // Fold in a finished request before accepting more input.
        if let Some(handle) = request.take() {
            if handle.is_finished() {
                match handle.await {
                    Ok(result) => app.finish(result),
                    Err(join_err) => app.finish(Err(ModelError::Other(format!(
                        "request task failed: {join_err}"
                    )))),
                }
            } else {
                request = Some(handle);
            }
        }

        // Handle events
        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if !handle_input_key(app, key, &mut request, &model) {
                        app.handle_action(key_to_action(key));
                    }
                }
                Event::Key(_) => {}
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => app.handle_action(Action::ScrollUp),
                    MouseEventKind::ScrollDown => app.handle_action(Action::ScrollDown),
                    _ => {}
                },
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
            }
        }

        if app.should_quit {
            if let Some(handle) = request {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let chunks = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .split(frame.area());

    let transcript = Transcript::new(app.session.history(), &app.model_name)
        .busy(app.busy)
        .spinner_frame(app.spinner_frame());
    frame.render_stateful_widget(transcript, chunks[0], &mut app.transcript);

    let input = InputBar::new(&app.input).busy(app.busy);
    frame.render_widget(input, chunks[1]);

    let status = StatusBar::new(&app.model_name)
        .busy(app.busy, app.spinner_frame())
        .notice(app.notice());
    frame.render_widget(status, chunks[2]);
}

/// Handle a key destined for the input bar.
/// Returns true if the key was consumed (should not be processed as an action).
fn handle_input_key(
    app: &mut App,
    key: KeyEvent,
    request: &mut Option<RequestHandle>,
    model: &Arc<dyn ChatModel>,
) -> bool {
    use crossterm::event::{KeyCode, KeyModifiers};

    // Chords belong to the action map.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    match key.code {
        // Enter dispatches the turn (gated inside submit while busy/blank).
        KeyCode::Enter => {
            if let Some(contents) = app.submit() {
                let model = Arc::clone(model);
                *request = Some(tokio::spawn(
                    async move { model.generate(&contents).await },
                ));
            }
            true
        }

        // Text editing, inert while a request is in flight.
        KeyCode::Char(c) => {
            if !app.busy {
                app.input.insert(c);
            }
            true
        }
        KeyCode::Backspace => {
            if !app.busy {
                app.input.backspace();
            }
            true
        }
        KeyCode::Delete => {
            if !app.busy {
                app.input.delete();
            }
            true
        }
        KeyCode::Left => {
            app.input.move_left();
            true
        }
        KeyCode::Right => {
            app.input.move_right();
            true
        }
        KeyCode::Home => {
            app.input.move_home();
            true
        }
        KeyCode::End => {
            app.input.move_end();
            true
        }

        // Up/Down recall input history when the draft is empty, otherwise
        // scroll the transcript.
        KeyCode::Up => {
            if app.input.is_empty() && !app.busy {
                app.input.history_prev();
            } else {
                app.transcript.scroll_up(1);
            }
            true
        }
        KeyCode::Down => {
            if app.input.is_empty() && !app.busy {
                app.input.history_next();
            } else {
                app.transcript.scroll_down(1);
            }
            true
        }

        _ => false,
    }
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
