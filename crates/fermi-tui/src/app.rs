//! Application state and update logic for the fermi TUI.

use crate::event::Action;
use crate::theme::SPINNER;
use crate::widgets::{InputState, TranscriptState};
use fermi_engine::{
    begin_turn, complete_turn, ModelError, PendingTurn, Session, Turn, TurnOutcome, ERROR_HINT,
};

/// How long a transient notice stays visible, in ticks (~6 s at 4 Hz).
const NOTICE_TICKS: usize = 24;

/// Lines moved per page scroll.
const PAGE_LINES: usize = 10;

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// The conversation session.
    pub session: Session,

    /// Input bar state.
    pub input: InputState,

    /// Transcript scroll state.
    pub transcript: TranscriptState,

    /// Whether a request is in flight.
    pub busy: bool,

    /// Tick counter for animations.
    pub tick: usize,

    /// Assistant label shown in the transcript and status bar.
    pub model_name: String,

    /// The user turn awaiting its reply, while busy.
    pending: Option<PendingTurn>,

    /// Transient notice (displayed temporarily, cleared after some ticks).
    notice: Option<String>,

    /// Ticks remaining until the notice is cleared.
    notice_ttl: usize,
}

impl App {
    /// Create the app with a freshly initialized session.
    pub fn new(model_name: impl Into<String>) -> Self {
        let mut session = Session::new();
        session.initialize();
        Self {
            should_quit: false,
            session,
            input: InputState::new(),
            transcript: TranscriptState::new(),
            busy: false,
            tick: 0,
            model_name: model_name.into(),
            pending: None,
            notice: None,
            notice_ttl: 0,
        }
    }

    /// Handle a non-text action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::NewSession => {
                // A reset mid-request would orphan the pending turn.
                if !self.busy {
                    self.session.reset();
                    self.transcript = TranscriptState::new();
                    self.clear_notice();
                }
            }
            Action::ScrollUp => self.transcript.scroll_up(1),
            Action::ScrollDown => self.transcript.scroll_down(1),
            Action::PageUp => self.transcript.scroll_up(PAGE_LINES),
            Action::PageDown => self.transcript.scroll_down(PAGE_LINES),
            Action::JumpToBottom => self.transcript.jump_to_bottom(),
            Action::None => {}
        }
    }

    /// Advance animations and expire the notice.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.notice_ttl > 0 {
            self.notice_ttl -= 1;
            if self.notice_ttl == 0 {
                self.notice = None;
            }
        }
    }

    /// Step 1 of a turn: record the input and hand back the request
    /// contents, or `None` when the submission is gated (busy, or blank
    /// input).
    pub fn submit(&mut self) -> Option<Vec<Turn>> {
        if self.busy {
            return None;
        }
        let text = self.input.submit();
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let pending = begin_turn(&mut self.session, text);
        let contents = pending.contents().to_vec();
        self.pending = Some(pending);
        self.busy = true;
        self.transcript.jump_to_bottom();
        Some(contents)
    }

    /// Step 3 of a turn, once the spawned request resolves.
    pub fn finish(&mut self, result: Result<String, ModelError>) {
        self.busy = false;
        let Some(pending) = self.pending.take() else {
            return;
        };
        let outcome = complete_turn(&mut self.session, pending, result);
        if let TurnOutcome::Failed { error } = outcome {
            self.push_notice(format!("{error}. {ERROR_HINT}"));
        }
        self.transcript.jump_to_bottom();
    }

    /// Show a transient notice; it decays after [`NOTICE_TICKS`].
    pub fn push_notice(&mut self, notice: String) {
        self.notice = Some(notice);
        self.notice_ttl = NOTICE_TICKS;
    }

    /// The current notice, if one is visible.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn clear_notice(&mut self) {
        self.notice = None;
        self.notice_ttl = 0;
    }

    /// Current spinner frame for the busy indicator.
    pub fn spinner_frame(&self) -> usize {
        self.tick % SPINNER.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fermi_engine::Role;

    fn app() -> App {
        App::new("gemini-1.5-flash")
    }

    #[test]
    fn test_new_app_has_seeded_session() {
        let app = app();
        assert_eq!(app.session.history().len(), 2);
        assert!(!app.busy);
    }

    #[test]
    fn test_submit_records_user_turn_and_goes_busy() {
        let mut app = app();
        app.input.insert_str("Apa rumus gaya?");

        let contents = app.submit().expect("submission should go through");
        assert!(app.busy);
        assert_eq!(app.session.history().len(), 3);
        assert_eq!(app.session.history()[2].role, Role::User);
        // Request carries the seeds plus the new turn.
        assert_eq!(contents.len(), 3);
    }

    #[test]
    fn test_submit_is_gated_while_busy() {
        let mut app = app();
        app.input.insert_str("Apa rumus gaya?");
        app.submit().unwrap();

        app.input.insert_str("another question");
        assert!(app.submit().is_none());
        assert_eq!(app.session.history().len(), 3);
    }

    #[test]
    fn test_blank_input_is_not_dispatched() {
        let mut app = app();
        app.input.insert_str("   ");
        assert!(app.submit().is_none());
        assert_eq!(app.session.history().len(), 2);
    }

    #[test]
    fn test_finish_with_reply_appends_model_turn() {
        let mut app = app();
        app.input.insert_str("Apa rumus gaya?");
        app.submit().unwrap();

        app.finish(Ok("F = m a".into()));
        assert!(!app.busy);
        assert_eq!(app.session.history().len(), 4);
        assert_eq!(app.session.history()[3].text, "F = m a");
        assert!(app.notice().is_none());
    }

    #[test]
    fn test_finish_with_failure_surfaces_notice_only() {
        let mut app = app();
        app.input.insert_str("Apa rumus gaya?");
        app.submit().unwrap();

        app.finish(Err(ModelError::Timeout(60)));
        assert!(!app.busy);
        // History ends with the user turn; the error is not a turn.
        assert_eq!(app.session.history().len(), 3);
        assert_eq!(app.session.history()[2].role, Role::User);
        let notice = app.notice().unwrap();
        assert!(notice.contains("timed out"));
        assert!(notice.contains("Likely causes"));

        // The next submission still works.
        app.input.insert_str("Apa rumus kecepatan?");
        assert!(app.submit().is_some());
    }

    #[test]
    fn test_notice_expires_after_ttl() {
        let mut app = app();
        app.push_notice("something went wrong".into());
        assert!(app.notice().is_some());

        for _ in 0..NOTICE_TICKS {
            app.tick();
        }
        assert!(app.notice().is_none());
    }

    #[test]
    fn test_new_session_resets_history() {
        let mut app = app();
        app.input.insert_str("Apa rumus gaya?");
        app.submit().unwrap();
        app.finish(Ok("F = m a".into()));

        app.handle_action(Action::NewSession);
        assert_eq!(app.session.history().len(), 2);
    }

    #[test]
    fn test_new_session_is_gated_while_busy() {
        let mut app = app();
        app.input.insert_str("Apa rumus gaya?");
        app.submit().unwrap();

        app.handle_action(Action::NewSession);
        assert_eq!(app.session.history().len(), 3);
        assert!(app.busy);
    }
}
