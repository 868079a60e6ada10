//! Scrollable conversation transcript.
//!
//! Renders every history turn tagged by role, with markdown bodies wrapped
//! to the pane width. Scrolling is clamped at render time, when the wrapped
//! line count is known; follow mode pins the view to the newest turn.

use fermi_engine::{Role, Turn};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use crate::text::{render_markdown, wrap_lines};
use crate::theme::{Styles, SPINNER};

/// Scroll state for the transcript pane.
#[derive(Debug, Clone)]
pub struct TranscriptState {
    /// First visible line (clamped during render).
    pub scroll: usize,
    /// Whether the view sticks to the newest content.
    pub follow: bool,
}

impl TranscriptState {
    /// Create a state that follows the newest content.
    pub fn new() -> Self {
        Self {
            scroll: 0,
            follow: true,
        }
    }

    /// Scroll up, leaving follow mode.
    pub fn scroll_up(&mut self, lines: usize) {
        self.follow = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scroll down; render clamps and re-enters follow mode at the bottom.
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    /// Jump to the newest content and stay there.
    pub fn jump_to_bottom(&mut self) {
        self.follow = true;
    }
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

/// The transcript pane widget.
pub struct Transcript<'a> {
    turns: &'a [Turn],
    assistant_label: &'a str,
    busy: bool,
    spinner_frame: usize,
}

impl<'a> Transcript<'a> {
    /// Create a transcript over the given turns.
    pub fn new(turns: &'a [Turn], assistant_label: &'a str) -> Self {
        Self {
            turns,
            assistant_label,
            busy: false,
            spinner_frame: 0,
        }
    }

    /// Show the thinking indicator below the last turn.
    #[must_use]
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    /// Spinner frame for the thinking indicator.
    #[must_use]
    pub fn spinner_frame(mut self, frame: usize) -> Self {
        self.spinner_frame = frame;
        self
    }

    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let body_width = width.saturating_sub(2);
        let mut lines = Vec::new();

        for turn in self.turns {
            let label = match turn.role {
                Role::User => Span::styled("you".to_string(), Styles::user_label()),
                Role::Model => Span::styled(
                    self.assistant_label.to_string(),
                    Styles::assistant_label(),
                ),
            };
            let stamp = turn.timestamp.format("%H:%M").to_string();
            lines.push(Line::from(vec![
                label,
                Span::raw("  "),
                Span::styled(stamp, Styles::dim()),
            ]));

            for body_line in wrap_lines(render_markdown(&turn.text), body_width) {
                let mut spans = vec![Span::raw("  ")];
                spans.extend(body_line.spans);
                lines.push(Line::from(spans));
            }
            lines.push(Line::from(""));
        }

        if self.busy {
            let frame = SPINNER[self.spinner_frame % SPINNER.len()];
            lines.push(Line::from(Span::styled(
                format!("{frame} thinking..."),
                Styles::dim(),
            )));
        }

        lines
    }
}

impl StatefulWidget for Transcript<'_> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TranscriptState) {
        let block = Block::default()
            .title(" Conversation ")
            .title_style(Styles::default())
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .style(Styles::default());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let lines = self.build_lines(inner.width as usize);
        let max_scroll = lines.len().saturating_sub(inner.height as usize);

        if state.follow {
            state.scroll = max_scroll;
        } else {
            state.scroll = state.scroll.min(max_scroll);
            if state.scroll == max_scroll {
                state.follow = true;
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let offset = state.scroll.min(u16::MAX as usize) as u16;
        Paragraph::new(lines)
            .style(Styles::default())
            .scroll((offset, 0))
            .render(inner, buf);
    }
}
