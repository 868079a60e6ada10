//! Single-line chat input with cursor editing and input history.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::line,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::Styles;

const PROMPT: &str = "> ";
const PLACEHOLDER: &str = "Ask a physics question...";
const BUSY_PLACEHOLDER: &str = "Waiting for the reply...";

/// The input area: a divider row followed by the prompt line.
pub struct InputBar<'a> {
    state: &'a InputState,
    busy: bool,
}

impl<'a> InputBar<'a> {
    /// Create an input bar over the given state.
    pub fn new(state: &'a InputState) -> Self {
        Self { state, busy: false }
    }

    /// While busy the bar is inert: no cursor, a waiting placeholder.
    #[must_use]
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    fn prompt_line(&self, width: usize) -> Line<'static> {
        if self.busy {
            return Line::from(vec![
                Span::styled(PROMPT, Styles::dim()),
                Span::styled(BUSY_PLACEHOLDER, Styles::dim()),
            ]);
        }

        if self.state.is_empty() {
            return Line::from(vec![
                Span::styled(PROMPT, Styles::accent()),
                Span::styled("_", Styles::default()),
                Span::styled(PLACEHOLDER, Styles::dim()),
            ]);
        }

        // Keep the cursor visible: when the content overflows, show the
        // tail window that ends just past the cursor.
        let available = width.saturating_sub(PROMPT.len() + 1);
        let chars: Vec<char> = self.state.content().chars().collect();
        let cursor = self.state.cursor();

        let mut start = 0;
        let visible_width = |slice: &[char]| -> usize {
            let s: String = slice.iter().collect();
            UnicodeWidthStr::width(s.as_str())
        };
        while start < cursor && visible_width(&chars[start..cursor]) >= available {
            start += 1;
        }

        let before: String = chars[start..cursor].iter().collect();
        let after: String = chars[cursor..].iter().collect();

        let mut spans = vec![
            Span::styled(PROMPT, Styles::accent()),
            Span::styled(before, Styles::default()),
        ];
        if after.is_empty() {
            spans.push(Span::styled("_", Styles::default()));
        } else {
            let mut rest = after.chars();
            let under = rest.next().unwrap_or(' ');
            spans.push(Span::styled(
                under.to_string(),
                Styles::accent().add_modifier(ratatui::style::Modifier::REVERSED),
            ));
            spans.push(Span::styled(rest.collect::<String>(), Styles::default()));
        }
        Line::from(spans)
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let divider = line::HORIZONTAL.repeat(area.width as usize);
        let mut lines = vec![Line::from(Span::styled(divider, Styles::border()))];
        if area.height > 1 {
            lines.push(self.prompt_line(area.width as usize));
        }

        Paragraph::new(lines)
            .style(Styles::default())
            .render(area, buf);
    }
}

/// State for the input bar: content, cursor, and submitted-input history.
///
/// The cursor is a character index; byte offsets are derived on demand so
/// multibyte input stays editable.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    content: String,
    cursor: usize,
    history: Vec<String>,
    history_index: Option<usize>,
    saved_input: String,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Cursor position as a character index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor)
            .map_or(self.content.len(), |(i, _)| i)
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index();
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_index();
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.content.remove(at);
        }
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index();
            self.content.remove(at);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Take the content, recording non-blank submissions in history.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        if !content.trim().is_empty() {
            self.history.push(content.clone());
        }
        self.history_index = None;
        self.saved_input.clear();
        content
    }

    /// Recall the previous submitted input.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next_index = match self.history_index {
            None => {
                self.saved_input = self.content.clone();
                0
            }
            Some(i) if i + 1 < self.history.len() => i + 1,
            Some(i) => i,
        };
        self.history_index = Some(next_index);
        self.content = self.history[self.history.len() - 1 - next_index].clone();
        self.cursor = self.char_count();
    }

    /// Walk back toward the most recent input, restoring the draft at the end.
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.history_index = None;
                self.content = std::mem::take(&mut self.saved_input);
                self.cursor = self.char_count();
            }
            Some(i) => {
                self.history_index = Some(i - 1);
                self.content = self.history[self.history.len() - i].clone();
                self.cursor = self.char_count();
            }
        }
    }
}
