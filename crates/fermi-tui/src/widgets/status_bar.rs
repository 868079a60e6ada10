//! Bottom status bar: key hints, model caption, busy spinner, notices.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{Palette, Styles, SPINNER};

const HINTS: &str = "enter send · ctrl+n new chat · ctrl+c quit";

/// One-line status bar.
pub struct StatusBar<'a> {
    model: &'a str,
    busy: bool,
    spinner_frame: usize,
    notice: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    /// Create a status bar showing the model caption.
    pub fn new(model: &'a str) -> Self {
        Self {
            model,
            busy: false,
            spinner_frame: 0,
            notice: None,
        }
    }

    /// Show the busy spinner.
    #[must_use]
    pub fn busy(mut self, busy: bool, spinner_frame: usize) -> Self {
        self.busy = busy;
        self.spinner_frame = spinner_frame;
        self
    }

    /// Show a transient notice instead of the key hints.
    #[must_use]
    pub fn notice(mut self, notice: Option<&'a str>) -> Self {
        self.notice = notice;
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let bar = Styles::status_bar();
        let left: Vec<Span<'_>> = if let Some(notice) = self.notice {
            vec![Span::styled(
                format!(" {notice}"),
                Styles::error().bg(Palette::STATUS_BG),
            )]
        } else {
            vec![Span::styled(format!(" {HINTS}"), bar)]
        };

        let right = if self.busy {
            let frame = SPINNER[self.spinner_frame % SPINNER.len()];
            format!("{frame} thinking · {} ", self.model)
        } else {
            format!("{} ", self.model)
        };

        let left_width: usize = left
            .iter()
            .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
            .sum();
        let right_width = UnicodeWidthStr::width(right.as_str());
        let padding = (area.width as usize).saturating_sub(left_width + right_width);

        let mut spans = left;
        spans.push(Span::styled(" ".repeat(padding), bar));
        spans.push(Span::styled(right, bar));

        Paragraph::new(Line::from(spans)).style(bar).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(bar: StatusBar<'_>, width: u16) -> String {
        let backend = TestBackend::new(width, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| frame.render_widget(bar, frame.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_hints_and_model_caption() {
        let content = render(StatusBar::new("gemini-1.5-flash"), 80);
        assert!(content.contains("enter send"));
        assert!(content.contains("gemini-1.5-flash"));
    }

    #[test]
    fn test_busy_shows_thinking() {
        let content = render(StatusBar::new("gemini-1.5-flash").busy(true, 0), 80);
        assert!(content.contains("thinking"));
    }

    #[test]
    fn test_notice_replaces_hints() {
        let content = render(
            StatusBar::new("gemini-1.5-flash")
                .notice(Some("request timed out after 60 seconds")),
            80,
        );
        assert!(content.contains("timed out"));
        assert!(!content.contains("enter send"));
    }
}
