//! Markdown rendering using pulldown-cmark.
//!
//! Converts a turn's text into styled ratatui lines. Only the constructs
//! that show up in chat replies are handled: headings, emphasis, inline and
//! fenced code, lists, block quotes, and rules. Links render as their text.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::theme::Styles;

/// Render markdown text to styled ratatui lines.
pub fn render_markdown(input: &str) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut renderer = Renderer::default();
    for event in Parser::new_ext(input, options) {
        renderer.handle_event(event);
    }
    renderer.finish()
}

/// Internal renderer that processes pulldown-cmark events.
#[derive(Default)]
struct Renderer {
    lines: Vec<Line<'static>>,
    current_spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    in_code_block: bool,
    list_depth: usize,
    pending_marker: Option<String>,
}

fn is_blank(line: &Line<'_>) -> bool {
    line.spans.iter().all(|s| s.content.is_empty())
}

impl Renderer {
    fn current_style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_else(Styles::default)
    }

    fn push_span(&mut self, text: &str, style: Style) {
        if let Some(marker) = self.pending_marker.take() {
            self.current_spans.push(Span::styled(marker, Styles::dim()));
        }
        self.current_spans.push(Span::styled(text.to_string(), style));
    }

    fn flush_line(&mut self) {
        if !self.current_spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current_spans)));
        }
    }

    fn blank_line(&mut self) {
        self.flush_line();
        let last_is_blank = self.lines.last().is_some_and(is_blank);
        if !self.lines.is_empty() && !last_is_blank {
            self.lines.push(Line::from(""));
        }
    }

    #[allow(clippy::too_many_lines)]
    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                self.blank_line();
                self.style_stack
                    .push(Styles::accent().add_modifier(Modifier::BOLD));
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush_line();
                self.style_stack.pop();
            }

            Event::Start(Tag::Emphasis) => {
                self.style_stack
                    .push(self.current_style().add_modifier(Modifier::ITALIC));
            }
            Event::End(TagEnd::Emphasis) => {
                self.style_stack.pop();
            }

            Event::Start(Tag::Strong) => {
                self.style_stack
                    .push(self.current_style().add_modifier(Modifier::BOLD));
            }
            Event::End(TagEnd::Strong) => {
                self.style_stack.pop();
            }

            Event::Start(Tag::Strikethrough) => {
                self.style_stack
                    .push(self.current_style().add_modifier(Modifier::CROSSED_OUT));
            }
            Event::End(TagEnd::Strikethrough) => {
                self.style_stack.pop();
            }

            Event::Start(Tag::BlockQuote) => {
                self.flush_line();
                self.style_stack.push(Styles::dim());
                self.pending_marker = Some("> ".into());
            }
            Event::End(TagEnd::BlockQuote) => {
                self.flush_line();
                self.style_stack.pop();
            }

            Event::Start(Tag::CodeBlock(_)) => {
                self.flush_line();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.in_code_block = false;
            }

            Event::Start(Tag::List(_)) => {
                self.flush_line();
                self.list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                self.list_depth = self.list_depth.saturating_sub(1);
            }
            Event::Start(Tag::Item) => {
                self.flush_line();
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                self.pending_marker = Some(format!("{indent}- "));
            }
            Event::End(TagEnd::Item) => {
                self.flush_line();
            }
            Event::TaskListMarker(checked) => {
                let mark = if checked { "[x] " } else { "[ ] " };
                self.push_span(mark, Styles::dim());
            }

            Event::Start(Tag::Paragraph) => {
                if !self.lines.is_empty() {
                    self.blank_line();
                }
            }
            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
            }

            // Links render as their text content.
            Event::Start(Tag::Link { .. }) => {
                self.style_stack
                    .push(Styles::accent().add_modifier(Modifier::UNDERLINED));
            }
            Event::End(TagEnd::Link) => {
                self.style_stack.pop();
            }

            Event::Text(text) => {
                if self.in_code_block {
                    for code_line in text.lines() {
                        self.lines.push(Line::from(Span::styled(
                            format!("  {code_line}"),
                            Styles::code(),
                        )));
                    }
                } else {
                    let style = self.current_style();
                    self.push_span(&text, style);
                }
            }
            Event::Code(code) => {
                self.push_span(&code, Styles::code());
            }

            Event::SoftBreak => {
                self.push_span(" ", self.current_style());
            }
            Event::HardBreak => {
                self.flush_line();
            }

            Event::Rule => {
                self.flush_line();
                self.lines
                    .push(Line::from(Span::styled("────────", Styles::dim())));
            }

            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        // Trim leading/trailing blank lines.
        while self.lines.first().is_some_and(is_blank) {
            self.lines.remove(0);
        }
        while self.lines.last().is_some_and(is_blank) {
            self.lines.pop();
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_plain_paragraph() {
        let lines = render_markdown("Newton's second law relates force and mass.");
        assert_eq!(
            plain(&lines),
            vec!["Newton's second law relates force and mass."]
        );
    }

    #[test]
    fn test_strong_text_is_bold() {
        let lines = render_markdown("The formula is **F = m a** here.");
        let bold = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "F = m a")
            .unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_inline_code_style() {
        let lines = render_markdown("Use `E = m c^2` for rest energy.");
        let code = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "E = m c^2")
            .unwrap();
        assert_eq!(code.style, Styles::code());
    }

    #[test]
    fn test_code_block_lines_are_indented() {
        let lines = render_markdown("```\nv = s / t\na = dv / dt\n```");
        let texts = plain(&lines);
        assert_eq!(texts, vec!["  v = s / t", "  a = dv / dt"]);
    }

    #[test]
    fn test_list_items_get_markers() {
        let lines = render_markdown("- kinetic\n- potential");
        let texts = plain(&lines);
        assert_eq!(texts, vec!["- kinetic", "- potential"]);
    }

    #[test]
    fn test_paragraphs_are_separated() {
        let lines = render_markdown("First law.\n\nSecond law.");
        let texts = plain(&lines);
        assert_eq!(texts, vec!["First law.", "", "Second law."]);
    }

    #[test]
    fn test_heading_precedes_body() {
        let lines = render_markdown("# Kinematics\n\nThree equations.");
        let texts = plain(&lines);
        assert_eq!(texts[0], "Kinematics");
        assert!(texts.contains(&"Three equations.".to_string()));
    }
}
