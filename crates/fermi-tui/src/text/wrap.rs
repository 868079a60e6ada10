//! Width-aware wrapping for styled lines.
//!
//! ratatui's own `Wrap` hides the wrapped line count, which the transcript
//! needs for scroll clamping, so wrapping happens here instead: each styled
//! line is broken at the widths textwrap picks, and spans are rebuilt so
//! styling survives the break.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// Wrap styled lines to fit within `width` columns.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }

    let mut result = Vec::new();
    for line in lines {
        result.extend(wrap_line(line, width));
    }
    result
}

fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    let display_width: usize = line
        .spans
        .iter()
        .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
        .sum();
    if display_width <= width {
        return vec![line];
    }

    // Flatten to a char stream so break points can land inside spans.
    let mut chars: Vec<(char, Style)> = Vec::new();
    for span in &line.spans {
        for ch in span.content.chars() {
            chars.push((ch, span.style));
        }
    }
    let plain: String = chars.iter().map(|(ch, _)| ch).collect();

    let mut result = Vec::new();
    let mut idx = 0;

    for piece in textwrap::wrap(&plain, width) {
        // textwrap drops the whitespace it breaks on; skip past it in the
        // char stream so styles stay aligned.
        while idx < chars.len() {
            let (ch, _) = chars[idx];
            if ch.is_whitespace() && !piece.starts_with(ch) {
                idx += 1;
            } else {
                break;
            }
        }

        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut run = String::new();
        let mut run_style: Option<Style> = None;

        for _ in piece.chars() {
            let Some(&(ch, style)) = chars.get(idx) else {
                break;
            };
            idx += 1;

            match run_style {
                Some(current) if current == style => run.push(ch),
                Some(current) => {
                    spans.push(Span::styled(std::mem::take(&mut run), current));
                    run.push(ch);
                    run_style = Some(style);
                }
                None => {
                    run.push(ch);
                    run_style = Some(style);
                }
            }
        }

        if let Some(style) = run_style {
            if !run.is_empty() {
                spans.push(Span::styled(run, style));
            }
        }
        if !spans.is_empty() {
            result.push(Line::from(spans));
        }
    }

    if result.is_empty() {
        result.push(Line::from(""));
    }
    result
}
