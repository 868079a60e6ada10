//! Theme and styling definitions for the fermi TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(28, 30, 38);
    pub const FG: Color = Color::Rgb(220, 220, 230);
    pub const DIM: Color = Color::Rgb(135, 138, 158);

    // Accent colors
    pub const ACCENT: Color = Color::Rgb(125, 170, 255);

    // Role colors
    pub const USER: Color = Color::Rgb(125, 170, 255);
    pub const ASSISTANT: Color = Color::Rgb(140, 215, 145);

    // Status colors
    pub const ERROR: Color = Color::Rgb(240, 105, 105);

    // Border colors
    pub const BORDER: Color = Color::Rgb(78, 82, 104);

    // Status bar background
    pub const STATUS_BG: Color = Color::Rgb(42, 45, 58);

    // Code rendering
    pub const CODE_FG: Color = Color::Rgb(230, 205, 140);
}

/// Spinner frames for the busy indicator.
pub const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Accented text (prompt, hints).
    pub fn accent() -> Style {
        Style::default().fg(Palette::ACCENT).bg(Palette::BG)
    }

    /// Label for the user's turns.
    pub fn user_label() -> Style {
        Style::default()
            .fg(Palette::USER)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Label for the assistant's turns.
    pub fn assistant_label() -> Style {
        Style::default()
            .fg(Palette::ASSISTANT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Error notices.
    pub fn error() -> Style {
        Style::default().fg(Palette::ERROR).bg(Palette::BG)
    }

    /// Inline and fenced code.
    pub fn code() -> Style {
        Style::default().fg(Palette::CODE_FG).bg(Palette::BG)
    }

    /// Pane borders.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER).bg(Palette::BG)
    }

    /// The bottom status bar.
    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }
}
