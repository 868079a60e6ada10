//! Widgets for the fermi TUI.

pub mod input_bar;
pub mod status_bar;
pub mod transcript;

pub use input_bar::{InputBar, InputState};
pub use status_bar::StatusBar;
pub use transcript::{Transcript, TranscriptState};
