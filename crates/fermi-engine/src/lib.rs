//! fermi-engine: Headless engine for the fermi physics chat client
//!
//! This crate provides the conversation logic behind the TUI, including:
//! - Session state (append-only history plus the remote-context mirror)
//! - Turn dispatch with a tagged outcome per exchange
//! - The Gemini HTTP client
//! - Runtime settings

pub mod config;
pub mod dispatch;
pub mod gemini;
pub mod session;

// Re-export commonly used types
pub use config::{ConfigError, GenerationParams, Settings, API_KEY_VAR, DEFAULT_MODEL};
pub use dispatch::{
    begin_turn, complete_turn, dispatch_turn, ChatModel, ModelError, PendingTurn, TurnOutcome,
    ERROR_HINT, FALLBACK_NOTICE,
};
pub use gemini::GeminiClient;
pub use session::{Role, Session, Turn, PRIMER, PRIMER_ACK};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
