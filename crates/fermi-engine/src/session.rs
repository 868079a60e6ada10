//! Session state for fermi conversations.
//!
//! A [`Session`] owns two ordered turn sequences: the display history
//! (everything the user sees) and the context mirror (everything the remote
//! model has acknowledged). The two stay in lockstep except on the
//! soft-empty reply path, where a local fallback notice is shown but never
//! sent upstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a turn's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing into the chat.
    User,
    /// The remote model (or a locally generated notice shown in its place).
    Model,
}

/// A single message in a conversation. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Role of the turn's author.
    pub role: Role,
    /// Message content.
    pub text: String,
    /// Timestamp of the turn.
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a new user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Instruction primer seeded as the first turn of every session.
pub const PRIMER: &str = "You are a physics expert. Answer with the relevant \
physics formulas. Keep answers short. Refuse questions that are not about \
physics.";

/// The canned acknowledgment paired with the primer.
pub const PRIMER_ACK: &str = "Understood! Tell me which formula you would \
like to know.";

/// In-memory state for one chat session.
///
/// History is append-only: turns are never edited or removed, only pushed.
/// `reset` is the sole way to discard turns, and it starts a fresh seeded
/// sequence rather than mutating the old one.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    history: Vec<Turn>,
    context: Vec<Turn>,
}

impl Session {
    /// Create an empty, uninitialized session.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            history: Vec::new(),
            context: Vec::new(),
        }
    }

    /// Seed the history and the context mirror with the primer exchange.
    ///
    /// Idempotent: calling this on an already initialized session is a
    /// no-op. Pure in-memory construction, no error conditions.
    pub fn initialize(&mut self) {
        if self.is_initialized() {
            return;
        }
        let primer = Turn::user(PRIMER);
        let ack = Turn::model(PRIMER_ACK);
        self.history = vec![primer.clone(), ack.clone()];
        self.context = vec![primer, ack];
    }

    /// Discard all turns and re-seed, keeping the session id.
    pub fn reset(&mut self) {
        self.history.clear();
        self.context.clear();
        self.initialize();
    }

    /// Whether the session has been seeded.
    pub fn is_initialized(&self) -> bool {
        !self.history.is_empty()
    }

    /// Unique session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display history, in conversation order.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// The turns the remote model has acknowledged, in conversation order.
    pub fn context(&self) -> &[Turn] {
        &self.context
    }

    /// Append a turn to the display history.
    pub fn append(&mut self, turn: Turn) {
        self.history.push(turn);
    }

    /// Record a turn as acknowledged by the remote model.
    pub(crate) fn commit(&mut self, turn: Turn) {
        self.context.push(turn);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_constructors() {
        let user = Turn::user("Apa rumus gaya?");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.text, "Apa rumus gaya?");

        let model = Turn::model("F = m a");
        assert_eq!(model.role, Role::Model);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
    }

    #[test]
    fn test_initialize_seeds_history_and_context() {
        let mut session = Session::new();
        assert!(!session.is_initialized());

        session.initialize();
        assert!(session.is_initialized());
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[0].role, Role::User);
        assert_eq!(session.history()[0].text, PRIMER);
        assert_eq!(session.history()[1].role, Role::Model);
        assert_eq!(session.history()[1].text, PRIMER_ACK);
        assert_eq!(session.context().len(), 2);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut session = Session::new();
        session.initialize();
        session.append(Turn::user("hello"));

        session.initialize();
        assert_eq!(session.history().len(), 3, "re-initialize must be a no-op");
    }

    #[test]
    fn test_history_is_append_only() {
        let mut session = Session::new();
        session.initialize();

        let before: Vec<String> = session.history().iter().map(|t| t.text.clone()).collect();
        session.append(Turn::user("first"));
        session.append(Turn::model("second"));

        // Earlier turns are untouched and length only grows.
        assert_eq!(session.history().len(), before.len() + 2);
        for (i, text) in before.iter().enumerate() {
            assert_eq!(&session.history()[i].text, text);
        }
    }

    #[test]
    fn test_reset_reseeds_and_keeps_id() {
        let mut session = Session::new();
        session.initialize();
        let id = session.id().to_string();
        session.append(Turn::user("hello"));
        session.append(Turn::model("hi"));

        session.reset();
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[0].text, PRIMER);
        assert_eq!(session.id(), id);
    }
}
