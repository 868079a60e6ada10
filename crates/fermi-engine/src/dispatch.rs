//! Turn dispatch: one request/response cycle per user input.
//!
//! A turn runs in three steps. [`begin_turn`] records the user's message in
//! the display history before anything touches the network, so it stays
//! visible whatever happens next. The request itself is a single bounded
//! call through the [`ChatModel`] seam. [`complete_turn`] folds the result
//! back into the session and reports a [`TurnOutcome`]. [`dispatch_turn`]
//! composes the three for headless callers; the TUI drives begin/complete
//! around a spawned request so it can keep painting.

use crate::session::{Session, Turn};
use async_trait::async_trait;
use std::time::Instant;

/// Shown in place of the model's reply when a successful call returns no
/// usable text. Appended to the display history only, never sent upstream.
pub const FALLBACK_NOTICE: &str = "Sorry, I couldn't come up with a reply.";

/// Advisory appended to every surfaced request failure.
pub const ERROR_HINT: &str = "Likely causes: no network connection, an \
invalid API key, or an exhausted quota.";

/// Failure detail for a remote model call.
///
/// The variants keep the taxonomy explicit and testable; callers surface
/// them all the same way (one generic notice plus the raw detail) and never
/// branch on them or retry.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Could not reach the API at all.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The API rejected the credential.
    #[error("invalid API credential: {0}")]
    Auth(String),

    /// Quota or rate limit exceeded.
    #[error("quota or rate limit exceeded: {0}")]
    Quota(String),

    /// The bounded wait elapsed with no response.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// The API answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Anything that fits none of the above.
    #[error("{0}")]
    Other(String),
}

/// Seam to the remote model, so tests can substitute a scripted double.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a reply to the given conversation. An `Ok` with an empty or
    /// whitespace-only string is the soft-empty signal, distinct from `Err`.
    async fn generate(&self, contents: &[Turn]) -> Result<String, ModelError>;

    /// Display name of the model, for the UI and logs.
    fn name(&self) -> &str;
}

/// A user turn already recorded in history, awaiting its reply.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    user: Turn,
    contents: Vec<Turn>,
}

impl PendingTurn {
    /// The full conversation to send: acknowledged context plus the new
    /// user turn.
    pub fn contents(&self) -> &[Turn] {
        &self.contents
    }
}

/// Observable result of one dispatched turn.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The model replied; the reply is now the last history turn.
    Replied { text: String },
    /// The call succeeded but carried no usable text; the fallback notice
    /// is now the last history turn.
    NoReply,
    /// The call failed; history ends with the user's turn and the error is
    /// for transient display only.
    Failed { error: ModelError },
}

/// Step 1: record the user's turn and snapshot the request contents.
///
/// The session must be initialized and `text` non-empty; both are the
/// caller's contract.
pub fn begin_turn(session: &mut Session, text: impl Into<String>) -> PendingTurn {
    debug_assert!(session.is_initialized());
    let user = Turn::user(text);
    debug_assert!(!user.text.is_empty());

    session.append(user.clone());

    let mut contents = session.context().to_vec();
    contents.push(user.clone());
    PendingTurn { user, contents }
}

/// Step 3: fold the model's result back into the session.
pub fn complete_turn(
    session: &mut Session,
    pending: PendingTurn,
    result: Result<String, ModelError>,
) -> TurnOutcome {
    match result {
        Ok(reply) if !reply.trim().is_empty() => {
            let turn = Turn::model(reply.clone());
            session.append(turn.clone());
            session.commit(pending.user);
            session.commit(turn);
            TurnOutcome::Replied { text: reply }
        }
        Ok(_) => {
            // The notice is local-only: the remote context keeps just the
            // user turn, so history and context diverge here. This mirrors
            // the upstream service's own bookkeeping for empty replies.
            session.append(Turn::model(FALLBACK_NOTICE));
            session.commit(pending.user);
            TurnOutcome::NoReply
        }
        Err(error) => {
            tracing::warn!(error = %error, "model call failed, turn left unreplied");
            TurnOutcome::Failed { error }
        }
    }
}

/// Run a full turn: record the input, call the model once, fold the result.
pub async fn dispatch_turn(
    session: &mut Session,
    model: &dyn ChatModel,
    text: impl Into<String>,
) -> TurnOutcome {
    let pending = begin_turn(session, text);
    let start = Instant::now();
    let result = model.generate(pending.contents()).await;

    #[allow(clippy::cast_possible_truncation)]
    let duration_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        model = model.name(),
        duration_ms,
        ok = result.is_ok(),
        "turn dispatched"
    );

    complete_turn(session, pending, result)
}
