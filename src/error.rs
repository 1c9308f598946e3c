//! Error types for the triage engine.

use thiserror::Error;

/// Errors surfaced by the loading and rendering layers.
///
/// Classification itself is total over well-typed input and never fails;
/// these errors all originate at the caller-contract boundary.
#[derive(Debug, Error)]
pub enum TriageError {
    /// A raw event is structurally incomplete. The whole load is aborted so
    /// callers never receive a silently truncated batch.
    #[error("malformed input: event {index} has empty '{field}'")]
    EmptyField { index: usize, field: &'static str },

    /// The payload is not one of the accepted JSON shapes.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TriageError>;
