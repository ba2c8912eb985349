//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using DrillError.
pub type Result<T> = std::result::Result<T, DrillError>;

/// Errors raised by the quiz engine.
///
/// None of these are fatal to a session: callers surface them as notices
/// and keep drilling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrillError {
    #[error("malformed blank markup at byte {position}: {reason}")]
    MalformedMarkup { position: usize, reason: &'static str },

    #[error("ledger entry no longer matches a loaded entry: {0}")]
    UnknownEntry(String),

    #[error("corrupt mistake ledger: {0}")]
    CorruptLedger(String),

    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    #[error("no entry is awaiting an answer")]
    NoActiveEntry,

    #[error("storage error: {0}")]
    Storage(String),
}
