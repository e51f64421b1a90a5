//! Error types for the journal.

use thiserror::Error;

/// Journal error type.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum JournalError {
    /// Entry text was empty after trimming.
    #[error("Text is required")]
    EmptyText,
}

/// Convenience result alias for journal operations.
pub type JournalResult<T> = Result<T, JournalError>;
