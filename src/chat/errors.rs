//! Error types for the chat pipeline.

use thiserror::Error;

/// Chat error type.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ChatError {
    /// Message was empty after trimming.
    #[error("Message is required")]
    EmptyMessage,
}

/// Convenience result alias for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;
