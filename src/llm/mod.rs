//! Language-model provider access.
//!
//! - `prompt`: system instructions and history windowing
//! - `openai_chat`: OpenAI-compatible chat-completions client

pub mod openai_chat;
pub mod prompt;

pub use openai_chat::OpenAiChat;
pub use prompt::{PromptMessage, PromptRole, SYSTEM_PROMPT, build_messages, history_window};

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::chat::ChatMessage;

/// Boxed future type for provider operations.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Why the provider produced no text.
///
/// Callers treat every variant the same way; the reason exists for logs.
#[derive(Debug, Error)]
pub enum ProviderFailure {
    /// No credential configured.
    #[error("provider credential not configured")]
    NotConfigured,
    /// Transport, timeout or body decoding error.
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Non-success HTTP status.
    #[error("provider http status not ok: {0}")]
    HttpStatusNotOk(u16),
    /// Response decoded but carried no usable completion.
    #[error("provider response malformed: {0}")]
    Malformed(String),
}

/// Convenience result alias for provider calls.
pub type ProviderResult<T> = Result<T, ProviderFailure>;

/// Trait abstraction over chat-completion providers.
pub trait ChatProvider: Send + Sync {
    /// Generate a reply to `message` given prior turns, oldest first.
    ///
    /// # Errors
    /// Returns a [`ProviderFailure`] for any reason the provider gave no text.
    fn generate<'a>(
        &'a self,
        message: &'a str,
        history: &'a [ChatMessage],
    ) -> ProviderFuture<'a, ProviderResult<String>>;

    /// Whether the provider can be called at all.
    fn is_configured(&self) -> bool;
}
