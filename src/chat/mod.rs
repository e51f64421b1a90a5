//! Chat pipeline: validation, provider call, fallback and reply envelope.

pub mod errors;
pub mod orchestrator;
pub mod types;

pub use errors::{ChatError, ChatResult};
pub use orchestrator::ResponseOrchestrator;
pub use types::{ChatMessage, ReplyEnvelope, message_id};
