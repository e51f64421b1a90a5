//! Prompt construction for the companion persona.

use serde::Serialize;

use crate::chat::ChatMessage;

/// Default number of history turns forwarded to the provider.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Persona and behavioural rules sent as the first message of every request.
pub const SYSTEM_PROMPT: &str = "You are AnBuddy, a compassionate AI mental health companion. Your role is to:
1. Provide empathetic and supportive responses
2. Help users process their emotions by asking gentle, open questions
3. Offer coping strategies when appropriate
4. Recognize when professional help might be needed
5. Maintain a warm, non-judgmental tone and keep replies concise
6. Never give medical advice or diagnose conditions

Always respond in a caring, supportive manner. If someone expresses severe distress or suicidal thoughts, \
encourage them to contact emergency services or a crisis hotline.";

/// Role of a prompt message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    /// Instructions.
    System,
    /// Human turn.
    User,
    /// Model turn.
    Assistant,
}

/// A single message of an outgoing prompt.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PromptMessage {
    /// Speaker.
    pub role: PromptRole,
    /// Text.
    pub content: String,
}

impl PromptMessage {
    /// Build a message.
    #[must_use]
    pub fn new(role: PromptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for PromptMessage {
    fn from(message: &ChatMessage) -> Self {
        let role = if message.is_user {
            PromptRole::User
        } else {
            PromptRole::Assistant
        };
        Self::new(role, message.text.as_str())
    }
}

/// The last `window` turns of `history`.
#[must_use]
pub fn history_window(history: &[ChatMessage], window: usize) -> &[ChatMessage] {
    &history[history.len().saturating_sub(window)..]
}

/// System prompt, then the windowed history, then the current message.
#[must_use]
pub fn build_messages(message: &str, history: &[ChatMessage], window: usize) -> Vec<PromptMessage> {
    let recent = history_window(history, window);
    let mut messages = Vec::with_capacity(recent.len() + 2);
    messages.push(PromptMessage::new(PromptRole::System, SYSTEM_PROMPT));
    messages.extend(recent.iter().map(PromptMessage::from));
    messages.push(PromptMessage::new(PromptRole::User, message));
    messages
}
