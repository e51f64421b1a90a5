//! Wire types for the chat pipeline.

use serde::{Deserialize, Serialize};

use crate::timestamp;

/// One turn of caller-supplied history.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Turn text.
    pub text: String,
    /// `true` for the user, `false` for the assistant.
    #[serde(rename = "isUser")]
    pub is_user: bool,
}

impl ChatMessage {
    /// Build a user turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
        }
    }

    /// Build an assistant turn.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
        }
    }
}

/// Reply returned to the caller for a chat request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    /// Always `true` for a produced reply.
    pub success: bool,
    /// Reply text.
    pub response: String,
    /// ISO-8601 creation time.
    pub timestamp: String,
    /// Positional counter: history length + 2.
    pub message_id: usize,
}

impl ReplyEnvelope {
    /// Wrap a reply for a request that carried `history_len` turns.
    #[must_use]
    pub fn new(response: String, history_len: usize) -> Self {
        Self {
            success: true,
            response,
            timestamp: timestamp::now(),
            message_id: message_id(history_len),
        }
    }
}

/// Sequence id for a reply: the caller's turns, the new user turn, then this reply.
#[must_use]
pub const fn message_id(history_len: usize) -> usize {
    history_len + 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_uses_camel_case_flag() {
        let parsed: Result<Vec<ChatMessage>, _> = serde_json::from_str(
            r#"[{"id":1,"text":"hello","isUser":true,"timestamp":"2024-01-01T00:00:00Z"},
                {"text":"hi!","isUser":false}]"#,
        );
        assert_eq!(
            parsed.ok(),
            Some(vec![ChatMessage::user("hello"), ChatMessage::assistant("hi!")])
        );
    }

    #[test]
    fn test_message_id_counts_history() {
        assert_eq!(message_id(0), 2);
        assert_eq!(ReplyEnvelope::new("ok".to_string(), 7).message_id, 9);
    }
}
