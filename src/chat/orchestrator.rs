//! Response orchestrator: provider first, canned fallback on any failure.

use std::sync::{Arc, Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::chat::errors::{ChatError, ChatResult};
use crate::chat::types::{ChatMessage, ReplyEnvelope};
use crate::fallback;
use crate::llm::ChatProvider;

/// Decides how each chat message is answered.
///
/// There are no retries: one provider failure sends the request straight to
/// the fallback selector.
pub struct ResponseOrchestrator {
    provider: Arc<dyn ChatProvider>,
    rng: Mutex<StdRng>,
}

impl ResponseOrchestrator {
    /// Create an orchestrator with an entropy-seeded fallback generator.
    #[must_use]
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self::with_rng(provider, StdRng::from_entropy())
    }

    /// Create an orchestrator with a caller-supplied generator, e.g. a seeded one.
    #[must_use]
    pub fn with_rng(provider: Arc<dyn ChatProvider>, rng: StdRng) -> Self {
        Self {
            provider,
            rng: Mutex::new(rng),
        }
    }

    /// Answer a message.
    ///
    /// # Errors
    /// Returns [`ChatError::EmptyMessage`] if the message is blank; neither the
    /// provider nor the fallback is consulted in that case.
    pub async fn handle(&self, message: &str, history: &[ChatMessage]) -> ChatResult<ReplyEnvelope> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let response = match self.provider.generate(message, history).await {
            Ok(text) => text,
            Err(failure) => {
                let category = fallback::classify(message);
                debug!(reason = %failure, %category, "using fallback reply");
                self.pick(category.responses())
            }
        };

        Ok(ReplyEnvelope::new(response, history.len()))
    }

    fn pick(&self, candidates: &[&str]) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        candidates
            .choose(&mut *rng)
            .map_or_else(String::new, |text| (*text).to_string())
    }
}
