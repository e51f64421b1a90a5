//! Client for OpenAI-compatible `POST {base_url}/chat/completions`.
//!
//! Behaviour:
//! - No credential: fail with [`ProviderFailure::NotConfigured`] without any I/O.
//! - Send system prompt, windowed history and the message with fixed
//!   generation parameters.
//! - Return the trimmed text of the first choice.
//!
//! The `reqwest` client carries both a connect and a whole-request timeout, so a
//! stalled provider turns into a failure instead of a hung request.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chat::ChatMessage;
use crate::config::ProviderConfig;
use crate::llm::prompt::{PromptMessage, build_messages};
use crate::llm::{ChatProvider, ProviderFailure, ProviderFuture, ProviderResult};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Chat-completions client for the companion persona.
pub struct OpenAiChat {
    client: Client,
    config: ProviderConfig,
}

impl OpenAiChat {
    /// Create a client from provider settings.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Provider settings in use.
    #[must_use]
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn complete(&self, message: &str, history: &[ChatMessage]) -> ProviderResult<String> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(ProviderFailure::NotConfigured);
        };

        let messages = build_messages(message, history, self.config.history_window);
        let request = CompletionRequest {
            model: &self.config.model,
            messages: &messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        debug!(model = %self.config.model, turns = messages.len(), "calling provider");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderFailure::HttpStatusNotOk(status.as_u16()));
        }

        let body = response.json::<CompletionResponse>().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ProviderFailure::Malformed("no completion text".to_string()))
    }
}

impl ChatProvider for OpenAiChat {
    fn generate<'a>(
        &'a self,
        message: &'a str,
        history: &'a [ChatMessage],
    ) -> ProviderFuture<'a, ProviderResult<String>> {
        Box::pin(async move {
            let result = self.complete(message, history).await;
            match &result {
                Err(ProviderFailure::NotConfigured) => debug!("provider not configured"),
                Err(err) => warn!(error = %err, "provider call failed"),
                Ok(_) => {}
            }
            result
        })
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }
}
