//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::chat::ResponseOrchestrator;
use crate::config::AppConfig;
use crate::journal::JournalStore;
use crate::llm::{ChatProvider, OpenAiChat};

/// Shared application state.
pub struct AppState {
    /// Chat pipeline.
    pub orchestrator: ResponseOrchestrator,
    /// Process-wide journal.
    pub journal: JournalStore,
}

impl AppState {
    /// Create the state from configuration, wiring the OpenAI-compatible provider.
    ///
    /// A missing credential is not an error: the provider then always fails
    /// locally and every reply comes from the fallback selector.
    ///
    /// # Errors
    /// Returns an error if the provider HTTP client cannot be created.
    pub fn new(config: &AppConfig) -> Result<Arc<Self>, Box<dyn std::error::Error + Send + Sync>> {
        let provider = OpenAiChat::new(config.provider.clone())
            .map_err(|e| format!("Failed to create provider client: {e}"))?;
        let settings = provider.config();
        if provider.is_configured() {
            tracing::info!(
                model = %settings.model,
                base_url = %settings.base_url,
                timeout_secs = settings.timeout_secs,
                "provider configured"
            );
        } else {
            tracing::warn!("no provider credential configured; serving fallback replies only");
        }

        Ok(Self::with_provider(Arc::new(provider), config.journal.capacity))
    }

    /// Create the state around an arbitrary provider.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn ChatProvider>, journal_capacity: usize) -> Arc<Self> {
        Self::from_parts(
            ResponseOrchestrator::new(provider),
            JournalStore::new(journal_capacity),
        )
    }

    /// Assemble the state from already-built components.
    #[must_use]
    pub fn from_parts(orchestrator: ResponseOrchestrator, journal: JournalStore) -> Arc<Self> {
        Arc::new(Self {
            orchestrator,
            journal,
        })
    }
}
