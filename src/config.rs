//! Runtime configuration, read from environment variables.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::journal::DEFAULT_JOURNAL_CAPACITY;
use crate::llm::prompt::DEFAULT_HISTORY_WINDOW;

/// Provider credential. Absent or blank means fallback-only mode.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Listen port.
pub const PORT_ENV: &str = "PORT";
/// OpenAI-compatible API base URL.
pub const BASE_URL_ENV: &str = "ANBUDDY_OPENAI_BASE_URL";
/// Completion model name.
pub const MODEL_ENV: &str = "ANBUDDY_MODEL";
/// Completion token budget.
pub const MAX_TOKENS_ENV: &str = "ANBUDDY_MAX_TOKENS";
/// Sampling temperature.
pub const TEMPERATURE_ENV: &str = "ANBUDDY_TEMPERATURE";
/// Provider request timeout in seconds.
pub const TIMEOUT_ENV: &str = "ANBUDDY_PROVIDER_TIMEOUT_SECS";
/// Number of history turns forwarded to the provider.
pub const HISTORY_WINDOW_ENV: &str = "ANBUDDY_HISTORY_WINDOW";
/// Journal capacity.
pub const JOURNAL_CAPACITY_ENV: &str = "ANBUDDY_JOURNAL_CAPACITY";

/// Default server port.
pub const DEFAULT_PORT: u16 = 5001;
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_MAX_TOKENS: u32 = 150;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
const MAX_TEMPERATURE: f32 = 2.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Raw value found.
        value: String,
    },
    /// A value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// Provider base URL is not a URL.
    #[error("invalid provider url: {0}")]
    Url(#[from] url::ParseError),
}

/// Convenience result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level service configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Language-model provider settings.
    pub provider: ProviderConfig,
    /// Journal settings.
    pub journal: JournalConfig,
}

/// HTTP listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port bound on all interfaces.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

/// Language-model provider settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Bearer credential; `None` disables the provider.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// API base, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Completion token budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// History turns forwarded with each request.
    pub history_window: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("history_window", &self.history_window)
            .finish()
    }
}

impl ProviderConfig {
    /// Whether a credential is present.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Set the credential. Blank keys are treated as absent.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = non_blank(key.into());
        self
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout, rounded up to whole seconds and never below one.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs();
        self.timeout_secs = if secs == 0 || timeout.subsec_nanos() > 0 {
            secs.saturating_add(1)
        } else {
            secs
        };
        self
    }

    /// Whole-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Journal settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Maximum number of retained entries.
    pub capacity: usize,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_JOURNAL_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    /// Returns an error if a variable is set to an unparsable or out-of-range value.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup, starting from defaults.
    ///
    /// # Errors
    /// Returns an error if a value is unparsable or out of range.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.provider.api_key = lookup(API_KEY_ENV).and_then(non_blank);
        if let Some(port) = parse_var(&lookup, PORT_ENV)? {
            config.server.port = port;
        }
        if let Some(base_url) = lookup(BASE_URL_ENV).and_then(non_blank) {
            config.provider.base_url = base_url;
        }
        if let Some(model) = lookup(MODEL_ENV).and_then(non_blank) {
            config.provider.model = model;
        }
        if let Some(max_tokens) = parse_var(&lookup, MAX_TOKENS_ENV)? {
            config.provider.max_tokens = max_tokens;
        }
        if let Some(temperature) = parse_var(&lookup, TEMPERATURE_ENV)? {
            config.provider.temperature = temperature;
        }
        if let Some(timeout_secs) = parse_var(&lookup, TIMEOUT_ENV)? {
            config.provider.timeout_secs = timeout_secs;
        }
        if let Some(window) = parse_var(&lookup, HISTORY_WINDOW_ENV)? {
            config.provider.history_window = window;
        }
        if let Some(capacity) = parse_var(&lookup, JOURNAL_CAPACITY_ENV)? {
            config.journal.capacity = capacity;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.journal.capacity == 0 {
            return Err(ConfigError::Invalid(
                "journal.capacity must be > 0".to_string(),
            ));
        }

        if self.provider.max_tokens == 0 {
            return Err(ConfigError::Invalid(
                "provider.max_tokens must be > 0".to_string(),
            ));
        }

        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "provider.timeout_secs must be > 0".to_string(),
            ));
        }

        if !(0.0..=MAX_TEMPERATURE).contains(&self.provider.temperature) {
            return Err(ConfigError::Invalid(format!(
                "provider.temperature must be within 0..={MAX_TEMPERATURE}"
            )));
        }

        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "provider.model must not be empty".to_string(),
            ));
        }

        Url::parse(&self.provider.base_url)?;

        Ok(())
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> ConfigResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue { var, value: raw })
}
