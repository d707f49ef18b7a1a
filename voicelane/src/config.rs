//! Process configuration read from the environment.
//!
//! ```rust
//! use voicelane::{ConfigErrorKind, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_lookup(|key| match key {
//!     "OPENAI_API_KEY" => Some("sk-test".to_string()),
//!     "BACKEND_URL" => Some("http://localhost:8000/".to_string()),
//!     _ => None,
//! })
//! .expect("openai key is present");
//! assert_eq!(config.backend_url, "http://localhost:8000");
//! assert!(!config.cartesia_configured);
//!
//! let err = RuntimeConfig::from_lookup(|_| None).expect_err("openai key is required");
//! assert_eq!(err.kind, ConfigErrorKind::MissingKey);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use vprovider::{ProviderError, ProviderId, SecretString, SecureCredentialManager};
use vtooling::PERPLEXITY_API_KEY_ENV;
use vtranscript::DEFAULT_BACKEND_URL;

pub const BACKEND_URL_ENV: &str = "BACKEND_URL";
pub const CARTESIA_API_KEY_ENV: &str = "CARTESIA_API_KEY";
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const ANTHROPIC_BASE_URL_ENV: &str = "ANTHROPIC_BASE_URL";
pub const GEMINI_BASE_URL_ENV: &str = "GEMINI_BASE_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    MissingKey,
    InvalidValue,
    Credentials,
    HttpClient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
}

impl ConfigError {
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn missing_key(key: &str) -> Self {
        Self::new(
            ConfigErrorKind::MissingKey,
            format!("required environment variable {key} is not set"),
        )
    }

    pub fn invalid_value(key: &str, message: impl Display) -> Self {
        Self::new(ConfigErrorKind::InvalidValue, format!("{key}: {message}"))
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ConfigError {}

impl From<ProviderError> for ConfigError {
    fn from(value: ProviderError) -> Self {
        Self::new(ConfigErrorKind::Credentials, value.to_string())
    }
}

/// Everything the runtime needs from the process environment.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub credentials: Arc<SecureCredentialManager>,
    pub perplexity_api_key: Option<SecretString>,
    /// A Cartesia key is present, so `cartesia/...` voices can be used directly.
    pub cartesia_configured: bool,
    pub backend_url: String,
    pub openai_base_url: Option<String>,
    pub anthropic_base_url: Option<String>,
    pub gemini_base_url: Option<String>,
}

impl RuntimeConfig {
    /// Reads `.env` if present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// The default provider key is required; every other key is optional and
    /// blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let credentials = SecureCredentialManager::from_lookup(&lookup);
        if !credentials.has_credentials(ProviderId::OpenAi)? {
            return Err(ConfigError::missing_key("OPENAI_API_KEY"));
        }

        let backend_url = match non_blank(BACKEND_URL_ENV) {
            Some(url) => normalize_url(BACKEND_URL_ENV, &url)?,
            None => DEFAULT_BACKEND_URL.to_string(),
        };

        let optional_url = |key: &str| -> Result<Option<String>, ConfigError> {
            non_blank(key).map(|url| normalize_url(key, &url)).transpose()
        };

        let config = Self {
            credentials: Arc::new(credentials),
            perplexity_api_key: non_blank(PERPLEXITY_API_KEY_ENV).map(SecretString::new),
            cartesia_configured: non_blank(CARTESIA_API_KEY_ENV).is_some(),
            backend_url,
            openai_base_url: optional_url(OPENAI_BASE_URL_ENV)?,
            anthropic_base_url: optional_url(ANTHROPIC_BASE_URL_ENV)?,
            gemini_base_url: optional_url(GEMINI_BASE_URL_ENV)?,
        };
        config.log_summary();
        Ok(config)
    }

    pub fn has_provider(&self, provider: ProviderId) -> bool {
        self.credentials.has_credentials(provider).unwrap_or(false)
    }

    fn log_summary(&self) {
        tracing::info!(
            backend_url = %self.backend_url,
            anthropic = self.has_provider(ProviderId::Anthropic),
            gemini = self.has_provider(ProviderId::Gemini),
            web_search = self.perplexity_api_key.is_some(),
            cartesia = self.cartesia_configured,
            "runtime configuration loaded"
        );
    }
}

fn normalize_url(key: &str, url: &str) -> Result<String, ConfigError> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::invalid_value(
            key,
            format!("'{url}' is not an http(s) URL"),
        ));
    }

    Ok(url.trim_end_matches('/').to_string())
}
