//! Secure in-memory credential management shared by every adapter.
//!
//! ```rust
//! use vprovider::{ProviderId, SecureCredentialManager};
//!
//! let credentials = SecureCredentialManager::from_lookup(|key| match key {
//!     "OPENAI_API_KEY" => Some("sk-test".to_string()),
//!     _ => None,
//! });
//!
//! assert!(credentials.has_credentials(ProviderId::OpenAi).unwrap());
//! assert!(!credentials.has_credentials(ProviderId::Gemini).unwrap());
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::{ProviderError, ProviderId};

#[derive(Clone, PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zero bytes are valid UTF-8.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

/// Environment keys consulted for each provider, in priority order.
pub fn api_key_env_vars(provider: ProviderId) -> &'static [&'static str] {
    match provider {
        ProviderId::OpenAi => &["OPENAI_API_KEY"],
        ProviderId::Anthropic => &["ANTHROPIC_API_KEY"],
        ProviderId::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
    }
}

#[derive(Default)]
pub struct SecureCredentialManager {
    api_keys: Mutex<HashMap<ProviderId, SecretString>>,
}

impl SecureCredentialManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every provider key found through `lookup`; blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut api_keys = HashMap::new();
        for provider in [ProviderId::OpenAi, ProviderId::Anthropic, ProviderId::Gemini] {
            let secret = api_key_env_vars(provider)
                .iter()
                .filter_map(|key| lookup(key))
                .map(SecretString::new)
                .find(|secret| !secret.is_empty());

            if let Some(secret) = secret {
                api_keys.insert(provider, secret);
            }
        }

        Self {
            api_keys: Mutex::new(api_keys),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn set_api_key(
        &self,
        provider: ProviderId,
        api_key: impl Into<String>,
    ) -> Result<(), ProviderError> {
        let api_key = SecretString::new(api_key);
        if api_key.is_empty() {
            return Err(ProviderError::configuration("api key must not be empty"));
        }

        self.api_keys()?.insert(provider, api_key);
        Ok(())
    }

    pub fn has_credentials(&self, provider: ProviderId) -> Result<bool, ProviderError> {
        Ok(self.api_keys()?.contains_key(&provider))
    }

    pub fn api_key(&self, provider: ProviderId) -> Result<Option<SecretString>, ProviderError> {
        Ok(self.api_keys()?.get(&provider).cloned())
    }

    /// Like [`Self::api_key`] but a missing key is a configuration error.
    pub fn require_api_key(&self, provider: ProviderId) -> Result<SecretString, ProviderError> {
        self.api_key(provider)?.ok_or_else(|| {
            ProviderError::configuration(format!(
                "missing API key for provider '{provider}' (set {})",
                api_key_env_vars(provider).join(" or ")
            ))
        })
    }

    pub fn clear(&self, provider: ProviderId) -> Result<bool, ProviderError> {
        Ok(self.api_keys()?.remove(&provider).is_some())
    }

    fn api_keys(&self) -> Result<MutexGuard<'_, HashMap<ProviderId, SecretString>>, ProviderError> {
        self.api_keys
            .lock()
            .map_err(|_| ProviderError::configuration("credential manager lock poisoned"))
    }
}

impl std::fmt::Debug for SecureCredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let configured = self
            .api_keys
            .lock()
            .map(|keys| keys.keys().copied().collect::<Vec<_>>())
            .unwrap_or_default();

        f.debug_struct("SecureCredentialManager")
            .field("configured", &configured)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_debug_is_redacted() {
        let secret = SecretString::new("sk-live-123");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(secret.expose(), "sk-live-123");
    }

    #[test]
    fn lookup_prefers_gemini_key_and_falls_back_to_google_key() {
        let both = SecureCredentialManager::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("gemini".to_string()),
            "GOOGLE_API_KEY" => Some("google".to_string()),
            _ => None,
        });
        let key = both
            .api_key(ProviderId::Gemini)
            .expect("lock")
            .expect("key present");
        assert_eq!(key.expose(), "gemini");

        let google_only = SecureCredentialManager::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("   ".to_string()),
            "GOOGLE_API_KEY" => Some("google".to_string()),
            _ => None,
        });
        let key = google_only
            .require_api_key(ProviderId::Gemini)
            .expect("fallback key");
        assert_eq!(key.expose(), "google");
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let credentials = SecureCredentialManager::new();
        let err = credentials
            .require_api_key(ProviderId::Anthropic)
            .expect_err("no key configured");
        assert_eq!(err.kind, crate::ProviderErrorKind::Configuration);
        assert!(err.message.contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn set_and_clear_round_trip() {
        let credentials = SecureCredentialManager::new();
        assert!(credentials.set_api_key(ProviderId::OpenAi, " ").is_err());

        credentials
            .set_api_key(ProviderId::OpenAi, "sk-test")
            .expect("key should store");
        assert!(credentials.has_credentials(ProviderId::OpenAi).expect("lock"));
        assert!(credentials.clear(ProviderId::OpenAi).expect("lock"));
        assert!(!credentials.has_credentials(ProviderId::OpenAi).expect("lock"));
    }

    #[test]
    fn debug_lists_providers_without_secrets() {
        let credentials = SecureCredentialManager::new();
        credentials
            .set_api_key(ProviderId::Anthropic, "sk-ant-secret")
            .expect("key should store");

        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("Anthropic"));
        assert!(!rendered.contains("sk-ant-secret"));
    }
}
