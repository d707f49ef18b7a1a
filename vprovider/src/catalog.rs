//! Logical model keys, their providers, and concrete backend candidates.
//!
//! Resolution is pure and total: every identifier maps to exactly one provider
//! and a non-empty, newest-first list of backend model names.
//!
//! ```rust
//! use vprovider::{ModelCatalog, ProviderId};
//!
//! let catalog = ModelCatalog::default();
//!
//! let namespaced = catalog.resolve("anthropic/claude-sonnet-4.5");
//! assert_eq!(namespaced.provider, ProviderId::Anthropic);
//! assert_eq!(namespaced.model, "claude-sonnet-4.5");
//!
//! let unknown = catalog.resolve("my-custom-model");
//! assert_eq!(unknown.provider, ProviderId::OpenAi);
//! assert_eq!(unknown.model, "gpt-4.1-mini");
//! ```

use std::collections::HashMap;

use crate::ProviderId;

pub const DEFAULT_PROVIDER: ProviderId = ProviderId::OpenAi;
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub provider: ProviderId,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResolution {
    pub provider: ProviderId,
    /// Logical model key with any namespace prefix stripped.
    pub model: String,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ModelCatalog {
    entries: HashMap<String, CatalogEntry>,
    default_provider: ProviderId,
    default_model: String,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::empty()
            .with_entry(
                "claude-sonnet-4.5",
                ProviderId::Anthropic,
                &["claude-sonnet-4-5-20250929", "claude-sonnet-4-20250514"],
            )
            .with_entry(
                "claude-haiku-4.5",
                ProviderId::Anthropic,
                &["claude-haiku-4-5-20251001", "claude-3-5-haiku-20241022"],
            )
            .with_entry(
                "claude-opus-4.1",
                ProviderId::Anthropic,
                &["claude-opus-4-1-20250805", "claude-opus-4-20250514"],
            )
            .with_entry("gemini-2.5-flash", ProviderId::Gemini, &["gemini-2.5-flash"])
            .with_entry("gemini-2.5-pro", ProviderId::Gemini, &["gemini-2.5-pro"])
            .with_entry("gemini-2.0-flash", ProviderId::Gemini, &["gemini-2.0-flash"])
            .with_entry("gpt-4.1-mini", ProviderId::OpenAi, &["gpt-4.1-mini"])
            .with_entry("gpt-4.1", ProviderId::OpenAi, &["gpt-4.1"])
            .with_entry("gpt-4o-mini", ProviderId::OpenAi, &["gpt-4o-mini"])
            .with_entry("gpt-5-mini", ProviderId::OpenAi, &["gpt-5-mini"])
    }
}

impl ModelCatalog {
    /// A catalog with no entries and the stock default provider/model.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            default_provider: DEFAULT_PROVIDER,
            default_model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_entry(mut self, key: impl Into<String>, provider: ProviderId, candidates: &[&str]) -> Self {
        self.entries.insert(
            key.into(),
            CatalogEntry {
                provider,
                candidates: candidates.iter().map(|model| model.to_string()).collect(),
            },
        );
        self
    }

    pub fn default_provider(&self) -> ProviderId {
        self.default_provider
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn entry(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    pub fn resolve(&self, identifier: &str) -> ModelResolution {
        let identifier = identifier.trim();

        if let Some((namespace, model)) = identifier.split_once('/')
            && let Some(provider) = ProviderId::from_namespace(namespace)
            && !model.trim().is_empty()
        {
            let model = model.trim();
            return self.resolution(provider, model);
        }

        if let Some(entry) = self.entries.get(identifier) {
            return self.resolution(entry.provider, identifier);
        }

        self.default_resolution()
    }

    pub fn default_resolution(&self) -> ModelResolution {
        self.resolution(self.default_provider, &self.default_model)
    }

    /// Catalog candidates for `key` when it belongs to `provider`, else `[key]`.
    pub fn candidates_for(&self, provider: ProviderId, key: &str) -> Vec<String> {
        match self.entries.get(key) {
            Some(entry) if entry.provider == provider && !entry.candidates.is_empty() => {
                entry.candidates.clone()
            }
            _ => vec![key.to_string()],
        }
    }

    fn resolution(&self, provider: ProviderId, model: &str) -> ModelResolution {
        ModelResolution {
            provider,
            model: model.to_string(),
            candidates: self.candidates_for(provider, model),
        }
    }
}
