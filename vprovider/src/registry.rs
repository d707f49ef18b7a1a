//! Provider registry for runtime provider lookup.
//!
//! ```rust
//! use vprovider::ProviderRegistry;
//!
//! let registry = ProviderRegistry::new();
//! assert!(registry.is_empty());
//! assert_eq!(registry.len(), 0);
//! ```

use std::sync::Arc;

use vcommon::Registry;

use crate::{ModelProvider, ProviderId};

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: Registry<ProviderId, Arc<dyn ModelProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P>(&mut self, provider: P)
    where
        P: ModelProvider + 'static,
    {
        self.register_shared(Arc::new(provider));
    }

    pub fn register_shared(&mut self, provider: Arc<dyn ModelProvider>) {
        self.providers.insert(provider.id(), provider);
    }

    pub fn get(&self, provider_id: ProviderId) -> Option<Arc<dyn ModelProvider>> {
        self.providers.get(&provider_id).cloned()
    }

    pub fn provider(&self, provider_id: ProviderId) -> Option<&dyn ModelProvider> {
        self.providers
            .get(&provider_id)
            .map(|provider| provider.as_ref())
    }

    /// Registered and holding the credentials it needs.
    pub fn is_available(&self, provider_id: ProviderId) -> bool {
        self.providers
            .get(&provider_id)
            .is_some_and(|provider| provider.is_configured())
    }

    pub fn contains(&self, provider_id: ProviderId) -> bool {
        self.providers.contains_key(&provider_id)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
