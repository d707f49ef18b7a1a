//! Provider selection with availability fallback.
//!
//! ```rust
//! use vprovider::{ProviderId, ProviderRegistry, ProviderRouter};
//!
//! let router = ProviderRouter::new(ProviderRegistry::new());
//! let resolved = router.resolve("gemini/gemini-2.5-pro");
//! assert_eq!(resolved.provider, ProviderId::Gemini);
//!
//! // Nothing is registered, so even the default provider is unavailable.
//! assert!(router.route("gemini/gemini-2.5-pro").is_err());
//! ```

use std::sync::Arc;

use crate::{
    ChatRequest, ChatStream, ModelCatalog, ModelResolution, ProviderError, ProviderId,
    ProviderRegistry,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub provider: ProviderId,
    pub model: String,
    pub candidates: Vec<String>,
    /// The requested provider lacked credentials and the default was used instead.
    pub fell_back: bool,
}

impl RouteDecision {
    fn from_resolution(resolution: ModelResolution, fell_back: bool) -> Self {
        Self {
            provider: resolution.provider,
            model: resolution.model,
            candidates: resolution.candidates,
            fell_back,
        }
    }
}

#[derive(Clone)]
pub struct ProviderRouter {
    registry: ProviderRegistry,
    catalog: Arc<ModelCatalog>,
}

impl ProviderRouter {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self::with_catalog(registry, Arc::new(ModelCatalog::default()))
    }

    pub fn with_catalog(registry: ProviderRegistry, catalog: Arc<ModelCatalog>) -> Self {
        Self { registry, catalog }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Pure identifier resolution; ignores credentials.
    pub fn resolve(&self, identifier: &str) -> ModelResolution {
        self.catalog.resolve(identifier)
    }

    /// Resolves `identifier` and checks the chosen adapter is usable.
    ///
    /// An unconfigured alternate degrades to the default provider and model.
    /// An unconfigured default provider is a configuration error.
    pub fn route(&self, identifier: &str) -> Result<RouteDecision, ProviderError> {
        let resolution = self.resolve(identifier);
        if self.registry.is_available(resolution.provider) {
            return Ok(RouteDecision::from_resolution(resolution, false));
        }

        let default_provider = self.catalog.default_provider();
        if resolution.provider == default_provider {
            return Err(Self::unavailable(default_provider));
        }

        tracing::warn!(
            provider = %resolution.provider,
            model = %resolution.model,
            fallback_provider = %default_provider,
            fallback_model = %self.catalog.default_model(),
            "provider credentials missing; falling back to default provider"
        );

        if !self.registry.is_available(default_provider) {
            return Err(Self::unavailable(default_provider));
        }

        Ok(RouteDecision::from_resolution(
            self.catalog.default_resolution(),
            true,
        ))
    }

    /// Routes the request and starts a lazy chat stream on the selected adapter.
    pub fn chat(&self, mut request: ChatRequest) -> Result<ChatStream<'_>, ProviderError> {
        let decision = self.route(&request.model)?;
        let adapter = self
            .registry
            .provider(decision.provider)
            .ok_or_else(|| Self::unavailable(decision.provider))?;

        tracing::debug!(
            provider = %decision.provider,
            model = %decision.model,
            fell_back = decision.fell_back,
            "routing chat request"
        );

        request.model = decision.model.clone();
        Ok(ChatStream::new(
            decision.provider,
            decision.model,
            adapter.stream(request),
        ))
    }

    fn unavailable(provider: ProviderId) -> ProviderError {
        ProviderError::configuration(format!(
            "provider '{provider}' is not registered or has no credentials"
        ))
    }
}
