//! Provider registry and router construction from runtime configuration.

use std::sync::Arc;

use reqwest::Client;
use vprovider::{ModelCatalog, ProviderOperationHooks, ProviderRegistry, ProviderRouter};

use crate::RuntimeConfig;

/// Registers every adapter compiled into this build.
///
/// Adapters without credentials are still registered; the router treats them
/// as unavailable and falls back to the default provider.
pub fn build_provider_registry(
    config: &RuntimeConfig,
    client: &Client,
    hooks: Arc<dyn ProviderOperationHooks>,
    catalog: Arc<ModelCatalog>,
) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    #[cfg(feature = "provider-openai")]
    {
        let mut transport = vprovider::OpenAiHttpTransport::new(client.clone());
        if let Some(base_url) = &config.openai_base_url {
            transport = transport.with_base_url(base_url.clone());
        }
        registry.register(
            vprovider::OpenAiProvider::new(Arc::clone(&config.credentials), Arc::new(transport))
                .with_hooks(Arc::clone(&hooks)),
        );
    }

    #[cfg(feature = "provider-anthropic")]
    {
        let mut transport = vprovider::AnthropicHttpTransport::new(client.clone());
        if let Some(base_url) = &config.anthropic_base_url {
            transport = transport.with_base_url(base_url.clone());
        }
        registry.register(
            vprovider::AnthropicProvider::new(Arc::clone(&config.credentials), Arc::new(transport))
                .with_catalog(Arc::clone(&catalog))
                .with_hooks(Arc::clone(&hooks)),
        );
    }

    #[cfg(feature = "provider-gemini")]
    {
        let mut transport = vprovider::GeminiHttpTransport::new(client.clone());
        if let Some(base_url) = &config.gemini_base_url {
            transport = transport.with_base_url(base_url.clone());
        }
        registry.register(
            vprovider::GeminiProvider::new(Arc::clone(&config.credentials), Arc::new(transport))
                .with_hooks(Arc::clone(&hooks)),
        );
    }

    // Only the Anthropic adapter reads the catalog.
    #[cfg(not(feature = "provider-anthropic"))]
    drop(catalog);
    #[cfg(not(any(
        feature = "provider-openai",
        feature = "provider-anthropic",
        feature = "provider-gemini"
    )))]
    let _ = (config, client, hooks);

    registry
}

pub fn build_router(
    config: &RuntimeConfig,
    client: &Client,
    hooks: Arc<dyn ProviderOperationHooks>,
) -> ProviderRouter {
    let catalog = Arc::new(ModelCatalog::default());
    let registry = build_provider_registry(config, client, hooks, Arc::clone(&catalog));
    ProviderRouter::with_catalog(registry, catalog)
}

#[cfg(all(
    test,
    feature = "provider-openai",
    feature = "provider-anthropic",
    feature = "provider-gemini"
))]
mod tests {
    use vprovider::{NoopOperationHooks, ProviderErrorKind, ProviderId};

    use super::*;

    fn router_for(keys: &'static [(&'static str, &'static str)]) -> ProviderRouter {
        let config = RuntimeConfig::from_lookup(|key| {
            keys.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        })
        .expect("config should load");
        build_router(&config, &Client::new(), Arc::new(NoopOperationHooks))
    }

    #[test]
    fn all_compiled_adapters_are_registered() {
        let router = router_for(&[("OPENAI_API_KEY", "sk-test")]);
        assert_eq!(router.registry().len(), 3);
        assert!(router.registry().is_available(ProviderId::OpenAi));
        assert!(!router.registry().is_available(ProviderId::Anthropic));
    }

    #[test]
    fn alternate_without_key_falls_back_to_default() {
        let router = router_for(&[("OPENAI_API_KEY", "sk-test")]);
        let decision = router
            .route("anthropic/claude-sonnet-4.5")
            .expect("fallback route");

        assert_eq!(decision.provider, ProviderId::OpenAi);
        assert_eq!(decision.model, "gpt-4.1-mini");
        assert!(decision.fell_back);
    }

    #[test]
    fn configured_alternate_is_selected() {
        let router = router_for(&[("OPENAI_API_KEY", "sk-test"), ("GEMINI_API_KEY", "g-key")]);
        let decision = router.route("google/gemini-2.5-flash").expect("gemini route");

        assert_eq!(decision.provider, ProviderId::Gemini);
        assert!(!decision.fell_back);
    }

    #[test]
    fn blank_identifier_routes_to_default() {
        let router = router_for(&[("OPENAI_API_KEY", "sk-test")]);
        let decision = router.route("").expect("default route");
        assert_eq!(decision.provider, ProviderId::OpenAi);

        let missing = ProviderRouter::new(ProviderRegistry::new())
            .route("openai/gpt-4.1-mini")
            .expect_err("nothing registered");
        assert_eq!(missing.kind, ProviderErrorKind::Configuration);
    }
}
