//! Anthropic provider with newest-first model candidate fallback.

use std::sync::Arc;

use async_stream::try_stream;

use crate::{
    BoxedChunkStream, ChatRequest, ModelCatalog, ModelProvider, NoopOperationHooks, ProviderId,
    ProviderOperationHooks, SecureCredentialManager, execute_with_candidates,
};

use super::transport::AnthropicTransport;
use super::types::AnthropicRequest;

#[derive(Clone)]
pub struct AnthropicProvider {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn AnthropicTransport>,
    catalog: Arc<ModelCatalog>,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl AnthropicProvider {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn AnthropicTransport>,
    ) -> Self {
        Self {
            credentials,
            transport,
            catalog: Arc::new(ModelCatalog::default()),
            hooks: Arc::new(NoopOperationHooks),
        }
    }

    /// Candidate lists are read from `catalog`.
    pub fn with_catalog(mut self, catalog: Arc<ModelCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn candidates(&self, model: &str) -> Vec<String> {
        self.catalog.candidates_for(ProviderId::Anthropic, model)
    }
}

impl ModelProvider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn is_configured(&self) -> bool {
        self.credentials
            .has_credentials(ProviderId::Anthropic)
            .unwrap_or(false)
    }

    fn stream<'a>(&'a self, request: ChatRequest) -> BoxedChunkStream<'a> {
        Box::pin(try_stream! {
            request.validate()?;
            let api_key = self.credentials.require_api_key(ProviderId::Anthropic)?;
            let candidates = self.candidates(&request.model);
            let transport = self.transport.as_ref();
            let (request, api_key) = (&request, &api_key);

            let (_model, response) = execute_with_candidates(
                ProviderId::Anthropic,
                &candidates,
                self.hooks.as_ref(),
                move |model| {
                    let body = AnthropicRequest::from_chat(request, model);
                    let api_key = api_key.clone();
                    async move { transport.create_message(body, api_key).await }
                },
            )
            .await?;

            for chunk in response.into_chunks() {
                yield chunk;
            }
        })
    }
}
