//! Gemini provider: one `generateContent` call per chat request.

use std::sync::Arc;

use async_stream::try_stream;

use crate::{
    BoxedChunkStream, ChatRequest, ModelProvider, NoopOperationHooks, ProviderError, ProviderId,
    ProviderOperationHooks, SecureCredentialManager,
};

use super::transport::GeminiTransport;
use super::types::GeminiRequest;

#[derive(Clone)]
pub struct GeminiProvider {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn GeminiTransport>,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl GeminiProvider {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn GeminiTransport>,
    ) -> Self {
        Self {
            credentials,
            transport,
            hooks: Arc::new(NoopOperationHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    fn report<T>(&self, model: &str, result: Result<T, ProviderError>) -> Result<T, ProviderError> {
        match &result {
            Ok(_) => self.hooks.on_success(ProviderId::Gemini, model, 1),
            Err(error) => self.hooks.on_failure(ProviderId::Gemini, model, 1, error),
        }
        result
    }
}

impl ModelProvider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn is_configured(&self) -> bool {
        self.credentials
            .has_credentials(ProviderId::Gemini)
            .unwrap_or(false)
    }

    fn stream<'a>(&'a self, request: ChatRequest) -> BoxedChunkStream<'a> {
        Box::pin(try_stream! {
            request.validate()?;
            let api_key = self.credentials.require_api_key(ProviderId::Gemini)?;
            let body = GeminiRequest::from_chat(&request);
            let model = request.model.as_str();

            self.hooks.on_attempt_start(ProviderId::Gemini, model, 1);
            let result = self
                .transport
                .generate_content(model, body, api_key)
                .await
                .and_then(|response| response.into_chunks());

            for chunk in self.report(model, result)? {
                yield chunk;
            }
        })
    }
}
