//! OpenAI provider implementation over transport and shared models.

use std::sync::Arc;

use async_stream::try_stream;
use futures_util::StreamExt;

use crate::{
    BoxedChunkStream, ChatRequest, ModelProvider, NoopOperationHooks, ProviderError, ProviderId,
    ProviderOperationHooks, SecureCredentialManager,
};

use super::serde_api::build_api_request;
use super::transport::OpenAiTransport;
use super::types::{OpenAiRequest, OpenAiStreamAccumulator};

#[derive(Clone)]
pub struct OpenAiProvider {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn OpenAiTransport>,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl OpenAiProvider {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn OpenAiTransport>,
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

    pub(crate) fn build_openai_request(&self, request: &ChatRequest) -> OpenAiRequest {
        build_api_request(request)
    }

    fn report<T>(&self, model: &str, result: Result<T, ProviderError>) -> Result<T, ProviderError> {
        if let Err(error) = &result {
            self.hooks.on_failure(ProviderId::OpenAi, model, 1, error);
        }
        result
    }
}

impl ModelProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn is_configured(&self) -> bool {
        self.credentials
            .has_credentials(ProviderId::OpenAi)
            .unwrap_or(false)
    }

    fn stream<'a>(&'a self, request: ChatRequest) -> BoxedChunkStream<'a> {
        Box::pin(try_stream! {
            request.validate()?;
            let api_key = self.credentials.require_api_key(ProviderId::OpenAi)?;
            let openai_request = self.build_openai_request(&request);
            let model = openai_request.model.clone();

            self.hooks.on_attempt_start(ProviderId::OpenAi, &model, 1);
            let mut chunks = self.report(&model, self.transport.stream(openai_request, api_key).await)?;
            let mut accumulator = OpenAiStreamAccumulator::default();

            while let Some(chunk) = chunks.next().await {
                accumulator.push(self.report(&model, chunk)?);
            }

            for chunk in accumulator.finish() {
                yield chunk;
            }

            self.hooks.on_success(ProviderId::OpenAi, &model, 1);
        })
    }
}
