//! Runtime wiring: providers, turn persistence, tools, and per-session setup.

use std::sync::Arc;

use futures_util::StreamExt;
use reqwest::Client;
use vobserve::{SafeHooks, TracingObservabilityHooks};
use vprovider::{
    ChatRequest, ChatStream, ChunkDelta, Message, ModelCatalog, ProviderError, ProviderId,
    ProviderOperationHooks, ProviderRegistry, ProviderRouter, RouteDecision, TokenUsage, ToolCall,
};
use vtooling::{
    DefaultToolRuntime, PerplexityHttpTransport, ToolExecutionContext, ToolExecutionResult,
    ToolRegistry, ToolRuntime, ToolRuntimeHooks, WebSearchTool, WebSearchTransport,
};
use vtranscript::{HttpTurnStore, TurnStore};

use crate::{ConfigError, ConfigErrorKind, RuntimeConfig, SessionHandlers, SessionMetadata};

/// Model/tool exchanges allowed in one assistant turn before giving up on tools.
pub const MAX_TOOL_ROUNDS: usize = 4;

/// Result of one assistant turn.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub provider: ProviderId,
    pub model: String,
    pub text: String,
    pub tool_results: Vec<ToolExecutionResult>,
    pub usage: Option<TokenUsage>,
}

/// Shared, session-independent runtime state.
#[derive(Clone)]
pub struct RuntimeBundle {
    pub config: RuntimeConfig,
    pub router: ProviderRouter,
    pub turn_store: Arc<dyn TurnStore>,
    pub search_transport: Arc<dyn WebSearchTransport>,
    pub tool_hooks: Arc<dyn ToolRuntimeHooks>,
}

pub struct RuntimeBuilder {
    config: RuntimeConfig,
    client: Option<Client>,
    registry: Option<ProviderRegistry>,
    turn_store: Option<Arc<dyn TurnStore>>,
    search_transport: Option<Arc<dyn WebSearchTransport>>,
    provider_hooks: Arc<dyn ProviderOperationHooks>,
    tool_hooks: Arc<dyn ToolRuntimeHooks>,
}

impl RuntimeBuilder {
    pub fn new(config: RuntimeConfig) -> Self {
        let hooks = Arc::new(SafeHooks::new(TracingObservabilityHooks));
        Self {
            config,
            client: None,
            registry: None,
            turn_store: None,
            search_transport: None,
            provider_hooks: hooks.clone(),
            tool_hooks: hooks,
        }
    }

    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Replaces the HTTP adapters built from configuration.
    pub fn registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn turn_store(mut self, turn_store: Arc<dyn TurnStore>) -> Self {
        self.turn_store = Some(turn_store);
        self
    }

    pub fn search_transport(mut self, transport: Arc<dyn WebSearchTransport>) -> Self {
        self.search_transport = Some(transport);
        self
    }

    pub fn provider_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.provider_hooks = hooks;
        self
    }

    pub fn tool_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.tool_hooks = hooks;
        self
    }

    pub fn build(self) -> Result<RuntimeBundle, ConfigError> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder().build().map_err(|err| {
                ConfigError::new(ConfigErrorKind::HttpClient, err.to_string())
            })?,
        };

        let router = match self.registry {
            Some(registry) => {
                ProviderRouter::with_catalog(registry, Arc::new(ModelCatalog::default()))
            }
            None => crate::build_router(&self.config, &client, self.provider_hooks),
        };

        let turn_store: Arc<dyn TurnStore> = match self.turn_store {
            Some(store) => store,
            None => Arc::new(
                HttpTurnStore::new(client.clone()).with_base_url(self.config.backend_url.clone()),
            ),
        };
        let search_transport: Arc<dyn WebSearchTransport> = match self.search_transport {
            Some(transport) => transport,
            None => Arc::new(PerplexityHttpTransport::new(client)),
        };

        Ok(RuntimeBundle {
            config: self.config,
            router,
            turn_store,
            search_transport,
            tool_hooks: self.tool_hooks,
        })
    }
}

/// Builds the runtime with HTTP adapters and tracing hooks.
pub fn build_runtime(config: RuntimeConfig) -> Result<RuntimeBundle, ConfigError> {
    RuntimeBuilder::new(config).build()
}

impl RuntimeBundle {
    pub fn builder(config: RuntimeConfig) -> RuntimeBuilder {
        RuntimeBuilder::new(config)
    }

    /// Session callbacks bound to the metadata's session id.
    ///
    /// Must be called inside a tokio runtime for turns to be persisted.
    pub fn open_session(&self, metadata: &SessionMetadata) -> SessionHandlers {
        tracing::info!(
            session_id = metadata.session_id.as_ref().map(|id| id.as_str()),
            model = %metadata.model,
            language = %metadata.language,
            realtime = metadata.realtime,
            tool_calling = metadata.tool_calling_enabled,
            web_search = metadata.web_search_enabled,
            "opening session"
        );
        SessionHandlers::for_metadata(metadata, Arc::clone(&self.turn_store))
    }

    /// Tools offered to the model; empty when tool calling is disabled.
    pub fn tool_runtime_for(&self, metadata: &SessionMetadata) -> DefaultToolRuntime {
        let mut registry = ToolRegistry::new();
        if metadata.tool_calling_enabled {
            registry.register(
                WebSearchTool::new(
                    Arc::clone(&self.search_transport),
                    self.config.perplexity_api_key.clone(),
                )
                .with_enabled(metadata.web_search_enabled),
            );
        }

        DefaultToolRuntime::new(Arc::new(registry)).with_hooks(Arc::clone(&self.tool_hooks))
    }

    /// Prepends the session instructions and attaches the session's tools.
    pub fn chat_request_for(
        &self,
        metadata: &SessionMetadata,
        tools: &dyn ToolRuntime,
        history: Vec<Message>,
    ) -> ChatRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Message::system(metadata.instructions()));
        messages.extend(history);

        ChatRequest::new(metadata.model.clone(), messages).with_tools(tools.tool_specs())
    }

    pub fn route(&self, metadata: &SessionMetadata) -> Result<RouteDecision, ProviderError> {
        self.router.route(&metadata.model)
    }

    pub fn chat(&self, request: ChatRequest) -> Result<ChatStream<'_>, ProviderError> {
        self.router.chat(request)
    }

    /// Runs one assistant turn, executing requested tools between model calls.
    ///
    /// Text deltas are forwarded to `handlers` as they arrive and flushed as
    /// one assistant turn at the end. A failed reply leaves nothing buffered.
    pub async fn respond(
        &self,
        metadata: &SessionMetadata,
        handlers: &mut SessionHandlers,
        history: Vec<Message>,
    ) -> Result<AssistantReply, ProviderError> {
        let tools = self.tool_runtime_for(metadata);
        let mut request = self.chat_request_for(metadata, &tools, history);
        let mut tool_results = Vec::new();

        for round in 1..=MAX_TOOL_ROUNDS {
            let mut stream = match self.chat(request.clone()) {
                Ok(stream) => stream,
                Err(error) => {
                    handlers.discard_assistant_text();
                    return Err(error);
                }
            };
            let provider = stream.provider();
            let model = stream.model().to_string();

            let mut text = String::new();
            let mut tool_calls = Vec::<ToolCall>::new();
            let mut usage = None;
            while let Some(chunk) = stream.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(error) => {
                        handlers.discard_assistant_text();
                        return Err(error);
                    }
                };
                match chunk.delta {
                    ChunkDelta::Text { content, .. } => {
                        handlers.capture_assistant_text(&content);
                        text.push_str(&content);
                    }
                    ChunkDelta::ToolCalls(calls) => tool_calls.extend(calls),
                    ChunkDelta::Usage(turn_usage) => usage = Some(turn_usage),
                }
            }

            if tool_calls.is_empty() || round == MAX_TOOL_ROUNDS {
                if !tool_calls.is_empty() {
                    tracing::warn!(rounds = round, "tool round limit reached; ignoring tool calls");
                }
                handlers.flush_assistant_text();
                return Ok(AssistantReply {
                    provider,
                    model,
                    text,
                    tool_results,
                    usage,
                });
            }

            let context = ToolExecutionContext::new(
                metadata.session_id.clone(),
                metadata.language.clone(),
            )
            .in_round(round);
            let results = tools.execute_round(&tool_calls, &context).await;
            handlers.on_tool_calls_executed(&tool_calls, &results);

            request
                .messages
                .push(Message::assistant_tool_calls(text, tool_calls));
            request
                .messages
                .extend(results.iter().cloned().map(ToolExecutionResult::into_message));
            tool_results.extend(results);
        }

        Err(ProviderError::invalid_request("tool round limit must be positive"))
    }
}
