#![cfg(feature = "provider-anthropic")]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use serde_json::json;
use vprovider::adapters::anthropic::{
    AnthropicContentBlock, AnthropicProvider, AnthropicRequest, AnthropicResponse,
    AnthropicTransport,
};
use vprovider::{
    BoxFuture, ChatChunk, ChatRequest, ChunkDelta, Message, ModelCatalog, ModelProvider,
    ProviderError, ProviderErrorKind, ProviderId, SecretString, SecureCredentialManager,
    ToolCall,
};

#[derive(Debug, Default)]
struct ScriptedTransport {
    requests: Mutex<Vec<AnthropicRequest>>,
    responses: Mutex<VecDeque<Result<AnthropicResponse, ProviderError>>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<Result<AnthropicResponse, ProviderError>>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(responses.into()),
        }
    }

    fn attempted_models(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("requests lock")
            .iter()
            .map(|request| request.model.clone())
            .collect()
    }
}

impl AnthropicTransport for ScriptedTransport {
    fn create_message<'a>(
        &'a self,
        request: AnthropicRequest,
        _api_key: SecretString,
    ) -> BoxFuture<'a, Result<AnthropicResponse, ProviderError>> {
        Box::pin(async move {
            self.requests.lock().expect("requests lock").push(request);
            self.responses
                .lock()
                .expect("responses lock")
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::connectivity("script exhausted")))
        })
    }
}

fn credentials() -> Arc<SecureCredentialManager> {
    let credentials = Arc::new(SecureCredentialManager::new());
    credentials
        .set_api_key(ProviderId::Anthropic, "sk-ant-123")
        .expect("key should set");
    credentials
}

fn catalog() -> Arc<ModelCatalog> {
    Arc::new(ModelCatalog::empty().with_entry(
        "claude-test",
        ProviderId::Anthropic,
        &["claude-new", "claude-old"],
    ))
}

fn response(body: serde_json::Value) -> Result<AnthropicResponse, ProviderError> {
    Ok(serde_json::from_value(body).expect("response fixture should decode"))
}

async fn run(provider: &AnthropicProvider, request: ChatRequest) -> Vec<Result<ChatChunk, ProviderError>> {
    provider.stream(request).collect::<Vec<_>>().await
}

#[tokio::test]
async fn not_found_on_first_candidate_falls_back_to_next() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Err(ProviderError::remote_status(404, "model: claude-new")),
        response(json!({
            "id": "msg_1",
            "content": [
                {"type": "text", "text": "Turn left"},
                {"type": "text", "text": "in 200 meters."}
            ],
            "usage": {"input_tokens": 11, "output_tokens": 6, "cache_read_input_tokens": 3}
        })),
    ]));
    let provider = AnthropicProvider::new(credentials(), transport.clone()).with_catalog(catalog());

    let chunks = run(&provider, ChatRequest::new("claude-test", vec![Message::user("Directions?")]))
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .expect("fallback should succeed");

    assert_eq!(transport.attempted_models(), vec!["claude-new", "claude-old"]);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].id, "msg_1");
    assert_eq!(chunks[0].text_content(), Some("Turn left\n\nin 200 meters."));
    assert_eq!(chunks[1].id, "msg_1_usage");
    match &chunks[1].delta {
        ChunkDelta::Usage(usage) => {
            assert_eq!(usage.prompt_tokens, 11);
            assert_eq!(usage.cached_tokens, 3);
            assert_eq!(usage.total_tokens, 17);
        }
        other => panic!("unexpected delta: {other:?}"),
    }
}

#[tokio::test]
async fn non_not_found_failure_stops_candidate_iteration() {
    let transport = Arc::new(ScriptedTransport::new(vec![Err(
        ProviderError::remote_status(400, "bad request"),
    )]));
    let provider = AnthropicProvider::new(credentials(), transport.clone()).with_catalog(catalog());

    let items = run(&provider, ChatRequest::new("claude-test", vec![Message::user("hi")])).await;
    assert_eq!(items.len(), 1);
    let error = items[0].as_ref().expect_err("should fail");
    assert_eq!(error.kind, ProviderErrorKind::RemoteStatus);
    assert!(!error.retryable);
    assert_eq!(transport.attempted_models(), vec!["claude-new"]);
}

#[tokio::test]
async fn not_found_on_last_candidate_surfaces_as_remote_status() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Err(ProviderError::remote_status(404, "gone")),
        Err(ProviderError::remote_status(404, "also gone")),
    ]));
    let provider = AnthropicProvider::new(credentials(), transport.clone()).with_catalog(catalog());

    let items = run(&provider, ChatRequest::new("claude-test", vec![Message::user("hi")])).await;
    let error = items[0].as_ref().expect_err("should fail");
    assert!(error.is_model_not_found());
    assert_eq!(transport.attempted_models().len(), 2);
}

#[tokio::test]
async fn request_translation_lifts_system_and_groups_tool_results() {
    let transport = Arc::new(ScriptedTransport::new(vec![response(json!({
        "id": "msg_2",
        "content": [
            {"type": "tool_use", "name": "web_search", "input": {"query": "fuel prices"}}
        ]
    }))]));
    let provider = AnthropicProvider::new(credentials(), transport.clone());

    let calls = vec![
        ToolCall {
            id: "toolu_a".to_string(),
            name: "web_search".to_string(),
            arguments: "{\"query\":\"weather\"}".to_string(),
        },
        ToolCall {
            id: "toolu_b".to_string(),
            name: "web_search".to_string(),
            arguments: "{\"query\":\"traffic\"}".to_string(),
        },
    ];
    let request = ChatRequest::new(
        "anthropic-unlisted-model",
        vec![
            Message::system("You are a car assistant."),
            Message::system("Answer in one sentence."),
            Message::user("Weather and traffic?"),
            Message::assistant_tool_calls("", calls),
            Message::tool_result("toolu_a", "Sunny"),
            Message::tool_result("toolu_b", "Clear roads"),
        ],
    );

    let chunks = run(&provider, request)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .expect("request should succeed");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].id, "msg_2_tool");
    match &chunks[0].delta {
        ChunkDelta::ToolCalls(calls) => {
            assert_eq!(calls.len(), 1);
            assert!(calls[0].id.starts_with("toolu_"));
            assert_eq!(calls[0].arguments, "{\"query\":\"fuel prices\"}");
        }
        other => panic!("unexpected delta: {other:?}"),
    }

    let requests = transport.requests.lock().expect("requests lock");
    let sent = &requests[0];
    assert_eq!(sent.model, "anthropic-unlisted-model");
    assert_eq!(
        sent.system.as_deref(),
        Some("You are a car assistant.\n\nAnswer in one sentence.")
    );
    assert_eq!(sent.messages.len(), 3);
    assert_eq!(sent.messages[1].role, "assistant");
    assert_eq!(sent.messages[2].role, "user");
    assert_eq!(sent.messages[2].content.len(), 2);
    assert!(matches!(
        &sent.messages[2].content[0],
        AnthropicContentBlock::ToolResult { tool_use_id, .. } if tool_use_id == "toolu_a"
    ));
}
