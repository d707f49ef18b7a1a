#![cfg(feature = "provider-gemini")]

use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use serde_json::json;
use vprovider::adapters::gemini::{GeminiProvider, GeminiRequest, GeminiResponse, GeminiTransport};
use vprovider::{
    BoxFuture, ChatChunk, ChatRequest, ChunkDelta, Message, ModelProvider, ProviderError,
    ProviderErrorKind, ProviderId, SecretString, SecureCredentialManager, ToolSpec,
};

#[derive(Debug)]
struct FakeTransport {
    calls: Mutex<Vec<(String, serde_json::Value)>>,
    response: serde_json::Value,
}

impl FakeTransport {
    fn new(response: serde_json::Value) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response,
        }
    }
}

impl GeminiTransport for FakeTransport {
    fn generate_content<'a>(
        &'a self,
        model: &'a str,
        request: GeminiRequest,
        _api_key: SecretString,
    ) -> BoxFuture<'a, Result<GeminiResponse, ProviderError>> {
        Box::pin(async move {
            let wire = serde_json::to_value(&request).expect("request serializes");
            self.calls
                .lock()
                .expect("calls lock")
                .push((model.to_string(), wire));

            serde_json::from_value::<GeminiResponse>(self.response.clone())
                .map_err(|err| ProviderError::connectivity(err.to_string()))
        })
    }
}

fn credentials() -> Arc<SecureCredentialManager> {
    Arc::new(SecureCredentialManager::from_lookup(|key| {
        (key == "GOOGLE_API_KEY").then(|| "AIza-test".to_string())
    }))
}

async fn run(provider: &GeminiProvider, request: ChatRequest) -> Vec<Result<ChatChunk, ProviderError>> {
    provider.stream(request).collect::<Vec<_>>().await
}

#[tokio::test]
async fn single_call_maps_text_function_calls_and_usage() {
    let transport = Arc::new(FakeTransport::new(json!({
        "responseId": "gem-1",
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    {"text": "Searching "},
                    {"text": "now."},
                    {"functionCall": {"name": "web_search", "args": {"query": "EV chargers"}}}
                ]
            }
        }],
        "usageMetadata": {"promptTokenCount": 30, "candidatesTokenCount": 5, "totalTokenCount": 35}
    })));
    let provider = GeminiProvider::new(credentials(), transport.clone());
    assert!(provider.is_configured());

    let request = ChatRequest::new(
        "gemini-2.5-flash",
        vec![Message::system("Be brief."), Message::user("Chargers nearby?")],
    )
    .with_tools(vec![ToolSpec::new(
        "web_search",
        "Search",
        json!({"type": "object", "properties": {"query": {"type": "string"}}}),
    )])
    .with_temperature(0.2);

    let chunks = run(&provider, request)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .expect("request should succeed");

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].id, "gem-1");
    assert_eq!(chunks[0].text_content(), Some("Searching now."));
    assert_eq!(chunks[1].id, "gem-1_tool");
    match &chunks[1].delta {
        ChunkDelta::ToolCalls(calls) => {
            assert_eq!(calls[0].name, "web_search");
            assert_eq!(calls[0].arguments, "{\"query\":\"EV chargers\"}");
        }
        other => panic!("unexpected delta: {other:?}"),
    }
    assert!(matches!(chunks[2].delta, ChunkDelta::Usage(usage) if usage.total_tokens == 35));

    let calls = transport.calls.lock().expect("calls lock");
    assert_eq!(calls.len(), 1);
    let (model, wire) = &calls[0];
    assert_eq!(model, "gemini-2.5-flash");
    assert_eq!(wire["systemInstruction"]["parts"][0]["text"], "Be brief.");
    assert_eq!(wire["contents"][0]["role"], "user");
    assert_eq!(
        wire["tools"][0]["functionDeclarations"][0]["parameters"]["properties"]["query"]["type"],
        "STRING"
    );
    assert_eq!(wire["generationConfig"]["temperature"], json!(0.2_f32));
}

#[tokio::test]
async fn empty_candidates_are_retryable_connectivity_errors() {
    let transport = Arc::new(FakeTransport::new(json!({"candidates": []})));
    let provider = GeminiProvider::new(credentials(), transport.clone());

    let items = run(&provider, ChatRequest::new("gemini-2.5-pro", vec![Message::user("hi")])).await;
    assert_eq!(items.len(), 1);
    let error = items[0].as_ref().expect_err("should fail");
    assert_eq!(error.kind, ProviderErrorKind::Connectivity);
    assert!(error.retryable);
    assert_eq!(transport.calls.lock().expect("calls lock").len(), 1);
}

#[tokio::test]
async fn unconfigured_provider_reports_configuration_error() {
    let transport = Arc::new(FakeTransport::new(json!({})));
    let provider = GeminiProvider::new(Arc::new(SecureCredentialManager::new()), transport);

    assert!(!provider.is_configured());
    let items = run(&provider, ChatRequest::new("gemini-2.5-pro", vec![Message::user("hi")])).await;
    assert_eq!(
        items[0].as_ref().expect_err("should fail").kind,
        ProviderErrorKind::Configuration
    );
    assert_eq!(provider.id(), ProviderId::Gemini);
}
