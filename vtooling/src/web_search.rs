//! Web search tool backed by an online chat-completions search model.
//!
//! Every failure is turned into a short sentence the assistant can speak, so
//! the tool itself only errors on malformed arguments.
//!
//! ```rust
//! use std::sync::Arc;
//! use vtooling::{PerplexityHttpTransport, Tool, WEB_SEARCH_TOOL_NAME, WebSearchTool};
//!
//! let transport = Arc::new(PerplexityHttpTransport::new(reqwest::Client::new()));
//! let tool = WebSearchTool::new(transport, None).with_enabled(false);
//! assert_eq!(tool.spec().name, WEB_SEARCH_TOOL_NAME);
//! ```

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use vcommon::BoxFuture;
use vprovider::{SecretString, ToolSpec};

use crate::{
    Tool, ToolError, ToolErrorKind, ToolExecutionContext, parse_json_object, required_string,
};

pub const WEB_SEARCH_TOOL_NAME: &str = "web_search";
pub const PERPLEXITY_API_KEY_ENV: &str = "PERPLEXITY_API_KEY";
pub const PERPLEXITY_DEFAULT_URL: &str = "https://api.perplexity.ai/chat/completions";
pub const WEB_SEARCH_MODEL: &str = "llama-3.1-sonar-small-128k-online";
pub const WEB_SEARCH_SYSTEM_PROMPT: &str = "Provide concise, factual answers suitable for voice interaction while driving. Keep responses under 3 sentences for safety.";
pub const WEB_SEARCH_TEMPERATURE: f32 = 0.2;
pub const WEB_SEARCH_MAX_TOKENS: u32 = 200;
pub const WEB_SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

pub const SEARCH_DISABLED_REPLY: &str = "Web search is currently disabled in your settings.";
pub const SEARCH_NO_KEY_REPLY: &str = "Search unavailable: API key not configured";
pub const SEARCH_STATUS_REPLY: &str = "I'm having trouble searching the web right now.";
pub const SEARCH_UNAVAILABLE_REPLY: &str = "Search is temporarily unavailable.";

const RESULT_LOG_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebSearchRequest {
    pub model: String,
    pub messages: Vec<WebSearchMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebSearchMessage {
    pub role: &'static str,
    pub content: String,
}

impl WebSearchRequest {
    pub fn for_query(query: impl Into<String>) -> Self {
        Self {
            model: WEB_SEARCH_MODEL.to_string(),
            messages: vec![
                WebSearchMessage {
                    role: "system",
                    content: WEB_SEARCH_SYSTEM_PROMPT.to_string(),
                },
                WebSearchMessage {
                    role: "user",
                    content: query.into(),
                },
            ],
            temperature: WEB_SEARCH_TEMPERATURE,
            max_tokens: WEB_SEARCH_MAX_TOKENS,
        }
    }
}

/// Sends one search request and returns the answer text.
///
/// Non-success statuses surface as [`ToolErrorKind::Upstream`].
pub trait WebSearchTransport: Send + Sync + std::fmt::Debug {
    fn search<'a>(
        &'a self,
        request: WebSearchRequest,
        api_key: &'a SecretString,
    ) -> BoxFuture<'a, Result<String, ToolError>>;
}

#[derive(Debug, Clone)]
pub struct PerplexityHttpTransport {
    client: Client,
    url: String,
    timeout: Duration,
}

impl PerplexityHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: PERPLEXITY_DEFAULT_URL.to_string(),
            timeout: WEB_SEARCH_TIMEOUT,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl WebSearchTransport for PerplexityHttpTransport {
    fn search<'a>(
        &'a self,
        request: WebSearchRequest,
        api_key: &'a SecretString,
    ) -> BoxFuture<'a, Result<String, ToolError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(&self.url)
                .bearer_auth(api_key.expose())
                .timeout(self.timeout)
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ToolError::upstream(status.as_u16(), body));
            }

            let body = response.json::<SearchCompletion>().await?;
            extract_answer(body)
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchCompletion {
    #[serde(default)]
    choices: Vec<SearchChoice>,
}

#[derive(Debug, Deserialize)]
struct SearchChoice {
    message: SearchChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct SearchChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn extract_answer(completion: SearchCompletion) -> Result<String, ToolError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ToolError::execution("search response had no answer"))
}

pub struct WebSearchTool {
    transport: Arc<dyn WebSearchTransport>,
    api_key: Option<SecretString>,
    enabled: bool,
}

impl WebSearchTool {
    pub fn new(transport: Arc<dyn WebSearchTransport>, api_key: Option<SecretString>) -> Self {
        Self {
            transport,
            api_key: api_key.filter(|key| !key.is_empty()),
            enabled: true,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Runs a search and always produces a speakable answer.
    pub async fn search(&self, query: &str) -> String {
        if !self.enabled {
            return SEARCH_DISABLED_REPLY.to_string();
        }

        let Some(api_key) = self.api_key.as_ref() else {
            tracing::error!(env = PERPLEXITY_API_KEY_ENV, "web search key is not configured");
            return SEARCH_NO_KEY_REPLY.to_string();
        };

        tracing::info!(query, "web search");
        match self
            .transport
            .search(WebSearchRequest::for_query(query), api_key)
            .await
        {
            Ok(answer) => {
                tracing::info!(
                    result = preview(&answer, RESULT_LOG_CHARS),
                    "web search answered"
                );
                answer
            }
            Err(error) if error.kind == ToolErrorKind::Upstream => {
                tracing::error!(status = error.status, body = %error.message, "web search api error");
                SEARCH_STATUS_REPLY.to_string()
            }
            Err(error) => {
                tracing::error!(error = %error, "web search failed");
                SEARCH_UNAVAILABLE_REPLY.to_string()
            }
        }
    }
}

impl std::fmt::Debug for WebSearchTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSearchTool")
            .field("transport", &self.transport)
            .field("has_api_key", &self.api_key.is_some())
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Tool for WebSearchTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            WEB_SEARCH_TOOL_NAME,
            "Search the web for current information such as news, weather, traffic, events, or real-time facts. Returns a concise answer.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query to look up current information, news, weather, traffic, or real-time facts"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    fn invoke<'a>(
        &'a self,
        args_json: &'a str,
        _context: &'a ToolExecutionContext,
    ) -> BoxFuture<'a, Result<String, ToolError>> {
        Box::pin(async move {
            if !self.enabled {
                return Ok(SEARCH_DISABLED_REPLY.to_string());
            }

            let args = parse_json_object(args_json)?;
            let query = required_string(&args, "query")?;
            Ok(self.search(&query).await)
        })
    }
}

fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
