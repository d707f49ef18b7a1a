//! OpenAI HTTP payload serde models and conversion helpers.

use serde::Deserialize;

use crate::{ChatRequest, Message, ProviderError, Role, schema};

use super::types::{
    OpenAiFunctionCall, OpenAiMessage, OpenAiMessageToolCall, OpenAiRequest, OpenAiStreamChunk,
    OpenAiStreamOptions, OpenAiToolCallDelta, OpenAiUsage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpenAiTokenParameter {
    MaxTokens,
    MaxCompletionTokens,
}

impl OpenAiTokenParameter {
    /// Reasoning-era models only accept `max_completion_tokens`.
    pub(crate) fn for_model(model: &str) -> Self {
        let model = model.trim().to_ascii_lowercase();
        let reasoning = model.starts_with("gpt-5")
            || model
                .strip_prefix('o')
                .and_then(|rest| rest.chars().next())
                .is_some_and(|next| next.is_ascii_digit());

        if reasoning {
            Self::MaxCompletionTokens
        } else {
            Self::MaxTokens
        }
    }
}

pub(crate) fn build_api_request(request: &ChatRequest) -> OpenAiRequest {
    let (max_tokens, max_completion_tokens) = match OpenAiTokenParameter::for_model(&request.model)
    {
        OpenAiTokenParameter::MaxTokens => (request.options.max_tokens, None),
        OpenAiTokenParameter::MaxCompletionTokens => (None, request.options.max_tokens),
    };

    OpenAiRequest {
        model: request.model.clone(),
        messages: request.messages.iter().map(api_message).collect(),
        tools: request.tools.iter().map(schema::openai_tool).collect(),
        temperature: request.options.temperature,
        max_tokens,
        max_completion_tokens,
        stream: true,
        stream_options: OpenAiStreamOptions {
            include_usage: true,
        },
    }
}

fn api_message(message: &Message) -> OpenAiMessage {
    let tool_calls = message
        .tool_calls
        .iter()
        .map(|call| OpenAiMessageToolCall {
            id: call.id.clone(),
            r#type: "function",
            function: OpenAiFunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        })
        .collect::<Vec<_>>();

    // Assistant turns that only request tools carry no content.
    let content = if message.role == Role::Assistant
        && !tool_calls.is_empty()
        && message.content.is_empty()
    {
        None
    } else {
        Some(message.content.clone())
    };

    OpenAiMessage {
        role: message.role.as_str(),
        content,
        tool_calls,
        tool_call_id: message.tool_call_id.clone(),
    }
}

pub(crate) fn parse_stream_payload(payload: &str) -> Result<OpenAiStreamChunk, ProviderError> {
    let parsed: OpenAiApiStreamResponse = serde_json::from_str(payload).map_err(|err| {
        ProviderError::connectivity(format!("OpenAI stream event could not be decoded: {err}"))
    })?;

    Ok(OpenAiStreamChunk::from(parsed))
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiStreamResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<OpenAiApiStreamChoice>,
    #[serde(default)]
    pub usage: Option<OpenAiApiUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiStreamChoice {
    #[serde(default)]
    pub delta: OpenAiApiStreamDelta,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OpenAiApiStreamDelta {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<OpenAiApiDeltaToolCall>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiDeltaToolCall {
    pub index: Option<u32>,
    pub id: Option<String>,
    pub function: Option<OpenAiApiDeltaToolFunction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiDeltaToolFunction {
    pub name: Option<String>,
    pub arguments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
    #[serde(default)]
    pub prompt_tokens_details: Option<OpenAiApiPromptTokensDetails>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiPromptTokensDetails {
    #[serde(default)]
    pub cached_tokens: u32,
}

impl From<OpenAiApiUsage> for OpenAiUsage {
    fn from(value: OpenAiApiUsage) -> Self {
        Self {
            prompt_tokens: value.prompt_tokens,
            completion_tokens: value.completion_tokens,
            cached_tokens: value
                .prompt_tokens_details
                .map(|details| details.cached_tokens)
                .unwrap_or_default(),
            total_tokens: value.total_tokens,
        }
    }
}

impl From<OpenAiApiStreamResponse> for OpenAiStreamChunk {
    fn from(value: OpenAiApiStreamResponse) -> Self {
        let mut chunk = OpenAiStreamChunk {
            id: value.id,
            usage: value.usage.map(OpenAiUsage::from),
            ..OpenAiStreamChunk::default()
        };

        if let Some(choice) = value.choices.into_iter().next() {
            chunk.text = choice.delta.content;
            chunk.tool_calls = choice
                .delta
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(|call| {
                    let (name, arguments) = match call.function {
                        Some(function) => (function.name, function.arguments),
                        None => (None, None),
                    };

                    OpenAiToolCallDelta {
                        index: call.index.unwrap_or(0),
                        id: call.id,
                        name,
                        arguments,
                    }
                })
                .collect();
        }

        chunk
    }
}
