//! OpenAI wire request types, stream deltas, and chunk accumulation.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::{ChatChunk, TokenUsage, ToolCall, response_chunks};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenAiRequest {
    pub model: String,
    pub messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    pub stream: bool,
    pub stream_options: OpenAiStreamOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpenAiStreamOptions {
    pub include_usage: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenAiMessage {
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<OpenAiMessageToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenAiMessageToolCall {
    pub id: String,
    pub r#type: &'static str,
    pub function: OpenAiFunctionCall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenAiFunctionCall {
    pub name: String,
    pub arguments: String,
}

/// One decoded `chat.completion.chunk` event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenAiStreamChunk {
    pub id: Option<String>,
    pub text: Option<String>,
    pub tool_calls: Vec<OpenAiToolCallDelta>,
    pub usage: Option<OpenAiUsage>,
}

/// A fragment of one tool call; fragments sharing `index` are concatenated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenAiToolCallDelta {
    pub index: u32,
    pub id: Option<String>,
    pub name: Option<String>,
    pub arguments: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenAiUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub cached_tokens: u32,
    pub total_tokens: u32,
}

impl From<OpenAiUsage> for TokenUsage {
    fn from(value: OpenAiUsage) -> Self {
        Self {
            prompt_tokens: value.prompt_tokens,
            completion_tokens: value.completion_tokens,
            cached_tokens: value.cached_tokens,
            total_tokens: value.total_tokens,
        }
    }
}

/// Folds OpenAI deltas into the chunks of one response.
///
/// Text fragments, tool call fragments and usage are all held until
/// [`OpenAiStreamAccumulator::finish`], which yields at most one chunk of each.
#[derive(Debug, Default)]
pub(crate) struct OpenAiStreamAccumulator {
    response_id: Option<String>,
    text: String,
    tool_calls: BTreeMap<u32, ToolCall>,
    usage: Option<OpenAiUsage>,
}

impl OpenAiStreamAccumulator {
    pub(crate) fn push(&mut self, chunk: OpenAiStreamChunk) {
        if self.response_id.is_none() {
            self.response_id = chunk.id.filter(|id| !id.trim().is_empty());
        }

        if let Some(text) = chunk.text {
            self.text.push_str(&text);
        }

        for delta in chunk.tool_calls {
            let entry = self.tool_calls.entry(delta.index).or_insert_with(|| ToolCall {
                id: String::new(),
                name: String::new(),
                arguments: String::new(),
            });

            if let Some(id) = delta.id.filter(|id| !id.is_empty()) {
                entry.id = id;
            }

            if let Some(name) = delta.name.filter(|name| !name.is_empty()) {
                entry.name = name;
            }

            if let Some(arguments) = delta.arguments {
                entry.arguments.push_str(&arguments);
            }
        }

        if chunk.usage.is_some() {
            self.usage = chunk.usage;
        }
    }

    pub(crate) fn finish(mut self) -> Vec<ChatChunk> {
        let response_id = self.response_id();
        let tool_calls = std::mem::take(&mut self.tool_calls)
            .into_values()
            .map(|mut call| {
                if call.id.is_empty() {
                    call.id = format!("call_{}", uuid::Uuid::new_v4().simple());
                }
                call
            })
            .collect::<Vec<_>>();

        response_chunks(
            &response_id,
            &self.text,
            tool_calls,
            self.usage.map(TokenUsage::from),
        )
    }

    fn response_id(&mut self) -> String {
        self.response_id
            .get_or_insert_with(|| format!("chatcmpl-{}", uuid::Uuid::new_v4().simple()))
            .clone()
    }
}
