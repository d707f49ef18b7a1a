//! Anthropic Messages API wire types and translation to and from shared models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ChatChunk, ChatRequest, Role, TokenUsage, ToolCall, response_chunks, schema};

/// `max_tokens` is mandatory on the Messages API.
pub const ANTHROPIC_DEFAULT_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnthropicRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl AnthropicRequest {
    /// System messages are lifted into `system`; consecutive same-role turns
    /// are merged because the API requires alternating roles.
    pub fn from_chat(request: &ChatRequest, model: impl Into<String>) -> Self {
        let mut messages: Vec<AnthropicMessage> = Vec::new();

        for message in &request.messages {
            let (role, blocks) = match message.role {
                Role::System => continue,
                Role::User => ("user", text_block(&message.content)),
                Role::Assistant => {
                    let mut blocks = text_block(&message.content);
                    blocks.extend(message.tool_calls.iter().map(|call| {
                        AnthropicContentBlock::ToolUse {
                            id: call.id.clone(),
                            name: call.name.clone(),
                            input: parse_arguments(&call.arguments),
                        }
                    }));
                    ("assistant", blocks)
                }
                Role::Tool => (
                    "user",
                    vec![AnthropicContentBlock::ToolResult {
                        tool_use_id: message.tool_call_id.clone().unwrap_or_default(),
                        content: message.content.clone(),
                    }],
                ),
            };

            if blocks.is_empty() {
                continue;
            }

            match messages.last_mut() {
                Some(previous) if previous.role == role => previous.content.extend(blocks),
                _ => messages.push(AnthropicMessage {
                    role,
                    content: blocks,
                }),
            }
        }

        Self {
            model: model.into(),
            max_tokens: request
                .options
                .max_tokens
                .unwrap_or(ANTHROPIC_DEFAULT_MAX_TOKENS),
            system: request.system_prompt(),
            messages,
            tools: request.tools.iter().map(schema::anthropic_tool).collect(),
            temperature: request.options.temperature,
        }
    }
}

fn text_block(content: &str) -> Vec<AnthropicContentBlock> {
    if content.trim().is_empty() {
        Vec::new()
    } else {
        vec![AnthropicContentBlock::Text {
            text: content.to_string(),
        }]
    }
}

fn parse_arguments(arguments: &str) -> Value {
    match serde_json::from_str::<Value>(arguments) {
        Ok(value @ Value::Object(_)) => value,
        _ => Value::Object(Map::new()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnthropicMessage {
    pub role: &'static str,
    pub content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnthropicResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub content: Vec<AnthropicResponseBlock>,
    #[serde(default)]
    pub usage: Option<AnthropicUsage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicResponseBlock {
    Text {
        text: String,
    },
    ToolUse {
        #[serde(default)]
        id: Option<String>,
        name: String,
        #[serde(default)]
        input: Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct AnthropicUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
    #[serde(default)]
    pub cache_read_input_tokens: Option<u32>,
}

impl From<AnthropicUsage> for TokenUsage {
    fn from(value: AnthropicUsage) -> Self {
        Self {
            prompt_tokens: value.input_tokens,
            completion_tokens: value.output_tokens,
            cached_tokens: value.cache_read_input_tokens.unwrap_or_default(),
            total_tokens: value.input_tokens.saturating_add(value.output_tokens),
        }
    }
}

impl AnthropicResponse {
    /// Text blocks are joined with blank lines; tool-use blocks without an id get one.
    pub fn into_chunks(self) -> Vec<ChatChunk> {
        let response_id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("msg_{}", uuid::Uuid::new_v4().simple()));

        let mut texts = Vec::new();
        let mut tool_calls = Vec::new();
        for block in self.content {
            match block {
                AnthropicResponseBlock::Text { text } if !text.is_empty() => texts.push(text),
                AnthropicResponseBlock::ToolUse { id, name, input } => tool_calls.push(ToolCall {
                    id: id
                        .filter(|id| !id.is_empty())
                        .unwrap_or_else(|| format!("toolu_{}", uuid::Uuid::new_v4().simple())),
                    name,
                    arguments: if input.is_null() {
                        "{}".to_string()
                    } else {
                        input.to_string()
                    },
                }),
                _ => {}
            }
        }

        response_chunks(
            &response_id,
            &texts.join("\n\n"),
            tool_calls,
            self.usage.map(TokenUsage::from),
        )
    }
}
