//! Gemini `generateContent` wire types and translation to and from shared models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    ChatChunk, ChatRequest, ProviderError, Role, TokenUsage, ToolCall, response_chunks, schema,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<GeminiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

impl GeminiRequest {
    pub fn from_chat(request: &ChatRequest) -> Self {
        // Function responses are keyed by name, not by call id.
        let call_names = request
            .messages
            .iter()
            .flat_map(|message| message.tool_calls.iter())
            .map(|call| (call.id.as_str(), call.name.as_str()))
            .collect::<HashMap<_, _>>();

        let mut contents: Vec<GeminiContent> = Vec::new();
        for message in &request.messages {
            let (role, parts) = match message.role {
                Role::System => continue,
                Role::User => ("user", text_part(&message.content)),
                Role::Assistant => {
                    let mut parts = text_part(&message.content);
                    parts.extend(message.tool_calls.iter().map(|call| GeminiPart {
                        function_call: Some(GeminiFunctionCall {
                            name: call.name.clone(),
                            args: serde_json::from_str(&call.arguments)
                                .unwrap_or_else(|_| json!({})),
                        }),
                        ..GeminiPart::default()
                    }));
                    ("model", parts)
                }
                Role::Tool => {
                    let name = message
                        .tool_call_id
                        .as_deref()
                        .and_then(|id| call_names.get(id).copied())
                        .unwrap_or_default();

                    (
                        "user",
                        vec![GeminiPart {
                            function_response: Some(GeminiFunctionResponse {
                                name: name.to_string(),
                                response: json!({ "content": message.content }),
                            }),
                            ..GeminiPart::default()
                        }],
                    )
                }
            };

            if parts.is_empty() {
                continue;
            }

            match contents.last_mut() {
                Some(previous) if previous.role == Some(role) => previous.parts.extend(parts),
                _ => contents.push(GeminiContent {
                    role: Some(role),
                    parts,
                }),
            }
        }

        let system_instruction = request.system_prompt().map(|text| GeminiContent {
            role: None,
            parts: vec![GeminiPart::text(text)],
        });

        let tools = if request.tools.is_empty() {
            Vec::new()
        } else {
            vec![GeminiTool {
                function_declarations: request
                    .tools
                    .iter()
                    .map(schema::gemini_function_declaration)
                    .collect(),
            }]
        };

        let options = request.options;
        let generation_config = (!options.is_unset()).then_some(GeminiGenerationConfig {
            temperature: options.temperature,
            max_output_tokens: options.max_tokens,
        });

        Self {
            contents,
            system_instruction,
            tools,
            generation_config,
        }
    }
}

fn text_part(content: &str) -> Vec<GeminiPart> {
    if content.trim().is_empty() {
        Vec::new()
    } else {
        vec![GeminiPart::text(content)]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<GeminiFunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<GeminiFunctionResponse>,
}

impl GeminiPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiFunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiFunctionResponse {
    pub name: String,
    pub response: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiTool {
    pub function_declarations: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    pub response_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiResponseContent>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct GeminiResponseContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsage {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub cached_content_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

impl From<GeminiUsage> for TokenUsage {
    fn from(value: GeminiUsage) -> Self {
        let total_tokens = if value.total_token_count == 0 {
            value
                .prompt_token_count
                .saturating_add(value.candidates_token_count)
        } else {
            value.total_token_count
        };

        Self {
            prompt_tokens: value.prompt_token_count,
            completion_tokens: value.candidates_token_count,
            cached_tokens: value.cached_content_token_count,
            total_tokens,
        }
    }
}

impl GeminiResponse {
    /// Reads `candidates[0]`. A response without candidates is a retryable
    /// connectivity error: the service was reachable but returned nothing.
    pub fn into_chunks(self) -> Result<Vec<ChatChunk>, ProviderError> {
        let candidate = self.candidates.into_iter().next().ok_or_else(|| {
            ProviderError::connectivity("Gemini response did not include any candidates")
        })?;

        let response_id = self
            .response_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("gemini-{}", uuid::Uuid::new_v4().simple()));

        let mut text = String::new();
        let mut tool_calls = Vec::new();
        for part in candidate.content.map(|content| content.parts).unwrap_or_default() {
            if let Some(fragment) = part.text {
                text.push_str(&fragment);
            }

            if let Some(call) = part.function_call {
                tool_calls.push(ToolCall {
                    id: format!("call_{}", uuid::Uuid::new_v4().simple()),
                    name: call.name,
                    arguments: if call.args.is_null() {
                        "{}".to_string()
                    } else {
                        call.args.to_string()
                    },
                });
            }
        }

        Ok(response_chunks(
            &response_id,
            &text,
            tool_calls,
            self.usage_metadata.map(TokenUsage::from),
        ))
    }
}
