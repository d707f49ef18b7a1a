//! Transcript-layer value types.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vcommon::SessionId;

use crate::TextValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Maps a conversation role onto a speaker; other roles are not persisted.
    pub fn from_role(role: &str) -> Option<Self> {
        match role {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

impl Display for Speaker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRecord {
    pub session_id: SessionId,
    pub speaker: Speaker,
    pub text: String,
}

impl TurnRecord {
    pub fn new(session_id: SessionId, speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            session_id,
            speaker,
            text: text.into(),
        }
    }
}

/// An item appended to the live conversation by the session host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversationItem {
    pub role: String,
    pub text_content: Option<String>,
    pub content: TextValue,
}

impl ConversationItem {
    pub fn new(role: impl Into<String>, content: impl Into<TextValue>) -> Self {
        Self {
            role: role.into(),
            text_content: None,
            content: content.into(),
        }
    }

    pub fn with_text_content(mut self, text_content: impl Into<String>) -> Self {
        self.text_content = Some(text_content.into());
        self
    }

    /// Reads `role`, `text_content`, and `content` from a JSON object.
    ///
    /// Missing fields default to empty; a non-object yields an item with no role.
    pub fn from_json(value: &Value) -> Self {
        let role = value
            .get("role")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let text_content = value
            .get("text_content")
            .and_then(Value::as_str)
            .map(str::to_string);
        let content = value.get("content").map(TextValue::from).unwrap_or_default();

        Self {
            role,
            text_content,
            content,
        }
    }

    pub fn speaker(&self) -> Option<Speaker> {
        Speaker::from_role(&self.role)
    }

    /// Rendered text when present and non-empty, otherwise the raw content.
    pub fn preferred_text(&self) -> TextValue {
        match self.text_content.as_deref() {
            Some(rendered) if !rendered.is_empty() => TextValue::from(rendered),
            _ => self.content.clone(),
        }
    }
}

/// What a transcript event resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// No session bound, empty text, or an unpersisted role.
    Skipped,
    Duplicate,
    Queued,
}
