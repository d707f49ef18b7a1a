//! What a tool sees about the session that asked for it, and what it hands back.
//!
//! ```rust
//! use vcommon::SessionId;
//! use vtooling::ToolExecutionContext;
//!
//! let context = ToolExecutionContext::new(SessionId::parse("sess-7"), "es-ES").in_round(2);
//! assert_eq!(context.session_label(), "sess-7");
//! assert_eq!(context.round, 2);
//!
//! let anonymous = ToolExecutionContext::new(None, "en-US");
//! assert_eq!(anonymous.session_label(), "-");
//! ```

use vcommon::SessionId;
use vprovider::{Message, ToolCall};

use crate::ToolError;

/// Prefix of the output fed back to the model when a tool call fails.
pub const TOOL_ERROR_PREFIX: &str = "Tool error: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionContext {
    /// `None` for sessions whose transcripts are not persisted.
    pub session_id: Option<SessionId>,
    /// BCP-47 tag of the language the driver is speaking.
    pub language: String,
    /// 1-based model/tool exchange within the current assistant turn.
    pub round: usize,
}

impl ToolExecutionContext {
    pub fn new(session_id: Option<SessionId>, language: impl Into<String>) -> Self {
        Self {
            session_id,
            language: language.into(),
            round: 1,
        }
    }

    pub fn in_round(mut self, round: usize) -> Self {
        self.round = round;
        self
    }

    /// Log-safe session id, or `-` when the session has none.
    pub fn session_label(&self) -> &str {
        self.session_id
            .as_ref()
            .map(SessionId::log_label)
            .unwrap_or("-")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionResult {
    pub tool_call_id: String,
    pub tool_name: String,
    pub output: String,
}

impl ToolExecutionResult {
    pub fn from_call(call: &ToolCall, output: impl Into<String>) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            output: output.into(),
        }
    }

    /// Reports a failed call to the model instead of aborting the turn.
    pub fn from_error(call: &ToolCall, error: &ToolError) -> Self {
        Self::from_call(call, format!("{TOOL_ERROR_PREFIX}{}", error.message))
    }

    pub fn is_error(&self) -> bool {
        self.output.starts_with(TOOL_ERROR_PREFIX)
    }

    /// The tool-role message that feeds this result back to the model.
    pub fn into_message(self) -> Message {
        Message::tool_result(self.tool_call_id, self.output)
    }
}
