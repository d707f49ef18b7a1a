//! Callbacks around each tool call made during an assistant turn.
//!
//! ```rust
//! use vtooling::{NoopToolRuntimeHooks, ToolRuntimeHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn ToolRuntimeHooks) {}
//!
//! assert_hooks_trait(&NoopToolRuntimeHooks);
//! ```

use std::time::Duration;

use vprovider::ToolCall;

use crate::{ToolError, ToolExecutionContext, ToolExecutionResult};

/// How a tool call ended.
#[derive(Debug, Clone, Copy)]
pub enum ToolOutcome<'a> {
    Answered(&'a ToolExecutionResult),
    Failed(&'a ToolError),
}

impl ToolOutcome<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Answered(_) => "answered",
            Self::Failed(_) => "failed",
        }
    }
}

pub trait ToolRuntimeHooks: Send + Sync {
    fn on_tool_started(&self, _call: &ToolCall, _context: &ToolExecutionContext) {}

    fn on_tool_finished(
        &self,
        _call: &ToolCall,
        _context: &ToolExecutionContext,
        _outcome: ToolOutcome<'_>,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopToolRuntimeHooks;

impl ToolRuntimeHooks for NoopToolRuntimeHooks {}
