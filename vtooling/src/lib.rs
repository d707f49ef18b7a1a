//! Capability layer for registering and executing tools.

mod args;
mod error;
mod hooks;
mod registry;
mod runtime;
mod tool;
mod types;
mod web_search;

pub mod prelude {
    pub use crate::{
        DefaultToolRuntime, NoopToolRuntimeHooks, Tool, ToolError, ToolErrorKind,
        ToolExecutionContext, ToolExecutionResult, ToolOutcome, ToolRegistry, ToolRuntime,
        ToolRuntimeHooks, WebSearchTool,
    };
}

pub use args::{parse_json_object, parse_json_value, required_string};
pub use error::{ToolError, ToolErrorKind};
pub use hooks::{NoopToolRuntimeHooks, ToolOutcome, ToolRuntimeHooks};
pub use registry::ToolRegistry;
pub use runtime::{DefaultToolRuntime, ToolRuntime};
pub use tool::Tool;
pub use types::{TOOL_ERROR_PREFIX, ToolExecutionContext, ToolExecutionResult};
pub use web_search::{
    PERPLEXITY_API_KEY_ENV, PERPLEXITY_DEFAULT_URL, PerplexityHttpTransport,
    SEARCH_DISABLED_REPLY, SEARCH_NO_KEY_REPLY, SEARCH_STATUS_REPLY, SEARCH_UNAVAILABLE_REPLY,
    WEB_SEARCH_MAX_TOKENS, WEB_SEARCH_MODEL, WEB_SEARCH_SYSTEM_PROMPT, WEB_SEARCH_TEMPERATURE,
    WEB_SEARCH_TIMEOUT, WEB_SEARCH_TOOL_NAME, WebSearchMessage, WebSearchRequest,
    WebSearchTool, WebSearchTransport,
};
