//! In-car voice assistant runtime.
//!
//! Wires the provider router, web search tool, and transcript persistence
//! behind per-session callbacks. Most hosts need only this crate.
//!
//! ```rust
//! use voicelane::{RuntimeConfig, SessionMetadata, build_runtime};
//!
//! let config = RuntimeConfig::from_lookup(|key| {
//!     (key == "OPENAI_API_KEY").then(|| "sk-test".to_string())
//! })
//! .expect("config");
//! let runtime = build_runtime(config).expect("runtime");
//!
//! let metadata = SessionMetadata::from_json_str(r#"{"session_id":"s-1","model":"gemini/gemini-2.5-pro"}"#);
//! let route = runtime.route(&metadata).expect("route");
//! assert!(route.fell_back);
//! ```

mod config;
mod macros;
mod metadata;
mod providers;
mod runtime;
mod session;

pub mod prelude;
pub mod util;

pub use vcommon;
pub use vobserve;
pub use vprovider;
pub use vtooling;
pub use vtranscript;

pub use config::{
    ANTHROPIC_BASE_URL_ENV, BACKEND_URL_ENV, CARTESIA_API_KEY_ENV, ConfigError, ConfigErrorKind,
    GEMINI_BASE_URL_ENV, OPENAI_BASE_URL_ENV, RuntimeConfig,
};
pub use metadata::{
    DEFAULT_LANGUAGE, DEFAULT_MODEL, DEFAULT_VOICE, LANGUAGE_DISPLAY_NAMES, STT_MODEL,
    SessionMetadata, SessionMode, TtsVoice, classify_voice, language_display_name,
};
pub use providers::{build_provider_registry, build_router};
pub use runtime::{AssistantReply, MAX_TOOL_ROUNDS, RuntimeBuilder, RuntimeBundle, build_runtime};
pub use session::{AssistantTranscriptSink, SessionHandlers};
pub use util::{history_from_turns, parse_provider_id, speaker_message};

pub use vcommon::{BoxFuture, SessionId};
pub use vobserve::{TracingOptions, init_tracing};
pub use vprovider::{
    ChatChunk, ChatRequest, ChatStream, ChunkDelta, Message, ModelProvider, ProviderError,
    ProviderErrorKind, ProviderId, ProviderRegistry, ProviderRouter, Role, RouteDecision,
    SecretString, ToolCall,
};
pub use vtooling::{ToolExecutionResult, WebSearchTool, WebSearchTransport};
pub use vtranscript::{
    ConversationItem, InMemoryTurnStore, MessageValue, Speaker, TextValue, TranscriptManager,
    TurnOutcome, TurnRecord, TurnStore,
};
