//! Common imports for voicelane session hosts.

pub use crate::{
    AssistantReply, AssistantTranscriptSink, ConfigError, ConfigErrorKind, ConversationItem,
    Message, MessageValue, ProviderError, ProviderId, Role, RuntimeBuilder, RuntimeBundle,
    RuntimeConfig, SessionHandlers, SessionMetadata, TextValue, TtsVoice, TurnOutcome,
    build_runtime, history_from_turns, init_tracing,
};
pub use crate::{vl_messages, vl_msg};
