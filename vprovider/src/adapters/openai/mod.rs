mod provider;
mod serde_api;
mod transport;
mod types;

pub use provider::OpenAiProvider;
pub use transport::{
    OPENAI_DEFAULT_BASE_URL, OpenAiChunkStream, OpenAiHttpTransport, OpenAiTransport,
};
pub use types::{
    OpenAiFunctionCall, OpenAiMessage, OpenAiMessageToolCall, OpenAiRequest, OpenAiStreamChunk,
    OpenAiStreamOptions, OpenAiToolCallDelta, OpenAiUsage,
};
