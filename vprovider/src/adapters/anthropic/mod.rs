mod provider;
mod transport;
mod types;

pub use provider::AnthropicProvider;
pub use transport::{
    ANTHROPIC_API_VERSION, ANTHROPIC_DEFAULT_BASE_URL, AnthropicHttpTransport, AnthropicTransport,
};
pub use types::{
    ANTHROPIC_DEFAULT_MAX_TOKENS, AnthropicContentBlock, AnthropicMessage, AnthropicRequest,
    AnthropicResponse, AnthropicResponseBlock, AnthropicUsage,
};
