//! Provider-agnostic chat contracts and multi-provider streaming adapters.
//!
//! A [`ProviderRouter`] resolves a model identifier through the [`ModelCatalog`],
//! picks a registered [`ModelProvider`], and hands back a [`ChatStream`] of
//! normalized [`ChatChunk`] values regardless of which remote service answers.

mod catalog;
mod credentials;
mod error;
mod hooks;
mod model;
mod provider;
mod registry;
mod router;
mod stream;

pub mod adapters;
pub mod prelude;
pub mod schema;

pub use catalog::{CatalogEntry, DEFAULT_MODEL, DEFAULT_PROVIDER, ModelCatalog, ModelResolution};
pub use credentials::{SecretString, SecureCredentialManager, api_key_env_vars};
pub use error::{ProviderError, ProviderErrorKind};
pub use hooks::{NoopOperationHooks, ProviderOperationHooks, execute_with_candidates};
pub use model::{
    ChatRequest, ChatRequestBuilder, Message, ProviderId, Role, TokenUsage, ToolCall, ToolSpec,
};
pub use provider::ModelProvider;
pub use registry::ProviderRegistry;
pub use router::{ProviderRouter, RouteDecision};
pub use stream::{
    BoxedChunkStream, ChatChunk, ChatStream, ChunkDelta, ChunkStream, TOOL_CHUNK_SUFFIX,
    USAGE_CHUNK_SUFFIX, VecChunkStream, response_chunks,
};
pub use vcommon::{BoxFuture, GenerationOptions};

#[cfg(feature = "provider-anthropic")]
pub use adapters::anthropic::{AnthropicHttpTransport, AnthropicProvider, AnthropicTransport};
#[cfg(feature = "provider-gemini")]
pub use adapters::gemini::{GeminiHttpTransport, GeminiProvider, GeminiTransport};
#[cfg(feature = "provider-openai")]
pub use adapters::openai::{OpenAiHttpTransport, OpenAiProvider, OpenAiTransport};
