//! Common `vprovider` imports for downstream crates.

pub use crate::{
    BoxedChunkStream, ChatChunk, ChatRequest, ChatRequestBuilder, ChatStream, ChunkDelta,
    Message, ModelCatalog, ModelProvider, NoopOperationHooks, ProviderError, ProviderErrorKind,
    ProviderId, ProviderOperationHooks, ProviderRegistry, ProviderRouter, Role,
    SecureCredentialManager, TokenUsage, ToolCall, ToolSpec,
};
pub use vcommon::{BoxFuture, GenerationOptions};
