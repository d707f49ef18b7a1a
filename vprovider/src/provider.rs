use crate::{BoxedChunkStream, ChatRequest, ProviderId};

/// One remote chat provider behind the uniform chunk stream contract.
pub trait ModelProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Whether the credentials this adapter needs are present.
    fn is_configured(&self) -> bool;

    /// Starts a chat completion. The returned stream is lazy: request
    /// validation and network I/O happen on first poll.
    fn stream<'a>(&'a self, request: ChatRequest) -> BoxedChunkStream<'a>;
}
