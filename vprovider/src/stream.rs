//! Normalized chat chunks, chunk stream contracts, and in-memory stream utilities.
//!
//! ```rust
//! use vprovider::{BoxedChunkStream, ChatChunk, ChunkDelta, Role, VecChunkStream};
//!
//! let chunk = ChatChunk::text("resp_1", Role::Assistant, "hello");
//! assert!(matches!(chunk.delta, ChunkDelta::Text { .. }));
//!
//! let stream = VecChunkStream::new(vec![Ok(chunk)]);
//! let _boxed: BoxedChunkStream<'static> = Box::pin(stream);
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::{ProviderError, ProviderId, Role, TokenUsage, ToolCall};

pub const TOOL_CHUNK_SUFFIX: &str = "_tool";
pub const USAGE_CHUNK_SUFFIX: &str = "_usage";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkDelta {
    Text { role: Role, content: String },
    ToolCalls(Vec<ToolCall>),
    Usage(TokenUsage),
}

/// One normalized unit of a chat response.
///
/// Every chunk of a response shares the response id; tool and usage chunks
/// carry it with [`TOOL_CHUNK_SUFFIX`] and [`USAGE_CHUNK_SUFFIX`] appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatChunk {
    pub id: String,
    pub delta: ChunkDelta,
}

impl ChatChunk {
    pub fn text(response_id: &str, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: response_id.to_string(),
            delta: ChunkDelta::Text {
                role,
                content: content.into(),
            },
        }
    }

    pub fn tool_calls(response_id: &str, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            id: format!("{response_id}{TOOL_CHUNK_SUFFIX}"),
            delta: ChunkDelta::ToolCalls(tool_calls),
        }
    }

    pub fn usage(response_id: &str, usage: TokenUsage) -> Self {
        Self {
            id: format!("{response_id}{USAGE_CHUNK_SUFFIX}"),
            delta: ChunkDelta::Usage(usage),
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.delta {
            ChunkDelta::Text { content, .. } => Some(content.as_str()),
            _ => None,
        }
    }
}

/// Builds the chunk sequence of one complete response: text, then tool calls, then usage.
///
/// Empty text and empty tool call lists produce no chunk.
pub fn response_chunks(
    response_id: &str,
    text: &str,
    tool_calls: Vec<ToolCall>,
    usage: Option<TokenUsage>,
) -> Vec<ChatChunk> {
    let mut chunks = Vec::with_capacity(3);

    if !text.is_empty() {
        chunks.push(ChatChunk::text(response_id, Role::Assistant, text));
    }

    if !tool_calls.is_empty() {
        chunks.push(ChatChunk::tool_calls(response_id, tool_calls));
    }

    if let Some(usage) = usage {
        chunks.push(ChatChunk::usage(response_id, usage));
    }

    chunks
}

/// Provider stream contract.
///
/// Invariants for consumers:
/// - One response yields at most one text chunk, then at most one tool call chunk,
///   then at most one usage chunk.
/// - No network I/O happens before the first poll.
/// - Once the stream yields `None` or an error, it must not yield additional items.
pub trait ChunkStream: Stream<Item = Result<ChatChunk, ProviderError>> + Send {}

impl<T> ChunkStream for T where T: Stream<Item = Result<ChatChunk, ProviderError>> + Send {}

pub type BoxedChunkStream<'a> = Pin<Box<dyn ChunkStream + 'a>>;

#[derive(Debug)]
pub struct VecChunkStream {
    chunks: VecDeque<Result<ChatChunk, ProviderError>>,
}

impl VecChunkStream {
    pub fn new(chunks: Vec<Result<ChatChunk, ProviderError>>) -> Self {
        Self {
            chunks: chunks.into(),
        }
    }
}

impl Stream for VecChunkStream {
    type Item = Result<ChatChunk, ProviderError>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<ChatChunk, ProviderError>>> {
        Poll::Ready(self.chunks.pop_front())
    }
}

/// Provider-agnostic handle over one adapter invocation.
///
/// Items are forwarded untouched; the stream only records which provider and
/// concrete model key served the request.
pub struct ChatStream<'a> {
    provider: ProviderId,
    model: String,
    inner: BoxedChunkStream<'a>,
}

impl<'a> ChatStream<'a> {
    pub fn new(provider: ProviderId, model: impl Into<String>, inner: BoxedChunkStream<'a>) -> Self {
        Self {
            provider,
            model: model.into(),
            inner,
        }
    }

    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for ChatStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStream")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl Stream for ChatStream<'_> {
    type Item = Result<ChatChunk, ProviderError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
