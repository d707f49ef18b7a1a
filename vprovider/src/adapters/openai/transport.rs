//! OpenAI transport trait and reqwest-based SSE implementation.

use std::pin::Pin;
use std::time::Duration;

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::Client;

use crate::adapters::http::{DEFAULT_REQUEST_TIMEOUT, map_reqwest_error, status_error};
use crate::{BoxFuture, ProviderError, SecretString};

use super::serde_api::parse_stream_payload;
use super::types::{OpenAiRequest, OpenAiStreamChunk};

pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub type OpenAiChunkStream<'a> =
    Pin<Box<dyn Stream<Item = Result<OpenAiStreamChunk, ProviderError>> + Send + 'a>>;

pub trait OpenAiTransport: Send + Sync + std::fmt::Debug {
    fn stream<'a>(
        &'a self,
        request: OpenAiRequest,
        api_key: SecretString,
    ) -> BoxFuture<'a, Result<OpenAiChunkStream<'a>, ProviderError>>;
}

/// Streams chat completions over SSE.
///
/// The timeout bounds the wait for response headers and each gap between body
/// reads, not the whole reply, so long answers are not cut off.
#[derive(Debug, Clone)]
pub struct OpenAiHttpTransport {
    client: Client,
    base_url: String,
    idle_timeout: Duration,
}

impl OpenAiHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: OPENAI_DEFAULT_BASE_URL.to_string(),
            idle_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl OpenAiTransport for OpenAiHttpTransport {
    fn stream<'a>(
        &'a self,
        request: OpenAiRequest,
        api_key: SecretString,
    ) -> BoxFuture<'a, Result<OpenAiChunkStream<'a>, ProviderError>> {
        Box::pin(async move {
            let send = self
                .client
                .post(self.endpoint("chat/completions"))
                .bearer_auth(api_key.expose())
                .json(&request)
                .send();
            let response = tokio::time::timeout(self.idle_timeout, send)
                .await
                .map_err(|_| idle_timeout_error(self.idle_timeout))?
                .map_err(|err| map_reqwest_error("OpenAI", err))?;

            if !response.status().is_success() {
                return Err(status_error("OpenAI", response).await);
            }

            let idle_timeout = self.idle_timeout;
            let stream = try_stream! {
                let mut bytes = response.bytes_stream();
                let mut lines = SseLineBuffer::default();
                let mut done = false;

                loop {
                    let next = tokio::time::timeout(idle_timeout, bytes.next())
                        .await
                        .map_err(|_| idle_timeout_error(idle_timeout))?;
                    let Some(item) = next else {
                        break;
                    };
                    let item = item.map_err(|err| map_reqwest_error("OpenAI", err))?;
                    for event in lines.push(&item) {
                        match event {
                            SseEvent::Done => done = true,
                            SseEvent::Data(payload) if !done => {
                                yield parse_stream_payload(&payload)?;
                            }
                            SseEvent::Data(_) => {}
                        }
                    }

                    if done {
                        break;
                    }
                }

                if !done {
                    for event in lines.finish() {
                        if let SseEvent::Data(payload) = event {
                            yield parse_stream_payload(&payload)?;
                        }
                    }
                }
            };

            Ok(Box::pin(stream) as OpenAiChunkStream<'a>)
        })
    }
}

fn idle_timeout_error(timeout: Duration) -> ProviderError {
    ProviderError::connectivity(format!("OpenAI stream was idle for more than {timeout:?}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SseEvent {
    Data(String),
    Done,
}

/// Splits a server-sent-event byte stream into `data:` payloads.
///
/// Bytes are buffered until a full line is available, so multi-byte UTF-8
/// sequences split across network reads decode correctly.
#[derive(Debug, Default)]
pub(crate) struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    pub(crate) fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.pending.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(newline) = self.pending.iter().position(|byte| *byte == b'\n') {
            let line = self.pending.drain(..=newline).collect::<Vec<_>>();
            events.extend(Self::parse_line(&line));
        }

        events
    }

    /// Flushes a trailing line that was not newline-terminated.
    pub(crate) fn finish(&mut self) -> Vec<SseEvent> {
        let line = std::mem::take(&mut self.pending);
        Self::parse_line(&line).into_iter().collect()
    }

    fn parse_line(line: &[u8]) -> Option<SseEvent> {
        let line = String::from_utf8_lossy(line);
        let payload = line.trim().strip_prefix("data:")?.trim();

        match payload {
            "" => None,
            "[DONE]" => Some(SseEvent::Done),
            payload => Some(SseEvent::Data(payload.to_string())),
        }
    }
}
