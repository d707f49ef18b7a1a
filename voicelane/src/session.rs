//! Synchronous session callbacks that feed the transcript manager.
//!
//! Every callback returns immediately; persistence happens on the manager's
//! background writer.

use std::sync::Arc;

use vprovider::ToolCall;
use vtooling::ToolExecutionResult;
use vtranscript::{ConversationItem, TextValue, TranscriptManager, TurnOutcome, TurnStore};

use crate::SessionMetadata;

const TOOL_OUTPUT_LOG_CHARS: usize = 100;

/// Buffers streamed assistant text until the reply is complete.
#[derive(Debug, Default)]
pub struct AssistantTranscriptSink {
    buffer: Vec<String>,
}

impl AssistantTranscriptSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture(&mut self, text: &str) {
        if !text.is_empty() {
            self.buffer.push(text.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn discard(&mut self) {
        self.buffer.clear();
    }

    /// Drains the buffer; returns the joined text when it is not blank.
    pub fn take_text(&mut self) -> Option<String> {
        let combined = self.buffer.concat();
        self.buffer.clear();

        let trimmed = combined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[derive(Debug)]
pub struct SessionHandlers {
    transcripts: TranscriptManager,
    sink: AssistantTranscriptSink,
}

impl SessionHandlers {
    pub fn new(transcripts: TranscriptManager) -> Self {
        Self {
            transcripts,
            sink: AssistantTranscriptSink::new(),
        }
    }

    pub fn for_metadata(metadata: &SessionMetadata, store: Arc<dyn TurnStore>) -> Self {
        if metadata.session_id.is_none() {
            tracing::warn!("session metadata has no session_id; transcripts will not be saved");
        }
        Self::new(TranscriptManager::new(metadata.session_id.clone(), store))
    }

    pub fn transcripts(&self) -> &TranscriptManager {
        &self.transcripts
    }

    pub fn on_user_input_transcribed(
        &mut self,
        transcript: impl Into<TextValue>,
        is_final: bool,
    ) -> TurnOutcome {
        self.transcripts
            .handle_user_transcript_chunk(transcript, is_final)
    }

    /// An absent message is ignored and leaves any buffered partial in place.
    pub fn on_user_speech_committed(&mut self, message: impl Into<TextValue>) -> TurnOutcome {
        let message = message.into();
        if matches!(message, TextValue::Absent) {
            return TurnOutcome::Skipped;
        }
        self.transcripts.handle_user_final_text(message)
    }

    pub fn on_agent_speech_committed(&mut self, message: impl Into<TextValue>) -> TurnOutcome {
        let message = message.into();
        if matches!(message, TextValue::Absent) {
            return TurnOutcome::Skipped;
        }
        self.transcripts.handle_assistant_text(message)
    }

    pub fn on_conversation_item_added(&mut self, item: &ConversationItem) -> TurnOutcome {
        self.transcripts.handle_conversation_item(item)
    }

    pub fn on_tool_calls_executed(&mut self, calls: &[ToolCall], results: &[ToolExecutionResult]) {
        for call in calls {
            let result = results
                .iter()
                .find(|result| result.tool_call_id == call.id);
            match result {
                Some(result) if result.is_error() => tracing::warn!(
                    tool = %call.name,
                    call_id = %call.id,
                    output = preview(&result.output, TOOL_OUTPUT_LOG_CHARS),
                    "tool call answered with an error"
                ),
                Some(result) => tracing::info!(
                    tool = %call.name,
                    call_id = %call.id,
                    output = preview(&result.output, TOOL_OUTPUT_LOG_CHARS),
                    "tool call executed"
                ),
                None => tracing::warn!(
                    tool = %call.name,
                    call_id = %call.id,
                    "tool call produced no result"
                ),
            }
        }
    }

    pub fn capture_assistant_text(&mut self, delta: &str) {
        self.sink.capture(delta);
    }

    pub fn flush_assistant_text(&mut self) -> TurnOutcome {
        match self.sink.take_text() {
            Some(text) => self.transcripts.handle_assistant_text(text),
            None => TurnOutcome::Skipped,
        }
    }

    /// Drops buffered text of a reply that failed before completing.
    pub fn discard_assistant_text(&mut self) {
        if !self.sink.is_empty() {
            tracing::debug!("discarding assistant text from a failed reply");
        }
        self.sink.discard();
    }

    /// Flushes pending assistant text and waits for queued turns.
    pub async fn close(mut self) {
        self.flush_assistant_text();
        self.transcripts.close().await;
    }
}

fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
