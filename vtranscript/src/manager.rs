//! Per-session transcript state: partial buffering, dedup, and turn hand-off.
//!
//! ```rust
//! use std::sync::Arc;
//! use vcommon::SessionId;
//! use vtranscript::{InMemoryTurnStore, TranscriptManager, TurnOutcome};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(InMemoryTurnStore::new());
//! let mut manager = TranscriptManager::new(Some(SessionId::new("sess-1")), store.clone());
//!
//! assert_eq!(manager.handle_user_transcript_chunk("turn", false), TurnOutcome::Skipped);
//! assert_eq!(manager.handle_user_transcript_chunk("turn left", true), TurnOutcome::Queued);
//! manager.close().await;
//!
//! assert_eq!(store.turns()[0].text, "turn left");
//! # }
//! ```

use std::sync::Arc;

use vcommon::SessionId;

use crate::{
    Clock, ConversationItem, DedupCache, MonotonicClock, Speaker, TextValue, TurnOutcome,
    TurnRecord, TurnStore, TurnWriter, normalize_text,
};

#[derive(Debug)]
pub struct TranscriptManager {
    session_id: Option<SessionId>,
    user_seen: DedupCache,
    assistant_seen: DedupCache,
    pending_partial: Option<String>,
    clock: Arc<dyn Clock>,
    writer: TurnWriter,
}

impl TranscriptManager {
    /// Binds the manager to a session and spawns its turn writer.
    ///
    /// A `None` or blank session id leaves persistence disabled.
    pub fn new(session_id: Option<SessionId>, store: Arc<dyn TurnStore>) -> Self {
        Self::with_writer(session_id, TurnWriter::new(store))
    }

    pub fn with_writer(session_id: Option<SessionId>, writer: TurnWriter) -> Self {
        Self {
            session_id: session_id.filter(|id| !id.is_empty()),
            user_seen: DedupCache::new(),
            assistant_seen: DedupCache::new(),
            pending_partial: None,
            clock: Arc::new(MonotonicClock),
            writer,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn pending_partial(&self) -> Option<&str> {
        self.pending_partial.as_deref()
    }

    /// Incremental speech-to-text output; only final chunks are persisted.
    pub fn handle_user_transcript_chunk(
        &mut self,
        text: impl Into<TextValue>,
        is_final: bool,
    ) -> TurnOutcome {
        let normalized = normalize_text(&text.into());
        if normalized.is_empty() {
            return TurnOutcome::Skipped;
        }

        if !is_final {
            self.pending_partial = Some(normalized);
            return TurnOutcome::Skipped;
        }

        self.pending_partial = None;
        self.maybe_save_turn(Speaker::User, normalized)
    }

    /// Committed user speech; falls back to the buffered partial when empty.
    pub fn handle_user_final_text(&mut self, text: impl Into<TextValue>) -> TurnOutcome {
        let normalized = normalize_text(&text.into());
        let pending = self.pending_partial.take();
        let text = if normalized.is_empty() {
            pending.unwrap_or_default()
        } else {
            normalized
        };

        self.maybe_save_turn(Speaker::User, text)
    }

    pub fn handle_assistant_text(&mut self, text: impl Into<TextValue>) -> TurnOutcome {
        let normalized = normalize_text(&text.into());
        self.maybe_save_turn(Speaker::Assistant, normalized)
    }

    pub fn handle_conversation_item(&mut self, item: &ConversationItem) -> TurnOutcome {
        let Some(speaker) = item.speaker() else {
            return TurnOutcome::Skipped;
        };

        let normalized = normalize_text(&item.preferred_text());
        self.maybe_save_turn(speaker, normalized)
    }

    /// Ends the session, waiting for queued turns to be attempted.
    pub async fn close(self) {
        self.writer.shutdown().await;
    }

    fn maybe_save_turn(&mut self, speaker: Speaker, text: String) -> TurnOutcome {
        let Some(session_id) = self.session_id.as_ref() else {
            return TurnOutcome::Skipped;
        };
        if text.is_empty() {
            return TurnOutcome::Skipped;
        }

        let now = self.clock.now();
        let seen = match speaker {
            Speaker::User => &mut self.user_seen,
            Speaker::Assistant => &mut self.assistant_seen,
        };
        if seen.check_and_record(&text, now) {
            tracing::debug!(
                speaker = %speaker,
                session_id = session_id.log_label(),
                "skipping duplicate transcript chunk"
            );
            return TurnOutcome::Duplicate;
        }

        if self
            .writer
            .enqueue(TurnRecord::new(session_id.clone(), speaker, text))
        {
            TurnOutcome::Queued
        } else {
            TurnOutcome::Skipped
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{InMemoryTurnStore, ManualClock};

    fn manager_with(
        session: Option<&str>,
    ) -> (TranscriptManager, Arc<InMemoryTurnStore>, Arc<ManualClock>) {
        let store = Arc::new(InMemoryTurnStore::new());
        let clock = Arc::new(ManualClock::new());
        let manager = TranscriptManager::new(session.map(SessionId::new), store.clone())
            .with_clock(clock.clone());
        (manager, store, clock)
    }

    #[tokio::test]
    async fn partials_are_buffered_and_replaced() {
        let (mut manager, store, _clock) = manager_with(Some("sess-1"));

        manager.handle_user_transcript_chunk("turn", false);
        manager.handle_user_transcript_chunk("  turn   left ", false);
        assert_eq!(manager.pending_partial(), Some("turn left"));

        manager.handle_user_transcript_chunk("", false);
        assert_eq!(manager.pending_partial(), Some("turn left"));

        manager.close().await;
        assert!(store.turns().is_empty());
    }

    #[tokio::test]
    async fn final_text_falls_back_to_pending_partial() {
        let (mut manager, store, _clock) = manager_with(Some("sess-1"));

        manager.handle_user_transcript_chunk("call mom", false);
        assert_eq!(manager.handle_user_final_text(""), TurnOutcome::Queued);
        assert_eq!(manager.pending_partial(), None);
        assert_eq!(manager.handle_user_final_text("   "), TurnOutcome::Skipped);

        manager.close().await;
        assert_eq!(store.turns()[0].text, "call mom");
    }

    #[tokio::test]
    async fn final_chunk_clears_partial_even_when_duplicate() {
        let (mut manager, _store, _clock) = manager_with(Some("sess-1"));

        assert_eq!(manager.handle_user_transcript_chunk("yes", true), TurnOutcome::Queued);
        manager.handle_user_transcript_chunk("ye", false);
        assert_eq!(manager.handle_user_transcript_chunk("yes", true), TurnOutcome::Duplicate);
        assert_eq!(manager.pending_partial(), None);

        manager.close().await;
    }

    #[tokio::test]
    async fn speakers_have_independent_dedup_windows() {
        let (mut manager, store, clock) = manager_with(Some("sess-1"));

        assert_eq!(manager.handle_user_final_text("okay"), TurnOutcome::Queued);
        assert_eq!(manager.handle_assistant_text("okay"), TurnOutcome::Queued);
        clock.advance(Duration::from_secs(1));
        assert_eq!(manager.handle_assistant_text("okay"), TurnOutcome::Duplicate);
        clock.advance(Duration::from_secs(5));
        assert_eq!(manager.handle_assistant_text("okay"), TurnOutcome::Queued);

        manager.close().await;
        assert_eq!(store.turns().len(), 3);
    }

    #[tokio::test]
    async fn missing_session_skips_persistence() {
        let (mut manager, store, _clock) = manager_with(None);

        assert_eq!(manager.handle_assistant_text("hello"), TurnOutcome::Skipped);
        assert_eq!(manager.handle_user_transcript_chunk("hi", true), TurnOutcome::Skipped);
        manager.close().await;
        assert!(store.turns().is_empty());

        let (manager, _store, _clock) = manager_with(Some("  "));
        assert!(manager.session_id().is_none());
        manager.close().await;
    }

    #[tokio::test]
    async fn conversation_items_prefer_rendered_text() {
        let (mut manager, store, _clock) = manager_with(Some("sess-1"));

        let item = ConversationItem::new("assistant", vec!["raw", "parts"])
            .with_text_content("Rendered reply");
        assert_eq!(manager.handle_conversation_item(&item), TurnOutcome::Queued);

        let item = ConversationItem::new("user", vec!["raw", "parts"]).with_text_content("");
        assert_eq!(manager.handle_conversation_item(&item), TurnOutcome::Queued);

        let item = ConversationItem::new("system", "ignored");
        assert_eq!(manager.handle_conversation_item(&item), TurnOutcome::Skipped);

        manager.close().await;
        let texts = store
            .turns()
            .into_iter()
            .map(|turn| turn.text)
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["Rendered reply", "raw parts"]);
    }
}
