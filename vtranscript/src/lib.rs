//! Turns fragmented speech transcripts into deduplicated, persisted conversational turns.
//!
//! ```rust
//! use vtranscript::{ConversationItem, Speaker, TextValue, normalize_text};
//!
//! let item = ConversationItem::new("assistant", vec!["Turn", "left"]);
//! assert_eq!(item.speaker(), Some(Speaker::Assistant));
//! assert_eq!(normalize_text(&item.preferred_text()), "Turn left");
//! assert_eq!(normalize_text(&TextValue::from("  ok \n")), "ok");
//! ```

mod dedup;
mod error;
mod flatten;
mod manager;
mod store;
mod types;
mod writer;

pub use dedup::{Clock, DEDUP_WINDOW, DedupCache, ManualClock, MonotonicClock};
pub use error::{PersistenceError, PersistenceErrorKind};
pub use flatten::{
    MAP_KEY_ORDER, MESSAGE_ATTRIBUTE_ORDER, MessageValue, TextValue, flatten_text,
    normalize_text, normalize_whitespace,
};
pub use manager::TranscriptManager;
pub use store::{DEFAULT_BACKEND_URL, HttpTurnStore, InMemoryTurnStore, TURN_SAVE_TIMEOUT, TurnStore};
pub use types::{ConversationItem, Speaker, TurnOutcome, TurnRecord};
pub use writer::TurnWriter;
