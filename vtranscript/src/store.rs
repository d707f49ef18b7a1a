//! Turn storage contracts, the backend HTTP store, and an in-memory store.

use std::sync::Mutex;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use vcommon::BoxFuture;

use crate::{PersistenceError, Speaker, TurnRecord};

pub const DEFAULT_BACKEND_URL: &str = "https://shaw.up.railway.app";
pub const TURN_SAVE_TIMEOUT: Duration = Duration::from_secs(5);

pub trait TurnStore: Send + Sync + std::fmt::Debug {
    fn save_turn<'a>(&'a self, turn: &'a TurnRecord) -> BoxFuture<'a, Result<(), PersistenceError>>;
}

#[derive(Debug, Serialize)]
struct TurnBody<'a> {
    speaker: Speaker,
    text: &'a str,
}

/// Posts turns to `{base_url}/v1/sessions/{session_id}/turns`.
#[derive(Debug, Clone)]
pub struct HttpTurnStore {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTurnStore {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: TURN_SAVE_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn turns_url(&self, session_id: &str) -> String {
        format!(
            "{}/v1/sessions/{session_id}/turns",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl TurnStore for HttpTurnStore {
    fn save_turn<'a>(&'a self, turn: &'a TurnRecord) -> BoxFuture<'a, Result<(), PersistenceError>> {
        Box::pin(async move {
            let text = validate_turn(turn)?;

            let response = self
                .client
                .post(self.turns_url(turn.session_id.as_str()))
                .timeout(self.timeout)
                .json(&TurnBody {
                    speaker: turn.speaker,
                    text,
                })
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::CREATED {
                return Ok(());
            }

            let body = response.text().await.unwrap_or_default();
            Err(PersistenceError::status(status.as_u16(), body))
        })
    }
}

/// Keeps every saved turn in arrival order.
#[derive(Debug, Default)]
pub struct InMemoryTurnStore {
    turns: Mutex<Vec<TurnRecord>>,
}

impl InMemoryTurnStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> Vec<TurnRecord> {
        self.turns
            .lock()
            .map(|turns| turns.clone())
            .unwrap_or_default()
    }
}

impl TurnStore for InMemoryTurnStore {
    fn save_turn<'a>(&'a self, turn: &'a TurnRecord) -> BoxFuture<'a, Result<(), PersistenceError>> {
        Box::pin(async move {
            let text = validate_turn(turn)?;
            let mut turns = self
                .turns
                .lock()
                .map_err(|_| PersistenceError::transport("turn store lock poisoned"))?;

            turns.push(TurnRecord::new(turn.session_id.clone(), turn.speaker, text));
            Ok(())
        })
    }
}

/// Returns the trimmed text, rejecting empty sessions and blank text.
fn validate_turn(turn: &TurnRecord) -> Result<&str, PersistenceError> {
    if turn.session_id.is_empty() {
        return Err(PersistenceError::invalid_turn("session id must not be empty"));
    }

    let text = turn.text.trim();
    if text.is_empty() {
        return Err(PersistenceError::invalid_turn("turn text must not be empty"));
    }

    Ok(text)
}
