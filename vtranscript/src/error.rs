//! Turn persistence errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceErrorKind {
    InvalidTurn,
    Timeout,
    Transport,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceError {
    pub kind: PersistenceErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl PersistenceError {
    pub fn new(kind: PersistenceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn invalid_turn(message: impl Into<String>) -> Self {
        Self::new(PersistenceErrorKind::InvalidTurn, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(PersistenceErrorKind::Timeout, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(PersistenceErrorKind::Transport, message)
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            kind: PersistenceErrorKind::Status,
            message: body.into(),
            status: Some(status),
        }
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{:?} ({status}): {}", self.kind, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for PersistenceError {}

impl From<reqwest::Error> for PersistenceError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::timeout(value.to_string())
        } else {
            Self::transport(value.to_string())
        }
    }
}
