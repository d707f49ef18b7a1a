//! Shared provider error kinds and error value helpers.
//!
//! ```rust
//! use vprovider::ProviderError;
//!
//! let missing = ProviderError::configuration("no API key");
//! assert!(!missing.retryable);
//!
//! let upstream = ProviderError::remote_status(503, "overloaded");
//! assert!(upstream.retryable);
//!
//! let bad_request = ProviderError::remote_status(400, "bad request");
//! assert!(!bad_request.retryable);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// A required credential is absent for a provider with no fallback path.
    Configuration,
    /// The request was rejected before any network I/O.
    InvalidRequest,
    /// Transport failure, timeout, undecodable body, or a reachable but empty response.
    Connectivity,
    /// The remote service answered with a structured error status.
    RemoteStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub retryable: bool,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            retryable,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Configuration, message, false)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message, false)
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Connectivity, message, true)
    }

    /// Server-side (5xx) statuses are retryable, everything else is not.
    pub fn remote_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::RemoteStatus,
            message: message.into(),
            status: Some(status),
            retryable: (500..=599).contains(&status),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    pub fn is_model_not_found(&self) -> bool {
        self.kind == ProviderErrorKind::RemoteStatus && self.status == Some(404)
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{:?} ({status}): {}", self.kind, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ProviderError {}
