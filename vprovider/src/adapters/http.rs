//! reqwest plumbing shared by the HTTP transports.

use std::time::Duration;

use reqwest::Response;
use serde::Deserialize;

use crate::ProviderError;

/// Default bound on an upstream call; the streaming transport applies it per read.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn map_reqwest_error(provider: &str, err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::connectivity(format!("{provider} request timed out: {err}"))
    } else if err.is_decode() {
        ProviderError::connectivity(format!("{provider} response could not be decoded: {err}"))
    } else {
        ProviderError::connectivity(format!("{provider} request failed: {err}"))
    }
}

pub(crate) async fn status_error(provider: &str, response: Response) -> ProviderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body)
        .unwrap_or_else(|| format!("{provider} request failed with status {status}"));

    ProviderError::remote_status(status.as_u16(), message)
}

/// Reads `{"error": {"message": ...}}`, the envelope all three providers share.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok()?;
    let message = parsed.error.message.trim().to_string();
    (!message.is_empty()).then_some(message)
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_error_message() {
        let body = r#"{"type":"error","error":{"type":"not_found_error","message":"model: claude-x"}}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("model: claude-x"));
        assert_eq!(extract_error_message("<html>bad gateway</html>"), None);
        assert_eq!(extract_error_message(r#"{"error":{"message":"  "}}"#), None);
    }
}
