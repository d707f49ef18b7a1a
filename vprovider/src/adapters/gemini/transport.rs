//! Gemini transport trait and reqwest-based HTTP implementation.

use std::time::Duration;

use reqwest::Client;

use crate::adapters::http::{DEFAULT_REQUEST_TIMEOUT, map_reqwest_error, status_error};
use crate::{BoxFuture, ProviderError, SecretString};

use super::types::{GeminiRequest, GeminiResponse};

pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub trait GeminiTransport: Send + Sync + std::fmt::Debug {
    fn generate_content<'a>(
        &'a self,
        model: &'a str,
        request: GeminiRequest,
        api_key: SecretString,
    ) -> BoxFuture<'a, Result<GeminiResponse, ProviderError>>;
}

/// Issues exactly one request per call; there is no client-side retry.
#[derive(Debug, Clone)]
pub struct GeminiHttpTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: GEMINI_DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
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

    fn endpoint(&self, model: &str) -> String {
        let model = model.trim_start_matches("models/");
        format!(
            "{}/models/{model}:generateContent",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl GeminiTransport for GeminiHttpTransport {
    fn generate_content<'a>(
        &'a self,
        model: &'a str,
        request: GeminiRequest,
        api_key: SecretString,
    ) -> BoxFuture<'a, Result<GeminiResponse, ProviderError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint(model))
                .header("x-goog-api-key", api_key.expose())
                .timeout(self.timeout)
                .json(&request)
                .send()
                .await
                .map_err(|err| map_reqwest_error("Gemini", err))?;

            if !response.status().is_success() {
                return Err(status_error("Gemini", response).await);
            }

            response
                .json::<GeminiResponse>()
                .await
                .map_err(|err| map_reqwest_error("Gemini", err))
        })
    }
}
