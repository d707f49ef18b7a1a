//! Anthropic transport trait and reqwest-based HTTP implementation.

use std::time::Duration;

use reqwest::Client;

use crate::adapters::http::{DEFAULT_REQUEST_TIMEOUT, map_reqwest_error, status_error};
use crate::{BoxFuture, ProviderError, SecretString};

use super::types::{AnthropicRequest, AnthropicResponse};

pub const ANTHROPIC_DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

pub trait AnthropicTransport: Send + Sync + std::fmt::Debug {
    fn create_message<'a>(
        &'a self,
        request: AnthropicRequest,
        api_key: SecretString,
    ) -> BoxFuture<'a, Result<AnthropicResponse, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct AnthropicHttpTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl AnthropicHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: ANTHROPIC_DEFAULT_BASE_URL.to_string(),
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

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl AnthropicTransport for AnthropicHttpTransport {
    fn create_message<'a>(
        &'a self,
        request: AnthropicRequest,
        api_key: SecretString,
    ) -> BoxFuture<'a, Result<AnthropicResponse, ProviderError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint("messages"))
                .header("x-api-key", api_key.expose())
                .header("anthropic-version", ANTHROPIC_API_VERSION)
                .timeout(self.timeout)
                .json(&request)
                .send()
                .await
                .map_err(|err| map_reqwest_error("Anthropic", err))?;

            if !response.status().is_success() {
                return Err(status_error("Anthropic", response).await);
            }

            response
                .json::<AnthropicResponse>()
                .await
                .map_err(|err| map_reqwest_error("Anthropic", err))
        })
    }
}
