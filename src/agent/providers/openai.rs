//! `OpenAI` provider implementation over the Responses API.
//!
//! Talks to `POST {base_url}/responses` with `reqwest`. Supports any
//! `OpenAI`-compatible endpoint via the base URL override in
//! [`AgentConfig`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::agent::config::AgentConfig;
use crate::agent::message::{ResponseObject, ResponseRequest};
use crate::agent::provider::LlmProvider;
use crate::error::AgentError;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Error envelope returned by the API on non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// `OpenAI`-compatible Responses API provider.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiProvider {
    /// Creates a new provider from agent configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiRequest`] if the HTTP client cannot be built.
    pub fn new(config: &AgentConfig) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::ApiRequest {
                message: format!("failed to build HTTP client: {e}"),
                status: None,
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: responses_endpoint(config.base_url.as_deref()),
        })
    }
}

/// Joins the base URL with the `/responses` path.
fn responses_endpoint(base_url: Option<&str>) -> String {
    let base = base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/');
    format!("{base}/responses")
}

/// Extracts the vendor error message from a failure body, falling back to
/// the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn create_response(
        &self,
        request: &ResponseRequest,
    ) -> Result<ResponseObject, AgentError> {
        debug!(
            model = %request.model,
            inputs = request.input.len(),
            tools = request.tools.len(),
            chained = request.previous_response_id.is_some(),
            "creating response"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AgentError::ApiRequest {
                message: if e.is_timeout() {
                    format!("request timed out: {e}")
                } else {
                    e.to_string()
                },
                status: e.status().map(|s| s.as_u16()),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| AgentError::ApiRequest {
            message: format!("failed to read response body: {e}"),
            status: Some(status.as_u16()),
        })?;

        if !status.is_success() {
            return Err(AgentError::from_api_failure(
                status.as_u16(),
                error_message(&body),
            ));
        }

        let parsed: ResponseObject =
            serde_json::from_str(&body).map_err(|e| AgentError::ResponseParse {
                message: e.to_string(),
            })?;
        debug!(id = %parsed.id, items = parsed.output.len(), "response received");
        Ok(parsed)
    }
}
