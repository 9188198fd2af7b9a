//! Backend construction from configuration.

use std::sync::Arc;

use tracing::debug;

use crate::agent::config::AgentConfig;
use crate::agent::provider::LlmProvider;
use crate::agent::providers::OpenAiProvider;
use crate::error::AgentError;

/// Provider names accepted by [`create_provider`].
pub const SUPPORTED_PROVIDERS: [&str; 1] = ["openai"];

/// Creates the shared Responses API transport named by `config.provider`.
///
/// Both research backends hold a clone of the returned handle, so one HTTP
/// connection pool serves agent runs and deep research calls alike.
///
/// # Errors
///
/// Returns [`AgentError::UnsupportedProvider`] for names outside
/// [`SUPPORTED_PROVIDERS`], or [`AgentError::ApiRequest`] when the HTTP
/// client cannot be built.
pub fn create_provider(config: &AgentConfig) -> Result<Arc<dyn LlmProvider>, AgentError> {
    let provider: Arc<dyn LlmProvider> = match config.provider.to_lowercase().as_str() {
        "openai" => Arc::new(OpenAiProvider::new(config)?),
        other => {
            return Err(AgentError::UnsupportedProvider {
                name: other.to_string(),
            });
        }
    };
    debug!(
        provider = provider.name(),
        base_url = config.base_url.as_deref().unwrap_or("default"),
        "created research provider"
    );
    Ok(provider)
}
