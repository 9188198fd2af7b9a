//! Pluggable LLM provider trait.
//!
//! Implementations translate a [`ResponseRequest`] into a vendor call and
//! decode the reply into a [`ResponseObject`]. The research backends only
//! ever talk to this trait, which keeps them testable without a network.

use async_trait::async_trait;

use super::message::{ResponseObject, ResponseRequest};
use crate::error::AgentError;

/// Trait for hosted Responses API backends.
///
/// Implementations handle the transport layer (HTTP, auth, timeouts) for a
/// specific provider while presenting a uniform interface to the backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., `"openai"`).
    fn name(&self) -> &'static str;

    /// Creates one response.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on API failures, timeouts, or parse errors.
    async fn create_response(&self, request: &ResponseRequest)
    -> Result<ResponseObject, AgentError>;
}
