//! Hosted one-shot deep research.
//!
//! A single request carries the developer message, the query, the hosted
//! tools, and optional reasoning summaries. Organizations that are not
//! verified for reasoning summaries get one retry without them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::{AgentConfig, ReasoningSummary};
use super::message::{HostedTool, InputItem, ReasoningConfig, ResponseObject, ResponseRequest};
use super::prompt::PromptSet;
use super::provider::LlmProvider;
use crate::core::{
    Citation, CitationOptions, ContentBlock, ItemKind, OutputItem, extract_citations_with,
};
use crate::error::AgentError;

/// Prefix of the result text when the call failed.
pub const ERROR_PREFIX: &str = "Error during research";

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct DeepResearchOptions {
    /// Developer message; the configured default when `None`.
    pub system_message: Option<String>,
    /// Reasoning summary level; the configured default when `None`.
    pub summary: Option<ReasoningSummary>,
    /// Hosted tools; web search and code interpreter when `None`.
    pub tools: Option<Vec<HostedTool>>,
}

/// What one deep research call produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeepResearchResult {
    /// Final report text, or the error description.
    pub text: String,
    /// Citations from the final content block.
    pub citations: Vec<Citation>,
    /// Reasoning summary texts in order.
    pub reasoning_steps: Vec<String>,
    /// Web search queries in order.
    pub web_searches: Vec<String>,
    /// Whether reasoning had to be dropped after a verification failure.
    #[serde(default)]
    pub reasoning_dropped: bool,
    /// Failure description, when the call failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeepResearchResult {
    /// Builds the textual result for a failed call.
    #[must_use]
    pub fn failed(error: &AgentError) -> Self {
        Self {
            text: format!("{ERROR_PREFIX}: {error}"),
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    /// Extracts text, citations, reasoning steps, and searches from a
    /// response.
    ///
    /// The final text is the first content block of the last output item.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::EmptyResponse`] when that block has no text.
    pub fn from_response(response: &ResponseObject) -> Result<Self, AgentError> {
        let block = response
            .final_block()
            .filter(|b| b.text.is_some())
            .ok_or(AgentError::EmptyResponse)?;
        let text = block.text.clone().unwrap_or_default();

        let message = OutputItem::new(
            None,
            ItemKind::MessageOutput {
                content: vec![ContentBlock::from(block.clone())],
            },
        );
        let citations = extract_citations_with(&[message], &CitationOptions::deep_research());

        let mut reasoning_steps = Vec::new();
        let mut web_searches = Vec::new();
        for item in &response.output {
            match item.item_type.as_str() {
                "reasoning" => reasoning_steps.extend(item.summary_texts()),
                "web_search_call" => {
                    if let Some(query) = item.search_query() {
                        web_searches.push(query.to_string());
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            text,
            citations,
            reasoning_steps,
            web_searches,
            reasoning_dropped: false,
            error: None,
        })
    }

    /// Returns `true` if the call failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Client for the hosted deep research models.
pub struct DeepResearchApi {
    provider: Arc<dyn LlmProvider>,
    model: String,
    summary: ReasoningSummary,
    system_prompt: String,
}

impl std::fmt::Debug for DeepResearchApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepResearchApi")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl DeepResearchApi {
    /// Creates a client for `model` with default prompt and summaries.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            summary: ReasoningSummary::default(),
            system_prompt: PromptSet::defaults().deep_research,
        }
    }

    /// Creates a client from configuration and loaded prompts.
    #[must_use]
    pub fn from_config(
        provider: Arc<dyn LlmProvider>,
        config: &AgentConfig,
        prompts: &PromptSet,
    ) -> Self {
        Self {
            provider,
            model: config.deep_research_model.clone(),
            summary: config.reasoning_summary,
            system_prompt: prompts.deep_research.clone(),
        }
    }

    /// The model used for research calls.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Builds the request for `query`.
    #[must_use]
    pub fn build_request(&self, query: &str, options: &DeepResearchOptions) -> ResponseRequest {
        let system = options
            .system_message
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.system_prompt);

        let mut request = ResponseRequest::new(
            self.model.clone(),
            vec![InputItem::developer(system), InputItem::user(query)],
        );
        request.tools = options
            .tools
            .clone()
            .unwrap_or_else(|| vec![HostedTool::WebSearchPreview, HostedTool::code_interpreter()]);
        request.reasoning = ReasoningConfig::for_summary(options.summary.unwrap_or(self.summary));
        request
    }

    /// Sends the request, retrying once without reasoning when the
    /// organization is not verified for reasoning summaries.
    ///
    /// Returns the response and whether reasoning was dropped.
    ///
    /// # Errors
    ///
    /// Propagates provider errors, including a second verification failure.
    pub async fn create(
        &self,
        query: &str,
        options: &DeepResearchOptions,
    ) -> Result<(ResponseObject, bool), AgentError> {
        let mut request = self.build_request(query, options);
        debug!(model = %self.model, reasoning = request.reasoning.is_some(), "starting deep research");

        match self.provider.create_response(&request).await {
            Err(AgentError::CapabilityNotVerified { message }) if request.reasoning.is_some() => {
                warn!(%message, "organization not verified for reasoning, retrying without summaries");
                request.reasoning = None;
                let response = self.provider.create_response(&request).await?;
                Ok((response, true))
            }
            other => other.map(|response| (response, false)),
        }
    }

    /// Runs one research call.
    ///
    /// Failures other than credential and configuration errors are returned
    /// as a textual result with `error` set.
    ///
    /// # Errors
    ///
    /// Returns fatal errors ([`AgentError::is_fatal`]) unchanged.
    pub async fn research(
        &self,
        query: &str,
        options: &DeepResearchOptions,
    ) -> Result<DeepResearchResult, AgentError> {
        let outcome = self
            .create(query, options)
            .await
            .and_then(|(response, dropped)| {
                DeepResearchResult::from_response(&response).map(|mut result| {
                    result.reasoning_dropped = dropped;
                    result
                })
            });

        match outcome {
            Ok(result) => {
                info!(
                    citations = result.citations.len(),
                    reasoning_steps = result.reasoning_steps.len(),
                    web_searches = result.web_searches.len(),
                    "deep research completed"
                );
                Ok(result)
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(error = %e, "deep research failed");
                Ok(DeepResearchResult::failed(&e))
            }
        }
    }
}
