//! Unified research entry point.
//!
//! Routes a query to one backend (agent run or deep research), invokes it
//! once, and packages the result as a [`ResearchOutcome`].

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::client::create_provider;
use super::config::AgentConfig;
use super::deep_research::{DeepResearchApi, DeepResearchOptions};
use super::events::RunObserver;
use super::prompt::{PromptSet, build_clarified_input};
use super::runner::{AgentRunner, RunMode};
use crate::core::{
    DEFAULT_CONTEXT_WINDOW, ItemKind, MethodId, OutcomeMetadata, OutputItem, ResearchMethod,
    ResearchOutcome, extract_citations, summarize_flow,
};
use crate::error::AgentError;

/// Approach label of agent runs.
pub const AGENTS_APPROACH: &str = "openai_agents_orchestration";
/// Approach label of deep research calls.
pub const DEEP_RESEARCH_APPROACH: &str = "native_deep_research";

/// Parameters of one research invocation.
#[derive(Debug, Clone)]
pub struct ResearchRequest {
    /// Requested method.
    pub method: ResearchMethod,
    /// Starting point of agent runs; `None` derives it from whether
    /// clarifications were given.
    pub mode: Option<RunMode>,
    /// Clarification answers for multi-agent runs, in order.
    pub clarifications: Vec<(String, String)>,
    /// Context window for agent-run citations.
    pub window: usize,
    /// Deep research overrides.
    pub deep_research: DeepResearchOptions,
}

impl Default for ResearchRequest {
    fn default() -> Self {
        Self {
            method: ResearchMethod::Auto,
            mode: None,
            clarifications: Vec::new(),
            window: DEFAULT_CONTEXT_WINDOW,
            deep_research: DeepResearchOptions::default(),
        }
    }
}

/// Holds whichever backends are configured.
#[derive(Debug, Default)]
pub struct ResearchInterface {
    agents: Option<AgentRunner>,
    deep_research: Option<DeepResearchApi>,
}

impl ResearchInterface {
    /// Creates an interface over the given backends.
    #[must_use]
    pub const fn new(agents: Option<AgentRunner>, deep_research: Option<DeepResearchApi>) -> Self {
        Self {
            agents,
            deep_research,
        }
    }

    /// Creates both backends from configuration, sharing one provider.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnsupportedProvider`] or a client build error.
    pub fn from_config(
        config: &AgentConfig,
        observer: Option<Arc<dyn RunObserver>>,
    ) -> Result<Self, AgentError> {
        let provider = create_provider(config)?;
        let prompts = PromptSet::load(config.prompt_dir.as_deref());

        let mut runner = AgentRunner::from_config(Arc::clone(&provider), config, &prompts);
        if let Some(observer) = observer {
            runner = runner.with_observer(observer);
        }
        let deep = DeepResearchApi::from_config(provider, config, &prompts);
        Ok(Self::new(Some(runner), Some(deep)))
    }

    /// Backends that can serve requests.
    #[must_use]
    pub fn available_methods(&self) -> Vec<MethodId> {
        let mut methods = Vec::with_capacity(2);
        if self.agents.is_some() {
            methods.push(MethodId::Agents);
        }
        if self.deep_research.is_some() {
            methods.push(MethodId::DeepResearch);
        }
        methods
    }

    /// Resolves the backend `request.method` would use for `query`.
    ///
    /// # Errors
    ///
    /// See [`ResearchMethod::resolve`].
    pub fn resolve(&self, query: &str, method: ResearchMethod) -> Result<MethodId, AgentError> {
        method.resolve(
            query,
            self.agents.is_some(),
            self.deep_research.is_some(),
        )
    }

    /// Researches `query` with exactly one backend call.
    ///
    /// Backend failures produce an outcome whose `result_text` describes the
    /// error and whose `metadata.error` is set.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidQuery`] for a blank query, routing
    /// errors, and fatal backend errors such as
    /// [`AgentError::Unauthorized`].
    pub async fn research(
        &self,
        query: &str,
        request: &ResearchRequest,
    ) -> Result<ResearchOutcome, AgentError> {
        if query.trim().is_empty() {
            return Err(AgentError::InvalidQuery {
                message: "query must not be empty".to_string(),
            });
        }

        let method = self.resolve(query, request.method)?;
        info!(%method, "routing research query");

        match (method, &self.agents, &self.deep_research) {
            (MethodId::Agents, Some(runner), _) => {
                Self::research_with_agents(runner, query, request).await
            }
            (MethodId::DeepResearch, _, Some(api)) => {
                Self::research_with_deep(api, query, request).await
            }
            (method, ..) => Err(AgentError::BackendUnavailable {
                method: method.to_string(),
            }),
        }
    }

    async fn research_with_agents(
        runner: &AgentRunner,
        query: &str,
        request: &ResearchRequest,
    ) -> Result<ResearchOutcome, AgentError> {
        let has_clarifications = !request.clarifications.is_empty();
        let input = build_clarified_input(query, &request.clarifications);

        let started = Instant::now();
        let mode = request
            .mode
            .unwrap_or_else(|| RunMode::for_clarifications(has_clarifications));
        debug!(mode = mode.as_str(), "starting agent run");
        let run = runner.run(mode, &input).await;
        let elapsed = started.elapsed();

        let mut metadata = OutcomeMetadata {
            approach: AGENTS_APPROACH.to_string(),
            has_clarifications,
            ..OutcomeMetadata::default()
        };

        let run = match run {
            Ok(run) => run,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(error = %e, "agent run failed");
                metadata.error = Some(e.to_string());
                return Ok(ResearchOutcome {
                    query: query.to_string(),
                    method_used: MethodId::Agents,
                    result_text: format!("Error during research: {e}"),
                    citations: Vec::new(),
                    flow: Vec::new(),
                    reasoning_steps: Vec::new(),
                    web_searches: Vec::new(),
                    elapsed,
                    metadata,
                });
            }
        };

        let citations = extract_citations(&run.items, request.window);
        let (reasoning_steps, web_searches) = collect_trace(&run.items);
        metadata.citations_count = citations.len();
        metadata.reasoning_steps_count = reasoning_steps.len();
        metadata.web_searches_count = web_searches.len();
        metadata.agents_used = run.agents_used;

        Ok(ResearchOutcome {
            query: query.to_string(),
            method_used: MethodId::Agents,
            result_text: run.final_output,
            citations,
            flow: summarize_flow(&run.items),
            reasoning_steps,
            web_searches,
            elapsed,
            metadata,
        })
    }

    async fn research_with_deep(
        api: &DeepResearchApi,
        query: &str,
        request: &ResearchRequest,
    ) -> Result<ResearchOutcome, AgentError> {
        let started = Instant::now();
        let result = api.research(query, &request.deep_research).await?;
        let elapsed = started.elapsed();

        let metadata = OutcomeMetadata {
            approach: DEEP_RESEARCH_APPROACH.to_string(),
            model: Some(api.model().to_string()),
            citations_count: result.citations.len(),
            reasoning_steps_count: result.reasoning_steps.len(),
            web_searches_count: result.web_searches.len(),
            error: result.error,
            ..OutcomeMetadata::default()
        };

        Ok(ResearchOutcome {
            query: query.to_string(),
            method_used: MethodId::DeepResearch,
            result_text: result.text,
            citations: result.citations,
            flow: Vec::new(),
            reasoning_steps: result.reasoning_steps,
            web_searches: result.web_searches,
            elapsed,
            metadata,
        })
    }
}

/// Reasoning summary texts and web search queries, in item order.
fn collect_trace(items: &[OutputItem]) -> (Vec<String>, Vec<String>) {
    let mut reasoning_steps = Vec::new();
    let mut web_searches = Vec::new();
    for item in items {
        match &item.kind {
            ItemKind::Reasoning { summary } => reasoning_steps.extend(summary.iter().cloned()),
            ItemKind::WebSearchCall { query: Some(q) } => web_searches.push(q.clone()),
            _ => {}
        }
    }
    (reasoning_steps, web_searches)
}
