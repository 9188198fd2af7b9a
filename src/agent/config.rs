//! Backend configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Default deep research model.
pub const DEFAULT_DEEP_RESEARCH_MODEL: &str = "o3-deep-research-2025-06-26";
/// Lighter deep research model.
pub const MINI_DEEP_RESEARCH_MODEL: &str = "o4-mini-deep-research-2025-06-26";
/// Default model for the Research Agent.
pub const DEFAULT_AGENT_MODEL: &str = "gpt-4o";
/// Default model for the triage, clarifying, and instruction agents.
pub const DEFAULT_HELPER_MODEL: &str = "gpt-4o-mini";
/// Default request timeout in seconds. Deep research calls run for minutes.
const DEFAULT_TIMEOUT_SECS: u64 = 600;
/// Default hand-off limit for agent runs.
const DEFAULT_MAX_TURNS: usize = 10;

/// Level of reasoning summaries requested from deep research models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningSummary {
    /// Let the model decide.
    #[default]
    Auto,
    /// Ask for detailed summaries.
    Detailed,
    /// Do not request reasoning at all.
    None,
}

impl ReasoningSummary {
    /// Parses `auto`, `detailed`, or `none`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "detailed" => Some(Self::Detailed),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Detailed => "detailed",
            Self::None => "none",
        }
    }
}

/// Configuration shared by the research backends.
#[derive(Clone)]
pub struct AgentConfig {
    /// LLM provider name (e.g., "openai").
    pub provider: String,
    /// API key for the provider.
    pub api_key: String,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// Model for the one-shot deep research backend.
    pub deep_research_model: String,
    /// Model for the Research Agent.
    pub agent_model: String,
    /// Model for the triage, clarifying, and instruction agents.
    pub helper_model: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Reasoning summary level for deep research.
    pub reasoning_summary: ReasoningSummary,
    /// Maximum agent turns (hand-offs included) before aborting a run.
    pub max_turns: usize,
    /// Directory containing prompt template files.
    pub prompt_dir: Option<PathBuf>,
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("deep_research_model", &self.deep_research_model)
            .field("agent_model", &self.agent_model)
            .field("helper_model", &self.helper_model)
            .field("timeout", &self.timeout)
            .field("reasoning_summary", &self.reasoning_summary)
            .field("max_turns", &self.max_turns)
            .field("prompt_dir", &self.prompt_dir)
            .finish()
    }
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key is found.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    deep_research_model: Option<String>,
    agent_model: Option<String>,
    helper_model: Option<String>,
    timeout: Option<Duration>,
    reasoning_summary: Option<ReasoningSummary>,
    max_turns: Option<usize>,
    prompt_dir: Option<PathBuf>,
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.provider.is_none() {
            self.provider = std::env::var("RESEARCH_PROVIDER").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("OPENAI_BASE_URL").ok();
        }
        if self.deep_research_model.is_none() {
            self.deep_research_model = std::env::var("RESEARCH_DEEP_MODEL").ok();
        }
        if self.agent_model.is_none() {
            self.agent_model = std::env::var("RESEARCH_AGENT_MODEL").ok();
        }
        if self.helper_model.is_none() {
            self.helper_model = std::env::var("RESEARCH_HELPER_MODEL").ok();
        }
        if self.timeout.is_none() {
            self.timeout = std::env::var("RESEARCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs);
        }
        if self.prompt_dir.is_none() {
            self.prompt_dir = std::env::var("RESEARCH_PROMPT_DIR")
                .ok()
                .map(PathBuf::from);
        }
        self
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the deep research model.
    #[must_use]
    pub fn deep_research_model(mut self, model: impl Into<String>) -> Self {
        self.deep_research_model = Some(model.into());
        self
    }

    /// Sets the Research Agent model.
    #[must_use]
    pub fn agent_model(mut self, model: impl Into<String>) -> Self {
        self.agent_model = Some(model.into());
        self
    }

    /// Sets the helper agent model.
    #[must_use]
    pub fn helper_model(mut self, model: impl Into<String>) -> Self {
        self.helper_model = Some(model.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the reasoning summary level.
    #[must_use]
    pub const fn reasoning_summary(mut self, summary: ReasoningSummary) -> Self {
        self.reasoning_summary = Some(summary);
        self
    }

    /// Sets the agent turn limit.
    #[must_use]
    pub const fn max_turns(mut self, n: usize) -> Self {
        self.max_turns = Some(n);
        self
    }

    /// Sets the prompt template directory.
    #[must_use]
    pub fn prompt_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompt_dir = Some(dir.into());
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key was set or the
    /// key is blank.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(AgentError::ApiKeyMissing)?;

        Ok(AgentConfig {
            provider: self.provider.unwrap_or_else(|| "openai".to_string()),
            api_key,
            base_url: self.base_url.filter(|u| !u.is_empty()),
            deep_research_model: self
                .deep_research_model
                .unwrap_or_else(|| DEFAULT_DEEP_RESEARCH_MODEL.to_string()),
            agent_model: self
                .agent_model
                .unwrap_or_else(|| DEFAULT_AGENT_MODEL.to_string()),
            helper_model: self
                .helper_model
                .unwrap_or_else(|| DEFAULT_HELPER_MODEL.to_string()),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            reasoning_summary: self.reasoning_summary.unwrap_or_default(),
            max_turns: self.max_turns.unwrap_or(DEFAULT_MAX_TURNS),
            prompt_dir: self.prompt_dir,
        })
    }
}
