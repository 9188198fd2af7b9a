//! Backend routing by query keywords.
//!
//! Deep-research keywords are checked before agent keywords, so a query
//! matching both routes to [`MethodId::DeepResearch`].

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Keywords that favor the one-shot deep research backend.
pub const DEEP_RESEARCH_KEYWORDS: [&str; 8] = [
    "landscape",
    "comprehensive",
    "current state",
    "overview",
    "compare",
    "analysis",
    "trends",
    "future",
];

/// Keywords that favor the multi-agent backend.
pub const AGENT_KEYWORDS: [&str; 6] = [
    "how to",
    "implement",
    "specific",
    "technical",
    "which",
    "best",
];

/// A concrete research backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodId {
    /// Hosted multi-step agent run.
    #[serde(rename = "openai_agents")]
    Agents,
    /// Hosted one-shot deep research call.
    #[serde(rename = "deep_research_api")]
    DeepResearch,
}

impl MethodId {
    /// Returns the string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Agents => "openai_agents",
            Self::DeepResearch => "deep_research_api",
        }
    }
}

impl std::fmt::Display for MethodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-facing method choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchMethod {
    /// Pick a backend with [`select_method`].
    #[default]
    Auto,
    /// Force the multi-agent backend.
    Agents,
    /// Force the deep research backend.
    DeepResearch,
}

impl ResearchMethod {
    /// Parses a CLI method name (`auto`, `openai-agents`/`agents`,
    /// `deep-research`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "agents" | "openai-agents" | "openai_agents" => Some(Self::Agents),
            "deep-research" | "deep_research" | "deep_research_api" => Some(Self::DeepResearch),
            _ => None,
        }
    }

    /// Resolves to a concrete backend given what is configured.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NoBackendAvailable`] when `Auto` has nothing to
    /// fall back to, or [`AgentError::BackendUnavailable`] when a forced
    /// backend is not configured.
    pub fn resolve(
        self,
        query: &str,
        agents_available: bool,
        deep_research_available: bool,
    ) -> Result<MethodId, AgentError> {
        let forced = match self {
            Self::Auto => {
                return select_method(query, agents_available, deep_research_available);
            }
            Self::Agents => (MethodId::Agents, agents_available),
            Self::DeepResearch => (MethodId::DeepResearch, deep_research_available),
        };
        match forced {
            (method, true) => Ok(method),
            (method, false) => Err(AgentError::BackendUnavailable {
                method: method.to_string(),
            }),
        }
    }
}

/// Picks a backend for `query` from the available ones.
///
/// # Errors
///
/// Returns [`AgentError::NoBackendAvailable`] if neither backend is
/// available.
pub fn select_method(
    query: &str,
    agents_available: bool,
    deep_research_available: bool,
) -> Result<MethodId, AgentError> {
    let query = query.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| query.contains(k));

    if deep_research_available && mentions(&DEEP_RESEARCH_KEYWORDS) {
        return Ok(MethodId::DeepResearch);
    }
    if agents_available && mentions(&AGENT_KEYWORDS) {
        return Ok(MethodId::Agents);
    }

    if deep_research_available {
        Ok(MethodId::DeepResearch)
    } else if agents_available {
        Ok(MethodId::Agents)
    } else {
        Err(AgentError::NoBackendAvailable)
    }
}
