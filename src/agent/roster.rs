//! Agent definitions for the hosted multi-agent run.
//!
//! Hand-offs are exposed to the model as function tools named
//! `transfer_to_<snake_case_agent_name>`.

use super::config::AgentConfig;
use super::message::HostedTool;
use super::prompt::PromptSet;
use crate::error::AgentError;

/// Performs the research with web search.
pub const RESEARCH_AGENT: &str = "Research Agent";
/// Turns the query into structured research instructions.
pub const INSTRUCTION_AGENT: &str = "Research Instruction Agent";
/// Asks clarifying questions for vague queries.
pub const CLARIFYING_AGENT: &str = "Clarifying Questions Agent";
/// Entry point of the multi-agent pipeline.
pub const TRIAGE_AGENT: &str = "Triage Agent";

/// Prefix of hand-off function names.
pub const HANDOFF_PREFIX: &str = "transfer_to_";

/// One agent in the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSpec {
    /// Display name, also used for attribution.
    pub name: String,
    /// Model identifier.
    pub model: String,
    /// System instructions.
    pub instructions: String,
    /// Whether the hosted web search tool is enabled.
    pub web_search: bool,
    /// Names of agents this one may hand off to.
    pub handoffs: Vec<String>,
}

impl AgentSpec {
    /// Tools sent with every request for this agent.
    #[must_use]
    pub fn tools(&self) -> Vec<HostedTool> {
        let mut tools = Vec::with_capacity(self.handoffs.len() + 1);
        if self.web_search {
            tools.push(HostedTool::WebSearchPreview);
        }
        for target in &self.handoffs {
            tools.push(HostedTool::function(
                handoff_tool_name(target),
                format!("Handoff to the {target} agent to handle the request."),
            ));
        }
        tools
    }
}

/// The set of agents a run can reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    agents: Vec<AgentSpec>,
}

impl Roster {
    /// Creates a roster from explicit agent definitions.
    #[must_use]
    pub const fn new(agents: Vec<AgentSpec>) -> Self {
        Self { agents }
    }

    /// Triage → Clarifying → Instruction → Research pipeline.
    #[must_use]
    pub fn research_pipeline(config: &AgentConfig, prompts: &PromptSet) -> Self {
        let helper = |name: &str, instructions: &str, handoffs: &[&str]| AgentSpec {
            name: name.to_string(),
            model: config.helper_model.clone(),
            instructions: instructions.to_string(),
            web_search: false,
            handoffs: handoffs.iter().map(ToString::to_string).collect(),
        };

        Self::new(vec![
            AgentSpec {
                name: RESEARCH_AGENT.to_string(),
                model: config.agent_model.clone(),
                instructions: prompts.research.clone(),
                web_search: true,
                handoffs: Vec::new(),
            },
            helper(INSTRUCTION_AGENT, &prompts.instruction, &[RESEARCH_AGENT]),
            helper(CLARIFYING_AGENT, &prompts.clarifying, &[INSTRUCTION_AGENT]),
            helper(
                TRIAGE_AGENT,
                &prompts.triage,
                &[CLARIFYING_AGENT, INSTRUCTION_AGENT],
            ),
        ])
    }

    /// Looks up an agent by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// Looks up an agent by name, failing for unknown names.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnknownAgent`] if no agent has that name.
    pub fn require(&self, name: &str) -> Result<&AgentSpec, AgentError> {
        self.get(name).ok_or_else(|| AgentError::UnknownAgent {
            name: name.to_string(),
        })
    }

    /// Resolves a function call made by `from` to a hand-off target.
    ///
    /// Returns `Ok(None)` for ordinary function calls.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnknownAgent`] when the name has the hand-off
    /// prefix but matches none of `from`'s hand-off targets.
    pub fn resolve_handoff(
        &self,
        from: &AgentSpec,
        function_name: &str,
    ) -> Result<Option<&AgentSpec>, AgentError> {
        if !function_name.starts_with(HANDOFF_PREFIX) {
            return Ok(None);
        }
        from.handoffs
            .iter()
            .find(|target| handoff_tool_name(target) == function_name)
            .and_then(|target| self.get(target))
            .map(Some)
            .ok_or_else(|| AgentError::UnknownAgent {
                name: function_name.to_string(),
            })
    }
}

/// Function tool name for handing off to `agent_name`.
#[must_use]
pub fn handoff_tool_name(agent_name: &str) -> String {
    let snake: String = agent_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{HANDOFF_PREFIX}{snake}")
}
