//! Hosted multi-agent run.
//!
//! Drives the agent ↔ hand-off round-trip: sends the current agent's request,
//! captures its output items, follows a hand-off by answering the hand-off
//! call and continuing with the target agent, and stops when a response
//! contains no hand-off or the turn limit is reached.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::AgentConfig;
use super::events::{RunEvent, RunObserver};
use super::message::{InputItem, ResponseRequest};
use super::prompt::PromptSet;
use super::provider::LlmProvider;
use super::roster::{AgentSpec, RESEARCH_AGENT, Roster, TRIAGE_AGENT};
use crate::core::{ItemKind, OutputItem};
use crate::error::AgentError;

/// Prefix of the final output when the run produced no message.
pub const MISSING_OUTPUT_PREFIX: &str = "Research completed but could not retrieve final output";

/// Where a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Straight to the Research Agent.
    #[default]
    Basic,
    /// Through the Triage Agent.
    MultiAgent,
}

impl RunMode {
    /// Parses `basic` or `multi-agent`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "multi-agent" | "multi_agent" | "multi" => Some(Self::MultiAgent),
            _ => None,
        }
    }

    /// Returns the string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::MultiAgent => "multi-agent",
        }
    }

    /// Mode used when the caller did not pick one: multi-agent only when
    /// clarification answers were supplied.
    #[must_use]
    pub const fn for_clarifications(has_clarifications: bool) -> Self {
        if has_clarifications {
            Self::MultiAgent
        } else {
            Self::Basic
        }
    }

    /// Name of the starting agent.
    #[must_use]
    pub const fn starting_agent(&self) -> &'static str {
        match self {
            Self::Basic => RESEARCH_AGENT,
            Self::MultiAgent => TRIAGE_AGENT,
        }
    }
}

/// Everything captured from one run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Output items in execution order, attributed to their agent.
    pub items: Vec<OutputItem>,
    /// Text of the last message output, or a fallback notice.
    pub final_output: String,
    /// Agents that took control, in order of first appearance.
    pub agents_used: Vec<String>,
    /// Identifier of the last response.
    pub last_response_id: Option<String>,
}

/// Runs agents from a [`Roster`] against a provider.
pub struct AgentRunner {
    provider: Arc<dyn LlmProvider>,
    roster: Roster,
    max_turns: usize,
    observer: Option<Arc<dyn RunObserver>>,
}

impl std::fmt::Debug for AgentRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRunner")
            .field("provider", &self.provider.name())
            .field("roster", &self.roster)
            .field("max_turns", &self.max_turns)
            .finish_non_exhaustive()
    }
}

impl AgentRunner {
    /// Creates a runner.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, roster: Roster, max_turns: usize) -> Self {
        Self {
            provider,
            roster,
            max_turns,
            observer: None,
        }
    }

    /// Creates a runner over the standard research pipeline.
    #[must_use]
    pub fn from_config(
        provider: Arc<dyn LlmProvider>,
        config: &AgentConfig,
        prompts: &PromptSet,
    ) -> Self {
        Self::new(
            provider,
            Roster::research_pipeline(config, prompts),
            config.max_turns,
        )
    }

    /// Attaches an observer for [`RunEvent`]s.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The configured turn limit.
    #[must_use]
    pub const fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Runs `input` starting at the agent `mode` selects.
    ///
    /// # Errors
    ///
    /// Propagates provider errors, [`AgentError::UnknownAgent`] for bad
    /// hand-offs, and [`AgentError::MaxTurnsExceeded`] at the turn limit.
    pub async fn run(&self, mode: RunMode, input: &str) -> Result<RunResult, AgentError> {
        self.run_from(mode.starting_agent(), input).await
    }

    /// Runs `input` starting at the named agent.
    ///
    /// # Errors
    ///
    /// See [`AgentRunner::run`].
    pub async fn run_from(&self, start: &str, input: &str) -> Result<RunResult, AgentError> {
        let mut agent = self.roster.require(start)?;
        let mut agents_used = vec![agent.name.clone()];
        self.emit(RunEvent::AgentUpdated {
            agent: agent.name.clone(),
        });

        let mut items = Vec::new();
        let mut next_input = vec![InputItem::user(input)];
        let mut previous_response_id: Option<String> = None;

        for turn in 0..self.max_turns {
            let mut request =
                ResponseRequest::new(agent.model.clone(), std::mem::take(&mut next_input));
            request.instructions = Some(agent.instructions.clone());
            request.tools = agent.tools();
            request.previous_response_id.clone_from(&previous_response_id);

            debug!(turn, agent = %agent.name, "requesting agent turn");
            let response = self.provider.create_response(&request).await?;
            if !response.id.is_empty() {
                previous_response_id = Some(response.id.clone());
            }

            let mut handoff: Option<&AgentSpec> = None;
            for wire in response.output {
                if !wire.is_function_call() {
                    let item = wire.into_output_item(Some(&agent.name));
                    self.emit_item(&item);
                    items.push(item);
                    continue;
                }

                let name = wire.name.clone().unwrap_or_default();
                let call_id = wire.call_id.clone().unwrap_or_default();
                if let Some(target) = self.roster.resolve_handoff(agent, &name)? {
                    let output = if handoff.is_none() {
                        handoff = Some(target);
                        serde_json::json!({ "assistant": target.name })
                    } else {
                        warn!(agent = %agent.name, function = %name, "ignoring extra hand-off");
                        serde_json::json!({ "error": "Multiple handoffs detected, ignoring this one." })
                    };
                    next_input.push(InputItem::function_output(call_id, output.to_string()));
                    items.push(OutputItem::new(
                        Some(&agent.name),
                        ItemKind::HandoffCall { target: Some(name) },
                    ));
                    continue;
                }

                let output = serde_json::json!({ "error": format!("Tool {name} is not available.") });
                next_input.push(InputItem::function_output(call_id, output.to_string()));
                let item = wire.into_output_item(Some(&agent.name));
                self.emit_item(&item);
                items.push(item);
            }

            match handoff {
                Some(target) => {
                    debug!(from = %agent.name, to = %target.name, "hand-off");
                    agent = target;
                    if !agents_used.contains(&agent.name) {
                        agents_used.push(agent.name.clone());
                    }
                    self.emit(RunEvent::AgentUpdated {
                        agent: agent.name.clone(),
                    });
                }
                None if next_input.is_empty() => {
                    debug!(turns = turn + 1, items = items.len(), "agent run completed");
                    return Ok(RunResult {
                        final_output: final_output(&items),
                        items,
                        agents_used,
                        last_response_id: previous_response_id,
                    });
                }
                None => debug!(agent = %agent.name, "answering unavailable tool calls"),
            }
        }

        Err(AgentError::MaxTurnsExceeded {
            max_turns: self.max_turns,
        })
    }

    fn emit(&self, event: RunEvent) {
        if let Some(observer) = &self.observer {
            observer.on_event(&event);
        }
    }

    fn emit_item(&self, item: &OutputItem) {
        let agent = item.agent_label().to_string();
        let event = match &item.kind {
            ItemKind::WebSearchCall { query } => RunEvent::WebSearch {
                agent,
                query: query.clone(),
            },
            ItemKind::ToolCall { name, .. } => RunEvent::ToolCalled {
                agent,
                name: name.clone().unwrap_or_default(),
            },
            ItemKind::MessageOutput { .. } => RunEvent::MessageProduced { agent },
            _ => return,
        };
        self.emit(event);
    }
}

/// Text of the last message output item.
fn final_output(items: &[OutputItem]) -> String {
    items
        .iter()
        .rev()
        .find_map(OutputItem::message_text)
        .unwrap_or_else(|| format!("{MISSING_OUTPUT_PREFIX}: no message output was produced"))
}
