//! Progress events emitted during an agent run.

use tracing::info;

/// Something that happened while an agent run was in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Control passed to a new agent (including the starting agent).
    AgentUpdated {
        /// Agent now in control.
        agent: String,
    },
    /// The hosted search tool ran.
    WebSearch {
        /// Agent that searched.
        agent: String,
        /// Search query, when reported.
        query: Option<String>,
    },
    /// A non-hand-off function tool was called.
    ToolCalled {
        /// Calling agent.
        agent: String,
        /// Tool name.
        name: String,
    },
    /// An agent produced a message.
    MessageProduced {
        /// Producing agent.
        agent: String,
    },
}

/// Receives [`RunEvent`]s as they happen.
pub trait RunObserver: Send + Sync {
    /// Called once per event, in order.
    fn on_event(&self, event: &RunEvent);
}

/// Observer that logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl RunObserver for LoggingObserver {
    fn on_event(&self, event: &RunEvent) {
        match event {
            RunEvent::AgentUpdated { agent } => info!(%agent, "switched to agent"),
            RunEvent::WebSearch { agent, query } => {
                info!(%agent, query = query.as_deref().unwrap_or(""), "web search");
            }
            RunEvent::ToolCalled { agent, name } => info!(%agent, tool = %name, "tool call"),
            RunEvent::MessageProduced { agent } => info!(%agent, "message output"),
        }
    }
}
