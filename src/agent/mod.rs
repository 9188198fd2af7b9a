//! Hosted research backends.
//!
//! Talks to the OpenAI Responses API through a pluggable provider and
//! exposes two backends behind one [`ResearchInterface`].
//!
//! # Architecture
//!
//! ```text
//! Query → ResearchInterface (method selection)
//!   ├── AgentRunner (multi-step, hand-offs between agents)
//!   │   Triage Agent
//!   │     ├── Clarifying Questions Agent
//!   │     └── Research Instruction Agent → Research Agent (web search)
//!   └── DeepResearchApi (one call to a deep research model)
//!         └── retry without reasoning summaries when the org is unverified
//! → ResearchOutcome (text, citations, flow, reasoning, searches)
//! ```

pub mod client;
pub mod config;
pub mod deep_research;
pub mod events;
pub mod interface;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod roster;
pub mod runner;

// Re-export key types
pub use client::create_provider;
pub use config::{AgentConfig, ReasoningSummary};
pub use deep_research::{DeepResearchApi, DeepResearchOptions, DeepResearchResult};
pub use events::{LoggingObserver, RunEvent, RunObserver};
pub use interface::{ResearchInterface, ResearchRequest};
pub use message::{HostedTool, InputItem, ResponseObject, ResponseRequest, WireItem};
pub use prompt::PromptSet;
pub use provider::LlmProvider;
pub use roster::{AgentSpec, Roster};
pub use runner::{AgentRunner, RunMode, RunResult};
