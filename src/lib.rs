//! # research-rs
//!
//! Client for hosted research backends: a multi-agent pipeline built on the
//! OpenAI Responses API and the one-shot deep research models.
//!
//! Results come back as a [`ResearchOutcome`] carrying the final text, URL
//! citations with surrounding context, a numbered interaction flow, and the
//! reasoning summaries and web searches the model performed.
//!
//! ## Example
//!
//! ```no_run
//! use research_rs::agent::{AgentConfig, ResearchInterface, ResearchRequest};
//!
//! # async fn run() -> Result<(), research_rs::AgentError> {
//! let config = AgentConfig::builder().from_env().build()?;
//! let interface = ResearchInterface::from_config(&config, None)?;
//! let outcome = interface
//!     .research("Compare Rust async runtimes", &ResearchRequest::default())
//!     .await?;
//! for citation in &outcome.citations {
//!     println!("{} <{}>", citation.title, citation.url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Offline pieces (citation extraction, flow summaries, method selection,
//! and Markdown export) live in [`core`] and [`export`] and need no network.

pub mod agent;
pub mod cli;
pub mod core;
pub mod error;
pub mod export;

pub use crate::core::{
    Citation, ItemKind, MethodId, OutputItem, ResearchMethod, ResearchOutcome, extract_citations,
    select_method, summarize_flow,
};
pub use error::{AgentError, CommandError, Error, Result};
pub use export::{parse_citations, render_markdown, write_markdown};
