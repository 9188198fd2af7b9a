//! CLI layer for research-rs.
//!
//! Provides the command-line interface using clap, with commands for
//! running research, routing queries offline, inspecting saved responses,
//! and managing prompt templates.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
