//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::DEFAULT_CONTEXT_WINDOW;

/// research-rs: hosted multi-agent and deep research from the terminal.
///
/// Routes a query to the hosted agent pipeline or the deep research
/// models, then extracts citations and summarizes the interaction flow.
#[derive(Parser, Debug)]
#[command(name = "research-rs")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Research a query with the best-suited backend.
    ///
    /// With `--method auto` the backend is picked from the query wording:
    /// landscape and comparison questions go to deep research, focused
    /// how-to questions go to the agent pipeline. Requires an API key.
    #[command(after_help = r#"Examples:
  research-rs research "Compare LangChain, CrewAI and AutoGen"
  research-rs research "How to implement retries in tokio?" --method agents --mode multi-agent
  research-rs research "AI chip landscape" --summary detailed --export report.md
  research-rs research "vector databases" --clarify audience="backend engineers"
  OPENAI_API_KEY=sk-... research-rs --format json research "trends in WebAssembly"
"#)]
    Research {
        /// The research question.
        query: String,

        /// Method: auto, agents, deep-research.
        #[arg(short, long, default_value = "auto")]
        method: String,

        /// Deep research options.
        #[command(flatten)]
        deep: DeepArgs,

        /// Agent pipeline options.
        #[command(flatten)]
        agents: AgentArgs,

        /// Export and transport options.
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Run one hosted deep research call.
    #[command(after_help = r#"Examples:
  research-rs deep "State of Rust in embedded systems"
  research-rs deep "EV battery trends" --model o4-mini-deep-research-2025-06-26
  research-rs deep "Quantum error correction" --summary none --export qec.md
"#)]
    Deep {
        /// The research question.
        query: String,

        /// Deep research options.
        #[command(flatten)]
        deep: DeepArgs,

        /// Export and transport options.
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Run the hosted agent pipeline.
    #[command(after_help = r#"Examples:
  research-rs agents "Which Rust ORM fits a small service?"
  research-rs agents "Best practices for tracing in async Rust" --mode multi-agent
  research-rs agents "Edge databases" --clarify timeframe=2025 --clarify scope=pricing
"#)]
    Agents {
        /// The research question.
        query: String,

        /// Agent pipeline options.
        #[command(flatten)]
        agents: AgentArgs,

        /// Export and transport options.
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Show which backend a query would be routed to (offline).
    #[command(after_help = r#"Examples:
  research-rs select "Compare LangChain vs CrewAI"        # deep_research_api
  research-rs select "How to implement auth" --no-deep-research
"#)]
    Select {
        /// The research question.
        query: String,

        /// Treat the agent backend as unavailable.
        #[arg(long)]
        no_agents: bool,

        /// Treat the deep research backend as unavailable.
        #[arg(long)]
        no_deep_research: bool,
    },

    /// Summarize a saved Responses API JSON object (offline).
    ///
    /// Prints the final text, interaction flow, citations, reasoning steps,
    /// and web searches found in the response.
    #[command(after_help = r#"Examples:
  research-rs inspect response.json
  research-rs inspect response.json --agent "Research Agent" --window 80
  research-rs --format json inspect response.json | jq '.citations'
"#)]
    Inspect {
        /// Path to the response JSON file.
        file: PathBuf,

        /// Agent name to attribute items to.
        #[arg(long)]
        agent: Option<String>,

        /// Characters of context captured before each citation.
        #[arg(short, long, default_value_t = DEFAULT_CONTEXT_WINDOW)]
        window: usize,
    },

    /// Write default prompt templates to disk for customization.
    ///
    /// Creates markdown template files in the prompt directory so users
    /// can customize agent instructions without recompiling.
    #[command(name = "init-prompts")]
    #[command(after_help = r#"Examples:
  research-rs init-prompts                       # Write to ~/.config/research-rs/prompts/
  research-rs init-prompts --dir ./my-prompts    # Write to custom directory
"#)]
    InitPrompts {
        /// Target directory for prompt templates.
        ///
        /// Defaults to `~/.config/research-rs/prompts/`.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Options of the deep research backend.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DeepArgs {
    /// Deep research model.
    #[arg(long)]
    pub model: Option<String>,

    /// Developer message replacing the default researcher prompt.
    #[arg(long)]
    pub system: Option<String>,

    /// Reasoning summary level: auto, detailed, none.
    #[arg(long)]
    pub summary: Option<String>,
}

/// Options of the agent backend.
#[derive(clap::Args, Debug, Clone)]
pub struct AgentArgs {
    /// Starting point: basic (Research Agent) or multi-agent (Triage Agent).
    ///
    /// Defaults to multi-agent when `--clarify` is given, basic otherwise.
    #[arg(long)]
    pub mode: Option<String>,

    /// Clarification answer as KEY=VALUE (repeatable).
    #[arg(long = "clarify", value_name = "KEY=VALUE")]
    pub clarify: Vec<String>,

    /// Characters of context captured before each citation.
    #[arg(short, long, default_value_t = DEFAULT_CONTEXT_WINDOW)]
    pub window: usize,

    /// Maximum agent turns before giving up.
    #[arg(long)]
    pub max_turns: Option<usize>,
}

/// Options shared by the network commands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Write a Markdown report to this file.
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Directory containing prompt template files.
    #[arg(long)]
    pub prompt_dir: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_research() {
        let cli = Cli::try_parse_from([
            "research-rs",
            "--format",
            "json",
            "research",
            "Compare runtimes",
            "--method",
            "deep-research",
            "--summary",
            "detailed",
            "--clarify",
            "audience=devs",
            "--export",
            "out.md",
        ])
        .unwrap_or_else(|_| unreachable!());
        assert_eq!(cli.format, "json");
        let Commands::Research {
            query,
            method,
            deep,
            agents,
            common,
        } = cli.command
        else {
            unreachable!()
        };
        assert_eq!(query, "Compare runtimes");
        assert_eq!(method, "deep-research");
        assert_eq!(deep.summary.as_deref(), Some("detailed"));
        assert_eq!(agents.clarify, vec!["audience=devs"]);
        assert_eq!(agents.window, DEFAULT_CONTEXT_WINDOW);
        assert_eq!(agents.mode, None);
        assert_eq!(common.export, Some(PathBuf::from("out.md")));
    }

    #[test]
    fn test_parse_select_flags() {
        let cli = Cli::try_parse_from(["research-rs", "select", "q", "--no-agents"])
            .unwrap_or_else(|_| unreachable!());
        assert!(matches!(
            cli.command,
            Commands::Select {
                no_agents: true,
                no_deep_research: false,
                ..
            }
        ));
    }

    #[test]
    fn test_query_required() {
        assert!(Cli::try_parse_from(["research-rs", "deep"]).is_err());
    }
}
