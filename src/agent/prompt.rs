//! System prompts and input builders for the research backends.
//!
//! Prompts define each agent's behavior. They can be overridden per file
//! from a prompt directory; see [`PromptSet::load`].

use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Instructions for the Triage Agent.
pub const TRIAGE_PROMPT: &str = r"You are a research triage agent. Your job is to analyze incoming research queries and decide whether clarifying questions are needed before proceeding with research.

If the query is:
- Clear and specific: Transfer directly to the Research Instruction Agent
- Vague or ambiguous: Transfer to the Clarifying Questions Agent

Consider factors like:
- Topic specificity
- Scope clarity
- Time frame definition
- Target audience clarity
";

/// Instructions for the Clarifying Questions Agent.
pub const CLARIFYING_PROMPT: &str = r"You are a clarifying questions agent. When you receive a research query that needs more context, ask 2-3 targeted clarifying questions to gather essential information before research begins.

Focus on:
- Scope and boundaries
- Target audience or use case
- Time frame or currency requirements
- Specific aspects of interest
- Depth vs breadth preferences

After receiving answers, transfer to the Research Instruction Agent.
";

/// Instructions for the Research Instruction Agent.
pub const INSTRUCTION_PROMPT: &str = r"You are a research instruction agent. Your job is to take user queries (and any clarifying information) and transform them into detailed, structured research instructions for the Research Agent.

Create comprehensive research instructions that include:
- Clear research objectives
- Key areas to investigate
- Types of sources to prioritize
- Specific questions to answer
- Expected deliverables format

Then transfer to the Research Agent with these detailed instructions.
";

/// Instructions for the Research Agent.
pub const RESEARCH_PROMPT: &str = r"You are a deep research agent specializing in comprehensive, empirical research. You perform thorough investigations using web search and other available tools to gather authoritative information.

Your research approach:
1. Break down complex topics into key research areas
2. Search for authoritative sources (academic papers, industry reports, official documentation)
3. Gather diverse perspectives and current information
4. Synthesize findings into coherent insights
5. Provide specific evidence and citations
6. Identify gaps or limitations in available information

Always provide:
- Executive summary
- Key findings with supporting evidence
- Source citations with URLs
- Actionable recommendations where appropriate
- Areas for further investigation
";

/// Developer message for one-shot deep research when none is given.
pub const DEEP_RESEARCH_PROMPT: &str = r"You are a professional researcher preparing a structured, data-driven report.
Focus on data-rich insights with specific figures, trends, and measurable outcomes.
Prioritize reliable, up-to-date sources and include inline citations.
Be analytical and ensure each section supports data-backed reasoning.
";

/// Default prompt directory relative to the user's home.
const DEFAULT_PROMPT_DIR: &str = ".config/research-rs/prompts";

const TRIAGE_FILENAME: &str = "triage.md";
const CLARIFYING_FILENAME: &str = "clarifying.md";
const INSTRUCTION_FILENAME: &str = "instruction.md";
const RESEARCH_FILENAME: &str = "research.md";
const DEEP_RESEARCH_FILENAME: &str = "deep_research.md";

/// A set of system prompts for all agents and the deep research backend.
///
/// Loaded from external template files when available, falling back to
/// compiled-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    /// Triage Agent instructions.
    pub triage: String,
    /// Clarifying Questions Agent instructions.
    pub clarifying: String,
    /// Research Instruction Agent instructions.
    pub instruction: String,
    /// Research Agent instructions.
    pub research: String,
    /// Default deep research developer message.
    pub deep_research: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl PromptSet {
    /// Loads prompts from the given directory, falling back to compiled-in defaults.
    ///
    /// Resolution order for `prompt_dir`:
    /// 1. Explicit `prompt_dir` argument
    /// 2. `RESEARCH_PROMPT_DIR` environment variable
    /// 3. `~/.config/research-rs/prompts/`
    ///
    /// Each file is loaded independently; a missing or blank file uses its
    /// default.
    #[must_use]
    pub fn load(prompt_dir: Option<&Path>) -> Self {
        let resolved_dir = prompt_dir
            .map(PathBuf::from)
            .or_else(|| std::env::var("RESEARCH_PROMPT_DIR").ok().map(PathBuf::from))
            .or_else(Self::default_dir);

        let load_file = |filename: &str, default: &str| -> String {
            resolved_dir
                .as_ref()
                .map(|dir| dir.join(filename))
                .and_then(|path| std::fs::read_to_string(&path).ok())
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            triage: load_file(TRIAGE_FILENAME, TRIAGE_PROMPT),
            clarifying: load_file(CLARIFYING_FILENAME, CLARIFYING_PROMPT),
            instruction: load_file(INSTRUCTION_FILENAME, INSTRUCTION_PROMPT),
            research: load_file(RESEARCH_FILENAME, RESEARCH_PROMPT),
            deep_research: load_file(DEEP_RESEARCH_FILENAME, DEEP_RESEARCH_PROMPT),
        }
    }

    /// Returns compiled-in defaults without checking the filesystem.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            triage: TRIAGE_PROMPT.to_string(),
            clarifying: CLARIFYING_PROMPT.to_string(),
            instruction: INSTRUCTION_PROMPT.to_string(),
            research: RESEARCH_PROMPT.to_string(),
            deep_research: DEEP_RESEARCH_PROMPT.to_string(),
        }
    }

    /// Writes the compiled-in default prompts to the given directory.
    ///
    /// Creates the directory if it does not exist. Existing files are
    /// **not** overwritten.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if directory creation or file writing fails.
    pub fn write_defaults(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let templates = [
            (TRIAGE_FILENAME, TRIAGE_PROMPT),
            (CLARIFYING_FILENAME, CLARIFYING_PROMPT),
            (INSTRUCTION_FILENAME, INSTRUCTION_PROMPT),
            (RESEARCH_FILENAME, RESEARCH_PROMPT),
            (DEEP_RESEARCH_FILENAME, DEEP_RESEARCH_PROMPT),
        ];

        let mut written = Vec::new();
        for (filename, content) in &templates {
            let path = dir.join(filename);
            if !path.exists() {
                std::fs::write(&path, content)?;
                written.push(path);
            }
        }

        Ok(written)
    }

    /// Returns the default prompt directory under the user's home.
    ///
    /// Returns `None` if the home directory cannot be determined.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR))
    }
}

/// Appends clarification answers to a query for the multi-agent run.
///
/// Returns the query unchanged when there are no answers.
#[must_use]
pub fn build_clarified_input(query: &str, clarifications: &[(String, String)]) -> String {
    if clarifications.is_empty() {
        return query.to_string();
    }
    let mut input = format!("{query}\n\nClarifications:\n");
    for (question, answer) in clarifications {
        let _ = writeln!(input, "- {question}: {answer}");
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_not_empty() {
        let prompts = PromptSet::defaults();
        assert!(prompts.triage.contains("triage agent"));
        assert!(prompts.research.contains("Source citations with URLs"));
        assert!(prompts.deep_research.starts_with("You are a professional researcher"));
    }

    #[test]
    fn test_write_defaults_then_load() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        let written = PromptSet::write_defaults(dir.path()).unwrap_or_default();
        assert_eq!(written.len(), 5);

        std::fs::write(dir.path().join(TRIAGE_FILENAME), "Route everything to research.")
            .unwrap_or_else(|_| unreachable!());
        let again = PromptSet::write_defaults(dir.path()).unwrap_or_default();
        assert!(again.is_empty());

        let prompts = PromptSet::load(Some(dir.path()));
        assert_eq!(prompts.triage, "Route everything to research.");
        assert_eq!(prompts.research, RESEARCH_PROMPT);
    }

    #[test]
    fn test_load_missing_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        let prompts = PromptSet::load(Some(&dir.path().join("absent")));
        assert_eq!(prompts, PromptSet::defaults());
    }

    #[test]
    fn test_blank_file_uses_default() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        std::fs::write(dir.path().join(DEEP_RESEARCH_FILENAME), "  \n")
            .unwrap_or_else(|_| unreachable!());
        let prompts = PromptSet::load(Some(dir.path()));
        assert_eq!(prompts.deep_research, DEEP_RESEARCH_PROMPT);
    }

    #[test]
    fn test_build_clarified_input() {
        assert_eq!(build_clarified_input("q", &[]), "q");
        let input = build_clarified_input(
            "Rust web frameworks",
            &[
                ("audience".to_string(), "backend engineers".to_string()),
                ("timeframe".to_string(), "2025".to_string()),
            ],
        );
        assert_eq!(
            input,
            "Rust web frameworks\n\nClarifications:\n- audience: backend engineers\n- timeframe: 2025\n"
        );
    }
}
