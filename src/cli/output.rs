//! Output formatting for CLI commands.

#![allow(clippy::format_push_string)]

use std::fmt::Write as _;

use serde::Serialize;

use crate::core::{Citation, ResearchOutcome};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Parses a format name; unknown names fall back to text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Serializes `value` as pretty JSON.
    #[must_use]
    pub fn to_json<T: Serialize>(&self, value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

/// Renders citations the way the research report prints them.
#[must_use]
pub fn format_citations(citations: &[Citation]) -> String {
    if citations.is_empty() {
        return "No citations found in the research output.\n".to_string();
    }
    let mut out = String::new();
    for (i, c) in citations.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, c.title);
        let _ = writeln!(out, "   URL: {}", c.url);
        let _ = writeln!(out, "   Context: ...{} [{}]", c.preceding_text, c.excerpt);
        out.push('\n');
    }
    out
}

/// Renders a research outcome.
#[must_use]
pub fn format_outcome(outcome: &ResearchOutcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format.to_json(outcome),
        OutputFormat::Text => {
            let mut out = outcome.result_text.clone();
            if !out.ends_with('\n') {
                out.push('\n');
            }

            out.push_str(&format!(
                "\n---\nMethod: {} | Citations: {} | Web searches: {} | Reasoning steps: {} | Time: {:.1}s\n",
                outcome.method_used,
                outcome.citations.len(),
                outcome.web_searches.len(),
                outcome.reasoning_steps.len(),
                outcome.elapsed.as_secs_f64()
            ));
            if let Some(model) = &outcome.metadata.model {
                out.push_str(&format!("Model: {model}\n"));
            }
            if !outcome.metadata.agents_used.is_empty() {
                out.push_str(&format!(
                    "Agents: {}\n",
                    outcome.metadata.agents_used.join(", ")
                ));
            }

            out.push_str(&format_trace(
                &outcome.flow,
                &outcome.web_searches,
                &outcome.reasoning_steps,
            ));

            if !outcome.is_error() {
                out.push_str("\nCitations:\n");
                out.push_str(&format_citations(&outcome.citations));
            }
            out
        }
    }
}

/// Renders flow lines, searches, and reasoning steps, skipping empty lists.
#[must_use]
pub fn format_trace(flow: &[String], web_searches: &[String], reasoning_steps: &[String]) -> String {
    let mut out = String::new();
    if !flow.is_empty() {
        out.push_str("\nInteraction flow:\n");
        for line in flow {
            let _ = writeln!(out, "  {line}");
        }
    }
    if !web_searches.is_empty() {
        out.push_str("\nWeb searches:\n");
        for query in web_searches {
            let _ = writeln!(out, "  - {query}");
        }
    }
    if !reasoning_steps.is_empty() {
        out.push_str("\nReasoning steps:\n");
        for (i, step) in reasoning_steps.iter().enumerate() {
            let _ = writeln!(out, "  {}. {step}", i + 1);
        }
    }
    out
}
