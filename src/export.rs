//! Markdown export of research outcomes.
//!
//! The citation list is written last, one `{i}. [title](url)` line per
//! citation followed by an indented excerpt line. Brackets, parentheses,
//! backslashes and line breaks are backslash-escaped so that
//! [`parse_citations`] recovers `{title, url, excerpt}` exactly.

use std::fmt::Write as _;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::{Citation, ResearchOutcome};
use crate::error::{CommandError, Result};

/// Heading that introduces the citation list.
pub const CITATIONS_HEADING: &str = "## Citations:";

/// Indentation of the excerpt line under each citation.
const EXCERPT_INDENT: &str = "   ";

/// The exported fields of a citation, in export order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedCitation {
    /// Source title.
    pub title: String,
    /// Source URL.
    pub url: String,
    /// Cited excerpt.
    pub excerpt: String,
}

impl From<&Citation> for ExportedCitation {
    fn from(c: &Citation) -> Self {
        Self {
            title: c.title.clone(),
            url: c.url.clone(),
            excerpt: c.excerpt.clone(),
        }
    }
}

/// Renders `outcome` as a Markdown document.
#[must_use]
pub fn render_markdown(outcome: &ResearchOutcome) -> String {
    let mut out = String::from("# Research Results\n\n");
    let _ = writeln!(out, "**Query:** {}", outcome.query);
    let _ = writeln!(out, "**Method:** {}", outcome.method_used);
    if let Some(model) = &outcome.metadata.model {
        let _ = writeln!(out, "**Model:** {model}");
    }
    let _ = writeln!(out, "**Duration:** {:.1}s", outcome.elapsed.as_secs_f64());
    let _ = writeln!(out, "**Citations:** {}", outcome.citations.len());

    let _ = write!(out, "\n## Results:\n{}\n", outcome.result_text);

    write_list(&mut out, "## Interaction Flow:", &outcome.flow, false);
    write_list(&mut out, "## Web Searches:", &outcome.web_searches, true);
    write_list(&mut out, "## Reasoning Steps:", &outcome.reasoning_steps, true);

    let _ = write!(out, "\n{CITATIONS_HEADING}\n");
    if outcome.citations.is_empty() {
        out.push_str("\nNo citations found.\n");
    }
    for (i, c) in outcome.citations.iter().enumerate() {
        let _ = write!(
            out,
            "\n{}. [{}]({})\n{EXCERPT_INDENT}{}\n",
            i + 1,
            escape(&c.title, &['[', ']']),
            escape(&c.url, &['(', ')']),
            escape(&c.excerpt, &[]),
        );
    }
    out
}

fn write_list(out: &mut String, heading: &str, entries: &[String], numbered: bool) {
    if entries.is_empty() {
        return;
    }
    let _ = write!(out, "\n{heading}\n");
    for (i, entry) in entries.iter().enumerate() {
        if numbered {
            let _ = writeln!(out, "{}. {entry}", i + 1);
        } else {
            let _ = writeln!(out, "{entry}");
        }
    }
}

/// Writes the Markdown rendering of `outcome` to `path`.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn write_markdown(path: &Path, outcome: &ResearchOutcome) -> Result<()> {
    std::fs::write(path, render_markdown(outcome))?;
    Ok(())
}

/// Reads the citation list back from a document produced by
/// [`render_markdown`].
///
/// Only the last `## Citations:` section is read; a document without one
/// yields an empty list.
///
/// # Errors
///
/// Returns [`CommandError::OutputFormat`] if the line pattern fails to
/// compile.
pub fn parse_citations(markdown: &str) -> Result<Vec<ExportedCitation>> {
    let entry = Regex::new(r"^\d+\. \[((?:[^\\\]]|\\.)*)\]\(((?:[^\\)]|\\.)*)\)$")
        .map_err(|e| CommandError::OutputFormat(format!("citation pattern: {e}")))?;

    let lines: Vec<&str> = markdown.lines().collect();
    let Some(heading) = lines.iter().rposition(|l| *l == CITATIONS_HEADING) else {
        return Ok(Vec::new());
    };

    let mut citations = Vec::new();
    let mut rest = lines[heading + 1..].iter().peekable();
    while let Some(line) = rest.next() {
        let Some(caps) = entry.captures(line) else {
            continue;
        };
        let excerpt = rest
            .peek()
            .and_then(|next| next.strip_prefix(EXCERPT_INDENT))
            .map(unescape)
            .unwrap_or_default();
        if !excerpt.is_empty() || rest.peek().is_some_and(|n| n.starts_with(EXCERPT_INDENT)) {
            rest.next();
        }
        citations.push(ExportedCitation {
            title: unescape(&caps[1]),
            url: unescape(&caps[2]),
            excerpt,
        });
    }
    Ok(citations)
}

fn escape(s: &str, specials: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if specials.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(c) => out.push(c),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MethodId, OutcomeMetadata};
    use proptest::prelude::*;
    use std::time::Duration;

    fn citation(title: &str, url: &str, excerpt: &str) -> Citation {
        Citation {
            title: title.to_string(),
            url: url.to_string(),
            excerpt: excerpt.to_string(),
            preceding_text: String::new(),
            start_index: 0,
            end_index: 0,
        }
    }

    fn outcome(citations: Vec<Citation>) -> ResearchOutcome {
        ResearchOutcome {
            query: "LLM frameworks comparison".to_string(),
            method_used: MethodId::DeepResearch,
            result_text: "Findings.\n\n## Citations:\n1. [fake](entry)\n   inside result".to_string(),
            citations,
            flow: vec!["1. [Research Agent] → Output".to_string()],
            reasoning_steps: vec!["Planned searches".to_string()],
            web_searches: vec!["langchain vs crewai".to_string()],
            elapsed: Duration::from_secs_f64(12.34),
            metadata: OutcomeMetadata {
                model: Some("o3-deep-research-2025-06-26".to_string()),
                ..OutcomeMetadata::default()
            },
        }
    }

    #[test]
    fn test_render_header() {
        let md = render_markdown(&outcome(vec![citation("T", "https://x", "e")]));
        assert!(md.starts_with("# Research Results\n\n**Query:** LLM frameworks comparison\n"));
        assert!(md.contains("**Method:** deep_research_api\n"));
        assert!(md.contains("**Duration:** 12.3s\n"));
        assert!(md.contains("**Citations:** 1\n"));
        assert!(md.contains("\n1. [T](https://x)\n   e\n"));
        assert!(md.contains("## Web Searches:\n1. langchain vs crewai\n"));
    }

    #[test]
    fn test_round_trip_ignores_result_body() {
        let citations = vec![
            citation("Paper [v2]", "https://example.com/a_(b)", "a \\ b"),
            citation("", "", ""),
            citation("Third", "https://example.com/c", "ends here"),
        ];
        let md = render_markdown(&outcome(citations.clone()));
        let parsed = parse_citations(&md).unwrap_or_else(|_| unreachable!());
        let expected: Vec<ExportedCitation> = citations.iter().map(ExportedCitation::from).collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_no_citations_section() {
        let md = render_markdown(&outcome(Vec::new()));
        assert!(md.contains("No citations found."));
        assert!(parse_citations(&md).unwrap_or_default().is_empty());
        assert!(parse_citations("# nothing here").unwrap_or_default().is_empty());
    }

    #[test]
    fn test_stripped_trailing_whitespace() {
        let md = "## Citations:\n\n1. [A](u)\n\n2. [B](v)\n   text\n";
        let parsed = parse_citations(md).unwrap_or_default();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].excerpt, "");
        assert_eq!(parsed[1].excerpt, "text");
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            fields in prop::collection::vec(
                ("[ -~\n]{0,30}", "[ -~]{0,30}", "[ -~]{0,40}"),
                0..6,
            )
        ) {
            let citations: Vec<Citation> = fields
                .iter()
                .map(|(t, u, e)| citation(t, u, e))
                .collect();
            let md = render_markdown(&outcome(citations.clone()));
            let parsed = parse_citations(&md).unwrap_or_default();
            let expected: Vec<ExportedCitation> = citations.iter().map(ExportedCitation::from).collect();
            prop_assert_eq!(parsed, expected);
        }
    }
}
