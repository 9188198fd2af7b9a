//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

// Allow certain patterns that improve readability in CLI output formatting
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::format_push_string)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::agent::{
    AgentConfig, DeepResearchOptions, LoggingObserver, PromptSet, ReasoningSummary,
    ResearchInterface, ResearchRequest, ResponseObject, RunMode, RunObserver,
    roster::HANDOFF_PREFIX,
};
use crate::cli::output::{OutputFormat, format_citations, format_outcome, format_trace};
use crate::cli::parser::{AgentArgs, Cli, Commands, CommonArgs, DeepArgs};
use crate::core::{
    Citation, CitationOptions, ItemKind, MethodId, OutputItem, ResearchMethod, extract_citations_with,
    select_method, summarize_flow,
};
use crate::error::{CommandError, Result};
use crate::export::write_markdown;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Research {
            query,
            method,
            deep,
            agents,
            common,
        } => {
            let method = ResearchMethod::parse(method).ok_or_else(|| {
                CommandError::InvalidArgument(format!(
                    "unknown method '{method}' (expected auto, agents, deep-research)"
                ))
            })?;
            cmd_research(query, method, Some(deep), Some(agents), common, format)
        }
        Commands::Deep {
            query,
            deep,
            common,
        } => cmd_research(
            query,
            ResearchMethod::DeepResearch,
            Some(deep),
            None,
            common,
            format,
        ),
        Commands::Agents {
            query,
            agents,
            common,
        } => cmd_research(
            query,
            ResearchMethod::Agents,
            None,
            Some(agents),
            common,
            format,
        ),
        Commands::Select {
            query,
            no_agents,
            no_deep_research,
        } => cmd_select(query, !*no_agents, !*no_deep_research, format),
        Commands::Inspect {
            file,
            agent,
            window,
        } => cmd_inspect(file, agent.as_deref(), *window, format),
        Commands::InitPrompts { dir } => cmd_init_prompts(dir.as_deref(), format),
    }
}

/// Parses repeated `KEY=VALUE` clarification flags, keeping their order.
///
/// # Errors
///
/// Returns [`CommandError::InvalidArgument`] for entries without `=` or with
/// an empty key.
pub fn parse_clarifications(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(CommandError::InvalidArgument(format!(
                "clarification '{entry}' must look like KEY=VALUE"
            ))
            .into()),
        })
        .collect()
}

fn parse_summary(raw: Option<&str>) -> Result<Option<ReasoningSummary>> {
    raw.map(|s| {
        ReasoningSummary::parse(s).ok_or_else(|| {
            CommandError::InvalidArgument(format!(
                "unknown summary level '{s}' (expected auto, detailed, none)"
            ))
            .into()
        })
    })
    .transpose()
}

fn parse_mode(raw: &str) -> Result<RunMode> {
    RunMode::parse(raw).ok_or_else(|| {
        CommandError::InvalidArgument(format!(
            "unknown mode '{raw}' (expected basic, multi-agent)"
        ))
        .into()
    })
}

fn cmd_research(
    query: &str,
    method: ResearchMethod,
    deep: Option<&DeepArgs>,
    agents: Option<&AgentArgs>,
    common: &CommonArgs,
    format: OutputFormat,
) -> Result<String> {
    let summary = parse_summary(deep.and_then(|d| d.summary.as_deref()))?;
    let mut request = ResearchRequest {
        method,
        deep_research: DeepResearchOptions {
            system_message: deep.and_then(|d| d.system.clone()),
            summary,
            tools: None,
        },
        ..ResearchRequest::default()
    };
    if let Some(agents) = agents {
        request.mode = agents.mode.as_deref().map(parse_mode).transpose()?;
        request.clarifications = parse_clarifications(&agents.clarify)?;
        request.window = agents.window;
    }

    // Build configuration from env + CLI overrides
    let mut builder = AgentConfig::builder().from_env();
    if let Some(model) = deep.and_then(|d| d.model.as_deref()) {
        builder = builder.deep_research_model(model);
    }
    if let Some(summary) = summary {
        builder = builder.reasoning_summary(summary);
    }
    if let Some(turns) = agents.and_then(|a| a.max_turns) {
        builder = builder.max_turns(turns);
    }
    if let Some(dir) = &common.prompt_dir {
        builder = builder.prompt_dir(dir);
    }
    if let Some(secs) = common.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let config = builder.build()?;

    let observer: Arc<dyn RunObserver> = Arc::new(LoggingObserver);
    let interface = ResearchInterface::from_config(&config, Some(observer))?;

    // Create tokio runtime as sync/async bridge
    let rt = tokio::runtime::Runtime::new().map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to create async runtime: {e}"))
    })?;
    let outcome = rt.block_on(interface.research(query, &request))?;

    let mut output = format_outcome(&outcome, format);
    if let Some(path) = &common.export {
        write_markdown(path, &outcome)?;
        if format == OutputFormat::Text {
            let _ = writeln!(output, "\nExported to: {}", path.display());
        }
    }
    Ok(output)
}

#[derive(Serialize)]
struct Selection<'a> {
    query: &'a str,
    method: MethodId,
    agents_available: bool,
    deep_research_available: bool,
}

fn cmd_select(
    query: &str,
    agents_available: bool,
    deep_research_available: bool,
    format: OutputFormat,
) -> Result<String> {
    let method = select_method(query, agents_available, deep_research_available)?;
    match format {
        OutputFormat::Text => Ok(format!("{method}\n")),
        OutputFormat::Json => Ok(format.to_json(&Selection {
            query,
            method,
            agents_available,
            deep_research_available,
        })),
    }
}

/// Summary of a saved response.
#[derive(Debug, Serialize)]
struct Inspection {
    id: String,
    final_text: Option<String>,
    flow: Vec<String>,
    citations: Vec<Citation>,
    reasoning_steps: Vec<String>,
    web_searches: Vec<String>,
}

/// Converts a saved response into attributed items, marking hand-off
/// function calls.
fn response_items(response: ResponseObject, agent: Option<&str>) -> Vec<OutputItem> {
    response
        .output
        .into_iter()
        .map(|wire| {
            let mut item = wire.into_output_item(agent);
            if let ItemKind::ToolCall {
                name: Some(name), ..
            } = &item.kind
            {
                if name.starts_with(HANDOFF_PREFIX) {
                    item.kind = ItemKind::HandoffCall {
                        target: Some(name.clone()),
                    };
                }
            }
            item
        })
        .collect()
}

fn cmd_inspect(
    file: &Path,
    agent: Option<&str>,
    window: usize,
    format: OutputFormat,
) -> Result<String> {
    let raw = std::fs::read_to_string(file).map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to read {}: {e}", file.display()))
    })?;
    let response: ResponseObject = serde_json::from_str(&raw).map_err(|e| {
        CommandError::ExecutionFailed(format!(
            "{} is not a Responses API object: {e}",
            file.display()
        ))
    })?;

    let id = response.id.clone();
    let final_text = response.final_text().map(str::to_string);
    let items = response_items(response, agent);

    let mut reasoning_steps = Vec::new();
    let mut web_searches = Vec::new();
    for item in &items {
        match &item.kind {
            ItemKind::Reasoning { summary } => reasoning_steps.extend(summary.iter().cloned()),
            ItemKind::WebSearchCall { query: Some(q) } => web_searches.push(q.clone()),
            _ => {}
        }
    }

    let inspection = Inspection {
        id,
        final_text,
        flow: summarize_flow(&items),
        citations: extract_citations_with(&items, &CitationOptions::with_window(window)),
        reasoning_steps,
        web_searches,
    };

    match format {
        OutputFormat::Json => Ok(format.to_json(&inspection)),
        OutputFormat::Text => {
            let mut output = format!("Response: {}\n", inspection.id);
            if let Some(text) = &inspection.final_text {
                output.push_str(&format!("\n{}\n", text.trim_end()));
            }
            output.push_str(&format_trace(
                &inspection.flow,
                &inspection.web_searches,
                &inspection.reasoning_steps,
            ));
            output.push_str("\nCitations:\n");
            output.push_str(&format_citations(&inspection.citations));
            Ok(output)
        }
    }
}

fn cmd_init_prompts(dir: Option<&Path>, format: OutputFormat) -> Result<String> {
    let target_dir = dir
        .map(PathBuf::from)
        .or_else(PromptSet::default_dir)
        .ok_or_else(|| {
            CommandError::ExecutionFailed(
                "Could not determine home directory for default prompt path".to_string(),
            )
        })?;

    let written = PromptSet::write_defaults(&target_dir).map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to write prompt templates: {e}"))
    })?;

    match format {
        OutputFormat::Text => {
            if written.is_empty() {
                Ok(format!(
                    "All prompt templates already exist in: {}\n",
                    target_dir.display()
                ))
            } else {
                let mut output = format!(
                    "Wrote {} prompt template(s) to: {}\n",
                    written.len(),
                    target_dir.display()
                );
                for path in &written {
                    output.push_str(&format!(
                        "  {}\n",
                        path.file_name()
                            .and_then(|n| n.to_str())
                            .unwrap_or("unknown")
                    ));
                }
                output.push_str("\nEdit these files to customize agent instructions.\n");
                Ok(output)
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "directory": target_dir.to_string_lossy(),
                "written": written.iter().map(|p| p.to_string_lossy().into_owned()).collect::<Vec<_>>(),
                "count": written.len()
            });
            Ok(format.to_json(&json))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RESPONSE: &str = r#"{
        "id": "resp_abc",
        "output": [
            {"type": "function_call", "name": "transfer_to_research_agent", "arguments": "{}", "call_id": "c1"},
            {"type": "function_call", "name": "lookup", "arguments": "{\"q\": \"rust\"}", "call_id": "c2"},
            {"type": "web_search_call", "action": {"type": "search", "query": "rust async"}},
            {"type": "message", "content": [{"type": "output_text", "text": "Rust async is mature.", "annotations": [
                {"type": "url_citation", "title": "Async Book", "url": "https://rust-lang.github.io/async-book/", "start_index": 5, "end_index": 10}
            ]}]}
        ]
    }"#;

    fn write_response(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("response.json");
        std::fs::write(&path, RESPONSE).unwrap_or_else(|_| unreachable!());
        path
    }

    #[test]
    fn test_parse_clarifications() {
        let parsed = parse_clarifications(&["audience = devs".to_string(), "year=2025".to_string()])
            .unwrap_or_default();
        assert_eq!(
            parsed,
            vec![
                ("audience".to_string(), "devs".to_string()),
                ("year".to_string(), "2025".to_string())
            ]
        );
        assert!(parse_clarifications(&["novalue".to_string()]).is_err());
        assert!(parse_clarifications(&["=x".to_string()]).is_err());
    }

    #[test]
    fn test_select_text_and_json() {
        let text = cmd_select("Compare LangChain vs CrewAI", true, true, OutputFormat::Text)
            .unwrap_or_default();
        assert_eq!(text, "deep_research_api\n");

        let json = cmd_select("How to implement auth", true, true, OutputFormat::Json)
            .unwrap_or_default();
        assert!(json.contains("\"method\": \"openai_agents\""));

        assert!(cmd_select("anything", false, false, OutputFormat::Text).is_err());
    }

    #[test]
    fn test_inspect_text() {
        let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
        let path = write_response(&dir);
        let output =
            cmd_inspect(&path, Some("Research Agent"), 50, OutputFormat::Text).unwrap_or_default();
        assert!(output.starts_with("Response: resp_abc\n"));
        assert!(output.contains("1. [Research Agent] → Handoff: transfer_to_research_agent"));
        assert!(output.contains(r#"2. [Research Agent] → Tool: lookup with args {"q":"rust"}"#));
        assert!(output.contains("3. [Research Agent] → Output"));
        assert!(output.contains("  - rust async"));
        assert!(output.contains("Context: ...Rust [async]"));
    }

    #[test]
    fn test_inspect_json() {
        let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
        let path = write_response(&dir);
        let output = cmd_inspect(&path, None, 50, OutputFormat::Json).unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap_or_default();
        assert_eq!(value["id"], "resp_abc");
        assert_eq!(value["citations"][0]["title"], "Async Book");
        assert_eq!(value["flow"][0], "1. [Unknown Agent] → Handoff: transfer_to_research_agent");
    }

    #[test]
    fn test_inspect_rejects_non_response() {
        let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap_or_else(|_| unreachable!());
        assert!(cmd_inspect(&path, None, 50, OutputFormat::Text).is_err());
    }

    #[test]
    fn test_init_prompts() {
        let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
        let target = dir.path().join("prompts");
        let first = cmd_init_prompts(Some(&target), OutputFormat::Text).unwrap_or_default();
        assert!(first.contains("Wrote 5 prompt template(s)"));
        assert!(target.join("triage.md").exists());
        let second = cmd_init_prompts(Some(&target), OutputFormat::Text).unwrap_or_default();
        assert!(second.contains("already exist"));
    }

    #[test]
    fn test_invalid_summary_and_mode() {
        assert!(parse_summary(Some("loud")).is_err());
        assert!(matches!(parse_summary(None), Ok(None)));
        assert!(parse_mode("solo").is_err());
    }
}
