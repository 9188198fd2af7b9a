//! End-to-end tests of the offline CLI commands.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("research-rs").unwrap_or_else(|_| unreachable!());
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn select_routes_landscape_query_to_deep_research() {
    cli()
        .args(["select", "AI chip landscape in 2025"])
        .assert()
        .success()
        .stdout("deep_research_api\n");
}

#[test]
fn select_honors_unavailable_backend() {
    cli()
        .args(["select", "Compare LangChain vs CrewAI", "--no-deep-research"])
        .assert()
        .success()
        .stdout("openai_agents\n");

    cli()
        .args(["select", "anything", "--no-agents", "--no-deep-research"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn inspect_prints_flow_and_citations() {
    let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
    let path = dir.path().join("response.json");
    std::fs::write(
        &path,
        r#"{"id": "resp_1", "output": [
            {"type": "reasoning", "summary": [{"type": "summary_text", "text": "Looked up sources."}]},
            {"type": "message", "content": [{"type": "output_text", "text": "Tokio is the default runtime.", "annotations": [
                {"type": "url_citation", "title": "Tokio", "url": "https://tokio.rs", "start_index": 0, "end_index": 5}
            ]}]}
        ]}"#,
    )
    .unwrap_or_else(|_| unreachable!());

    cli()
        .args(["inspect"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Tokio is the default runtime."))
        .stdout(predicate::str::contains("1. [Unknown Agent] → Output"))
        .stdout(predicate::str::contains("1. Looked up sources."))
        .stdout(predicate::str::contains("   URL: https://tokio.rs"));

    cli()
        .args(["--format", "json", "inspect"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"excerpt\": \"Tokio\""));
}

#[test]
fn init_prompts_writes_templates_once() {
    let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
    let target = dir.path().join("prompts");

    cli()
        .args(["init-prompts", "--dir"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 5 prompt template(s)"));
    assert!(target.join("deep_research.md").exists());

    cli()
        .args(["init-prompts", "--dir"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("already exist"));
}

#[test]
fn research_without_api_key_fails() {
    cli()
        .env_remove("OPENAI_API_KEY")
        .args(["research", "How to implement retries"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn unknown_method_is_rejected() {
    cli()
        .env("OPENAI_API_KEY", "sk-test")
        .args(["research", "q", "--method", "psychic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown method"));
}
