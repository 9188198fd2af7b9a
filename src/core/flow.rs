//! Numbered trace of agent hand-offs, tool calls, and outputs.

use serde_json::Value;

use super::item::{ItemKind, OutputItem};

/// Hand-off target shown when the item has none.
pub const UNKNOWN_FUNCTION: &str = "Unknown Function";

/// Renders `items` as numbered flow lines.
///
/// Only hand-offs, named tool calls, and message outputs produce a line;
/// numbering is contiguous across emitted lines.
#[must_use]
pub fn summarize_flow(items: &[OutputItem]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut n = 1usize;

    for item in items {
        let agent = item.agent_label();
        let line = match &item.kind {
            ItemKind::HandoffCall { target } => {
                let target = target.as_deref().unwrap_or(UNKNOWN_FUNCTION);
                format!("{n}. [{agent}] → Handoff: {target}")
            }
            ItemKind::ToolCall { name, arguments } => {
                let Some(name) = name.as_deref().filter(|s| !s.trim().is_empty()) else {
                    continue;
                };
                match arguments.as_deref().and_then(render_arguments) {
                    Some(args) => format!("{n}. [{agent}] → Tool: {name} with args {args}"),
                    None => format!("{n}. [{agent}] → Tool: {name}"),
                }
            }
            ItemKind::MessageOutput { .. } => format!("{n}. [{agent}] → Output"),
            _ => continue,
        };
        lines.push(line);
        n += 1;
    }

    lines
}

/// Renders a raw tool argument string for display.
///
/// Parsed JSON is re-serialized compactly when it is non-empty; parsed
/// but empty JSON (`{}`, `[]`, `""`, `0`, `false`, `null`) renders nothing.
/// Unparsable input falls back to the trimmed raw string unless it is blank
/// or `{}`.
#[must_use]
pub fn render_arguments(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = serde_json::from_str::<Value>(raw) {
        return is_truthy(&parsed).then(|| parsed.to_string());
    }
    let trimmed = raw.trim();
    (!trimmed.is_empty() && trimmed != "{}").then(|| trimmed.to_string())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
