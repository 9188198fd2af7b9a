//! Wire types for the hosted Responses API.
//!
//! Requests are built from [`InputItem`]s and [`HostedTool`]s; responses are
//! decoded leniently into [`WireItem`]s and converted into the core
//! [`OutputItem`] model with [`WireItem::into_output_item`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::ReasoningSummary;
use crate::core::{Annotation, AnnotationKind, ContentBlock, ItemKind, OutputItem};

/// Role of an input message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Developer (system) instructions.
    Developer,
    /// User input.
    User,
}

/// A content part of an input message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputContent {
    /// Plain text.
    InputText {
        /// The text.
        text: String,
    },
}

/// One element of a request's `input` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    /// A role-tagged message.
    Message {
        /// Message role.
        role: Role,
        /// Content parts.
        content: Vec<InputContent>,
    },
    /// The answer to a function call from the previous response.
    FunctionCallOutput {
        /// Call being answered.
        call_id: String,
        /// Output payload (JSON text).
        output: String,
    },
}

impl InputItem {
    /// Creates a developer message.
    #[must_use]
    pub fn developer(text: impl Into<String>) -> Self {
        Self::message(Role::Developer, text)
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::message(Role::User, text)
    }

    /// Creates a function call output.
    #[must_use]
    pub fn function_output(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self::FunctionCallOutput {
            call_id: call_id.into(),
            output: output.into(),
        }
    }

    fn message(role: Role, text: impl Into<String>) -> Self {
        Self::Message {
            role,
            content: vec![InputContent::InputText { text: text.into() }],
        }
    }
}

/// Code interpreter container settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Container type (`auto`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Files mounted into the container.
    #[serde(default)]
    pub file_ids: Vec<String>,
}

impl Container {
    /// An automatically provisioned container with no files.
    #[must_use]
    pub fn auto() -> Self {
        Self {
            kind: "auto".to_string(),
            file_ids: Vec::new(),
        }
    }
}

/// A tool made available to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostedTool {
    /// Vendor-hosted web search.
    WebSearchPreview,
    /// Vendor-hosted code execution.
    CodeInterpreter {
        /// Container settings.
        container: Container,
    },
    /// A caller-defined function.
    Function {
        /// Function name.
        name: String,
        /// Description shown to the model.
        description: String,
        /// JSON schema of the arguments.
        parameters: Value,
    },
}

impl HostedTool {
    /// Code interpreter with an automatic container.
    #[must_use]
    pub fn code_interpreter() -> Self {
        Self::CodeInterpreter {
            container: Container::auto(),
        }
    }

    /// A function tool taking no arguments.
    #[must_use]
    pub fn function(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Function {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false,
            }),
        }
    }
}

/// Reasoning options for reasoning models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningConfig {
    /// Summary level.
    pub summary: ReasoningSummary,
}

impl ReasoningConfig {
    /// Returns the config for `summary`, or `None` when summaries are off.
    #[must_use]
    pub const fn for_summary(summary: ReasoningSummary) -> Option<Self> {
        match summary {
            ReasoningSummary::None => None,
            summary => Some(Self { summary }),
        }
    }
}

/// Body of `POST /responses`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseRequest {
    /// Model identifier.
    pub model: String,
    /// Ordered input items.
    pub input: Vec<InputItem>,
    /// System-level instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Tools available to the model.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<HostedTool>,
    /// Reasoning options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningConfig>,
    /// Response this request continues from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,
}

impl ResponseRequest {
    /// Creates a request with no tools or options.
    #[must_use]
    pub fn new(model: impl Into<String>, input: Vec<InputItem>) -> Self {
        Self {
            model: model.into(),
            input,
            instructions: None,
            tools: Vec::new(),
            reasoning: None,
            previous_response_id: None,
        }
    }
}

/// A decoded response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseObject {
    /// Response identifier, used for chaining.
    #[serde(default)]
    pub id: String,
    /// Output items in execution order.
    #[serde(default)]
    pub output: Vec<WireItem>,
}

impl ResponseObject {
    /// First content block of the last output item.
    #[must_use]
    pub fn final_block(&self) -> Option<&WireContent> {
        self.output.last()?.content.as_ref()?.first()
    }

    /// Text of [`Self::final_block`].
    #[must_use]
    pub fn final_text(&self) -> Option<&str> {
        self.final_block()?.text.as_deref()
    }
}

/// One output item as sent by the vendor.
///
/// Decoded as a flat record so that unknown item types survive with their
/// type tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireItem {
    /// Vendor type tag (`message`, `reasoning`, `web_search_call`, ...).
    #[serde(rename = "type")]
    pub item_type: String,
    /// Message content blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<WireContent>>,
    /// Reasoning summary parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<SummaryPart>>,
    /// Web search action payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Value>,
    /// Function name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw function arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
    /// Function call identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

impl WireItem {
    /// Returns `true` for `function_call` items.
    #[must_use]
    pub fn is_function_call(&self) -> bool {
        self.item_type == "function_call"
    }

    /// Query of a `web_search_call` item.
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        self.action.as_ref()?.get("query")?.as_str()
    }

    /// Summary texts of a `reasoning` item.
    #[must_use]
    pub fn summary_texts(&self) -> Vec<String> {
        self.summary
            .iter()
            .flatten()
            .filter_map(|part| part.text.clone())
            .collect()
    }

    /// Converts into the core model, attributed to `agent`.
    ///
    /// Function calls become tool calls; hand-off detection is left to the
    /// caller.
    #[must_use]
    pub fn into_output_item(self, agent: Option<&str>) -> OutputItem {
        let kind = match self.item_type.as_str() {
            "message" => ItemKind::MessageOutput {
                content: self
                    .content
                    .unwrap_or_default()
                    .into_iter()
                    .map(ContentBlock::from)
                    .collect(),
            },
            "reasoning" => ItemKind::Reasoning {
                summary: self.summary_texts(),
            },
            "web_search_call" => ItemKind::WebSearchCall {
                query: self.search_query().map(str::to_string),
            },
            "function_call" => ItemKind::ToolCall {
                name: self.name,
                arguments: self.arguments,
            },
            _ => ItemKind::Other {
                vendor_type: self.item_type,
            },
        };
        OutputItem::new(agent, kind)
    }
}

/// A content block of a message item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireContent {
    /// Block type (`output_text`, `refusal`, ...).
    #[serde(rename = "type", default)]
    pub content_type: String,
    /// Block text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Annotations over `text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<WireAnnotation>>,
}

impl From<WireContent> for ContentBlock {
    fn from(block: WireContent) -> Self {
        Self {
            text: block.text,
            annotations: block
                .annotations
                .map(|list| list.into_iter().map(Annotation::from).collect()),
        }
    }
}

/// An annotation as sent by the vendor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireAnnotation {
    /// Annotation type (`url_citation`, `file_citation`, ...).
    #[serde(rename = "type", default)]
    pub annotation_type: String,
    /// Source title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Source URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Start offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    /// End offset (exclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<usize>,
}

impl From<WireAnnotation> for Annotation {
    fn from(a: WireAnnotation) -> Self {
        Self {
            kind: AnnotationKind::parse(&a.annotation_type),
            title: a.title,
            url: a.url,
            start_index: a.start_index,
            end_index: a.end_index,
        }
    }
}

/// A reasoning summary part.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryPart {
    /// Summary text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "resp_123",
        "object": "response",
        "output": [
            {"type": "reasoning", "id": "rs_1", "summary": [{"type": "summary_text", "text": "Plan the search"}]},
            {"type": "web_search_call", "id": "ws_1", "status": "completed", "action": {"type": "search", "query": "rust async runtimes"}},
            {"type": "code_interpreter_call", "id": "ci_1"},
            {"type": "message", "role": "assistant", "content": [
                {"type": "output_text", "text": "Tokio dominates.", "annotations": [
                    {"type": "url_citation", "title": "Tokio", "url": "https://tokio.rs", "start_index": 0, "end_index": 5}
                ]}
            ]}
        ]
    }"#;

    fn sample() -> ResponseObject {
        serde_json::from_str(SAMPLE).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn test_request_serialization() {
        let mut request = ResponseRequest::new(
            "o3-deep-research-2025-06-26",
            vec![InputItem::developer("be precise"), InputItem::user("query")],
        );
        request.tools = vec![HostedTool::WebSearchPreview, HostedTool::code_interpreter()];
        request.reasoning = ReasoningConfig::for_summary(ReasoningSummary::Auto);

        let json = serde_json::to_value(&request).unwrap_or_default();
        assert_eq!(json["input"][0]["type"], "message");
        assert_eq!(json["input"][0]["role"], "developer");
        assert_eq!(json["input"][1]["content"][0]["type"], "input_text");
        assert_eq!(json["tools"][0]["type"], "web_search_preview");
        assert_eq!(json["tools"][1]["container"]["type"], "auto");
        assert_eq!(json["tools"][1]["container"]["file_ids"], serde_json::json!([]));
        assert_eq!(json["reasoning"]["summary"], "auto");
        assert!(json.get("previous_response_id").is_none());
        assert!(json.get("instructions").is_none());
    }

    #[test]
    fn test_reasoning_none_omitted() {
        assert!(ReasoningConfig::for_summary(ReasoningSummary::None).is_none());
    }

    #[test]
    fn test_function_output_serialization() {
        let item = InputItem::function_output("call_1", r#"{"assistant":"Research Agent"}"#);
        let json = serde_json::to_value(&item).unwrap_or_default();
        assert_eq!(json["type"], "function_call_output");
        assert_eq!(json["call_id"], "call_1");
    }

    #[test]
    fn test_response_decoding() {
        let response = sample();
        assert_eq!(response.id, "resp_123");
        assert_eq!(response.output.len(), 4);
        assert_eq!(response.final_text(), Some("Tokio dominates."));
        assert_eq!(response.output[1].search_query(), Some("rust async runtimes"));
        assert_eq!(response.output[0].summary_texts(), vec!["Plan the search"]);
    }

    #[test]
    fn test_into_output_items() {
        let items: Vec<OutputItem> = sample()
            .output
            .into_iter()
            .map(|w| w.into_output_item(Some("Research Agent")))
            .collect();
        let tags: Vec<&str> = items.iter().map(|i| i.kind.tag()).collect();
        assert_eq!(
            tags,
            vec!["reasoning", "web_search_call", "other", "message_output"]
        );
        assert!(matches!(
            &items[2].kind,
            ItemKind::Other { vendor_type } if vendor_type == "code_interpreter_call"
        ));
        let ItemKind::MessageOutput { content } = &items[3].kind else {
            unreachable!()
        };
        let annotations = content[0].annotations.as_deref().unwrap_or_default();
        assert_eq!(annotations[0].kind, AnnotationKind::UrlCitation);
        assert_eq!(annotations[0].end_index, Some(5));
    }

    #[test]
    fn test_function_call_becomes_tool_call() {
        let item = WireItem {
            item_type: "function_call".to_string(),
            name: Some("lookup".to_string()),
            arguments: Some("{}".to_string()),
            call_id: Some("call_9".to_string()),
            ..WireItem::default()
        };
        assert!(item.is_function_call());
        let out = item.into_output_item(None);
        assert!(matches!(
            out.kind,
            ItemKind::ToolCall { name: Some(ref n), .. } if n == "lookup"
        ));
        assert_eq!(out.agent_label(), "Unknown Agent");
    }

    #[test]
    fn test_empty_output_has_no_final_text() {
        let response: ResponseObject =
            serde_json::from_str(r#"{"id":"r","output":[]}"#).unwrap_or_default();
        assert!(response.final_text().is_none());
    }
}
