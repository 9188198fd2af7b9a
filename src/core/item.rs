//! Output items captured from a single research invocation.
//!
//! Every field a backend may or may not supply is an `Option`, so presence
//! is part of the type rather than a runtime probe.

use serde::{Deserialize, Serialize};

/// Label used when an item carries no agent attribution.
pub const UNKNOWN_AGENT: &str = "Unknown Agent";

/// One item produced by a backend, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputItem {
    /// Agent that produced the item, if attributed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub kind: ItemKind,
}

/// Kind-specific payload of an [`OutputItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    /// Transfer of control to another agent.
    HandoffCall {
        /// Hand-off function name (e.g. `transfer_to_research_agent`).
        #[serde(default)]
        target: Option<String>,
    },
    /// Invocation of a named tool.
    ToolCall {
        /// Tool name.
        #[serde(default)]
        name: Option<String>,
        /// Raw argument string as produced by the model.
        #[serde(default)]
        arguments: Option<String>,
    },
    /// Text output from an agent.
    MessageOutput {
        /// Content blocks in order.
        #[serde(default)]
        content: Vec<ContentBlock>,
    },
    /// Reasoning summary.
    Reasoning {
        /// Summary texts in order.
        #[serde(default)]
        summary: Vec<String>,
    },
    /// Hosted web search invocation.
    WebSearchCall {
        /// Search query, when the action carried one.
        #[serde(default)]
        query: Option<String>,
    },
    /// Anything else the backend emitted.
    Other {
        /// Vendor type tag.
        #[serde(default)]
        vendor_type: String,
    },
}

impl ItemKind {
    /// Short tag for logging.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::HandoffCall { .. } => "handoff_call",
            Self::ToolCall { .. } => "tool_call",
            Self::MessageOutput { .. } => "message_output",
            Self::Reasoning { .. } => "reasoning",
            Self::WebSearchCall { .. } => "web_search_call",
            Self::Other { .. } => "other",
        }
    }
}

impl OutputItem {
    /// Creates an item attributed to `agent`.
    #[must_use]
    pub fn new(agent: Option<&str>, kind: ItemKind) -> Self {
        Self {
            agent_name: agent.map(str::to_string),
            kind,
        }
    }

    /// Agent name for display, defaulting to [`UNKNOWN_AGENT`].
    #[must_use]
    pub fn agent_label(&self) -> &str {
        self.agent_name.as_deref().unwrap_or(UNKNOWN_AGENT)
    }

    /// Returns `true` for message output items.
    #[must_use]
    pub const fn is_message_output(&self) -> bool {
        matches!(self.kind, ItemKind::MessageOutput { .. })
    }

    /// Concatenated text of all content blocks, for message output items.
    #[must_use]
    pub fn message_text(&self) -> Option<String> {
        match &self.kind {
            ItemKind::MessageOutput { content } => Some(
                content
                    .iter()
                    .filter_map(|b| b.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            _ => None,
        }
    }
}

/// A block of message content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Block text, if the block is textual.
    #[serde(default)]
    pub text: Option<String>,
    /// Annotations over `text`. `None` and `Some(vec![])` are distinct.
    #[serde(default)]
    pub annotations: Option<Vec<Annotation>>,
}

impl ContentBlock {
    /// Text block without annotations.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            annotations: None,
        }
    }

    /// Text block with annotations.
    #[must_use]
    pub fn annotated(text: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        Self {
            text: Some(text.into()),
            annotations: Some(annotations),
        }
    }
}

/// Kind of an [`Annotation`]. Only URL citations are treated as citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnnotationKind {
    /// `"url_citation"`.
    UrlCitation,
    /// Any other vendor annotation type.
    Other(String),
}

impl AnnotationKind {
    /// Parses a vendor annotation type string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s == "url_citation" {
            Self::UrlCitation
        } else {
            Self::Other(s.to_string())
        }
    }

    /// Returns the vendor string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::UrlCitation => "url_citation",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for AnnotationKind {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<AnnotationKind> for String {
    fn from(kind: AnnotationKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A marked span within a content block's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation type.
    pub kind: AnnotationKind,
    /// Source title.
    #[serde(default)]
    pub title: Option<String>,
    /// Source URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Start offset (characters, inclusive).
    #[serde(default)]
    pub start_index: Option<usize>,
    /// End offset (characters, exclusive).
    #[serde(default)]
    pub end_index: Option<usize>,
}

impl Annotation {
    /// URL citation over `start..end`.
    #[must_use]
    pub fn url_citation(title: &str, url: &str, start: usize, end: usize) -> Self {
        Self {
            kind: AnnotationKind::UrlCitation,
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            start_index: Some(start),
            end_index: Some(end),
        }
    }
}

/// A citation derived from an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Source title.
    pub title: String,
    /// Source URL.
    pub url: String,
    /// Cited span, newlines collapsed and trimmed.
    pub excerpt: String,
    /// Text before the span, same normalization.
    #[serde(default)]
    pub preceding_text: String,
    /// Start offset as given by the annotation, unclipped.
    #[serde(default)]
    pub start_index: usize,
    /// End offset as given by the annotation, unclipped.
    #[serde(default)]
    pub end_index: usize,
}
