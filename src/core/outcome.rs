//! Result of a single research invocation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::item::Citation;
use super::method::MethodId;

/// Everything a caller gets back from one research call.
///
/// Built once per invocation and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchOutcome {
    /// The query as submitted.
    pub query: String,
    /// Backend that handled the query.
    pub method_used: MethodId,
    /// Final research text (or a textual error description).
    pub result_text: String,
    /// Citations from the final message, in encounter order.
    pub citations: Vec<Citation>,
    /// Numbered interaction flow lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flow: Vec<String>,
    /// Reasoning summary texts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasoning_steps: Vec<String>,
    /// Web search queries issued by the backend.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_searches: Vec<String>,
    /// Wall-clock time of the backend call.
    #[serde(
        serialize_with = "serialize_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub elapsed: Duration,
    /// Backend-specific metadata.
    pub metadata: OutcomeMetadata,
}

impl ResearchOutcome {
    /// Returns `true` if the backend failed and `result_text` holds the
    /// error description.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.metadata.error.is_some()
    }
}

/// Metadata attached to a [`ResearchOutcome`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeMetadata {
    /// Approach label (`openai_agents_orchestration`, `native_deep_research`).
    pub approach: String,
    /// Model used by the one-shot backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Number of citations extracted.
    pub citations_count: usize,
    /// Number of reasoning summary texts.
    pub reasoning_steps_count: usize,
    /// Number of web searches.
    pub web_searches_count: usize,
    /// Agents that took part in the run, in order of first appearance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents_used: Vec<String>,
    /// Whether clarification answers were supplied.
    #[serde(default)]
    pub has_clarifications: bool,
    /// Backend error, when the call failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_duration<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_f64(d.as_secs_f64())
}

fn deserialize_duration<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs = f64::deserialize(d)?;
    Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
}
