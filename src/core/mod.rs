//! Core post-processing: the output-item model, citation extraction,
//! flow summaries, and backend routing.
//!
//! Everything here is synchronous and pure over already-captured items.

pub mod citation;
pub mod flow;
pub mod item;
pub mod method;
pub mod outcome;

pub use citation::{
    CitationOptions, DEFAULT_CONTEXT_WINDOW, extract_citations, extract_citations_with,
};
pub use flow::summarize_flow;
pub use item::{Annotation, AnnotationKind, Citation, ContentBlock, ItemKind, OutputItem};
pub use method::{MethodId, ResearchMethod, select_method};
pub use outcome::{OutcomeMetadata, ResearchOutcome};
