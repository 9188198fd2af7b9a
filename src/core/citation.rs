//! Citation extraction from the most recent message output.

use super::item::{Annotation, AnnotationKind, Citation, ItemKind, OutputItem};

/// Default number of characters of context kept before a citation.
pub const DEFAULT_CONTEXT_WINDOW: usize = 50;

/// Placeholder title used in the agent-run citation report.
pub const NO_TITLE: &str = "<no title>";
/// Placeholder URL used in the agent-run citation report.
pub const NO_URL: &str = "<no url>";

/// Extraction parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationOptions {
    /// Characters of context before each citation.
    pub window: usize,
    /// Title used when an annotation has none.
    pub default_title: String,
    /// URL used when an annotation has none.
    pub default_url: String,
}

impl CitationOptions {
    /// Agent-run report defaults (`<no title>`, `<no url>`).
    #[must_use]
    pub fn with_window(window: usize) -> Self {
        Self {
            window,
            default_title: NO_TITLE.to_string(),
            default_url: NO_URL.to_string(),
        }
    }

    /// Deep research defaults (`Unknown Title`, empty URL).
    ///
    /// Excerpts are normalized here too, so they may differ from the raw
    /// `text[start..end]` slice of the report.
    #[must_use]
    pub fn deep_research() -> Self {
        Self {
            window: DEFAULT_CONTEXT_WINDOW,
            default_title: "Unknown Title".to_string(),
            default_url: String::new(),
        }
    }
}

impl Default for CitationOptions {
    fn default() -> Self {
        Self::with_window(DEFAULT_CONTEXT_WINDOW)
    }
}

/// Extracts URL citations from the most recent message output item.
///
/// Only the newest `message_output` item is examined; if it carries no
/// citations the result is empty even when earlier items do.
#[must_use]
pub fn extract_citations(items: &[OutputItem], window: usize) -> Vec<Citation> {
    extract_citations_with(items, &CitationOptions::with_window(window))
}

/// [`extract_citations`] with explicit placeholder defaults.
#[must_use]
pub fn extract_citations_with(items: &[OutputItem], options: &CitationOptions) -> Vec<Citation> {
    let Some(content) = items.iter().rev().find_map(|item| match &item.kind {
        ItemKind::MessageOutput { content } => Some(content),
        _ => None,
    }) else {
        return Vec::new();
    };

    let mut citations = Vec::new();
    for block in content {
        let (Some(text), Some(annotations)) = (block.text.as_deref(), block.annotations.as_ref())
        else {
            continue;
        };
        citations.extend(
            annotations
                .iter()
                .filter_map(|ann| citation_from_annotation(text, ann, options)),
        );
    }
    citations
}

fn citation_from_annotation(
    text: &str,
    ann: &Annotation,
    options: &CitationOptions,
) -> Option<Citation> {
    if ann.kind != AnnotationKind::UrlCitation {
        return None;
    }
    let (start, end) = (ann.start_index?, ann.end_index?);

    // Each bound clips on its own; the window is measured from the raw start.
    let len = text.chars().count();
    let pre_from = start.saturating_sub(options.window).min(len);
    let from = start.min(len);
    let to = end.clamp(from, len);

    Some(Citation {
        title: ann
            .title
            .clone()
            .unwrap_or_else(|| options.default_title.clone()),
        url: ann.url.clone().unwrap_or_else(|| options.default_url.clone()),
        excerpt: normalize(char_slice(text, from, to)),
        preceding_text: normalize(char_slice(text, pre_from, from)),
        start_index: start,
        end_index: end,
    })
}

/// Slices `text` by character offsets `start..end` (half-open).
///
/// Offsets past the end clip to the text length.
#[must_use]
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let byte_at = |n: usize| text.char_indices().nth(n).map_or(text.len(), |(b, _)| b);
    let from = byte_at(start);
    let to = byte_at(end.max(start));
    &text[from..to]
}

fn normalize(s: &str) -> String {
    s.replace('\n', " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::ContentBlock;
    use proptest::prelude::*;

    const SAMPLE: &str = "This is some research text with a citation reference here.";

    fn message(agent: &str, blocks: Vec<ContentBlock>) -> OutputItem {
        OutputItem::new(Some(agent), ItemKind::MessageOutput { content: blocks })
    }

    fn handoff(agent: &str, target: &str) -> OutputItem {
        OutputItem::new(
            Some(agent),
            ItemKind::HandoffCall {
                target: Some(target.to_string()),
            },
        )
    }

    #[test]
    fn test_sample_offsets() {
        let items = vec![message(
            "Research Agent",
            vec![ContentBlock::annotated(
                SAMPLE,
                vec![Annotation::url_citation(
                    "Test Research Paper",
                    "https://example.com/research",
                    35,
                    53,
                )],
            )],
        )];

        let citations = extract_citations(&items, 50);
        assert_eq!(citations.len(), 1);
        let c = &citations[0];
        assert_eq!(c.title, "Test Research Paper");
        assert_eq!(c.url, "https://example.com/research");
        assert_eq!(char_slice(SAMPLE, 35, 53), "itation reference ");
        assert_eq!(char_slice(SAMPLE, 35, 53).chars().count(), 18);
        assert_eq!(c.excerpt, "itation reference");
        assert_eq!(c.preceding_text, "This is some research text with a c");
        assert_eq!(c.preceding_text.chars().count(), 35);
        assert_eq!((c.start_index, c.end_index), (35, 53));
    }

    #[test]
    fn test_window_limits_preceding_text() {
        let items = vec![message(
            "A",
            vec![ContentBlock::annotated(
                SAMPLE,
                vec![Annotation::url_citation("t", "u", 35, 53)],
            )],
        )];
        let citations = extract_citations(&items, 10);
        assert_eq!(citations[0].preceding_text, "t with a c");
    }

    #[test]
    fn test_newlines_collapsed() {
        let text = "alpha\nbeta\ngamma";
        let items = vec![message(
            "A",
            vec![ContentBlock::annotated(
                text,
                vec![Annotation::url_citation("t", "u", 6, 16)],
            )],
        )];
        let citations = extract_citations(&items, 50);
        assert_eq!(citations[0].excerpt, "beta gamma");
        assert_eq!(citations[0].preceding_text, "alpha");
    }

    #[test]
    fn test_stops_at_most_recent_message() {
        let annotated = message(
            "Research Agent",
            vec![ContentBlock::annotated(
                SAMPLE,
                vec![Annotation::url_citation("t", "u", 0, 4)],
            )],
        );
        let plain = message("Research Agent", vec![ContentBlock::text("no citations")]);
        let items = vec![annotated, handoff("Triage Agent", "x"), plain];

        assert!(extract_citations(&items, 50).is_empty());
    }

    #[test]
    fn test_uses_latest_message_not_first() {
        let first = message(
            "A",
            vec![ContentBlock::annotated(
                "first text",
                vec![Annotation::url_citation("first", "u1", 0, 5)],
            )],
        );
        let second = message(
            "B",
            vec![ContentBlock::annotated(
                "second text",
                vec![Annotation::url_citation("second", "u2", 0, 6)],
            )],
        );
        let citations = extract_citations(&[first, second], 50);
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].title, "second");
    }

    #[test]
    fn test_skips_blocks_and_annotations() {
        let no_offsets = Annotation {
            kind: AnnotationKind::UrlCitation,
            title: Some("missing".to_string()),
            url: None,
            start_index: Some(3),
            end_index: None,
        };
        let file_citation = Annotation {
            kind: AnnotationKind::Other("file_citation".to_string()),
            ..Annotation::url_citation("file", "f", 0, 1)
        };
        let untitled = Annotation {
            title: None,
            url: None,
            ..Annotation::url_citation("", "", 0, 3)
        };
        let items = vec![message(
            "A",
            vec![
                ContentBlock {
                    text: None,
                    annotations: Some(vec![Annotation::url_citation("t", "u", 0, 1)]),
                },
                ContentBlock::text("unannotated"),
                ContentBlock::annotated("abcdef", vec![no_offsets, file_citation, untitled]),
            ],
        )];

        let citations = extract_citations(&items, 50);
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].title, NO_TITLE);
        assert_eq!(citations[0].url, NO_URL);
        assert_eq!(citations[0].excerpt, "abc");
    }

    #[test]
    fn test_out_of_range_offsets_clip() {
        let items = vec![message(
            "A",
            vec![ContentBlock::annotated(
                "short",
                vec![
                    Annotation::url_citation("past", "u", 3, 100),
                    Annotation::url_citation("beyond", "u", 40, 50),
                    Annotation::url_citation("inverted", "u", 4, 1),
                ],
            )],
        )];
        let citations = extract_citations(&items, 50);
        assert_eq!(citations.len(), 3);
        assert_eq!(citations[0].excerpt, "rt");
        assert_eq!(citations[1].excerpt, "");
        assert_eq!(citations[1].preceding_text, "short");
        assert_eq!(citations[2].excerpt, "");
        assert_eq!(citations[2].preceding_text, "shor");
    }

    #[test]
    fn test_start_past_window_has_no_context() {
        let items = vec![message(
            "A",
            vec![ContentBlock::annotated(
                "short",
                vec![Annotation::url_citation("far", "u", 100, 120)],
            )],
        )];
        let citations = extract_citations(&items, 50);
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].excerpt, "");
        assert_eq!(citations[0].preceding_text, "");
        assert_eq!((citations[0].start_index, citations[0].end_index), (100, 120));
    }

    #[test]
    fn test_keeps_annotation_order() {
        let items = vec![message(
            "A",
            vec![ContentBlock::annotated(
                "0123456789",
                vec![
                    Annotation::url_citation("late", "u", 8, 10),
                    Annotation::url_citation("early", "u", 0, 2),
                ],
            )],
        )];
        let titles: Vec<String> = extract_citations(&items, 50)
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["late", "early"]);
    }

    #[test]
    fn test_multibyte_offsets_are_characters() {
        let text = "café résumé source";
        let items = vec![message(
            "A",
            vec![ContentBlock::annotated(
                text,
                vec![Annotation::url_citation("t", "u", 5, 11)],
            )],
        )];
        let citations = extract_citations(&items, 50);
        assert_eq!(citations[0].excerpt, "résumé");
        assert_eq!(citations[0].preceding_text, "café");
    }

    #[test]
    fn test_deep_research_defaults() {
        let ann = Annotation {
            title: None,
            url: None,
            ..Annotation::url_citation("", "", 0, 4)
        };
        let items = vec![message("A", vec![ContentBlock::annotated("text body", vec![ann])])];
        let citations = extract_citations_with(&items, &CitationOptions::deep_research());
        assert_eq!(citations[0].title, "Unknown Title");
        assert_eq!(citations[0].url, "");
    }

    fn arb_item() -> impl Strategy<Value = OutputItem> {
        prop_oneof![
            "[a-z ]{0,10}".prop_map(|t| handoff("A", &t)),
            ("[a-z_]{0,8}", "[ -~]{0,12}").prop_map(|(n, a)| OutputItem::new(
                Some("A"),
                ItemKind::ToolCall {
                    name: Some(n),
                    arguments: Some(a),
                }
            )),
            "[a-z ]{0,10}".prop_map(|q| OutputItem::new(
                None,
                ItemKind::WebSearchCall { query: Some(q) }
            )),
        ]
    }

    proptest! {
        #[test]
        fn prop_no_message_output_means_no_citations(items in prop::collection::vec(arb_item(), 0..12)) {
            prop_assert!(extract_citations(&items, DEFAULT_CONTEXT_WINDOW).is_empty());
        }

        #[test]
        fn prop_unannotated_latest_message_shadows_earlier(
            earlier in prop::collection::vec(arb_item(), 0..6),
            text in "[a-zA-Z \n]{1,80}",
        ) {
            let len = text.chars().count();
            let mut items = vec![message(
                "A",
                vec![ContentBlock::annotated(text.clone(), vec![Annotation::url_citation("t", "u", 0, len)])],
            )];
            items.extend(earlier);
            items.push(message("B", vec![ContentBlock::text(text)]));
            prop_assert!(extract_citations(&items, DEFAULT_CONTEXT_WINDOW).is_empty());
        }

        #[test]
        fn prop_excerpt_is_normalized(text in "[a-z \n]{0,60}", start in 0usize..70, span in 0usize..30) {
            let items = vec![message(
                "A",
                vec![ContentBlock::annotated(text, vec![Annotation::url_citation("t", "u", start, start + span)])],
            )];
            for c in extract_citations(&items, 20) {
                prop_assert!(!c.excerpt.contains('\n'));
                prop_assert_eq!(c.excerpt.trim(), c.excerpt.as_str());
                prop_assert!(c.preceding_text.chars().count() <= 20);
            }
        }
    }
}
