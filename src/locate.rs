//! Content locator.
//!
//! Given a full chapter page, finds the container most likely to hold the
//! chapter body. Candidate selector patterns are tried in configured order;
//! every matching node is pruned of non-content descendants, relieved of
//! its heading (which becomes the title), and scored. Long paragraphs win:
//! the score weights paragraph count heavily so a handful of long
//! paragraphs beats a pile of link stubs of the same total length.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::dom::{self, Document, Selection};
use crate::options::Options;
use crate::record::Located;
use crate::rules;
use crate::sanitize::sanitize_fragment;

/// Weight of one paragraph descendant in a candidate's score.
pub const PARAGRAPH_WEIGHT: i64 = 500;

/// Leading "Chapter N" run, with a separator, as mirrors render it.
#[allow(clippy::expect_used)]
static TITLE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*chapter\s*\d+\s*[:.\-]\s*").expect("valid regex"));

/// Transient scoring state for one candidate container.
struct Candidate {
    /// Detached working copy of the container, heading already removed.
    doc: Document,
    score: i64,
    /// Trimmed text length, for the noise floor.
    text_len: usize,
    title: String,
}

/// Locate the chapter title and body on a chapter page.
///
/// Tries the configured candidate patterns in order and keeps the
/// best-scoring container; the first pattern that produces an acceptable
/// candidate wins and later, broader patterns are not consulted. If no
/// candidate is acceptable anywhere, the entire document body (minus
/// script/style/nav/footer) is used. The winning container's inner content
/// is sanitized against `page_url`.
///
/// Structurally absent title or content degrade to empty strings; this
/// function does not fail.
///
/// # Example
///
/// ```rust
/// use chaptermill::{locate_content, Options};
///
/// let body = "It was a dark and stormy night; the rain fell in torrents \
///             except at occasional intervals, when it was checked by a \
///             violent gust of wind which swept up the streets.";
/// let html = format!(
///     r#"<html><body><div class="chapter-content">
///         <h3>Chapter 1: Chapter 1: The Night</h3><p>{body}</p>
///     </div></body></html>"#
/// );
///
/// let located = locate_content(&html, "https://example.com/n/c-1", &Options::default());
/// assert_eq!(located.title, "Chapter 1: The Night");
/// assert!(located.content.contains("stormy night"));
/// ```
#[must_use]
pub fn locate_content(html: &str, page_url: &str, options: &Options) -> Located {
    let doc = dom::parse(html);
    let mut best: Option<Candidate> = None;

    for pattern in &options.content_patterns {
        let mut pattern_scored = false;
        for node in doc.select(pattern.as_str()).nodes() {
            let sel = Selection::from(*node);
            let candidate = evaluate(&sel, options);

            if candidate.score > 0 && candidate.text_len > options.min_candidate_text_len {
                pattern_scored = true;
                if best.as_ref().is_none_or(|b| candidate.score > b.score) {
                    best = Some(candidate);
                }
            }
        }

        // First good match wins; later, broader patterns are a safety net,
        // not a second opinion.
        if pattern_scored {
            debug!(pattern = pattern.as_str(), "content candidate pattern matched");
            break;
        }
    }

    match best {
        Some(winner) => {
            debug!(score = winner.score, "content candidate selected");
            let inner = container_inner(&winner.doc);
            Located {
                title: winner.title,
                content: sanitize_fragment(&inner, page_url, options),
            }
        }
        None => {
            debug!(url = page_url, "no content candidate scored; falling back to page body");
            body_fallback(&doc, page_url, options)
        }
    }
}

/// Inner content of the container held in a detached candidate copy.
///
/// The copy's body wraps exactly one element, the candidate container;
/// what flows onward is that container's inner markup, not the container
/// itself.
pub(crate) fn container_inner(doc: &Document) -> String {
    let body = doc.select("body");
    match body.children().nodes().first() {
        Some(node) => dom::inner_html(&Selection::from(*node)).to_string(),
        None => dom::inner_html(&body).to_string(),
    }
}

/// Last resort: the whole page body with only script/style/nav/footer
/// removed. No title is recovered on this path.
fn body_fallback(doc: &Document, page_url: &str, options: &Options) -> Located {
    let copy = dom::clone_document(doc);
    dom::remove(&copy.select("script, style, nav, footer"));
    let inner = dom::inner_html(&copy.select("body"));

    Located {
        title: String::new(),
        content: sanitize_fragment(&inner, page_url, options),
    }
}

/// Prune, de-title and score one candidate container.
fn evaluate(sel: &Selection, options: &Options) -> Candidate {
    let copy = dom::detach_copy(sel);
    rules::apply(&copy, &options.non_content_rules);

    let title = take_heading(&copy);

    let body = copy.select("body");
    let text = dom::text_content(&body);
    let text_len = text.trim().chars().count();
    let paragraphs = body.select("p").nodes().len() as i64;
    let score = text.chars().count() as i64 + PARAGRAPH_WEIGHT * paragraphs;

    Candidate {
        doc: copy,
        score,
        text_len,
        title,
    }
}

/// Take the first heading (h1 through h4, first level wins) out of a
/// candidate copy and return its normalized text.
pub(crate) fn take_heading(doc: &Document) -> String {
    for tag in ["h1", "h2", "h3", "h4"] {
        if let Some(node) = doc.select(tag).nodes().first() {
            let heading = Selection::from(*node);
            let text = dom::text_content(&heading).trim().to_string();
            dom::remove(&heading);
            return collapse_repeated_title_prefix(&text);
        }
    }
    String::new()
}

/// Collapse a duplicated "Chapter N:" run at the start of a title down to
/// one occurrence.
///
/// Mirrors that inject the chapter label both in the heading template and
/// in the stored title produce "Chapter 12: Chapter 12: The Fall"; only
/// consecutive repeats of the same label are collapsed. This normalization
/// is deliberately isolated so it can be tuned or disabled without
/// touching extraction.
#[must_use]
pub fn collapse_repeated_title_prefix(title: &str) -> String {
    let Some(first) = TITLE_PREFIX_RE.find(title) else {
        return title.trim().to_string();
    };

    let prefix = first.as_str();
    let normalized = normalize_label(prefix);
    let mut rest = &title[first.end()..];

    while let Some(repeat) = TITLE_PREFIX_RE.find(rest) {
        if repeat.start() == 0 && normalize_label(repeat.as_str()) == normalized {
            rest = &rest[repeat.end()..];
        } else {
            break;
        }
    }

    format!("{}{}", prefix.trim_start(), rest).trim().to_string()
}

fn normalize_label(label: &str) -> String {
    label.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_prefix_collapses_to_one() {
        assert_eq!(
            collapse_repeated_title_prefix("Chapter 12: Chapter 12: The Fall"),
            "Chapter 12: The Fall"
        );
        assert_eq!(
            collapse_repeated_title_prefix("Chapter 3: Chapter 3: Chapter 3: Home"),
            "Chapter 3: Home"
        );
    }

    #[test]
    fn collapse_ignores_case_and_spacing() {
        assert_eq!(
            collapse_repeated_title_prefix("chapter 7: Chapter  7: Seven"),
            "chapter 7: Seven"
        );
    }

    #[test]
    fn different_numbers_are_not_collapsed() {
        assert_eq!(
            collapse_repeated_title_prefix("Chapter 1: Chapter 2: Confusing"),
            "Chapter 1: Chapter 2: Confusing"
        );
    }

    #[test]
    fn plain_titles_pass_through() {
        assert_eq!(collapse_repeated_title_prefix("An Unexpected Party"), "An Unexpected Party");
        assert_eq!(collapse_repeated_title_prefix("Chapter 5: Riddles"), "Chapter 5: Riddles");
        assert_eq!(collapse_repeated_title_prefix(""), "");
    }

    #[test]
    fn heading_levels_are_tried_in_order() {
        let doc = dom::parse("<div><h2>Subtitle</h2><h1>Main Title</h1></div>");
        assert_eq!(take_heading(&doc), "Main Title");
        // The h1 is gone; the h2 remains in the tree.
        assert_eq!(doc.select("h1").nodes().len(), 0);
        assert_eq!(doc.select("h2").nodes().len(), 1);
    }

    #[test]
    fn no_heading_yields_empty_title() {
        let doc = dom::parse("<div><p>just text</p></div>");
        assert_eq!(take_heading(&doc), "");
    }

    #[test]
    fn locate_degrades_to_empty_on_blank_page() {
        let located = locate_content(
            "<html><body></body></html>",
            "https://example.com/c/1",
            &Options::default(),
        );
        assert_eq!(located.title, "");
        assert_eq!(located.content.trim(), "");
    }

    #[test]
    fn fallback_keeps_body_text_without_chrome() {
        let text = "x".repeat(150);
        let html = format!(
            "<html><body><nav>menu</nav><div id=\"mystery\">{text}</div><footer>f</footer></body></html>"
        );
        let located = locate_content(&html, "https://example.com/c/1", &Options::default());

        assert_eq!(located.title, "");
        assert!(located.content.contains(&text));
        assert!(!located.content.contains("menu"));
    }
}
