//! DOM operations adapter.
//!
//! Thin wrappers over the `dom_query` crate giving the rest of the crate a
//! small, consistent surface for tree access and mutation. Parsing never
//! fails: html5ever produces a best-effort tree for truncated or outright
//! non-HTML input, which is exactly the tolerance the mirror sites demand.

// Re-export core types for external use
pub use dom_query::{Document, Selection};

// Re-export StrTendril for external use
pub use tendril::StrTendril;

/// Parse markup into a queryable document.
///
/// Never fails. Malformed or truncated markup yields a best-effort tree;
/// the parser suppresses recoverable errors.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Attribute Operations ===

/// Get element ID attribute
#[inline]
#[must_use]
pub fn id(sel: &Selection) -> Option<String> {
    sel.attr("id").map(|s| s.to_string())
}

/// Get element class attribute
#[inline]
#[must_use]
pub fn class_name(sel: &Selection) -> Option<String> {
    sel.attr("class").map(|s| s.to_string())
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Set an attribute value
#[inline]
pub fn set_attribute(sel: &Selection, name: &str, value: &str) {
    sel.set_attr(name, value);
}

/// Remove an attribute
#[inline]
pub fn remove_attribute(sel: &Selection, name: &str) {
    sel.remove_attr(name);
}

/// Get all attributes as key-value pairs
///
/// Returns empty vector if node has no attributes or if selection is empty.
#[must_use]
pub fn get_all_attributes(sel: &Selection) -> Vec<(String, String)> {
    sel.nodes()
        .first()
        .map(|node| {
            node.attrs()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_string())
}

// === Text Content ===

/// Get all text content of node and descendants
///
/// Returns `StrTendril` for zero-copy passing. Use `.to_string()` only when
/// you need owned storage.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Get inner HTML content
#[inline]
#[must_use]
pub fn inner_html(sel: &Selection) -> StrTendril {
    sel.inner_html()
}

/// Get outer HTML content
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

// === Tree Manipulation ===

/// Remove elements from tree
#[inline]
pub fn remove(sel: &Selection) {
    sel.remove();
}

/// Clone a whole document
#[must_use]
pub fn clone_document(doc: &Document) -> Document {
    Document::from(doc.html().to_string())
}

/// Detach a copy of an element into its own document.
///
/// The copy carries all descendants and can be pruned and scored without
/// touching the page tree it came from.
#[must_use]
pub fn detach_copy(sel: &Selection) -> Document {
    Document::from(outer_html(sel).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_select() {
        let doc = parse(r#"<div id="main" class="container">content</div>"#);
        let div = doc.select("div");

        assert_eq!(id(&div), Some("main".to_string()));
        assert_eq!(class_name(&div), Some("container".to_string()));
    }

    #[test]
    fn parse_tolerates_truncated_markup() {
        let doc = parse("<div><p>unclosed");
        assert_eq!(text_content(&doc.select("p")).to_string(), "unclosed");
    }

    #[test]
    fn parse_tolerates_non_html_input() {
        let doc = parse("just some plain text, no tags at all");
        assert!(doc.select("body").nodes().first().is_some());
    }

    #[test]
    fn remove_elements() {
        let doc = parse(r#"<div><span class="ad">ad</span><p>content</p></div>"#);
        remove(&doc.select(".ad"));

        let text = text_content(&doc.select("div"));
        assert_eq!(text.to_string(), "content");
    }

    #[test]
    fn all_attributes_listed() {
        let doc = parse(r#"<a href="https://example.com" class="link" title="Example">x</a>"#);
        let attrs = get_all_attributes(&doc.select("a"));

        assert_eq!(attrs.len(), 3);
        assert!(attrs.iter().any(|(k, v)| k == "href" && v == "https://example.com"));
    }

    #[test]
    fn detach_copy_leaves_original_alone() {
        let doc = parse("<article><p>one</p><p>two</p></article>");
        let copy = detach_copy(&doc.select("article"));

        remove(&copy.select("p"));
        assert_eq!(copy.select("p").nodes().len(), 0);
        assert_eq!(doc.select("p").nodes().len(), 2);
    }

    #[test]
    fn tag_name_is_lowercase() {
        let doc = parse("<DIV>x</DIV>");
        assert_eq!(tag_name(&doc.select("div")), Some("div".to_string()));
    }
}
