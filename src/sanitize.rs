//! Fragment sanitizer.
//!
//! Takes an extracted HTML fragment and reduces it to clean, self-contained
//! chapter markup: no scripts, no mirror chrome, absolute resource links,
//! and a minimal attribute set. Step order matters; later steps assume
//! earlier ones already ran (link rewriting only sees elements that
//! survived the deny-list, attribute stripping would otherwise erase the
//! class names the deny-list matches on).

use regex::Regex;
use std::sync::LazyLock;

use crate::dom::{self, Document, Selection};
use crate::options::Options;
use crate::rules;
use crate::url_utils;

/// Match HTML comment nodes, including multi-line ones.
///
/// The DOM layer does not surface comment nodes, so they are stripped at
/// the text level before the fragment is parsed.
#[allow(clippy::expect_used)]
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

/// Sanitize an extracted fragment against its page URL.
///
/// Steps, in order:
/// 1. Drop comment nodes and every script/style/noscript element.
/// 2. Apply the configured boilerplate deny-list.
/// 3. Rewrite every remaining `src`/`href` to absolute form against
///    `base_url`, leaving http(s) and `data:`/`mailto:`/`tel:`/
///    `javascript:` values untouched.
/// 4. Strip all attributes except the configured allow-list.
/// 5. Serialize the body's inner content. A fragment that produced no body
///    node is returned unmodified.
///
/// # Example
///
/// ```rust
/// use chaptermill::{sanitize_fragment, Options};
///
/// let fragment = r#"<p onclick="track()">Text <script>evil()</script></p>"#;
/// let clean = sanitize_fragment(fragment, "https://example.com/c/1", &Options::default());
/// assert!(!clean.contains("script"));
/// assert!(!clean.contains("onclick"));
/// assert!(clean.contains("Text"));
/// ```
#[must_use]
pub fn sanitize_fragment(fragment: &str, base_url: &str, options: &Options) -> String {
    let stripped = COMMENT_RE.replace_all(fragment, "");
    let doc = dom::parse(&stripped);

    if doc.select("body").nodes().first().is_none() {
        return fragment.to_string();
    }

    dom::remove(&doc.select("script, style, noscript"));
    rules::apply(&doc, &options.boilerplate_rules);
    rewrite_resource_links(&doc, base_url);
    strip_attributes(&doc, &options.allowed_attributes);

    dom::inner_html(&doc.select("body")).to_string()
}

/// Rewrite relative `src`/`href` values to absolute form.
fn rewrite_resource_links(doc: &Document, base_url: &str) {
    for node in doc.select("*").nodes() {
        let sel = Selection::from(*node);
        for attr in ["src", "href"] {
            let Some(value) = dom::get_attribute(&sel, attr) else {
                continue;
            };
            if value.starts_with("http://")
                || value.starts_with("https://")
                || url_utils::is_special_scheme(&value)
            {
                continue;
            }
            dom::set_attribute(&sel, attr, &url_utils::resolve(base_url, &value));
        }
    }
}

/// Drop every attribute not on the allow-list.
///
/// This is a security and size measure, not a visual one: inline event
/// handlers, styles, and tracking attributes all go.
fn strip_attributes(doc: &Document, allowed: &[String]) {
    for node in doc.select("*").nodes() {
        let sel = Selection::from(*node);
        for (key, _) in dom::get_all_attributes(&sel) {
            if !allowed.iter().any(|a| a.eq_ignore_ascii_case(&key)) {
                dom::remove_attribute(&sel, &key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(fragment: &str) -> String {
        sanitize_fragment(fragment, "https://example.com/novel/chapter-5", &Options::default())
    }

    #[test]
    fn scripts_and_styles_never_survive() {
        let out = sanitize(concat!(
            "<p>before</p>",
            "<script>alert(1)</script>",
            "<style>p{color:red}</style>",
            "<noscript>enable js</noscript>",
            "<p>after</p>",
        ));

        assert!(!out.contains("<script"));
        assert!(!out.contains("<style"));
        assert!(!out.contains("<noscript"));
        assert!(out.contains("before"));
        assert!(out.contains("after"));
    }

    #[test]
    fn comments_are_removed() {
        let out = sanitize("<p>keep</p><!-- tracking\npixel --><p>this</p>");
        assert!(!out.contains("<!--"));
        assert!(out.contains("keep"));
        assert!(out.contains("this"));
    }

    #[test]
    fn boilerplate_containers_are_removed() {
        let out = sanitize(concat!(
            r#"<div class="chr-nav"><a href="/prev">prev</a></div>"#,
            "<p>story text</p>",
            r#"<div class="share-buttons">share me</div>"#,
            "<footer>footer</footer>",
        ));

        assert!(!out.contains("prev"));
        assert!(!out.contains("share me"));
        assert!(!out.contains("footer"));
        assert!(out.contains("story text"));
    }

    #[test]
    fn relative_links_become_absolute() {
        let out = sanitize(r#"<img src="/covers/5.jpg"><a href="chapter-6">next part</a>"#);

        assert!(out.contains(r#"src="https://example.com/covers/5.jpg""#));
        assert!(out.contains(r#"href="https://example.com/novel/chapter-6""#));
    }

    #[test]
    fn scheme_relative_links_take_base_scheme() {
        let out = sanitize(r#"<img src="//cdn.example.com/i.png">"#);
        assert!(out.contains(r#"src="https://cdn.example.com/i.png""#));
    }

    #[test]
    fn absolute_and_special_links_untouched() {
        let out = sanitize(concat!(
            r#"<a href="https://other.com/x">x</a>"#,
            r#"<img src="data:image/png;base64,abc">"#,
        ));

        assert!(out.contains(r#"href="https://other.com/x""#));
        assert!(out.contains(r#"src="data:image/png;base64,abc""#));
    }

    #[test]
    fn only_allowlisted_attributes_survive() {
        let out = sanitize(concat!(
            r#"<p style="color:red" onclick="track()" data-ad="1" align="center">text</p>"#,
            r#"<img src="https://example.com/i.png" alt="pic" title="t" width="600" loading="lazy">"#,
        ));

        assert!(!out.contains("style="));
        assert!(!out.contains("onclick="));
        assert!(!out.contains("data-ad="));
        assert!(!out.contains("align="));
        assert!(!out.contains("width="));
        assert!(!out.contains("loading="));
        assert!(out.contains(r#"src="https://example.com/i.png""#));
        assert!(out.contains(r#"alt="pic""#));
        assert!(out.contains(r#"title="t""#));
    }

    #[test]
    fn plain_paragraphs_pass_through() {
        let out = sanitize("<p>one</p><p>two</p>");
        assert!(out.contains("<p>one</p>"));
        assert!(out.contains("<p>two</p>"));
    }
}
