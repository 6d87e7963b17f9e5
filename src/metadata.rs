//! Novel metadata extraction.
//!
//! Best-effort only: every field degrades to the empty string. Sources are
//! consulted in order of trustworthiness: explicit meta tags first, then
//! JSON-LD blocks, then visible landing page markup. The first source to
//! produce a value for a field wins.

use serde_json::Value;
use tracing::debug;

use crate::dom::{self, Document, Selection};
use crate::record::NovelMetadata;
use crate::url_utils;

/// Extract novel metadata from a landing page.
#[must_use]
pub fn extract_novel_metadata(doc: &Document, novel_url: &str) -> NovelMetadata {
    let mut meta = NovelMetadata {
        url: novel_url.to_string(),
        ..NovelMetadata::default()
    };

    examine_meta_tags(doc, &mut meta);
    examine_json_ld(doc, &mut meta);
    examine_landing_markup(doc, novel_url, &mut meta);

    debug!(title = meta.title.as_str(), author = meta.author.as_str(), "landing page metadata");
    meta
}

/// Route `<meta>` tags into metadata fields.
fn examine_meta_tags(doc: &Document, meta: &mut NovelMetadata) {
    for node in doc.select("meta").nodes() {
        let tag = Selection::from(*node);

        let name = dom::get_attribute(&tag, "name")
            .or_else(|| dom::get_attribute(&tag, "property"))
            .or_else(|| dom::get_attribute(&tag, "itemprop"))
            .unwrap_or_default()
            .to_lowercase();
        let content = dom::get_attribute(&tag, "content").unwrap_or_default();

        if name.is_empty() || content.is_empty() {
            continue;
        }

        match name.as_str() {
            "og:title" | "twitter:title" | "title" => fill(&mut meta.title, &content),
            "author" | "og:novel:author" | "books:author" => fill(&mut meta.author, &content),
            "description" | "og:description" | "twitter:description" => {
                fill(&mut meta.summary, &content);
            }
            "og:image" | "twitter:image" => fill(&mut meta.cover, &content),
            "og:novel:status" => fill(&mut meta.status, &content),
            "og:novel:category" | "og:novel:genre" => fill(&mut meta.genre, &content),
            _ => {}
        }
    }
}

/// Pull title and author out of `application/ld+json` blocks.
///
/// Mirrors commonly embed a Book object; both a bare object and a
/// top-level array are accepted, and the author may be a string or a
/// nested object with a `name`.
fn examine_json_ld(doc: &Document, meta: &mut NovelMetadata) {
    for node in doc.select(r#"script[type="application/ld+json"]"#).nodes() {
        let script = Selection::from(*node);
        let raw = dom::text_content(&script);

        let Ok(value) = serde_json::from_str::<Value>(raw.trim()) else {
            continue;
        };

        let objects: Vec<&Value> = match &value {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        for object in objects {
            let type_name = object
                .get("@type")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if !matches!(type_name, "Book" | "Novel" | "CreativeWork") {
                continue;
            }

            if let Some(name) = object.get("name").and_then(Value::as_str) {
                fill(&mut meta.title, name);
            }

            match object.get("author") {
                Some(Value::String(author)) => fill(&mut meta.author, author),
                Some(Value::Object(author)) => {
                    if let Some(name) = author.get("name").and_then(Value::as_str) {
                        fill(&mut meta.author, name);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Scrape whatever visible landing page markup the meta layers missed.
fn examine_landing_markup(doc: &Document, novel_url: &str, meta: &mut NovelMetadata) {
    if meta.title.is_empty() {
        for pattern in ["h3.title", "h1.novel-title", ".book-name", "h1"] {
            if let Some(node) = doc.select(pattern).nodes().first() {
                fill(&mut meta.title, dom::text_content(&Selection::from(*node)).trim());
                break;
            }
        }
    }

    if meta.author.is_empty() {
        if let Some(node) = doc.select(r#"a[href*="/author"]"#).nodes().first() {
            fill(&mut meta.author, dom::text_content(&Selection::from(*node)).trim());
        }
    }

    if meta.summary.is_empty() {
        for pattern in [".desc-text", ".summary", "#description"] {
            if let Some(node) = doc.select(pattern).nodes().first() {
                fill(&mut meta.summary, dom::text_content(&Selection::from(*node)).trim());
                break;
            }
        }
    }

    if meta.cover.is_empty() {
        for pattern in [".book img", ".cover img", "img.cover"] {
            if let Some(node) = doc.select(pattern).nodes().first() {
                let src = dom::get_attribute(&Selection::from(*node), "src").unwrap_or_default();
                fill(&mut meta.cover, &src);
                break;
            }
        }
    }

    if meta.status.is_empty() {
        if let Some(node) = doc.select(r#"a[href*="/status"]"#).nodes().first() {
            fill(&mut meta.status, dom::text_content(&Selection::from(*node)).trim());
        }
    }

    if meta.genre.is_empty() {
        let mut genres = Vec::new();
        for node in doc.select(r#"a[href*="/genre"]"#).nodes() {
            let text = dom::text_content(&Selection::from(*node)).trim().to_string();
            if !text.is_empty() && !genres.contains(&text) {
                genres.push(text);
            }
        }
        meta.genre = genres.join(", ");
    }

    if !meta.cover.is_empty() {
        meta.cover = url_utils::resolve(novel_url, &meta.cover);
    }
}

/// First writer wins; later sources never overwrite.
fn fill(field: &mut String, value: &str) {
    if field.is_empty() && !value.trim().is_empty() {
        *field = value.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/novel/ash-garden";

    #[test]
    fn og_tags_populate_fields() {
        let doc = dom::parse(concat!(
            r#"<head>"#,
            r#"<meta property="og:title" content="Ash Garden">"#,
            r#"<meta property="og:description" content="A story of soot.">"#,
            r#"<meta property="og:image" content="/covers/ash.jpg">"#,
            r#"<meta property="og:novel:author" content="R. Ito">"#,
            r#"<meta property="og:novel:status" content="Ongoing">"#,
            r#"</head>"#,
        ));
        let meta = extract_novel_metadata(&doc, URL);

        assert_eq!(meta.title, "Ash Garden");
        assert_eq!(meta.author, "R. Ito");
        assert_eq!(meta.summary, "A story of soot.");
        assert_eq!(meta.status, "Ongoing");
        assert_eq!(meta.cover, "https://example.com/covers/ash.jpg");
    }

    #[test]
    fn json_ld_fills_missing_fields() {
        let doc = dom::parse(concat!(
            r#"<script type="application/ld+json">"#,
            r#"{"@type":"Book","name":"Ash Garden","author":{"name":"R. Ito"}}"#,
            r#"</script>"#,
        ));
        let meta = extract_novel_metadata(&doc, URL);

        assert_eq!(meta.title, "Ash Garden");
        assert_eq!(meta.author, "R. Ito");
    }

    #[test]
    fn malformed_json_ld_is_ignored() {
        let doc = dom::parse(concat!(
            r#"<script type="application/ld+json">{not json at all</script>"#,
            r#"<h3 class="title">Fallback Title</h3>"#,
        ));
        let meta = extract_novel_metadata(&doc, URL);

        assert_eq!(meta.title, "Fallback Title");
    }

    #[test]
    fn landing_markup_is_last_resort() {
        let doc = dom::parse(concat!(
            r#"<h3 class="title">Markup Title</h3>"#,
            r#"<a href="/author/r-ito">R. Ito</a>"#,
            r#"<a href="/genre/fantasy">Fantasy</a>"#,
            r#"<a href="/genre/drama">Drama</a>"#,
            r#"<div class="desc-text">Summary here.</div>"#,
        ));
        let meta = extract_novel_metadata(&doc, URL);

        assert_eq!(meta.title, "Markup Title");
        assert_eq!(meta.author, "R. Ito");
        assert_eq!(meta.genre, "Fantasy, Drama");
        assert_eq!(meta.summary, "Summary here.");
    }

    #[test]
    fn meta_tags_win_over_markup() {
        let doc = dom::parse(concat!(
            r#"<meta property="og:title" content="Meta Title">"#,
            r#"<h3 class="title">Markup Title</h3>"#,
        ));
        let meta = extract_novel_metadata(&doc, URL);

        assert_eq!(meta.title, "Meta Title");
    }

    #[test]
    fn unknown_fields_stay_empty() {
        let doc = dom::parse("<p>nothing useful</p>");
        let meta = extract_novel_metadata(&doc, URL);

        assert_eq!(meta.title, "");
        assert_eq!(meta.author, "");
        assert_eq!(meta.cover, "");
        assert_eq!(meta.url, URL);
    }
}
