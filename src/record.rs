//! Data model for chapter retrieval output.
//!
//! These types cross the crate boundary: the resolver produces them, the
//! caller threads them through chapter fetching, and the pagination
//! assembler groups them. All of them serialize so callers can persist a
//! run manifest between steps.

use serde::{Deserialize, Serialize};

/// A reference to one chapter, as declared by the source site.
///
/// Identity is the URL. Ordering of references is the site's declared
/// reading order and must never be re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRef {
    /// Chapter name as it appears in the chapter list.
    pub name: String,

    /// Absolute, scheme-qualified chapter URL.
    pub url: String,
}

/// A chapter reference enriched with fetched page data.
///
/// `content` stays `None` until the chapter page is fetched and extracted;
/// once populated it is treated as immutable. A `title` extracted from the
/// chapter page takes precedence over the list-derived `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterRecord {
    /// Chapter name from the chapter list.
    pub name: String,

    /// Absolute chapter URL.
    pub url: String,

    /// Title extracted from the chapter page itself, if any.
    pub title: Option<String>,

    /// Sanitized chapter body HTML, once fetched.
    pub content: Option<String>,
}

impl ChapterRecord {
    /// The name to display for this chapter.
    ///
    /// A non-empty page-extracted title overrides the list-derived name.
    #[must_use]
    pub fn effective_name(&self) -> &str {
        match &self.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.name,
        }
    }
}

impl From<ChapterRef> for ChapterRecord {
    fn from(reference: ChapterRef) -> Self {
        Self {
            name: reference.name,
            url: reference.url,
            title: None,
            content: None,
        }
    }
}

/// Best-effort novel metadata from the landing page.
///
/// Empty string means unknown. Populated once; never mutated afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovelMetadata {
    /// Landing page URL.
    pub url: String,

    /// Novel title.
    pub title: String,

    /// Author name(s).
    pub author: String,

    /// Synopsis or description text.
    pub summary: String,

    /// Absolute cover image URL.
    pub cover: String,

    /// Publication status (e.g. "Ongoing", "Completed").
    pub status: String,

    /// Genre labels, comma separated.
    pub genre: String,
}

/// Resolver output: landing page metadata plus the ordered chapter list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Novel {
    /// Metadata extracted from the landing page.
    pub metadata: NovelMetadata,

    /// Chapters in site-declared reading order.
    pub chapters: Vec<ChapterRecord>,
}

/// Result of locating content on a single chapter page.
///
/// Both fields degrade to the empty string when the page carries no
/// recognizable title or body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Located {
    /// Chapter title taken from the winning content container.
    pub title: String,

    /// Sanitized chapter body HTML.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_from_ref_has_no_content() {
        let record = ChapterRecord::from(ChapterRef {
            name: "Chapter 1".to_string(),
            url: "https://example.com/novel/chapter-1".to_string(),
        });

        assert_eq!(record.name, "Chapter 1");
        assert!(record.title.is_none());
        assert!(record.content.is_none());
    }

    #[test]
    fn effective_name_prefers_page_title() {
        let mut record = ChapterRecord::from(ChapterRef {
            name: "c1".to_string(),
            url: "https://example.com/c1".to_string(),
        });
        assert_eq!(record.effective_name(), "c1");

        record.title = Some("Chapter 1: Dawn".to_string());
        assert_eq!(record.effective_name(), "Chapter 1: Dawn");
    }

    #[test]
    fn effective_name_ignores_blank_title() {
        let mut record = ChapterRecord::from(ChapterRef {
            name: "c1".to_string(),
            url: "https://example.com/c1".to_string(),
        });
        record.title = Some("   ".to_string());

        assert_eq!(record.effective_name(), "c1");
    }
}
