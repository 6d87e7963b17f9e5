//! Chapter list resolution.
//!
//! A novel landing page declares its chapters in one of three ways across
//! the mirror family, tried here in strict order with the first success
//! winning:
//!
//! 1. **Embedded** - the chapters are right on the landing page, each in
//!    its own container; no further requests are needed at all.
//! 2. **Dynamic archive** - the page carries a site-internal novel
//!    identifier and the full list comes from a programmatic archive
//!    endpoint. Failure of that request is a strategy failure, never a
//!    pipeline abort.
//! 3. **Static scraping** - chapter links are scraped from the landing
//!    markup with selector patterns of decreasing specificity.
//!
//! Zero chapters after all three is a terminal condition: there is nothing
//! meaningful to paginate.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::dom::{self, Document, Selection};
use crate::encoding;
use crate::error::{Error, Result};
use crate::fetch::{Delay, Fetch};
use crate::locate;
use crate::metadata;
use crate::options::Options;
use crate::record::{ChapterRecord, ChapterRef, Novel};
use crate::sanitize::sanitize_fragment;
use crate::url_utils;

/// Resolve the chapter list from an already-fetched landing page.
///
/// `fetcher` and `delay` are only consulted if the dynamic archive
/// strategy runs; a page with embedded chapters makes no requests here.
/// Every returned chapter URL is absolute. Chapter order is the site's
/// declared reading order.
pub fn resolve_from_html(
    html: &str,
    novel_url: &str,
    fetcher: &dyn Fetch,
    delay: &dyn Delay,
    options: &Options,
) -> Result<Novel> {
    let doc = dom::parse(html);
    let metadata = metadata::extract_novel_metadata(&doc, novel_url);

    let chapters = embedded_chapters(&doc, novel_url, options)
        .or_else(|| archive_chapters(&doc, novel_url, fetcher, delay, options))
        .or_else(|| scraped_chapters(&doc, novel_url, options))
        .unwrap_or_default();

    if chapters.is_empty() {
        return Err(Error::NoChapters {
            url: novel_url.to_string(),
        });
    }

    Ok(Novel { metadata, chapters })
}

/// Strategy 1: chapters embedded directly in the landing page.
///
/// Each matching container is both the reference and the content source:
/// its heading becomes the title, its remaining markup is sanitized into
/// the content, and its element id becomes the URL fragment that keeps
/// chapter identity unique.
fn embedded_chapters(
    doc: &Document,
    novel_url: &str,
    options: &Options,
) -> Option<Vec<ChapterRecord>> {
    let mut records = Vec::new();

    for (index, node) in doc
        .select(options.embedded_chapter_pattern.as_str())
        .nodes()
        .iter()
        .enumerate()
    {
        let container = Selection::from(*node);
        let id = dom::id(&container).unwrap_or_default();

        let copy = dom::detach_copy(&container);
        let title = locate::take_heading(&copy);
        let inner = locate::container_inner(&copy);
        let content = sanitize_fragment(&inner, novel_url, options);

        let name = if title.is_empty() {
            format!("Chapter {}", index + 1)
        } else {
            title.clone()
        };
        let url = if id.is_empty() {
            format!("{novel_url}#chapter-{}", index + 1)
        } else {
            format!("{novel_url}#{id}")
        };

        records.push(ChapterRecord {
            name,
            url,
            title: if title.is_empty() { None } else { Some(title) },
            content: Some(content),
        });
    }

    if records.is_empty() {
        None
    } else {
        debug!(count = records.len(), "chapters embedded in landing page");
        Some(records)
    }
}

/// Strategy 2: the site's programmatic chapter archive.
///
/// Looks for the element carrying the site-internal novel identifier and
/// asks the archive endpoint for the ordered chapter list, marked as a
/// non-navigation request. Any failure here is logged and treated as
/// "strategy failed" so static scraping still gets its turn.
fn archive_chapters(
    doc: &Document,
    novel_url: &str,
    fetcher: &dyn Fetch,
    delay: &dyn Delay,
    options: &Options,
) -> Option<Vec<ChapterRecord>> {
    let selector = format!("[{}]", options.novel_id_attribute);
    let node = doc.select(selector.as_str()).nodes().first().copied()?;
    let novel_id = dom::get_attribute(&Selection::from(node), &options.novel_id_attribute)?;
    let novel_id = novel_id.trim().to_string();
    if novel_id.is_empty() {
        return None;
    }

    let root = url_utils::site_root(novel_url)?;
    let endpoint = format!("{root}{}", options.archive_endpoint.replace("{id}", &novel_id));

    delay.sleep(options.throttle);
    let body = match fetcher.fetch(&endpoint, &[("X-Requested-With", "XMLHttpRequest")]) {
        Ok(body) => body,
        Err(err) => {
            warn!(
                url = endpoint.as_str(),
                error = %err,
                "archive endpoint lookup failed; falling through to static scraping"
            );
            return None;
        }
    };

    let listing = dom::parse(&encoding::decode_to_utf8(&body));
    let mut records = Vec::new();

    for node in listing.select("ul a, ol a").nodes() {
        let link = Selection::from(*node);
        let Some(href) = dom::get_attribute(&link, "href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() {
            continue;
        }

        let url = url_utils::resolve(novel_url, href);
        let name = link_name(&link, records.len());
        records.push(ChapterRecord::from(ChapterRef { name, url }));
    }

    if records.is_empty() {
        debug!(url = endpoint.as_str(), "archive endpoint returned no chapters");
        None
    } else {
        debug!(count = records.len(), "chapters from archive endpoint");
        Some(records)
    }
}

/// Strategy 3: scrape chapter links straight out of the landing markup.
///
/// Patterns are tried in configured order, most specific first. Within a
/// pattern, links are deduplicated by absolute URL; the first pattern that
/// yields anything wins.
fn scraped_chapters(
    doc: &Document,
    novel_url: &str,
    options: &Options,
) -> Option<Vec<ChapterRecord>> {
    for pattern in &options.chapter_link_patterns {
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for node in doc.select(pattern.as_str()).nodes() {
            let link = Selection::from(*node);
            let Some(href) = dom::get_attribute(&link, "href") else {
                continue;
            };
            let href = href.trim();
            if href.is_empty() || href.starts_with('#') || url_utils::is_special_scheme(href) {
                continue;
            }

            let url = url_utils::resolve(novel_url, href);
            if !seen.insert(url.clone()) {
                continue;
            }

            let name = link_name(&link, records.len());
            records.push(ChapterRecord::from(ChapterRef { name, url }));
        }

        if !records.is_empty() {
            debug!(
                pattern = pattern.as_str(),
                count = records.len(),
                "chapters scraped from landing markup"
            );
            return Some(records);
        }
    }

    None
}

/// Name a chapter link: visible text, then title attribute, then a
/// positional placeholder.
fn link_name(link: &Selection, index: usize) -> String {
    let text = dom::text_content(link);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if !text.is_empty() {
        return text;
    }

    let title = dom::get_attribute(link, "title").unwrap_or_default();
    let title = title.trim();
    if !title.is_empty() {
        return title.to_string();
    }

    format!("Chapter {}", index + 1)
}
