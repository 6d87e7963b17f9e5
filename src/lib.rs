//! # chaptermill
//!
//! Chapter retrieval and content extraction core for a family of webnovel
//! mirror sites.
//!
//! The crate resolves a novel's chapter list from its landing page,
//! extracts and cleans chapter bodies from inconsistently structured
//! mirror markup, and groups the result into fixed-size runs for paginated
//! output. Transport is reached through a narrow collaborator trait and
//! every outbound request is throttled; CLI, templating and file placement
//! live outside this crate.
//!
//! ## Quick Start
//!
//! ```rust
//! use chaptermill::{locate_content, Options};
//!
//! let html = r#"<html><body><div class="chapter-content">
//!     <h3>Chapter 1: The Road</h3>
//!     <p>The road goes ever on and on, down from the door where it began.
//!     Now far ahead the road has gone, and I must follow if I can.</p>
//! </div></body></html>"#;
//!
//! let located = locate_content(html, "https://example.com/n/c-1", &Options::default());
//! assert_eq!(located.title, "Chapter 1: The Road");
//! assert!(located.content.contains("ever on and on"));
//! ```
//!
//! ## Fetching a novel
//!
//! ```rust,no_run
//! use chaptermill::{paginate, Options, Session};
//!
//! let session = Session::new(Options::default())?;
//! let novel = session.resolve_chapter_list("https://example.com/novel/ash-garden")?;
//!
//! let mut chapters = novel.chapters;
//! for chapter in &mut chapters {
//!     if chapter.content.is_none() {
//!         let located = session.fetch_and_extract_chapter(&chapter.url)?;
//!         if !located.title.is_empty() {
//!             chapter.title = Some(located.title);
//!         }
//!         chapter.content = Some(located.content);
//!     }
//! }
//!
//! let groups = paginate(&chapters, 100, 1)?;
//! # Ok::<(), chaptermill::Error>(())
//! ```

mod error;
mod options;
mod record;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// URL utilities for link resolution.
pub mod url_utils;

/// Scrub rule tables for boilerplate detection.
pub mod rules;

/// Fragment sanitizer.
pub mod sanitize;

/// Content locator for chapter pages.
pub mod locate;

/// Novel metadata extraction.
pub mod metadata;

/// Chapter list resolution strategies.
pub mod chapters;

/// Pagination assembler.
pub mod paginate;

/// Transport and pacing collaborators.
pub mod fetch;

// Public API - re-exports
pub use error::{Error, Result};
pub use fetch::{Delay, Fetch, HttpFetcher, ThreadDelay};
pub use locate::locate_content;
pub use options::Options;
pub use paginate::{paginate, Group};
pub use record::{ChapterRecord, ChapterRef, Located, Novel, NovelMetadata};
pub use sanitize::sanitize_fragment;

use tracing::info;

/// A retrieval session against one source site.
///
/// Owns the transport and pacing collaborators plus the extraction
/// options. Operations are strictly sequential; every outbound request is
/// preceded by the configured throttle delay.
pub struct Session {
    fetcher: Box<dyn Fetch>,
    delay: Box<dyn Delay>,
    options: Options,
}

impl Session {
    /// Create a session with the production HTTP fetcher and thread sleep.
    pub fn new(options: Options) -> Result<Self> {
        let fetcher = HttpFetcher::new(&options)?;
        Ok(Self {
            fetcher: Box::new(fetcher),
            delay: Box::new(ThreadDelay),
            options,
        })
    }

    /// Create a session with caller-supplied collaborators.
    ///
    /// This is the seam tests use to substitute counting mocks for the
    /// network and the clock.
    #[must_use]
    pub fn with_collaborators(
        fetcher: Box<dyn Fetch>,
        delay: Box<dyn Delay>,
        options: Options,
    ) -> Self {
        Self {
            fetcher,
            delay,
            options,
        }
    }

    /// The options this session was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Fetch a novel landing page and resolve its chapter list.
    ///
    /// Returns the landing page metadata and the ordered chapter
    /// references. No chapter content is fetched here (except for
    /// chapters embedded directly in the landing page, which arrive
    /// already populated).
    pub fn resolve_chapter_list(&self, novel_url: &str) -> Result<Novel> {
        info!(url = novel_url, "resolving chapter list");

        self.delay.sleep(self.options.throttle);
        let body = self.fetcher.fetch(novel_url, &[])?;
        let html = encoding::decode_to_utf8(&body);

        chapters::resolve_from_html(
            &html,
            novel_url,
            self.fetcher.as_ref(),
            self.delay.as_ref(),
            &self.options,
        )
    }

    /// Fetch one chapter page and extract its title and body.
    ///
    /// Transport failures surface as errors; a page with no recognizable
    /// title or content yields empty strings instead.
    pub fn fetch_and_extract_chapter(&self, chapter_url: &str) -> Result<Located> {
        info!(url = chapter_url, "fetching chapter");

        self.delay.sleep(self.options.throttle);
        let body = self.fetcher.fetch(chapter_url, &[])?;
        let html = encoding::decode_to_utf8(&body);

        Ok(locate_content(&html, chapter_url, &self.options))
    }
}
