//! Configuration options for retrieval and extraction.
//!
//! The `Options` struct collects every tunable in one place: request
//! pacing, the scrub rule tables, the candidate selector lists, and the
//! attribute allow-list. All fields are public; use `Options::default()`
//! for the settings tuned against the supported mirror family.

use std::time::Duration;

use crate::rules::{self, ScrubRule};

/// Configuration options for retrieval and extraction.
///
/// # Example
///
/// ```rust
/// use chaptermill::Options;
/// use std::time::Duration;
///
/// let options = Options {
///     throttle: Duration::from_secs(2),
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Mandatory delay before every outbound request.
    ///
    /// This is a rate-limiting contract toward the source site, not a
    /// performance knob. Default: 1 second.
    pub throttle: Duration,

    /// Overall per-request timeout. Default: 30 seconds.
    pub request_timeout: Duration,

    /// Connection timeout; kept shorter than `request_timeout` so a dead
    /// host fails fast. Default: 10 seconds.
    pub connect_timeout: Duration,

    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// Noise floor for content candidates: a candidate whose trimmed text
    /// is not longer than this many characters is never accepted.
    /// Default: 100.
    pub min_candidate_text_len: usize,

    /// Ordered candidate selector patterns for chapter body containers.
    ///
    /// Specific chapter-body id/class patterns first, generic
    /// `article`/`main` tags last as a safety net. The first pattern that
    /// yields a scoring candidate wins.
    pub content_patterns: Vec<String>,

    /// Ordered link-selector patterns for static chapter list scraping,
    /// decreasing in specificity.
    pub chapter_link_patterns: Vec<String>,

    /// Selector matching embedded chapter containers on a landing page.
    pub embedded_chapter_pattern: String,

    /// Attribute carrying the site-internal novel identifier.
    pub novel_id_attribute: String,

    /// Site-relative archive endpoint template; `{id}` is replaced with
    /// the novel identifier.
    pub archive_endpoint: String,

    /// Boilerplate deny-list applied by the fragment sanitizer.
    pub boilerplate_rules: Vec<ScrubRule>,

    /// Non-content strip table applied to candidates before scoring.
    pub non_content_rules: Vec<ScrubRule>,

    /// Attributes preserved by the sanitizer; everything else is dropped.
    pub allowed_attributes: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            throttle: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!(
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 ",
                "(KHTML, like Gecko) Chrome/120.0 Safari/537.36"
            )
            .to_string(),
            min_candidate_text_len: 100,
            content_patterns: [
                "#chapter-content",
                ".chapter-content",
                "#chr-content",
                ".chr-c",
                "#chapter-body",
                ".chapter-body",
                ".reading-content",
                ".entry-content",
                "article",
                "main",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            chapter_link_patterns: [
                "ul.list-chapter a",
                "#chapter-list a, .chapter-list a",
                r#"a[href*="/chapter"]"#,
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            embedded_chapter_pattern: r#"div[class*="chapter"][id^="chapter-"]"#.to_string(),
            novel_id_attribute: "data-novel-id".to_string(),
            archive_endpoint: "/ajax/chapter-archive?novelId={id}".to_string(),
            boilerplate_rules: rules::boilerplate_rules(),
            non_content_rules: rules::non_content_rules(),
            allowed_attributes: ["href", "src", "alt", "title"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}
