//! URL utilities for link resolution.
//!
//! Scraped markup carries links in every form the mirrors feel like
//! emitting: absolute, scheme-relative, root-relative, and
//! directory-relative with `./`/`../` segments. Everything that leaves this
//! crate is absolute, and this module is the single place that conversion
//! happens.

use url::Url;

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) => {
            if url.host().is_some() {
                (true, Some(url))
            } else {
                (false, None)
            }
        }
        Err(_) => (false, None),
    }
}

/// Check for non-navigable URL schemes that must pass through unchanged.
#[must_use]
pub fn is_special_scheme(link: &str) -> bool {
    link.starts_with("data:")
        || link.starts_with("javascript:")
        || link.starts_with("mailto:")
        || link.starts_with("tel:")
}

/// Resolve a link found on a page against that page's own URL.
///
/// Resolution rules, in order: an already-absolute link returns unchanged;
/// a scheme-relative `//host/...` link takes the base's scheme; a
/// root-relative `/path` combines with the base's scheme, host and port;
/// anything else resolves against the base's directory with `./` and `../`
/// segments collapsed. A malformed base returns the link unchanged rather
/// than erroring.
///
/// Resolving an already-resolved URL a second time is a no-op.
///
/// # Examples
///
/// ```rust
/// use chaptermill::url_utils::resolve;
///
/// assert_eq!(resolve("https://x.com/a/b/c", "../d"), "https://x.com/a/d");
/// assert_eq!(resolve("https://x.com/a", "/z"), "https://x.com/z");
/// assert_eq!(resolve("https://x.com", "//y.com/p"), "https://y.com/p");
/// ```
#[must_use]
pub fn resolve(base: &str, link: &str) -> String {
    let link = link.trim();

    if link.is_empty() {
        return String::new();
    }

    if is_special_scheme(link) {
        return link.to_string();
    }

    let (is_abs, _) = is_absolute_url(link);
    if is_abs {
        return link.to_string();
    }

    match Url::parse(base) {
        Ok(base_url) => base_url
            .join(link)
            .map_or_else(|_| link.to_string(), |resolved| resolved.to_string()),
        Err(_) => link.to_string(),
    }
}

/// Get the site root (scheme + host + optional port) of a URL.
///
/// Used to build site-internal endpoint URLs. Returns `None` for anything
/// that is not an absolute http(s) URL.
#[must_use]
pub fn site_root(url_str: &str) -> Option<String> {
    let (is_abs, parsed) = is_absolute_url(url_str);
    if !is_abs {
        return None;
    }

    let url = parsed?;
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{}://{}:{}", url.scheme(), host, port)),
        None => Some(format!("{}://{}", url.scheme(), host)),
    }
}
