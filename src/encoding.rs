//! Character encoding detection and transcoding.
//!
//! Fetched pages arrive as raw bytes in whatever encoding the mirror
//! happens to serve. Everything downstream of the fetch operates on UTF-8,
//! so the bytes are transcoded exactly once, before parsing: the charset is
//! sniffed from meta tags and the payload decoded lossily (invalid
//! sequences become the Unicode replacement character rather than errors).

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Detect the character encoding declared in HTML bytes.
///
/// Checks `<meta charset>` first, then the `http-equiv` Content-Type form.
/// Only the first 1024 bytes are examined. Defaults to UTF-8 when no
/// declaration is found or the declared label is unknown.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    if let Some(charset) = capture_first(&CHARSET_META_RE, &head_str) {
        if let Some(encoding) = Encoding::for_label(charset.as_bytes()) {
            return encoding;
        }
    }

    if let Some(charset) = capture_first(&CONTENT_TYPE_CHARSET_RE, &head_str) {
        if let Some(encoding) = Encoding::for_label(charset.as_bytes()) {
            return encoding;
        }
    }

    UTF_8
}

fn capture_first(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Decode HTML bytes to a UTF-8 string.
///
/// Every parse in this crate goes through a `&str`, so running fetched
/// bytes through this function forces the document to UTF-8 regardless of
/// declared or absent encoding metadata. Decoding is lossy; it never fails.
#[must_use]
pub fn decode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }

    let (decoded, _encoding_used, _had_errors) = encoding.decode(html);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_utf8_from_meta_charset() {
        let html = br#"<html><head><meta charset="utf-8"></head><body>Test</body></html>"#;
        assert_eq!(detect_encoding(html), UTF_8);
    }

    #[test]
    fn detect_latin1_from_meta_charset() {
        let html = br#"<html><head><meta charset="ISO-8859-1"></head><body>Test</body></html>"#;
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn detect_from_http_equiv() {
        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=gbk">"#;
        assert_eq!(detect_encoding(html).name(), "GBK");
    }

    #[test]
    fn default_is_utf8_without_declaration() {
        let html = b"<html><body>nothing declared</body></html>";
        assert_eq!(detect_encoding(html), UTF_8);
    }

    #[test]
    fn unknown_label_falls_back_to_utf8() {
        let html = br#"<meta charset="not-a-real-charset">"#;
        assert_eq!(detect_encoding(html), UTF_8);
    }

    #[test]
    fn decode_latin1_accents() {
        let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>Caf\xE9</body></html>";
        let decoded = decode_to_utf8(html);
        assert!(decoded.contains("Caf\u{e9}"));
    }

    #[test]
    fn decode_invalid_utf8_is_lossy_not_fatal() {
        let html = b"<html><body>ok \xFF\xFE bad</body></html>";
        let decoded = decode_to_utf8(html);
        assert!(decoded.contains("ok"));
        assert!(decoded.contains('\u{fffd}'));
    }
}
