//! Character encoding detection for markup bytes
//!
//! Untrusted markup arrives as bytes. Before it can be parsed into a tree it
//! has to be decoded, using the first charset found in:
//!
//! 1. the `charset` parameter of a `Content-Type` value supplied by the caller;
//! 2. a `<meta charset>` or `<meta http-equiv="Content-Type">` tag near the
//!    start of the document;
//! 3. UTF-8.
//!
//! ```rust
//! use markup_sanitizer::charset::detect_charset;
//!
//! assert_eq!(detect_charset(Some("text/html; charset=iso-8859-1"), b""), "ISO-8859-1");
//! assert_eq!(detect_charset(None, b"<meta charset=\"utf-8\">"), "UTF-8");
//! assert_eq!(detect_charset(None, b"<p>plain</p>"), "UTF-8");
//! ```

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::SanitizeError;

/// Charset used when nothing else is declared
const DEFAULT_CHARSET: &str = "UTF-8";

/// Meta tags must appear within this many leading bytes
const META_SCAN_LIMIT: usize = 1024;

/// Detect the charset of `html`, normalized to uppercase
pub fn detect_charset(content_type: Option<&str>, html: &[u8]) -> String {
    content_type
        .and_then(extract_charset_from_content_type)
        .or_else(|| extract_charset_from_html(html))
        .map(|charset| charset.to_uppercase())
        .unwrap_or_else(|| DEFAULT_CHARSET.to_string())
}

/// `charset` parameter of a `Content-Type` value, quoted or not
pub fn extract_charset_from_content_type(content_type: &str) -> Option<String> {
    static CHARSET_PARAM: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = CHARSET_PARAM
        .get_or_init(|| Regex::new(r#"(?i)charset\s*=\s*"?([^";,\s]+)"?"#).ok())
        .as_ref()?;

    regex
        .captures(content_type)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Charset declared by a meta tag within the first [`META_SCAN_LIMIT`] bytes
pub fn extract_charset_from_html(html: &[u8]) -> Option<String> {
    let prefix = &html[..html.len().min(META_SCAN_LIMIT)];
    let text = String::from_utf8_lossy(prefix);

    static META_CHARSET: OnceLock<Option<Regex>> = OnceLock::new();
    static META_HTTP_EQUIV: OnceLock<Option<Regex>> = OnceLock::new();

    let patterns = [
        META_CHARSET.get_or_init(|| Regex::new(r#"(?i)<meta\s+charset\s*=\s*"?([^";>\s]+)"?"#).ok()),
        META_HTTP_EQUIV.get_or_init(|| {
            Regex::new(
                r#"(?i)<meta\s+http-equiv\s*=\s*"?Content-Type"?\s+content\s*=\s*"?[^">]*charset\s*=\s*([^";>\s]+)"?"#,
            )
            .ok()
        }),
    ];

    patterns.into_iter().flatten().find_map(|regex| {
        regex
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Decode `html` as `charset` into UTF-8 text
///
/// # Errors
///
/// Returns `SanitizeError::Encoding` when the charset is unknown or the bytes
/// are invalid for it. Invalid sequences are not replaced: a lossy decode
/// could turn an attribute value into something the scheme check never saw.
pub fn decode_to_utf8<'a>(html: &'a [u8], charset: &str) -> Result<Cow<'a, str>, SanitizeError> {
    if charset.eq_ignore_ascii_case(DEFAULT_CHARSET) {
        return std::str::from_utf8(html).map(Cow::Borrowed).map_err(|e| {
            SanitizeError::Encoding(format!(
                "Invalid UTF-8 at byte position {}: {}",
                e.valid_up_to(),
                e
            ))
        });
    }

    let encoding = encoding_rs::Encoding::for_label(charset.as_bytes()).ok_or_else(|| {
        SanitizeError::Encoding(format!("Unsupported charset '{}'", charset))
    })?;

    encoding
        .decode_without_bom_handling_and_without_replacement(html)
        .ok_or_else(|| {
            SanitizeError::Encoding(format!("Invalid byte sequence for charset '{}'", charset))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_content_type_variants() {
        for header in [
            "text/html; charset=UTF-8",
            "text/html; charset=\"UTF-8\"",
            "text/html;charset=UTF-8",
            "text/html; charset=UTF-8; boundary=something",
            "TEXT/HTML; CHARSET=UTF-8",
        ] {
            assert_eq!(
                extract_charset_from_content_type(header),
                Some("UTF-8".to_string()),
                "{header}"
            );
        }
        assert_eq!(extract_charset_from_content_type("text/html"), None);
    }

    #[test]
    fn test_meta_tags() {
        assert_eq!(
            extract_charset_from_html(b"<html><head><meta charset=\"windows-1252\"></head>"),
            Some("windows-1252".to_string())
        );
        assert_eq!(
            extract_charset_from_html(
                b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=ISO-8859-1\">"
            ),
            Some("ISO-8859-1".to_string())
        );
        assert_eq!(extract_charset_from_html(b"<p>none</p>"), None);
    }

    #[test]
    fn test_meta_tag_beyond_scan_limit_is_ignored() {
        let mut html = vec![b' '; META_SCAN_LIMIT];
        html.extend_from_slice(b"<meta charset=\"ISO-8859-1\">");
        assert_eq!(extract_charset_from_html(&html), None);
    }

    #[test]
    fn test_content_type_beats_meta() {
        let html = b"<meta charset=\"ISO-8859-1\">";
        assert_eq!(detect_charset(Some("text/html; charset=utf-8"), html), "UTF-8");
        assert_eq!(detect_charset(Some("text/html"), html), "ISO-8859-1");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode_to_utf8(b"Caf\xE9", "ISO-8859-1").unwrap(), "Café");
        assert_eq!(decode_to_utf8(b"\x80", "WINDOWS-1252").unwrap(), "€");
        assert!(matches!(
            decode_to_utf8(b"\xFF\xFE", "UTF-8"),
            Err(SanitizeError::Encoding(_))
        ));
        assert!(matches!(
            decode_to_utf8(b"abc", "x-unknown-test"),
            Err(SanitizeError::Encoding(message)) if message.contains("Unsupported charset")
        ));
    }

    proptest! {
        #[test]
        fn prop_detection_never_panics(
            content_type in prop::option::of("[ -~]{0,40}"),
            html in prop::collection::vec(any::<u8>(), 0..2048),
        ) {
            let charset = detect_charset(content_type.as_deref(), &html);
            prop_assert!(!charset.is_empty());
        }
    }
}
