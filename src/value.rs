//! Attribute value sanitizing
//!
//! Each surviving attribute value goes through three steps:
//!
//! 1. **Coercion**: only strings, numbers, booleans and lists of those are
//!    kept. Lists lose their non-primitive entries but keep their order, and
//!    an emptied list is still a list.
//! 2. **Scheme check**: for attributes listed in the schema's protocols, a
//!    string whose scheme is not permitted is rejected.
//! 3. **Clobber prefixing**: values of `id`-like attributes get the
//!    configured prefix so they cannot shadow names scripts rely on.
//!
//! # Scheme detection
//!
//! After skipping leading ASCII whitespace and U+2028/U+2029, the value is
//! scanned for the first of `:`, `/`, `?` and `#`. Only when that character
//! is `:` does the value have a scheme. This keeps `example.com?foo:bar`
//! (a relative reference) while rejecting `javascript:alert(1)`.

use crate::node::PropertyValue;
use crate::schema::Schema;

/// Characters that end a scheme candidate
const SCHEME_DELIMITERS: &[char] = &[':', '/', '?', '#'];

/// Sanitize the value of `attribute` on an element named `tag`
///
/// Returns `None` when the value must be dropped.
///
/// # Examples
///
/// ```rust
/// use markup_sanitizer::node::PropertyValue;
/// use markup_sanitizer::schema::Schema;
/// use markup_sanitizer::value::sanitize_value;
///
/// let schema = Schema::github();
/// let js = PropertyValue::from("javascript:alert(1)");
/// assert_eq!(sanitize_value("a", "href", &js, schema), None);
///
/// let id = PropertyValue::from("main");
/// assert_eq!(
///     sanitize_value("div", "id", &id, schema),
///     Some(PropertyValue::from("user-content-main"))
/// );
/// ```
pub fn sanitize_value(
    tag: &str,
    attribute: &str,
    raw: &PropertyValue,
    schema: &Schema,
) -> Option<PropertyValue> {
    match raw {
        PropertyValue::Unsupported(_) => None,
        PropertyValue::List(items) => {
            let kept = items
                .iter()
                .filter(|item| item.is_primitive())
                .filter_map(|item| sanitize_primitive(tag, attribute, item, schema))
                .collect();
            Some(PropertyValue::List(kept))
        }
        PropertyValue::Boolean(_) | PropertyValue::Number(_) | PropertyValue::String(_) => {
            sanitize_primitive(tag, attribute, raw, schema)
        }
    }
}

fn sanitize_primitive(
    tag: &str,
    attribute: &str,
    value: &PropertyValue,
    schema: &Schema,
) -> Option<PropertyValue> {
    let PropertyValue::String(text) = value else {
        return Some(value.clone());
    };

    if !is_safe_url(attribute, text, schema) {
        tracing::trace!(tag, attribute, value = %text, "dropping value with disallowed scheme");
        return None;
    }

    // Every element is eligible for clobber protection.
    let prefix = schema.clobber_prefix();
    if schema.is_clobbered(attribute) && !text.starts_with(prefix) {
        return Some(PropertyValue::String(format!("{prefix}{text}")));
    }

    Some(value.clone())
}

/// Whether `url` may be the value of `attribute`
///
/// Attributes without a protocol list are not URL-valued and always pass.
/// Values without a scheme (relative, query and fragment references) always
/// pass.
pub fn is_safe_url(attribute: &str, url: &str, schema: &Schema) -> bool {
    let Some(allowed) = schema.protocols_for(attribute) else {
        return true;
    };

    match scheme_of(url) {
        Some(scheme) => allowed
            .iter()
            .any(|protocol| protocol.eq_ignore_ascii_case(scheme)),
        None => true,
    }
}

/// Extract the scheme of `url`, if it has one
///
/// ```rust
/// use markup_sanitizer::value::scheme_of;
///
/// assert_eq!(scheme_of("https://example.com"), Some("https"));
/// assert_eq!(scheme_of("\u{2028}javascript:alert(1)"), Some("javascript"));
/// assert_eq!(scheme_of("example.com?foo:bar"), None);
/// assert_eq!(scheme_of("www.example.com"), None);
/// ```
pub fn scheme_of(url: &str) -> Option<&str> {
    let trimmed = url.trim_start_matches(is_leading_junk);
    let index = trimmed.find(SCHEME_DELIMITERS)?;
    if trimmed[index..].starts_with(':') {
        Some(&trimmed[..index])
    } else {
        None
    }
}

fn is_leading_junk(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\u{2028}' || c == '\u{2029}'
}
