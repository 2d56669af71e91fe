//! Structural context checks
//!
//! Some elements only make sense inside a particular container: a list item
//! outside a list or a table cell outside a table is rejected. The container
//! may sit anywhere above the element, so `<ol><div><li>` is accepted.

use crate::schema::Schema;

/// Whether `tag` is permitted below `ancestors`
///
/// `ancestors` holds the tag names of the enclosing kept elements, nearest
/// last. Tags without an ancestor requirement are always valid.
///
/// # Examples
///
/// ```rust
/// use markup_sanitizer::schema::Schema;
/// use markup_sanitizer::structure::is_structurally_valid;
///
/// let schema = Schema::github();
/// assert!(!is_structurally_valid("li", &[], schema));
/// assert!(is_structurally_valid("li", &["ol".into(), "div".into()], schema));
/// assert!(is_structurally_valid("p", &[], schema));
/// ```
pub fn is_structurally_valid(tag: &str, ancestors: &[String], schema: &Schema) -> bool {
    match schema.required_ancestors(tag) {
        Some(required) => ancestors
            .iter()
            .any(|ancestor| required.contains(ancestor.as_str())),
        None => true,
    }
}
