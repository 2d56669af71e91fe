//! HTML attribute names and tree property names
//!
//! Trees key element properties by their DOM-style property name
//! (`className`, `colSpan`, `ariaLabel`, `dataFooBar`), which is also what
//! policies and JSON trees use. Markup uses attribute names (`class`,
//! `colspan`, `aria-label`, `data-foo-bar`). The parser maps attribute names
//! to property names and the serializer maps them back.
//!
//! ```rust
//! use markup_sanitizer::property::{attribute_name, property_name};
//!
//! assert_eq!(property_name("longdesc"), "longDesc");
//! assert_eq!(property_name("data-foo-bar"), "dataFooBar");
//! assert_eq!(attribute_name("ariaLabel"), "aria-label");
//! assert_eq!(attribute_name("title"), "title");
//! ```

use std::borrow::Cow;

/// Attribute / property pairs that do not follow the `-x` → `X` rule
const RENAMED: &[(&str, &str)] = &[
    ("accept-charset", "acceptCharset"),
    ("accesskey", "accessKey"),
    ("aria-describedby", "ariaDescribedBy"),
    ("aria-labelledby", "ariaLabelledBy"),
    ("cellpadding", "cellPadding"),
    ("cellspacing", "cellSpacing"),
    ("charoff", "charOff"),
    ("charset", "charSet"),
    ("class", "className"),
    ("colspan", "colSpan"),
    ("datetime", "dateTime"),
    ("enctype", "encType"),
    ("for", "htmlFor"),
    ("hreflang", "hrefLang"),
    ("hspace", "hSpace"),
    ("http-equiv", "httpEquiv"),
    ("ismap", "isMap"),
    ("itemprop", "itemProp"),
    ("itemscope", "itemScope"),
    ("itemtype", "itemType"),
    ("longdesc", "longDesc"),
    ("maxlength", "maxLength"),
    ("nohref", "noHref"),
    ("noshade", "noShade"),
    ("nowrap", "noWrap"),
    ("readonly", "readOnly"),
    ("rowspan", "rowSpan"),
    ("tabindex", "tabIndex"),
    ("usemap", "useMap"),
    ("valign", "vAlign"),
    ("vspace", "vSpace"),
];

/// Prefixes whose remaining dashes turn into capitals
const DASHED_PREFIXES: &[&str] = &["data-", "aria-"];

/// Property name for the HTML attribute `attribute`
///
/// Names without a known mapping (`href`, `title`, `xlink:href`) are returned
/// unchanged.
pub fn property_name(attribute: &str) -> Cow<'_, str> {
    if let Some((_, property)) = RENAMED.iter().find(|(a, _)| *a == attribute) {
        return Cow::Borrowed(*property);
    }
    if DASHED_PREFIXES.iter().any(|prefix| attribute.starts_with(prefix)) {
        return Cow::Owned(camel_case(attribute));
    }
    Cow::Borrowed(attribute)
}

/// HTML attribute name for the property `property`
pub fn attribute_name(property: &str) -> Cow<'_, str> {
    if let Some((attribute, _)) = RENAMED.iter().find(|(_, p)| *p == property) {
        return Cow::Borrowed(*attribute);
    }
    let camel_cased = ["data", "aria"].iter().any(|prefix| {
        property.starts_with(prefix)
            && property[prefix.len()..].starts_with(|c: char| c.is_ascii_uppercase())
    });
    if camel_cased {
        return Cow::Owned(kebab_case(property));
    }
    Cow::Borrowed(property)
}

/// `data-foo-bar` → `dataFooBar`; a dash not followed by `a-z` is kept
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == '-' && next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// `dataFooBar` → `data-foo-bar`
fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renamed_attributes() {
        assert_eq!(property_name("accept-charset"), "acceptCharset");
        assert_eq!(property_name("colspan"), "colSpan");
        assert_eq!(property_name("class"), "className");
        assert_eq!(property_name("for"), "htmlFor");
        assert_eq!(property_name("aria-describedby"), "ariaDescribedBy");
    }

    #[test]
    fn test_dashed_attributes() {
        assert_eq!(property_name("aria-hidden"), "ariaHidden");
        assert_eq!(property_name("data-foo"), "dataFoo");
        assert_eq!(property_name("data-foo-bar"), "dataFooBar");
        assert_eq!(property_name("data-1"), "data-1");
    }

    #[test]
    fn test_plain_attributes_are_unchanged() {
        for name in ["href", "title", "id", "xlink:href", "onclick"] {
            assert!(matches!(property_name(name), Cow::Borrowed(n) if n == name));
            assert_eq!(attribute_name(name), name);
        }
    }

    #[test]
    fn test_attribute_names() {
        assert_eq!(attribute_name("longDesc"), "longdesc");
        assert_eq!(attribute_name("ariaLabel"), "aria-label");
        assert_eq!(attribute_name("ariaLabelledBy"), "aria-labelledby");
        assert_eq!(attribute_name("dataFooBar"), "data-foo-bar");
        assert_eq!(attribute_name("data-foo"), "data-foo");
        assert_eq!(attribute_name("database"), "database");
    }

    #[test]
    fn test_renamed_pairs_map_both_ways() {
        for (attribute, property) in RENAMED {
            assert_eq!(property_name(attribute), *property);
            assert_eq!(attribute_name(property), *attribute);
        }
    }
}
