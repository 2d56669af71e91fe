//! HTML text to syntax tree
//!
//! Markup is parsed with html5ever, which follows the WHATWG parsing
//! algorithm, so malformed input (unclosed or misnested tags, broken
//! attributes) is repaired exactly the way a browser would repair it. The
//! resulting DOM is then converted into a [`Node`] tree ready for the
//! sanitizer. Attribute names become property names (`colspan` →
//! `colSpan`), the keys policies are written in.
//!
//! Scripting is disabled and no external entities are resolved; parsing is
//! synchronous and single-threaded.
//!
//! # Examples
//!
//! ```rust
//! use markup_sanitizer::parser::parse_fragment;
//! use markup_sanitizer::serializer::to_html;
//! use markup_sanitizer::sanitize;
//!
//! let tree = parse_fragment("<a href=\"javascript:alert(1)\" title=\"t\">hi</a>")
//!     .expect("shallow fragment");
//! assert_eq!(to_html(&sanitize(&tree)), "<a title=\"t\">hi</a>");
//! ```

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::charset::{decode_to_utf8, detect_charset};
use crate::error::SanitizeError;
use crate::node::{Element, Node, Other, Properties, PropertyValue, Root, Text};
use crate::property::property_name;

/// Maximum element nesting converted into a tree
///
/// Conversion and sanitizing both recurse per level, so deeper documents are
/// refused instead of risking the stack.
pub const MAX_NESTING_DEPTH: usize = 1000;

/// Parse a complete document from bytes of unknown encoding
///
/// Equivalent to [`parse_html_with_charset`] without a `Content-Type`.
pub fn parse_html(html: &[u8]) -> Result<Node, SanitizeError> {
    parse_html_with_charset(html, None)
}

/// Parse a complete document, decoding it with the detected charset
///
/// The result is a root holding the doctype (if any) and the `html` element.
///
/// # Errors
///
/// - `SanitizeError::InvalidInput` for empty input
/// - `SanitizeError::Encoding` when the bytes do not decode
/// - `SanitizeError::DepthExceeded` when nesting exceeds [`MAX_NESTING_DEPTH`]
pub fn parse_html_with_charset(
    html: &[u8],
    content_type: Option<&str>,
) -> Result<Node, SanitizeError> {
    if html.is_empty() {
        return Err(SanitizeError::InvalidInput("HTML input is empty".to_string()));
    }

    let charset = detect_charset(content_type, html);
    let text = decode_to_utf8(html, &charset)?;
    let dom = parse_document(RcDom::default(), Default::default()).one(text.as_ref());

    convert(&dom.document, 0)
}

/// Parse a fragment of body content, such as a user comment
///
/// The implied `html`, `head` and `body` wrappers are removed: the returned
/// root holds the parsed content directly.
pub fn parse_fragment(html: &str) -> Result<Node, SanitizeError> {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);

    let mut children = Vec::new();
    for top in dom.document.children.borrow().iter() {
        if element_name(top) != Some("html") {
            continue;
        }
        for section in top.children.borrow().iter() {
            if matches!(element_name(section), Some("head") | Some("body")) {
                for child in section.children.borrow().iter() {
                    children.push(convert(child, 1)?);
                }
            }
        }
    }

    Ok(Node::Root(Root::new(children)))
}

fn element_name(handle: &Handle) -> Option<&str> {
    match handle.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

fn convert(handle: &Handle, depth: usize) -> Result<Node, SanitizeError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(SanitizeError::DepthExceeded {
            depth,
            max: MAX_NESTING_DEPTH,
        });
    }

    let node = match handle.data {
        NodeData::Document => Node::Root(Root::new(convert_children(handle, depth)?)),
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let properties: Properties = attrs
                .borrow()
                .iter()
                .map(|attr| {
                    let key = match attr.name.prefix {
                        Some(ref prefix) => format!("{}:{}", prefix, attr.name.local),
                        None => property_name(&attr.name.local).into_owned(),
                    };
                    (key, PropertyValue::String(attr.value.to_string()))
                })
                .collect();
            Node::Element(Element {
                tag_name: name.local.to_string(),
                properties,
                children: convert_children(handle, depth)?,
                ..Element::default()
            })
        }
        NodeData::Text { ref contents } => Node::Text(Text::new(contents.borrow().to_string())),
        NodeData::Comment { ref contents } => Node::Other(Other::comment(contents.to_string())),
        NodeData::Doctype { ref name, .. } => {
            Node::Other(Other::new("doctype", Some(name.to_string())))
        }
        NodeData::ProcessingInstruction {
            ref target,
            ref contents,
        } => Node::Other(Other::new(
            "instruction",
            Some(format!("{} {}", target, contents)),
        )),
    };

    Ok(node)
}

fn convert_children(handle: &Handle, depth: usize) -> Result<Vec<Node>, SanitizeError> {
    handle
        .children
        .borrow()
        .iter()
        .map(|child| convert(child, depth + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn find_element<'a>(node: &'a Node, tag: &str) -> Option<&'a Element> {
        if let Node::Element(el) = node
            && el.tag_name == tag
        {
            return Some(el);
        }
        node.children().iter().find_map(|child| find_element(child, tag))
    }

    #[test]
    fn test_parse_document_structure() {
        let tree = parse_html(b"<!DOCTYPE html><html><body><h1>Hello</h1></body></html>").unwrap();
        let Node::Root(root) = &tree else {
            panic!("expected a root");
        };
        assert_eq!(root.children[0], Node::Other(Other::new("doctype", Some("html".into()))));
        let h1 = find_element(&tree, "h1").unwrap();
        assert_eq!(h1.children, vec![Node::from(Text::new("Hello"))]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(parse_html(b""), Err(SanitizeError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_invalid_utf8() {
        assert!(matches!(
            parse_html(b"\xFF\xFE<html><body>Invalid</body></html>"),
            Err(SanitizeError::Encoding(_))
        ));
    }

    #[test]
    fn test_parse_transcodes_declared_charset() {
        let tree = parse_html_with_charset(
            b"<html><body><p>Caf\xE9</p></body></html>",
            Some("text/html; charset=ISO-8859-1"),
        )
        .unwrap();
        assert!(tree.text_content().contains("Café"));

        let tree = parse_html(b"<html><head><meta charset=\"ISO-8859-1\"></head><body>Caf\xE9</body></html>")
            .unwrap();
        assert!(tree.text_content().contains("Café"));
    }

    #[test]
    fn test_attributes_become_string_properties() {
        let tree = parse_fragment("<a href=\"/x\" TITLE=\"t\">link</a>").unwrap();
        let a = find_element(&tree, "a").unwrap();
        assert_eq!(a.properties["href"], PropertyValue::from("/x"));
        assert_eq!(a.properties["title"], PropertyValue::from("t"));
    }

    #[test]
    fn test_attributes_are_keyed_by_property_name() {
        let tree = parse_fragment(
            "<table><tr><td colspan=\"2\" aria-label=\"x\" data-foo-bar=\"y\" class=\"c\">c</td></tr></table>",
        )
        .unwrap();
        let td = find_element(&tree, "td").unwrap();
        let keys: Vec<&str> = td.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, ["ariaLabel", "className", "colSpan", "dataFooBar"]);
    }

    #[test]
    fn test_namespaced_attributes_keep_their_prefix() {
        let tree = parse_fragment("<svg><a xlink:href=\"javascript:alert(1)\"></a></svg>").unwrap();
        let a = find_element(&tree, "a").unwrap();
        assert!(a.properties.contains_key("xlink:href"));
        assert!(!a.properties.contains_key("href"));
    }

    #[test]
    fn test_fragment_drops_implied_wrappers() {
        let tree = parse_fragment("<p>one</p>two<!--c-->").unwrap();
        let Node::Root(root) = &tree else {
            panic!("expected a root");
        };
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0].tag_name(), Some("p"));
        assert_eq!(root.children[1], Node::from(Text::new("two")));
        assert_eq!(root.children[2], Node::from(Other::comment("c")));
    }

    #[test]
    fn test_fragment_keeps_head_content() {
        let tree = parse_fragment("<style>p{}</style><p>x</p>").unwrap();
        assert_eq!(tree.children()[0].tag_name(), Some("style"));
        assert_eq!(tree.children()[1].tag_name(), Some("p"));
    }

    #[test]
    fn test_empty_fragment() {
        assert_eq!(parse_fragment("").unwrap(), Node::empty_root());
    }

    #[test]
    fn test_nesting_limit() {
        let html = "<div>".repeat(MAX_NESTING_DEPTH + 10);
        assert!(matches!(
            parse_fragment(&html),
            Err(SanitizeError::DepthExceeded { .. })
        ));
        let html = "<div>".repeat(100);
        assert!(parse_fragment(&html).is_ok());
    }

    proptest! {
        #[test]
        fn prop_malformed_html_parses(
            tag in prop::sample::select(vec!["div", "p", "span", "h1", "ul", "li", "table", "tr", "td"]),
            content in "[a-zA-Z0-9 ]{0,100}",
            close_tag in any::<bool>(),
            add_invalid_nesting in any::<bool>(),
        ) {
            let mut html = format!("<{}>{}", tag, content);
            if close_tag {
                html.push_str(&format!("</{}>", tag));
            }
            if add_invalid_nesting {
                html.push_str("<p><div>Invalid nesting</div></p>");
            }

            prop_assert!(parse_html(html.as_bytes()).is_ok(), "{}", html);
            prop_assert!(parse_fragment(&html).is_ok(), "{}", html);
        }

        #[test]
        fn prop_misnested_tags_keep_text(
            outer in prop::sample::select(vec!["b", "i", "strong", "em"]),
            inner in prop::sample::select(vec!["b", "i", "strong", "em"]),
            content in "[a-zA-Z0-9]{1,30}",
        ) {
            let html = format!("<{0}><{1}>{2}</{0}></{1}>", outer, inner, content);
            let tree = parse_fragment(&html).unwrap();
            prop_assert!(tree.text_content().contains(&content));
        }
    }
}
