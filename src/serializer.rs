//! Syntax tree to HTML text
//!
//! A small serializer for observing sanitized trees. Text and attribute
//! values are always escaped, including inside raw-text elements such as
//! `style`, so the output never contains markup the tree did not describe.
//!
//! Property names are written as HTML attribute names (`colSpan` as
//! `colspan`, `dataFoo` as `data-foo`). Property values render as follows: strings and numbers as-is, `true` as a
//! bare attribute, `false` and unsupported values not at all, lists joined
//! with spaces.

use crate::node::{Element, Node, PropertyValue};
use crate::property::attribute_name;

/// Elements that never have an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Serialize `node` as HTML
///
/// ```rust
/// use markup_sanitizer::node::{Element, Node, Text};
/// use markup_sanitizer::serializer::to_html;
///
/// let node: Node = Element::new("p")
///     .property("title", "a \"quote\"")
///     .child(Text::new("1 < 2"))
///     .into();
/// assert_eq!(to_html(&node), "<p title=\"a &#x22;quote&#x22;\">1 &#x3C; 2</p>");
/// ```
pub fn to_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Root(root) => {
            for child in &root.children {
                write_node(child, out);
            }
        }
        Node::Element(el) => write_element(el, out),
        Node::Text(text) => {
            if let Some(value) = &text.value {
                escape_into(value, false, out);
            }
        }
        Node::Other(other) => match (other.kind.as_str(), &other.value) {
            ("comment", Some(value)) => {
                out.push_str("<!--");
                // `--` cannot end a comment early once `>` is escaped.
                out.push_str(&value.replace('>', "&#x3E;"));
                out.push_str("-->");
            }
            ("doctype", _) => out.push_str("<!doctype html>"),
            _ => {}
        },
    }
}

fn write_element(el: &Element, out: &mut String) {
    if el.tag_name.is_empty() {
        for child in &el.children {
            write_node(child, out);
        }
        return;
    }

    out.push('<');
    out.push_str(&el.tag_name);
    for (property, value) in &el.properties {
        let name = attribute_name(property);
        if !is_valid_attribute_name(&name) {
            continue;
        }
        write_attribute(&name, value, out);
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&el.tag_name.as_str()) {
        return;
    }

    for child in &el.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&el.tag_name);
    out.push('>');
}

fn write_attribute(name: &str, value: &PropertyValue, out: &mut String) {
    let rendered = match value {
        PropertyValue::Boolean(true) => {
            out.push(' ');
            out.push_str(name);
            return;
        }
        PropertyValue::Boolean(false) | PropertyValue::Unsupported(_) => return,
        PropertyValue::String(s) => s.clone(),
        PropertyValue::Number(n) => n.to_string(),
        PropertyValue::List(items) => items
            .iter()
            .filter_map(|item| match item {
                PropertyValue::String(s) => Some(s.clone()),
                PropertyValue::Number(n) => Some(n.to_string()),
                PropertyValue::Boolean(b) => Some(b.to_string()),
                PropertyValue::List(_) | PropertyValue::Unsupported(_) => None,
            })
            .collect::<Vec<_>>()
            .join(" "),
    };

    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_into(&rendered, true, out);
    out.push('"');
}

fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '=' | '<')
        })
}

fn escape_into(value: &str, attribute: bool, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&#x26;"),
            '<' => out.push_str("&#x3C;"),
            '>' if !attribute => out.push_str("&#x3E;"),
            '"' if attribute => out.push_str("&#x22;"),
            _ => out.push(c),
        }
    }
}
