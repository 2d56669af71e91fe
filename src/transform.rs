//! Sanitizing tree transform
//!
//! Walks a tree top-down and decides, per node, whether it is kept, dropped
//! or unwrapped:
//!
//! | Node | Outcome |
//! |------|---------|
//! | comment, doctype, raw, unknown | dropped |
//! | text with a non-string value | dropped |
//! | text directly inside a stripped element | dropped |
//! | text | kept (value, data, position) |
//! | root | kept, children cleaned |
//! | element in `strip` | dropped with its whole subtree |
//! | element without tag, not allowed, or out of context | unwrapped |
//! | element | kept, properties filtered, children cleaned |
//!
//! "Unwrapped" means the element's own tag and properties disappear while
//! its cleaned children take its place among its siblings. A node therefore
//! turns into zero, one or many replacement nodes, and parents are rebuilt
//! from the concatenated replacements of their children. The input tree is
//! never modified.
//!
//! The transform cannot fail. Malformed input degrades to "drop" or
//! "unwrap".

use crate::node::{Element, Node, Properties, Root, Text};
use crate::schema::Schema;
use crate::structure::is_structurally_valid;
use crate::value::sanitize_value;

/// Clean `node` given the tag names of its enclosing elements (nearest last)
///
/// # Examples
///
/// ```rust
/// use markup_sanitizer::node::{Element, Node, Text};
/// use markup_sanitizer::schema::Schema;
/// use markup_sanitizer::transform::clean;
///
/// // A list item outside a list is unwrapped into its text
/// let li: Node = Element::new("li").child(Text::new("x")).into();
/// assert_eq!(clean(&li, &[], Schema::github()), vec![Node::from(Text::new("x"))]);
///
/// // A script disappears entirely
/// let script: Node = Element::new("script").child(Text::new("alert(1)")).into();
/// assert!(clean(&script, &[], Schema::github()).is_empty());
/// ```
pub fn clean(node: &Node, ancestors: &[String], schema: &Schema) -> Vec<Node> {
    let mut stack = ancestors.to_vec();
    let mut out = Vec::new();
    clean_into(node, &mut stack, schema, &mut out);
    out
}

/// Append the replacements of `node` to `out`
///
/// `stack` is restored to its original contents before returning.
fn clean_into(node: &Node, stack: &mut Vec<String>, schema: &Schema, out: &mut Vec<Node>) {
    match node {
        Node::Other(other) => {
            tracing::trace!(kind = %other.kind, "dropping non-content node");
        }
        Node::Text(text) => {
            if let Some(text) = clean_text(text, stack, schema) {
                out.push(Node::Text(text));
            }
        }
        Node::Root(root) => {
            out.push(Node::Root(Root {
                children: clean_children(&root.children, stack, schema),
                data: root.data.clone(),
                position: root.position,
            }));
        }
        Node::Element(el) => clean_element(el, stack, schema, out),
    }
}

fn clean_text(text: &Text, stack: &[String], schema: &Schema) -> Option<Text> {
    let value = text.value.as_ref()?;
    if let Some(parent) = stack.last()
        && schema.is_stripped(parent)
    {
        return None;
    }
    Some(Text {
        value: Some(value.clone()),
        data: text.data.clone(),
        position: text.position,
    })
}

fn clean_element(el: &Element, stack: &mut Vec<String>, schema: &Schema, out: &mut Vec<Node>) {
    let tag = el.tag_name.as_str();

    if schema.is_stripped(tag) {
        tracing::trace!(tag, "stripping element and its content");
        return;
    }

    if !schema.allows_tag(tag) || !is_structurally_valid(tag, stack, schema) {
        tracing::trace!(tag, children = el.children.len(), "unwrapping element");
        for child in &el.children {
            clean_into(child, stack, schema, out);
        }
        return;
    }

    let properties = clean_properties(tag, &el.properties, schema);

    stack.push(el.tag_name.clone());
    let children = clean_children(&el.children, stack, schema);
    stack.pop();

    out.push(Node::Element(Element {
        tag_name: el.tag_name.clone(),
        properties,
        children,
        data: el.data.clone(),
        position: el.position,
    }));
}

fn clean_children(children: &[Node], stack: &mut Vec<String>, schema: &Schema) -> Vec<Node> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        clean_into(child, stack, schema, &mut out);
    }
    out
}

fn clean_properties(tag: &str, properties: &Properties, schema: &Schema) -> Properties {
    properties
        .iter()
        .filter(|(name, _)| {
            let allowed = schema.allows_attribute(tag, name);
            if !allowed {
                tracing::trace!(tag, attribute = %name, "dropping attribute");
            }
            allowed
        })
        .filter_map(|(name, value)| {
            sanitize_value(tag, name, value, schema).map(|value| (name.clone(), value))
        })
        .collect()
}
