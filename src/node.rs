//! Syntax tree model
//!
//! The tree is a closed set of node kinds. Every consumer matches on [`Node`]
//! exhaustively, so a new kind can never fall through to "kept" by accident.
//!
//! Values that arrive from untrusted sources may have the wrong shape: an
//! element without a tag name, a text node whose value is not a string, a
//! property that is `null` or an object. The model keeps those shapes
//! representable (empty `tag_name`, `Text::value == None`,
//! [`PropertyValue::Unsupported`]) so that the sanitizer, not the decoder,
//! decides what happens to them.
//!
//! # Examples
//!
//! ```rust
//! use markup_sanitizer::node::{Element, Node, Text};
//!
//! let link: Node = Element::new("a")
//!     .property("href", "#top")
//!     .child(Text::new("Back to top"))
//!     .into();
//!
//! assert_eq!(link.tag_name(), Some("a"));
//! assert_eq!(link.depth(), 2);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque passthrough data attached to a node
pub type Data = serde_json::Map<String, serde_json::Value>;

/// Element properties keyed by attribute name
pub type Properties = BTreeMap<String, PropertyValue>;

/// A node in the syntax tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Root(Root),
    Element(Element),
    Text(Text),
    /// Comments, doctypes, raw markup, processing instructions and any
    /// unrecognized node type
    Other(Other),
}

/// Document or fragment container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Root {
    pub children: Vec<Node>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

/// An element such as `<a href="..">`
///
/// An empty `tag_name` stands for a missing tag name. Such an element is
/// never valid output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag_name: String,
    pub properties: Properties,
    pub children: Vec<Node>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

/// A text run
///
/// `value` is `None` when the source carried something other than a string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub value: Option<String>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

/// Any node kind the sanitizer never keeps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Other {
    /// The node type, e.g. `comment`, `doctype`, `raw`
    pub kind: String,
    /// Textual content, if the node had any
    pub value: Option<String>,
}

/// Source span of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub start: Point,
    pub end: Point,
}

/// A place in the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub line: usize,
    pub column: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

/// Value of an element property
///
/// Only strings, numbers, booleans and lists of those are meaningful.
/// Everything else decodes as [`PropertyValue::Unsupported`] and is treated as
/// absent by the sanitizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<PropertyValue>),
    Unsupported(serde_json::Value),
}

impl PropertyValue {
    /// Whether this is a string, number or boolean
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            PropertyValue::Boolean(_) | PropertyValue::Number(_) | PropertyValue::String(_)
        )
    }

    /// The string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Number(value.into())
    }
}

impl From<f64> for PropertyValue {
    /// Non-finite numbers have no JSON representation and become unsupported.
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(n) => PropertyValue::Number(n),
            None => PropertyValue::Unsupported(serde_json::Value::Null),
        }
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(values: Vec<T>) -> Self {
        PropertyValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl Node {
    /// Tag name if this is an element with a non-empty name
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Node::Element(el) if !el.tag_name.is_empty() => Some(&el.tag_name),
            _ => None,
        }
    }

    /// Child nodes of roots and elements; empty for everything else
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Root(root) => &root.children,
            Node::Element(el) => &el.children,
            Node::Text(_) | Node::Other(_) => &[],
        }
    }

    /// Number of node levels in this tree, counting this node
    ///
    /// Iterative so that measuring an adversarially deep tree cannot itself
    /// overflow the stack.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, level)) = stack.pop() {
            max = max.max(level);
            for child in node.children() {
                stack.push((child, level + 1));
            }
        }
        max
    }

    /// Concatenated text of every text descendant
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Empty root
    pub fn empty_root() -> Node {
        Node::Root(Root::default())
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => {
            if let Some(value) = &text.value {
                out.push_str(value);
            }
        }
        Node::Root(_) | Node::Element(_) => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
        Node::Other(_) => {}
    }
}

impl Root {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::default()
        }
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn data(mut self, data: Data) -> Self {
        self.data = Some(data);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

impl Element {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    pub fn property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn data(mut self, data: Data) -> Self {
        self.data = Some(data);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn data(mut self, data: Data) -> Self {
        self.data = Some(data);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

impl Other {
    pub fn new(kind: impl Into<String>, value: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }

    pub fn comment(value: impl Into<String>) -> Self {
        Self::new("comment", Some(value.into()))
    }
}

impl Position {
    pub fn new(start: (usize, usize), end: (usize, usize)) -> Self {
        Self {
            start: Point {
                line: start.0,
                column: start.1,
                offset: None,
            },
            end: Point {
                line: end.0,
                column: end.1,
                offset: None,
            },
        }
    }
}

impl From<Root> for Node {
    fn from(root: Root) -> Self {
        Node::Root(root)
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl From<Other> for Node {
    fn from(other: Other) -> Self {
        Node::Other(other)
    }
}
