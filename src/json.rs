//! JSON encoding of syntax trees
//!
//! Trees travel between tools as plain JSON objects discriminated by a
//! `type` field (`root`, `element`, `text`, anything else). Decoding is
//! total: any JSON value yields either a [`Node`] or `None` (for values that
//! are not node objects at all), and wrongly-typed fields decode into the
//! "absent" shapes of the model instead of failing.
//!
//! # Examples
//!
//! ```rust
//! use markup_sanitizer::node::Node;
//! use serde_json::json;
//!
//! let node = Node::from_json_value(&json!({
//!     "type": "element",
//!     "tagName": "p",
//!     "children": [{"type": "text", "value": "hi"}]
//! }))
//! .expect("element object");
//! assert_eq!(node.tag_name(), Some("p"));
//!
//! assert!(Node::from_json_value(&json!(true)).is_none());
//! ```

use serde::de::{Deserialize, Deserializer, Error as _};
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::node::{Data, Element, Node, Other, Position, Properties, PropertyValue, Root, Text};

impl Node {
    /// Decode a node from an arbitrary JSON value
    ///
    /// Returns `None` when `value` is not an object with a string `type`.
    pub fn from_json_value(value: &Value) -> Option<Node> {
        let object = value.as_object()?;
        let kind = object.get("type")?.as_str()?;

        let node = match kind {
            "root" => Node::Root(Root {
                children: decode_children(object.get("children")),
                data: decode_data(object.get("data")),
                position: decode_position(object.get("position")),
            }),
            "element" => Node::Element(Element {
                tag_name: object
                    .get("tagName")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                properties: decode_properties(object.get("properties")),
                children: decode_children(object.get("children")),
                data: decode_data(object.get("data")),
                position: decode_position(object.get("position")),
            }),
            "text" => Node::Text(Text {
                value: object
                    .get("value")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                data: decode_data(object.get("data")),
                position: decode_position(object.get("position")),
            }),
            other => Node::Other(Other {
                kind: other.to_string(),
                value: object
                    .get("value")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
        };

        Some(node)
    }

    /// Encode this node as JSON
    pub fn to_json_value(&self) -> Value {
        let mut object = Map::new();
        match self {
            Node::Root(root) => {
                object.insert("type".into(), "root".into());
                object.insert("children".into(), encode_children(&root.children));
                encode_passthrough(&mut object, root.data.as_ref(), root.position.as_ref());
            }
            Node::Element(el) => {
                object.insert("type".into(), "element".into());
                object.insert("tagName".into(), el.tag_name.clone().into());
                let properties = el
                    .properties
                    .iter()
                    .map(|(name, value)| (name.clone(), encode_property(value)))
                    .collect();
                object.insert("properties".into(), Value::Object(properties));
                object.insert("children".into(), encode_children(&el.children));
                encode_passthrough(&mut object, el.data.as_ref(), el.position.as_ref());
            }
            Node::Text(text) => {
                object.insert("type".into(), "text".into());
                if let Some(value) = &text.value {
                    object.insert("value".into(), value.clone().into());
                }
                encode_passthrough(&mut object, text.data.as_ref(), text.position.as_ref());
            }
            Node::Other(other) => {
                object.insert("type".into(), other.kind.clone().into());
                if let Some(value) = &other.value {
                    object.insert("value".into(), value.clone().into());
                }
            }
        }
        Value::Object(object)
    }
}

fn decode_children(value: Option<&Value>) -> Vec<Node> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| {
            Node::from_json_value(item).unwrap_or_else(|| Node::Other(Other::new("unknown", None)))
        })
        .collect()
}

fn decode_properties(value: Option<&Value>) -> Properties {
    let Some(Value::Object(map)) = value else {
        return Properties::new();
    };
    map.iter()
        .map(|(name, value)| (name.clone(), decode_property(value)))
        .collect()
}

fn decode_property(value: &Value) -> PropertyValue {
    match value {
        Value::Bool(b) => PropertyValue::Boolean(*b),
        Value::Number(n) => PropertyValue::Number(n.clone()),
        Value::String(s) => PropertyValue::String(s.clone()),
        Value::Array(items) => PropertyValue::List(items.iter().map(decode_property).collect()),
        Value::Null | Value::Object(_) => PropertyValue::Unsupported(value.clone()),
    }
}

fn decode_data(value: Option<&Value>) -> Option<Data> {
    match value {
        Some(Value::Object(map)) => Some(map.clone()),
        _ => None,
    }
}

fn decode_position(value: Option<&Value>) -> Option<Position> {
    value.and_then(|v| serde_json::from_value(v.clone()).ok())
}

fn encode_children(children: &[Node]) -> Value {
    Value::Array(children.iter().map(Node::to_json_value).collect())
}

fn encode_property(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Boolean(b) => Value::Bool(*b),
        PropertyValue::Number(n) => Value::Number(n.clone()),
        PropertyValue::String(s) => Value::String(s.clone()),
        PropertyValue::List(items) => Value::Array(items.iter().map(encode_property).collect()),
        PropertyValue::Unsupported(v) => v.clone(),
    }
}

fn encode_passthrough(object: &mut Map<String, Value>, data: Option<&Data>, position: Option<&Position>) {
    if let Some(data) = data {
        object.insert("data".into(), Value::Object(data.clone()));
    }
    if let Some(position) = position {
        // Position only holds integers, so encoding cannot fail.
        if let Ok(value) = serde_json::to_value(position) {
            object.insert("position".into(), value);
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Node::from_json_value(&value)
            .ok_or_else(|| D::Error::custom("expected an object with a string `type` field"))
    }
}
