//! Public sanitizing entry points
//!
//! The transform turns one node into zero or more nodes. Callers, however,
//! expect exactly one node back, of minimal shape:
//!
//! - a root input always yields that root, cleaned;
//! - nothing left over yields an empty root;
//! - a single surviving node is returned bare;
//! - several surviving nodes are wrapped in a fresh root.
//!
//! # Examples
//!
//! ```rust
//! use markup_sanitizer::node::{Element, Node, Text};
//! use markup_sanitizer::sanitize;
//!
//! let dirty: Node = Element::new("div")
//!     .property("id", "getElementById")
//!     .child(Element::new("script").child(Text::new("alert(1)")))
//!     .into();
//!
//! let clean = sanitize(&dirty);
//! let expected: Node = Element::new("div")
//!     .property("id", "user-content-getElementById")
//!     .into();
//! assert_eq!(clean, expected);
//! ```

use serde_json::Value;

use crate::error::SanitizeError;
use crate::node::{Node, Root};
use crate::schema::Schema;
use crate::transform::clean;

/// Sanitize `node` with the default policy
pub fn sanitize(node: &Node) -> Node {
    sanitize_with(node, Schema::github())
}

/// Sanitize `node` with a caller-supplied policy
pub fn sanitize_with(node: &Node, schema: &Schema) -> Node {
    let replacements = clean(node, &[], schema);
    let result = normalize(replacements);
    tracing::debug!(
        input_depth = node.depth(),
        output_children = result.children().len(),
        "sanitized tree"
    );
    result
}

/// Sanitize an untyped JSON tree
///
/// Anything that is not a node object (booleans, numbers, `null`, arrays,
/// objects without a `type`) yields an empty root.
pub fn sanitize_json(value: &Value, schema: &Schema) -> Node {
    match Node::from_json_value(value) {
        Some(node) => sanitize_with(&node, schema),
        None => {
            tracing::debug!("input is not a node, returning an empty root");
            Node::empty_root()
        }
    }
}

/// Collapse the transform's replacements into a single node
///
/// A root input always comes back as exactly one root, so it takes the
/// single-node path.
fn normalize(mut replacements: Vec<Node>) -> Node {
    match replacements.len() {
        0 => Node::empty_root(),
        1 => replacements.remove(0),
        _ => Node::Root(Root::new(replacements)),
    }
}

/// Reusable sanitizing handle
///
/// Borrows its policy, so one schema can serve any number of handles and
/// threads at once.
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer<'s> {
    schema: &'s Schema,
    /// Maximum tree depth accepted by [`Sanitizer::try_sanitize`]
    max_depth: Option<usize>,
}

impl Sanitizer<'static> {
    /// Create a sanitizer with the default policy and no depth limit
    pub fn new() -> Self {
        Self::with_schema(Schema::github())
    }
}

impl Default for Sanitizer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'s> Sanitizer<'s> {
    /// Create a sanitizer with a custom policy
    pub fn with_schema(schema: &'s Schema) -> Self {
        Self {
            schema,
            max_depth: None,
        }
    }

    /// Refuse trees deeper than `max_depth` in [`Sanitizer::try_sanitize`]
    ///
    /// The transform recurses once per tree level, so callers handling
    /// adversarial input should bound the depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Sanitize `node`; never fails
    pub fn sanitize(&self, node: &Node) -> Node {
        sanitize_with(node, self.schema)
    }

    /// Sanitize an untyped JSON tree
    pub fn sanitize_json(&self, value: &Value) -> Node {
        sanitize_json(value, self.schema)
    }

    /// Sanitize `node` after checking it against the depth limit
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError::DepthExceeded` when the tree is deeper than
    /// the configured limit. Without a limit this never fails.
    pub fn try_sanitize(&self, node: &Node) -> Result<Node, SanitizeError> {
        self.validate_depth(node.depth())?;
        Ok(self.sanitize(node))
    }

    fn validate_depth(&self, depth: usize) -> Result<(), SanitizeError> {
        match self.max_depth {
            Some(max) if depth > max => {
                tracing::debug!(depth, max, "refusing tree deeper than the limit");
                Err(SanitizeError::DepthExceeded { depth, max })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Element, Text};
    use serde_json::json;

    #[test]
    fn test_non_nodes_yield_empty_root() {
        for value in [json!(true), json!(null), json!(1), json!([]), json!({"value": "x"})] {
            assert_eq!(sanitize_json(&value, Schema::github()), Node::empty_root());
        }
    }

    #[test]
    fn test_single_survivor_is_returned_bare() {
        let node: Node = Element::new("unknown").child(Text::new("value")).into();
        assert_eq!(sanitize(&node), Node::from(Text::new("value")));
    }

    #[test]
    fn test_several_survivors_are_wrapped() {
        let node: Node = Element::new("unknown")
            .child(Text::new("1"))
            .child(Text::new("2"))
            .into();
        let expected: Node = Root::new(vec![Text::new("1").into(), Text::new("2").into()]).into();
        assert_eq!(sanitize(&node), expected);
    }

    #[test]
    fn test_no_survivors_yield_empty_root() {
        assert_eq!(sanitize(&Element::new("unknown").into()), Node::empty_root());
        assert_eq!(sanitize(&Element::new("script").into()), Node::empty_root());
    }

    #[test]
    fn test_root_input_yields_root() {
        let node: Node = Root::new(vec![Element::new("script").into()]).into();
        assert_eq!(sanitize(&node), Node::empty_root());
    }

    #[test]
    fn test_depth_limit() {
        let deep: Node = Element::new("div")
            .child(Element::new("div").child(Element::new("div")))
            .into();

        let limited = Sanitizer::new().with_max_depth(2);
        assert!(matches!(
            limited.try_sanitize(&deep),
            Err(SanitizeError::DepthExceeded { depth: 3, max: 2 })
        ));

        let roomy = Sanitizer::new().with_max_depth(3);
        assert_eq!(roomy.try_sanitize(&deep).unwrap(), deep);
        assert_eq!(Sanitizer::new().try_sanitize(&deep).unwrap(), deep);
    }

    #[test]
    fn test_custom_schema() {
        let schema = Schema::builder().add_tag_names(["section"]).build();
        let sanitizer = Sanitizer::with_schema(&schema);
        let node: Node = Element::new("section").property("id", "x").into();
        assert_eq!(sanitizer.sanitize(&node), Node::from(Element::new("section")));
        assert!(std::ptr::eq(sanitizer.schema(), &schema));
    }
}
