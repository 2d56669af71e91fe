//! Markup Sanitizer - allow-list sanitizing of HTML syntax trees
//!
//! This library turns an untrusted HTML syntax tree into a safe subset:
//! scripts, event handlers, dangerous URLs, DOM-clobbering names and
//! out-of-context elements are removed, while benign content is kept.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `node`: the syntax tree model and builders
//! - `json`: lenient JSON encoding of trees
//! - `schema`: the sanitizing policy and its builder
//! - `defaults`: the default policy tables
//! - `value`: attribute value sanitizing (coercion, schemes, clobbering)
//! - `structure`: ancestor requirements such as "`li` lives in a list"
//! - `transform`: the recursive keep / strip / unwrap walk
//! - `sanitize`: public entry points producing a single node
//! - `parser` and `charset`: HTML bytes to tree (feature `html`)
//! - `property`: HTML attribute names to tree property names and back
//! - `serializer`: tree to HTML text
//!
//! # Guarantees
//!
//! Sanitizing never fails and never panics on malformed input; every
//! unexpected shape degrades to dropping or unwrapping. The input tree is
//! never modified. A [`Schema`] is immutable and can be shared between
//! threads.
//!
//! # Examples
//!
//! ```rust
//! use markup_sanitizer::node::{Element, Node, Text};
//! use markup_sanitizer::sanitize;
//!
//! let dirty: Node = Element::new("a")
//!     .property("href", "javascript:alert(1)")
//!     .child(Text::new("click"))
//!     .into();
//!
//! let expected: Node = Element::new("a").child(Text::new("click")).into();
//! assert_eq!(sanitize(&dirty), expected);
//! ```

// Module declarations
#[cfg(feature = "html")]
pub mod charset;
pub mod defaults;
pub mod error;
pub mod json;
pub mod node;
#[cfg(feature = "html")]
pub mod parser;
pub mod property;
pub mod sanitize;
pub mod schema;
pub mod serializer;
pub mod structure;
pub mod transform;
pub mod value;

// Re-export main types for convenience
pub use error::SanitizeError;
pub use node::{Element, Node, PropertyValue, Root, Text};
pub use sanitize::{Sanitizer, sanitize, sanitize_json, sanitize_with};
pub use schema::{Schema, SchemaBuilder, SchemaOverrides};
