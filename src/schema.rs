//! Sanitizing policy
//!
//! A [`Schema`] is an immutable set of allow-lists consulted by every step of
//! the transform. Lookups never fail: a tag or attribute the schema says
//! nothing about is simply not permitted.
//!
//! Custom policies are derived from an existing one with a typed
//! [`SchemaBuilder`], or loaded from JSON configuration, either as a complete
//! schema ([`Schema::from_json_str`]) or as a set of overrides applied on top
//! of a builder ([`SchemaOverrides`]).
//!
//! # Examples
//!
//! ```rust
//! use markup_sanitizer::schema::Schema;
//!
//! // Allow `data-*` attributes (`dataFoo`) on every element, on top of the
//! // default policy
//! let schema = Schema::github()
//!     .to_builder()
//!     .allow_attributes("*", ["data*"])
//!     .build();
//!
//! assert!(schema.allows_attribute("div", "dataFoo"));
//! assert!(!Schema::github().allows_attribute("div", "dataFoo"));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::SanitizeError;

/// Key in [`Schema::attributes`] that applies to every tag
pub const WILDCARD: &str = "*";

/// Attribute-list entry that permits every `data` attribute
pub const DATA_WILDCARD: &str = "data*";

/// Immutable sanitizing policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Schema {
    /// Permitted element tag names
    tag_names: BTreeSet<String>,
    /// Permitted attributes per tag name, or for every tag under `"*"`
    attributes: BTreeMap<String, BTreeSet<String>>,
    /// Permitted URL schemes per attribute name
    protocols: BTreeMap<String, BTreeSet<String>>,
    /// Tags that must have one of the listed tags somewhere above them
    ancestors: BTreeMap<String, BTreeSet<String>>,
    /// Attributes whose values get `clobber_prefix` prepended
    clobber: BTreeSet<String>,
    clobber_prefix: String,
    /// Tags dropped together with their whole subtree
    strip: BTreeSet<String>,
}

impl Schema {
    /// Start an empty policy that permits nothing
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Start a builder pre-filled with this policy
    pub fn to_builder(&self) -> SchemaBuilder {
        SchemaBuilder {
            schema: self.clone(),
        }
    }

    /// Load a complete policy from JSON
    ///
    /// Missing keys are empty. Unknown keys are rejected so that typos in
    /// configuration do not silently weaken the policy.
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError::Config` when the JSON does not describe a
    /// schema.
    pub fn from_json_str(json: &str) -> Result<Self, SanitizeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether `tag` may be kept as an element
    ///
    /// The wildcard key is never a tag name.
    pub fn allows_tag(&self, tag: &str) -> bool {
        !tag.is_empty() && tag != WILDCARD && self.tag_names.contains(tag)
    }

    /// Whether `attribute` may survive on an element named `tag`
    pub fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        let lists = [self.attributes.get(tag), self.attributes.get(WILDCARD)];
        lists.into_iter().flatten().any(|allowed| {
            allowed.contains(attribute)
                || (allowed.contains(DATA_WILDCARD) && is_data_attribute(attribute))
        })
    }

    /// Permitted schemes for `attribute`, or `None` if it is not scheme-checked
    pub fn protocols_for(&self, attribute: &str) -> Option<&BTreeSet<String>> {
        self.protocols.get(attribute)
    }

    /// Tags of which at least one must enclose `tag`, if `tag` has a requirement
    pub fn required_ancestors(&self, tag: &str) -> Option<&BTreeSet<String>> {
        self.ancestors.get(tag)
    }

    /// Whether values of `attribute` are prefixed against DOM clobbering
    pub fn is_clobbered(&self, attribute: &str) -> bool {
        self.clobber.contains(attribute)
    }

    /// Prefix prepended to clobber-protected values
    pub fn clobber_prefix(&self) -> &str {
        &self.clobber_prefix
    }

    /// Whether `tag` is dropped with its entire subtree
    pub fn is_stripped(&self, tag: &str) -> bool {
        self.strip.contains(tag)
    }

    /// Permitted tag names in sorted order
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tag_names.iter().map(String::as_str)
    }
}

/// `data` followed by at least one more character
fn is_data_attribute(attribute: &str) -> bool {
    attribute.len() > 4 && attribute.starts_with("data")
}

/// Typed construction of a [`Schema`]
///
/// Every method consumes and returns the builder. Methods named `set_*`
/// replace an entry, `add_*`/`allow_*` extend it.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Permit additional element tag names
    pub fn add_tag_names<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.tag_names.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Stop permitting the given tag names
    pub fn remove_tag_names<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            self.schema.tag_names.remove(tag.as_ref());
        }
        self
    }

    /// Extend the attribute list of `tag` (or `"*"`)
    pub fn allow_attributes<I, S>(mut self, tag: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema
            .attributes
            .entry(tag.into())
            .or_default()
            .extend(attributes.into_iter().map(Into::into));
        self
    }

    /// Replace the attribute list of `tag` (or `"*"`)
    pub fn set_attributes<I, S>(mut self, tag: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema
            .attributes
            .insert(tag.into(), attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the permitted schemes of `attribute`
    pub fn set_protocols<I, S>(mut self, attribute: impl Into<String>, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema
            .protocols
            .insert(attribute.into(), schemes.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the required ancestors of `tag`
    pub fn set_ancestors<I, S>(mut self, tag: impl Into<String>, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema
            .ancestors
            .insert(tag.into(), ancestors.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the clobber-protected attribute list
    pub fn clobber<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.clobber = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the prefix prepended to clobber-protected values
    pub fn clobber_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.schema.clobber_prefix = prefix.into();
        self
    }

    /// Drop the given tags together with their content
    pub fn add_strip<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.strip.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Finish the policy
    pub fn build(self) -> Schema {
        self.schema
    }
}

/// Partial policy loaded from configuration and applied to a builder
///
/// ```rust
/// use markup_sanitizer::schema::{Schema, SchemaOverrides};
///
/// let overrides = SchemaOverrides::from_json_str(
///     r#"{"addTagNames": ["section"], "protocols": {"href": ["https"]}}"#,
/// )
/// .expect("valid overrides");
/// let schema = overrides.apply(Schema::github().to_builder()).build();
///
/// assert!(schema.allows_tag("section"));
/// assert_eq!(schema.protocols_for("href").map(|p| p.len()), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SchemaOverrides {
    pub add_tag_names: Vec<String>,
    pub remove_tag_names: Vec<String>,
    pub allow_attributes: BTreeMap<String, Vec<String>>,
    pub set_attributes: BTreeMap<String, Vec<String>>,
    pub protocols: BTreeMap<String, Vec<String>>,
    pub ancestors: BTreeMap<String, Vec<String>>,
    pub clobber: Option<Vec<String>>,
    pub clobber_prefix: Option<String>,
    pub add_strip: Vec<String>,
}

impl SchemaOverrides {
    /// Load overrides from JSON
    ///
    /// Every key is optional; absent keys change nothing.
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError::Config` for malformed JSON, wrongly typed
    /// values or unknown keys.
    pub fn from_json_str(json: &str) -> Result<Self, SanitizeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply every override to `builder`
    ///
    /// Replacements (`setAttributes`) run before extensions
    /// (`allowAttributes`) so both can target the same tag.
    pub fn apply(self, mut builder: SchemaBuilder) -> SchemaBuilder {
        builder = builder
            .add_tag_names(self.add_tag_names)
            .remove_tag_names(self.remove_tag_names);
        for (tag, attributes) in self.set_attributes {
            builder = builder.set_attributes(tag, attributes);
        }
        for (tag, attributes) in self.allow_attributes {
            builder = builder.allow_attributes(tag, attributes);
        }
        for (attribute, schemes) in self.protocols {
            builder = builder.set_protocols(attribute, schemes);
        }
        for (tag, ancestors) in self.ancestors {
            builder = builder.set_ancestors(tag, ancestors);
        }
        if let Some(clobber) = self.clobber {
            builder = builder.clobber(clobber);
        }
        if let Some(prefix) = self.clobber_prefix {
            builder = builder.clobber_prefix(prefix);
        }
        builder.add_strip(self.add_strip)
    }
}
