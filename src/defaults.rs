//! Default policy
//!
//! A conservative allow-list for user-written prose, modelled on what large
//! code-hosting sites accept in rendered READMEs and comments. The tables are
//! plain data; [`Schema::github`] turns them into a [`Schema`] once per
//! process. Attributes are named by property name (`colSpan`, `ariaLabel`),
//! see [`crate::property`].

use std::sync::LazyLock;

use crate::schema::{Schema, SchemaBuilder, WILDCARD};

/// Prefix for `id`/`name` values so they cannot shadow document globals
pub const CLOBBER_PREFIX: &str = "user-content-";

/// Attributes rewritten with [`CLOBBER_PREFIX`]
const CLOBBER: &[&str] = &["name", "id"];

/// Elements dropped together with their content
const STRIP: &[&str] = &["script"];

/// Permitted elements
const TAG_NAMES: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "br", "b", "i", "strong", "em", "a", "pre", "code", "img",
    "tt", "div", "ins", "del", "sup", "sub", "p", "ol", "ul", "table", "thead", "tbody", "tfoot",
    "blockquote", "dl", "dt", "dd", "kbd", "q", "samp", "var", "hr", "ruby", "rt", "rp", "li",
    "tr", "td", "th", "s", "strike", "summary", "details", "caption", "figure", "figcaption",
    "abbr", "bdo", "cite", "dfn", "mark", "small", "span", "time", "wbr", "input",
];

/// Attributes permitted on specific elements, keyed by property name
const TAG_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href"]),
    ("img", &["src", "longDesc"]),
    ("div", &["itemScope", "itemType"]),
    ("blockquote", &["cite"]),
    ("del", &["cite"]),
    ("ins", &["cite"]),
    ("q", &["cite"]),
];

/// Attributes permitted on every element, keyed by property name
const GLOBAL_ATTRIBUTES: &[&str] = &[
    "abbr", "accept", "acceptCharset", "accessKey", "action", "align", "alt",
    "ariaDescribedBy", "ariaHidden", "ariaLabel", "ariaLabelledBy", "axis", "border",
    "cellPadding", "cellSpacing", "char", "charOff", "charSet", "checked", "clear", "cols",
    "colSpan", "color", "compact", "coords", "dateTime", "dir", "disabled", "encType", "htmlFor",
    "frame", "headers", "height", "hrefLang", "hSpace", "isMap", "id", "label", "lang",
    "maxLength", "media", "method", "multiple", "name", "noHref", "noShade", "noWrap", "open",
    "prompt", "readOnly", "rel", "rev", "rows", "rowSpan", "rules", "scope", "selected", "shape",
    "size", "span", "start", "summary", "tabIndex", "target", "title", "type", "useMap", "vAlign",
    "value", "vSpace", "width", "itemProp",
];

/// Permitted URL schemes for URL-valued attributes
const PROTOCOLS: &[(&str, &[&str])] = &[
    ("href", &["http", "https", "mailto"]),
    ("cite", &["http", "https"]),
    ("src", &["http", "https"]),
    ("longDesc", &["http", "https"]),
];

/// Elements that are only meaningful inside one of the listed containers
const ANCESTORS: &[(&str, &[&str])] = &[
    ("li", &["ol", "ul"]),
    ("tbody", &["table"]),
    ("tfoot", &["table"]),
    ("thead", &["table"]),
    ("td", &["table"]),
    ("th", &["table"]),
    ("tr", &["table"]),
];

static GITHUB: LazyLock<Schema> = LazyLock::new(|| github_builder().build());

fn github_builder() -> SchemaBuilder {
    let mut builder = Schema::builder()
        .add_tag_names(TAG_NAMES.iter().copied())
        .allow_attributes(WILDCARD, GLOBAL_ATTRIBUTES.iter().copied())
        .clobber(CLOBBER.iter().copied())
        .clobber_prefix(CLOBBER_PREFIX)
        .add_strip(STRIP.iter().copied());

    for (tag, attributes) in TAG_ATTRIBUTES {
        builder = builder.allow_attributes(*tag, attributes.iter().copied());
    }
    for (attribute, schemes) in PROTOCOLS {
        builder = builder.set_protocols(*attribute, schemes.iter().copied());
    }
    for (tag, ancestors) in ANCESTORS {
        builder = builder.set_ancestors(*tag, ancestors.iter().copied());
    }
    builder
}

impl Schema {
    /// The default policy, built on first use and shared for the process
    pub fn github() -> &'static Schema {
        &GITHUB
    }
}
