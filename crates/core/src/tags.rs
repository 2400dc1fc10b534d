//! HTML element to BBCode tag lookup.
//!
//! The lookup table is an insertion-ordered list of [`TagRule`]s. The first
//! rule whose element name and complete attribute mapping equal the
//! element's wins; anything else falls back to [`PASSTHROUGH_FORMAT`].
//!
//! # Example
//!
//! ```rust
//! use lawdispatch_core::tags::{AttrValue, HtmlAttrs, TagLookupTable, TagRule};
//!
//! let mut table = TagLookupTable::new();
//! table.insert(
//!     "bold",
//!     TagRule::new("span", "[b]{text}[/b]").with_attr("class", AttrValue::list(["bold"])),
//! );
//!
//! let mut attrs = HtmlAttrs::new();
//! attrs.insert("class".to_string(), AttrValue::list(["bold"]));
//!
//! assert_eq!(table.bb_tag_for("span", &attrs), "[b]{text}[/b]");
//! assert_eq!(table.bb_tag_for("em", &attrs), "{text}");
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder substituted with the rendered inner text.
pub const TEXT_PLACEHOLDER: &str = "{text}";

/// Format used for elements that match no rule: content passes through unwrapped.
pub const PASSTHROUGH_FORMAT: &str = "{text}";

/// Token-list attributes on every element.
const GLOBAL_LIST_ATTRS: [&str; 3] = ["class", "accesskey", "dropzone"];

/// Whether attribute `attr` of element `element` holds a whitespace-separated token list.
fn is_list_attr(element: &str, attr: &str) -> bool {
    GLOBAL_LIST_ATTRS.contains(&attr)
        || matches!(
            (element, attr),
            ("a" | "link", "rel" | "rev")
                | ("area", "rel")
                | ("td" | "th", "headers")
                | ("form", "accept-charset")
                | ("object", "archive")
                | ("icon", "sizes")
                | ("iframe", "sandbox")
                | ("output", "for")
        )
}

/// Value of a single HTML attribute.
///
/// In the config file a plain string is a [`AttrValue::Single`] and an array
/// is a [`AttrValue::List`], e.g. `attrs = { class = ["bold"], style = "font-weight: bold;" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Single(String),
    List(Vec<String>),
}

impl AttrValue {
    pub fn single(value: impl Into<String>) -> Self {
        Self::Single(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// Builds the value of attribute `name` on `element` the way it is
    /// compared against rules.
    ///
    /// Token-list attributes are split on whitespace, so `class="bold  big"`
    /// becomes `["bold", "big"]`. `class`, `accesskey` and `dropzone` are
    /// lists everywhere; `rel`, `headers` and the like only on the elements
    /// that define them as lists (`rel` on `a`, but not on `span`).
    pub fn from_html(element: &str, name: &str, raw: &str) -> Self {
        if is_list_attr(element, name) {
            Self::List(raw.split_whitespace().map(str::to_string).collect())
        } else {
            Self::Single(raw.to_string())
        }
    }
}

/// Attribute mapping of an element, compared with [`TagRule::attrs`] by full equality.
pub type HtmlAttrs = IndexMap<String, AttrValue>;

/// Builds the comparable attribute mapping of `element` from raw `(name, value)` pairs.
pub fn html_attrs<'a, I>(element: &str, raw: I) -> HtmlAttrs
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    raw.into_iter()
        .map(|(name, value)| (name.to_string(), AttrValue::from_html(element, name, value)))
        .collect()
}

/// One element matching rule of the lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    /// Element name, lowercase.
    pub name: String,
    /// Exact attribute mapping the element must carry. Order is irrelevant.
    #[serde(default)]
    pub attrs: HtmlAttrs,
    /// BBCode format containing a `{text}` placeholder.
    pub bb_tag: String,
}

impl TagRule {
    pub fn new(name: impl Into<String>, bb_tag: impl Into<String>) -> Self {
        Self { name: name.into(), attrs: HtmlAttrs::new(), bb_tag: bb_tag.into() }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.attrs.insert(name.into(), value);
        self
    }

    /// Whether an element with this name and attributes is matched.
    ///
    /// `IndexMap` equality ignores insertion order, so only the set of
    /// attributes and their values matter. Extra or missing attributes
    /// disqualify the rule.
    pub fn matches(&self, name: &str, attrs: &HtmlAttrs) -> bool {
        self.name == name && &self.attrs == attrs
    }
}

/// Ordered table of tag rules keyed by an arbitrary label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagLookupTable {
    rules: IndexMap<String, TagRule>,
}

impl TagLookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule. Re-inserting an existing label replaces the rule in place.
    pub fn insert(&mut self, label: impl Into<String>, rule: TagRule) {
        self.rules.insert(label.into(), rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagRule)> {
        self.rules.iter().map(|(label, rule)| (label.as_str(), rule))
    }

    /// Returns the BBCode format for an element, or [`PASSTHROUGH_FORMAT`].
    pub fn bb_tag_for(&self, name: &str, attrs: &HtmlAttrs) -> &str {
        self.rules
            .values()
            .find(|rule| rule.matches(name, attrs))
            .map(|rule| rule.bb_tag.as_str())
            .unwrap_or(PASSTHROUGH_FORMAT)
    }
}

impl<L: Into<String>> FromIterator<(L, TagRule)> for TagLookupTable {
    fn from_iter<T: IntoIterator<Item = (L, TagRule)>>(iter: T) -> Self {
        Self { rules: iter.into_iter().map(|(label, rule)| (label.into(), rule)).collect() }
    }
}

/// Substitutes `text` for every `{text}` placeholder in `format`.
pub fn fill_format(format: &str, text: &str) -> String {
    format.replace(TEXT_PLACEHOLDER, text)
}
