//! BBCode rendering of law pages.
//!
//! [`BbRenderer`] walks the law container depth-first, children left to
//! right, and builds the BBCode text bottom-up:
//!
//! - the line-break element becomes `"\n"`;
//! - any other element is wrapped with the format the [`TagLookupTable`]
//!   returns for it, after its children are rendered;
//! - a whitespace-only text node is copied as is;
//! - any other text node is wrapped with `default_bb_tag`, preceded by the
//!   anchor the [`AnchorClassifier`] produces for it, if any.
//!
//! # Example
//!
//! ```rust
//! use lawdispatch_core::{NoAnchors, RenderConfig, render_bbcode};
//! use lawdispatch_core::tags::TagRule;
//!
//! let mut config = RenderConfig { container: "div.law".to_string(), ..Default::default() };
//! config.tags.insert("bold", TagRule::new("b", "[b]{text}[/b]"));
//!
//! let bb = render_bbcode(r#"<div class="law"><b>Title</b><br>Body</div>"#, &config, &mut NoAnchors).unwrap();
//! assert_eq!(bb, "[b]Title[/b]\nBody");
//! ```

use scraper::Selector;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::anchor::AnchorClassifier;
use crate::dom_tree::{DomNode, ElementNode};
use crate::parse::{Document, parse_selector};
use crate::tags::{PASSTHROUGH_FORMAT, TagLookupTable, fill_format};
use crate::Result;

/// The `[bb_lookup]` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// CSS selector of the element holding the law text.
    pub container: String,
    /// Format applied to every non-blank text node.
    #[serde(default = "default_bb_tag")]
    pub default_bb_tag: String,
    /// Element rendered as a newline.
    #[serde(default = "default_line_break")]
    pub line_break_html_tag: String,
    /// Selectors of subtrees removed before rendering.
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub tags: TagLookupTable,
}

fn default_bb_tag() -> String {
    PASSTHROUGH_FORMAT.to_string()
}

fn default_line_break() -> String {
    "br".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            container: "body".to_string(),
            default_bb_tag: default_bb_tag(),
            line_break_html_tag: default_line_break(),
            ignore: Vec::new(),
            tags: TagLookupTable::new(),
        }
    }
}

/// Renderer with the configuration's selectors compiled once.
///
/// One renderer can be reused for many documents; the anchor classifier
/// passed to [`BbRenderer::render`] must not be.
#[derive(Debug)]
pub struct BbRenderer<'c> {
    config: &'c RenderConfig,
    container: Selector,
    ignore: Vec<Selector>,
}

impl<'c> BbRenderer<'c> {
    /// Compiles the container and ignore selectors.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LawDispatchError::HtmlParseError`] for an invalid selector.
    pub fn new(config: &'c RenderConfig) -> Result<Self> {
        let container = parse_selector(&config.container)?;
        let ignore = config
            .ignore
            .iter()
            .map(|s| parse_selector(s))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { config, container, ignore })
    }

    pub fn config(&self) -> &RenderConfig {
        self.config
    }

    /// Renders the container of `html` as BBCode.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LawDispatchError::ContainerNotFound`] when the
    /// container selector matches nothing.
    pub fn render<A>(&self, html: &str, anchors: &mut A) -> Result<String>
    where
        A: AnchorClassifier + ?Sized,
    {
        let doc = Document::parse(html)?;
        let tree = doc.into_container_tree(
            &self.container,
            &self.config.container,
            &self.ignore,
            &self.config.line_break_html_tag,
        )?;

        Ok(self.render_children(&tree.root, anchors))
    }

    /// Renders the children of `element`, without wrapping `element` itself.
    pub fn render_children<A>(&self, element: &ElementNode, anchors: &mut A) -> String
    where
        A: AnchorClassifier + ?Sized,
    {
        let mut bb_text = String::new();
        for child in &element.children {
            bb_text.push_str(&self.render_node(child, anchors));
        }
        bb_text
    }

    fn render_node<A>(&self, node: &DomNode, anchors: &mut A) -> String
    where
        A: AnchorClassifier + ?Sized,
    {
        match node {
            DomNode::LineBreak => "\n".to_string(),
            DomNode::Element(el) => {
                let inner = self.render_children(el, anchors);
                let format = self.config.tags.bb_tag_for(&el.name, &el.attrs);
                fill_format(format, &inner)
            }
            DomNode::Text(text) => self.render_text(text, anchors),
        }
    }

    fn render_text<A>(&self, text: &str, anchors: &mut A) -> String
    where
        A: AnchorClassifier + ?Sized,
    {
        if is_blank(text) {
            return text.to_string();
        }

        let text = text.replace('\n', "");
        // NFKD folds non-breaking spaces so heading patterns see plain spaces
        let line: String = text.trim().nfkd().collect();

        let mut out = String::new();
        if let Some(anchor) = anchors.classify(&line) {
            tracing::debug!(%anchor, %line, "heading");
            out.push_str(&anchor);
        }
        out.push_str(&fill_format(&self.config.default_bb_tag, &text));
        out
    }
}

fn is_blank(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_whitespace)
}

/// Renders `html` with `config`, classifying headings with `anchors`.
///
/// Convenience wrapper around [`BbRenderer`]; it compiles the selectors on
/// every call.
pub fn render_bbcode<A>(html: &str, config: &RenderConfig, anchors: &mut A) -> Result<String>
where
    A: AnchorClassifier + ?Sized,
{
    BbRenderer::new(config)?.render(html, anchors)
}
