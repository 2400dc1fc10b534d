use scraper::{ElementRef, Node};

use crate::tags::{HtmlAttrs, html_attrs};

/// Elements inside which whitespace-only text is kept as written.
const PRESERVE_WHITESPACE_TAGS: [&str; 2] = ["pre", "textarea"];

/// A node of the law container, as seen by the BBCode renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    Element(ElementNode),
    Text(String),
    /// The configured line-break element (usually `br`).
    LineBreak,
}

/// An element together with its converted children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    /// Lowercase tag name.
    pub name: String,
    pub attrs: HtmlAttrs,
    pub children: Vec<DomNode>,
}

/// The container element of a law page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomTree {
    pub root: ElementNode,
}

/// Build a DOM tree rooted at `root`.
///
/// Elements named `line_break_tag` become [`DomNode::LineBreak`]; comments,
/// doctypes and processing instructions are dropped. Runs of ASCII
/// whitespace between elements collapse to a single `"\n"` when they
/// contain a newline and to `" "` otherwise, except under `pre` and
/// `textarea`. Law pages were authored against this behaviour, so it is
/// what the tag and anchor configs expect.
pub fn build_dom_tree(root: ElementRef<'_>, line_break_tag: &str) -> DomTree {
    let preserve = PRESERVE_WHITESPACE_TAGS.contains(&root.value().name());
    DomTree { root: build_element(root, line_break_tag, preserve) }
}

fn build_element(element: ElementRef<'_>, line_break_tag: &str, preserve: bool) -> ElementNode {
    let mut children = Vec::new();

    for child in element.children() {
        match child.value() {
            Node::Element(el) if el.name() == line_break_tag => children.push(DomNode::LineBreak),
            Node::Element(el) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    let preserve = preserve || PRESERVE_WHITESPACE_TAGS.contains(&el.name());
                    children.push(DomNode::Element(build_element(child_ref, line_break_tag, preserve)));
                }
            }
            Node::Text(text) => {
                let content: &str = text;
                if !content.is_empty() {
                    children.push(DomNode::Text(collapse_blank(content, preserve)));
                }
            }
            _ => {}
        }
    }

    ElementNode {
        name: element.value().name().to_string(),
        attrs: html_attrs(element.value().name(), element.value().attrs()),
        children,
    }
}

fn collapse_blank(text: &str, preserve: bool) -> String {
    if preserve || !text.chars().all(|c| c.is_ascii_whitespace()) {
        text.to_string()
    } else if text.contains('\n') {
        "\n".to_string()
    } else {
        " ".to_string()
    }
}
