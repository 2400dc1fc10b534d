//! HTML parsing and container extraction.
//!
//! [`Document`] parses a law page and cuts out the element that holds the
//! law text, with ignored subtrees removed.
//!
//! # Example
//!
//! ```rust
//! use lawdispatch_core::parse::{Document, parse_selector};
//!
//! let html = r#"<div class="post"><p class="content">Paragraph<span class="sig">x</span></p></div>"#;
//!
//! let doc = Document::parse(html).unwrap();
//! let container = parse_selector("p.content").unwrap();
//! let ignore = [parse_selector("span.sig").unwrap()];
//! let tree = doc.into_container_tree(&container, "p.content", &ignore, "br").unwrap();
//! assert_eq!(tree.root.children.len(), 1);
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::dom_tree::{DomTree, build_dom_tree};
use crate::{LawDispatchError, Result};

/// Compiles a CSS selector, mapping failures to [`LawDispatchError::HtmlParseError`].
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| LawDispatchError::HtmlParseError(format!("Invalid selector {}: {}", selector, e)))
}

/// Represents a parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// Parsing is lenient: malformed markup is repaired the way browsers do,
    /// so this only fails on selector errors later on.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html })
    }

    /// Extracts the law container as a [`DomTree`].
    ///
    /// The first element matching `container` becomes the root. Every
    /// descendant matching one of `ignore` is detached, with its subtree,
    /// before the tree is built. `container_src` is the selector text used
    /// in the error when nothing matches.
    pub fn into_container_tree(
        self, container: &Selector, container_src: &str, ignore: &[Selector], line_break_tag: &str,
    ) -> Result<DomTree> {
        let mut html = self.html;

        let (container_id, ignored) = {
            let root = html
                .select(container)
                .next()
                .ok_or_else(|| LawDispatchError::ContainerNotFound(container_src.to_string()))?;

            let ignored: Vec<_> = ignore
                .iter()
                .flat_map(|sel| root.select(sel).map(|el| el.id()))
                .collect();

            (root.id(), ignored)
        };

        tracing::debug!(count = ignored.len(), "removing ignored elements");

        for id in ignored {
            if let Some(mut node) = html.tree.get_mut(id) {
                node.detach();
            }
        }

        let root = html
            .tree
            .get(container_id)
            .and_then(ElementRef::wrap)
            .ok_or_else(|| LawDispatchError::ContainerNotFound(container_src.to_string()))?;

        Ok(build_dom_tree(root, line_break_tag))
    }
}
