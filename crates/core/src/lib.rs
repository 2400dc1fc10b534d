//! Convert forum law pages into BBCode dispatches.
//!
//! The pipeline is: fetch the page, render the law container to BBCode
//! with [`BbRenderer`] (tags mapped through the [`TagLookupTable`], headings
//! anchored by an [`AnchorGenerator`]), embed the text into the standard
//! template with [`embed_template`], and save it. [`LawUpdater`] runs the
//! whole pipeline for every law in the [`Config`].

pub mod anchor;
pub mod config;
pub mod dom_tree;
pub mod error;
pub mod fetch;
pub mod parse;
pub mod registry;
pub mod render;
pub mod tags;
pub mod template;
#[cfg(feature = "fetch")]
pub mod updater;

pub use anchor::{AnchorClassifier, AnchorGenerator, AnchorLookupConfig, AnchorRuleConfig, NoAnchors};
pub use config::{Config, GeneralConfig, LawConfig, Laws};
#[doc(hidden)]
pub use dom_tree::{DomNode, DomTree, ElementNode, build_dom_tree};
pub use error::{LawDispatchError, Result};
pub use fetch::{FetchConfig, fetch_file, fetch_stdin};
#[cfg(feature = "fetch")]
pub use fetch::{fetch_source, fetch_url};
pub use parse::Document;
pub use registry::{DispatchEntry, DispatchRegistry, update_dispatch_registry};
pub use render::{BbRenderer, RenderConfig, render_bbcode};
pub use tags::{AttrValue, HtmlAttrs, TagLookupTable, TagRule};
pub use template::{LAW_TEXT_PLACEHOLDER, embed_template};
#[cfg(feature = "fetch")]
pub use updater::{LawFailure, LawUpdater, UpdateReport, save_law_dispatch_file};
