//! Error types for lawdispatch operations.
//!
//! This module defines the main error type [`LawDispatchError`] which
//! represents everything that can go wrong while loading configuration,
//! fetching law pages, rendering BBCode and writing dispatch files.
//!
//! Lookup misses are not errors: an element without a matching tag rule
//! renders with the passthrough format, and a line that matches no anchor
//! rule simply gets no anchor.
//!
//! # Example
//!
//! ```rust
//! use lawdispatch_core::{LawDispatchError, Result};
//!
//! fn require_body(html: &str) -> Result<&str> {
//!     if html.is_empty() {
//!         return Err(LawDispatchError::ContainerNotFound("body".to_string()));
//!     }
//!     Ok(html)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for law dispatch generation.
///
/// # Example
///
/// ```rust
/// use lawdispatch_core::{LawDispatchError, RenderConfig, NoAnchors, render_bbcode};
///
/// let config = RenderConfig { container: "div.law".to_string(), ..Default::default() };
/// match render_bbcode("<p>nothing here</p>", &config, &mut NoAnchors) {
///     Err(LawDispatchError::ContainerNotFound(selector)) => assert_eq!(selector, "div.law"),
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum LawDispatchError {
    /// HTTP request errors from reqwest.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided for a law.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, usually an invalid CSS selector in the
    /// render configuration.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The container selector matched nothing in the fetched document.
    ///
    /// Rendering an empty dispatch would silently wipe the published law,
    /// so this aborts the document instead.
    #[error("Container element not found for selector: {0}")]
    ContainerNotFound(String),

    /// An anchor rule pattern failed to compile or does not have exactly
    /// one capture group.
    #[error("Invalid {rule} anchor pattern: {reason}")]
    InvalidPattern { rule: &'static str, reason: String },

    /// The standard law dispatch template is missing.
    #[error("Could not find standard law dispatch template file: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// Input file not found.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file named through the environment or command line is missing.
    #[error("Could not find config file {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// No config existed at the default location, so the bundled default
    /// was written there.
    #[error("Could not find config.toml. First time run? Created one in {}. Please edit it.", .0.display())]
    FirstRun(PathBuf),

    /// Config file is present but malformed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Dispatch registry file is present but malformed, or could not be
    /// serialized back.
    #[error("Dispatch registry error: {0}")]
    RegistryError(String),
}

/// Result type alias for LawDispatchError.
pub type Result<T> = std::result::Result<T, LawDispatchError>;
