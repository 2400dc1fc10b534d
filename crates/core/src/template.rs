//! Embedding rendered law text into the standard dispatch template.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::{LawDispatchError, Result};

/// Placeholder in the template replaced with the law's BBCode text.
pub const LAW_TEXT_PLACEHOLDER: &str = "[law]";

/// Reads the template at `template_path` and substitutes `bb_text` for every
/// [`LAW_TEXT_PLACEHOLDER`].
///
/// # Errors
///
/// A missing template is reported as [`LawDispatchError::TemplateNotFound`];
/// other read failures as [`LawDispatchError::Io`].
pub fn embed_template(bb_text: &str, template_path: &Path) -> Result<String> {
    let template = fs::read_to_string(template_path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LawDispatchError::TemplateNotFound(template_path.to_path_buf()),
        _ => LawDispatchError::Io(e),
    })?;

    Ok(fill_template(&template, bb_text))
}

/// Substitutes `bb_text` for every placeholder in an already loaded template.
pub fn fill_template(template: &str, bb_text: &str) -> String {
    template.replace(LAW_TEXT_PLACEHOLDER, bb_text)
}
