//! Dispatch registry bookkeeping.
//!
//! The registry is a TOML file listing, per owner nation, every dispatch
//! with its title and category:
//!
//! ```toml
//! [testopia."laws/act_one"]
//! title = "Act One"
//! category = "meta"
//! subcategory = "reference"
//! ns_id = 12345
//! ```
//!
//! Updating only touches `title`, `category` and `subcategory` of the
//! dispatches generated from the configured laws. The `ns_id` assigned by
//! the forum and any other field are carried over, and dispatches that are
//! not in the current law set are left alone. Tables of other owner
//! nations sharing the file are written back unchanged.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::Laws;
use crate::{LawDispatchError, Result};

/// One dispatch of the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    /// Forum id of the published dispatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns_id: Option<i64>,
    /// Fields this tool does not manage.
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// Dispatches of one owner, keyed by dispatch name.
pub type OwnerDispatches = IndexMap<String, DispatchEntry>;

/// The whole registry file, keyed by owner nation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DispatchRegistry {
    owners: IndexMap<String, OwnerDispatches>,
}

impl DispatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the registry at `path`.
    ///
    /// A missing file is not an error: it yields an empty registry that will
    /// be created on [`DispatchRegistry::save`].
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "creating new dispatch registry");
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| LawDispatchError::RegistryError(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| LawDispatchError::RegistryError(e.to_string()))
    }

    /// Writes the registry to `path`, replacing the file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn owner(&self, owner: &str) -> Option<&OwnerDispatches> {
        self.owners.get(owner)
    }

    /// Inserts or updates one dispatch, keeping fields not listed here.
    pub fn upsert(&mut self, owner: &str, name: &str, title: &str, category: &str, subcategory: &str) {
        let entry = self
            .owners
            .entry(owner.to_string())
            .or_default()
            .entry(name.to_string())
            .or_default();

        entry.title = title.to_string();
        entry.category = category.to_string();
        entry.subcategory = subcategory.to_string();
    }
}

/// Brings the registry at `path` in line with `laws`.
///
/// Every law `name` is registered as `name_prefix + name` under `owner`
/// with its title and the given category and subcategory.
pub fn update_dispatch_registry(
    path: &Path, name_prefix: &str, laws: &Laws, owner: &str, category: &str, subcategory: &str,
) -> Result<()> {
    let mut registry = DispatchRegistry::load(path)?;

    for (name, law) in laws {
        let dispatch_name = format!("{}{}", name_prefix, name);
        registry.upsert(owner, &dispatch_name, &law.title, category, subcategory);
    }

    registry.save(path)?;
    tracing::info!(path = %path.display(), count = laws.len(), "dispatch registry updated");
    Ok(())
}
