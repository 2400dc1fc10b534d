//! Configuration loading.
//!
//! The configuration is a single TOML file with four sections:
//! `[general]` (owner, paths, registry categories), `[laws]` (one table per
//! law), `[bb_lookup]` ([`RenderConfig`]) and `[anchor_lookup]`
//! ([`AnchorLookupConfig`]). See `default_config.toml` for an annotated
//! example; that file is written to the default location on first run.
//!
//! Lookup order:
//!
//! 1. the file named by the `LAWDISPATCH_CONFIG` environment variable;
//! 2. `<config dir>/lawdispatch/config.toml`, where `<config dir>` is the
//!    platform config directory (`~/.config` on Linux).

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::anchor::AnchorLookupConfig;
use crate::render::RenderConfig;
use crate::{LawDispatchError, Result};

/// Application name, used for the config directory.
pub const APP_NAME: &str = "lawdispatch";

/// Environment variable overriding the config file path.
pub const CONFIG_ENVVAR: &str = "LAWDISPATCH_CONFIG";

/// File name of the config in the default directory.
pub const CONFIG_NAME: &str = "config.toml";

/// Annotated config written on first run.
pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// A law to convert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawConfig {
    /// Dispatch title.
    pub title: String,
    /// Forum page of the law: an `http(s)://` URL or a local file path.
    pub url: String,
}

/// Laws keyed by name, in config file order.
pub type Laws = IndexMap<String, LawConfig>;

/// The `[general]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub owner_nation: String,
    pub category: String,
    pub subcategory: String,
    #[serde(default)]
    pub dispatch_name_prefix: String,
    pub dispatch_config_path: PathBuf,
    pub std_template_path: PathBuf,
    pub template_dir_path: PathBuf,
    #[serde(default = "default_template_ext")]
    pub template_ext: String,
    /// Pause between two law fetches, in seconds.
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

fn default_template_ext() -> String {
    ".txt".to_string()
}

fn default_delay_secs() -> u64 {
    2
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    #[serde(default)]
    pub laws: Laws,
    pub bb_lookup: RenderConfig,
    pub anchor_lookup: AnchorLookupConfig,
}

impl Config {
    /// Parses a config, expanding `~` in the `[general]` paths.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content).map_err(|e| LawDispatchError::ConfigError(e.to_string()))?;

        let general = &mut config.general;
        general.dispatch_config_path = expand_home(&general.dispatch_config_path);
        general.std_template_path = expand_home(&general.std_template_path);
        general.template_dir_path = expand_home(&general.template_dir_path);

        Ok(config)
    }

    /// Loads the config file at `path`.
    ///
    /// # Errors
    ///
    /// [`LawDispatchError::ConfigNotFound`] if the file does not exist,
    /// [`LawDispatchError::ConfigError`] if it is not a valid config.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LawDispatchError::ConfigNotFound(path.to_path_buf()),
            _ => LawDispatchError::Io(e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads the config from the environment override or the default
    /// location, returning it with the path it was read from.
    pub fn load() -> Result<(Self, PathBuf)> {
        let from_env = env::var_os(CONFIG_ENVVAR).map(PathBuf::from);
        Self::locate(from_env, default_config_dir())
    }

    /// Resolves the config given an explicit path and the default directory.
    ///
    /// An explicit path must exist. Otherwise the file in `default_dir` is
    /// used; if it is missing the directory is created, [`DEFAULT_CONFIG`]
    /// is written into it and [`LawDispatchError::FirstRun`] is returned so
    /// the user can edit it.
    pub fn locate(explicit: Option<PathBuf>, default_dir: Option<PathBuf>) -> Result<(Self, PathBuf)> {
        if let Some(path) = explicit {
            let path = expand_home(&path);
            tracing::debug!(path = %path.display(), "loading config from explicit path");
            return Ok((Self::from_file(&path)?, path));
        }

        let dir = default_dir
            .ok_or_else(|| LawDispatchError::ConfigError("could not determine the config directory".to_string()))?;
        let path = dir.join(CONFIG_NAME);

        match Self::from_file(&path) {
            Err(LawDispatchError::ConfigNotFound(_)) => {
                fs::create_dir_all(&dir)?;
                fs::write(&path, DEFAULT_CONFIG)?;
                tracing::info!(path = %path.display(), "wrote default config");
                Err(LawDispatchError::FirstRun(path))
            }
            other => other.map(|config| (config, path)),
        }
    }

    /// Laws selected by name, in config order. An empty filter selects all.
    pub fn selected_laws<'a>(&'a self, names: &'a [String]) -> impl Iterator<Item = (&'a String, &'a LawConfig)> + 'a {
        self.laws
            .iter()
            .filter(move |(name, _)| names.is_empty() || names.contains(*name))
    }
}

/// Default config directory, `<platform config dir>/lawdispatch`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// Replaces a leading `~` with the home directory.
///
/// Paths without the prefix, and `~user` forms, are returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
