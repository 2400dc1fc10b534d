//! Law dispatch update run.
//!
//! [`LawUpdater::run`] regenerates every configured law dispatch:
//!
//! 1. the dispatch registry is brought in line with `[laws]`;
//! 2. each law page is fetched, rendered to BBCode with a fresh
//!    [`AnchorGenerator`], embedded into the standard template and saved
//!    to `template_dir_path`;
//! 3. the updater waits `delay_secs` between two laws to stay under the
//!    forum's rate limits.
//!
//! A law that fails is logged and reported; the remaining laws are still
//! processed. Configuration problems (bad selectors or anchor patterns,
//! an unwritable registry) abort the run.
//!
//! # Example
//!
//! ```rust,no_run
//! use lawdispatch_core::{Config, LawUpdater};
//!
//! # #[tokio::main]
//! # async fn main() -> lawdispatch_core::Result<()> {
//! let (config, _path) = Config::load()?;
//! let report = LawUpdater::new(config).run().await?;
//! println!("{} written, {} failed", report.written.len(), report.failed.len());
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::anchor::AnchorGenerator;
use crate::config::{Config, LawConfig};
use crate::fetch::{FetchConfig, fetch_source};
use crate::registry::update_dispatch_registry;
use crate::render::BbRenderer;
use crate::template::embed_template;
use crate::Result;

/// A law that could not be regenerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LawFailure {
    pub name: String,
    pub error: String,
}

/// Outcome of an update run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Law names with the dispatch file written for them.
    pub written: Vec<(String, PathBuf)>,
    pub failed: Vec<LawFailure>,
}

impl UpdateReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives registry update, rendering and saving for all configured laws.
#[derive(Debug, Clone)]
pub struct LawUpdater {
    config: Config,
    fetch: FetchConfig,
    delay: Duration,
    only: Vec<String>,
    update_registry: bool,
}

impl LawUpdater {
    pub fn new(config: Config) -> Self {
        let delay = Duration::from_secs(config.general.delay_secs);
        Self { config, fetch: FetchConfig::default(), delay, only: Vec::new(), update_registry: true }
    }

    pub fn fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Overrides `delay_secs` from the config.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Restricts the run to the named laws. An empty list means all laws.
    pub fn only(mut self, names: Vec<String>) -> Self {
        self.only = names;
        self
    }

    /// Skips the dispatch registry update.
    pub fn skip_registry(mut self, skip: bool) -> Self {
        self.update_registry = !skip;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the update.
    pub async fn run(&self) -> Result<UpdateReport> {
        let general = &self.config.general;

        for name in &self.only {
            if !self.config.laws.contains_key(name) {
                tracing::warn!(law = %name, "law not in config, skipping");
            }
        }

        if self.update_registry {
            update_dispatch_registry(
                &general.dispatch_config_path,
                &general.dispatch_name_prefix,
                &self.config.laws,
                &general.owner_nation,
                &general.category,
                &general.subcategory,
            )?;
        }

        let renderer = BbRenderer::new(&self.config.bb_lookup)?;
        let anchors = AnchorGenerator::new(&self.config.anchor_lookup)?;

        let mut report = UpdateReport::default();
        let laws: Vec<_> = self.config.selected_laws(&self.only).collect();

        for (i, (name, law)) in laws.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            // cloned before first use, so every law starts without article or section
            match self.generate(&renderer, anchors.clone(), name, law).await {
                Ok(path) => {
                    tracing::info!(law = %name, path = %path.display(), "saved law dispatch");
                    report.written.push((name.to_string(), path));
                }
                Err(e) => {
                    tracing::warn!(law = %name, error = %e, "failed to generate law dispatch");
                    report.failed.push(LawFailure { name: name.to_string(), error: e.to_string() });
                }
            }
        }

        Ok(report)
    }

    async fn generate(
        &self, renderer: &BbRenderer<'_>, mut anchors: AnchorGenerator, name: &str, law: &LawConfig,
    ) -> Result<PathBuf> {
        let general = &self.config.general;

        let html = fetch_source(&law.url, &self.fetch).await?;
        let bb_text = renderer.render(&html, &mut anchors)?;
        let text = embed_template(&bb_text, &general.std_template_path)?;
        tracing::info!(law = %name, "generated law dispatch");

        save_law_dispatch_file(&text, &general.template_dir_path, name, &general.template_ext)
    }
}

/// Writes a law dispatch to `dir/name` with extension `ext`.
///
/// The extension may be given with or without its leading dot. Missing
/// directories are created and an existing file is replaced.
pub fn save_law_dispatch_file(text: &str, dir: &Path, name: &str, ext: &str) -> Result<PathBuf> {
    let path = dir.join(name).with_extension(ext.trim_start_matches('.'));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, text)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DispatchRegistry;
    use tempfile::TempDir;

    #[test]
    fn test_save_law_dispatch_file() {
        let dir = TempDir::new().unwrap();

        let path = save_law_dispatch_file("Test", dir.path(), "test", ".txt").unwrap();

        assert_eq!(path, dir.path().join("test.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Test");
    }

    #[test]
    fn test_save_law_dispatch_file_without_dot_and_overwrite() {
        let dir = TempDir::new().unwrap();

        save_law_dispatch_file("old", dir.path(), "act", "bb").unwrap();
        let path = save_law_dispatch_file("new", dir.path(), "act", "bb").unwrap();

        assert_eq!(path, dir.path().join("act.bb"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    fn write_fixture(dir: &Path) -> Config {
        let law = r#"<html><body><div class="content">Article I. Scope<br>Section 1. Applies<br>(a) everywhere</div></body></html>"#;
        fs::write(dir.join("act.html"), law).unwrap();
        fs::write(dir.join("other.html"), r#"<div class="content">Article II. Other<br>(b) only</div>"#).unwrap();
        fs::write(dir.join("template.txt"), "[center]Law[/center]\n[law]\n").unwrap();

        let src = format!(
            r#"
[general]
owner_nation = "testopia"
category = "meta"
subcategory = "reference"
dispatch_name_prefix = "laws/"
dispatch_config_path = "{dir}/dispatch_config.toml"
std_template_path = "{dir}/template.txt"
template_dir_path = "{dir}/out"
template_ext = ".txt"
delay_secs = 0

[laws.act]
title = "The Act"
url = "{dir}/act.html"

[laws.missing]
title = "Missing"
url = "{dir}/missing.html"

[laws.other]
title = "Other"
url = "{dir}/other.html"

[bb_lookup]
container = "div.content"

[anchor_lookup.section]
match = '^Section (\d+)\..*'
anchor_link = 's\1'

[anchor_lookup.subsection]
match = '^\(([a-z])\).*'
anchor_link = '\1'

[anchor_lookup.article]
match = '^Article ([IVX]+)\..*'
anchor_link = 'a\1'
"#,
            dir = dir.display()
        );
        Config::from_toml_str(&src).unwrap()
    }

    #[tokio::test]
    async fn test_run_generates_dispatches_and_registry() {
        let dir = TempDir::new().unwrap();
        let config = write_fixture(dir.path());

        let report = LawUpdater::new(config).run().await.unwrap();

        assert_eq!(report.written.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "missing");
        assert!(!report.is_success());

        let act = fs::read_to_string(dir.path().join("out/act.txt")).unwrap();
        assert_eq!(
            act,
            concat!(
                "[center]Law[/center]\n",
                "[anchor=aI][/anchor]Article I. Scope\n",
                "[anchor=aI_s1][/anchor]Section 1. Applies\n",
                "[anchor=aI_s1_a][/anchor](a) everywhere\n",
            )
        );

        // anchors do not carry over from the previous law
        let other = fs::read_to_string(dir.path().join("out/other.txt")).unwrap();
        assert!(other.contains("[anchor=aII][/anchor]Article II. Other\n[anchor=aII__b][/anchor](b) only"));

        let registry = DispatchRegistry::load(&dir.path().join("dispatch_config.toml")).unwrap();
        let owner = registry.owner("testopia").unwrap();
        assert_eq!(owner.len(), 3);
        assert_eq!(owner["laws/act"].title, "The Act");
    }

    #[tokio::test]
    async fn test_run_only_selected_without_registry() {
        let dir = TempDir::new().unwrap();
        let config = write_fixture(dir.path());

        let report = LawUpdater::new(config)
            .only(vec!["other".to_string()])
            .skip_registry(true)
            .run()
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.written.len(), 1);
        assert!(!dir.path().join("out/act.txt").exists());
        assert!(!dir.path().join("dispatch_config.toml").exists());
    }

    #[tokio::test]
    async fn test_run_missing_template_fails_law() {
        let dir = TempDir::new().unwrap();
        let config = write_fixture(dir.path());
        fs::remove_file(dir.path().join("template.txt")).unwrap();

        let report = LawUpdater::new(config).only(vec!["act".to_string()]).run().await.unwrap();

        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].error.contains("Could not find standard law dispatch template file"));
    }
}
