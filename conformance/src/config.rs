//! Run configuration: site layout, network settings, and per-run switches.
//!
//! Values come from built-in defaults, then an optional TOML file, then the
//! `SITECHECK_BASE_URL` / `SITECHECK_BASE_PATH` environment variables. The
//! command-line client applies its own flags last.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default timeout for a single reachability probe.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Identifying user agent sent with every probe.
pub const USER_AGENT: &str = concat!("sitecheck/", env!("CARGO_PKG_VERSION"));

/// Complete configuration for one run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QaConfig {
    /// Root directory of the site. Root-relative links resolve here.
    pub site_root: PathBuf,
    /// Content directory name, relative to `site_root`.
    pub content_dir: String,
    /// Manifest file name inside the content directory.
    pub manifest_file: String,
    /// Page file name inside each content item directory.
    pub page_file: String,
    /// Main index page, relative to `site_root`.
    pub main_index: String,
    /// Report artifact path, relative to `site_root` unless absolute.
    pub report_file: PathBuf,
    /// URL the site root is served at.
    pub base_url: String,
    /// Prefix stripped from root-relative links before resolving them.
    pub base_path: String,
    /// Hosts whose absolute links are probed rather than skipped.
    pub own_hosts: Vec<String>,
    /// Probe timeout in seconds.
    pub timeout_secs: u64,
    /// User agent header sent with probes.
    pub user_agent: String,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            site_root: PathBuf::from("public"),
            content_dir: "projects".to_string(),
            manifest_file: "index.json".to_string(),
            page_file: "index.html".to_string(),
            main_index: "index.html".to_string(),
            report_file: PathBuf::from("qa-report.html"),
            base_url: "http://localhost/".to_string(),
            base_path: String::new(),
            own_hosts: vec!["localhost".to_string()],
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl QaConfig {
    /// Loads configuration from an optional TOML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Applies environment overrides through the given lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("SITECHECK_BASE_URL").filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(prefix) = lookup("SITECHECK_BASE_PATH") {
            self.base_path = prefix;
        }
    }

    /// Directory holding one sub-directory per content item.
    pub fn content_path(&self) -> PathBuf {
        self.site_root.join(&self.content_dir)
    }

    /// Manifest file path.
    pub fn manifest_path(&self) -> PathBuf {
        self.content_path().join(&self.manifest_file)
    }

    /// Main index page path.
    pub fn main_index_path(&self) -> PathBuf {
        self.site_root.join(&self.main_index)
    }

    /// Report artifact path.
    pub fn report_path(&self) -> PathBuf {
        if self.report_file.is_absolute() {
            self.report_file.clone()
        } else {
            self.site_root.join(&self.report_file)
        }
    }

    /// Base URL with exactly one trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }

    /// Public URL of a content item's page.
    pub fn page_url(&self, item: &str) -> String {
        format!(
            "{}{}/{}/{}",
            self.base_url(),
            self.content_dir.trim_matches('/'),
            item,
            self.page_file
        )
    }

    /// Probe timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Host of the base URL, if it parses.
    pub fn base_host(&self) -> Option<String> {
        reqwest::Url::parse(&self.base_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
    }
}

/// Per-invocation switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Apply repair actions for fixable defects.
    pub fix: bool,
    /// Record passing sub-check details too.
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_paths() {
        let config = QaConfig::default();
        assert_eq!(config.content_path(), PathBuf::from("public/projects"));
        assert_eq!(
            config.manifest_path(),
            PathBuf::from("public/projects/index.json")
        );
        assert_eq!(config.main_index_path(), PathBuf::from("public/index.html"));
        assert_eq!(config.report_path(), PathBuf::from("public/qa-report.html"));
    }

    #[test]
    fn page_url_joins_segments() {
        let config = QaConfig {
            base_url: "http://site.test/docs".to_string(),
            ..QaConfig::default()
        };
        assert_eq!(
            config.page_url("item-2"),
            "http://site.test/docs/projects/item-2/index.html"
        );
        assert_eq!(config.base_host().as_deref(), Some("site.test"));
    }

    #[test]
    fn toml_overrides_defaults() {
        let config: QaConfig = toml::from_str(
            r#"
            site_root = "site"
            own_hosts = ["example.org"]
            timeout_secs = 3
            "#,
        )
        .expect("parse");
        assert_eq!(config.site_root, PathBuf::from("site"));
        assert_eq!(config.own_hosts, vec!["example.org".to_string()]);
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.manifest_file, "index.json");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let parsed: Result<QaConfig, _> = toml::from_str("bogus = 1");
        assert!(parsed.is_err());
    }

    #[test]
    fn env_overrides_base_url() {
        let mut config = QaConfig::default();
        config.apply_env(|key| match key {
            "SITECHECK_BASE_URL" => Some("https://cdn.test/".to_string()),
            "SITECHECK_BASE_PATH" => Some("/site".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url, "https://cdn.test/");
        assert_eq!(config.base_path, "/site");
    }
}
