//! Configuration module.
//!
//! Handles loading and validating `blogmap.toml`. Everything the pipeline
//! needs — site base URLs, repository remotes, run-directory layout, feed
//! channel metadata — is carried in one explicit [`Config`] value passed
//! into the pipeline; there is no process-wide mutable state.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [blog]
//! url = "https://sess.xhustudio.eu.org"          # Base URL of the blog SPA
//! repo = "https://github.com/SessionHu/blogtest" # Content repository remote
//!
//! [netdisk]
//! url = "https://netdisk.xhustudio.eu.org"
//! repo = "https://github.com/SessionHu/gh-netdisk"
//!
//! [run]
//! dir = "run"                    # Working directory for clones and outputs
//! sitemap = "sitemap.xml"        # Output filenames, relative to run.dir
//! feed = "feed.xml"
//! netdisk_sitemap = "ndsitemap.xml"
//!
//! [feed]
//! title = "SЕSSのB10GТЕ5Т"
//! description = "Session的个人博客, ..."
//! language = "zh-CN"
//! copyright_since = 2024         # First year of the copyright range
//! copyright_holder = "SessionHu"
//!
//! [history]
//! timeout_secs = 30              # Upper bound for a single git query
//! ```
//!
//! Config files are sparse — override just the values you want. The only
//! exception: a `[blog]` or `[netdisk]` section, when present, must carry
//! both of its keys. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration loaded from `blogmap.toml`.
///
/// All fields have defaults matching the production deployment, so a
/// missing config file is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub blog: SiteSection,
    pub netdisk: SiteSection,
    pub run: RunSection,
    pub feed: FeedSection,
    pub history: HistorySection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blog: SiteSection {
                url: "https://sess.xhustudio.eu.org".into(),
                repo: "https://github.com/SessionHu/blogtest".into(),
            },
            netdisk: SiteSection {
                url: "https://netdisk.xhustudio.eu.org".into(),
                repo: "https://github.com/SessionHu/gh-netdisk".into(),
            },
            run: RunSection::default(),
            feed: FeedSection::default(),
            history: HistorySection::default(),
        }
    }
}

/// One target site: where it is served and where its content lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Base URL prefixed onto every canonical URL path. No trailing slash.
    pub url: String,
    /// Git remote of the content repository.
    pub repo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSection {
    /// Working directory holding the repository clones and output files.
    pub dir: PathBuf,
    pub sitemap: String,
    pub feed: String,
    pub netdisk_sitemap: String,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("run"),
            sitemap: "sitemap.xml".into(),
            feed: "feed.xml".into(),
            netdisk_sitemap: "ndsitemap.xml".into(),
        }
    }
}

/// RSS channel metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedSection {
    pub title: String,
    pub description: String,
    pub language: String,
    /// First year of the copyright notice. Rendered as `2024` while the
    /// current year matches, `2024-2026` afterwards.
    pub copyright_since: i32,
    pub copyright_holder: String,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            title: "SЕSSのB10GТЕ5Т".into(),
            description: "Session的个人博客, 这里有各种类型的有趣的文章内容, 网站基于纯前端构建.".into(),
            language: "zh-CN".into(),
            copyright_since: 2024,
            copyright_holder: "SessionHu".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistorySection {
    /// Upper bound, in seconds, for one git subprocess to complete.
    pub timeout_secs: u64,
}

impl Default for HistorySection {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Config {
    /// Validate config values are usable before the pipeline starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, site) in [("blog", &self.blog), ("netdisk", &self.netdisk)] {
            if !site.url.starts_with("http://") && !site.url.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "{name}.url must be an absolute http(s) URL"
                )));
            }
            if site.url.ends_with('/') {
                return Err(ConfigError::Validation(format!(
                    "{name}.url must not end with a slash"
                )));
            }
            if site.repo.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{name}.repo must not be empty"
                )));
            }
        }
        if self.feed.title.trim().is_empty() {
            return Err(ConfigError::Validation("feed.title must not be empty".into()));
        }
        if self.history.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "history.timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Clone destination for the blog content repository.
    pub fn blog_repo_dir(&self) -> PathBuf {
        self.run.dir.join("repo")
    }

    /// Clone destination for the netdisk repository.
    pub fn netdisk_repo_dir(&self) -> PathBuf {
        self.run.dir.join("ndrepo")
    }

    pub fn sitemap_path(&self) -> PathBuf {
        self.run.dir.join(&self.run.sitemap)
    }

    pub fn feed_path(&self) -> PathBuf {
        self.run.dir.join(&self.run.feed)
    }

    pub fn netdisk_sitemap_path(&self) -> PathBuf {
        self.run.dir.join(&self.run.netdisk_sitemap)
    }
}

/// Load configuration from the given path, or defaults if it doesn't exist.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Stock `blogmap.toml` with all options documented, for `gen-config`.
pub fn stock_config_toml() -> String {
    let defaults = Config::default();
    format!(
        r#"# blogmap configuration
# All options are optional - the values below are the defaults.

[blog]
# Base URL of the blog SPA. Prefixed onto every canonical URL. No trailing slash.
url = "{blog_url}"
# Git remote of the blog content repository.
repo = "{blog_repo}"

[netdisk]
url = "{nd_url}"
repo = "{nd_repo}"

[run]
# Working directory holding the repository clones and output files.
dir = "run"
# Output filenames, relative to run.dir.
sitemap = "sitemap.xml"
feed = "feed.xml"
netdisk_sitemap = "ndsitemap.xml"

[feed]
title = "{feed_title}"
description = "{feed_desc}"
language = "{feed_lang}"
# Copyright notice: "2024 Holder" while the year matches, "2024-2026 Holder" after.
copyright_since = {since}
copyright_holder = "{holder}"

[history]
# Upper bound, in seconds, for a single git query. A hung query counts as
# unknown history for that path.
timeout_secs = 30
"#,
        blog_url = defaults.blog.url,
        blog_repo = defaults.blog.repo,
        nd_url = defaults.netdisk.url,
        nd_repo = defaults.netdisk.repo,
        feed_title = defaults.feed.title,
        feed_desc = defaults.feed.description,
        feed_lang = defaults.feed.language,
        since = defaults.feed.copyright_since,
        holder = defaults.feed.copyright_holder,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("blogmap.toml")).unwrap();
        assert_eq!(config.run.sitemap, "sitemap.xml");
        assert_eq!(config.history.timeout_secs, 30);
    }

    #[test]
    fn partial_config_overrides_one_value() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blogmap.toml");
        fs::write(&path, "[blog]\nurl = \"https://example.org\"\nrepo = \"https://example.org/repo.git\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.blog.url, "https://example.org");
        // Untouched sections keep their defaults
        assert_eq!(config.netdisk.url, "https://netdisk.xhustudio.eu.org");
    }

    #[test]
    fn unknown_keys_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blogmap.toml");
        fs::write(&path, "[run]\ndirr = \"oops\"\n").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn trailing_slash_url_rejected() {
        let mut config = Config::default();
        config.blog.url = "https://example.org/".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn relative_url_rejected() {
        let mut config = Config::default();
        config.netdisk.url = "netdisk.example.org".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = Config::default();
        config.history.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_parses_back() {
        let config: Config = toml::from_str(&stock_config_toml()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.feed.copyright_since, 2024);
    }

    #[test]
    fn derived_paths_live_under_run_dir() {
        let config = Config::default();
        assert_eq!(config.blog_repo_dir(), PathBuf::from("run/repo"));
        assert_eq!(config.netdisk_repo_dir(), PathBuf::from("run/ndrepo"));
        assert_eq!(config.sitemap_path(), PathBuf::from("run/sitemap.xml"));
    }
}
