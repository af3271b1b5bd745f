//! Shared types used across all pipeline stages.
//!
//! These types flow from scan through assembly to rendering, and are
//! serialized to JSON by the `plan` subcommand so intermediate results can
//! be inspected.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::path::PathBuf;

/// A git author timestamp, as parsed from `git log --pretty=format:%aI`.
///
/// Kept offset-aware: the sitemap `<lastmod>` element reproduces the
/// author's original UTC offset rather than normalizing to UTC.
pub type Timestamp = DateTime<FixedOffset>;

/// Crawl frequency hint published in the sitemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Changefreq {
    Never,
    Yearly,
    Monthly,
    Weekly,
}

impl Changefreq {
    pub fn as_str(self) -> &'static str {
        match self {
            Changefreq::Never => "never",
            Changefreq::Yearly => "yearly",
            Changefreq::Monthly => "monthly",
            Changefreq::Weekly => "weekly",
        }
    }
}

/// The crawl-priority class of a canonical URL.
///
/// Derived purely from the URL string (see [`crate::metadata::class_of`]);
/// drives both the sitemap `<priority>` value and the changefreq rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityClass {
    Post,
    Category,
    About,
    Home,
    Other,
}

impl PriorityClass {
    pub fn as_str(self) -> &'static str {
        match self {
            PriorityClass::Post => "post",
            PriorityClass::Category => "category",
            PriorityClass::About => "about",
            PriorityClass::Home => "home",
            PriorityClass::Other => "other",
        }
    }
}

/// A file discovered under a repository root.
///
/// Created once by the scan stage and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ContentFile {
    /// Absolute path on disk.
    pub abs_path: PathBuf,
    /// Path relative to the repository root, forward slashes, leading `/`
    /// (`/posts/2024/hello.md`).
    pub rel_path: String,
    /// File size in bytes.
    pub size: u64,
}

/// One publishable page of the main site.
#[derive(Debug, Clone, Serialize)]
pub struct UrlEntry {
    /// Canonical URL path (`/` or `/#!/...`), the unique key of the mapping.
    pub url: String,
    /// Source files this entry's freshness depends on. One for most pages,
    /// two when the posts index contributes (root, home, category).
    pub sources: Vec<ContentFile>,
    /// Maximum of the sources' git timestamps; `None` when no source has
    /// any committed history.
    pub last_modified: Option<Timestamp>,
    pub class: PriorityClass,
    pub changefreq: Changefreq,
    pub priority: f32,
    /// Post entries only: first-line `#` heading, or the file stem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Post entries only: first markdown paragraph rendered to HTML, used
    /// as the feed item description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// One file of the netdisk mirror sitemap.
///
/// Netdisk entries are not deduplicated and carry no priority metadata;
/// the rendered changefreq is a constant `never`.
#[derive(Debug, Clone, Serialize)]
pub struct NetdiskEntry {
    /// URL path under the netdisk base URL (`/` or `/posts/...`).
    pub url: String,
    pub source: ContentFile,
    pub last_modified: Option<Timestamp>,
}
