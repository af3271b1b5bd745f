//! URL-set assembly.
//!
//! Composes the classifier, the history resolver and the metadata rules
//! into the final URL-entry collections handed to rendering:
//!
//! - the main set, a mapping keyed by canonical URL. Keys are unique;
//!   when two files map to the same URL the later one in traversal order
//!   overwrites the earlier (last-write-wins, the site's long-standing
//!   behavior for e.g. an extensionless page next to its `.html` twin).
//! - the netdisk set, a plain sequence in traversal order, one entry per
//!   published file, not deduplicated.
//!
//! All distinct source paths are batch-resolved against git up front, so
//! the per-entry work below is pure lookup.

use crate::classify::{self, Classification, POST_INDEX_PATH};
use crate::history::GitHistory;
use crate::metadata;
use crate::types::{ContentFile, NetdiskEntry, PriorityClass, UrlEntry};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Assembled main-site URL set.
#[derive(Debug)]
pub struct MainSet {
    /// Canonical URL → entry. BTreeMap keying makes output ordering
    /// deterministic regardless of traversal or resolution order.
    pub entries: BTreeMap<String, UrlEntry>,
    /// Relative paths that could not form a valid URL; reported, not fatal.
    pub invalid: Vec<String>,
}

/// Build the main-site URL set from a scanned file listing.
pub fn build_main_set(
    files: &[ContentFile],
    repo_root: &Path,
    history: &mut GitHistory,
    current_year: i32,
) -> MainSet {
    let mut publishes: Vec<(&ContentFile, String, bool)> = Vec::new();
    let mut invalid = Vec::new();

    for file in files {
        match classify::classify(&file.rel_path) {
            Classification::Skip => {}
            Classification::Invalid => invalid.push(file.rel_path.clone()),
            Classification::Publish {
                url,
                needs_post_index,
            } => publishes.push((file, url, needs_post_index)),
        }
    }

    let needs_index = publishes.iter().any(|(_, _, needs)| *needs);
    history.resolve_all(
        publishes
            .iter()
            .map(|(file, _, _)| file.rel_path.as_str())
            .chain(needs_index.then_some(POST_INDEX_PATH)),
    );

    let post_index = post_index_file(repo_root);

    let mut entries = BTreeMap::new();
    for (file, url, needs_post_index) in publishes {
        let mut sources = vec![file.clone()];
        if needs_post_index {
            sources.push(post_index.clone());
        }

        let last_modified = sources
            .iter()
            .filter_map(|s| history.last_modified(&s.rel_path))
            .max();

        let class = metadata::class_of(&url);
        let changefreq = metadata::changefreq(&url, class, current_year);
        let priority = metadata::priority(class);
        let (title, summary) = if class == PriorityClass::Post {
            (
                Some(metadata::post_title(file)),
                metadata::post_summary(file),
            )
        } else {
            (None, None)
        };

        entries.insert(
            url.clone(),
            UrlEntry {
                url,
                sources,
                last_modified,
                class,
                changefreq,
                priority,
                title,
                summary,
            },
        );
    }

    MainSet { entries, invalid }
}

/// Feed view of the main set: post entries only.
pub fn feed_entries(entries: &BTreeMap<String, UrlEntry>) -> Vec<&UrlEntry> {
    entries
        .values()
        .filter(|e| e.class == PriorityClass::Post)
        .collect()
}

/// Build the netdisk mirror's URL sequence.
pub fn build_netdisk_set(files: &[ContentFile], history: &mut GitHistory) -> Vec<NetdiskEntry> {
    let published: Vec<(&ContentFile, String)> = files
        .iter()
        .filter_map(|f| classify::classify_netdisk(&f.rel_path).map(|url| (f, url)))
        .collect();

    history.resolve_all(published.iter().map(|(file, _)| file.rel_path.as_str()));

    published
        .into_iter()
        .map(|(file, url)| NetdiskEntry {
            url,
            source: file.clone(),
            last_modified: history.last_modified(&file.rel_path),
        })
        .collect()
}

/// The posts index as a source file, whether or not it exists on disk.
/// A missing index simply contributes no timestamp.
fn post_index_file(repo_root: &Path) -> ContentFile {
    let abs_path = repo_root.join("posts/index.json");
    let size = fs::metadata(&abs_path).map(|m| m.len()).unwrap_or(0);
    ContentFile {
        abs_path,
        rel_path: POST_INDEX_PATH.to_string(),
        size,
    }
}
