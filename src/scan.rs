//! Working-tree scanning.
//!
//! First stage of the pipeline. Walks a materialized repository checkout
//! and produces the flat file listing that classification and assembly
//! consume. The walk is deterministic (sorted by file name) so repeated
//! runs over an unchanged tree list files in the same order.
//!
//! Dot-entries (`.git/`, `.github/`, dotfiles) are pruned during the walk;
//! they can never become public URLs. Paths that are not valid UTF-8 cannot
//! be mapped to a URL at all — they are collected separately so the caller
//! can report them without aborting the run.

use crate::types::ContentFile;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Result of scanning one repository checkout.
#[derive(Debug)]
pub struct Listing {
    /// Files in sorted traversal order.
    pub files: Vec<ContentFile>,
    /// Paths whose components are not valid UTF-8; skipped, never fatal.
    pub unmappable: Vec<PathBuf>,
}

/// Walk `root` and list every file outside dot-directories.
pub fn scan(root: &Path) -> Result<Listing, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut unmappable = Vec::new();

    // Depth 0 is the root itself; its name (e.g. a dot-prefixed temp dir)
    // must not prune the walk.
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let abs_path = entry.path().to_path_buf();
        let rel = abs_path.strip_prefix(root).unwrap_or(&abs_path);
        let Some(rel_path) = relative_url_path(rel) else {
            unmappable.push(abs_path);
            continue;
        };
        let size = entry.metadata()?.len();
        files.push(ContentFile {
            abs_path,
            rel_path,
            size,
        });
    }

    Ok(Listing { files, unmappable })
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// Convert a root-relative path to its URL-shaped string form:
/// forward slashes, leading `/`. `None` if any component is not UTF-8.
fn relative_url_path(rel: &Path) -> Option<String> {
    let mut out = String::new();
    for component in rel.components() {
        out.push('/');
        out.push_str(component.as_os_str().to_str()?);
    }
    Some(out)
}
