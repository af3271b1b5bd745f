//! Shared test utilities for the blogmap test suite.
//!
//! History behavior is exercised against real throwaway git repositories:
//! [`init_repo`] creates one, [`commit_all`] commits its working tree with a
//! pinned author date, so lookups resolve to known timestamps no matter when
//! the suite runs.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let repo = init_repo();
//! touch(repo.path(), "posts/2024/hello.md", "# Hello World");
//! commit_all(repo.path(), "first post", "2024-03-01T12:00:00+08:00");
//! ```

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Write `contents` to `root/rel`, creating parent directories as needed.
pub fn touch(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Run a git command in `dir` and assert it succeeded.
pub fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("git must be runnable in tests");
    assert!(status.success(), "git {args:?} failed");
}

/// Fresh empty repository in a temp directory.
pub fn init_repo() -> TempDir {
    let tmp = TempDir::new().unwrap();
    git(tmp.path(), &["init", "-q"]);
    tmp
}

/// Stage and commit the whole working tree with a pinned author date.
///
/// Identity comes from `-c` overrides so the suite never depends on (or
/// touches) the developer's git config.
pub fn commit_all(dir: &Path, message: &str, author_date: &str) {
    git(dir, &["add", "-A"]);
    let status = Command::new("git")
        .args([
            "-c",
            "user.name=test",
            "-c",
            "user.email=test@example.org",
            "commit",
            "-q",
            "-m",
            message,
        ])
        .env("GIT_AUTHOR_DATE", author_date)
        .env("GIT_COMMITTER_DATE", author_date)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success());
}
