//! Repository synchronization.
//!
//! Keeps a local checkout of each content repository current before a run:
//! a fresh destination is cloned, an existing one is hard-reset to the
//! remote's `FETCH_HEAD`. Local edits inside the run directory are
//! disposable by definition, so the reset is unconditional.

use crate::history::{ProcessOutcome, run_git};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("git {op} failed with {status}: {stderr}")]
    GitFailed {
        op: &'static str,
        status: String,
        stderr: String,
    },
    #[error("git {op} timed out")]
    TimedOut { op: &'static str },
    #[error("git {op} could not start: {source}")]
    Spawn {
        op: &'static str,
        source: std::io::Error,
    },
}

/// Clone `remote` into `dest`, or update an existing checkout in place.
pub fn sync_repo(remote: &str, dest: &Path, timeout: Duration) -> Result<(), SyncError> {
    if dest.is_dir() {
        run_checked(&["fetch", "origin"], dest, timeout, "fetch")?;
        run_checked(&["reset", "--hard", "FETCH_HEAD"], dest, timeout, "reset")?;
        return Ok(());
    }

    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;
    let dest_str = dest.to_str().ok_or_else(|| {
        SyncError::Io(std::io::Error::other("destination path is not valid UTF-8"))
    })?;
    run_checked(&["clone", "--quiet", remote, dest_str], parent, timeout, "clone")
}

fn run_checked(
    args: &[&str],
    cwd: &Path,
    timeout: Duration,
    op: &'static str,
) -> Result<(), SyncError> {
    match run_git(args, cwd, timeout) {
        ProcessOutcome::Completed { status, .. } if status.success() => Ok(()),
        ProcessOutcome::Completed { status, stderr, .. } => Err(SyncError::GitFailed {
            op,
            status: status.to_string(),
            stderr: stderr.trim().to_string(),
        }),
        ProcessOutcome::TimedOut => Err(SyncError::TimedOut { op }),
        ProcessOutcome::IoError(e) => Err(SyncError::Spawn { op, source: e }),
    }
}
