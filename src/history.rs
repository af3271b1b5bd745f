//! Version-control history resolution.
//!
//! Answers one question per path: when did the most recent commit touch it?
//! The answer comes from `git log --pretty=format:%aI --max-count=1`, run
//! as a subprocess inside the repository checkout.
//!
//! Per-path failures are values, not errors: a path with no history, a
//! failed query, a timed-out subprocess or unparsable output all resolve to
//! `None`, and the caller publishes the entry without a `lastmod`. Only the
//! systemic case — git itself missing or broken — is an error, detected
//! once by [`probe`] before the pipeline starts so a broken environment
//! cannot silently produce an all-unknown sitemap.
//!
//! Git subprocesses are the dominant cost of a run. [`GitHistory`] caches
//! results per path and can batch-resolve distinct paths in parallel; the
//! cache is a keyed map, so resolution order never affects the outcome.

use crate::types::Timestamp;
use chrono::DateTime;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("git is not usable: {0}")]
    GitUnavailable(String),
}

/// Result of running one external process to completion.
#[derive(Debug)]
pub enum ProcessOutcome {
    Completed {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
    TimedOut,
    IoError(io::Error),
}

/// Run a command with a blocking wait bounded by `timeout`.
///
/// The child is waited on from a worker thread; this thread blocks on a
/// channel with `recv_timeout`. On timeout the worker thread is detached
/// and left to reap the process whenever it finishes.
pub fn run_command(
    program: &str,
    args: &[&str],
    cwd: &Path,
    timeout: Duration,
) -> ProcessOutcome {
    let child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let child = match child {
        Ok(child) => child,
        Err(e) => return ProcessOutcome::IoError(e),
    };

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // Receiver may be gone after a timeout; the send result is moot then.
        let _ = tx.send(child.wait_with_output());
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(output)) => ProcessOutcome::Completed {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
        Ok(Err(e)) => ProcessOutcome::IoError(e),
        Err(mpsc::RecvTimeoutError::Timeout | mpsc::RecvTimeoutError::Disconnected) => {
            ProcessOutcome::TimedOut
        }
    }
}

/// Run git with the given arguments inside `cwd`.
pub fn run_git(args: &[&str], cwd: &Path, timeout: Duration) -> ProcessOutcome {
    run_command("git", args, cwd, timeout)
}

/// Verify once that the git binary exists and answers.
///
/// Called before the pipeline starts; a failure here aborts the run.
pub fn probe(timeout: Duration) -> Result<(), HistoryError> {
    match run_git(&["--version"], Path::new("."), timeout) {
        ProcessOutcome::Completed { status, .. } if status.success() => Ok(()),
        ProcessOutcome::Completed { status, stderr, .. } => Err(HistoryError::GitUnavailable(
            format!("`git --version` exited with {status}: {}", stderr.trim()),
        )),
        ProcessOutcome::TimedOut => Err(HistoryError::GitUnavailable(
            "`git --version` timed out".to_string(),
        )),
        ProcessOutcome::IoError(e) => Err(HistoryError::GitUnavailable(e.to_string())),
    }
}

/// Cached last-modified lookups against one repository checkout.
pub struct GitHistory {
    repo_root: PathBuf,
    timeout: Duration,
    cache: HashMap<String, Option<Timestamp>>,
}

impl GitHistory {
    pub fn new(repo_root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            repo_root: repo_root.into(),
            timeout,
            cache: HashMap::new(),
        }
    }

    /// Author timestamp of the most recent commit touching `rel_path`
    /// (leading `/`), or `None` when the path has no usable history.
    pub fn last_modified(&mut self, rel_path: &str) -> Option<Timestamp> {
        if let Some(cached) = self.cache.get(rel_path) {
            return *cached;
        }
        let resolved = query_last_modified(&self.repo_root, rel_path, self.timeout);
        self.cache.insert(rel_path.to_string(), resolved);
        resolved
    }

    /// Resolve every not-yet-cached path in parallel.
    ///
    /// One git subprocess per distinct path, fanned out with rayon. The
    /// results land in the per-path cache, so completion order cannot
    /// influence anything downstream.
    pub fn resolve_all<'a>(&mut self, paths: impl IntoIterator<Item = &'a str>) {
        let pending: BTreeSet<&str> = paths
            .into_iter()
            .filter(|p| !self.cache.contains_key(*p))
            .collect();

        let resolved: Vec<(String, Option<Timestamp>)> = pending
            .into_par_iter()
            .map(|p| {
                (
                    p.to_string(),
                    query_last_modified(&self.repo_root, p, self.timeout),
                )
            })
            .collect();

        self.cache.extend(resolved);
    }
}

fn query_last_modified(repo_root: &Path, rel_path: &str, timeout: Duration) -> Option<Timestamp> {
    let path_arg = format!("./{}", rel_path.trim_start_matches('/'));
    let args = [
        "--no-pager",
        "log",
        "--pretty=format:%aI",
        "--max-count=1",
        "--",
        path_arg.as_str(),
    ];
    match run_git(&args, repo_root, timeout) {
        ProcessOutcome::Completed { status, stdout, .. } if status.success() => {
            let line = stdout.lines().next()?.trim();
            if line.is_empty() {
                return None;
            }
            DateTime::parse_from_rfc3339(line).ok()
        }
        // Failed, timed-out or unrunnable queries all mean "unknown", never
        // a fabricated time.
        _ => None,
    }
}
