//! CLI output formatting for all pipeline stages.
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ```text
//! -   1204 /index.html
//! -    593 /posts/2024/hello.md
//!
//! /                        home  weekly   2024-05-05T00:00:00+00:00
//! /#!/posts/2024/hello.md  post  monthly  2024-03-01T12:00:00+08:00
//! ```

use crate::assemble::MainSet;
use crate::scan::Listing;
use crate::types::NetdiskEntry;
use std::path::Path;

/// Format the scanned file listing: byte size and repo-relative path.
pub fn format_scan(listing: &Listing) -> Vec<String> {
    let mut lines = Vec::with_capacity(listing.files.len() + 2);
    for file in &listing.files {
        lines.push(format!("- {:>6} {}", file.size, file.rel_path));
    }
    for path in &listing.unmappable {
        lines.push(format!("! unmappable path skipped: {}", path.display()));
    }
    lines
}

/// Format the assembled main set: one aligned line per canonical URL.
pub fn format_plan(set: &MainSet) -> Vec<String> {
    let width = set
        .entries
        .keys()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(4);

    let mut lines = Vec::with_capacity(set.entries.len() + set.invalid.len());
    for entry in set.entries.values() {
        let lastmod = entry
            .last_modified
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string());
        lines.push(format!(
            "{:<width$}  {:<8}  {:<7}  {}",
            entry.url,
            entry.class.as_str(),
            entry.changefreq.as_str(),
            lastmod,
        ));
    }
    for rel in &set.invalid {
        lines.push(format!("! cannot form a URL, skipped: {rel}"));
    }
    lines
}

/// Format the end-of-run report.
pub fn format_build_report(
    set: &MainSet,
    feed_count: usize,
    netdisk: &[NetdiskEntry],
    outputs: &[&Path],
) -> Vec<String> {
    let unknown = set
        .entries
        .values()
        .filter(|e| e.last_modified.is_none())
        .count();

    let mut lines = vec![format!(
        "{} urls ({} unknown lastmod), {} feed items, {} netdisk urls",
        set.entries.len(),
        unknown,
        feed_count,
        netdisk.len(),
    )];
    for path in outputs {
        lines.push(format!("  wrote {}", path.display()));
    }
    lines
}

pub fn print_scan(listing: &Listing) {
    for line in format_scan(listing) {
        println!("{line}");
    }
}

pub fn print_plan(set: &MainSet) {
    for line in format_plan(set) {
        println!("{line}");
    }
}

pub fn print_build_report(
    set: &MainSet,
    feed_count: usize,
    netdisk: &[NetdiskEntry],
    outputs: &[&Path],
) {
    for line in format_build_report(set, feed_count, netdisk, outputs) {
        println!("{line}");
    }
}
