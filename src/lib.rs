//! # blogmap
//!
//! Sitemap and RSS feed generator for a git-backed blog and its netdisk
//! mirror. The blog is a single-page application whose content lives in a
//! plain git repository; blogmap turns a checkout of that repository into
//! `sitemap.xml` and `feed.xml`, and a second checkout into the mirror's
//! `ndsitemap.xml`.
//!
//! # Architecture: Linear Pipeline
//!
//! ```text
//! 1. sync      remote → run/repo        (clone or fetch+reset)
//! 2. scan      checkout → file listing
//! 3. assemble  listing → url entries    (classify, git history, metadata)
//! 4. render    entries → xml documents  (atomic writes)
//! ```
//!
//! The interesting decisions all live in stage 3: which files become
//! public URLs, what canonical URL each maps to, which commits define an
//! entry's freshness, and what crawl-priority class it falls into. The
//! stages around it are deliberately thin.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `blogmap.toml` loading and validation |
//! | [`scan`] | working-tree walk producing the file listing |
//! | [`classify`] | path → canonical-URL rewrite rules, main and netdisk variants |
//! | [`history`] | git subprocess plumbing and per-path last-modified lookups |
//! | [`sync`] | clone-or-update of the content repositories |
//! | [`metadata`] | priority class, changefreq, post title and summary extraction |
//! | [`assemble`] | composes classifier + history + metadata into URL sets |
//! | [`render`] | sitemap XML and RSS serialization, atomic output writes |
//! | [`output`] | CLI report formatting |
//! | [`types`] | shared vocabulary between the stages |
//!
//! # Design Decisions
//!
//! ## Freshness comes from git, not mtimes
//!
//! File modification times are meaningless after a clone or reset, so an
//! entry's `<lastmod>` is the author timestamp of the newest commit
//! touching any of its source files. A path with no usable history keeps
//! an *unknown* freshness and simply publishes without `<lastmod>` —
//! fabricating "now" would tell crawlers every page just changed.
//!
//! ## One subprocess per path, bounded
//!
//! History lookups shell out to `git log` once per distinct path, cached,
//! optionally fanned out in parallel, and each query is bounded by a
//! configured timeout. Only a missing git binary aborts a run; it is
//! detected once, up front.
//!
//! ## Whole-run atomicity
//!
//! Output documents are rendered fully in memory and written via temp
//! file + rename. A run either completes or leaves the previous outputs
//! untouched; there is no partially-written sitemap state to resume from,
//! and a failed run is simply re-run against a fresh sync.

pub mod assemble;
pub mod classify;
pub mod config;
pub mod history;
pub mod metadata;
pub mod output;
pub mod render;
pub mod scan;
pub mod sync;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
