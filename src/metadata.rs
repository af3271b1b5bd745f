//! Crawl-priority metadata and post content extraction.
//!
//! Two independent rule sets live here:
//!
//! - **URL rules** ([`class_of`], [`changefreq`], [`priority`]): pure
//!   functions of the canonical URL string. Every URL maps to exactly one
//!   [`PriorityClass`], which fixes its sitemap priority; posts also get a
//!   recency-based changefreq.
//! - **Content rules** ([`post_title`], [`post_summary`]): best-effort reads
//!   of a post's markdown source for the feed. Read failures never abort a
//!   run — the title falls back to the file stem and the summary is dropped.
//!
//! ## Post recency
//!
//! A post's changefreq is derived from whether the URL text contains the
//! current calendar year (monthly), the previous one (yearly), or neither
//! (never). This is a plain substring match against the URL: a slug like
//! `2024-retrospective` counts as "this year" even if it was committed
//! earlier. Kept as-is — the published values are advisory hints, and the
//! site's post paths embed their year by convention.

use crate::types::{Changefreq, ContentFile, PriorityClass};
use pulldown_cmark::{Parser, html};
use std::fs;
use std::path::Path;

/// Classify a canonical URL. Total and deterministic: depends only on the
/// URL string, with prefix rules checked in precedence order.
pub fn class_of(url: &str) -> PriorityClass {
    if url.starts_with("/#!/posts") {
        PriorityClass::Post
    } else if url.starts_with("/#!/category") {
        PriorityClass::Category
    } else if url.starts_with("/#!/about") {
        PriorityClass::About
    } else if url == "/" {
        PriorityClass::Home
    } else {
        PriorityClass::Other
    }
}

/// Update-frequency hint for a canonical URL.
///
/// `current_year` is injected by the caller (read from the clock once per
/// run) so the rule itself stays clock-free.
pub fn changefreq(url: &str, class: PriorityClass, current_year: i32) -> Changefreq {
    match class {
        PriorityClass::Post => {
            if url.contains(&current_year.to_string()) {
                Changefreq::Monthly
            } else if url.contains(&(current_year - 1).to_string()) {
                Changefreq::Yearly
            } else {
                Changefreq::Never
            }
        }
        PriorityClass::About => Changefreq::Monthly,
        PriorityClass::Category | PriorityClass::Home | PriorityClass::Other => Changefreq::Weekly,
    }
}

/// Fixed sitemap priority per class.
pub fn priority(class: PriorityClass) -> f32 {
    match class {
        PriorityClass::Post => 0.9,
        PriorityClass::Category => 0.7,
        PriorityClass::About => 0.8,
        PriorityClass::Home => 1.0,
        PriorityClass::Other => 0.5,
    }
}

/// Human-readable title of a post.
///
/// The first line of the source, if it is a level-1 heading; otherwise the
/// file's base name with any `.md` suffix removed. Unreadable files take
/// the same fallback.
pub fn post_title(file: &ContentFile) -> String {
    if let Ok(content) = fs::read_to_string(&file.abs_path)
        && let Some(rest) = content.lines().next().and_then(|l| l.strip_prefix("# "))
    {
        return rest.trim().to_string();
    }
    stem_title(file)
}

fn stem_title(file: &ContentFile) -> String {
    let name = Path::new(&file.rel_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.rel_path.clone());
    name.strip_suffix(".md").unwrap_or(&name).to_string()
}

/// First markdown paragraph of a post, rendered to HTML for the feed item
/// description. `None` when the file is unreadable or has no paragraph.
pub fn post_summary(file: &ContentFile) -> Option<String> {
    let content = fs::read_to_string(&file.abs_path).ok()?;
    let paragraph = first_paragraph(&content)?;
    let mut rendered = String::new();
    html::push_html(&mut rendered, Parser::new(paragraph));
    let rendered = rendered.trim().to_string();
    (!rendered.is_empty()).then_some(rendered)
}

/// First blank-line-delimited block that is not a heading.
fn first_paragraph(content: &str) -> Option<&str> {
    content
        .split("\n\n")
        .map(str::trim)
        .find(|block| !block.is_empty() && !block.starts_with('#'))
}
