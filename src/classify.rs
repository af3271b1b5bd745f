//! Path classification: which files become public URLs, and which URL.
//!
//! The blog front end is a single-page application: the server only ever
//! serves `/`, and every other page is a client-side route addressed with a
//! hash-bang fragment (`/#!/posts/2024/hello.md`). Classification therefore
//! rewrites repository paths into that routed form, while the netdisk
//! mirror — a plain file index — publishes paths verbatim.
//!
//! Classification depends only on the path string, never on file contents.
//! The rewrite rules for the main site, applied in order:
//!
//! 1. Asset and hidden paths are skipped: `.css`, `.js`, `.json` suffixes,
//!    or any path segment starting with `.`.
//! 2. Extension normalization: `.md` kept verbatim; `/home.html` skipped
//!    (duplicate of the index); `/index.html` becomes the site root `/`;
//!    any other `.html` has the extension stripped.
//! 3. Bodies `/`, `/home` and `/category` are rendered by the SPA from
//!    `posts/index.json`, so their freshness must also track that file.
//! 4. Every body except exactly `/` gets the `/#!` routing marker.
//!
//! ```text
//! /index.html            → /                      (+ posts index dep)
//! /home.html             → skipped
//! /about.html            → /#!/about
//! /posts/2024/hello.md   → /#!/posts/2024/hello.md
//! /style.css             → skipped
//! ```

/// Routing marker prefixed onto every non-root canonical URL.
pub const ROUTING_MARKER: &str = "/#!";

/// Repository path of the posts index the SPA renders listings from.
pub const POST_INDEX_PATH: &str = "/posts/index.json";

/// Outcome of classifying one repository path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Never published (assets, hidden files, known duplicates).
    Skip,
    /// Cannot form a valid URL; skipped and reported, never fatal.
    Invalid,
    /// Published at `url`.
    Publish {
        url: String,
        /// Freshness must also consider [`POST_INDEX_PATH`].
        needs_post_index: bool,
    },
}

/// Classify a root-relative path (leading `/`) for the main site.
pub fn classify(rel_path: &str) -> Classification {
    // Rule 1: assets and hidden segments
    if rel_path.ends_with(".css") || rel_path.ends_with(".js") || rel_path.ends_with(".json") {
        return Classification::Skip;
    }
    if has_hidden_segment(rel_path) {
        return Classification::Skip;
    }

    // Rule 2: extension normalization
    let body = if rel_path.ends_with(".md") {
        rel_path.to_string()
    } else if rel_path == "/home.html" {
        return Classification::Skip;
    } else if rel_path == "/index.html" {
        "/".to_string()
    } else if let Some(stripped) = rel_path.strip_suffix(".html") {
        stripped.to_string()
    } else {
        rel_path.to_string()
    };

    if !is_url_safe(&body) {
        return Classification::Invalid;
    }

    // Rule 3: pages the SPA renders from the posts index
    let needs_post_index = matches!(body.as_str(), "/" | "/home" | "/category");

    // Rule 4: routing marker for everything but the root
    let url = if body == "/" {
        body
    } else {
        format!("{ROUTING_MARKER}{body}")
    };

    Classification::Publish {
        url,
        needs_post_index,
    }
}

/// Classify a root-relative path for the netdisk mirror.
///
/// Only self-created resources are published: anything under `/posts/`,
/// plus `.html` pages. The URL is the path verbatim except for the
/// `index.html → /` root substitution; no routing marker, no asset filter.
pub fn classify_netdisk(rel_path: &str) -> Option<String> {
    if !rel_path.starts_with("/posts/") && !rel_path.ends_with(".html") {
        return None;
    }
    if !is_url_safe(rel_path) {
        return None;
    }
    if rel_path == "/index.html" {
        Some("/".to_string())
    } else {
        Some(rel_path.to_string())
    }
}

fn has_hidden_segment(rel_path: &str) -> bool {
    rel_path
        .split('/')
        .any(|segment| segment.starts_with('.'))
}

/// A body is URL-safe when it contains no whitespace or control characters.
/// Anything else survives percent-encoding at render time.
fn is_url_safe(body: &str) -> bool {
    !body.chars().any(|c| c.is_whitespace() || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_of(rel_path: &str) -> String {
        match classify(rel_path) {
            Classification::Publish { url, .. } => url,
            other => panic!("expected Publish for {rel_path}, got {other:?}"),
        }
    }

    #[test]
    fn assets_are_skipped() {
        assert_eq!(classify("/style.css"), Classification::Skip);
        assert_eq!(classify("/js/app.js"), Classification::Skip);
        assert_eq!(classify("/posts/index.json"), Classification::Skip);
    }

    #[test]
    fn hidden_segments_are_skipped() {
        assert_eq!(classify("/.nojekyll"), Classification::Skip);
        assert_eq!(classify("/.well-known/security.txt"), Classification::Skip);
        assert_eq!(classify("/posts/.draft.md"), Classification::Skip);
    }

    #[test]
    fn index_maps_to_root() {
        assert_eq!(
            classify("/index.html"),
            Classification::Publish {
                url: "/".to_string(),
                needs_post_index: true,
            }
        );
    }

    #[test]
    fn home_is_a_duplicate_of_index() {
        assert_eq!(classify("/home.html"), Classification::Skip);
    }

    #[test]
    fn html_extension_is_stripped() {
        assert_eq!(url_of("/about.html"), "/#!/about");
        assert_eq!(url_of("/category.html"), "/#!/category");
    }

    #[test]
    fn markdown_paths_kept_verbatim() {
        assert_eq!(url_of("/posts/2024/hello.md"), "/#!/posts/2024/hello.md");
    }

    #[test]
    fn other_extensions_kept_verbatim() {
        assert_eq!(url_of("/posts/cover.png"), "/#!/posts/cover.png");
    }

    #[test]
    fn non_root_urls_carry_the_routing_marker() {
        for rel in ["/about.html", "/posts/2024/a.md", "/misc.txt"] {
            assert!(url_of(rel).starts_with(ROUTING_MARKER), "{rel}");
        }
        assert_eq!(url_of("/index.html"), "/");
    }

    #[test]
    fn category_depends_on_post_index() {
        for rel in ["/index.html", "/category.html"] {
            match classify(rel) {
                Classification::Publish {
                    needs_post_index, ..
                } => assert!(needs_post_index, "{rel}"),
                other => panic!("expected Publish for {rel}, got {other:?}"),
            }
        }
        match classify("/about.html") {
            Classification::Publish {
                needs_post_index, ..
            } => assert!(!needs_post_index),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn whitespace_paths_are_invalid() {
        assert_eq!(classify("/my page.html"), Classification::Invalid);
        assert_eq!(classify("/posts/a\tb.md"), Classification::Invalid);
    }

    #[test]
    fn netdisk_publishes_posts_and_html_only() {
        assert_eq!(
            classify_netdisk("/posts/archive.zip").as_deref(),
            Some("/posts/archive.zip")
        );
        assert_eq!(
            classify_netdisk("/posts/data.json").as_deref(),
            Some("/posts/data.json")
        );
        assert_eq!(
            classify_netdisk("/viewer.html").as_deref(),
            Some("/viewer.html")
        );
        assert_eq!(classify_netdisk("/README.txt"), None);
    }

    #[test]
    fn netdisk_root_substitution() {
        assert_eq!(classify_netdisk("/index.html").as_deref(), Some("/"));
    }

    #[test]
    fn netdisk_applies_no_marker() {
        let url = classify_netdisk("/posts/file.bin").unwrap();
        assert!(!url.contains("#!"));
    }
}
