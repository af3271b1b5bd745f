//! Document rendering: sitemap XML and RSS 2.0.
//!
//! Takes the assembled URL collections and owns everything about their
//! serialized form — element names, date formats, escaping, and the output
//! files themselves. Core assembly never touches markup.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.org/#!/about</loc>
//!     <lastmod>2024-05-05T00:00:00+00:00</lastmod>
//!     <changefreq>monthly</changefreq>
//!     <priority>0.8</priority>
//!   </url>
//! </urlset>
//! ```
//!
//! An unknown last-modified time omits `<lastmod>` entirely; readers treat
//! a missing element as "no claim", which is exactly the semantics.
//!
//! Output files are written atomically (temp file, then rename) so an
//! interrupted run can never leave a truncated document behind.

use crate::config::FeedSection;
use crate::types::{NetdiskEntry, Timestamp, UrlEntry};
use rss::extension::atom::{self, AtomExtension};
use rss::validation::Validate;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("feed validation failed: {0}")]
    InvalidFeed(String),
}

/// Render the main-site sitemap.
pub fn sitemap_xml<'a>(entries: impl IntoIterator<Item = &'a UrlEntry>, base_url: &str) -> String {
    let mut xml = String::with_capacity(4096);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n");

    for entry in entries {
        xml.push_str("  <url>\n    <loc>");
        xml.push_str(&escape_xml(&format!("{base_url}{}", entry.url)));
        xml.push_str("</loc>\n");
        if let Some(lastmod) = entry.last_modified {
            xml.push_str("    <lastmod>");
            xml.push_str(&lastmod.to_rfc3339());
            xml.push_str("</lastmod>\n");
        }
        xml.push_str("    <changefreq>");
        xml.push_str(entry.changefreq.as_str());
        xml.push_str("</changefreq>\n    <priority>");
        xml.push_str(&format!("{:.1}", entry.priority));
        xml.push_str("</priority>\n  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Render the netdisk mirror sitemap: no priority, constant `never`.
pub fn netdisk_sitemap_xml(entries: &[NetdiskEntry], base_url: &str) -> String {
    let mut xml = String::with_capacity(4096);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n");

    for entry in entries {
        xml.push_str("  <url>\n    <loc>");
        xml.push_str(&escape_xml(&format!("{base_url}{}", entry.url)));
        xml.push_str("</loc>\n");
        if let Some(lastmod) = entry.last_modified {
            xml.push_str("    <lastmod>");
            xml.push_str(&lastmod.to_rfc3339());
            xml.push_str("</lastmod>\n");
        }
        xml.push_str("    <changefreq>never</changefreq>\n  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Render the RSS 2.0 feed from the post entries of the main set.
///
/// `feed_url` is the public URL of the feed document itself, advertised
/// through an `atom:link rel="self"` element on the channel.
pub fn feed_xml(
    posts: &[&UrlEntry],
    feed: &FeedSection,
    base_url: &str,
    feed_url: &str,
    current_year: i32,
) -> Result<String, RenderError> {
    let items: Vec<rss::Item> = posts.iter().map(|post| post_to_item(post, base_url)).collect();

    let channel = ChannelBuilder::default()
        .title(&feed.title)
        .link(format!("{base_url}/"))
        .description(&feed.description)
        .language(feed.language.clone())
        .copyright(copyright_line(feed, current_year))
        .generator("blogmap".to_string())
        .atom_ext(feed_self_link(feed_url))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| RenderError::InvalidFeed(e.to_string()))?;
    Ok(channel.to_string())
}

fn feed_self_link(feed_url: &str) -> AtomExtension {
    AtomExtension {
        links: vec![atom::Link {
            href: feed_url.to_string(),
            rel: "self".to_string(),
            mime_type: Some("application/rss+xml".to_string()),
            ..atom::Link::default()
        }],
    }
}

fn post_to_item(post: &UrlEntry, base_url: &str) -> rss::Item {
    let link = format!("{base_url}{}", post.url);
    // Feed readers get a plain, marker-free identifier for each post
    let guid_url = format!("{base_url}{}", post.url.replacen("#!/", "", 1));

    ItemBuilder::default()
        .title(post.title.clone())
        .link(Some(link))
        .guid(GuidBuilder::default().permalink(true).value(guid_url).build())
        .pub_date(post.last_modified.as_ref().map(Timestamp::to_rfc2822))
        .description(post.summary.clone())
        .build()
}

/// Copyright notice: `"2024 Holder"` while the current year matches the
/// starting year, `"2024-2026 Holder"` afterwards.
fn copyright_line(feed: &FeedSection, current_year: i32) -> String {
    if current_year == feed.copyright_since {
        format!("{} {}", feed.copyright_since, feed.copyright_holder)
    } else {
        format!(
            "{}-{} {}",
            feed.copyright_since, current_year, feed.copyright_holder
        )
    }
}

/// Write `contents` to `path` atomically: temp file in the same directory,
/// then rename over the destination.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("output path has no file name"))?;
    let tmp = path.with_file_name(format!("{}.tmp", file_name.to_string_lossy()));
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Changefreq, ContentFile, PriorityClass};
    use chrono::DateTime;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn entry(url: &str, class: PriorityClass, lastmod: Option<&str>) -> UrlEntry {
        UrlEntry {
            url: url.to_string(),
            sources: vec![ContentFile {
                abs_path: PathBuf::from("/repo/x"),
                rel_path: "/x".to_string(),
                size: 0,
            }],
            last_modified: lastmod.map(|s| DateTime::parse_from_rfc3339(s).unwrap()),
            class,
            changefreq: Changefreq::Monthly,
            priority: 0.8,
            title: None,
            summary: None,
        }
    }

    #[test]
    fn escape_xml_passthrough_and_entities() {
        assert_eq!(escape_xml("hello"), "hello");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<q>"), "&lt;q&gt;");
    }

    #[test]
    fn empty_sitemap_has_only_the_urlset() {
        let xml = sitemap_xml([], "https://example.org");
        assert!(xml.contains(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#)));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn sitemap_entry_renders_all_fields() {
        let e = entry(
            "/#!/about",
            PriorityClass::About,
            Some("2024-05-05T08:30:00+08:00"),
        );
        let xml = sitemap_xml([&e], "https://example.org");

        assert!(xml.contains("<loc>https://example.org/#!/about</loc>"));
        assert!(xml.contains("<lastmod>2024-05-05T08:30:00+08:00</lastmod>"));
        assert!(xml.contains("<changefreq>monthly</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
    }

    #[test]
    fn unknown_lastmod_is_omitted() {
        let e = entry("/#!/about", PriorityClass::About, None);
        let xml = sitemap_xml([&e], "https://example.org");
        assert!(!xml.contains("<lastmod>"));
        assert!(xml.contains("<changefreq>"));
    }

    #[test]
    fn netdisk_sitemap_is_always_never() {
        let entries = vec![NetdiskEntry {
            url: "/posts/archive.zip".to_string(),
            source: ContentFile {
                abs_path: PathBuf::from("/nd/posts/archive.zip"),
                rel_path: "/posts/archive.zip".to_string(),
                size: 10,
            },
            last_modified: None,
        }];
        let xml = netdisk_sitemap_xml(&entries, "https://netdisk.example.org");

        assert!(xml.contains("<loc>https://netdisk.example.org/posts/archive.zip</loc>"));
        assert!(xml.contains("<changefreq>never</changefreq>"));
        assert!(!xml.contains("<priority>"));
    }

    #[test]
    fn feed_carries_channel_metadata_and_items() {
        let mut post = entry(
            "/#!/posts/2024/hello.md",
            PriorityClass::Post,
            Some("2024-03-01T12:00:00+08:00"),
        );
        post.title = Some("Hello World".to_string());
        post.summary = Some("<p>First paragraph.</p>".to_string());

        let feed = FeedSection::default();
        let xml = feed_xml(
            &[&post],
            &feed,
            "https://example.org",
            "https://example.org/feed.xml",
            2024,
        )
        .unwrap();

        assert!(xml.contains("<title>SЕSSのB10GТЕ5Т</title>"));
        assert!(xml.contains("<language>zh-CN</language>"));
        assert!(xml.contains("<copyright>2024 SessionHu</copyright>"));
        assert!(xml.contains("atom:link"));
        assert!(xml.contains("https://example.org/feed.xml"));
        assert!(xml.contains(r#"rel="self""#));
        assert!(xml.contains("<link>https://example.org/#!/posts/2024/hello.md</link>"));
        assert!(xml.contains("https://example.org/posts/2024/hello.md"));
        assert!(xml.contains("<title>Hello World</title>"));
        assert!(xml.contains("Fri, 1 Mar 2024 12:00:00 +0800"));
    }

    #[test]
    fn copyright_becomes_a_range_after_the_first_year() {
        let feed = FeedSection::default();
        assert_eq!(copyright_line(&feed, 2024), "2024 SessionHu");
        assert_eq!(copyright_line(&feed, 2026), "2024-2026 SessionHu");
    }

    #[test]
    fn guid_strips_the_routing_marker() {
        let post = entry("/#!/posts/2024/a.md", PriorityClass::Post, None);
        let item = post_to_item(&post, "https://example.org");
        assert_eq!(
            item.guid.as_ref().unwrap().value,
            "https://example.org/posts/2024/a.md"
        );
    }

    #[test]
    fn write_atomic_replaces_and_cleans_up() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sitemap.xml");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, "new contents").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new contents");
        let leftovers: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
