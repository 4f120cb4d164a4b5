//! Page metadata scraping
//!
//! Article details not in the index are read from the `<meta>` tags of the
//! article page itself.

use blog_core::ResourceFetcher;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static META_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<meta\s[^>]*>").expect("valid meta regex"));
static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)([a-z][a-z0-9:_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute regex")
});

/// Metadata of a page keyed by `name` or `property`
pub type PageMeta = IndexMap<String, String>;

/// Read the head metadata of an HTML document
///
/// Each meta is keyed by its `name`, falling back to `property`. Repeated
/// keys have their values joined with `", "`.
#[must_use]
pub fn parse_head_meta(html: &str) -> PageMeta {
    let head = html
        .split_once("<head>")
        .map_or(html, |(_, rest)| rest.split("</head>").next().unwrap_or(rest));

    let mut meta = PageMeta::new();
    for tag in META_TAG_RE.find_iter(head) {
        let mut key = None;
        let mut property = None;
        let mut content = None;
        for cap in ATTRIBUTE_RE.captures_iter(tag.as_str()) {
            let value = cap
                .get(2)
                .or_else(|| cap.get(3))
                .map(|m| unescape(m.as_str()));
            match cap[1].to_ascii_lowercase().as_str() {
                "name" => key = value,
                "property" => property = value,
                "content" => content = value,
                _ => {}
            }
        }
        let (Some(key), Some(content)) = (key.or(property), content) else {
            continue;
        };
        meta.entry(key)
            .and_modify(|v| {
                v.push_str(", ");
                v.push_str(&content);
            })
            .or_insert(content);
    }
    meta
}

fn unescape(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Path requested to read a page's metadata
#[must_use]
pub fn metadata_path(path: &str) -> String {
    format!("{}?noredirect", blog_taxonomy::clean_path(path))
}

/// Fetch a page and read its head metadata
///
/// Fetch failures and missing pages yield `None`.
pub async fn fetch_page_meta(fetcher: &dyn ResourceFetcher, path: &str) -> Option<PageMeta> {
    match fetcher.fetch_text(&metadata_path(path)).await {
        Ok(Some(html)) => Some(parse_head_meta(&html)),
        Ok(None) => None,
        Err(e) => {
            tracing::debug!("Could not retrieve metadata for {}: {}", path, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<html><head>
        <title>Ignored</title>
        <meta property="og:title" content="Zero trust | Adobe Blog">
        <meta name="description" content="Why &amp; how">
        <meta property="article:tag" content="Security">
        <meta property="article:tag" content="Cloud">
        <meta content="2023-05-01" name='publication-date' />
        <meta charset="utf-8">
        </head><body><meta name="body" content="no"></body></html>"#;

    #[test]
    fn reads_head_metas() {
        let meta = parse_head_meta(PAGE);
        assert_eq!(meta["og:title"], "Zero trust | Adobe Blog");
        assert_eq!(meta["description"], "Why & how");
        assert_eq!(meta["article:tag"], "Security, Cloud");
        assert_eq!(meta["publication-date"], "2023-05-01");
        assert!(!meta.contains_key("body"));
        assert_eq!(meta.len(), 4);
    }

    #[test]
    fn metadata_path_strips_extension() {
        assert_eq!(metadata_path("/en/post.html"), "/en/post?noredirect");
        assert_eq!(metadata_path("/en/post"), "/en/post?noredirect");
    }
}
