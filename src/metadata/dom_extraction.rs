//! Metadata from the document body and head.
//!
//! Used for the fields meta elements and JSON-LD left empty.

use std::collections::HashSet;
use std::sync::LazyLock;

use dom_query::{Document, Selection};
use regex::Regex;
use tracing::{debug, warn};

use crate::dom;
use crate::filters::trim;
use crate::selector::{self, meta as meta_selectors, Rule};
use crate::url_utils;

#[allow(clippy::expect_used)]
static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)?\s+[-|]\s+.*$").expect("valid regex"));

#[allow(clippy::expect_used)]
static SITENAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*?[-|]\s+(.*)$").expect("valid regex"));

#[allow(clippy::expect_used)]
static URL_COMP_CHECK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(https?://|/)").expect("valid regex"));

#[allow(clippy::expect_used)]
static URL_DOMAIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://[^/]+").expect("valid regex"));

#[allow(clippy::expect_used)]
static URL_SITENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://(?:www\.|w[0-9]+\.)?([^/]+)").expect("valid regex"));

#[allow(clippy::expect_used)]
static AUTHOR_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([a-zäöüß]+(ed|t))? ?(by|von) ").expect("valid regex"));

#[allow(clippy::expect_used)]
static AUTHOR_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d.+?$").expect("valid regex"));

#[allow(clippy::expect_used)]
static AUTHOR_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w]+$|( am| on)").expect("valid regex"));

fn body(doc: &Document) -> Selection<'_> {
    doc.select("body")
}

fn head_title(doc: &Document) -> Option<String> {
    let title = doc.select("head > title");
    if title.is_empty() {
        return None;
    }
    Some(dom::text_content(&title.first()).to_string())
}

/// First text shorter than `len_limit` characters matched by the rules,
/// trying each rule in turn.
fn extract_metainfo(doc: &Document, rules: &[Rule], len_limit: usize) -> Option<String> {
    let root = body(doc);
    for rule in rules {
        let matches = selector::query_all(&root, *rule);
        for elem in &matches {
            let content = dom::text_content(elem);
            let content = trim(&content);
            if !content.is_empty() && content.chars().count() < len_limit {
                return Some(content);
            }
        }
        if matches.len() > 1 {
            debug!(count = matches.len(), "more than one invalid metadata candidate");
        }
    }
    None
}

/// Document title: a single `h1`, title markup, the `<title>` element minus
/// its site suffix, the first `h1`, the first `h2`.
#[must_use]
pub fn extract_title(doc: &Document) -> Option<String> {
    let h1 = doc.select("h1");
    if h1.length() == 1 {
        let text = trim(&dom::text_content(&h1));
        if !text.is_empty() {
            return Some(text);
        }
    }
    if let Some(title) = extract_metainfo(doc, &meta_selectors::META_TITLE, 200) {
        return Some(title);
    }
    if let Some(title) = head_title(doc) {
        let refined = TITLE_REGEX
            .captures(&title)
            .and_then(|caps| caps.get(1))
            .map_or(title.as_str(), |m| m.as_str());
        let refined = trim(refined);
        if !refined.is_empty() {
            return Some(refined);
        }
    }
    warn!("no main title found");
    if let Some(first) = h1.nodes().first() {
        let text = trim(&dom::text_content(&Selection::from(*first)));
        if !text.is_empty() {
            return Some(text);
        }
    }
    doc.select("h2")
        .nodes()
        .first()
        .map(|node| trim(&dom::text_content(&Selection::from(*node))))
        .filter(|text| !text.is_empty())
}

/// Python-style title case: first letter of every alphabetic run upper-cased,
/// the rest lower-cased.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Author from byline markup, with prefixes such as "Posted by" removed.
#[must_use]
pub fn extract_author(doc: &Document) -> Option<String> {
    let author = extract_metainfo(doc, &meta_selectors::META_AUTHOR, 75)?;
    let author = AUTHOR_PREFIX.replace(&author, "");
    let author = AUTHOR_DIGITS.replace(&author, "");
    let author = AUTHOR_SUFFIX.replace_all(&trim(&author), "").to_string();
    let author = title_case(&author);
    (!author.is_empty()).then_some(author)
}

/// Canonical URL of the document, falling back to `default_url`.
///
/// Relative links get the domain of an absolute `og:` or `twitter:` meta
/// value. Invalid URLs yield `None`.
#[must_use]
pub fn extract_url(doc: &Document, default_url: Option<&str>) -> Option<String> {
    let mut url = default_url.map(str::to_string);

    let canonical = doc
        .select(r#"link[rel="canonical"]"#)
        .nodes()
        .first()
        .and_then(|node| dom::get_attribute(&Selection::from(*node), "href"));
    match canonical {
        Some(href) if URL_COMP_CHECK.is_match(&href) => url = Some(href),
        _ => {
            for node in doc.select(r#"link[rel="alternate"][hreflang="x-default"]"#).nodes() {
                if let Some(href) = dom::get_attribute(&Selection::from(*node), "href") {
                    if URL_COMP_CHECK.is_match(&href) {
                        url = Some(href);
                    }
                }
            }
        }
    }

    if let Some(relative) = url.as_deref().filter(|u| u.starts_with('/')) {
        let mut absolute = None;
        for node in doc.select("meta[content]").nodes() {
            let meta = Selection::from(*node);
            let Some(kind) = dom::get_attribute(&meta, "name").or_else(|| dom::get_attribute(&meta, "property"))
            else {
                continue;
            };
            if !(kind.starts_with("og:") || kind.starts_with("twitter:")) {
                continue;
            }
            let content = dom::get_attribute(&meta, "content").unwrap_or_default();
            if let Some(domain) = URL_DOMAIN.find(&content) {
                absolute = Some(format!("{}{relative}", domain.as_str()));
                break;
            }
        }
        if absolute.is_some() {
            url = absolute;
        }
    }

    url.and_then(|u| url_utils::validate_url(&u, None))
}

/// Site name from the `<title>` suffix.
#[must_use]
pub fn extract_sitename(doc: &Document) -> Option<String> {
    let title = head_title(doc)?;
    let caps = SITENAME_REGEX.captures(&title)?;
    let name = trim(caps.get(1)?.as_str());
    (!name.is_empty()).then_some(name)
}

/// Clean up a site name; derive it from the URL when missing.
#[must_use]
pub fn finalize_sitename(sitename: Option<String>, url: Option<&str>) -> Option<String> {
    match sitename {
        Some(name) => {
            let name = name.strip_prefix('@').unwrap_or(&name).to_string();
            let capitalize = !name.contains('.') && name.chars().next().is_some_and(|c| !c.is_uppercase());
            Some(if capitalize { title_case(&name) } else { name })
        }
        None => {
            let caps = URL_SITENAME.captures(url?)?;
            Some(caps.get(1)?.as_str().to_string())
        }
    }
}

/// Which link list to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatTagKind {
    Categories,
    Tags,
}

/// Category or tag names from links pointing to `/category/` or `/tags/`
/// pages, inside the first matching container kind.
#[must_use]
pub fn extract_catstags(doc: &Document, kind: CatTagKind) -> Vec<String> {
    let (rules, pattern): (&[Rule], &str) = match kind {
        CatTagKind::Categories => (&meta_selectors::META_CATEGORIES, "/category/"),
        CatTagKind::Tags => (&meta_selectors::META_TAGS, "/tags/"),
    };

    let root = body(doc);
    let mut results = Vec::new();
    for rule in rules {
        let mut seen = HashSet::new();
        for container in selector::query_all(&root, *rule) {
            for node in container.select("a[href]").nodes() {
                if !seen.insert(node.id) {
                    continue;
                }
                let anchor = Selection::from(*node);
                if dom::get_attribute(&anchor, "href").is_some_and(|href| href.contains(pattern)) {
                    results.push(trim(&dom::text_content(&anchor)));
                }
            }
        }
        if !results.is_empty() {
            break;
        }
    }

    if kind == CatTagKind::Categories && results.is_empty() {
        if let Some(node) = doc.select(r#"meta[property="article:section"]"#).nodes().first() {
            results.extend(dom::get_attribute(&Selection::from(*node), "content").map(|c| trim(&c)));
        }
    }
    results.retain(|item| !item.is_empty());
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_h1_wins() {
        let doc = Document::from(
            r#"<html><head><title>Page | Site</title></head><body><h1> Only  heading </h1><h2 class="entry-title">Entry</h2></body></html>"#,
        );
        assert_eq!(extract_title(&doc).as_deref(), Some("Only heading"));
    }

    #[test]
    fn test_title_fallbacks() {
        let doc = Document::from(
            r#"<html><head><title>My Post - Example Blog</title></head><body><h1>A</h1><h1>B</h1></body></html>"#,
        );
        assert_eq!(extract_title(&doc).as_deref(), Some("My Post"));

        let doc = Document::from(r#"<html><head></head><body><h2>Second level</h2></body></html>"#);
        assert_eq!(extract_title(&doc).as_deref(), Some("Second level"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("jane o'connor"), "Jane O'Connor");
        assert_eq!(title_case("JOHN DOE"), "John Doe");
    }

    #[test]
    fn test_author_cleanup() {
        let doc = Document::from(
            r#"<html><body><span class="byline">Posted by jane doe on 12 May 2021</span><p>Text</p></body></html>"#,
        );
        assert_eq!(extract_author(&doc).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_canonical_url() {
        let doc = Document::from(
            r#"<html><head><link rel="canonical" href="https://example.org/post/"></head><body></body></html>"#,
        );
        assert_eq!(extract_url(&doc, None).as_deref(), Some("https://example.org/post"));
    }

    #[test]
    fn test_relative_canonical_gets_domain() {
        let doc = Document::from(
            r#"<html><head>
                <link rel="canonical" href="/2021/post.html">
                <meta property="og:image" content="https://cdn.example.org/img.png">
            </head><body></body></html>"#,
        );
        assert_eq!(
            extract_url(&doc, None).as_deref(),
            Some("https://cdn.example.org/2021/post.html")
        );
    }

    #[test]
    fn test_default_url_is_validated() {
        let doc = Document::from("<html><body></body></html>");
        assert_eq!(
            extract_url(&doc, Some("https://example.org/a#top")).as_deref(),
            Some("https://example.org/a")
        );
        assert!(extract_url(&doc, Some("no url")).is_none());
    }

    #[test]
    fn test_sitename() {
        let doc = Document::from(r#"<html><head><title>Story | the daily planet</title></head><body></body></html>"#);
        let name = extract_sitename(&doc);
        assert_eq!(name.as_deref(), Some("the daily planet"));
        assert_eq!(finalize_sitename(name, None).as_deref(), Some("The Daily Planet"));
        assert_eq!(finalize_sitename(Some("@example".into()), None).as_deref(), Some("Example"));
        assert_eq!(finalize_sitename(Some("example.org".into()), None).as_deref(), Some("example.org"));
        assert_eq!(
            finalize_sitename(None, Some("https://www.example.org/x")).as_deref(),
            Some("example.org")
        );
    }

    #[test]
    fn test_categories_and_tags() {
        let doc = Document::from(
            r#"<html><head><meta property="article:section" content="Fallback"></head><body>
                <div class="entry-meta"><a href="/category/news/">News</a><a href="/about">About</a></div>
                <div class="tags"><a href="/tags/rust/">rust</a><a href="/tags/xml/">xml</a></div>
            </body></html>"#,
        );
        assert_eq!(extract_catstags(&doc, CatTagKind::Categories), vec!["News"]);
        assert_eq!(extract_catstags(&doc, CatTagKind::Tags), vec!["rust", "xml"]);

        let doc = Document::from(
            r#"<html><head><meta property="article:section" content="Fallback"></head><body><p>x</p></body></html>"#,
        );
        assert_eq!(extract_catstags(&doc, CatTagKind::Categories), vec!["Fallback"]);
    }
}
