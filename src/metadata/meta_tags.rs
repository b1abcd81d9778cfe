//! Metadata from `<meta>` elements.
//!
//! Open Graph properties are read first; if they already supply title,
//! author, URL, description and site name the other meta elements are
//! skipped.

use dom_query::{Document, Selection};
use tracing::debug;

use crate::dom;
use crate::filters::trim;
use crate::result::Metadata;
use crate::url_utils;

#[derive(Debug, Default)]
struct OpenGraph {
    title: Option<String>,
    author: Option<String>,
    url: Option<String>,
    description: Option<String>,
    sitename: Option<String>,
}

impl OpenGraph {
    fn is_complete(&self) -> bool {
        self.title.is_some()
            && self.author.is_some()
            && self.url.is_some()
            && self.description.is_some()
            && self.sitename.is_some()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = trim(value);
    (!value.is_empty()).then_some(value)
}

fn extract_open_graph(doc: &Document) -> OpenGraph {
    let mut og = OpenGraph::default();
    for node in doc.select(r#"meta[property^="og:"]"#).nodes() {
        let meta = Selection::from(*node);
        let Some(content) = dom::get_attribute(&meta, "content").and_then(|c| non_empty(&c)) else {
            continue;
        };
        match dom::get_attribute(&meta, "property").unwrap_or_default().as_str() {
            "og:site_name" => og.sitename = Some(content),
            "og:title" => og.title = Some(content),
            "og:url" => {
                if url_utils::parse_absolute(&content).is_some() {
                    og.url = Some(content);
                }
            }
            "og:description" => og.description = Some(content),
            "og:author" | "og:article:author" => og.author = Some(content),
            _ => {}
        }
    }
    og
}

/// Collect metadata from Open Graph and standard meta elements.
///
/// `keywords` and `article:tag` contents are split on commas and
/// semicolons into tags.
#[must_use]
pub fn examine_meta(doc: &Document) -> Metadata {
    let og = extract_open_graph(doc);
    let complete = og.is_complete();
    let mut meta = Metadata {
        title: og.title,
        author: og.author,
        url: og.url,
        description: og.description,
        sitename: og.sitename,
        ..Metadata::default()
    };
    if complete {
        return meta;
    }

    for node in doc.select("meta[content]").nodes() {
        let elem = Selection::from(*node);
        let Some(content) = dom::get_attribute(&elem, "content").and_then(|c| non_empty(&c)) else {
            continue;
        };

        if let Some(property) = dom::get_attribute(&elem, "property") {
            if property.starts_with("og:") {
                continue;
            }
            match property.as_str() {
                "article:tag" => meta.tags.extend(parse_tag_list(&content)),
                "author" | "article:author" => {
                    meta.author.get_or_insert(content);
                }
                _ => {}
            }
        } else if let Some(name) = dom::get_attribute(&elem, "name") {
            let name_lower = name.to_lowercase();
            match name_lower.as_str() {
                "author" | "byl" | "dc.creator" | "dcterms.creator" | "sailthru.author" => {
                    meta.author.get_or_insert(content);
                }
                "title" | "dc.title" | "dcterms.title" | "fb_title" | "sailthru.title" | "twitter:title" => {
                    meta.title.get_or_insert(content);
                }
                "description" | "dc.description" | "dcterms.description" | "dc:description"
                | "sailthru.description" | "twitter:description" => {
                    meta.description.get_or_insert(content);
                }
                "publisher" | "dc.publisher" | "dcterms.publisher" | "twitter:site" | "application-name" => {
                    meta.sitename.get_or_insert(content);
                }
                "twitter:url" => {
                    if meta.url.is_none() && url_utils::parse_absolute(&content).is_some() {
                        meta.url = Some(content);
                    }
                }
                "keywords" => meta.tags.extend(parse_tag_list(&content)),
                _ if name.contains("twitter:app:name") => {
                    meta.sitename.get_or_insert(content);
                }
                _ => {}
            }
        } else if let Some(itemprop) = dom::get_attribute(&elem, "itemprop") {
            match itemprop.as_str() {
                "author" => {
                    meta.author.get_or_insert(content);
                }
                "description" => {
                    meta.description.get_or_insert(content);
                }
                "headline" => {
                    meta.title.get_or_insert(content);
                }
                _ => {}
            }
        } else if dom::get_attribute(&elem, "charset").is_none() && dom::get_attribute(&elem, "http-equiv").is_none() {
            debug!("unhandled meta element: {}", dom::outer_html(&elem));
        }
    }
    meta
}

/// Whether an author string from a meta element looks like a person's name.
///
/// Single words and URLs are rejected.
#[must_use]
pub fn validate_metadata_name(name: &str) -> bool {
    let name = name.trim();
    name.contains(' ') && !name.starts_with("http") && !name.starts_with('{') && !name.starts_with('[')
}

/// Split a comma or semicolon separated list.
pub(crate) fn parse_tag_list(content: &str) -> Vec<String> {
    content
        .split([',', ';'])
        .map(trim)
        .filter(|s| !s.is_empty())
        .collect()
}
