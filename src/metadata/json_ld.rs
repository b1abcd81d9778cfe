//! JSON-LD metadata.
//!
//! Every `application/ld+json` (and `application/settings+json`) script is
//! parsed with `serde_json`; scripts that fail to parse are skipped. Values
//! found here override the meta-element values for author, site name and
//! categories, and fill the title when it is still missing.

use dom_query::{Document, Selection};
use serde_json::{Map, Value};

use crate::dom;
use crate::filters::trim;
use crate::result::Metadata;

/// Values collected from all JSON-LD objects of a document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JsonLd {
    /// Author names containing a space, in document order.
    pub authors: Vec<String>,
    /// Names of `Person` objects outside an `author` property.
    pub persons: Vec<String>,
    /// Publisher name.
    pub publisher: Option<String>,
    /// First `articleSection`.
    pub section: Option<String>,
    /// `name` of an `Article` object.
    pub article_name: Option<String>,
    /// First `headline`.
    pub headline: Option<String>,
    /// First `datePublished` (or `dateCreated`).
    pub date_published: Option<String>,
    /// First `dateModified`.
    pub date_modified: Option<String>,
}

/// Parse the JSON-LD scripts of a document.
#[must_use]
pub fn parse_json_ld(doc: &Document) -> JsonLd {
    let mut data = JsonLd::default();
    let scripts = doc.select(r#"script[type="application/ld+json"], script[type="application/settings+json"]"#);
    for node in scripts.nodes() {
        let text = dom::text_content(&Selection::from(*node));
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        if let Ok(value) = serde_json::from_str::<Value>(text) {
            visit(&value, &mut data);
        }
    }
    data
}

fn visit(value: &Value, data: &mut JsonLd) {
    match value {
        Value::Object(map) => visit_object(map, data),
        Value::Array(items) => items.iter().for_each(|item| visit(item, data)),
        _ => {}
    }
}

fn visit_object(map: &Map<String, Value>, data: &mut JsonLd) {
    let types = schema_types(map);

    if let Some(author) = map.get("author") {
        for name in names(author) {
            if name.contains(' ') && !data.authors.contains(&name) {
                data.authors.push(name);
            }
        }
    }
    if types.iter().any(|t| t == "person") {
        if let Some(name) = string_value(map, "name") {
            if name.contains(' ') && !data.persons.contains(&name) {
                data.persons.push(name);
            }
        }
    }
    if data.publisher.is_none() {
        if let Some(publisher) = map.get("publisher") {
            data.publisher = names(publisher).into_iter().find(|name| !name.contains(','));
        }
    }
    if data.section.is_none() {
        data.section = string_value(map, "articleSection");
    }
    if data.article_name.is_none() && types.iter().any(|t| t == "article") {
        data.article_name = string_value(map, "name");
    }
    if data.headline.is_none() {
        data.headline = string_value(map, "headline");
    }
    if data.date_published.is_none() {
        data.date_published = string_value(map, "datePublished").or_else(|| string_value(map, "dateCreated"));
    }
    if data.date_modified.is_none() {
        data.date_modified = string_value(map, "dateModified");
    }

    for (key, child) in map {
        // author and publisher objects are read above
        if key != "author" && key != "publisher" {
            visit(child, data);
        }
    }
}

fn schema_types(map: &Map<String, Value>) -> Vec<String> {
    match map.get("@type") {
        Some(Value::String(s)) => vec![s.to_lowercase()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).map(str::to_lowercase).collect(),
        _ => Vec::new(),
    }
}

/// A trimmed string property, or the first string of an array property.
fn string_value(map: &Map<String, Value>, key: &str) -> Option<String> {
    let value = match map.get(key)? {
        Value::Array(items) => items.first()?,
        other => other,
    };
    let text = trim(value.as_str()?);
    (!text.is_empty()).then_some(text)
}

/// Names held by an `author` or `publisher` value: plain strings, objects
/// with `name` (or `givenName` and `familyName`), or arrays of those.
fn names(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => {
            let name = trim(s);
            if name.is_empty() {
                Vec::new()
            } else {
                vec![name]
            }
        }
        Value::Object(map) => {
            if let Some(name) = string_value(map, "name") {
                return vec![name];
            }
            let given = string_value(map, "givenName").unwrap_or_default();
            let family = string_value(map, "familyName").unwrap_or_default();
            let full = trim(&format!("{given} {family}"));
            if full.is_empty() {
                Vec::new()
            } else {
                vec![full]
            }
        }
        Value::Array(items) => items.iter().flat_map(names).collect(),
        _ => Vec::new(),
    }
}

/// Apply JSON-LD values on top of the meta-element metadata.
pub fn apply_json_ld(data: &JsonLd, meta: &mut Metadata) {
    let authors = if data.authors.is_empty() {
        &data.persons
    } else {
        &data.authors
    };
    if !authors.is_empty() {
        meta.author = Some(authors.join("; "));
    }
    if let Some(publisher) = &data.publisher {
        meta.sitename = Some(publisher.clone());
    }
    if let Some(section) = &data.section {
        meta.categories = vec![section.clone()];
    }
    if meta.title.is_none() {
        meta.title = data.article_name.clone().or_else(|| data.headline.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> JsonLd {
        let html = format!(r#"<html><head><script type="application/ld+json">{json}</script></head><body></body></html>"#);
        parse_json_ld(&Document::from(html.as_str()))
    }

    #[test]
    fn test_article_schema() {
        let data = parse(
            r#"{
                "@type": "NewsArticle",
                "headline": "Test Article Title",
                "datePublished": "2024-01-15T10:30:00Z",
                "articleSection": "Politics",
                "author": {"@type": "Person", "name": "John Doe"},
                "publisher": {"@type": "Organization", "name": "Daily Planet"}
            }"#,
        );
        assert_eq!(data.authors, vec!["John Doe"]);
        assert!(data.persons.is_empty());
        assert_eq!(data.publisher.as_deref(), Some("Daily Planet"));
        assert_eq!(data.section.as_deref(), Some("Politics"));
        assert_eq!(data.headline.as_deref(), Some("Test Article Title"));
        assert_eq!(data.date_published.as_deref(), Some("2024-01-15T10:30:00Z"));
    }

    #[test]
    fn test_graph_and_author_arrays() {
        let data = parse(
            r#"{"@graph": [
                {"@type": "WebSite", "name": "Example"},
                {"@type": "Article", "name": "Graph Title",
                 "author": [{"name": "Jane Smith"}, {"givenName": "Max", "familyName": "Muster"}, "admin"]}
            ]}"#,
        );
        assert_eq!(data.authors, vec!["Jane Smith", "Max Muster"]);
        assert_eq!(data.article_name.as_deref(), Some("Graph Title"));
    }

    #[test]
    fn test_invalid_json_skipped() {
        let html = r#"<html><head>
            <script type="application/ld+json">{ invalid json here }</script>
            <script type="application/ld+json">{"@type": "Article", "headline": "Valid Article"}</script>
        </head><body></body></html>"#;
        let data = parse_json_ld(&Document::from(html));
        assert_eq!(data.headline.as_deref(), Some("Valid Article"));
    }

    #[test]
    fn test_apply_overrides() {
        let data = parse(r#"{"@type": "Person", "name": "Jane Smith", "publisher": "Acme, Inc."}"#);
        let mut meta = Metadata {
            author: Some("Someone Else".to_string()),
            title: Some("Kept".to_string()),
            ..Metadata::default()
        };
        apply_json_ld(&data, &mut meta);
        assert_eq!(meta.author.as_deref(), Some("Jane Smith"));
        assert_eq!(meta.title.as_deref(), Some("Kept"));
        assert!(meta.sitename.is_none());
    }
}
