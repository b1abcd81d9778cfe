//! JSON output.

use serde::Serialize;

use crate::result::Metadata;

/// Field layout of a JSON record.
#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    title: Option<&'a str>,
    author: Option<&'a str>,
    #[serde(rename = "source-hostname")]
    source_hostname: Option<&'a str>,
    date: Option<&'a str>,
    categories: String,
    tags: String,
    source: Option<&'a str>,
    excerpt: Option<&'a str>,
    sitename: Option<&'a str>,
    id: Option<&'a str>,
    fingerprint: Option<&'a str>,
    text: &'a str,
    comments: &'a str,
}

/// Serialize metadata and flattened texts into one JSON object.
///
/// Categories and tags are `;`-joined; absent metadata fields are `null`.
pub fn build_json_output(meta: &Metadata, text: &str, comments: &str) -> serde_json::Result<String> {
    let record = JsonRecord {
        title: meta.title.as_deref(),
        author: meta.author.as_deref(),
        source_hostname: meta.hostname.as_deref(),
        date: meta.date.as_deref(),
        categories: meta.categories.join(";"),
        tags: meta.tags.join(";"),
        source: meta.url.as_deref(),
        excerpt: meta.description.as_deref(),
        sitename: meta.sitename.as_deref(),
        id: meta.id.as_deref(),
        fingerprint: meta.fingerprint.as_deref(),
        text,
        comments,
    };
    serde_json::to_string(&record)
}
