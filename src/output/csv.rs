//! Tab-separated output.

use crate::filters::trim;
use crate::result::Metadata;

fn column(value: Option<&str>) -> &str {
    value.unwrap_or_default()
}

/// One record: `id, url, fingerprint, hostname, title, date, text, comments`.
///
/// Line breaks and whitespace runs in the text columns collapse to single
/// spaces; absent values are empty columns.
#[must_use]
pub fn txttocsv(text: &str, comments: &str, meta: &Metadata) -> String {
    let text = trim(text);
    let comments = trim(comments);
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
        column(meta.id.as_deref()),
        column(meta.url.as_deref()),
        column(meta.fingerprint.as_deref()),
        column(meta.hostname.as_deref()),
        column(meta.title.as_deref()),
        column(meta.date.as_deref()),
        text,
        comments,
    )
}
