//! Metadata resolution.
//!
//! Sources, in order of precedence:
//! 1. Open Graph and other `<meta>` elements
//! 2. JSON-LD (overrides author, site name and categories)
//! 3. Document markup: headings, bylines, canonical link, `<title>`
//!
//! The date comes from [`dates::find_date`]; the hostname from the final URL.

pub mod dates;
pub mod dom_extraction;
pub mod json_ld;
pub mod meta_tags;

use dom_query::Document;

use crate::options::Options;
use crate::result::Metadata;
use crate::url_utils;

pub use dom_extraction::{extract_author, extract_catstags, extract_sitename, extract_title, extract_url, CatTagKind};
pub use meta_tags::{examine_meta, validate_metadata_name};

const MAX_FIELD_LEN: usize = 10_000;

/// Extract the metadata record of a document.
#[must_use]
pub fn extract_metadata(doc: &Document, opts: &Options) -> Metadata {
    let mut meta = examine_meta(doc);
    if meta.author.as_deref().is_some_and(|author| !validate_metadata_name(author)) {
        meta.author = None;
    }

    let json = json_ld::parse_json_ld(doc);
    json_ld::apply_json_ld(&json, &mut meta);

    if meta.title.is_none() {
        meta.title = extract_title(doc);
    }
    if meta.author.is_none() {
        meta.author = extract_author(doc);
    }
    if meta.url.is_none() {
        meta.url = extract_url(doc, opts.url.as_deref());
    }
    if let Some(url) = &meta.url {
        meta.hostname = url_utils::extract_hostname(url);
    }
    meta.date = dates::find_date(doc, &json, meta.url.as_deref(), &opts.date_params);

    if meta.sitename.is_none() {
        meta.sitename = extract_sitename(doc);
    }
    meta.sitename = dom_extraction::finalize_sitename(meta.sitename.take(), meta.url.as_deref());

    if meta.categories.is_empty() {
        meta.categories = extract_catstags(doc, CatTagKind::Categories);
    }
    if meta.tags.is_empty() {
        meta.tags = extract_catstags(doc, CatTagKind::Tags);
    }

    truncate_fields(&mut meta);
    meta
}

fn truncate(value: &mut String) {
    if let Some((idx, _)) = value.char_indices().nth(MAX_FIELD_LEN) {
        let cut = value[..idx].char_indices().last().map_or(0, |(i, _)| i);
        value.truncate(cut);
        value.push('…');
    }
}

fn truncate_fields(meta: &mut Metadata) {
    for field in [
        &mut meta.title,
        &mut meta.author,
        &mut meta.url,
        &mut meta.hostname,
        &mut meta.description,
        &mut meta.sitename,
    ]
    .into_iter()
    .flatten()
    {
        truncate(field);
    }
}
