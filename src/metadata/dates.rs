//! Publication date lookup.
//!
//! Candidates are tried in order: JSON-LD, date meta elements, `time`
//! elements, date-like containers, then the URL path. The first candidate that
//! parses and falls inside the accepted range wins. Without explicit bounds
//! the range is 1995-01-01 to today.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use dom_query::{Document, Selection};
use regex::Regex;
use tracing::debug;

use crate::dom;
use crate::metadata::json_ld::JsonLd;
use crate::options::DateParams;

#[allow(clippy::expect_used)]
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([12]\d{3})-(\d{1,2})-(\d{1,2})").expect("valid regex"));

#[allow(clippy::expect_used)]
static URL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([12]\d{3})[/_-](\d{1,2})[/_-](\d{1,2})(?:[/_-]|$)").expect("valid regex"));

const PUBLISHED_META: &[&str] = &[
    "article:published_time",
    "og:published_time",
    "article.published",
    "date",
    "dc.date",
    "dc.date.issued",
    "dcterms.date",
    "dcterms.created",
    "citation_publication_date",
    "pubdate",
    "publishdate",
    "publish-date",
    "sailthru.date",
    "parsely-pub-date",
    "datepublished",
];

const MODIFIED_META: &[&str] = &[
    "article:modified_time",
    "og:updated_time",
    "dcterms.modified",
    "last-modified",
    "lastmod",
    "datemodified",
];

const DATE_CONTAINERS: &[&str] = &[
    "[class*='publish-date']",
    "[class*='date-publish']",
    "[class*='post-date']",
    "[class*='entry-date']",
    "[class*='article-date']",
    "[class*='byline-date']",
];

const TEXT_FORMATS: &[&str] = &["%Y/%m/%d", "%d.%m.%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];

/// Parse a date written in one of the common machine or human formats.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    for fmt in TEXT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }
    let caps = ISO_DATE.captures(text)?;
    ymd(&caps[1], &caps[2], &caps[3])
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Date embedded in a URL path such as `/2021/03/14/`.
#[must_use]
pub fn date_from_url(url: &str) -> Option<NaiveDate> {
    let caps = URL_DATE.captures(url)?;
    ymd(&caps[1], &caps[2], &caps[3])
}

fn bounds(params: &DateParams) -> (NaiveDate, NaiveDate) {
    let min = params
        .min_date
        .or_else(|| NaiveDate::from_ymd_opt(1995, 1, 1))
        .unwrap_or(NaiveDate::MIN);
    let max = params.max_date.unwrap_or_else(|| Utc::now().date_naive());
    (min, max)
}

fn meta_values(doc: &Document, names: &[&str]) -> Vec<String> {
    let mut values = Vec::new();
    for node in doc.select("meta[content]").nodes() {
        let meta = Selection::from(*node);
        let key = dom::get_attribute(&meta, "property")
            .or_else(|| dom::get_attribute(&meta, "name"))
            .or_else(|| dom::get_attribute(&meta, "itemprop"))
            .unwrap_or_default()
            .to_lowercase();
        if names.contains(&key.as_str()) {
            values.extend(dom::get_attribute(&meta, "content"));
        }
    }
    values
}

fn time_values(doc: &Document) -> Vec<String> {
    let mut values = Vec::new();
    for node in doc.select("time[datetime]").nodes() {
        values.extend(dom::get_attribute(&Selection::from(*node), "datetime"));
    }
    for selector in DATE_CONTAINERS {
        for node in doc.select(selector).nodes().iter().take(3) {
            let sel = Selection::from(*node);
            values.extend(dom::get_attribute(&sel, "datetime"));
            let text = dom::text_content(&sel);
            if text.len() < 100 {
                values.push(text.to_string());
            }
        }
    }
    values
}

/// Find the publication date, formatted as `YYYY-MM-DD`.
#[must_use]
pub fn find_date(doc: &Document, json: &JsonLd, url: Option<&str>, params: &DateParams) -> Option<String> {
    let (min, max) = bounds(params);
    let accepted = |date: &NaiveDate| *date >= min && *date <= max && params.accepts(*date);

    let (first_json, second_json) = if params.original_date {
        (&json.date_published, &json.date_modified)
    } else {
        (&json.date_modified, &json.date_published)
    };
    let (first_meta, second_meta) = if params.original_date {
        (PUBLISHED_META, MODIFIED_META)
    } else {
        (MODIFIED_META, PUBLISHED_META)
    };

    let mut candidates: Vec<String> = Vec::new();
    candidates.extend(first_json.iter().cloned());
    candidates.extend(meta_values(doc, first_meta));
    candidates.extend(second_json.iter().cloned());
    candidates.extend(meta_values(doc, second_meta));
    candidates.extend(time_values(doc));

    let found = candidates
        .iter()
        .filter_map(|c| parse_date(c))
        .find(|d| accepted(d))
        .or_else(|| url.and_then(date_from_url).filter(|d| accepted(d)));
    if found.is_none() {
        debug!(candidates = candidates.len(), "no date found");
    }
    found.map(|date| date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(parse_date("2024-03-15"), expected);
        assert_eq!(parse_date("2024-03-15T10:30:00Z"), expected);
        assert_eq!(parse_date("2024-03-15T10:30:00"), expected);
        assert_eq!(parse_date("March 15, 2024"), expected);
        assert_eq!(parse_date("Posted on 2024-03-15 at noon"), expected);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_date_from_url() {
        assert_eq!(
            date_from_url("https://example.org/2021/03/14/post.html"),
            NaiveDate::from_ymd_opt(2021, 3, 14)
        );
        assert_eq!(date_from_url("https://example.org/post-2021"), None);
    }

    #[test]
    fn test_find_date_priorities() {
        let html = r#"<html><head>
            <meta property="article:modified_time" content="2023-05-02">
            <meta property="article:published_time" content="2023-05-01T08:00:00+02:00">
        </head><body><time datetime="2020-01-01">old</time></body></html>"#;
        let doc = Document::from(html);
        let json = JsonLd::default();

        let params = DateParams::new();
        assert_eq!(find_date(&doc, &json, None, &params).as_deref(), Some("2023-05-01"));

        let params = DateParams {
            original_date: false,
            ..DateParams::new()
        };
        assert_eq!(find_date(&doc, &json, None, &params).as_deref(), Some("2023-05-02"));
    }

    #[test]
    fn test_find_date_respects_bounds() {
        let html = r#"<html><body><time datetime="1990-06-01">x</time><time datetime="2019-06-01">y</time></body></html>"#;
        let doc = Document::from(html);
        let json = JsonLd::default();
        assert_eq!(find_date(&doc, &json, None, &DateParams::new()).as_deref(), Some("2019-06-01"));

        let params = DateParams {
            max_date: NaiveDate::from_ymd_opt(2010, 1, 1),
            ..DateParams::new()
        };
        assert_eq!(find_date(&doc, &json, None, &params), None);
        assert_eq!(
            find_date(&doc, &json, Some("https://example.org/2005/02/03/a"), &params).as_deref(),
            Some("2005-02-03")
        );
    }
}
