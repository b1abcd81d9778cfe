//! Result types for extraction output.
//!
//! `Metadata` is the document record carried into every output format;
//! `Extraction` is the structured result of [`crate::bare_extraction`].

use serde::{Deserialize, Serialize};

use crate::tree::Element;

/// Metadata extracted from an HTML document.
///
/// Absent fields are `None`: presence drives gating decisions
/// (`with_metadata`) and serialization (`null` in JSON, missing attributes in XML).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,

    /// Author name(s), `;`-separated when several.
    pub author: Option<String>,

    /// Publication date formatted as `YYYY-MM-DD`.
    pub date: Option<String>,

    /// Canonical URL of the document.
    pub url: Option<String>,

    /// Hostname derived from the URL.
    pub hostname: Option<String>,

    /// Site name (publisher).
    pub sitename: Option<String>,

    /// Short description or excerpt.
    pub description: Option<String>,

    /// Categories, in document order.
    pub categories: Vec<String>,

    /// Tags / keywords, in document order.
    pub tags: Vec<String>,

    /// Caller-provided record identifier.
    pub id: Option<String>,

    /// Content fingerprint of the extracted text.
    pub fingerprint: Option<String>,
}

impl Metadata {
    /// Categories joined with `sep`, `None` when there are none.
    #[must_use]
    pub fn joined_categories(&self, sep: &str) -> Option<String> {
        join_list(&self.categories, sep)
    }

    /// Tags joined with `sep`, `None` when there are none.
    #[must_use]
    pub fn joined_tags(&self, sep: &str) -> Option<String> {
        join_list(&self.tags, sep)
    }
}

fn join_list(items: &[String], sep: &str) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(items.join(sep))
    }
}

/// Which strategy produced the main content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Rule-based extraction over the candidate containers.
    #[default]
    Custom,
    /// Generic readability-style algorithm.
    Readability,
    /// Statistical paragraph classifier.
    Justext,
    /// Last-resort baseline.
    Baseline,
}

/// Structured result of a successful extraction.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Document metadata (empty for txt output).
    pub metadata: Metadata,

    /// Flattened main text.
    pub text: String,

    /// Flattened comments text.
    pub comments_text: String,

    /// Main content tree.
    pub body: Element,

    /// Comments tree, `None` when comments were not requested.
    pub comments: Option<Element>,

    /// Strategy whose output was kept.
    pub strategy: Strategy,
}
