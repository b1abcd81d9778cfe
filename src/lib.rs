//! # trafilatura-core
//!
//! Main-content and comments extraction from web pages.
//!
//! A document is cleaned, its comments section is extracted and detached, and
//! the main content is located through ordered selector rules. The result is
//! compared with generic algorithms (a readability implementation and a
//! paragraph classifier) before it is gated on size, duplicates and language,
//! then serialized as plain text, CSV, JSON, XML or TEI-XML.
//!
//! ## Quick Start
//!
//! ```rust
//! use trafilatura_core::{extract, Options, OutputFormat};
//!
//! let html = r#"<html><head><title>My Article</title></head>
//! <body><article>
//!   <p>Main content here, written out in a sentence long enough to be kept.</p>
//! </article></body></html>"#;
//!
//! let options = Options {
//!     output_format: OutputFormat::Xml,
//!     ..Options::default()
//! };
//! let xml = extract(html, &options)?;
//! assert!(xml.starts_with("<doc"));
//! # Ok::<(), trafilatura_core::Error>(())
//! ```
//!
//! ## Deduplication across documents
//!
//! [`extract`] uses a fresh duplicate cache per call. An [`Extractor`] owns
//! one cache for its lifetime, so repeated boilerplate and repeated documents
//! are recognized across calls.

mod error;
mod extract;
mod options;
mod result;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Text and tail access on source nodes.
pub mod etree;

/// Content tree produced by the extractors.
pub mod tree;

/// Duplicate cache.
pub mod lru;

/// Selector rules for content, comments, boilerplate and metadata.
pub mod selector;

/// Loading, cleaning and tag conversion of source documents.
pub mod html_processing;

/// Main content and comments extraction, fallback arbitration.
pub mod extractor;

/// Metadata resolution (meta elements, JSON-LD, markup, dates).
pub mod metadata;

/// URL validation and hostname helpers.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Link density tests for boilerplate detection.
pub mod link_density;

/// Text filters, duplicate test, fingerprint and language filter.
pub mod filters;

/// Embedded stopword lists.
pub mod stoplists;

/// Statistical paragraph classifier.
pub mod justext;

/// Tree sanitizer for generic algorithm output.
pub mod sanitizer;

/// Output serializers (txt, csv, json, xml, TEI).
pub mod output;

// Public API - re-exports
pub use error::{DiscardReason, Error, Result};
pub use extract::{bare_extraction, extract, extract_bytes, Extractor};
pub use lru::LruCache;
pub use options::{DateParams, Options, OutputFormat, UnknownFormat};
pub use result::{Extraction, Metadata, Strategy};
