//! Extraction orchestrator.
//!
//! Runs the stages in order and stops at the first discard: load, metadata,
//! cleaning, comments, main content, arbitration (or baseline), size and
//! duplicate checks, language filter, serialization.

use tracing::{debug, error, info, warn};

use crate::dom;
use crate::encoding;
use crate::error::{DiscardReason, Error, Result};
use crate::extractor::{baseline, compare_extraction, extract_comments, extract_content, ExtractionState};
use crate::filters::{content_fingerprint, duplicate_test, language_filter};
use crate::html_processing::{convert_tags, load_html, tree_cleaning};
use crate::lru::LruCache;
use crate::metadata;
use crate::options::{Options, OutputFormat};
use crate::output::determine_returnstring;
use crate::result::{Extraction, Metadata, Strategy};
use crate::tree::Tag;

fn discard(reason: DiscardReason, url: &str) -> Error {
    info!(%reason, "discarding data for url: {url}");
    Error::Discarded(reason)
}

/// Run the extraction pipeline and return the structured result.
///
/// `cache` holds the duplicate counters; pass the same cache across calls to
/// detect documents repeated within a crawl.
pub fn bare_extraction(html: &str, opts: &Options, cache: &mut LruCache) -> Result<Extraction> {
    let url = opts.url.as_deref().unwrap_or_default();

    let doc = load_html(html).ok_or_else(|| discard(DiscardReason::Unparsable, url))?;
    let backup = (!opts.no_fallback).then(|| dom::clone_document(&doc));

    let metadata = if opts.output_format == OutputFormat::Txt {
        Metadata::default()
    } else {
        let meta = metadata::extract_metadata(&doc, opts);
        if meta.url.as_ref().is_some_and(|u| opts.url_blacklist.contains(u)) {
            return Err(discard(DiscardReason::BlacklistedUrl, url));
        }
        if opts.with_metadata && (meta.date.is_none() || meta.title.is_none() || meta.url.is_none()) {
            return Err(discard(DiscardReason::MissingMetadata, url));
        }
        meta
    };

    tree_cleaning(&doc, opts.include_tables);
    convert_tags(&doc, opts.include_formatting, opts.include_tables);

    let (comments, comments_text, len_comments) = if opts.include_comments {
        let (tree, text, len) = extract_comments(&doc, cache, opts);
        (Some(tree), text, len)
    } else {
        (None, String::new(), 0)
    };

    let (body, text, len_text, sure_thing) = {
        let mut state = ExtractionState::new(cache, opts);
        extract_content(&doc, &mut state)
    };

    let (mut body, text, len_text, strategy) = match &backup {
        Some(backup) => compare_extraction(backup, body, text, len_text, opts),
        None if !sure_thing && len_text < opts.min_extracted_size => {
            let (body, text, len_text) = baseline(html);
            debug!("non-clean extracted length: {len_text} (extraction)");
            (body, text, len_text, Strategy::Baseline)
        }
        None => (body, text, len_text, Strategy::Custom),
    };
    // generic output keeps its wrappers through sanitization
    body.strip_tags(|e| e.tag == Tag::Div);

    if let Some(max_tree_size) = opts.max_tree_size {
        let size = body.node_count();
        if size > max_tree_size {
            warn!("output tree too long: {size}");
            body.strip_tags(|e| e.tag == Tag::Hi);
            let size = body.node_count();
            if size > max_tree_size {
                error!("output tree too long: {size}, discarding file");
                return Err(discard(DiscardReason::TreeTooLarge, url));
            }
        }
    }

    if len_comments < opts.min_extracted_comm_size {
        info!("not enough comments: {url}");
    }
    if len_text < opts.min_output_size && len_comments < opts.min_output_comm_size {
        info!("text and comments not long enough: {len_text} {len_comments}");
        return Err(discard(DiscardReason::TooShort, url));
    }

    if opts.deduplicate && duplicate_test(&body.text_content(), cache, opts) {
        return Err(discard(DiscardReason::Duplicate, url));
    }

    if opts.target_language.is_some()
        && language_filter(&text, &comments_text, opts.target_language.as_deref(), &metadata)
    {
        return Err(discard(DiscardReason::WrongLanguage, url));
    }

    Ok(Extraction {
        metadata,
        text,
        comments_text,
        body,
        comments,
        strategy,
    })
}

fn render(extraction: Extraction, opts: &Options) -> Result<String> {
    let Extraction {
        mut metadata,
        text,
        body,
        comments,
        ..
    } = extraction;
    if opts.output_format != OutputFormat::Txt {
        metadata.id.clone_from(&opts.record_id);
        metadata.fingerprint = Some(content_fingerprint(&text));
    }
    determine_returnstring(&metadata, body, comments, opts).map_err(|err| match err {
        Error::Xml(msg) => {
            warn!("serialization failed: {msg}");
            Error::Discarded(DiscardReason::Serialization)
        }
        other => other,
    })
}

/// Extract the main content of an HTML document in the configured format.
///
/// Uses a fresh duplicate cache, so `deduplicate` only acts within the
/// document. Use an [`Extractor`] to deduplicate across documents.
///
/// # Example
///
/// ```rust
/// use trafilatura_core::{extract, Options};
///
/// let html = r#"<html><body><article>
///     <p>The first paragraph of the article has enough words to be kept as text.</p>
/// </article></body></html>"#;
/// let text = extract(html, &Options::default())?;
/// assert!(text.contains("first paragraph"));
/// # Ok::<(), trafilatura_core::Error>(())
/// ```
pub fn extract(html: &str, opts: &Options) -> Result<String> {
    let mut cache = LruCache::new(opts.lru_size);
    let extraction = bare_extraction(html, opts, &mut cache)?;
    render(extraction, opts)
}

/// Like [`extract`], for raw bytes in any declared encoding.
pub fn extract_bytes(html: &[u8], opts: &Options) -> Result<String> {
    extract(&encoding::transcode_to_utf8(html), opts)
}

/// Extraction with a duplicate cache shared across documents.
pub struct Extractor {
    cache: LruCache,
    opts: Options,
}

impl Extractor {
    #[must_use]
    pub fn new(opts: Options) -> Self {
        Self {
            cache: LruCache::new(opts.lru_size),
            opts,
        }
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Structured result for one document.
    pub fn bare_extraction(&mut self, html: &str) -> Result<Extraction> {
        bare_extraction(html, &self.opts, &mut self.cache)
    }

    /// Serialized result for one document.
    pub fn extract(&mut self, html: &str) -> Result<String> {
        let extraction = bare_extraction(html, &self.opts, &mut self.cache)?;
        render(extraction, &self.opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"<html><head><title>Test page - Example</title></head><body>
        <nav><a href="/">Home</a></nav>
        <article>
            <h1>Test page</h1>
            <p>This is the first paragraph of the article, long enough to count as real content for the extractor.</p>
            <p>A second paragraph follows with more sentences, so the text clearly passes the minimum output size.</p>
        </article>
        <footer>Copyright notice</footer>
    </body></html>"#;

    #[test]
    fn test_unparsable_input() {
        let err = extract("   ", &Options::default()).unwrap_err();
        assert_eq!(err.discard_reason(), Some(DiscardReason::Unparsable));
    }

    #[test]
    fn test_basic_text() {
        let text = extract(ARTICLE, &Options::default()).unwrap();
        assert!(text.contains("first paragraph of the article"));
        assert!(text.contains("second paragraph follows"));
        assert!(!text.contains("Copyright notice"));
    }

    #[test]
    fn test_too_short() {
        let html = "<html><body><article><p>Tiny.</p></article></body></html>";
        let opts = Options {
            no_fallback: true,
            ..Options::default()
        };
        let err = extract(html, &opts).unwrap_err();
        assert_eq!(err.discard_reason(), Some(DiscardReason::TooShort));
    }

    #[test]
    fn test_txt_skips_metadata() {
        let mut cache = LruCache::new(16);
        let result = bare_extraction(ARTICLE, &Options::default(), &mut cache).unwrap();
        assert_eq!(result.metadata, Metadata::default());
        assert!(result.comments.is_some());
    }

    #[test]
    fn test_fingerprint_only_for_structured_formats() {
        let opts = Options {
            output_format: OutputFormat::Json,
            record_id: Some("rec-1".to_string()),
            ..Options::default()
        };
        let json = extract(ARTICLE, &opts).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["id"], "rec-1");
        assert!(value["fingerprint"].as_str().is_some_and(|f| !f.is_empty()));
        assert_eq!(value["title"], "Test page");
    }

    #[cfg(feature = "readability")]
    #[test]
    fn test_generic_result_has_no_divisions() {
        let block = "<div>The harbour reopened in spring, and the ferries, which had been idle all winter, \
                     started to carry passengers across the bay again, much to the relief of the islanders.</div>";
        let html = format!("<html><body><div><div>{}</div></div></body></html>", block.repeat(6));

        let mut cache = LruCache::new(16);
        let result = bare_extraction(&html, &Options::default(), &mut cache).unwrap();
        assert_eq!(result.strategy, Strategy::Readability);
        assert!(!result.body.contains(|e| e.tag == Tag::Div));

        let opts = Options {
            output_format: OutputFormat::Xml,
            ..Options::default()
        };
        let xml = extract(&html, &opts).unwrap();
        assert!(xml.contains("ferries"));
        assert!(!xml.contains("<div"));
    }

    #[test]
    fn test_extractor_flags_repeated_documents() {
        let mut extractor = Extractor::new(Options {
            deduplicate: true,
            // paragraphs stay below the check size, the whole body does not
            min_duplcheck_size: 150,
            max_repetitions: 0,
            ..Options::default()
        });
        assert!(extractor.extract(ARTICLE).is_ok());
        let second = extractor.extract(ARTICLE);
        assert_eq!(
            second.unwrap_err().discard_reason(),
            Some(DiscardReason::Duplicate)
        );
    }
}
