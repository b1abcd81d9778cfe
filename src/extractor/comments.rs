//! Comment extraction.
//!
//! Runs before main-content extraction: a comments section that yields
//! content is detached from the document, so its text can never show up in
//! the main content.

use dom_query::{Document, Selection};
use tracing::debug;

use super::handlers::handle_textelem;
use super::state::ExtractionState;
use crate::dom;
use crate::html_processing::discard_unwanted_comments;
use crate::lru::LruCache;
use crate::options::Options;
use crate::selector::{self, comments::COMMENTS};
use crate::tree::{Element, Tag};

fn process_comments_section(subtree: &Selection, state: &mut ExtractionState) -> Element {
    let mut comments = Element::new(Tag::Body);
    for node in subtree.select("*").nodes() {
        if state.is_done(node.id) {
            continue;
        }
        if let Some(mut element) = handle_textelem(&Selection::from(*node), state) {
            element.clear_attrs();
            comments.push(element);
        }
        state.mark_done(node.id);
    }
    comments
}

fn clean_section(section: &Selection, state: &mut ExtractionState) {
    discard_unwanted_comments(section);
    dom::strip_tags(section, &["a", "link", "span"]);
    state.reset_potential_tags(false, false);
}

/// Whether a section yields comments, judged on a cleaned copy.
fn yields_comments(subtree: &Selection, opts: &Options) -> bool {
    let copy = Document::from(dom::outer_html(subtree).to_string());
    let section = copy.select("body").children().first();
    let mut scratch = LruCache::new(opts.lru_size);
    let mut state = ExtractionState::new(&mut scratch, opts);
    clean_section(&section, &mut state);
    !process_comments_section(&section, &mut state).is_empty()
}

/// Extract the comments section and detach it from the document.
///
/// Returns the comments tree, its flattened text and the text length in
/// characters. Sections are tried on a copy first; without a section that
/// yields content the document is left untouched.
pub fn extract_comments(doc: &Document, cache: &mut LruCache, opts: &Options) -> (Element, String, usize) {
    let root = doc.select("html");
    let mut state = ExtractionState::new(cache, opts);
    let mut comments = Element::new(Tag::Body);

    for (index, rule) in COMMENTS.iter().enumerate() {
        let Some(subtree) = selector::query(&root, *rule) else {
            continue;
        };
        if !yields_comments(&subtree, opts) {
            debug!("comments rule {} matched an empty section", index + 1);
            continue;
        }
        clean_section(&subtree, &mut state);
        comments = process_comments_section(&subtree, &mut state);
        if !comments.is_empty() {
            debug!("comments found with rule {}", index + 1);
            subtree.remove();
            break;
        }
    }

    let text = comments.text_content();
    let len = text.chars().count();
    (comments, text, len)
}
