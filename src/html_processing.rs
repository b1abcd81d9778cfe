//! HTML normalization and leaf processing.
//!
//! Normalization runs on the working copy of the source document: unwanted
//! elements are dropped, empty blocks pruned and tags converted to the
//! content vocabulary (`list`, `item`, `head`, `lb`, `quote`, `hi`, `del`,
//! `link`). Leaf processing then validates text copied out of that tree.

use dom_query::{Document, Selection};
use tracing::debug;

use crate::dom;
use crate::etree;
use crate::extractor::tags::{hi_rend, CUT_EMPTY_ELEMS, HI_TAGS, MANUALLY_CLEANED, MANUALLY_STRIPPED};
use crate::filters::{duplicate_test, text_chars_test, text_filter, trim};
use crate::lru::LruCache;
use crate::options::Options;
use crate::selector::{self, comments::COMMENTS_DISCARD, discard::DISCARD, Rule};
use crate::tree::{Element, Tag};

/// Parse an HTML string.
///
/// Returns `None` when there is nothing to extract from: blank input, or a
/// body without elements and without text.
#[must_use]
pub fn load_html(html: &str) -> Option<Document> {
    if html.trim().is_empty() {
        return None;
    }
    let doc = dom::parse(html);
    let body = doc.select("body");
    if body.is_empty() {
        return None;
    }
    if dom::children(&body).is_empty() && dom::text_content(&body).trim().is_empty() {
        debug!("parsed tree has no content");
        return None;
    }
    Some(doc)
}

/// Drop unwanted elements and prune empty blocks.
///
/// Subtrees of `MANUALLY_CLEANED` elements (and tables, when excluded) are
/// removed; their trailing text stays. `MANUALLY_STRIPPED` tags are unwrapped.
pub fn tree_cleaning(doc: &Document, include_tables: bool) {
    let mut cleaned: Vec<&str> = MANUALLY_CLEANED.to_vec();
    if !include_tables {
        cleaned.push("table");
    }
    doc.select(&cleaned.join(", ")).remove();

    let root = doc.select("html");
    prune_html(&root);
    dom::strip_tags(&root, &MANUALLY_STRIPPED);
}

/// Remove `CUT_EMPTY_ELEMS` elements without any child node.
pub fn prune_html(root: &Selection) {
    for node in root.select("*").nodes() {
        let sel = Selection::from(*node);
        let tag = dom::tag_name(&sel).unwrap_or_default();
        if CUT_EMPTY_ELEMS.contains(tag.as_str()) && node.first_child().is_none() {
            sel.remove();
        }
    }
}

fn discard_by_rules(root: &Selection, rules: &[Rule]) {
    for rule in rules {
        for sel in selector::query_all(root, *rule) {
            sel.remove();
        }
    }
}

/// Remove boilerplate sections under `root`.
pub fn discard_unwanted(root: &Selection) {
    discard_by_rules(root, &DISCARD);
}

/// Remove comment debris under `root`.
pub fn discard_unwanted_comments(root: &Selection) {
    discard_by_rules(root, &COMMENTS_DISCARD);
}

fn rename_all(sel: &Selection, new_tag: &str) {
    for node in sel.nodes() {
        dom::rename(&Selection::from(*node), new_tag);
    }
}

/// Convert HTML tags to the content vocabulary.
///
/// Anchors survive as `link` inside lists, divs and (when included) tables;
/// every other anchor is unwrapped.
pub fn convert_tags(doc: &Document, include_formatting: bool, include_tables: bool) {
    for node in doc.select("ul, ol, dl").nodes() {
        let list = Selection::from(*node);
        rename_all(&list.select("dd, dt, li"), "item");
        rename_all(&list.select("a"), "link");
        dom::rename(&list, "list");
    }
    rename_all(&doc.select("div a"), "link");
    if include_tables {
        rename_all(&doc.select("table a"), "link");
    }
    let root = doc.select("html");
    dom::strip_tags(&root, &["a"]);

    rename_all(&doc.select("h1, h2, h3, h4, h5, h6"), "head");
    rename_all(&doc.select("br, hr"), "lb");
    rename_all(&doc.select("blockquote, pre, q"), "quote");

    if include_formatting {
        for node in doc.select(&HI_TAGS.join(", ")).nodes() {
            let sel = Selection::from(*node);
            let rend = dom::tag_name(&sel).as_deref().and_then(hi_rend);
            dom::rename(&sel, "hi");
            if let Some(rend) = rend {
                dom::set_attribute(&sel, "rend", rend);
            }
        }
    } else {
        dom::strip_tags(&root, &HI_TAGS);
    }

    for node in doc.select("del, s, strike").nodes() {
        let sel = Selection::from(*node);
        dom::rename(&sel, "del");
        dom::set_attribute(&sel, "rend", "overstrike");
    }
}

/// Copy a source element without its children: tag, attributes, text, tail.
#[must_use]
pub fn copy_leaf(sel: &Selection) -> Element {
    let tag = dom::tag_name(sel).unwrap_or_default();
    let mut element = Element::new(Tag::from_name(&tag));
    element.attrs = dom::get_all_attributes(sel);
    element.text = non_empty(etree::text(sel));
    element.tail = non_empty(etree::tail(sel));
    element
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

fn is_duplicate(element: &Element, cache: &mut LruCache, opts: &Options) -> bool {
    opts.deduplicate && duplicate_test(&element.text_content(), cache, opts)
}

/// Validate a text leaf: trim it, fall back on its tail, filter boilerplate
/// and duplicates.
///
/// With `comments_fix` a line break carrying text becomes a paragraph;
/// without it line breaks pass through with a trimmed tail.
#[must_use]
pub fn handle_textnode(
    mut element: Element,
    comments_fix: bool,
    cache: &mut LruCache,
    opts: &Options,
) -> Option<Element> {
    if element.text.is_none() && element.tail.is_none() {
        return None;
    }
    if !comments_fix && element.tag == Tag::Lb {
        element.tail = element.tail.as_deref().map(trim).filter(|t| !t.is_empty());
        return Some(element);
    }
    if element.text.is_none() {
        element.text = element.tail.take();
        if comments_fix && element.tag == Tag::Lb {
            element.tag = Tag::P;
        }
    }

    element.text = element.text.as_deref().map(trim);
    element.tail = element.tail.as_deref().map(trim).filter(|t| !t.is_empty());

    let has_word = element
        .text
        .as_deref()
        .is_some_and(|t| t.chars().any(char::is_alphanumeric));
    if !has_word || text_filter(&element) || is_duplicate(&element, cache, opts) {
        return None;
    }
    Some(element)
}

/// Lighter validation for elements whose children are handled elsewhere.
///
/// Empty leaves are dropped; a leaf without text takes its tail as text
/// (line breaks excepted).
#[must_use]
pub fn process_node(mut element: Element, cache: &mut LruCache, opts: &Options) -> Option<Element> {
    let blank = |s: &Option<String>| s.as_deref().is_none_or(str::is_empty);
    if element.children.is_empty() && blank(&element.text) && blank(&element.tail) {
        return None;
    }

    element.text = element.text.as_deref().map(trim).filter(|t| !t.is_empty());
    element.tail = element.tail.as_deref().map(trim).filter(|t| !t.is_empty());
    if element.tag != Tag::Lb && element.text.is_none() && element.tail.is_some() {
        element.text = element.tail.take();
    }

    let has_content = element.text.is_some() || element.tail.is_some();
    if has_content && (text_filter(&element) || is_duplicate(&element, cache, opts)) {
        return None;
    }
    Some(element)
}

/// Whether the subtree holds paragraph text (`p` elements with text).
#[must_use]
pub fn has_paragraph_text(root: &Selection) -> bool {
    root.select("p").nodes().iter().any(|node| {
        let text = dom::text_content(&Selection::from(*node));
        text_chars_test(Some(&*text))
    })
}
