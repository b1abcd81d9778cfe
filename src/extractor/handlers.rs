//! Per-element handlers.
//!
//! Handlers read a source element (and, for container kinds, its subtree)
//! and build a fresh content-tree element. The source document is never
//! modified here: consumption is recorded in the [`ExtractionState`] so later
//! passes skip what was already taken.

use dom_query::Selection;
use tracing::debug;

use super::state::ExtractionState;
use super::tags::ElementKind;
use crate::dom;
use crate::filters::{text_chars_test, trim};
use crate::html_processing::{copy_leaf, handle_textnode, process_node};
use crate::tree::{append_text, from_selection, Element, Tag};

/// Dispatch a source element to its handler.
///
/// The caller marks the element itself as consumed; handlers mark the
/// descendants they read.
#[must_use]
pub fn handle_textelem(sel: &Selection, state: &mut ExtractionState) -> Option<Element> {
    let tag = dom::tag_name(sel).unwrap_or_default();
    match ElementKind::from_tag(&tag) {
        ElementKind::List => handle_lists(sel, state),
        ElementKind::Quote => handle_quotes(sel, state),
        ElementKind::Head => handle_titles(sel, state),
        ElementKind::P => handle_paragraphs(sel, state),
        ElementKind::Lb => handle_lb(sel, state),
        ElementKind::Hi => handle_formatting(sel),
        ElementKind::Table if state.is_potential_tag("table") => handle_table(sel, state),
        ElementKind::Table | ElementKind::Div | ElementKind::Other => {
            handle_other_elements(sel, &tag, state)
        }
    }
}

/// Self followed by all descendants, document order.
fn subtree<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    let mut nodes: Vec<Selection<'a>> = sel.nodes().first().map(|n| Selection::from(*n)).into_iter().collect();
    nodes.extend(sel.select("*").nodes().iter().map(|n| Selection::from(*n)));
    nodes
}

fn descendants<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.select("*").nodes().iter().map(|n| Selection::from(*n)).collect()
}

fn has_word(text: &str) -> bool {
    text.chars().any(|c| c.is_alphanumeric() || c == '_')
}

/// Headings: trailing text is dropped, inline children are kept.
#[must_use]
pub fn handle_titles(sel: &Selection, state: &mut ExtractionState) -> Option<Element> {
    let tail = crate::etree::tail(sel);
    if has_word(&tail) {
        debug!("tail in title, stripping: {}", tail.trim());
    }
    state.mark_subtree_done(sel);

    let mut title = from_selection(sel);
    title.tag = Tag::Head;
    title.clear_attrs();
    title.strip_tags(|e| matches!(e.tag, Tag::Other(_)));

    let title = process_node(title, state.cache, state.opts)?;
    has_word(&title.text_content()).then_some(title)
}

/// Formatting outside of paragraphs, wrapped in a new paragraph.
#[must_use]
pub fn handle_formatting(sel: &Selection) -> Option<Element> {
    let leaf = copy_leaf(sel);
    if leaf.text.is_none() && leaf.tail.is_none() {
        return None;
    }

    let mut hi = Element::new(Tag::Hi);
    if let Some(rend) = leaf.get("rend") {
        hi.set("rend", rend);
    }
    hi.text = leaf.text.as_deref().filter(|t| text_chars_test(Some(*t))).map(trim);
    hi.tail = leaf.tail.as_deref().filter(|t| text_chars_test(Some(*t))).map(trim);
    if hi.text.is_none() && hi.tail.is_none() {
        return None;
    }

    let mut paragraph = Element::new(Tag::P);
    paragraph.push(hi);
    Some(paragraph)
}

/// Lists, item by item. Nested items are flattened into their parent item.
#[must_use]
pub fn handle_lists(sel: &Selection, state: &mut ExtractionState) -> Option<Element> {
    let mut list = Element::new(Tag::List);

    for item_node in sel.select("item").nodes() {
        let item_sel = Selection::from(*item_node);
        if state.is_done(item_node.id) {
            continue;
        }

        let mut new_item = Element::new(Tag::Item);
        if dom::children(&item_sel).is_empty() {
            if let Some(processed) = process_node(copy_leaf(&item_sel), state.cache, state.opts) {
                new_item.text = processed.text;
                new_item.tail = processed.tail;
            }
        } else {
            for (i, sub) in subtree(&item_sel).iter().enumerate() {
                if let Some(processed) = handle_textnode(copy_leaf(sub), false, state.cache, state.opts) {
                    let mut child = Element::new(processed.tag);
                    // nested items are merged into this one, keep them apart
                    child.text = match processed.text {
                        Some(text) if i > 0 && child.tag == Tag::Item => Some(format!(" {text}")),
                        text => text,
                    };
                    child.tail = processed.tail;
                    new_item.push(child);
                }
                if let Some(id) = dom::node_id(sub) {
                    state.mark_done(id);
                }
            }
            new_item.strip_tags(|e| e.tag == Tag::Item);
        }

        if new_item.text.is_some() || !new_item.children.is_empty() {
            list.push(new_item);
        }
        state.mark_done(item_node.id);
    }
    state.mark_subtree_done(sel);

    if list.is_empty() || !text_chars_test(Some(&list.iter_text().concat())) {
        return None;
    }
    Some(list)
}

/// Quotes and code blocks: all descendants in one node, nested quotes merged.
#[must_use]
pub fn handle_quotes(sel: &Selection, state: &mut ExtractionState) -> Option<Element> {
    let tag = Tag::from_name(&dom::tag_name(sel).unwrap_or_default());
    let mut quote = Element::new(tag.clone());

    let nodes = subtree(sel);
    let mut outer_tail = None;
    for (i, sub) in nodes.iter().enumerate() {
        let mut leaf = copy_leaf(sub);
        if i == 0 {
            outer_tail = leaf.tail.take();
        }
        if let Some(processed) = process_node(leaf, state.cache, state.opts) {
            let mut child = Element::new(processed.tag);
            child.text = processed.text;
            child.tail = processed.tail;
            quote.push(child);
        }
    }
    state.mark_subtree_done(sel);

    if quote.is_empty() {
        return None;
    }
    quote.strip_tags(|e| e.tag == Tag::Quote || e.tag == tag);
    quote.tail = outer_tail.map(|t| trim(&t)).filter(|t| !t.is_empty());
    Some(quote)
}

/// Tables: rows start at `tr`, cells carry their flattened text.
///
/// A table nested inside is left for a later visit: processing stops where
/// it begins.
#[must_use]
pub fn handle_table(sel: &Selection, state: &mut ExtractionState) -> Option<Element> {
    let mut table = Element::new(Tag::Table);
    let mut row = Element::new(Tag::Row);

    for (i, sub) in subtree(sel).iter().enumerate() {
        let tag = dom::tag_name(sub).unwrap_or_default();
        match tag.as_str() {
            "table" if i > 0 => {
                debug!("nested table, stopping");
                break;
            }
            "tr" => {
                if !row.is_empty() {
                    table.push(std::mem::replace(&mut row, Element::new(Tag::Row)));
                }
            }
            "td" | "th" => {
                let text = trim(&dom::text_content(sub));
                let processed = process_node(Element::with_text(Tag::Cell, text), state.cache, state.opts);
                if let Some(text) = processed.and_then(|cell| cell.text).filter(|t| !t.is_empty()) {
                    let mut cell = Element::with_text(Tag::Cell, text);
                    if tag == "th" {
                        cell.set("role", "head");
                    }
                    row.push(cell);
                }
            }
            _ => {}
        }
        if let Some(id) = dom::node_id(sub) {
            state.mark_done(id);
        }
    }

    if !row.is_empty() {
        table.push(row);
    }
    (!table.is_empty()).then_some(table)
}

/// A standalone line break followed by text becomes a paragraph.
#[must_use]
pub fn handle_lb(sel: &Selection, state: &mut ExtractionState) -> Option<Element> {
    let leaf = copy_leaf(sel);
    if !text_chars_test(leaf.tail.as_deref()) {
        return None;
    }
    let processed = process_node(leaf, state.cache, state.opts)?;
    processed.tail.map(|tail| Element::with_text(Tag::P, tail))
}

/// Elements without a dedicated handler.
///
/// Only generic blocks (`div`) allowed by the potential tags yield output:
/// their own text becomes a paragraph.
#[must_use]
pub fn handle_other_elements(sel: &Selection, tag: &str, state: &mut ExtractionState) -> Option<Element> {
    if !state.is_potential_tag(tag) {
        return None;
    }
    if tag != "div" {
        debug!("processing other element: {tag}");
        return None;
    }

    let mut processed = handle_textnode(copy_leaf(sel), false, state.cache, state.opts)?;
    processed.clear_attrs();
    if processed.tag == Tag::Div {
        processed.tag = Tag::P;
    }
    Some(processed)
}

/// Paragraphs.
///
/// A paragraph with children is flattened: every descendant in the potential
/// tags becomes a direct child, nested paragraphs contribute their text.
#[must_use]
pub fn handle_paragraphs(sel: &Selection, state: &mut ExtractionState) -> Option<Element> {
    if dom::children(sel).is_empty() {
        let mut leaf = copy_leaf(sel);
        leaf.clear_attrs();
        state.mark_subtree_done(sel);
        return process_node(leaf, state.cache, state.opts);
    }

    let mut own = copy_leaf(sel);
    own.clear_attrs();
    let outer_tail = own.tail.take();

    let mut paragraph = Element::new(Tag::P);
    if own.text.is_some() {
        if let Some(processed) = handle_textnode(own, false, state.cache, state.opts) {
            paragraph.text = processed.text;
        }
    }

    for child in descendants(sel) {
        if state.is_selection_done(&child) {
            continue;
        }
        let tag = dom::tag_name(&child).unwrap_or_default();
        if !state.is_potential_tag(&tag) {
            debug!("unexpected element in paragraph: {tag}");
            continue;
        }

        let mut leaf = copy_leaf(&child);
        if tag == "hi" && !dom::children(&child).is_empty() {
            // one level of nesting is folded into the highlighted text
            let flat = from_selection(&child).text_content();
            leaf.text = (!flat.is_empty()).then_some(flat);
            for node in child.select("*").nodes() {
                state.mark_done(node.id);
            }
        }

        let Some(processed) = handle_textnode(leaf, false, state.cache, state.opts) else {
            continue;
        };

        if tag == "p" {
            debug!("nested paragraph: {}", processed.text_str());
            let target = match paragraph.children.last_mut() {
                Some(last) => &mut last.tail,
                None => &mut paragraph.text,
            };
            for part in [processed.text.as_deref(), processed.tail.as_deref()].into_iter().flatten() {
                if target.as_deref().is_some_and(|t| !t.is_empty()) {
                    append_text(target, " ");
                }
                append_text(target, part);
            }
            continue;
        }

        let mut sub = Element::new(processed.tag.clone());
        if matches!(processed.tag, Tag::Hi | Tag::Del) {
            if let Some(rend) = processed.get("rend") {
                sub.set("rend", rend);
            }
        }
        sub.text = processed.text.filter(|t| text_chars_test(Some(t.as_str())));
        sub.tail = processed.tail;
        paragraph.push(sub);
    }
    state.mark_subtree_done(sel);

    if paragraph.is_empty() && paragraph.text.is_none() {
        debug!("discarding empty paragraph");
        return None;
    }
    if paragraph
        .children
        .last()
        .is_some_and(|last| last.tag == Tag::Lb && last.tail.is_none())
    {
        paragraph.children.pop();
    }
    paragraph.tail = outer_tail.map(|t| trim(&t)).filter(|t| !t.is_empty());
    Some(paragraph)
}
