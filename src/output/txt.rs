//! Plain-text flattening of a content tree.

use crate::filters::sanitize;
use crate::tree::{Element, Tag};

/// Own text and trailing text of an element, space-joined.
fn element_text(element: &Element) -> Option<String> {
    match (element.text.as_deref(), element.tail.as_deref()) {
        (Some(text), Some(tail)) => Some(format!("{text} {tail}")),
        (Some(text), None) => Some(text.to_string()),
        (None, Some(tail)) => Some(tail.to_string()),
        (None, None) => None,
    }
}

fn join_onto(target: &mut Option<String>, text: &str) {
    *target = Some(match target.take() {
        Some(existing) => format!("{existing} {text}"),
        None => text.to_string(),
    });
}

fn is_inline(element: &Element) -> bool {
    element.tag == Tag::Hi || matches!(&element.tag, Tag::Other(name) if name == "link")
}

/// Fold inline elements into their neighbourhood: their text joins the
/// previous sibling's tail, or the parent's text for a first child.
pub(crate) fn merge_inline(element: &mut Element) {
    let children = std::mem::take(&mut element.children);
    let mut kept: Vec<Element> = Vec::with_capacity(children.len());
    for mut child in children {
        merge_inline(&mut child);
        if is_inline(&child) {
            // nested inline elements are already folded into the text
            if let Some(text) = element_text(&child) {
                match kept.last_mut() {
                    Some(previous) => join_onto(&mut previous.tail, &text),
                    None => join_onto(&mut element.text, &text),
                }
            }
        } else {
            kept.push(child);
        }
    }
    element.children = kept;
}

fn flatten(element: &Element, out: &mut String) {
    match element_text(element) {
        None => {
            if matches!(element.tag, Tag::Row | Tag::Table) {
                out.push('\n');
            }
        }
        Some(text) => match element.tag {
            Tag::Code
            | Tag::Fw
            | Tag::Head
            | Tag::Lb
            | Tag::List
            | Tag::P
            | Tag::Quote
            | Tag::Row
            | Tag::Table => {
                out.push('\n');
                out.push_str(&text);
                out.push('\n');
            }
            Tag::Item => {
                out.push_str("\n- ");
                out.push_str(&text);
                out.push('\n');
            }
            Tag::Cell => {
                out.push('|');
                out.push_str(&text);
                out.push('|');
            }
            Tag::Comments => out.push_str("\n\n"),
            _ => {
                out.push_str(&text);
                out.push(' ');
            }
        },
    }
    for child in &element.children {
        flatten(child, out);
    }
}

/// Convert a content tree to plain text.
///
/// Block elements sit on their own lines, list items are dashed and table
/// cells are pipe-delimited. The result is sanitized line by line.
#[must_use]
pub fn xmltotxt(tree: &Element) -> String {
    let mut tree = tree.clone();
    merge_inline(&mut tree);
    let mut out = String::new();
    flatten(&tree, &mut out);
    sanitize(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(children: Vec<Element>) -> Element {
        let mut body = Element::new(Tag::Body);
        body.children = children;
        body
    }

    #[test]
    fn test_paragraphs_and_heads_are_lines() {
        let tree = body(vec![
            Element::with_text(Tag::Head, "Title"),
            Element::with_text(Tag::P, "First paragraph."),
            Element::with_text(Tag::P, "Second paragraph."),
        ]);
        assert_eq!(xmltotxt(&tree), "Title\nFirst paragraph.\nSecond paragraph.");
    }

    #[test]
    fn test_list_items_are_dashed() {
        let mut list = Element::new(Tag::List);
        list.push(Element::with_text(Tag::Item, "one"));
        list.push(Element::with_text(Tag::Item, "two"));
        let tree = body(vec![list]);
        assert_eq!(xmltotxt(&tree), "- one\n- two");
    }

    #[test]
    fn test_cells_are_pipe_delimited() {
        let mut row = Element::new(Tag::Row);
        row.push(Element::with_text(Tag::Cell, "a"));
        row.push(Element::with_text(Tag::Cell, "b"));
        let mut table = Element::new(Tag::Table);
        table.push(row);
        let tree = body(vec![table]);
        assert_eq!(xmltotxt(&tree), "|a||b|");
    }

    #[test]
    fn test_hi_is_merged_into_paragraph() {
        let mut p = Element::with_text(Tag::P, "Hello");
        let mut hi = Element::with_text(Tag::Hi, "big");
        hi.tail = Some("world".to_string());
        p.push(hi);
        let tree = body(vec![p]);
        assert_eq!(xmltotxt(&tree), "Hello big world");
    }

    #[test]
    fn test_line_break_tail_is_own_line() {
        let mut p = Element::with_text(Tag::P, "before");
        let mut lb = Element::new(Tag::Lb);
        lb.tail = Some("after".to_string());
        p.push(lb);
        let tree = body(vec![p]);
        assert_eq!(xmltotxt(&tree), "before\nafter");
    }

    #[test]
    fn test_flattening_keeps_every_fragment() {
        let mut quote = Element::with_text(Tag::Quote, "quoted");
        quote.tail = Some("tail text".to_string());
        let tree = body(vec![Element::with_text(Tag::P, "para"), quote]);
        let text = xmltotxt(&tree);
        for fragment in tree.iter_text() {
            assert!(text.contains(fragment.trim()));
        }
        assert_eq!(text, "para\nquoted tail text");
    }
}
