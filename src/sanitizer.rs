//! Sanitizer for generic-algorithm output.
//!
//! Output of the generic algorithms is plain HTML. It is brought back to the
//! content vocabulary: denylisted subtrees go away, wrappers are unwrapped,
//! HTML tags are converted and whatever is still outside the vocabulary is
//! merged into its textual neighbourhood. Only denylisted subtrees lose text.

use crate::extractor::tags::{
    hi_rend, CUT_EMPTY_ELEMS, HI_TAGS, MANUALLY_STRIPPED, SANITIZED_TAG_SET, TEI_VALID_ATTRS,
    TEI_VALID_TAGS,
};
use crate::tree::{Element, Tag};

/// Whether the tree holds an element from the sanitize denylist.
#[must_use]
pub fn needs_sanitizing(tree: &Element) -> bool {
    tree.contains(|e| SANITIZED_TAG_SET.contains(e.tag.as_str()))
}

/// Map an HTML tag onto the vocabulary, setting the attributes it implies.
fn convert_element(element: &mut Element, include_formatting: bool) {
    let name = element.tag.as_str().to_string();
    match name.as_str() {
        "ul" | "ol" | "dl" => element.tag = Tag::List,
        "li" | "dd" | "dt" => element.tag = Tag::Item,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => element.tag = Tag::Head,
        "br" | "hr" => element.tag = Tag::Lb,
        "blockquote" | "pre" | "q" => element.tag = Tag::Quote,
        "del" | "s" | "strike" => {
            element.tag = Tag::Del;
            element.set("rend", "overstrike");
        }
        "tr" => element.tag = Tag::Row,
        "td" => element.tag = Tag::Cell,
        "th" => {
            element.tag = Tag::Cell;
            element.set("role", "head");
        }
        _ if include_formatting => {
            if let Some(rend) = hi_rend(&name) {
                element.tag = Tag::Hi;
                element.set("rend", rend);
            }
        }
        _ => {}
    }
}

/// Bring a tree to the content vocabulary.
///
/// Returns the tree, its flattened text and the text length in characters.
#[must_use]
pub fn sanitize_tree(mut tree: Element, include_formatting: bool) -> (Element, String, usize) {
    tree.remove_elements(|e| SANITIZED_TAG_SET.contains(e.tag.as_str()), true);
    tree.strip_tags(|e| {
        let name = e.tag.as_str();
        MANUALLY_STRIPPED.contains(&name) || name == "a" || name == "span"
    });
    tree.remove_elements(
        |e| CUT_EMPTY_ELEMS.contains(e.tag.as_str()) && e.children.is_empty() && e.text_str().trim().is_empty(),
        true,
    );

    if !include_formatting {
        tree.strip_tags(|e| HI_TAGS.contains(&e.tag.as_str()));
    }
    tree.for_each_mut(&mut |e| convert_element(e, include_formatting));

    tree.strip_tags(|e| !TEI_VALID_TAGS.contains(e.tag.as_str()));
    tree.for_each_mut(&mut |e| e.attrs.retain(|(key, _)| TEI_VALID_ATTRS.contains(&key.as_str())));

    let text = tree.text_content();
    let len = text.chars().count();
    (tree, text, len)
}
