//! Source document access over `dom_query`.
//!
//! The document is mutated while it is cleaned, while boilerplate is discarded
//! and when the comments section is detached. Everything else only reads it.

pub use dom_query::{Document, NodeId, Selection};
pub use tendril::StrTendril;

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Independent copy of a document, for the comparison algorithms.
#[must_use]
pub fn clone_document(doc: &Document) -> Document {
    Document::from(doc.html().to_string())
}

#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|value| value.to_string())
}

#[inline]
#[must_use]
pub fn id(sel: &Selection) -> Option<String> {
    get_attribute(sel, "id")
}

#[inline]
#[must_use]
pub fn class_name(sel: &Selection) -> Option<String> {
    get_attribute(sel, "class")
}

#[inline]
pub fn set_attribute(sel: &Selection, name: &str, value: &str) {
    sel.set_attr(name, value);
}

/// Attributes of the first node in document order, empty for an empty selection.
#[must_use]
pub fn get_all_attributes(sel: &Selection) -> Vec<(String, String)> {
    let Some(node) = sel.nodes().first() else {
        return Vec::new();
    };
    node.attrs()
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect()
}

/// Lowercase tag name of the first node.
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    let node = sel.nodes().first()?;
    node.node_name().map(|name| name.to_string())
}

/// Identity of the first node. Stable for the lifetime of the document.
#[must_use]
pub fn node_id(sel: &Selection) -> Option<NodeId> {
    sel.nodes().first().map(|node| node.id)
}

/// Text of the node and all of its descendants.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

#[inline]
#[must_use]
pub fn parent<'a>(sel: &Selection<'a>) -> Selection<'a> {
    sel.parent()
}

/// Element children, text nodes excluded.
#[inline]
#[must_use]
pub fn children<'a>(sel: &Selection<'a>) -> Selection<'a> {
    sel.children()
}

/// Next element sibling, text in between is skipped.
#[must_use]
pub fn next_element_sibling<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    let mut sibling = sel.nodes().first()?.next_sibling();
    while let Some(node) = sibling {
        if node.is_element() {
            return Some(Selection::from(node));
        }
        sibling = node.next_sibling();
    }
    None
}

/// Unwrap every descendant with one of the given tags, keeping its content.
#[inline]
pub fn strip_tags(sel: &Selection, tags: &[&str]) {
    sel.strip_elements(tags);
}

#[inline]
pub fn rename(sel: &Selection, new_tag: &str) {
    sel.rename(new_tag);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes() {
        let doc = parse(r#"<body><p id="intro" class="lead" data-x="1">Hello</p></body>"#);
        let p = doc.select("p");

        assert_eq!(id(&p).as_deref(), Some("intro"));
        assert_eq!(class_name(&p).as_deref(), Some("lead"));
        assert_eq!(get_all_attributes(&p).len(), 3);
        set_attribute(&p, "rend", "#b");
        assert_eq!(get_attribute(&p, "rend").as_deref(), Some("#b"));
        assert!(get_all_attributes(&doc.select("table")).is_empty());
    }

    #[test]
    fn test_rename_and_strip() {
        let doc = parse("<body><h2>Title <span>part</span></h2></body>");
        let heading = doc.select("h2");
        strip_tags(&heading, &["span"]);
        rename(&heading, "head");

        let head = doc.select("head");
        assert_eq!(tag_name(&doc.select("body").children()).as_deref(), Some("head"));
        assert_eq!(&*text_content(&head.last()), "Title part");
        assert!(doc.select("span").is_empty());
    }

    #[test]
    fn test_next_element_sibling_skips_text() {
        let doc = parse("<body><div><p id='a'>a</p> text <p id='b'>b</p></div></body>");
        let next = next_element_sibling(&doc.select("#a")).unwrap();
        assert_eq!(id(&next).as_deref(), Some("b"));
        assert!(next_element_sibling(&doc.select("#b")).is_none());
    }

    #[test]
    fn test_node_id_and_clone() {
        let doc = parse("<body><p>one</p><p>two</p></body>");
        assert_eq!(node_id(&doc.select("p").first()), node_id(&doc.select("p").first()));
        assert_ne!(node_id(&doc.select("p").first()), node_id(&doc.select("p").last()));

        let copy = clone_document(&doc);
        doc.select("p").first().remove();
        assert_eq!(doc.select("p").length(), 1);
        assert_eq!(copy.select("p").length(), 2);
    }
}
