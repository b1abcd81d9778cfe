//! Main content extraction.
//!
//! Candidate containers are tried in rule order. The first container that
//! yields content wins and marks the result as confident. When nothing is
//! found, or too little, paragraphs are recovered from the whole document.

use dom_query::{Document, Selection};
use tracing::debug;

use super::handlers::{handle_paragraphs, handle_quotes, handle_textelem};
use super::state::ExtractionState;
use super::tags::{ElementKind, RECOVERY_TAGS};
use crate::dom;
use crate::html_processing::{discard_unwanted, has_paragraph_text};
use crate::link_density::{link_density_test, link_density_test_tables};
use crate::selector::{self, content::CONTENT_RULES};
use crate::tree::{Element, Tag};

fn remove_dense(root: &Selection, css: &str, test: fn(&Selection) -> bool) {
    for node in root.select(css).nodes() {
        let sel = Selection::from(*node);
        if test(&sel) {
            debug!("removing link-heavy {css}");
            sel.remove();
        }
    }
}

/// Visit every unconsumed descendant of `root` and collect handler output.
fn collect_from(root: &Selection, state: &mut ExtractionState, body: &mut Element) {
    for node in root.select("*").nodes() {
        if state.is_done(node.id) {
            continue;
        }
        if let Some(element) = handle_textelem(&Selection::from(*node), state) {
            body.push(element);
        }
        state.mark_done(node.id);
    }
}

/// Extract the main content.
///
/// Returns the content tree, its flattened text, the text length in
/// characters and whether a candidate rule (not recovery) produced it.
pub fn extract_content(doc: &Document, state: &mut ExtractionState) -> (Element, String, usize, bool) {
    let opts = state.opts;
    let root = doc.select("html");
    let mut body = Element::new(Tag::Body);
    let mut sure_thing = false;

    for (index, rule) in CONTENT_RULES.iter().enumerate() {
        let Some(subtree) = selector::query(&root, *rule) else {
            continue;
        };
        discard_unwanted(&subtree);
        remove_dense(&subtree, "list", link_density_test);
        remove_dense(&subtree, "div", link_density_test);
        if opts.include_tables {
            remove_dense(&subtree, "table", link_density_test_tables);
        }
        if dom::children(&subtree).is_empty() {
            continue;
        }

        state.reset_potential_tags(opts.include_tables, !has_paragraph_text(&subtree));
        debug!("potential tags: {:?}", state.potential_tags_sorted());
        dom::strip_tags(&subtree, &["link", "span"]);

        collect_from(&subtree, state, &mut body);

        while body
            .children
            .last()
            .is_some_and(|last| last.tag == Tag::Head && last.tail.is_none())
        {
            body.children.pop();
        }
        if !body.is_empty() {
            sure_thing = true;
            debug!("content found with rule {}", index + 1);
            break;
        }
    }

    let mut text = body.text_content();
    let mut len_text = text.chars().count();
    if body.is_empty() || len_text < opts.min_extracted_size {
        recover_wild_paragraphs(doc, &mut body, state);
        text = body.text_content();
        len_text = text.chars().count();
    }

    body.strip_tags(|e| e.tag == Tag::Div);
    (body, text, len_text, sure_thing)
}

/// Collect paragraphs and quotes from anywhere in the document.
///
/// Elements consumed earlier in the run are skipped, so text already in
/// `body` is not added twice.
pub fn recover_wild_paragraphs(doc: &Document, body: &mut Element, state: &mut ExtractionState) {
    debug!("taking all paragraph-like elements");
    let root = doc.select("html");
    discard_unwanted(&root);
    dom::strip_tags(&root, &["a", "link", "span"]);
    state.reset_potential_tags(false, false);

    for node in root.select(&RECOVERY_TAGS.join(", ")).nodes() {
        if state.is_done(node.id) {
            continue;
        }
        let sel = Selection::from(*node);
        let tag = dom::tag_name(&sel).unwrap_or_default();
        let result = match ElementKind::from_tag(&tag) {
            ElementKind::Quote => handle_quotes(&sel, state),
            _ => handle_paragraphs(&sel, state),
        };
        if let Some(element) = result {
            body.push(element);
        }
        state.mark_done(node.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html_processing::{convert_tags, tree_cleaning};
    use crate::lru::LruCache;
    use crate::options::Options;

    fn prepared(html: &str) -> Document {
        let doc = dom::parse(html);
        tree_cleaning(&doc, true);
        convert_tags(&doc, false, true);
        doc
    }

    fn sentence(n: usize) -> String {
        format!("Paragraph number {n} carries enough words to look like real article prose for the reader.")
    }

    #[test]
    fn test_candidate_rule_is_confident() {
        let html = format!(
            r#"<html><body><div class="entry-content"><p>{}</p><p>{}</p><p>{}</p></div><p>Outside text that should stay out.</p></body></html>"#,
            sentence(1),
            sentence(2),
            sentence(3)
        );
        let doc = prepared(&html);
        let mut cache = LruCache::new(64);
        let opts = Options::default();
        let mut state = ExtractionState::new(&mut cache, &opts);

        let (body, text, len, sure) = extract_content(&doc, &mut state);
        assert!(sure);
        assert_eq!(body.children.len(), 3);
        assert!(body.children.iter().all(|e| e.tag == Tag::P));
        assert!(len >= opts.min_extracted_size);
        assert!(!text.contains("Outside"));
    }

    #[test]
    fn test_recovery_without_candidate() {
        let html = "<html><body><div class=\"wrapper\"><p>First wild paragraph.</p><p>Second wild paragraph.</p></div><p>Third wild paragraph.</p></body></html>";
        let doc = prepared(html);
        let mut cache = LruCache::new(64);
        let opts = Options::default();
        let mut state = ExtractionState::new(&mut cache, &opts);

        let (body, _, _, sure) = extract_content(&doc, &mut state);
        assert!(!sure);
        let texts: Vec<&str> = body.children.iter().map(Element::text_str).collect();
        assert_eq!(
            texts,
            vec!["First wild paragraph.", "Second wild paragraph.", "Third wild paragraph."]
        );
    }

    #[test]
    fn test_consumed_nodes_are_not_revisited() {
        let html = "<html><body><article><p>Only paragraph of the article.</p></article></body></html>";
        let doc = prepared(html);
        let mut cache = LruCache::new(64);
        let opts = Options::default();
        let mut state = ExtractionState::new(&mut cache, &opts);

        let (mut body, _, _, sure) = extract_content(&doc, &mut state);
        assert!(sure);
        assert_eq!(body.children.len(), 1);

        recover_wild_paragraphs(&doc, &mut body, &mut state);
        assert_eq!(body.children.len(), 1);
    }

    #[test]
    fn test_trailing_heads_are_dropped() {
        let html = format!(
            "<html><body><article><p>{}</p><h2>Related</h2></article></body></html>",
            sentence(1).repeat(3)
        );
        let doc = prepared(&html);
        let mut cache = LruCache::new(64);
        let opts = Options::default();
        let mut state = ExtractionState::new(&mut cache, &opts);

        let (body, _, _, _) = extract_content(&doc, &mut state);
        assert_eq!(body.children.last().map(|e| e.tag.clone()), Some(Tag::P));
    }

    #[test]
    fn test_link_lists_are_removed() {
        let html = format!(
            r#"<html><body><article><ul><li><a href="/a">Home</a></li><li><a href="/b">News</a></li></ul><p>{}</p></article></body></html>"#,
            sentence(1).repeat(3)
        );
        let doc = prepared(&html);
        let mut cache = LruCache::new(64);
        let opts = Options::default();
        let mut state = ExtractionState::new(&mut cache, &opts);

        let (body, text, _, _) = extract_content(&doc, &mut state);
        assert!(!body.contains(|e| e.tag == Tag::List));
        assert!(!text.contains("Home"));
    }

    #[test]
    fn test_div_text_without_paragraphs() {
        let html = "<html><body><main><div>Text held directly by a division element.</div></main></body></html>";
        let doc = prepared(html);
        let mut cache = LruCache::new(64);
        let opts = Options::default();
        let mut state = ExtractionState::new(&mut cache, &opts);

        let (body, text, _, sure) = extract_content(&doc, &mut state);
        assert!(sure);
        assert!(!body.contains(|e| e.tag == Tag::Div));
        assert_eq!(text, "Text held directly by a division element.");
    }
}
