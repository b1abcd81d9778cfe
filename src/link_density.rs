//! Link density tests.
//!
//! Sections made mostly of link text are navigation or boilerplate. The tests
//! run after tag conversion, when kept anchors have become `link` elements.

use dom_query::Selection;
use tracing::debug;

use crate::dom;
use crate::filters::trim;

/// Trimmed character length of all text under `sel`.
fn text_len(sel: &Selection) -> usize {
    trim(&dom::text_content(sel)).chars().count()
}

/// Summed trimmed length of the `link` descendants.
fn link_len(links: &Selection) -> usize {
    links
        .nodes()
        .iter()
        .map(|node| text_len(&Selection::from(*node)))
        .sum()
}

/// Whether a list or block is rich in links.
///
/// Only short elements are tested: under 100 characters, or under 200 when
/// the element is the last of its siblings. They fail when link text exceeds
/// three quarters of their text.
#[must_use]
pub fn link_density_test(element: &Selection) -> bool {
    let links = element.select("link");
    if links.is_empty() {
        return false;
    }

    let elem_len = text_len(element);
    let limit = if dom::next_element_sibling(element).is_none() {
        200
    } else {
        100
    };
    if elem_len >= limit {
        return false;
    }

    let link_len = link_len(&links);
    debug!(link_len, elem_len, "list link text");
    link_len as f64 > 0.75 * elem_len as f64
}

/// Whether a table is rich in links.
///
/// Only tables over 1000 characters are tested; they fail when link text
/// exceeds half of their text.
#[must_use]
pub fn link_density_test_tables(table: &Selection) -> bool {
    let links = table.select("link");
    if links.is_empty() {
        return false;
    }

    let elem_len = text_len(table);
    if elem_len <= 1000 {
        return false;
    }

    let link_len = link_len(&links);
    debug!(link_len, elem_len, "table link text");
    link_len as f64 > 0.5 * elem_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::Document;

    /// Parse and convert anchors the way tag conversion does.
    fn parse_with_links(html: &str) -> Document {
        let doc = Document::from(html);
        for node in doc.select("a").nodes() {
            dom::rename(&Selection::from(*node), "link");
        }
        doc
    }

    #[test]
    fn test_link_density_nav_menu() {
        let doc = parse_with_links(
            r#"<div><ul><li><a href="/">Home</a></li><li><a href="/about">About</a></li><li><a href="/c">Contact</a></li></ul></div>"#,
        );

        assert!(link_density_test(&doc.select("ul")));
    }

    #[test]
    fn test_link_density_long_element_is_kept() {
        let text = "word ".repeat(60);
        let html = format!("<div><div id=\"a\">{text}<a href=\"/\">x</a></div><p>next</p></div>");
        let doc = parse_with_links(&html);

        assert!(!link_density_test(&doc.select("#a")));
    }

    #[test]
    fn test_link_density_mixed_paragraph() {
        let doc = parse_with_links(
            r#"<div><p id="p">Some regular words around <a href="/">a link</a> here.</p><p>x</p></div>"#,
        );

        assert!(!link_density_test(&doc.select("#p")));
    }

    #[test]
    fn test_link_density_no_links() {
        let doc = parse_with_links("<p>This paragraph has no links at all.</p>");
        assert!(!link_density_test(&doc.select("p")));
    }

    #[test]
    fn test_link_density_table_nav() {
        let rows = r#"<tr><td><a href="/">Navigation Link Category Section Name</a></td></tr>"#.repeat(40);
        let doc = parse_with_links(&format!("<table>{rows}</table>"));

        assert!(link_density_test_tables(&doc.select("table")));
    }

    #[test]
    fn test_link_density_small_table_is_kept() {
        let doc = parse_with_links(
            r#"<table><tr><td><a href="/">Home</a></td><td><a href="/about">About</a></td></tr></table>"#,
        );

        assert!(!link_density_test_tables(&doc.select("table")));
    }
}
