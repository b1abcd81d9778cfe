//! Selector rules.
//!
//! Rules are plain predicates over a source element. Ordered rule lists locate
//! the main content container, the comments section and the boilerplate to
//! discard.

use dom_query::Selection;

pub mod comments;
pub mod content;
pub mod discard;
pub mod meta;
pub mod utils;

/// A selector rule: does this element match?
pub type Rule = fn(&Selection) -> bool;

/// First descendant of `root` (in document order) matching the rule.
///
/// # Example
///
/// ```rust
/// use trafilatura_core::selector::{self, utils};
/// use trafilatura_core::dom;
///
/// let doc = dom::parse(r#"<div><p class="content">text</p></div>"#);
/// let root = doc.select("div");
///
/// fn has_content_class(sel: &dom_query::Selection) -> bool {
///     utils::class(sel).contains("content")
/// }
///
/// let result = selector::query(&root, has_content_class);
/// assert!(result.is_some());
/// ```
#[must_use]
pub fn query<'a>(root: &Selection<'a>, rule: Rule) -> Option<Selection<'a>> {
    root.select("*")
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .find(|sel| rule(sel))
}

/// All descendants of `root` matching the rule, in document order.
#[must_use]
pub fn query_all<'a>(root: &Selection<'a>, rule: Rule) -> Vec<Selection<'a>> {
    root.select("*")
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .filter(|sel| rule(sel))
        .collect()
}
