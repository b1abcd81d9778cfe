//! Attribute and tag accessors for rule predicates.
//!
//! Missing values read as empty strings, so a rule is a plain boolean
//! expression over `id`, `class` and friends.

use dom_query::Selection;

use crate::dom;

#[inline]
#[must_use]
pub fn id(sel: &Selection) -> String {
    dom::id(sel).unwrap_or_default()
}

#[inline]
#[must_use]
pub fn class(sel: &Selection) -> String {
    dom::class_name(sel).unwrap_or_default()
}

#[inline]
#[must_use]
pub fn attr(sel: &Selection, name: &str) -> String {
    dom::get_attribute(sel, name).unwrap_or_default()
}

#[inline]
#[must_use]
pub fn tag(sel: &Selection) -> String {
    dom::tag_name(sel).unwrap_or_default()
}

/// Whether the element's tag is in `tags`.
///
/// ```rust
/// use trafilatura_core::{dom, selector::utils::is_one_of_tags};
///
/// let doc = dom::parse("<body><section>Reader comments</section></body>");
/// assert!(is_one_of_tags(&doc.select("section"), &["div", "list", "section"]));
/// assert!(!is_one_of_tags(&doc.select("section"), &["p"]));
/// ```
#[must_use]
pub fn is_one_of_tags(sel: &Selection, tags: &[&str]) -> bool {
    let name = tag(sel);
    tags.iter().any(|t| *t == name)
}

/// Content containers: `article`, `div`, `main`, `section`.
#[inline]
#[must_use]
pub fn is_container(sel: &Selection) -> bool {
    is_one_of_tags(sel, &["article", "div", "main", "section"])
}
