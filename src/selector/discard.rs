//! Boilerplate discard rules.
//!
//! Elements matching these rules are removed from a candidate container
//! before extraction: footers, related content, sharing widgets, navigation,
//! bylines, comment debris and hidden blocks.

use dom_query::Selection;

use crate::selector::comments::is_comment_debris;
use crate::selector::utils::{attr, class, id, is_one_of_tags};
use crate::selector::Rule;

/// Overall discard rules.
pub static DISCARD: [Rule; 4] = [
    discard_rule_footer,
    discard_rule_boilerplate,
    discard_rule_comment_debris,
    discard_rule_hidden,
];

/// Footers and bottom bars, any tag.
#[must_use]
pub fn discard_rule_footer(sel: &Selection) -> bool {
    let id = id(sel);
    let class = class(sel);

    id.contains("footer") || class.contains("footer") || id.contains("bottom") || class.contains("bottom")
}

/// Related posts, sharing, navigation, bylines and widgets on block elements.
#[must_use]
pub fn discard_rule_boilerplate(sel: &Selection) -> bool {
    if !is_one_of_tags(sel, &["div", "item", "list", "p", "section", "span"]) {
        return false;
    }
    let id = id(sel);
    let class = class(sel);
    let lower_class = class.to_lowercase();

    id.contains("related")
        || lower_class.contains("related")
        || id.contains("viral")
        || class.contains("viral")
        || id.starts_with("shar")
        || class.starts_with("shar")
        || class.contains("share-")
        || id.contains("social")
        || class.contains("social")
        || class.contains("sociable")
        || id.contains("syndication")
        || class.contains("syndication")
        || id.starts_with("jp-")
        || id.starts_with("dpsp-content")
        || id.contains("teaser")
        || lower_class.contains("teaser")
        || id.contains("newsletter")
        || class.contains("newsletter")
        || id.contains("cookie")
        || class.contains("cookie")
        || id.contains("tags")
        || class.contains("tags")
        || id.contains("sidebar")
        || class.contains("sidebar")
        || id.contains("banner")
        || class.contains("banner")
        || class.contains("meta")
        || id.contains("menu")
        || class.contains("menu")
        || id.starts_with("nav")
        || class.starts_with("nav")
        || id.contains("navigation")
        || lower_class.contains("navigation")
        || attr(sel, "role").contains("navigation")
        || class.contains("navbox")
        || class.starts_with("post-nav")
        || id.contains("breadcrumb")
        || class.contains("breadcrumb")
        || id.contains("bread-crumb")
        || class.contains("bread-crumb")
        || id.contains("author")
        || class.contains("author")
        || id.contains("button")
        || class.contains("button")
        || id.contains("caption")
        || class.contains("caption")
        || lower_class.contains("byline")
        || class.contains("rating")
        || class.starts_with("widget")
        || class.contains("attachment")
        || class.contains("timestamp")
        || class.contains("user-info")
        || class.contains("user-profile")
        || class.contains("-ad-")
        || class.contains("-icon")
        || class.contains("article-infos")
        || lower_class.contains("infoline")
}

/// Comment titles, reply links and spam notices, any tag.
#[must_use]
pub fn discard_rule_comment_debris(sel: &Selection) -> bool {
    is_comment_debris(&id(sel), &class(sel))
}

/// Hidden elements.
#[must_use]
pub fn discard_rule_hidden(sel: &Selection) -> bool {
    let class = class(sel);
    let style = attr(sel, "style");

    class.starts_with("hide-")
        || class.contains("hide-print")
        || id(sel).contains("hidden")
        || style.contains("hidden")
        || attr(sel, "hidden").contains("hidden")
        || class.contains("noprint")
        || style.contains("display:none")
        || class.contains(" hidden")
}
