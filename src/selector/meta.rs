//! Metadata rules.
//!
//! Title and author rules match the element holding the value. Category and
//! tag rules match a container; the values are the anchors inside it whose
//! link points to a category or tag page.

use dom_query::Selection;

use crate::dom;
use crate::selector::utils::{attr, class, id, is_one_of_tags, tag};
use crate::selector::Rule;

/// Title rules in priority order.
pub static META_TITLE: [Rule; 4] = [meta_title_rule_1, meta_title_rule_2, meta_title_rule_3, meta_title_rule_4];

/// Author rules in priority order.
pub static META_AUTHOR: [Rule; 4] = [
    meta_author_rule_1,
    meta_author_rule_2,
    meta_author_rule_3,
    meta_author_rule_4,
];

/// Category container rules in priority order.
pub static META_CATEGORIES: [Rule; 6] = [
    meta_categories_rule_1,
    meta_categories_rule_2,
    meta_categories_rule_3,
    meta_categories_rule_4,
    meta_categories_rule_5,
    meta_categories_rule_6,
];

/// Tag container rules in priority order.
pub static META_TAGS: [Rule; 4] = [meta_tags_rule_1, meta_tags_rule_2, meta_tags_rule_3, meta_tags_rule_4];

#[must_use]
pub fn meta_title_rule_1(sel: &Selection) -> bool {
    let class = class(sel);
    class == "entry-title" || class == "post-title"
}

#[must_use]
pub fn meta_title_rule_2(sel: &Selection) -> bool {
    if !is_one_of_tags(sel, &["h1", "h2"]) {
        return false;
    }
    let class = class(sel);
    class.contains("post-title")
        || class.contains("entry-title")
        || class.contains("headline")
        || id(sel).contains("headline")
        || attr(sel, "itemprop").contains("headline")
        || class.contains("post__title")
}

#[must_use]
pub fn meta_title_rule_3(sel: &Selection) -> bool {
    tag(sel) == "h1" && (class(sel).contains("title") || id(sel).contains("title"))
}

/// `h1` directly under a `header`.
#[must_use]
pub fn meta_title_rule_4(sel: &Selection) -> bool {
    if tag(sel) != "h1" {
        return false;
    }
    tag(&dom::parent(sel)) == "header"
}

/// Explicit author markup: `rel="author"`, `class="author"`, `<author>`.
#[must_use]
pub fn meta_author_rule_1(sel: &Selection) -> bool {
    let tag = tag(sel);
    if tag == "author" {
        return true;
    }
    if !matches!(tag.as_str(), "a" | "address" | "link" | "p" | "span") {
        return false;
    }
    let rel = attr(sel, "rel");
    rel == "author" || rel == "me" || class(sel) == "author"
}

#[must_use]
pub fn meta_author_rule_2(sel: &Selection) -> bool {
    if !is_one_of_tags(sel, &["a", "span"]) {
        return false;
    }
    let class = class(sel);
    class.contains("author") || class.contains("posted-by") || attr(sel, "itemprop").contains("author")
}

#[must_use]
pub fn meta_author_rule_3(sel: &Selection) -> bool {
    is_one_of_tags(sel, &["a", "div", "p", "span"]) && class(sel).contains("byline")
}

/// Last resort: any element.
#[must_use]
pub fn meta_author_rule_4(sel: &Selection) -> bool {
    let class = class(sel);
    class.contains("author") || class.contains("screenname")
}

#[must_use]
pub fn meta_categories_rule_1(sel: &Selection) -> bool {
    if tag(sel) != "div" {
        return false;
    }
    let class = class(sel);
    [
        "post-info",
        "postinfo",
        "post-meta",
        "postmeta",
        "meta",
        "entry-meta",
        "entry-info",
        "entry-utility",
    ]
    .iter()
    .any(|prefix| class.starts_with(prefix))
        || id(sel).starts_with("postpath")
}

#[must_use]
pub fn meta_categories_rule_2(sel: &Selection) -> bool {
    if tag(sel) != "p" {
        return false;
    }
    let class = class(sel);
    class.starts_with("postmeta")
        || class.starts_with("entry-categories")
        || class == "postinfo"
        || id(sel) == "filedunder"
}

#[must_use]
pub fn meta_categories_rule_3(sel: &Selection) -> bool {
    if tag(sel) != "footer" {
        return false;
    }
    let class = class(sel);
    class.starts_with("entry-meta") || class.starts_with("entry-footer")
}

#[must_use]
pub fn meta_categories_rule_4(sel: &Selection) -> bool {
    is_one_of_tags(sel, &["li", "span"])
        && matches!(class(sel).as_str(), "post-category" | "postcategory" | "entry-category")
}

#[must_use]
pub fn meta_categories_rule_5(sel: &Selection) -> bool {
    tag(sel) == "header" && class(sel) == "entry-header"
}

#[must_use]
pub fn meta_categories_rule_6(sel: &Selection) -> bool {
    tag(sel) == "div" && matches!(class(sel).as_str(), "row" | "tags")
}

#[must_use]
pub fn meta_tags_rule_1(sel: &Selection) -> bool {
    tag(sel) == "div" && class(sel) == "tags"
}

#[must_use]
pub fn meta_tags_rule_2(sel: &Selection) -> bool {
    tag(sel) == "p" && class(sel).starts_with("entry-tags")
}

#[must_use]
pub fn meta_tags_rule_3(sel: &Selection) -> bool {
    if tag(sel) != "div" {
        return false;
    }
    let class = class(sel);
    matches!(class.as_str(), "row" | "jp-relatedposts" | "entry-utility")
        || class.starts_with("tag")
        || class.starts_with("postmeta")
        || class.starts_with("meta")
}

#[must_use]
pub fn meta_tags_rule_4(sel: &Selection) -> bool {
    let class = class(sel);
    class == "entry-meta" || class.contains("topics")
}
