//! Main content container rules.
//!
//! Tried in order; the first rule with a match wins.

use dom_query::Selection;

use crate::selector::utils::{attr, class, id, is_container, tag};
use crate::selector::Rule;

/// Content selector rules in priority order.
pub static CONTENT_RULES: [Rule; 7] = [
    content_rule_1,
    content_rule_2,
    content_rule_3,
    content_rule_4,
    content_rule_5,
    content_rule_6,
    content_rule_7,
];

/// Explicit main-content markers.
#[must_use]
pub fn content_rule_1(sel: &Selection) -> bool {
    if !is_container(sel) {
        return false;
    }
    let id = id(sel);
    let class = class(sel);

    id.contains("content-main")
        || class.contains("content-main")
        || class.contains("content_main")
        || id.contains("content-body")
        || class.contains("content-body")
        || class.contains("story-body")
        || id == "article"
        || class == "post"
        || class == "entry"
}

/// Blog post body markers.
#[must_use]
pub fn content_rule_2(sel: &Selection) -> bool {
    if !is_container(sel) {
        return false;
    }
    let class = class(sel);

    [
        "post-text",
        "post_text",
        "post-body",
        "post-entry",
        "postentry",
        "post-content",
        "post_content",
        "postcontent",
        "postContent",
        "article-text",
        "articletext",
        "articleText",
    ]
    .iter()
    .any(|pattern| class.contains(pattern))
}

/// Article body markers, including `itemprop="articleBody"`.
#[must_use]
pub fn content_rule_3(sel: &Selection) -> bool {
    if !is_container(sel) {
        return false;
    }
    let id = id(sel);
    let class = class(sel);

    id.contains("entry-content")
        || class.contains("entry-content")
        || id.contains("article-content")
        || class.contains("article-content")
        || id.contains("article__content")
        || class.contains("article__content")
        || id.contains("article-body")
        || class.contains("article-body")
        || id.contains("article__body")
        || class.contains("article__body")
        || attr(sel, "itemprop") == "articleBody"
        || id == "articleContent"
        || class.contains("ArticleContent")
        || class.contains("page-content")
        || class.contains("text-content")
        || class.contains("content__body")
}

/// Any `article` element.
#[must_use]
pub fn content_rule_4(sel: &Selection) -> bool {
    tag(sel) == "article"
}

/// CMS theme and story markers.
#[must_use]
pub fn content_rule_5(sel: &Selection) -> bool {
    if !is_container(sel) {
        return false;
    }
    let id = id(sel);
    let class = class(sel);

    class.contains("post-bodycopy")
        || class.contains("storycontent")
        || class.contains("story-content")
        || class == "postarea"
        || class == "art-postcontent"
        || class.contains("theme-content")
        || class.contains("blog-content")
        || class.contains("section-content")
        || class.contains("single-content")
        || class.contains("wpb_text_column")
        || class.contains("single-post")
        || id.starts_with("primary")
        || class == "text"
        || class == "cell"
        || id == "story"
        || class == "story"
        || class.to_lowercase().contains("fulltext")
}

/// Main-content markers.
#[must_use]
pub fn content_rule_6(sel: &Selection) -> bool {
    if !is_container(sel) {
        return false;
    }
    let class = class(sel);

    id(sel).contains("main-content")
        || class.contains("main-content")
        || class.to_lowercase().contains("page-content")
}

/// Anything starting with `main`, and the `main` element itself.
#[must_use]
pub fn content_rule_7(sel: &Selection) -> bool {
    let tag = tag(sel);
    if tag == "main" {
        return true;
    }
    matches!(tag.as_str(), "article" | "div" | "section")
        && (class(sel).starts_with("main")
            || id(sel).starts_with("main")
            || attr(sel, "role").starts_with("main"))
}
