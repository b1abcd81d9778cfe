//! Comment section rules.
//!
//! `COMMENTS` locates the comments container, `COMMENTS_DISCARD` removes
//! debris (reply forms, titles, quoted parent comments) inside it. Rules run
//! after tag conversion, so lists appear as `list`.

use dom_query::Selection;

use crate::selector::utils::{attr, class, id, is_one_of_tags, tag};
use crate::selector::Rule;

/// Comment section rules in priority order.
pub static COMMENTS: [Rule; 4] = [
    comments_rule_1,
    comments_rule_2,
    comments_rule_3,
    comments_rule_4,
];

/// Debris removed from a matched comments section.
pub static COMMENTS_DISCARD: [Rule; 3] = [
    comments_discard_rule_1,
    comments_discard_rule_2,
    comments_discard_rule_3,
];

fn is_comment_container(sel: &Selection) -> bool {
    is_one_of_tags(sel, &["div", "list", "section"])
}

/// Comment list containers.
#[must_use]
pub fn comments_rule_1(sel: &Selection) -> bool {
    if !is_comment_container(sel) {
        return false;
    }
    let class = class(sel);

    id(sel).contains("commentlist")
        || class.contains("commentlist")
        || class.contains("comment-page")
        || class.contains("comment-list")
        || class.contains("comments-list")
        || class.contains("comments-content")
}

/// Comment section containers.
#[must_use]
pub fn comments_rule_2(sel: &Selection) -> bool {
    if !is_comment_container(sel) {
        return false;
    }
    let id = id(sel);
    let class = class(sel);

    id.starts_with("comments")
        || class.starts_with("comments")
        || class.starts_with("Comments")
        || id.starts_with("comment-")
        || class.starts_with("comment-")
        || class.contains("article-comments")
}

/// Third-party comment widgets.
#[must_use]
pub fn comments_rule_3(sel: &Selection) -> bool {
    if !is_comment_container(sel) {
        return false;
    }
    let id = id(sel);

    id.starts_with("comol") || id.starts_with("disqus_thread") || id.starts_with("dsq-comments")
}

/// Loose markers: social sections and anything with `comment` in its class.
#[must_use]
pub fn comments_rule_4(sel: &Selection) -> bool {
    is_one_of_tags(sel, &["div", "section"])
        && (id(sel).starts_with("social") || class(sel).contains("comment"))
}

/// Reply forms.
#[must_use]
pub fn comments_discard_rule_1(sel: &Selection) -> bool {
    is_one_of_tags(sel, &["div", "section"]) && id(sel).starts_with("respond")
}

/// Citations and quoted parent comments.
#[must_use]
pub fn comments_discard_rule_2(sel: &Selection) -> bool {
    is_one_of_tags(sel, &["cite", "quote"])
}

/// Titles, reply links, spam notices and hidden blocks.
#[must_use]
pub fn comments_discard_rule_3(sel: &Selection) -> bool {
    let id = id(sel);
    let class = class(sel);

    is_comment_debris(&id, &class) || attr(sel, "style").contains("display:none")
}

/// Shared with the overall discard rules.
pub(crate) fn is_comment_debris(id: &str, class: &str) -> bool {
    class == "comments-title"
        || class.contains("comments-title")
        || class.contains("nocomments")
        || id.starts_with("reply-")
        || class.starts_with("reply-")
        || class.contains("-reply-")
        || class.contains("message")
        || id.contains("akismet")
        || class.contains("akismet")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use crate::selector;

    #[test]
    fn test_comment_rules() {
        let doc = dom::parse(
            r#"<body><div class="entry">x</div><section id="comments"><p>Nice</p></section></body>"#,
        );
        let root = doc.select("body");

        assert!(selector::query(&root, comments_rule_1).is_none());
        let found = selector::query(&root, comments_rule_2).map(|sel| tag(&sel));
        assert_eq!(found.as_deref(), Some("section"));
    }

    #[test]
    fn test_disqus_widget() {
        let doc = dom::parse(r#"<body><div id="disqus_thread">c</div></body>"#);
        assert!(selector::query(&doc.select("body"), comments_rule_3).is_some());
    }

    #[test]
    fn test_discard_rules() {
        let doc = dom::parse(
            r#"<body><div id="respond">form</div><h3 class="comments-title">3 replies</h3><p style="display:none">x</p><p>kept</p></body>"#,
        );
        let root = doc.select("body");

        let hits: usize = COMMENTS_DISCARD
            .iter()
            .map(|rule| selector::query_all(&root, *rule).len())
            .sum();
        assert_eq!(hits, 3);
    }
}
