//! Tag catalogs and the handler dispatch kind.
//!
//! Arrays are kept for CSS selector building and iteration, `HashSet`s for
//! lookups.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Elements removed with their subtree during tree cleaning.
pub static MANUALLY_CLEANED: [&str; 53] = [
    // important
    "aside", "embed", "footer", "form", "head", "iframe", "menu", "object", "script",
    // other content
    "applet", "audio", "canvas", "figure", "map", "picture", "svg", "video",
    // secondary
    "area", "blink", "button", "datalist", "details", "dialog", "frame", "frameset",
    "fieldset", "link", "input", "ins", "label", "legend", "marquee", "math", "menuitem",
    "nav", "noscript", "optgroup", "option", "output", "param", "progress", "rp", "rt",
    "rtc", "select", "source", "style", "summary", "track", "template", "textarea", "time",
    "use",
];

/// Elements whose tags are removed while their content stays in place.
pub static MANUALLY_STRIPPED: [&str; 20] = [
    "abbr", "acronym", "address", "bdi", "bdo", "big", "cite", "data", "dfn", "font",
    "hgroup", "img", "ins", "mark", "meta", "ruby", "small", "tbody", "tfoot", "thead",
];

/// Elements removed during pruning when they have no content at all.
pub static CUT_EMPTY_ELEMS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "article", "b", "blockquote", "dd", "div", "dt", "em", "h1", "h2", "h3", "h4", "h5",
        "h6", "i", "li", "main", "p", "pre", "q", "section", "span", "strong",
    ]
    .into_iter()
    .collect()
});

/// Source tags eligible for extraction in every attempt.
pub static TAG_CATALOG: [&str; 11] = [
    "blockquote", "code", "del", "fw", "head", "hi", "lb", "list", "p", "pre", "quote",
];

/// Elements whose presence makes generic-algorithm output suspicious, and
/// which the sanitizer removes.
pub static SANITIZED_TAGS: [&str; 21] = [
    "aside", "audio", "button", "fieldset", "figure", "footer", "iframe", "img", "image",
    "input", "label", "link", "nav", "noindex", "noscript", "object", "option", "select",
    "source", "svg", "time",
];

pub static SANITIZED_TAG_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| SANITIZED_TAGS.into_iter().collect());

/// Tags allowed in emitted content trees.
pub static TEI_VALID_TAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "body", "cell", "code", "del", "div", "fw", "head", "hi", "item", "lb", "list", "p",
        "quote", "row", "table",
    ]
    .into_iter()
    .collect()
});

/// Attributes allowed in emitted content trees.
pub static TEI_VALID_ATTRS: [&str; 4] = ["rend", "rendition", "role", "type"];

/// Tags eligible during recovery over the whole document.
pub static RECOVERY_TAGS: [&str; 6] = ["blockquote", "code", "p", "pre", "q", "quote"];

/// Inline formatting tags.
pub static HI_TAGS: [&str; 11] = [
    "em", "i", "b", "strong", "u", "kbd", "samp", "tt", "var", "sub", "sup",
];

/// `rend` value of a formatting tag.
#[must_use]
pub fn hi_rend(tag: &str) -> Option<&'static str> {
    match tag {
        "em" | "i" => Some("#i"),
        "b" | "strong" => Some("#b"),
        "u" => Some("#u"),
        "kbd" | "samp" | "tt" | "var" => Some("#t"),
        "sub" => Some("#sub"),
        "sup" => Some("#sup"),
        _ => None,
    }
}

/// Handler selected for a source element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Head,
    Hi,
    List,
    /// `quote` and `code`.
    Quote,
    Table,
    Div,
    Lb,
    P,
    /// Any tag without a dedicated handler.
    Other,
}

impl ElementKind {
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "head" => Self::Head,
            "hi" => Self::Hi,
            "list" => Self::List,
            "quote" | "code" => Self::Quote,
            "table" => Self::Table,
            "div" => Self::Div,
            "lb" => Self::Lb,
            "p" => Self::P,
            _ => Self::Other,
        }
    }
}
