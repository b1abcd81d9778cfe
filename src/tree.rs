//! Content tree.
//!
//! The content tree is the output-shaped tree produced by the extractors and
//! consumed by the serializers. It follows the text/tail model of the source
//! document: every element carries its own leading text and the trailing text
//! that follows it before the next sibling.
//!
//! ```text
//! <p>TEXT<hi>inner</hi>TAIL</p>
//!     ^^^^            ^^^^
//!     p.text          hi.tail
//! ```
//!
//! Unlike the source document, the content tree is owned and restricted to a
//! small vocabulary (`Tag`). Tags outside the vocabulary only appear in
//! generic-algorithm output before it is sanitized.

use std::fmt;

use dom_query::Selection;

use crate::dom;
use crate::etree;
use crate::filters::trim;

/// Tag of a content-tree element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Tag {
    /// Root of a content tree.
    #[default]
    Body,
    /// Main content wrapper in XML output.
    Main,
    /// Comments wrapper in XML output.
    Comments,
    P,
    Head,
    List,
    Item,
    Quote,
    Table,
    Row,
    Cell,
    Lb,
    Hi,
    Fw,
    Code,
    Del,
    /// Transient block container, stripped before emission.
    Div,
    /// Any other tag name (generic-algorithm output, not yet sanitized).
    Other(String),
}

impl Tag {
    /// Map a tag name onto the vocabulary.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "body" => Self::Body,
            "main" => Self::Main,
            "comments" => Self::Comments,
            "p" => Self::P,
            "head" => Self::Head,
            "list" => Self::List,
            "item" => Self::Item,
            "quote" => Self::Quote,
            "table" => Self::Table,
            "row" => Self::Row,
            "cell" => Self::Cell,
            "lb" => Self::Lb,
            "hi" => Self::Hi,
            "fw" => Self::Fw,
            "code" => Self::Code,
            "del" => Self::Del,
            "div" => Self::Div,
            other => Self::Other(other.to_lowercase()),
        }
    }

    /// Tag name as written in XML output.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Body => "body",
            Self::Main => "main",
            Self::Comments => "comments",
            Self::P => "p",
            Self::Head => "head",
            Self::List => "list",
            Self::Item => "item",
            Self::Quote => "quote",
            Self::Table => "table",
            Self::Row => "row",
            Self::Cell => "cell",
            Self::Lb => "lb",
            Self::Hi => "hi",
            Self::Fw => "fw",
            Self::Code => "code",
            Self::Del => "del",
            Self::Div => "div",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content-tree element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub tail: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    /// Create an empty element.
    #[must_use]
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    /// Create an element holding `text`.
    #[must_use]
    pub fn with_text(tag: Tag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Attribute value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set or replace an attribute.
    pub fn set(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value.to_string();
        } else {
            self.attrs.push((name.to_string(), value.to_string()));
        }
    }

    /// Drop all attributes.
    pub fn clear_attrs(&mut self) {
        self.attrs.clear();
    }

    /// Append a child.
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Own text, empty string when absent.
    #[must_use]
    pub fn text_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Trailing text, empty string when absent.
    #[must_use]
    pub fn tail_str(&self) -> &str {
        self.tail.as_deref().unwrap_or("")
    }

    /// Text fragments in tree order: own text, then each child's fragments
    /// followed by the child's tail. The element's own tail is excluded.
    #[must_use]
    pub fn iter_text(&self) -> Vec<&str> {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        if let Some(text) = self.text.as_deref() {
            parts.push(text);
        }
        for child in &self.children {
            child.collect_text(parts);
            if let Some(tail) = child.tail.as_deref() {
                parts.push(tail);
            }
        }
    }

    /// Flattened text: fragments space-joined, whitespace collapsed.
    #[must_use]
    pub fn text_content(&self) -> String {
        trim(&self.iter_text().join(" "))
    }

    /// All descendants in document order (self excluded).
    #[must_use]
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        for child in &self.children {
            out.push(child);
            out.extend(child.descendants());
        }
        out
    }

    /// Number of descendants.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.children.iter().map(|c| 1 + c.node_count()).sum()
    }

    /// Whether any descendant satisfies the predicate.
    pub fn contains(&self, pred: impl Fn(&Element) -> bool + Copy) -> bool {
        self.children.iter().any(|c| pred(c) || c.contains(pred))
    }

    /// Whether a `p` element (self included) holds non-blank text.
    #[must_use]
    pub fn has_paragraph_text(&self) -> bool {
        if self.tag == Tag::P && self.iter_text().iter().any(|t| !t.trim().is_empty()) {
            return true;
        }
        self.children.iter().any(Element::has_paragraph_text)
    }

    /// Apply `f` to every descendant, parents before children.
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        for child in &mut self.children {
            f(child);
            child.for_each_mut(f);
        }
    }

    /// Remove matching descendants but keep their content in place.
    ///
    /// The element's text goes to the previous sibling's tail (or the parent's
    /// text), its children are re-attached where it stood and its tail follows
    /// them. No character is lost.
    pub fn strip_tags(&mut self, pred: impl Fn(&Element) -> bool + Copy) {
        let children = std::mem::take(&mut self.children);
        let mut rebuilt: Vec<Element> = Vec::with_capacity(children.len());
        for mut child in children {
            child.strip_tags(pred);
            if pred(&child) {
                let Element {
                    text,
                    tail,
                    children: grandchildren,
                    ..
                } = child;
                if let Some(text) = text {
                    push_text(&mut self.text, &mut rebuilt, &text);
                }
                rebuilt.extend(grandchildren);
                if let Some(tail) = tail {
                    push_text(&mut self.text, &mut rebuilt, &tail);
                }
            } else {
                rebuilt.push(child);
            }
        }
        self.children = rebuilt;
    }

    /// Remove matching descendants with their subtree.
    ///
    /// With `keep_tail` the trailing text survives on the previous sibling or
    /// the parent.
    pub fn remove_elements(&mut self, pred: impl Fn(&Element) -> bool + Copy, keep_tail: bool) {
        let children = std::mem::take(&mut self.children);
        let mut kept: Vec<Element> = Vec::with_capacity(children.len());
        for mut child in children {
            if pred(&child) {
                if keep_tail {
                    if let Some(tail) = child.tail.take() {
                        push_text(&mut self.text, &mut kept, &tail);
                    }
                }
                continue;
            }
            child.remove_elements(pred, keep_tail);
            kept.push(child);
        }
        self.children = kept;
    }

    /// Drop childless descendants without text or tail.
    ///
    /// Single top-down pass: a parent emptied by the removal of its children
    /// is kept.
    pub fn remove_empty_leaves(&mut self) {
        self.children.retain(|c| {
            !(c.children.is_empty() && c.text_str().is_empty() && c.tail_str().is_empty())
        });
        for child in &mut self.children {
            child.remove_empty_leaves();
        }
    }
}

/// Append text to `target`, creating it when absent.
pub fn append_text(target: &mut Option<String>, addition: &str) {
    match target {
        Some(existing) => existing.push_str(addition),
        None => *target = Some(addition.to_string()),
    }
}

fn push_text(parent_text: &mut Option<String>, siblings: &mut [Element], text: &str) {
    match siblings.last_mut() {
        Some(previous) => append_text(&mut previous.tail, text),
        None => append_text(parent_text, text),
    }
}

/// Copy a source subtree into a content tree, keeping tag names and attributes.
///
/// The returned element stands for `sel` itself; its tail is left empty.
#[must_use]
pub fn from_selection(sel: &Selection) -> Element {
    let tag = dom::tag_name(sel).unwrap_or_default();
    let mut element = Element::new(Tag::from_name(&tag));
    element.attrs = dom::get_all_attributes(sel);
    let text = etree::text(sel);
    if !text.is_empty() {
        element.text = Some(text);
    }
    for node in dom::children(sel).nodes() {
        let child_sel = Selection::from(*node);
        let mut child = from_selection(&child_sel);
        let tail = etree::tail(&child_sel);
        if !tail.is_empty() {
            child.tail = Some(tail);
        }
        element.children.push(child);
    }
    element
}
