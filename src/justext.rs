//! Statistical paragraph classifier (jusText).
//!
//! The page is cut into paragraphs at block-level tags and double line
//! breaks. Each paragraph is first classified on its own (length, stopword
//! density, link density), then revised using its neighbours: short and
//! near-good blocks surrounded by good content are kept, isolated ones are
//! dropped.

use std::collections::HashSet;
use std::sync::LazyLock;

use dom_query::Selection;

use crate::dom;
use crate::etree;

/// Tags that delimit paragraphs.
static PARAGRAPH_TAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "blockquote", "body", "caption", "center", "col", "colgroup", "dd", "div", "dl", "dt",
        "fieldset", "form", "h1", "h2", "h3", "h4", "h5", "h6", "legend", "li", "optgroup",
        "option", "p", "pre", "table", "td", "textarea", "tfoot", "th", "thead", "tr", "ul",
    ]
    .into_iter()
    .collect()
});

/// Removed before segmentation.
const PREPROCESS_REMOVED: &str =
    "head, script, style, noscript, form, iframe, object, embed, applet, input, button, select, textarea";

/// Classification thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    pub length_low: usize,
    pub length_high: usize,
    pub stopwords_low: f64,
    pub stopwords_high: f64,
    pub max_link_density: f64,
    pub max_heading_distance: usize,
    pub no_headings: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            length_low: 50,
            length_high: 200,
            stopwords_low: 0.1,
            stopwords_high: 0.2,
            max_link_density: 0.2,
            max_heading_distance: 200,
            no_headings: true,
        }
    }
}

/// Paragraph class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Bad,
    Short,
    NearGood,
    Good,
}

/// A text block of the page.
#[derive(Debug, Clone)]
pub struct Paragraph {
    /// Dotted path of the enclosing tags, e.g. `html.body.div.p`.
    pub dom_path: String,
    pub text: String,
    pub chars_in_links: usize,
    pub tags_count: usize,
    pub heading: bool,
    /// Context-free class.
    pub cf_class: Class,
    /// Final class.
    pub class: Class,
}

impl Paragraph {
    fn new(dom_path: String) -> Self {
        Self {
            dom_path,
            text: String::new(),
            chars_in_links: 0,
            tags_count: 0,
            heading: false,
            cf_class: Class::Bad,
            class: Class::Bad,
        }
    }

    /// Length of the text in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[must_use]
    pub fn words_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Share of words found in the stoplist.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stopwords_density(&self, stoplist: &HashSet<&str>) -> f64 {
        let words = self.words_count();
        if words == 0 {
            return 0.0;
        }
        let stopwords = self
            .text
            .split_whitespace()
            .filter(|w| stoplist.contains(w.to_lowercase().as_str()))
            .count();
        stopwords as f64 / words as f64
    }

    /// Share of characters inside links.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn links_density(&self) -> f64 {
        let len = self.len();
        if len == 0 {
            return 0.0;
        }
        self.chars_in_links as f64 / len as f64
    }

    #[must_use]
    pub fn is_boilerplate(&self) -> bool {
        self.class != Class::Good
    }

    fn is_heading_path(&self) -> bool {
        self.dom_path
            .split('.')
            .any(|tag| tag.len() == 2 && tag.starts_with('h') && tag[1..].chars().all(|c| c.is_ascii_digit()))
    }
}

fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Event-driven paragraph builder.
struct ParagraphMaker {
    path: Vec<String>,
    paragraphs: Vec<Paragraph>,
    current: Paragraph,
    text_nodes: Vec<String>,
    link: bool,
    br: bool,
}

impl ParagraphMaker {
    fn new() -> Self {
        Self {
            path: Vec::new(),
            paragraphs: Vec::new(),
            current: Paragraph::new(String::new()),
            text_nodes: Vec::new(),
            link: false,
            br: false,
        }
    }

    fn start_new_paragraph(&mut self) {
        let next = Paragraph::new(self.path.join("."));
        let mut finished = std::mem::replace(&mut self.current, next);
        let text = normalize_whitespace(&self.text_nodes.concat()).trim().to_string();
        self.text_nodes.clear();
        if !text.is_empty() {
            finished.text = text;
            self.paragraphs.push(finished);
        }
    }

    fn start_element(&mut self, name: &str) {
        self.path.push(name.to_string());
        if PARAGRAPH_TAGS.contains(name) || (name == "br" && self.br) {
            if name == "br" {
                // the separator itself does not count as markup of the paragraph
                self.current.tags_count = self.current.tags_count.saturating_sub(1);
            }
            self.start_new_paragraph();
        } else {
            self.br = name == "br";
            if self.br {
                self.text_nodes.push(" ".to_string());
            } else if name == "a" {
                self.link = true;
            }
            self.current.tags_count += 1;
        }
    }

    fn end_element(&mut self, name: &str) {
        self.path.pop();
        if PARAGRAPH_TAGS.contains(name) {
            self.start_new_paragraph();
        }
        if name == "a" {
            self.link = false;
        }
    }

    fn characters(&mut self, content: &str) {
        if content.trim().is_empty() {
            return;
        }
        let text = normalize_whitespace(content);
        if self.link {
            self.current.chars_in_links += text.chars().count();
        }
        self.text_nodes.push(text);
        self.br = false;
    }

    fn walk(&mut self, sel: &Selection) {
        let name = dom::tag_name(sel).unwrap_or_default();
        self.start_element(&name);
        self.characters(&etree::text(sel));
        for node in dom::children(sel).nodes() {
            let child = Selection::from(*node);
            self.walk(&child);
            self.characters(&etree::tail(&child));
        }
        self.end_element(&name);
    }
}

/// Cut an HTML page into paragraphs.
#[must_use]
pub fn make_paragraphs(html: &str) -> Vec<Paragraph> {
    let doc = dom::parse(html);
    doc.select(PREPROCESS_REMOVED).remove();

    let mut maker = ParagraphMaker::new();
    let root = doc.select("html");
    if let Some(node) = root.nodes().first() {
        maker.walk(&Selection::from(*node));
    }
    maker.start_new_paragraph();
    maker.paragraphs
}

/// Context-free classification.
pub fn classify_paragraphs(paragraphs: &mut [Paragraph], stoplist: &HashSet<&str>, params: &Params) {
    for paragraph in paragraphs.iter_mut() {
        let length = paragraph.len();
        let stopword_density = paragraph.stopwords_density(stoplist);
        paragraph.heading = !params.no_headings && paragraph.is_heading_path();

        paragraph.cf_class = if paragraph.links_density() > params.max_link_density
            || paragraph.text.contains('\u{a9}')
            || paragraph.text.contains("&copy")
            || paragraph.dom_path.split('.').any(|tag| tag == "select")
        {
            Class::Bad
        } else if length < params.length_low {
            if paragraph.chars_in_links > 0 {
                Class::Bad
            } else {
                Class::Short
            }
        } else if stopword_density >= params.stopwords_high {
            if length > params.length_high {
                Class::Good
            } else {
                Class::NearGood
            }
        } else if stopword_density >= params.stopwords_low {
            Class::NearGood
        } else {
            Class::Bad
        };
    }
}

fn neighbour(paragraphs: &[Paragraph], i: usize, ignore_neargood: bool, forward: bool) -> Class {
    let candidates: Box<dyn Iterator<Item = &Paragraph>> = if forward {
        Box::new(paragraphs.iter().skip(i + 1))
    } else {
        Box::new(paragraphs[..i].iter().rev())
    };
    for paragraph in candidates {
        match paragraph.class {
            Class::Good | Class::Bad => return paragraph.class,
            Class::NearGood if !ignore_neargood => return Class::NearGood,
            _ => {}
        }
    }
    Class::Bad
}

fn good_within_distance(paragraphs: &[Paragraph], i: usize, max_distance: usize) -> bool {
    let mut distance = 0;
    for paragraph in &paragraphs[i + 1..] {
        if distance > max_distance {
            break;
        }
        if paragraph.class == Class::Good {
            return true;
        }
        distance += paragraph.len();
    }
    false
}

/// Context-sensitive revision of the context-free classes.
pub fn revise_paragraph_classification(paragraphs: &mut [Paragraph], max_heading_distance: usize) {
    for paragraph in paragraphs.iter_mut() {
        paragraph.class = paragraph.cf_class;
    }

    // short headings followed by good text
    for i in 0..paragraphs.len() {
        if paragraphs[i].heading
            && paragraphs[i].class == Class::Short
            && good_within_distance(paragraphs, i, max_heading_distance)
        {
            paragraphs[i].class = Class::NearGood;
        }
    }

    let mut new_classes = Vec::new();
    for i in 0..paragraphs.len() {
        if paragraphs[i].class != Class::Short {
            continue;
        }
        let prev = neighbour(paragraphs, i, true, false);
        let next = neighbour(paragraphs, i, true, true);
        let class = match (prev, next) {
            (Class::Good, Class::Good) => Class::Good,
            (Class::Bad, Class::Bad) => Class::Bad,
            _ if (prev == Class::Bad && neighbour(paragraphs, i, false, false) == Class::NearGood)
                || (next == Class::Bad && neighbour(paragraphs, i, false, true) == Class::NearGood) =>
            {
                Class::Good
            }
            _ => Class::Bad,
        };
        new_classes.push((i, class));
    }
    for (i, class) in new_classes {
        paragraphs[i].class = class;
    }

    for i in 0..paragraphs.len() {
        if paragraphs[i].class != Class::NearGood {
            continue;
        }
        let prev = neighbour(paragraphs, i, true, false);
        let next = neighbour(paragraphs, i, true, true);
        paragraphs[i].class = if prev == Class::Bad && next == Class::Bad {
            Class::Bad
        } else {
            Class::Good
        };
    }

    // headings that were demoted but precede good text
    for i in 0..paragraphs.len() {
        if paragraphs[i].heading
            && paragraphs[i].class == Class::Bad
            && paragraphs[i].cf_class != Class::Bad
            && good_within_distance(paragraphs, i, max_heading_distance)
        {
            paragraphs[i].class = Class::Good;
        }
    }
}

/// Segment and classify a page.
#[must_use]
pub fn justext(html: &str, stoplist: &HashSet<&str>, params: &Params) -> Vec<Paragraph> {
    let mut paragraphs = make_paragraphs(html);
    classify_paragraphs(&mut paragraphs, stoplist, params);
    revise_paragraph_classification(&mut paragraphs, params.max_heading_distance);
    paragraphs
}
