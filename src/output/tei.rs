//! TEI-XML output.
//!
//! The extracted post and comments become `div` entries of a TEI document
//! whose header carries the metadata. Elements and attributes outside the
//! content vocabulary are scrubbed from the text body, and the whole tree can
//! be checked against a built-in content model.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use tracing::warn;

use super::xml::clean_attributes;
use crate::extractor::tags::{TEI_VALID_ATTRS, TEI_VALID_TAGS};
use crate::result::Metadata;
use crate::tree::{Element, Tag};

const TEI_NAMESPACE: &str = "http://www.tei-c.org/ns/1.0";

fn node(name: &str) -> Element {
    let tag = match name {
        "body" => Tag::Body,
        "p" => Tag::P,
        // header names are case-sensitive
        _ => Tag::Other(name.to_string()),
    };
    Element::new(tag)
}

fn text_node(name: &str, text: Option<&str>) -> Element {
    let mut element = node(name);
    element.text = text.map(ToString::to_string);
    element
}

fn typed(name: &str, kind: &str, text: Option<&str>) -> Element {
    let mut element = text_node(name, text);
    element.set("type", kind);
    element
}

fn title_stmt(meta: &Metadata) -> Element {
    let mut stmt = node("titleStmt");
    stmt.push(typed("title", "main", meta.title.as_deref()));
    if let Some(author) = meta.author.as_deref().filter(|a| !a.is_empty()) {
        stmt.push(text_node("author", Some(author)));
    }
    stmt
}

/// Short source reference: sitename and date, whichever are present.
fn sigle(meta: &Metadata) -> String {
    let sitename = meta.sitename.as_deref().filter(|s| !s.is_empty());
    let date = meta.date.as_deref().filter(|d| !d.is_empty());
    match (sitename, date) {
        (Some(sitename), Some(date)) => format!("{sitename}, {date}"),
        (None, Some(date)) => date.to_string(),
        (Some(sitename), None) => sitename.to_string(),
        (None, None) => String::new(),
    }
}

fn file_desc(meta: &Metadata) -> Element {
    let mut file_desc = node("fileDesc");
    file_desc.push(title_stmt(meta));

    let mut publication = node("publicationStmt");
    publication.push(node("p"));
    file_desc.push(publication);

    let mut notes = node("notesStmt");
    if let Some(id) = meta.id.as_deref() {
        notes.push(typed("note", "id", Some(id)));
    }
    notes.push(typed("note", "fingerprint", meta.fingerprint.as_deref()));
    file_desc.push(notes);

    let sigle = sigle(meta);
    let mut source = node("sourceDesc");
    let bibl = match meta.title.as_deref().filter(|t| !t.is_empty()) {
        Some(title) => format!("{title}. {sigle}"),
        None => format!(". {sigle}"),
    };
    source.push(text_node("bibl", Some(&bibl)));
    source.push(typed("bibl", "sigle", Some(&sigle)));

    let mut bibl_full = node("biblFull");
    bibl_full.push(title_stmt(meta));
    let mut publication = node("publicationStmt");
    let sitename = meta.sitename.as_deref().unwrap_or_default();
    let publisher = match meta.hostname.as_deref() {
        Some(hostname) => format!("{sitename}({hostname})"),
        None => sitename.to_string(),
    };
    publication.push(text_node("publisher", Some(&publisher)));
    if let Some(url) = meta.url.as_deref() {
        let mut ptr = typed("ptr", "URL", None);
        ptr.set("target", url);
        publication.push(ptr);
    }
    publication.push(text_node("date", meta.date.as_deref()));
    bibl_full.push(publication);
    source.push(bibl_full);
    file_desc.push(source);

    file_desc
}

fn profile_desc(meta: &Metadata) -> Element {
    let mut profile = node("profileDesc");
    let mut abstract_ = node("abstract");
    abstract_.push(text_node("p", meta.description.as_deref()));
    profile.push(abstract_);

    if !meta.categories.is_empty() || !meta.tags.is_empty() {
        let mut keywords = node("keywords");
        if let Some(categories) = meta.joined_categories(",") {
            keywords.push(typed("term", "categories", Some(&categories)));
        }
        if let Some(tags) = meta.joined_tags(",") {
            keywords.push(typed("term", "tags", Some(&tags)));
        }
        let mut text_class = node("textClass");
        text_class.push(keywords);
        profile.push(text_class);
    }
    profile
}

fn encoding_desc() -> Element {
    let mut application = node("application");
    application.set("version", env!("CARGO_PKG_VERSION"));
    application.set("ident", env!("CARGO_PKG_NAME"));
    application.push(text_node("label", Some(env!("CARGO_PKG_NAME"))));

    let mut app_info = node("appInfo");
    app_info.push(application);
    let mut encoding = node("encodingDesc");
    encoding.push(app_info);
    encoding
}

/// TEI header built from the document metadata.
#[must_use]
pub fn write_fullheader(meta: &Metadata) -> Element {
    let mut header = node("teiHeader");
    header.push(file_desc(meta));
    header.push(profile_desc(meta));
    header.push(encoding_desc());
    header
}

/// Bundle post and comments into a TEI tree.
#[must_use]
pub fn write_teitree(meta: &Metadata, mut body: Element, comments: Option<Element>) -> Element {
    let mut tei = node("TEI");
    tei.set("xmlns", TEI_NAMESPACE);
    tei.push(write_fullheader(meta));

    let mut text_body = node("body");
    clean_attributes(&mut body);
    body.tag = Tag::Div;
    body.set("type", "entry");
    text_body.push(body);
    if let Some(mut comments) = comments.filter(|c| !c.is_empty()) {
        clean_attributes(&mut comments);
        comments.tag = Tag::Div;
        comments.set("type", "comments");
        text_body.push(comments);
    }

    let mut text = node("text");
    text.push(text_body);
    tei.push(text);
    tei
}

/// Own text and trailing text, space-joined.
fn own_and_tail(element: &mut Element) -> Option<String> {
    match (element.text.take(), element.tail.take()) {
        (Some(text), Some(tail)) => Some(format!("{text} {tail}")),
        (text, tail) => text.or(tail),
    }
}

fn join_onto(target: &mut Option<String>, text: &str) {
    *target = Some(match target.take() {
        Some(existing) => format!("{existing} {text}"),
        None => text.to_string(),
    });
}

/// Join text onto the last kept sibling's tail, or the parent's text.
fn merge_text(parent_text: &mut Option<String>, kept: &mut [Element], text: &str) {
    match kept.last_mut() {
        Some(previous) => join_onto(&mut previous.tail, text),
        None => join_onto(parent_text, text),
    }
}

/// Merge invalid elements into their parent and drop invalid attributes.
fn scrub(element: &mut Element, url: &str) {
    let children = std::mem::take(&mut element.children);
    let mut kept: Vec<Element> = Vec::with_capacity(children.len());
    for mut child in children {
        scrub(&mut child, url);
        let name = child.tag.as_str().to_string();
        if !TEI_VALID_TAGS.contains(name.as_str()) {
            warn!("not a TEI element, removing: {name} {url}");
            if child.children.is_empty() {
                if let Some(text) = own_and_tail(&mut child) {
                    merge_text(&mut element.text, &mut kept, &text);
                }
            } else {
                if let Some(text) = child.text.take() {
                    merge_text(&mut element.text, &mut kept, &text);
                }
                kept.append(&mut child.children);
                if let Some(tail) = child.tail.take() {
                    merge_text(&mut element.text, &mut kept, &tail);
                }
            }
            continue;
        }
        child.attrs.retain(|(key, _)| {
            let valid = TEI_VALID_ATTRS.contains(&key.as_str());
            if !valid {
                warn!("not a valid TEI attribute, removing: {key} in {name} {url}");
            }
            valid
        });
        kept.push(child);
    }
    element.children = kept;
}

/// Convert headings to `fw` and scrub the text body.
pub fn check_tei(tei: &mut Element, url: &str) {
    tei.for_each_mut(&mut |e| {
        if e.tag == Tag::Head {
            e.tag = Tag::Fw;
            e.set("type", "header");
        }
    });
    for text in tei.children.iter_mut().filter(|c| c.tag.as_str() == "text") {
        for body in text.children.iter_mut().filter(|c| c.tag == Tag::Body) {
            scrub(body, url);
        }
    }
}

/// Build the TEI tree for a post and its comments.
#[must_use]
pub fn build_tei_output(meta: &Metadata, body: Element, comments: Option<Element>) -> Element {
    let mut tei = write_teitree(meta, body, comments);
    check_tei(&mut tei, meta.url.as_deref().unwrap_or_default());
    tei
}

/// Allowed children and attributes of one element.
#[derive(Debug)]
struct ContentModel {
    children: HashSet<&'static str>,
    attrs: HashSet<&'static str>,
}

/// Content model of the TEI subset this crate emits.
#[derive(Debug)]
pub struct TeiSchema {
    root: &'static str,
    elements: HashMap<&'static str, ContentModel>,
}

const INLINE: [&str; 4] = ["hi", "lb", "del", "code"];
const BLOCK: [&str; 10] = ["p", "list", "quote", "table", "fw", "code", "div", "lb", "hi", "del"];

#[rustfmt::skip]
static TEI_SCHEMA: LazyLock<TeiSchema> = LazyLock::new(|| {
    let rules: Vec<(&'static str, Vec<&'static str>, Vec<&'static str>)> = vec![
        ("TEI", vec!["teiHeader", "text"], vec!["xmlns"]),
        ("teiHeader", vec!["fileDesc", "profileDesc", "encodingDesc"], vec![]),
        ("fileDesc", vec!["titleStmt", "publicationStmt", "notesStmt", "sourceDesc"], vec![]),
        ("titleStmt", vec!["title", "author"], vec![]),
        ("title", vec![], vec!["type"]),
        ("author", vec![], vec![]),
        ("publicationStmt", vec!["p", "publisher", "ptr", "date"], vec![]),
        ("publisher", vec![], vec![]),
        ("ptr", vec![], vec!["type", "target"]),
        ("date", vec![], vec![]),
        ("notesStmt", vec!["note"], vec![]),
        ("note", vec![], vec!["type"]),
        ("sourceDesc", vec!["bibl", "biblFull"], vec![]),
        ("bibl", vec![], vec!["type"]),
        ("biblFull", vec!["titleStmt", "publicationStmt"], vec![]),
        ("profileDesc", vec!["abstract", "textClass"], vec![]),
        ("abstract", vec!["p"], vec![]),
        ("textClass", vec!["keywords"], vec![]),
        ("keywords", vec!["term"], vec![]),
        ("term", vec![], vec!["type"]),
        ("encodingDesc", vec!["appInfo"], vec![]),
        ("appInfo", vec!["application"], vec![]),
        ("application", vec!["label", "ptr"], vec!["version", "ident"]),
        ("label", vec![], vec![]),
        ("text", vec!["body"], vec![]),
        ("body", vec!["div"], vec![]),
        ("div", BLOCK.to_vec(), vec!["type", "rend", "rendition"]),
        ("p", [&INLINE[..], &["list", "quote", "table"][..]].concat(), vec!["rend"]),
        ("fw", INLINE.to_vec(), vec!["type", "rend"]),
        ("list", vec!["item", "fw"], vec!["rend", "type"]),
        ("item", [&INLINE[..], &["list", "p", "quote"][..]].concat(), vec!["rend"]),
        ("quote", [&INLINE[..], &["p", "list", "quote"][..]].concat(), vec!["rend", "type"]),
        ("table", vec!["row", "fw"], vec!["rend"]),
        ("row", vec!["cell"], vec!["role", "rend"]),
        ("cell", [&INLINE[..], &["p", "list"][..]].concat(), vec!["role", "rend"]),
        ("hi", INLINE.to_vec(), vec!["rend", "rendition"]),
        ("del", INLINE.to_vec(), vec!["rend"]),
        ("code", vec!["lb", "hi"], vec!["rend", "type"]),
        ("lb", vec![], vec!["rend"]),
    ];
    let elements = rules
        .into_iter()
        .map(|(name, children, attrs)| {
            let model = ContentModel {
                children: children.into_iter().collect(),
                attrs: attrs.into_iter().collect(),
            };
            (name, model)
        })
        .collect();
    TeiSchema { root: "TEI", elements }
});

impl TeiSchema {
    fn check(&self, element: &Element) -> Result<(), String> {
        let name = element.tag.as_str();
        let Some(model) = self.elements.get(name) else {
            return Err(format!("unknown element {name}"));
        };
        if let Some((key, _)) = element.attrs.iter().find(|(key, _)| !model.attrs.contains(key.as_str())) {
            return Err(format!("attribute {key} not allowed on {name}"));
        }
        for child in &element.children {
            let child_name = child.tag.as_str();
            if !model.children.contains(child_name) {
                return Err(format!("element {child_name} not allowed in {name}"));
            }
            self.check(child)?;
        }
        Ok(())
    }
}

/// Check a TEI tree against the content model.
///
/// Returns a description of the first violation.
pub fn validate_tei(tei: &Element) -> Result<(), String> {
    let schema = &*TEI_SCHEMA;
    if tei.tag.as_str() != schema.root {
        return Err(format!("root element is {}", tei.tag.as_str()));
    }
    schema.check(tei)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> Metadata {
        Metadata {
            title: Some("Post title".to_string()),
            author: Some("Jane Doe".to_string()),
            date: Some("2021-03-04".to_string()),
            url: Some("https://blog.example.org/post".to_string()),
            hostname: Some("blog.example.org".to_string()),
            sitename: Some("Example".to_string()),
            description: Some("About things".to_string()),
            tags: vec!["one".to_string(), "two".to_string()],
            fingerprint: Some("abc".to_string()),
            ..Metadata::default()
        }
    }

    fn find<'a>(root: &'a Element, name: &str) -> Vec<&'a Element> {
        root.descendants()
            .into_iter()
            .filter(|e| e.tag.as_str() == name)
            .collect()
    }

    fn body() -> Element {
        let mut body = Element::new(Tag::Body);
        body.push(Element::with_text(Tag::Head, "Section"));
        body.push(Element::with_text(Tag::P, "Text"));
        body
    }

    #[test]
    fn test_header_fields() {
        let tei = build_tei_output(&meta(), body(), None);
        let bibl = find(&tei, "bibl");
        assert_eq!(bibl[0].text.as_deref(), Some("Post title. Example, 2021-03-04"));
        assert_eq!(bibl[1].get("type"), Some("sigle"));
        assert_eq!(bibl[1].text.as_deref(), Some("Example, 2021-03-04"));

        let publisher = find(&tei, "publisher");
        assert_eq!(publisher[0].text.as_deref(), Some("Example(blog.example.org)"));
        let ptr = find(&tei, "ptr");
        assert_eq!(ptr[0].get("target"), Some("https://blog.example.org/post"));

        let terms = find(&tei, "term");
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].text.as_deref(), Some("one,two"));

        let notes = find(&tei, "note");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].get("type"), Some("fingerprint"));
    }

    #[test]
    fn test_body_divs() {
        let mut comments = Element::new(Tag::Body);
        comments.push(Element::with_text(Tag::P, "A comment"));
        let tei = build_tei_output(&meta(), body(), Some(comments));

        let divs = find(&tei, "div");
        assert_eq!(divs.len(), 2);
        assert_eq!(divs[0].get("type"), Some("entry"));
        assert_eq!(divs[1].get("type"), Some("comments"));
        assert!(find(&tei, "head").is_empty());
        let fw = find(&tei, "fw");
        assert_eq!(fw[0].get("type"), Some("header"));

        let tei = build_tei_output(&meta(), body(), Some(Element::new(Tag::Body)));
        assert_eq!(find(&tei, "div").len(), 1);
    }

    #[test]
    fn test_invalid_elements_are_merged() {
        let mut body = Element::new(Tag::Body);
        let mut p = Element::with_text(Tag::P, "before");
        let mut span = Element::with_text(Tag::Other("span".to_string()), "inner");
        span.tail = Some("after".to_string());
        p.push(span);
        body.push(p);

        let tei = build_tei_output(&meta(), body, None);
        let p = find(&tei, "p").into_iter().find(|e| e.text_str().starts_with("before")).unwrap();
        assert!(p.children.is_empty());
        assert_eq!(p.text.as_deref(), Some("before inner after"));
    }

    #[test]
    fn test_invalid_attributes_are_removed() {
        let mut tei = write_teitree(&meta(), body(), None);
        if let Some(text) = tei.children.iter_mut().find(|c| c.tag.as_str() == "text") {
            text.children[0].children[0].children[1].set("style", "x");
        }
        check_tei(&mut tei, "");
        let paragraphs = find(&tei, "p");
        assert!(paragraphs.iter().all(|p| p.get("style").is_none()));
    }

    #[test]
    fn test_validation() {
        let tei = build_tei_output(&meta(), body(), None);
        assert_eq!(validate_tei(&tei), Ok(()));

        let mut broken = tei.clone();
        broken.push(node("span"));
        assert!(validate_tei(&broken).is_err());
        assert!(validate_tei(&body()).is_err());
    }
}
