//! XML output.
//!
//! Trees are written with `quick-xml`, then read back and written a second
//! time: the control pass drops blank text, indents element-only content and
//! fails on anything that is not well-formed.

use std::collections::HashSet;
use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};
use crate::result::Metadata;
use crate::tree::{Element, Tag};

/// Whether a character may appear in an XML 1.0 document.
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn clean_chars(text: &str) -> String {
    text.chars().filter(|c| is_xml_char(*c)).collect()
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let name = element.tag.as_str();
    let mut start = BytesStart::new(name);
    for (key, value) in &element.attrs {
        let value = clean_chars(value);
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.text.is_none() && element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = &element.text {
        writer.write_event(Event::Text(BytesText::new(&clean_chars(text))))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
        if let Some(tail) = &child.tail {
            writer.write_event(Event::Text(BytesText::new(&clean_chars(tail))))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Serialize a tree without indentation. The root's tail is ignored.
pub fn tree_to_string(tree: &Element) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, tree)?;
    String::from_utf8(writer.into_inner()).map_err(|err| Error::Xml(err.to_string()))
}

/// Control pass input: markup events and merged, still escaped, text runs.
enum Token<'a> {
    Markup(Event<'a>),
    Text(String),
}

fn tokenize(serialized: &str) -> Result<Vec<Token<'_>>> {
    let mut reader = Reader::from_str(serialized);
    let mut tokens = Vec::new();
    // escaped text, entity references included, up to the next markup event
    let mut pending = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(text) => pending.push_str(&String::from_utf8_lossy(&text)),
            Event::GeneralRef(entity) => {
                pending.push('&');
                pending.push_str(&String::from_utf8_lossy(&entity));
                pending.push(';');
            }
            event => {
                if !pending.is_empty() {
                    tokens.push(Token::Text(std::mem::take(&mut pending)));
                }
                if matches!(event, Event::Eof) {
                    return Ok(tokens);
                }
                tokens.push(Token::Markup(event));
            }
        }
    }
}

/// Elements holding non-blank text of their own, by start token index.
fn mixed_elements(tokens: &[Token]) -> HashSet<usize> {
    let mut open = Vec::new();
    let mut mixed = HashSet::new();
    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Markup(Event::Start(_)) => open.push(index),
            Token::Markup(Event::End(_)) => {
                open.pop();
            }
            Token::Text(text) if !text.trim().is_empty() => {
                if let Some(&parent) = open.last() {
                    mixed.insert(parent);
                }
            }
            _ => {}
        }
    }
    mixed
}

struct Frame {
    verbatim: bool,
    has_child: bool,
}

fn newline_indent(out: &mut Vec<u8>, depth: usize) {
    out.push(b'\n');
    out.extend(std::iter::repeat_n(b' ', 2 * depth));
}

/// Re-parse serialized XML and write it again.
///
/// Blank text between elements is dropped and replaced by indentation.
/// Elements with text of their own are written verbatim, descendants
/// included, so inline runs keep their exact spacing. Fails on anything
/// that is not well-formed.
pub fn control_xml_output(serialized: &str) -> Result<String> {
    let tokens = tokenize(serialized)?;
    let mixed = mixed_elements(&tokens);

    let mut writer = Writer::new(Vec::new());
    let mut stack: Vec<Frame> = Vec::new();
    for (index, token) in tokens.into_iter().enumerate() {
        let verbatim = stack.last().is_some_and(|frame| frame.verbatim);
        match token {
            Token::Text(text) => {
                if verbatim || !text.trim().is_empty() {
                    writer.write_event(Event::Text(BytesText::from_escaped(text)))?;
                }
            }
            Token::Markup(Event::End(end)) => {
                let frame = stack.pop().ok_or_else(|| Error::Xml("unbalanced end tag".to_string()))?;
                if !frame.verbatim && frame.has_child {
                    newline_indent(writer.get_mut(), stack.len());
                }
                writer.write_event(Event::End(end))?;
            }
            Token::Markup(event) => {
                if !verbatim && !writer.get_ref().is_empty() {
                    newline_indent(writer.get_mut(), stack.len());
                }
                if let Some(parent) = stack.last_mut() {
                    parent.has_child = true;
                }
                let opens = matches!(event, Event::Start(_));
                writer.write_event(event)?;
                if opens {
                    stack.push(Frame {
                        verbatim: verbatim || mixed.contains(&index),
                        has_child: false,
                    });
                }
            }
        }
    }
    let output = String::from_utf8(writer.into_inner()).map_err(|err| Error::Xml(err.to_string()))?;
    Ok(output.trim().to_string())
}

/// Drop every attribute except on `del` and `hi` elements.
pub fn clean_attributes(tree: &mut Element) {
    if !matches!(tree.tag, Tag::Del | Tag::Hi) {
        tree.clear_attrs();
    }
    tree.for_each_mut(&mut |e| {
        if !matches!(e.tag, Tag::Del | Tag::Hi) {
            e.clear_attrs();
        }
    });
}

/// Assemble the `doc` tree: metadata attributes, `main` and `comments`.
#[must_use]
pub fn build_xml_output(meta: &Metadata, mut body: Element, comments: Option<Element>) -> Element {
    let mut doc = Element::new(Tag::Other("doc".to_string()));

    body.tag = Tag::Main;
    clean_attributes(&mut body);
    doc.push(body);
    if let Some(mut comments) = comments {
        comments.tag = Tag::Comments;
        clean_attributes(&mut comments);
        doc.push(comments);
    }

    add_xml_meta(&mut doc, meta);
    doc
}

fn add_xml_meta(doc: &mut Element, meta: &Metadata) {
    let fields = [
        ("sitename", meta.sitename.clone()),
        ("title", meta.title.clone()),
        ("author", meta.author.clone()),
        ("date", meta.date.clone()),
        ("source", meta.url.clone()),
        ("hostname", meta.hostname.clone()),
        ("excerpt", meta.description.clone()),
        ("categories", meta.joined_categories(";")),
        ("tags", meta.joined_tags(";")),
        ("id", meta.id.clone()),
        ("fingerprint", meta.fingerprint.clone()),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            doc.set(key, &value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_body() -> Element {
        let mut body = Element::new(Tag::Body);
        let mut p = Element::with_text(Tag::P, "A & B <c>");
        p.set("class", "lead");
        let mut hi = Element::with_text(Tag::Hi, "bold");
        hi.set("rend", "#b");
        hi.tail = Some(" after".to_string());
        p.push(hi);
        body.push(p);
        body.push(Element::new(Tag::Lb));
        body
    }

    #[test]
    fn test_escaping_and_empty_elements() {
        let xml = tree_to_string(&sample_body()).unwrap();
        assert!(xml.contains("A &amp; B &lt;c&gt;"));
        assert!(xml.contains("<lb/>"));
    }

    #[test]
    fn test_doc_attributes_and_cleaning() {
        let meta = Metadata {
            title: Some("Title".to_string()),
            categories: vec!["a".to_string(), "b".to_string()],
            ..Metadata::default()
        };
        let doc = build_xml_output(&meta, sample_body(), Some(Element::new(Tag::Body)));
        assert_eq!(doc.get("title"), Some("Title"));
        assert_eq!(doc.get("categories"), Some("a;b"));
        assert!(doc.get("author").is_none());
        assert_eq!(doc.children[0].tag, Tag::Main);
        assert_eq!(doc.children[1].tag, Tag::Comments);
        assert!(doc.children[0].children[0].attrs.is_empty());
        assert_eq!(doc.children[0].children[0].children[0].get("rend"), Some("#b"));
    }

    #[test]
    fn test_control_pass_round_trip() {
        let doc = build_xml_output(&Metadata::default(), sample_body(), None);
        let xml = control_xml_output(&tree_to_string(&doc).unwrap()).unwrap();
        assert!(xml.starts_with("<doc>"));
        assert!(xml.ends_with("</doc>"));

        // a second control pass is stable
        assert_eq!(control_xml_output(&xml).unwrap(), xml);

        let mut reader = Reader::from_str(&xml);
        let mut elements = 0;
        loop {
            match reader.read_event().unwrap() {
                Event::Eof => break,
                Event::Start(_) | Event::Empty(_) => elements += 1,
                _ => {}
            }
        }
        assert_eq!(elements, 1 + 1 + doc.children[0].node_count());
    }

    #[test]
    fn test_adjacent_inline_runs_keep_spacing() {
        let xml = control_xml_output(r##"<doc><main><p>a<hi rend="#b">x</hi><hi rend="#i">y</hi> z</p></main></doc>"##).unwrap();
        assert!(xml.contains(r##"<p>a<hi rend="#b">x</hi><hi rend="#i">y</hi> z</p>"##));

        let mut reader = Reader::from_str(&xml);
        let mut text = String::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Eof => break,
                Event::Text(t) => text.push_str(&String::from_utf8_lossy(&t)),
                _ => {}
            }
        }
        assert_eq!(text.trim(), "axy z");
    }

    #[test]
    fn test_element_only_content_is_indented() {
        let xml = control_xml_output("<doc><main> <list><item>one</item><item>two</item></list><lb/></main></doc>").unwrap();
        assert_eq!(
            xml,
            "<doc>\n  <main>\n    <list>\n      <item>one</item>\n      <item>two</item>\n    </list>\n    <lb/>\n  </main>\n</doc>"
        );
    }

    #[test]
    fn test_invalid_characters_are_dropped() {
        let body = Element::with_text(Tag::Body, "bell\u{7} and null\u{0}");
        let xml = tree_to_string(&body).unwrap();
        assert_eq!(xml, "<body>bell and null</body>");
    }

    #[test]
    fn test_malformed_input_fails_control() {
        assert!(control_xml_output("<doc><p>unclosed</doc>").is_err());
    }
}
