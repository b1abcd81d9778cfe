//! Fallback arbiter.
//!
//! The rule-based result is compared with a generic readability-style
//! extraction of the untouched backup document. Suspicious or short results
//! get a second opinion from the jusText classifier. When comparison is
//! disabled, a baseline scrape of the raw markup rescues unconfident runs.

use std::collections::HashSet;
use std::sync::LazyLock;

use dom_query::{Document, Selection};
use regex::Regex;
use tracing::{debug, info};

use super::tags::RECOVERY_TAGS;
use crate::dom;
use crate::filters::trim;
use crate::html_processing::load_html;
use crate::justext::{self, Params};
use crate::options::Options;
use crate::result::Strategy;
use crate::sanitizer::{needs_sanitizing, sanitize_tree};
use crate::stoplists;
use crate::tree::{Element, Tag};

#[allow(clippy::expect_used)]
static RE_ARTICLE_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)"articlebody":"(.+?)",""#).expect("valid regex"));

/// Which extraction the arbiter keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Custom,
    Generic,
}

/// Decide between the rule-based and the generic result.
///
/// Conditions are evaluated in order; the first that holds decides.
#[must_use]
pub fn decide(len_text: usize, len_algo: usize, body_has_paragraph_text: bool, min_size: usize) -> Choice {
    if len_algo == 0 || len_algo == len_text {
        Choice::Custom
    } else if len_text == 0 {
        Choice::Generic
    } else if len_text > 2 * len_algo {
        Choice::Custom
    } else if len_algo > 2 * len_text {
        Choice::Generic
    } else if !body_has_paragraph_text && len_algo > min_size {
        Choice::Generic
    } else {
        Choice::Custom
    }
}

/// Generic readability-style extraction. Failures yield an empty body.
#[must_use]
pub fn try_readability(backup: &Document, url: Option<&str>) -> Element {
    #[cfg(feature = "readability")]
    {
        use crate::tree::from_selection;
        use dom_smoothie::Readability;

        let copy = dom::clone_document(backup);
        match Readability::with_document(copy, url, None).and_then(|mut reader| reader.parse()) {
            Ok(article) => {
                let content = Document::from(article.content.to_string());
                let mut body = from_selection(&content.select("body"));
                body.tag = Tag::Body;
                return body;
            }
            Err(err) => debug!("readability failed: {err}"),
        }
    }
    #[cfg(not(feature = "readability"))]
    {
        let _ = (backup, url);
    }
    Element::new(Tag::Body)
}

/// Statistical extraction: one paragraph per non-boilerplate block.
#[must_use]
pub fn try_justext(backup: &Document, target_language: Option<&str>) -> Element {
    let stoplist: &HashSet<&str> = target_language
        .and_then(stoplists::for_language)
        .unwrap_or_else(|| stoplists::union());

    let mut body = Element::new(Tag::Body);
    let html = backup.html();
    for paragraph in justext::justext(&html, stoplist, &Params::default()) {
        if !paragraph.is_boilerplate() {
            body.push(Element::with_text(Tag::P, paragraph.text));
        }
    }
    body
}

/// Replace the current result with the classifier output when it is longer.
///
/// The returned flag tells whether the classifier output was taken.
#[must_use]
pub fn justext_rescue(
    backup: &Document,
    target_language: Option<&str>,
    body: Element,
    text: String,
    len_text: usize,
) -> (Element, String, usize, bool) {
    let algo = try_justext(backup, target_language);
    let algo_text = algo.text_content();
    let len_algo = algo_text.chars().count();
    debug!("justext length: {len_algo}");
    if len_algo > len_text {
        (algo, algo_text, len_algo, true)
    } else {
        (body, text, len_text, false)
    }
}

/// Arbitrate between the rule-based result and the generic algorithms.
#[must_use]
pub fn compare_extraction(
    backup: &Document,
    body: Element,
    text: String,
    len_text: usize,
    opts: &Options,
) -> (Element, String, usize, Strategy) {
    let url = opts.url.as_deref().unwrap_or_default();

    let algo = try_readability(backup, opts.url.as_deref());
    let algo_text = algo.text_content();
    let len_algo = algo_text.chars().count();
    debug!("extracted length: {len_algo} (algorithm) {len_text} (extraction)");

    let choice = decide(len_text, len_algo, body.has_paragraph_text(), opts.min_extracted_size);
    match choice {
        Choice::Generic => {
            info!("using generic algorithm: {url}");
            second_opinion(backup, choice, algo, algo_text, len_algo, opts)
        }
        Choice::Custom => {
            info!("using custom extraction: {url}");
            second_opinion(backup, choice, body, text, len_text, opts)
        }
    }
}

/// Post-process the chosen result.
///
/// Trees holding denylisted elements and short results are checked against
/// the jusText output; the longer text wins, anything else is sanitized.
/// Generic results are always sanitized.
#[must_use]
pub fn second_opinion(
    backup: &Document,
    choice: Choice,
    body: Element,
    text: String,
    len_text: usize,
    opts: &Options,
) -> (Element, String, usize, Strategy) {
    let url = opts.url.as_deref().unwrap_or_default();
    let lang = opts.target_language.as_deref();
    let strategy = match choice {
        Choice::Generic => Strategy::Readability,
        Choice::Custom => Strategy::Custom,
    };

    let suspicious = needs_sanitizing(&body);
    if suspicious || len_text < opts.min_extracted_size {
        if !suspicious {
            info!("not enough text: {url}");
        }
        let (body, text, len_text, rescued) = justext_rescue(backup, lang, body, text, len_text);
        if rescued {
            debug!("using justext, length: {len_text}");
            return (body, text, len_text, Strategy::Justext);
        }
        let (body, text, len_text) = sanitize_tree(body, opts.include_formatting);
        return (body, text, len_text, strategy);
    }

    if choice == Choice::Generic {
        let (body, text, len_text) = sanitize_tree(body, opts.include_formatting);
        return (body, text, len_text, strategy);
    }
    (body, text, len_text, strategy)
}

fn json_ld_article_body(doc: &Document) -> Option<String> {
    for node in doc.select(r#"script[type="application/ld+json"]"#).nodes() {
        let script = dom::text_content(&Selection::from(*node));
        if !script.contains("\"article") {
            continue;
        }
        if let Some(caps) = RE_ARTICLE_BODY.captures(&script) {
            let text = trim(&caps[1].replace("\\\"", "\""));
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Baseline scrape of the raw markup.
///
/// Tries the JSON-LD article body, then the first `article` element, then
/// every paragraph-like element (each distinct text once).
#[must_use]
pub fn baseline(raw_html: &str) -> (Element, String, usize) {
    let mut body = Element::new(Tag::Body);
    let Some(doc) = load_html(raw_html) else {
        return (body, String::new(), 0);
    };

    if let Some(text) = json_ld_article_body(&doc) {
        let len = text.chars().count();
        body.push(Element::with_text(Tag::P, text.clone()));
        return (body, text, len);
    }

    if let Some(node) = doc.select("article").nodes().first() {
        let text = trim(&dom::text_content(&Selection::from(*node)));
        if !text.is_empty() {
            let len = text.chars().count();
            body.push(Element::with_text(Tag::P, text.clone()));
            return (body, text, len);
        }
    }

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for node in doc.select(&RECOVERY_TAGS.join(", ")).nodes() {
        let entry = trim(&dom::text_content(&Selection::from(*node)));
        if entry.is_empty() || !seen.insert(entry.clone()) {
            continue;
        }
        body.push(Element::with_text(Tag::P, entry.clone()));
        entries.push(entry);
    }
    let text = entries.join("\n");
    let len = text.chars().count();
    (body, text, len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::tags::TEI_VALID_TAGS;

    #[test]
    fn test_decide_table() {
        // 1: generic result empty or identical
        assert_eq!(decide(120, 0, true, 200), Choice::Custom);
        assert_eq!(decide(120, 120, false, 200), Choice::Custom);
        // 2: nothing found by the rules
        assert_eq!(decide(0, 50, true, 200), Choice::Generic);
        // 3: custom much longer
        assert_eq!(decide(500, 200, false, 200), Choice::Custom);
        // 4: generic much longer
        assert_eq!(decide(100, 250, true, 200), Choice::Generic);
        // 5: no paragraph text and a sizeable generic result
        assert_eq!(decide(300, 400, false, 200), Choice::Generic);
        assert_eq!(decide(150, 180, false, 200), Choice::Custom);
        // 6: default
        assert_eq!(decide(300, 400, true, 200), Choice::Custom);
    }

    #[test]
    fn test_decide_close_lengths_keep_custom() {
        assert_eq!(decide(50, 40, true, 200), Choice::Custom);
        assert_eq!(decide(50, 40, false, 200), Choice::Custom);
    }

    #[test]
    fn test_rule_five_precedes_default() {
        // Rule 5 fires before the default even when the custom text is longer
        assert_eq!(decide(500, 300, false, 200), Choice::Generic);
    }

    #[test]
    fn test_decide_is_total() {
        for len_text in [0, 1, 10, 100, 250, 1000] {
            for len_algo in [0, 1, 10, 100, 250, 1000] {
                for has_p in [true, false] {
                    let choice = decide(len_text, len_algo, has_p, 200);
                    assert!(matches!(choice, Choice::Custom | Choice::Generic));
                }
            }
        }
    }

    #[test]
    fn test_baseline_json_ld() {
        let html = r#"<html><head><script type="application/ld+json">{"@type":"NewsArticle","articleBody":"The \"full\" story text.","author":"x"}</script></head><body><p>Other</p></body></html>"#;
        let (body, text, len) = baseline(html);
        assert_eq!(text, "The \"full\" story text.");
        assert_eq!(len, text.chars().count());
        assert_eq!(body.children.len(), 1);
    }

    #[test]
    fn test_baseline_article() {
        let html = "<html><body><nav>Menu</nav><article><h1>Title</h1><p>Body text.</p></article></body></html>";
        let (_, text, _) = baseline(html);
        assert_eq!(text, "TitleBody text.");
    }

    #[test]
    fn test_baseline_paragraphs_deduplicated() {
        let html = "<html><body><p>Same</p><div><p>Same</p></div><blockquote>Quote</blockquote><p>Other</p></body></html>";
        let (body, text, _) = baseline(html);
        assert_eq!(body.children.len(), 3);
        assert_eq!(text, "Same\nQuote\nOther");
    }

    #[test]
    fn test_baseline_unparsable() {
        let (body, text, len) = baseline("   ");
        assert!(body.is_empty());
        assert!(text.is_empty());
        assert_eq!(len, 0);
    }

    const PROSE: &str = "It was one of the first warm days of the year and we walked along the river for a long time, talking about all the things that we had seen in the city and what we would do when the summer came back to the valley.";

    fn prose_page() -> Document {
        dom::parse(&format!("<html><body><p>{PROSE}</p></body></html>"))
    }

    fn english() -> Options {
        Options {
            target_language: Some("en".to_string()),
            ..Options::default()
        }
    }

    fn measured(body: Element) -> (Element, String, usize) {
        let text = body.text_content();
        let len = text.chars().count();
        (body, text, len)
    }

    fn in_vocabulary(body: &Element) -> bool {
        body.descendants().iter().all(|e| TEI_VALID_TAGS.contains(e.tag.as_str()))
    }

    #[test]
    fn test_denylisted_tree_takes_longer_classifier_text() {
        let mut body = Element::new(Tag::Body);
        body.push(Element::with_text(Tag::P, "Short opening line."));
        body.push(Element::with_text(Tag::from_name("figure"), "A caption"));
        let (body, text, len) = measured(body);

        let (body, text, len, strategy) = second_opinion(&prose_page(), Choice::Custom, body, text, len, &english());
        assert_eq!(strategy, Strategy::Justext);
        assert!(text.contains("first warm days"));
        assert_eq!(len, text.chars().count());
        assert!(body.children.iter().all(|e| e.tag == Tag::P));
    }

    #[test]
    fn test_denylisted_tree_is_sanitized_when_classifier_is_shorter() {
        let mut body = Element::new(Tag::Body);
        body.push(Element::with_text(Tag::P, PROSE.repeat(2)));
        let mut figure = Element::with_text(Tag::from_name("figure"), "A caption");
        figure.tail = Some("Text after the figure.".to_string());
        body.push(figure);
        let (body, text, len) = measured(body);
        let backup = dom::parse("<html><body><p>Menu</p></body></html>");

        let (body, text, _, strategy) = second_opinion(&backup, Choice::Custom, body, text, len, &english());
        assert_eq!(strategy, Strategy::Custom);
        assert!(!body.contains(|e| e.tag.as_str() == "figure"));
        assert!(!text.contains("A caption"));
        assert!(text.contains("Text after the figure."));
    }

    #[test]
    fn test_short_result_takes_classifier_text() {
        let mut body = Element::new(Tag::Body);
        body.push(Element::with_text(Tag::P, "Short."));
        let (body, text, len) = measured(body);

        let (_, text, _, strategy) = second_opinion(&prose_page(), Choice::Custom, body, text, len, &english());
        assert_eq!(strategy, Strategy::Justext);
        assert!(text.contains("summer came back"));
    }

    #[test]
    fn test_long_custom_result_is_kept_as_is() {
        let mut body = Element::new(Tag::Body);
        body.push(Element::with_text(Tag::P, PROSE));
        let (body, text, len) = measured(body);
        let expected = body.clone();

        let (body, _, _, strategy) = second_opinion(&prose_page(), Choice::Custom, body, text, len, &english());
        assert_eq!(strategy, Strategy::Custom);
        assert_eq!(body, expected);
    }

    #[test]
    fn test_generic_result_is_sanitized() {
        let mut section = Element::new(Tag::from_name("section"));
        section.push(Element::with_text(Tag::P, PROSE));
        section.push(Element::with_text(Tag::from_name("span"), "Loose words."));
        let mut wrapper = Element::new(Tag::Div);
        wrapper.push(section);
        let mut body = Element::new(Tag::Body);
        body.push(wrapper);
        let (body, text, len) = measured(body);

        let (body, text, _, strategy) = second_opinion(&prose_page(), Choice::Generic, body, text, len, &english());
        assert_eq!(strategy, Strategy::Readability);
        assert!(in_vocabulary(&body));
        assert!(text.contains("Loose words."));
    }

    #[cfg(feature = "readability")]
    #[test]
    fn test_readability_wins_over_short_custom_result() {
        let paragraphs: String = (0..5)
            .map(|_| format!("<p>{PROSE}</p>"))
            .collect();
        let backup = dom::parse(&format!("<html><body><article>{paragraphs}</article></body></html>"));
        let mut body = Element::new(Tag::Body);
        body.push(Element::with_text(Tag::P, "Short custom text."));
        let (body, text, len) = measured(body);

        let (body, text, len, strategy) = compare_extraction(&backup, body, text, len, &english());
        assert_eq!(strategy, Strategy::Readability);
        assert!(in_vocabulary(&body));
        assert!(text.contains("first warm days"));
        assert!(len > 2 * "Short custom text.".len());
    }

    #[test]
    fn test_justext_rescue_keeps_longer() {
        let backup = prose_page();

        let (body, text, len, rescued) = justext_rescue(&backup, Some("en"), Element::new(Tag::Body), String::new(), 0);
        assert!(rescued);
        assert_eq!(body.children.len(), 1);
        assert_eq!(len, text.chars().count());

        let long = "x".repeat(1000);
        let (_, text, _, rescued) = justext_rescue(&backup, None, Element::new(Tag::Body), long.clone(), 1000);
        assert!(!rescued);
        assert_eq!(text, long);
    }
}
