//! Text filters: whitespace handling, boilerplate lines, duplicates,
//! fingerprints and language.

use std::sync::LazyLock;

use base64::Engine as _;
use regex::Regex;
use tracing::{debug, warn};

use crate::lru::LruCache;
use crate::options::Options;
use crate::result::Metadata;
use crate::stoplists;
use crate::tree::Element;

/// Lines consisting only of a share/print/social word.
#[allow(clippy::expect_used)]
static RE_FILTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\W*(Drucken|E-?Mail|Facebook|Flipboard|Google|Instagram|Linkedin|Mail|PDF|Pinterest|Pocket|Print|Reddit|Twitter|Whatsapp|Xing)$",
    )
    .expect("valid regex")
});

#[allow(clippy::expect_used)]
static RE_FINGERPRINT_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w{5,}").expect("valid regex"));

#[allow(clippy::expect_used)]
static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid regex"));

/// Collapse whitespace runs to single spaces and trim both ends.
#[must_use]
pub fn trim(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether the string holds anything besides whitespace.
#[must_use]
pub fn text_chars_test(text: Option<&str>) -> bool {
    text.is_some_and(|t| t.chars().any(|c| !c.is_whitespace()))
}

fn is_unicode_space(c: char) -> bool {
    matches!(
        c,
        '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Normalize one line: unicode spaces, control characters, whitespace runs.
/// `None` when nothing printable is left.
fn line_processing(line: &str) -> Option<String> {
    let cleaned: String = line
        .replace("&#13;", "\r")
        .replace("&#10;", "\n")
        .chars()
        .map(|c| if is_unicode_space(c) { ' ' } else { c })
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();
    let trimmed = trim(&cleaned);
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Line-level cleanup of flattened text: lines normalized, blank lines dropped.
#[must_use]
pub fn sanitize(text: &str) -> String {
    text.lines()
        .filter_map(line_processing)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether an extracted leaf is boilerplate.
///
/// Tests the element's text, or its tail when it has no text: blank strings
/// and lines made of a single share/print/social word fire the filter.
#[must_use]
pub fn text_filter(element: &Element) -> bool {
    let test_text = match (&element.text, &element.tail) {
        (None, Some(tail)) => Some(tail.as_str()),
        (text, _) => text.as_deref(),
    };
    if !text_chars_test(test_text) {
        return true;
    }
    test_text
        .unwrap_or_default()
        .lines()
        .any(|line| RE_FILTER.is_match(line))
}

/// Record `text` in the cache and report whether it was already seen too often.
///
/// Texts up to `min_duplcheck_size` characters are counted but never flagged.
pub fn duplicate_test(text: &str, cache: &mut LruCache, opts: &Options) -> bool {
    let test_string = trim(text);
    let count = cache.get(&test_string).unwrap_or(0);
    cache.put(&test_string, count + 1);

    let is_duplicate =
        test_string.chars().count() > opts.min_duplcheck_size && count > opts.max_repetitions;
    if is_duplicate {
        debug!(count, "duplicate text segment");
    }
    is_duplicate
}

/// Hash of the meaningful words of a text, base64-encoded SHA-1.
#[must_use]
pub fn content_fingerprint(text: &str) -> String {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = RE_FINGERPRINT_WORD
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .collect();
    let digest = sha1_smol::Sha1::from(words.join(" ").as_bytes()).digest().bytes();
    base64::engine::general_purpose::STANDARD.encode(digest)
}

/// Most likely language of a text by stoplist coverage.
///
/// Returns `None` for texts without any stopword of a known language.
#[must_use]
pub fn detect_language(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = RE_WORD.find_iter(&lowered).map(|m| m.as_str()).collect();
    if words.is_empty() {
        return None;
    }

    let mut best: Option<(&'static str, usize)> = None;
    for (code, list) in stoplists::all() {
        let hits = words.iter().filter(|w| list.contains(**w)).count();
        if hits > 0 && best.is_none_or(|(_, top)| hits > top) {
            best = Some((code, hits));
        }
    }
    best.map(|(code, _)| code)
}

/// Whether the document is in another language than the target.
///
/// The longer of text and comments is tested. A target language without a
/// stoplist cannot be checked: a warning is logged and nothing is rejected.
#[must_use]
pub fn language_filter(
    text: &str,
    comments: &str,
    target_language: Option<&str>,
    meta: &Metadata,
) -> bool {
    let Some(target) = target_language else {
        return false;
    };
    if stoplists::for_language(target).is_none() {
        warn!(language = target, "no stoplist for target language, language check skipped");
        return false;
    }

    let sample = if comments.chars().count() > text.chars().count() {
        comments
    } else {
        text
    };
    match detect_language(sample) {
        Some(detected) if detected != target => {
            warn!(
                detected,
                target,
                id = meta.id.as_deref().unwrap_or_default(),
                url = meta.url.as_deref().unwrap_or_default(),
                "wrong language"
            );
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tag;

    #[test]
    fn test_trim_collapses_whitespace() {
        assert_eq!(trim("  a \n\t b  "), "a b");
        assert_eq!(trim("   "), "");
    }

    #[test]
    fn test_text_chars_test() {
        assert!(text_chars_test(Some("x")));
        assert!(!text_chars_test(Some(" \n ")));
        assert!(!text_chars_test(None));
    }

    #[test]
    fn test_sanitize_drops_blank_lines() {
        let text = "  first\u{00A0}line \n\n   \n second\u{0007} line ";
        assert_eq!(sanitize(text), "first line\nsecond line");
    }

    #[test]
    fn test_text_filter_share_words() {
        let share = Element::with_text(Tag::P, "Facebook");
        assert!(text_filter(&share));

        let email = Element::with_text(Tag::P, "» E-Mail");
        assert!(text_filter(&email));

        let prose = Element::with_text(Tag::P, "Share your thoughts on Facebook");
        assert!(!text_filter(&prose));
    }

    #[test]
    fn test_text_filter_uses_tail_without_text() {
        let mut lb = Element::new(Tag::Lb);
        lb.tail = Some("Twitter".to_string());
        assert!(text_filter(&lb));

        let blank = Element::with_text(Tag::P, "   ");
        assert!(text_filter(&blank));
    }

    #[test]
    fn test_duplicate_test_counts_repetitions() {
        let opts = Options::default();
        let mut cache = LruCache::new(16);
        let long = "word ".repeat(30);

        // Seen three times without being flagged, the fourth occurrence is
        assert!(!duplicate_test(&long, &mut cache, &opts));
        assert!(!duplicate_test(&long, &mut cache, &opts));
        assert!(!duplicate_test(&long, &mut cache, &opts));
        assert!(duplicate_test(&long, &mut cache, &opts));

        // Short texts are never duplicates
        for _ in 0..5 {
            assert!(!duplicate_test("short text", &mut cache, &opts));
        }
    }

    #[test]
    fn test_content_fingerprint_ignores_short_words_and_case() {
        let a = content_fingerprint("The Quick brown foxes jumped");
        let b = content_fingerprint("the QUICK BROWN FOXES jumped!!");
        assert_eq!(a, b);
        assert_ne!(a, content_fingerprint("Completely different content"));
        // 20-byte digest in base64
        assert_eq!(a.len(), 28);
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(
            detect_language("This is the story of a man who went to the city and was happy there"),
            Some("en")
        );
        assert_eq!(
            detect_language("Das ist die Geschichte eines Mannes, der in die Stadt ging und dort nicht glücklich war"),
            Some("de")
        );
        assert_eq!(detect_language("   "), None);
    }

    #[test]
    fn test_language_filter() {
        let meta = Metadata::default();
        let english = "This is the story of a man who went to the city and was happy there";

        assert!(!language_filter(english, "", None, &meta));
        assert!(!language_filter(english, "", Some("en"), &meta));
        assert!(language_filter(english, "", Some("de"), &meta));
        // No stoplist: never rejected
        assert!(!language_filter(english, "", Some("xx"), &meta));
    }
}
