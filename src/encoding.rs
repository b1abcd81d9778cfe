//! Decoding of raw HTML bytes.
//!
//! Order: byte-order mark, declared charset in the first kilobytes, strict
//! UTF-8, then windows-1252 as the last guess.

use std::borrow::Cow;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::bytes::Regex;
use tracing::debug;

const SNIFF_LEN: usize = 2048;

/// `<meta charset=...>` and `<meta http-equiv=... content="...; charset=...">`
#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)<meta[^>]+?charset\s*=\s*["']?\s*([a-z0-9_:.+-]+)"#).expect("valid regex")
});

/// Encoding declared in the document head, if `encoding_rs` knows the label.
#[must_use]
pub fn declared_encoding(html: &[u8]) -> Option<&'static Encoding> {
    let head = &html[..html.len().min(SNIFF_LEN)];
    let caps = META_CHARSET.captures(head)?;
    Encoding::for_label(caps.get(1)?.as_bytes())
}

/// Decode HTML bytes into a UTF-8 string.
///
/// Never fails: undecodable sequences become U+FFFD.
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(html) {
        debug!(encoding = encoding.name(), "byte order mark");
        let (text, _) = encoding.decode_without_bom_handling(&html[bom_len..]);
        return text.into_owned();
    }

    if let Some(encoding) = declared_encoding(html) {
        if encoding != UTF_8 {
            debug!(encoding = encoding.name(), "declared charset");
            let (text, _) = encoding.decode_without_bom_handling(html);
            return text.into_owned();
        }
    }

    match UTF_8.decode_without_bom_handling_and_without_replacement(html) {
        Some(Cow::Borrowed(text)) => text.to_string(),
        Some(Cow::Owned(text)) => text,
        None => {
            debug!("invalid UTF-8, decoding as windows-1252");
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(html);
            text.into_owned()
        }
    }
}
