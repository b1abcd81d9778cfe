//! Error types for trafilatura-core.
//!
//! Extraction has one outward failure mode: the document is discarded. The
//! reason is kept for logging and tests, but callers only need to know that
//! no artifact was produced.

use std::fmt;

/// Why a document produced no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    /// Input could not be parsed into a document with a body.
    Unparsable,
    /// The resolved URL is in the configured blacklist.
    BlacklistedUrl,
    /// `with_metadata` is set and date, title or url is absent.
    MissingMetadata,
    /// The content tree exceeds `max_tree_size` even after stripping formatting.
    TreeTooLarge,
    /// Both the text and the comments are below their minimum sizes.
    TooShort,
    /// The content was already seen too many times.
    Duplicate,
    /// The language filter rejected the text.
    WrongLanguage,
    /// The final artifact could not be serialized.
    Serialization,
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Unparsable => "unparsable input",
            Self::BlacklistedUrl => "blacklisted url",
            Self::MissingMetadata => "missing required metadata",
            Self::TreeTooLarge => "content tree too large",
            Self::TooShort => "text and comments too short",
            Self::Duplicate => "duplicate content",
            Self::WrongLanguage => "wrong language",
            Self::Serialization => "serialization failure",
        };
        f.write_str(reason)
    }
}

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document was discarded; no output is produced.
    #[error("document discarded: {0}")]
    Discarded(DiscardReason),

    /// XML writing or re-parsing failed.
    #[error("XML serialization failed: {0}")]
    Xml(String),
}

impl Error {
    /// Reason of a discard, `None` for internal serialization errors.
    #[must_use]
    pub fn discard_reason(&self) -> Option<DiscardReason> {
        match self {
            Self::Discarded(reason) => Some(*reason),
            Self::Xml(_) => None,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discard_reason_is_reported() {
        let err = Error::Discarded(DiscardReason::TooShort);
        assert_eq!(err.discard_reason(), Some(DiscardReason::TooShort));
        assert_eq!(err.to_string(), "document discarded: text and comments too short");
    }

    #[test]
    fn xml_errors_have_no_discard_reason() {
        let err = Error::Xml("unexpected eof".to_string());
        assert!(err.discard_reason().is_none());
    }
}
