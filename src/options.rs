//! Configuration options for content extraction.
//!
//! The `Options` struct controls which parts of a page are extracted, how the
//! result is gated, and which output format is produced.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;

/// Output format of [`crate::extract`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text, one block per line.
    #[default]
    Txt,
    /// One tab-separated record.
    Csv,
    /// JSON object with metadata and text.
    Json,
    /// XML document rooted at `doc`.
    Xml,
    /// TEI-XML document with a bibliographic header.
    #[serde(alias = "tei")]
    XmlTei,
}

impl OutputFormat {
    /// Whether the format is one of the XML variants.
    #[must_use]
    pub fn is_xml(self) -> bool {
        matches!(self, Self::Xml | Self::XmlTei)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Txt => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::XmlTei => "xmltei",
        })
    }
}

/// Error returned when parsing an unknown output format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Txt),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            "xmltei" | "tei" => Ok(Self::XmlTei),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// Date handling for the metadata resolver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DateParams {
    /// Prefer the original publication date over the last modification.
    ///
    /// Default: `true`
    pub original_date: bool,

    /// Dates before this bound are ignored.
    pub min_date: Option<NaiveDate>,

    /// Dates after this bound are ignored.
    pub max_date: Option<NaiveDate>,
}

impl Default for DateParams {
    fn default() -> Self {
        Self::new()
    }
}

impl DateParams {
    /// Default parameters: original date preferred, no bounds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            original_date: true,
            min_date: None,
            max_date: None,
        }
    }

    /// Whether the date lies inside the configured bounds.
    #[must_use]
    pub fn accepts(&self, date: NaiveDate) -> bool {
        self.min_date.is_none_or(|min| date >= min) && self.max_date.is_none_or(|max| date <= max)
    }
}

/// Configuration options for content extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings. Options can also be deserialized from JSON; missing
/// fields fall back to their defaults.
///
/// # Example
///
/// ```rust
/// use trafilatura_core::{Options, OutputFormat};
///
/// let options = Options {
///     include_comments: false,
///     output_format: OutputFormat::Json,
///     ..Options::default()
/// };
/// assert!(options.include_tables);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Source URL of the document.
    ///
    /// Default: `None`
    pub url: Option<String>,

    /// Identifier copied into the metadata of non-txt outputs.
    ///
    /// Default: `None`
    pub record_id: Option<String>,

    /// Expected language (ISO 639-1 code). Documents in another language are discarded.
    ///
    /// Default: `None`
    pub target_language: Option<String>,

    /// URLs whose documents are discarded.
    ///
    /// Default: empty
    pub url_blacklist: HashSet<String>,

    /// Date extraction configuration for the metadata resolver.
    ///
    /// Default: original date, unbounded
    pub date_params: DateParams,

    /// Maximum number of nodes in the content tree.
    ///
    /// Default: `None`
    pub max_tree_size: Option<usize>,

    /// Extract and output the comments section.
    ///
    /// Default: `true`
    pub include_comments: bool,

    /// Keep table content.
    ///
    /// Default: `true`
    pub include_tables: bool,

    /// Keep inline formatting as `hi` elements.
    ///
    /// Default: `false`
    pub include_formatting: bool,

    /// Drop repeated text segments and documents already seen.
    ///
    /// Default: `false`
    pub deduplicate: bool,

    /// Discard documents lacking a date, a title or a URL.
    ///
    /// Default: `false`
    pub with_metadata: bool,

    /// Skip the comparison with generic extraction algorithms.
    ///
    /// Default: `false`
    pub no_fallback: bool,

    /// Validate TEI output against the built-in content model (advisory).
    ///
    /// Default: `false`
    pub tei_validation: bool,

    /// Output format.
    ///
    /// Default: `OutputFormat::Txt`
    pub output_format: OutputFormat,

    /// Below this length the main text triggers recovery and fallbacks.
    ///
    /// Default: `200`
    pub min_extracted_size: usize,

    /// Below this length comments are reported as insufficient.
    ///
    /// Default: `10`
    pub min_extracted_comm_size: usize,

    /// Minimum text length of an accepted document.
    ///
    /// Default: `25`
    pub min_output_size: usize,

    /// Minimum comments length of an accepted document.
    ///
    /// Default: `10`
    pub min_output_comm_size: usize,

    /// Texts up to this length are never considered duplicates.
    ///
    /// Default: `100`
    pub min_duplcheck_size: usize,

    /// A text seen more often than this is a duplicate.
    ///
    /// Default: `2`
    pub max_repetitions: i32,

    /// Capacity of the duplicate cache held by an [`crate::Extractor`].
    ///
    /// Default: `65536`
    pub lru_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: None,
            record_id: None,
            target_language: None,
            url_blacklist: HashSet::new(),
            date_params: DateParams::new(),
            max_tree_size: None,
            include_comments: true,
            include_tables: true,
            include_formatting: false,
            deduplicate: false,
            with_metadata: false,
            no_fallback: false,
            tei_validation: false,
            output_format: OutputFormat::Txt,
            min_extracted_size: 200,
            min_extracted_comm_size: 10,
            min_output_size: 25,
            min_output_comm_size: 10,
            min_duplcheck_size: 100,
            max_repetitions: 2,
            lru_size: 65536,
        }
    }
}

impl Options {
    /// Select the output format from legacy boolean switches.
    ///
    /// Only applies while the format is still `txt`; the first set switch wins
    /// in the order csv, json, xml, tei.
    pub fn map_format(&mut self, csv: bool, json: bool, xml: bool, tei: bool) {
        if self.output_format != OutputFormat::Txt {
            return;
        }
        if csv {
            self.output_format = OutputFormat::Csv;
        } else if json {
            self.output_format = OutputFormat::Json;
        } else if xml {
            self.output_format = OutputFormat::Xml;
        } else if tei {
            self.output_format = OutputFormat::XmlTei;
        }
    }

    /// Load options from a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
