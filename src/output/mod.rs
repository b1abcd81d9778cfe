//! Output serializers.
//!
//! - `txt`: flattened plain text
//! - `csv`: one tab-separated record
//! - `json`: metadata and texts as a JSON object
//! - `xml`: `doc` tree with metadata attributes
//! - `tei`: TEI document with a full header

pub mod csv;
pub mod json;
pub mod tei;
pub mod txt;
pub mod xml;

use tracing::info;

use crate::error::{DiscardReason, Error, Result};
use crate::options::{Options, OutputFormat};
use crate::result::Metadata;
use crate::tree::Element;

pub use txt::xmltotxt;

/// Render the extracted trees in the configured output format.
pub fn determine_returnstring(
    meta: &Metadata,
    mut body: Element,
    comments: Option<Element>,
    opts: &Options,
) -> Result<String> {
    match opts.output_format {
        OutputFormat::Xml | OutputFormat::XmlTei => {
            body.remove_empty_leaves();
            let tree = if opts.output_format == OutputFormat::Xml {
                xml::build_xml_output(meta, body, comments)
            } else {
                tei::build_tei_output(meta, body, comments)
            };
            if opts.output_format == OutputFormat::XmlTei && opts.tei_validation {
                let id = meta.id.as_deref().unwrap_or_default();
                let url = meta.url.as_deref().unwrap_or_default();
                match tei::validate_tei(&tree) {
                    Ok(()) => info!("TEI validation result: true {id} {url}"),
                    Err(reason) => info!("TEI validation result: false ({reason}) {id} {url}"),
                }
            }
            xml::control_xml_output(&xml::tree_to_string(&tree)?)
        }
        OutputFormat::Csv => {
            let text = xmltotxt(&body);
            let comments = comments.as_ref().map(xmltotxt).unwrap_or_default();
            Ok(csv::txttocsv(&text, &comments, meta))
        }
        OutputFormat::Json => {
            let text = xmltotxt(&body);
            let comments = comments.as_ref().map(xmltotxt).unwrap_or_default();
            json::build_json_output(meta, &text, &comments)
                .map_err(|_| Error::Discarded(DiscardReason::Serialization))
        }
        OutputFormat::Txt => Ok(xmltotxt(&xml::build_xml_output(meta, body, comments))),
    }
}
