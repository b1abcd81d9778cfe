//! Content and comments extraction.
//!
//! # Module Structure
//!
//! - `tags`: Tag catalogs and the vocabulary they map onto
//! - `state`: Per-run bookkeeping (consumed nodes, potential tags, dedup cache)
//! - `handlers`: One handler per element family, producing content-tree elements
//! - `pipeline`: Candidate rules, link-density pruning and paragraph recovery
//! - `comments`: Comments section extraction and detachment
//! - `fallback`: Arbiter between the rule-based and generic algorithms, baseline
//!
//! # Usage
//!
//! ```rust,ignore
//! use trafilatura_core::extractor::{extract_comments, extract_content, ExtractionState};
//!
//! let (comments, comments_text, len_comments) = extract_comments(&doc, &mut cache, &opts);
//! let mut state = ExtractionState::new(&mut cache, &opts);
//! let (body, text, len_text, sure_thing) = extract_content(&doc, &mut state);
//! ```

pub mod comments;
pub mod fallback;
pub mod handlers;
pub mod pipeline;
pub mod state;
pub mod tags;

pub use comments::extract_comments;
pub use fallback::{baseline, compare_extraction, second_opinion};
pub use pipeline::{extract_content, recover_wild_paragraphs};
pub use state::ExtractionState;
