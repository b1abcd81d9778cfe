//! Duplicate cache.
//!
//! Bounded least-recently-used counter of text segments seen so far. It is
//! owned by an [`crate::Extractor`] (or created fresh per one-shot call) and
//! threaded by `&mut` through the handlers, so no global state is involved.

pub use html_cleaning::dedup::LruCache;
