//! Extraction state tracking.
//!
//! One `ExtractionState` lives for a whole extraction run. It records which
//! source nodes have been consumed, so a node copied into the content tree is
//! never read again by a later handler, a later candidate rule or the
//! recovery pass. It also carries the per-attempt set of eligible tags and the
//! duplicate cache shared by all handlers.

use std::collections::HashSet;

use dom_query::{NodeId, Selection};

use super::tags::TAG_CATALOG;
use crate::dom;
use crate::lru::LruCache;
use crate::options::Options;

/// Consumption tracking, potential tags and shared resources of a run.
pub struct ExtractionState<'a> {
    /// Source nodes already consumed by a handler.
    processed_nodes: HashSet<NodeId>,

    /// Tag names eligible for extraction in the current attempt.
    potential_tags: HashSet<String>,

    /// Duplicate cache, owned by the caller.
    pub cache: &'a mut LruCache,

    pub opts: &'a Options,
}

impl<'a> ExtractionState<'a> {
    /// Create a state with the default potential tags from `TAG_CATALOG`.
    #[must_use]
    pub fn new(cache: &'a mut LruCache, opts: &'a Options) -> Self {
        Self {
            processed_nodes: HashSet::new(),
            potential_tags: catalog(),
            cache,
            opts,
        }
    }

    /// Mark a node as consumed.
    pub fn mark_done(&mut self, node_id: NodeId) {
        self.processed_nodes.insert(node_id);
    }

    /// Mark a selection and all its descendants as consumed.
    pub fn mark_subtree_done(&mut self, sel: &Selection) {
        if let Some(id) = dom::node_id(sel) {
            self.mark_done(id);
        }
        for node in sel.select("*").nodes() {
            self.mark_done(node.id);
        }
    }

    #[must_use]
    pub fn is_done(&self, node_id: NodeId) -> bool {
        self.processed_nodes.contains(&node_id)
    }

    /// Whether the first node of `sel` was consumed.
    #[must_use]
    pub fn is_selection_done(&self, sel: &Selection) -> bool {
        dom::node_id(sel).is_some_and(|id| self.is_done(id))
    }

    /// Number of consumed nodes.
    #[must_use]
    pub fn done_count(&self) -> usize {
        self.processed_nodes.len()
    }

    #[must_use]
    pub fn is_potential_tag(&self, tag: &str) -> bool {
        self.potential_tags.contains(tag)
    }

    /// Reset potential tags to `TAG_CATALOG`, plus `table` and `div` on request.
    pub fn reset_potential_tags(&mut self, with_table: bool, with_div: bool) {
        self.potential_tags = catalog();
        if with_table {
            self.potential_tags.insert("table".to_string());
        }
        if with_div {
            self.potential_tags.insert("div".to_string());
        }
    }

    /// Potential tags, sorted, for logging.
    #[must_use]
    pub fn potential_tags_sorted(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.potential_tags.iter().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

fn catalog() -> HashSet<String> {
    TAG_CATALOG.iter().map(|s| (*s).to_string()).collect()
}
