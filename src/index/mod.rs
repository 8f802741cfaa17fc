//! Weighted secondary index over chunks
//!
//! Purely additive: one node per linked chunk, never removed or rebalanced.
//! Lookup walks the chunk chain and does not consult this tree; it is kept
//! current on chunk insertion and reported through pipe statistics.

mod node;

pub use node::IndexNode;

use crate::chunk::ChunkId;

/// Weighted index tree (root only)
#[derive(Debug, Default)]
pub struct WeightedIndex {
    root: Option<IndexNode>,
}

/// Shape and weight of a [`WeightedIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexSummary {
    /// Number of nodes (chunks ever indexed)
    pub nodes: usize,

    /// Longest root-to-leaf path in nodes
    pub depth: usize,

    /// Root `sum`: total size of all indexed chunks at insertion time
    pub sum: usize,

    /// Root `valid_size`
    pub valid_size: usize,
}

impl WeightedIndex {
    /// Create empty index
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Record a newly linked chunk
    pub fn insert(&mut self, chunk: ChunkId, size: usize, valid_size: usize) {
        let leaf = IndexNode::leaf(chunk, size, valid_size);
        match self.root.as_mut() {
            Some(root) => root.insert(leaf),
            None => self.root = Some(leaf),
        }
    }

    /// Get root node
    pub fn root(&self) -> Option<&IndexNode> {
        self.root.as_ref()
    }

    /// Check if no chunk was ever indexed
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Summarize shape and weights
    pub fn summary(&self) -> IndexSummary {
        self.root
            .as_ref()
            .map(|root| IndexSummary {
                nodes: root.count(),
                depth: root.depth(),
                sum: root.sum,
                valid_size: root.valid_size,
            })
            .unwrap_or_default()
    }
}
