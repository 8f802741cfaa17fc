//! Weighted index node
//!
//! Node = one chunk's weight + the accumulated weight of everything below it.
//! New nodes descend toward the lighter child, so the tree stays roughly
//! balanced by weight without rotations.

use std::fmt;

use crate::chunk::ChunkId;

/// Index node tracking cumulative size and valid count of its subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexNode {
    /// Total chunk size of this subtree
    pub sum: usize,

    /// Total valid count of this subtree
    pub valid_size: usize,

    /// Chunk this node was created for (lookup only, never owns it)
    pub chunk: ChunkId,

    /// Left child
    pub left: Option<Box<IndexNode>>,

    /// Right child
    pub right: Option<Box<IndexNode>>,
}

impl IndexNode {
    /// Create a leaf for one chunk
    pub fn leaf(chunk: ChunkId, size: usize, valid_size: usize) -> Self {
        Self {
            sum: size,
            valid_size,
            chunk,
            left: None,
            right: None,
        }
    }

    /// Check if leaf
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Insert `leaf` into this subtree
    ///
    /// Every node on the descent path absorbs the leaf's weight. The leaf
    /// takes the first free child slot (left before right); with both slots
    /// taken it descends into the child with the smaller `sum`, left on ties.
    pub fn insert(&mut self, leaf: IndexNode) {
        self.sum += leaf.sum;
        self.valid_size += leaf.valid_size;

        if self.left.is_none() {
            self.left = Some(Box::new(leaf));
            return;
        }
        if self.right.is_none() {
            self.right = Some(Box::new(leaf));
            return;
        }

        let descend_left =
            matches!((&self.left, &self.right), (Some(l), Some(r)) if l.sum <= r.sum);
        let child = if descend_left {
            self.left.as_deref_mut()
        } else {
            self.right.as_deref_mut()
        };
        if let Some(child) = child {
            child.insert(leaf);
        }
    }

    /// Number of nodes in this subtree
    pub fn count(&self) -> usize {
        1 + self.left.as_deref().map_or(0, IndexNode::count)
            + self.right.as_deref().map_or(0, IndexNode::count)
    }

    /// Longest root-to-leaf path, counted in nodes
    pub fn depth(&self) -> usize {
        let left = self.left.as_deref().map_or(0, IndexNode::depth);
        let right = self.right.as_deref().map_or(0, IndexNode::depth);
        1 + left.max(right)
    }
}

impl fmt::Display for IndexNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} sum={} valid={}]", self.chunk, self.sum, self.valid_size)
    }
}
