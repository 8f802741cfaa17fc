//! Thread-safe chunk pipe
//!
//! One reader/writer lock guards the whole chain:
//! - push, pop and chunk pop take it exclusively for their full duration
//! - get and the traversals in [`crate::iter`] take it shared
//!
//! Nothing is logged while the lock is held.

mod chain;
mod config;

pub use config::{PipeConfig, BATCH_CAPACITY, SCRATCH_CAPACITY, SMALL_APPEND_MAX, STREAM_DEPTH};

pub(crate) use chain::Chain;

use std::fmt;

use parking_lot::{RwLock, RwLockReadGuard};
use tracing::{debug, trace};

use crate::index::IndexSummary;
use crate::PipeError;

/// Double-ended buffer of chunks
///
/// Share between threads with an `Arc`; every operation takes `&self`.
pub struct ChunkPipe<T> {
    config: PipeConfig,
    chain: RwLock<Chain<T>>,
}

/// Point-in-time counters of a pipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipeStats {
    /// Linked chunks
    pub chunks: usize,

    /// Linked chunks allocated for small appends
    pub scratch_chunks: usize,

    /// Total size counter
    pub total_size: usize,

    /// Logical element count
    pub valid_size: usize,

    /// Weighted index shape
    pub index: IndexSummary,
}

impl<T> ChunkPipe<T> {
    /// Create empty pipe with default thresholds
    pub fn new() -> Self {
        Self {
            config: PipeConfig::default(),
            chain: RwLock::new(Chain::new()),
        }
    }

    /// Create empty pipe with custom thresholds
    pub fn with_config(config: PipeConfig) -> Result<Self, PipeError> {
        config.validate()?;
        Ok(Self {
            config,
            chain: RwLock::new(Chain::new()),
        })
    }

    /// Active thresholds
    pub fn config(&self) -> &PipeConfig {
        &self.config
    }

    /// Number of valid elements
    pub fn len(&self) -> usize {
        self.chain.read().valid_size()
    }

    /// Check if no valid elements remain
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total size counter (never below [`len`](Self::len))
    pub fn total_size(&self) -> usize {
        self.chain.read().total_size()
    }

    /// Number of linked chunks
    pub fn chunk_count(&self) -> usize {
        self.chain.read().chunk_count()
    }

    /// Snapshot of counters and index shape
    pub fn stats(&self) -> PipeStats {
        let chain = self.chain.read();
        PipeStats {
            chunks: chain.chunk_count(),
            scratch_chunks: chain.scratch_count(),
            total_size: chain.total_size(),
            valid_size: chain.valid_size(),
            index: chain.index().summary(),
        }
    }

    /// Shared access for the traversals
    pub(crate) fn read_chain(&self) -> RwLockReadGuard<'_, Chain<T>> {
        self.chain.read()
    }
}

impl<T: Clone> ChunkPipe<T> {
    /// Append `data`, taking ownership of it
    ///
    /// Pushes longer than `small_append_max` become their own chunk without
    /// copying. Shorter ones are moved into the tail scratch chunk when it has
    /// room, or into a fresh scratch chunk. Empty pushes do nothing.
    ///
    /// Returns `self` so pushes chain.
    pub fn push(&self, data: Vec<T>) -> &Self {
        let added = data.len();
        let linked = self.chain.write().push(data, &self.config);

        if let Some(id) = linked {
            debug!(%id, len = added, "linked chunk");
        }
        self
    }

    /// Clone of the element at logical `index`
    ///
    /// Scans chunks from the head. `None` when `index >= len()`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.chain.read().get(index).cloned()
    }

    /// Remove and return the first element
    pub fn pop_front(&self) -> Option<T> {
        self.chain.write().pop_front()
    }

    /// Remove and return the last element
    pub fn pop_end(&self) -> Option<T> {
        self.chain.write().pop_end()
    }

    /// Remove the head chunk and return its remaining elements
    pub fn pop_chunk_front(&self) -> Option<Vec<T>> {
        let drained = self.chain.write().pop_chunk_front();
        if let Some(values) = &drained {
            trace!(len = values.len(), "drained head chunk");
        }
        drained
    }

    /// Remove the tail chunk and return its remaining elements
    pub fn pop_chunk_end(&self) -> Option<Vec<T>> {
        let drained = self.chain.write().pop_chunk_end();
        if let Some(values) = &drained {
            trace!(len = values.len(), "drained tail chunk");
        }
        drained
    }
}

impl<T> Default for ChunkPipe<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ChunkPipe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkPipe")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl<T: Clone> From<Vec<T>> for ChunkPipe<T> {
    fn from(block: Vec<T>) -> Self {
        let pipe = Self::new();
        pipe.push(block);
        pipe
    }
}

impl<T: Clone> FromIterator<T> for ChunkPipe<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}
