//! # Chunked Double-Ended Pipe Buffer
//!
//! A thread-safe buffer that stores a logical sequence of values as a chain
//! of variable-sized chunks instead of one growable allocation.
//!
//! ## Core Design
//!
//! 1. **Bulk append**: a pushed `Vec<T>` is moved into the chain as its own
//!    chunk, no copy
//! 2. **Small append**: short pushes are coalesced into scratch chunks the
//!    buffer allocated itself, with an explicit capacity
//! 3. **Two-ended drain**: single elements or whole chunks leave from the head
//!    or the tail, and exhausted chunks are retired immediately
//! 4. **Three traversals**: eager snapshot, background chunk streaming, and
//!    zero-copy callback visits
//!
//! ## Usage Example
//!
//! ```
//! use chunkpipe::ChunkPipe;
//!
//! let pipe = ChunkPipe::new();
//! pipe.push(vec![1, 2, 3]).push(vec![4, 5]);
//!
//! assert_eq!(pipe.range(), vec![1, 2, 3, 4, 5]);
//! assert_eq!(pipe.get(3), Some(4));
//! assert_eq!(pipe.pop_front(), Some(1));
//! assert_eq!(pipe.pop_end(), Some(5));
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules
pub mod chunk;  // Chunk storage and valid windows
pub mod index;  // Weighted secondary index over chunks
pub mod iter;   // Snapshot, streaming and callback traversal
pub mod pipe;   // The buffer itself

// Re-exports for convenience
pub use chunk::{Chunk, ChunkId, ChunkOrigin};
pub use index::{IndexNode, IndexSummary, WeightedIndex};
pub use iter::ChunkStream;
pub use pipe::{ChunkPipe, PipeConfig, PipeStats};

use thiserror::Error;

/// Errors raised by the buffer
///
/// Ordinary misuse (empty pops, out-of-range lookups, empty pushes) never
/// errors; those report `None` or do nothing.
#[derive(Error, Debug)]
pub enum PipeError {
    /// Configuration rejected by [`PipeConfig::validate`]
    #[error("invalid pipe configuration: {0}")]
    InvalidConfig(String),

    /// Background producer for [`ChunkPipe::range_chunk`] could not start
    #[error("failed to spawn chunk stream producer: {0}")]
    StreamSpawn(#[from] std::io::Error),
}
