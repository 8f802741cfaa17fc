//! Traversal strategies
//!
//! Three ways to read the whole pipe head to tail:
//! - [`ChunkPipe::range`]: eager copy into one vector
//! - [`ChunkPipe::range_chunk`]: batches streamed from a background thread
//! - [`ChunkPipe::range_values`]: borrow each element in place until told to stop

mod stream;

pub use stream::ChunkStream;

use crate::pipe::ChunkPipe;

/// Elements handed to the visitor per inner loop
const VISIT_GROUP: usize = 16;

impl<T: Clone> ChunkPipe<T> {
    /// Copy every valid element into a fresh vector
    ///
    /// Holds the read lock for the copy; the result shares nothing with the
    /// pipe.
    pub fn range(&self) -> Vec<T> {
        let chain = self.read_chain();
        let mut values = Vec::with_capacity(chain.valid_size());
        for chunk in chain.chunks() {
            values.extend_from_slice(chunk.window());
        }
        values
    }
}

impl<T> ChunkPipe<T> {
    /// Visit every valid element in order until `visit` returns `false`
    ///
    /// Elements are borrowed, never copied. The read lock is held for the
    /// whole traversal, so `visit` must not push or pop on this pipe.
    pub fn range_values<F>(&self, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        let chain = self.read_chain();
        for chunk in chain.chunks() {
            for group in chunk.window().chunks(VISIT_GROUP) {
                if !group.iter().all(|value| visit(value)) {
                    return;
                }
            }
        }
    }
}
