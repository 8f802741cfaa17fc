//! Background chunk streaming
//!
//! The read lock is held only long enough to capture a handle to every valid
//! window. A producer thread then coalesces the windows into batches and
//! sends them over a bounded channel, so a slow or abandoned consumer never
//! blocks writers.

use std::fmt;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::chunk::{Chunk, SharedWindow};
use crate::pipe::ChunkPipe;
use crate::PipeError;

/// Receiving end of [`ChunkPipe::range_chunk`]
///
/// Yields batches in head-to-tail order and ends once the producer has sent
/// everything. Dropping it (or calling [`close`](Self::close)) stops the
/// producer at its next send.
pub struct ChunkStream<T> {
    rx: mpsc::Receiver<Vec<T>>,
}

impl<T> ChunkStream<T> {
    /// Next batch, awaiting the producer
    pub async fn recv(&mut self) -> Option<Vec<T>> {
        self.rx.recv().await
    }

    /// Next batch, blocking the current thread
    ///
    /// # Panics
    ///
    /// Panics when called from inside an async runtime; use
    /// [`recv`](Self::recv) there.
    pub fn blocking_recv(&mut self) -> Option<Vec<T>> {
        self.rx.blocking_recv()
    }

    /// Stop the producer; batches already buffered can still be received
    pub fn close(&mut self) {
        self.rx.close();
    }
}

impl<T> Iterator for ChunkStream<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.blocking_recv()
    }
}

impl<T> fmt::Debug for ChunkStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkStream").field("rx", &self.rx).finish()
    }
}

impl<T> ChunkPipe<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Stream the valid elements as batches from a background thread
    ///
    /// Windows that fit the remaining batch capacity are copied into the
    /// pending batch; a window that does not fit flushes the pending batch and
    /// is then sent on its own. Later pushes and pops do not affect a stream
    /// that has already started.
    pub fn range_chunk(&self) -> Result<ChunkStream<T>, PipeError> {
        let windows: Vec<SharedWindow<T>> = self
            .read_chain()
            .chunks()
            .filter(|chunk| !chunk.is_exhausted())
            .map(Chunk::shared_window)
            .collect();

        let batch_capacity = self.config().batch_capacity;
        let (tx, rx) = mpsc::channel(self.config().stream_depth);

        debug!(
            windows = windows.len(),
            elements = windows.iter().map(SharedWindow::len).sum::<usize>(),
            "starting chunk stream"
        );

        thread::Builder::new()
            .name("chunkpipe-stream".to_string())
            .spawn(move || {
                let completed = coalesce(windows, batch_capacity, |batch| {
                    tx.blocking_send(batch).is_ok()
                });
                if completed {
                    trace!("chunk stream complete");
                } else {
                    debug!("chunk stream receiver dropped, producer stopping");
                }
            })?;

        Ok(ChunkStream { rx })
    }
}

/// Coalesce `windows` into batches and hand each to `emit`
///
/// Stops as soon as `emit` returns `false`. Returns whether every batch was
/// accepted.
pub(crate) fn coalesce<T, F>(windows: Vec<SharedWindow<T>>, batch_capacity: usize, mut emit: F) -> bool
where
    T: Clone,
    F: FnMut(Vec<T>) -> bool,
{
    let mut batch: Vec<T> = Vec::with_capacity(batch_capacity);

    for window in windows {
        if window.len() == 0 {
            continue;
        }
        if batch.len() + window.len() <= batch_capacity {
            batch.extend_from_slice(window.as_slice());
            continue;
        }

        if !batch.is_empty() {
            let full = std::mem::replace(&mut batch, Vec::with_capacity(batch_capacity));
            if !emit(full) {
                return false;
            }
        }
        if !emit(window.into_vec()) {
            return false;
        }
    }

    batch.is_empty() || emit(batch)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::PipeConfig;

    fn windows(blocks: &[&[u32]]) -> Vec<SharedWindow<u32>> {
        blocks
            .iter()
            .map(|block| SharedWindow::new(Arc::new(block.to_vec()), 0..block.len()))
            .collect()
    }

    fn collect_batches(blocks: &[&[u32]], batch_capacity: usize) -> Vec<Vec<u32>> {
        let mut batches = Vec::new();
        let completed = coalesce(windows(blocks), batch_capacity, |batch| {
            batches.push(batch);
            true
        });
        assert!(completed);
        batches
    }

    #[test]
    fn test_small_windows_coalesce() {
        let batches = collect_batches(&[&[1, 2], &[3], &[4, 5]], 8);
        assert_eq!(batches, vec![vec![1, 2, 3, 4, 5]]);
    }

    #[test]
    fn test_oversized_window_flushes_then_sends_alone() {
        let big: Vec<u32> = (10..20).collect();
        let batches = collect_batches(&[&[1, 2], &big, &[3]], 4);
        assert_eq!(batches, vec![vec![1, 2], big.clone(), vec![3]]);
    }

    #[test]
    fn test_window_that_misses_remaining_room_is_sent_raw() {
        let batches = collect_batches(&[&[1, 2, 3], &[4, 5], &[6]], 4);
        assert_eq!(batches, vec![vec![1, 2, 3], vec![4, 5], vec![6]]);
    }

    #[test]
    fn test_emit_refusal_stops_producer() {
        let mut calls = 0;
        let completed = coalesce(windows(&[&[1, 2, 3], &[4, 5, 6], &[7]]), 2, |_| {
            calls += 1;
            false
        });
        assert!(!completed);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_range_chunk_blocking() {
        let pipe = ChunkPipe::with_config(PipeConfig {
            batch_capacity: 4,
            ..PipeConfig::bulk_only()
        })
        .unwrap();
        pipe.push(vec![1, 2]).push(vec![3]).push((4..10).collect());

        let batches: Vec<Vec<u32>> = pipe.range_chunk().unwrap().collect();
        assert_eq!(batches, vec![vec![1, 2, 3], (4..10).collect::<Vec<_>>()]);
        assert_eq!(batches.concat(), pipe.range());
    }

    #[test]
    fn test_range_chunk_empty_pipe_closes() {
        let pipe = ChunkPipe::<u32>::new();
        let mut stream = pipe.range_chunk().unwrap();
        assert_eq!(stream.blocking_recv(), None);
    }
}
