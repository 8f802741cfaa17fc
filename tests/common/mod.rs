//! Shared helpers for integration tests

#![allow(dead_code)]

use chunkpipe::{ChunkPipe, PipeConfig};

/// Pipe where every push becomes its own chunk
pub fn bulk_pipe<T: Clone>() -> ChunkPipe<T> {
    ChunkPipe::with_config(PipeConfig::bulk_only()).expect("bulk-only config is valid")
}

/// Push each block in order
pub fn pipe_from_blocks<T: Clone>(pipe: ChunkPipe<T>, blocks: &[Vec<T>]) -> ChunkPipe<T> {
    for block in blocks {
        pipe.push(block.clone());
    }
    pipe
}

/// Drain with `pop_front` until empty
pub fn drain_front<T: Clone>(pipe: &ChunkPipe<T>) -> Vec<T> {
    std::iter::from_fn(|| pipe.pop_front()).collect()
}

/// Drain with `pop_end` until empty
pub fn drain_end<T: Clone>(pipe: &ChunkPipe<T>) -> Vec<T> {
    std::iter::from_fn(|| pipe.pop_end()).collect()
}

/// Assert the pipe holds nothing and its counters are back to zero
pub fn assert_drained<T: Clone>(pipe: &ChunkPipe<T>) {
    let stats = pipe.stats();
    assert_eq!(stats.chunks, 0, "chunks left after drain: {:?}", stats);
    assert_eq!(stats.valid_size, 0);
    assert_eq!(stats.total_size, 0);
    assert!(pipe.range().is_empty());
}
