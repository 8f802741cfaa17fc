//! Chunk chain state (unlocked)
//!
//! Everything the pipe's lock guards: the chunks from head to tail, the two
//! counters and the weighted index. The chain owns its chunks outright; a
//! chunk's neighbours are simply its positions in the deque.

use std::collections::VecDeque;

use crate::chunk::{Chunk, ChunkId, ChunkOrigin};
use crate::index::WeightedIndex;

use super::PipeConfig;

/// Head-to-tail chunk sequence plus aggregate counters
#[derive(Debug)]
pub(crate) struct Chain<T> {
    chunks: VecDeque<Chunk<T>>,

    /// Mirrors `valid_size` through pushes and pops
    total_size: usize,

    /// Logical element count
    valid_size: usize,

    next_id: u64,

    index: WeightedIndex,
}

impl<T> Chain<T> {
    pub(crate) fn new() -> Self {
        Self {
            chunks: VecDeque::new(),
            total_size: 0,
            valid_size: 0,
            next_id: 0,
            index: WeightedIndex::new(),
        }
    }

    #[inline]
    pub(crate) fn valid_size(&self) -> usize {
        self.valid_size
    }

    #[inline]
    pub(crate) fn total_size(&self) -> usize {
        self.total_size
    }

    pub(crate) fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub(crate) fn scratch_count(&self) -> usize {
        self.chunks
            .iter()
            .filter(|c| matches!(c.origin(), ChunkOrigin::Scratch { .. }))
            .count()
    }

    /// Chunks from head to tail
    pub(crate) fn chunks(&self) -> impl Iterator<Item = &Chunk<T>> + '_ {
        self.chunks.iter()
    }

    pub(crate) fn index(&self) -> &WeightedIndex {
        &self.index
    }

    /// Element at logical `index`
    ///
    /// Walks from the head, so cost grows with the number of chunks in front.
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        if index >= self.valid_size {
            return None;
        }

        let mut remaining = index;
        for chunk in &self.chunks {
            let valid = chunk.valid_len();
            if remaining < valid {
                return chunk.get(remaining);
            }
            remaining -= valid;
        }
        None
    }

    fn next_id(&mut self) -> ChunkId {
        let id = ChunkId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append `chunk` as the new tail and index it
    fn link(&mut self, chunk: Chunk<T>) -> ChunkId {
        let id = chunk.id();
        self.index.insert(id, chunk.size(), chunk.valid_len());
        self.chunks.push_back(chunk);
        id
    }

    fn consume(&mut self, count: usize) {
        self.valid_size -= count;
        self.total_size -= count;
    }

    /// Drop exhausted chunks sitting at the head
    fn retire_front(&mut self) {
        while self.chunks.front().is_some_and(Chunk::is_exhausted) {
            self.chunks.pop_front();
        }
    }

    /// Drop exhausted chunks sitting at the tail
    fn retire_back(&mut self) {
        while self.chunks.back().is_some_and(Chunk::is_exhausted) {
            self.chunks.pop_back();
        }
    }
}

impl<T: Clone> Chain<T> {
    /// Incorporate `data`, returning the id of a newly linked chunk if any
    pub(crate) fn push(&mut self, data: Vec<T>, config: &PipeConfig) -> Option<ChunkId> {
        let added = data.len();
        if added == 0 {
            return None;
        }

        let linked = if added <= config.small_append_max {
            let leftover = match self.chunks.back_mut() {
                Some(tail) => tail.try_extend(data).err(),
                None => Some(data),
            };
            leftover.map(|values| {
                let id = self.next_id();
                self.link(Chunk::scratch(id, config.scratch_capacity, values))
            })
        } else {
            let id = self.next_id();
            Some(self.link(Chunk::transferred(id, data)))
        };

        self.total_size += added;
        self.valid_size += added;
        linked
    }

    pub(crate) fn pop_front(&mut self) -> Option<T> {
        self.retire_front();
        let head = self.chunks.front_mut()?;
        let value = head.take_front()?;
        let exhausted = head.is_exhausted();

        self.consume(1);
        if exhausted {
            self.chunks.pop_front();
        }
        Some(value)
    }

    pub(crate) fn pop_end(&mut self) -> Option<T> {
        self.retire_back();
        let tail = self.chunks.back_mut()?;
        let value = tail.take_back()?;
        let exhausted = tail.is_exhausted();

        self.consume(1);
        if exhausted {
            self.chunks.pop_back();
        }
        Some(value)
    }

    /// Unlink the head chunk and return its valid window
    ///
    /// An exhausted head is still unlinked, but reports `None`.
    pub(crate) fn pop_chunk_front(&mut self) -> Option<Vec<T>> {
        if self.valid_size == 0 {
            self.retire_front();
            return None;
        }
        let head = self.chunks.pop_front()?;
        self.take_window(head)
    }

    /// Unlink the tail chunk and return its valid window
    ///
    /// An exhausted tail is still unlinked, but reports `None`.
    pub(crate) fn pop_chunk_end(&mut self) -> Option<Vec<T>> {
        if self.valid_size == 0 {
            self.retire_back();
            return None;
        }
        let tail = self.chunks.pop_back()?;
        self.take_window(tail)
    }

    fn take_window(&mut self, chunk: Chunk<T>) -> Option<Vec<T>> {
        if chunk.is_exhausted() {
            return None;
        }
        self.consume(chunk.valid_len());
        Some(chunk.into_window())
    }
}
