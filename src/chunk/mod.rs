//! Chunk storage
//!
//! Chunk = one contiguous block + valid window [offset, size)
//!
//! Elements before `offset` were drained from the front, elements at or past
//! `size` were drained from the back. A chunk whose window is empty is retired
//! by the pipe.

mod window;

pub(crate) use window::SharedWindow;

use std::fmt;
use std::sync::Arc;

/// Identifier assigned to a chunk when it is linked into the chain
///
/// Monotonic per pipe; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkId(pub u64);

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk#{}", self.0)
    }
}

/// Where a chunk's block came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOrigin {
    /// Caller's vector, moved in by a bulk append. Never grown in place.
    Transferred,
    /// Allocated by the pipe to coalesce small appends
    Scratch {
        /// Number of slots the block may hold
        capacity: usize,
    },
}

/// One link of the chunk chain
#[derive(Debug)]
pub struct Chunk<T> {
    id: ChunkId,

    /// Shared so stream snapshots can outlive the lock (copy-on-write)
    block: Arc<Vec<T>>,

    /// First valid slot
    offset: usize,

    /// One past the last valid slot
    size: usize,

    origin: ChunkOrigin,
}

impl<T> Chunk<T> {
    /// Take ownership of a caller's block without copying
    pub(crate) fn transferred(id: ChunkId, block: Vec<T>) -> Self {
        let size = block.len();
        Self {
            id,
            block: Arc::new(block),
            offset: 0,
            size,
            origin: ChunkOrigin::Transferred,
        }
    }

    /// Allocate a scratch block of `capacity` slots seeded with `values`
    pub(crate) fn scratch(id: ChunkId, capacity: usize, values: Vec<T>) -> Self {
        debug_assert!(values.len() <= capacity, "seed larger than scratch capacity");

        let capacity = capacity.max(values.len());
        let mut block = Vec::with_capacity(capacity);
        block.extend(values);
        let size = block.len();

        Self {
            id,
            block: Arc::new(block),
            offset: 0,
            size,
            origin: ChunkOrigin::Scratch { capacity },
        }
    }

    /// Chunk identifier
    pub fn id(&self) -> ChunkId {
        self.id
    }

    /// Block origin
    pub fn origin(&self) -> ChunkOrigin {
        self.origin
    }

    /// First valid slot
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// One past the last valid slot
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of valid elements: `size - offset`
    #[inline]
    pub fn valid_len(&self) -> usize {
        self.size - self.offset
    }

    /// True once the valid window is empty (eligible for retirement)
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.offset >= self.size
    }

    /// Slots a small append may still write in place
    ///
    /// Always 0 for transferred blocks: their real allocation is not ours to
    /// grow.
    pub fn spare_capacity(&self) -> usize {
        match self.origin {
            ChunkOrigin::Transferred => 0,
            ChunkOrigin::Scratch { capacity } => capacity.saturating_sub(self.size),
        }
    }

    /// Valid window as a slice
    #[inline]
    pub fn window(&self) -> &[T] {
        &self.block[self.offset..self.size]
    }

    /// Element at `index` within the valid window
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.window().get(index)
    }

    /// Handle to the valid window that stays readable after the lock is gone
    pub(crate) fn shared_window(&self) -> SharedWindow<T> {
        SharedWindow::new(Arc::clone(&self.block), self.offset..self.size)
    }
}

impl<T: Clone> Chunk<T> {
    /// Write `values` at `size` if the scratch capacity allows
    ///
    /// Hands the values back untouched when there is no room.
    pub(crate) fn try_extend(&mut self, values: Vec<T>) -> Result<(), Vec<T>> {
        if values.len() > self.spare_capacity() {
            return Err(values);
        }

        let added = values.len();
        // Clones the block only if a stream snapshot still holds it
        let block = Arc::make_mut(&mut self.block);
        block.truncate(self.size);
        block.extend(values);
        self.size += added;
        Ok(())
    }

    /// Read the element at `offset` and advance past it
    pub(crate) fn take_front(&mut self) -> Option<T> {
        if self.is_exhausted() {
            return None;
        }
        let value = self.block[self.offset].clone();
        self.offset += 1;
        Some(value)
    }

    /// Read the element at `size - 1` and shrink past it
    pub(crate) fn take_back(&mut self) -> Option<T> {
        if self.is_exhausted() {
            return None;
        }
        self.size -= 1;
        Some(self.block[self.size].clone())
    }

    /// Consume the chunk, returning its valid window
    ///
    /// Reuses the block when nothing else references it.
    pub(crate) fn into_window(self) -> Vec<T> {
        let Self {
            block,
            offset,
            size,
            ..
        } = self;

        match Arc::try_unwrap(block) {
            Ok(mut owned) => {
                owned.truncate(size);
                owned.drain(..offset);
                owned
            }
            Err(shared) => shared[offset..size].to_vec(),
        }
    }
}
