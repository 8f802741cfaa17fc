//! Lock-free view of a chunk's valid window

use std::ops::Range;
use std::sync::Arc;

/// Block handle plus the window that was valid when it was captured
#[derive(Debug)]
pub(crate) struct SharedWindow<T> {
    block: Arc<Vec<T>>,
    range: Range<usize>,
}

impl<T> SharedWindow<T> {
    pub(crate) fn new(block: Arc<Vec<T>>, range: Range<usize>) -> Self {
        debug_assert!(range.start <= range.end && range.end <= block.len());
        Self { block, range }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.range.len()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        &self.block[self.range.clone()]
    }
}

impl<T: Clone> SharedWindow<T> {
    /// Owned copy of the window, reusing the block if this is the last handle
    pub(crate) fn into_vec(self) -> Vec<T> {
        let Self { block, range } = self;
        match Arc::try_unwrap(block) {
            Ok(mut owned) => {
                owned.truncate(range.end);
                owned.drain(..range.start);
                owned
            }
            Err(shared) => shared[range].to_vec(),
        }
    }
}
