//! Pipe configuration
//!
//! Thresholds for the append paths and the streaming traversal.

use crate::PipeError;

/// Largest push that takes the small-append path
pub const SMALL_APPEND_MAX: usize = 8;

/// Slots in a scratch chunk allocated for small appends
pub const SCRATCH_CAPACITY: usize = 16;

/// Coalescing threshold for streamed batches
pub const BATCH_CAPACITY: usize = 1024;

/// Bounded depth of the stream channel
pub const STREAM_DEPTH: usize = 256;

/// Tunable thresholds for a [`crate::ChunkPipe`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipeConfig {
    /// Pushes of at most this many values are copied into scratch chunks
    pub small_append_max: usize,

    /// Capacity of each scratch chunk (must hold one small append)
    pub scratch_capacity: usize,

    /// Streamed windows are coalesced into batches of at most this many values
    pub batch_capacity: usize,

    /// Batches buffered in the stream channel before the producer waits
    pub stream_depth: usize,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            small_append_max: SMALL_APPEND_MAX,
            scratch_capacity: SCRATCH_CAPACITY,
            batch_capacity: BATCH_CAPACITY,
            stream_depth: STREAM_DEPTH,
        }
    }
}

impl PipeConfig {
    /// Configuration that never coalesces: every push becomes its own chunk
    pub fn bulk_only() -> Self {
        Self {
            small_append_max: 0,
            ..Self::default()
        }
    }

    /// Check thresholds are usable
    pub fn validate(&self) -> Result<(), PipeError> {
        if self.scratch_capacity == 0 {
            return Err(PipeError::InvalidConfig(
                "scratch capacity must be > 0".to_string(),
            ));
        }
        if self.small_append_max > self.scratch_capacity {
            return Err(PipeError::InvalidConfig(format!(
                "small append max {} exceeds scratch capacity {}",
                self.small_append_max, self.scratch_capacity
            )));
        }
        if self.batch_capacity == 0 {
            return Err(PipeError::InvalidConfig(
                "batch capacity must be > 0".to_string(),
            ));
        }
        // tokio's bounded channel panics on zero capacity
        if self.stream_depth == 0 {
            return Err(PipeError::InvalidConfig(
                "stream depth must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
