//! Construction-time errors.
//!
//! Steady-state processing cannot fail: every index wraps and every control
//! saturates. The only failures happen before the engine is placed in service.

use thiserror::Error;

/// Errors returned while building a [`DelayEngine`](crate::DelayEngine).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The delay buffer could not be reserved.
    #[error("failed to allocate delay buffer of {capacity} samples")]
    Allocation {
        /// Requested capacity in samples.
        capacity: usize,
    },

    /// Capacity is not a power of two in the supported range.
    #[error("delay capacity {0} must be a power of two between 4 and 16384")]
    InvalidCapacity(usize),

    /// Block size of zero.
    #[error("block size must be nonzero")]
    InvalidBlockSize,

    /// Feedback gain at or above unity, or negative.
    #[error("feedback gain {0} must be in 0..65536")]
    InvalidFeedback(i32),

    /// Non-positive time scale.
    #[error("time scale {0} must be positive")]
    InvalidTimeScale(i32),

    /// Burst delay shift too wide.
    #[error("burst delay shift {0} exceeds 16")]
    InvalidBurstShift(u32),
}
