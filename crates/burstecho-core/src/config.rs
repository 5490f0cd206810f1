//! Engine construction parameters.

use crate::delay::{DEFAULT_CAPACITY, MAX_CAPACITY};
use crate::error::EngineError;
use crate::expo::DEFAULT_TIME_SCALE;
use crate::fixed::ONE;

/// Samples written per half of the output double buffer.
pub const DEFAULT_BLOCK_SIZE: usize = 1;

/// Default feedback gain (0.5 in 16.16).
pub const DEFAULT_FEEDBACK_GAIN: i32 = ONE / 2;

/// Default burst read-offset shift.
pub const DEFAULT_BURST_DELAY_SHIFT: u32 = 8;

/// Largest accepted burst read-offset shift.
pub const MAX_BURST_DELAY_SHIFT: u32 = 16;

/// Everything fixed at construction time.
///
/// All fixed-point fields are 16.16.
///
/// # Example
///
/// ```rust
/// use burstecho_core::EngineConfig;
///
/// let config = EngineConfig {
///     feedback_mod: true,
///     ..EngineConfig::DEFAULT
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Delay ring capacity in samples (power of two).
    pub capacity: usize,
    /// Samples produced per processor call.
    pub block_size: usize,
    /// Feedback gain, `0..ONE`.
    pub feedback_gain: i32,
    /// Multiplier applied to the exponential curve.
    pub time_scale: i32,
    /// Power-on delay length.
    pub initial_length: i32,
    /// Power-on state of feedback modulation.
    pub feedback_mod: bool,
    /// Power-on state of delay modulation.
    pub delay_mod: bool,
    /// Left shift turning a register value into a read offset.
    pub burst_delay_shift: u32,
}

impl EngineConfig {
    /// Factory configuration: 4096-sample ring, single-sample blocks, one
    /// sample of initial delay, delay modulation on, feedback off.
    pub const DEFAULT: Self = Self {
        capacity: DEFAULT_CAPACITY,
        block_size: DEFAULT_BLOCK_SIZE,
        feedback_gain: DEFAULT_FEEDBACK_GAIN,
        time_scale: DEFAULT_TIME_SCALE,
        initial_length: ONE,
        feedback_mod: false,
        delay_mod: true,
        burst_delay_shift: DEFAULT_BURST_DELAY_SHIFT,
    };

    /// Checks every field the engine relies on.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.capacity.is_power_of_two() || !(4..=MAX_CAPACITY).contains(&self.capacity) {
            return Err(EngineError::InvalidCapacity(self.capacity));
        }
        if self.block_size == 0 {
            return Err(EngineError::InvalidBlockSize);
        }
        if !(0..ONE).contains(&self.feedback_gain) {
            return Err(EngineError::InvalidFeedback(self.feedback_gain));
        }
        if self.time_scale <= 0 {
            return Err(EngineError::InvalidTimeScale(self.time_scale));
        }
        if self.burst_delay_shift > MAX_BURST_DELAY_SHIFT {
            return Err(EngineError::InvalidBurstShift(self.burst_delay_shift));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
