//! Delay-time slew.
//!
//! The control tick runs far slower than the audio tick, so a new target would
//! otherwise land as a step in read position: a click, or a pitch jump while
//! the delay is sounding. [`DelayRamp`] spreads each change over
//! [`RAMP_STEPS`] audio ticks with a constant per-tick increment and snaps to
//! the target once the remaining distance fits in one step.

use crate::fixed::ONE;

/// Audio ticks a target change is spread over.
pub const RAMP_STEPS: i32 = 16;

/// Shortest delay length the engine allows (one sample).
pub const MIN_LENGTH: i32 = ONE;

/// Linear slew of a 16.16 delay length toward a target.
///
/// The increment is `ceil(distance / RAMP_STEPS)`, so any change settles in at
/// most [`RAMP_STEPS`] ticks and never overshoots.
///
/// # Example
///
/// ```rust
/// use burstecho_core::{DelayRamp, RAMP_STEPS};
///
/// let mut ramp = DelayRamp::new(65536, 65536, 65536 * 100);
/// ramp.set_target(65536 * 17);
/// for _ in 0..RAMP_STEPS {
///     ramp.advance();
/// }
/// assert!(ramp.is_settled());
/// assert_eq!(ramp.active(), 65536 * 17);
/// ```
#[derive(Debug, Clone)]
pub struct DelayRamp {
    active: i32,
    target: i32,
    increment: i32,
    min: i32,
    max: i32,
}

impl DelayRamp {
    /// Creates a settled ramp at `initial`, bounded to `[min, max]`.
    pub fn new(initial: i32, min: i32, max: i32) -> Self {
        let initial = initial.clamp(min, max);
        Self {
            active: initial,
            target: initial,
            increment: 0,
            min,
            max,
        }
    }

    /// Sets a new target and recomputes the per-tick increment.
    pub fn set_target(&mut self, target: i32) {
        let target = target.clamp(self.min, self.max);
        self.target = target;

        let distance = target - self.active;
        let magnitude = distance.unsigned_abs().div_ceil(RAMP_STEPS as u32) as i32;
        self.increment = if distance < 0 { -magnitude } else { magnitude };
    }

    /// Jumps straight to `length` with no slew.
    pub fn set_immediate(&mut self, length: i32) {
        let length = length.clamp(self.min, self.max);
        self.active = length;
        self.target = length;
        self.increment = 0;
    }

    /// Advances one audio tick and returns the active length.
    #[inline]
    pub fn advance(&mut self) -> i32 {
        let remaining = self.target - self.active;
        if remaining.unsigned_abs() <= self.increment.unsigned_abs() {
            self.active = self.target;
        } else {
            self.active += self.increment;
        }
        self.active
    }

    /// Current length without advancing.
    #[inline]
    pub fn active(&self) -> i32 {
        self.active
    }

    /// Length the ramp is heading toward.
    #[inline]
    pub fn target(&self) -> i32 {
        self.target
    }

    /// Signed per-tick step.
    #[inline]
    pub fn increment(&self) -> i32 {
        self.increment
    }

    /// True once the active length equals the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.active == self.target
    }

    /// Lower bound applied to every length.
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Upper bound applied to every length.
    pub fn max(&self) -> i32 {
        self.max
    }
}
