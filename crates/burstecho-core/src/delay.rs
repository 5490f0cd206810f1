//! Circular delay line with 16.16 fractional readback.
//!
//! The buffer is a power-of-two ring of `i32` samples, so every index wraps
//! with a mask instead of a subtraction that could underflow. Reads happen
//! *before* the tick's write: a length of one sample returns the sample written
//! on the previous tick, and the slot under the write cursor (the oldest, about
//! to be overwritten) is never a read tap.
//!
//! # Interpolation
//!
//! The active length moves continuously under the ramp, so reads always
//! interpolate linearly between the two taps that bracket the fractional
//! length:
//!
//! ```text
//! out = a + ((b - a) * frac) >> 16     a = n samples back, b = n + 1 back
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::EngineError;
use crate::fixed::{FRAC_BITS, ONE, fraction, from_samples, whole_samples};

/// Default ring capacity in samples.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Largest supported capacity; keeps `capacity << 16` inside `i32`.
pub const MAX_CAPACITY: usize = 1 << 14;

/// Fixed-capacity ring buffer of fixed-point samples.
///
/// Allocated exactly once by [`DelayLineBuffer::new`]; no method reallocates.
///
/// # Example
///
/// ```rust
/// use burstecho_core::DelayLineBuffer;
/// use burstecho_core::fixed::from_samples;
///
/// let mut line = DelayLineBuffer::new(16).unwrap();
/// line.write(1000);
/// line.write(2000);
/// assert_eq!(line.read(from_samples(2)), 1000);
/// assert_eq!(line.read(from_samples(1)), 2000);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLineBuffer {
    buffer: Box<[i32]>,
    mask: usize,
    write: usize,
}

impl DelayLineBuffer {
    /// Reserves and zeroes a ring of `capacity` samples.
    ///
    /// `capacity` must be a power of two in `4..=MAX_CAPACITY`. A failed
    /// reservation is reported instead of aborting.
    pub fn new(capacity: usize) -> Result<Self, EngineError> {
        if !capacity.is_power_of_two() || !(4..=MAX_CAPACITY).contains(&capacity) {
            return Err(EngineError::InvalidCapacity(capacity));
        }

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| EngineError::Allocation { capacity })?;
        storage.resize(capacity, 0);

        Ok(Self {
            buffer: storage.into_boxed_slice(),
            mask: capacity - 1,
            write: 0,
        })
    }

    /// Capacity in samples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Slot the next write lands in.
    #[inline]
    pub fn write_cursor(&self) -> usize {
        self.write
    }

    /// Longest readable 16.16 length: both taps stay behind the cursor.
    #[inline]
    pub fn max_length(&self) -> i32 {
        from_samples(self.capacity() as i32 - 2)
    }

    /// Raw sample written `samples_back` ticks ago (`1` = previous write).
    #[inline]
    pub fn tap(&self, samples_back: usize) -> i32 {
        let index = (self.write + self.capacity() - (samples_back & self.mask)) & self.mask;
        self.buffer[index]
    }

    /// Interpolated read `length` (16.16) behind the write cursor.
    ///
    /// `length` is clamped to `[1 sample, max_length]`.
    #[inline]
    pub fn read(&self, length: i32) -> i32 {
        let length = length.clamp(ONE, self.max_length());
        let whole = whole_samples(length) as usize;
        let frac = i64::from(fraction(length));

        let a = i64::from(self.tap(whole));
        let b = i64::from(self.tap(whole + 1));
        (a + (((b - a) * frac) >> FRAC_BITS)) as i32
    }

    /// Fractional read position (16.16 slot index) for `length`.
    #[inline]
    pub fn read_position(&self, length: i32) -> i32 {
        let length = length.clamp(ONE, self.max_length());
        let span = from_samples(self.capacity() as i32);
        (from_samples(self.write as i32) - length).rem_euclid(span)
    }

    /// Stores `sample` at the cursor and advances it.
    #[inline]
    pub fn write(&mut self, sample: i32) {
        self.buffer[self.write] = sample;
        self.write = (self.write + 1) & self.mask;
    }

    /// Zeroes the ring and rewinds the cursor.
    pub fn clear(&mut self) {
        self.buffer.fill(0);
        self.write = 0;
    }
}
