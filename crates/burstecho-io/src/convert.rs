//! Float ↔ fixed-point sample conversion.
//!
//! The engine works on signed integers at the converter's width: a 12-bit
//! converter gives samples in `-2048..=2047`. Feedback can push the engine's
//! output past full scale, so decoding saturates at ±1.0.

use crate::{Error, Result};

/// Converter width used by default.
pub const DEFAULT_BITS: u32 = 12;

/// Narrowest supported width.
pub const MIN_BITS: u32 = 2;

/// Widest supported width (exact in `f32`).
pub const MAX_BITS: u32 = 24;

/// Scale between `[-1.0, 1.0)` floats and `bits`-wide signed integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedScale {
    bits: u32,
}

impl FixedScale {
    /// 12-bit scale.
    pub const DEFAULT: Self = Self { bits: DEFAULT_BITS };

    /// Creates a scale for `bits`-wide samples.
    pub fn new(bits: u32) -> Result<Self> {
        if (MIN_BITS..=MAX_BITS).contains(&bits) {
            Ok(Self { bits })
        } else {
            Err(Error::UnsupportedBits(bits))
        }
    }

    /// Sample width.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Integer value of 1.0.
    pub const fn full_scale(&self) -> i32 {
        1 << (self.bits - 1)
    }

    /// Largest representable sample.
    pub const fn max(&self) -> i32 {
        self.full_scale() - 1
    }

    /// Smallest representable sample.
    pub const fn min(&self) -> i32 {
        -self.full_scale()
    }

    /// Rounds `sample` onto the integer grid, saturating at the ends.
    #[inline]
    pub fn to_fixed(&self, sample: f32) -> i32 {
        let scaled = (sample * self.full_scale() as f32).round();
        // NaN casts to 0.
        (scaled as i32).clamp(self.min(), self.max())
    }

    /// Converts back to a float, saturating at ±1.0.
    #[inline]
    pub fn to_float(&self, sample: i32) -> f32 {
        (sample as f32 / self.full_scale() as f32).clamp(-1.0, 1.0)
    }

    /// Converts a whole buffer to fixed point.
    pub fn encode(&self, samples: &[f32]) -> Vec<i32> {
        samples.iter().map(|&s| self.to_fixed(s)).collect()
    }

    /// Converts a whole buffer back to floats.
    pub fn decode(&self, samples: &[i32]) -> Vec<f32> {
        samples.iter().map(|&s| self.to_float(s)).collect()
    }

    /// Number of samples beyond full scale in either direction.
    pub fn count_clipped(&self, samples: &[i32]) -> usize {
        samples
            .iter()
            .filter(|&&s| s > self.max() || s < self.min())
            .count()
    }
}

impl Default for FixedScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_bit_range() {
        let scale = FixedScale::DEFAULT;
        assert_eq!(scale.full_scale(), 2048);
        assert_eq!(scale.to_fixed(0.5), 1024);
        assert_eq!(scale.to_fixed(-1.0), -2048);
        assert_eq!(scale.to_fixed(1.0), 2047);
        assert_eq!(scale.to_fixed(3.0), 2047);
        assert_eq!(scale.to_fixed(f32::NAN), 0);
    }

    #[test]
    fn decode_saturates() {
        let scale = FixedScale::DEFAULT;
        assert_eq!(scale.to_float(1024), 0.5);
        assert_eq!(scale.to_float(10_000), 1.0);
        assert_eq!(scale.to_float(-10_000), -1.0);
        assert_eq!(scale.count_clipped(&[0, 2047, 2048, -2049, -2048]), 2);
    }

    #[test]
    fn width_is_checked() {
        assert!(matches!(FixedScale::new(1), Err(Error::UnsupportedBits(1))));
        assert!(matches!(FixedScale::new(25), Err(Error::UnsupportedBits(25))));
        assert_eq!(FixedScale::new(16).unwrap().max(), 32767);
    }

    #[test]
    fn buffer_conversion_is_within_one_step() {
        let scale = FixedScale::new(16).unwrap();
        let input: Vec<f32> = (0..100).map(|i| (i as f32 / 50.0) - 1.0).collect();
        let output = scale.decode(&scale.encode(&input));
        let step = 1.0 / scale.full_scale() as f32;
        for (a, b) in input.iter().zip(&output) {
            assert!((a - b).abs() <= step, "{a} vs {b}");
        }
    }
}
