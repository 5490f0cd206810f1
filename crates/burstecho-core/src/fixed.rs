//! 16.16 fixed-point helpers shared by every engine stage.
//!
//! Delay lengths, gains and the exponential curve all use the same convention:
//! a signed 32-bit integer with 16 fractional bits. Multiplies widen to 64 bits
//! and truncate on the way back (arithmetic shift), so results round toward
//! negative infinity exactly like the hardware fixed-point routines.
//!
//! | Quantity | Representation | Example |
//! |----------|----------------|---------|
//! | Delay length | samples · 65536 | `65536` = 1 sample |
//! | Feedback gain | ratio · 65536 | `32768` = 0.5 |
//! | Control input | 12-bit unsigned | `0..=4095` |

/// Number of fractional bits in a 16.16 value.
pub const FRAC_BITS: u32 = 16;

/// Unity in 16.16.
pub const ONE: i32 = 1 << FRAC_BITS;

/// Mask selecting the fractional part of a 16.16 value.
pub const FRAC_MASK: i32 = ONE - 1;

/// Width of the control converters.
pub const CONTROL_BITS: u32 = 12;

/// Largest 12-bit control value.
pub const CONTROL_MAX: i32 = (1 << CONTROL_BITS) - 1;

/// Midpoint of a bipolar control-voltage input.
pub const CV_CENTER: i32 = 1 << (CONTROL_BITS - 1);

/// Multiplies two 16.16 values, truncating the fractional remainder.
///
/// The 64-bit product is saturated to `i32` so a large sample times a gain
/// can never wrap.
///
/// # Example
///
/// ```rust
/// use burstecho_core::fixed::{fix16_mul, ONE};
///
/// assert_eq!(fix16_mul(ONE, ONE), ONE);
/// assert_eq!(fix16_mul(10_000, ONE / 2), 5_000);
/// assert_eq!(fix16_mul(-3, ONE / 2), -2); // truncates toward -inf
/// ```
#[inline]
pub const fn fix16_mul(a: i32, b: i32) -> i32 {
    saturate_i32((a as i64 * b as i64) >> FRAC_BITS)
}

/// Clamps a 64-bit intermediate into the `i32` range.
#[inline]
pub const fn saturate_i32(value: i64) -> i32 {
    if value > i32::MAX as i64 {
        i32::MAX
    } else if value < i32::MIN as i64 {
        i32::MIN
    } else {
        value as i32
    }
}

/// Unsigned saturation to `bits` bits, the integer equivalent of `USAT`.
///
/// ```rust
/// use burstecho_core::fixed::usat;
///
/// assert_eq!(usat(-5, 12), 0);
/// assert_eq!(usat(5000, 12), 4095);
/// assert_eq!(usat(1234, 12), 1234);
/// ```
#[inline]
pub const fn usat(value: i32, bits: u32) -> i32 {
    let max = (1 << bits) - 1;
    if value < 0 {
        0
    } else if value > max {
        max
    } else {
        value
    }
}

/// Converts a whole number of samples to a 16.16 length.
#[inline]
pub const fn from_samples(samples: i32) -> i32 {
    samples << FRAC_BITS
}

/// Integer part of a 16.16 length, in samples.
#[inline]
pub const fn whole_samples(length: i32) -> i32 {
    length >> FRAC_BITS
}

/// Fractional part of a 16.16 length.
#[inline]
pub const fn fraction(length: i32) -> i32 {
    length & FRAC_MASK
}

/// Converts a 16.16 length to floating-point samples (display only).
#[inline]
pub fn to_samples_f32(length: i32) -> f32 {
    length as f32 / ONE as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_truncates_toward_negative_infinity() {
        assert_eq!(fix16_mul(3, ONE / 2), 1);
        assert_eq!(fix16_mul(-3, ONE / 2), -2);
        assert_eq!(fix16_mul(0, i32::MAX), 0);
    }

    #[test]
    fn mul_saturates() {
        assert_eq!(fix16_mul(i32::MAX, i32::MAX), i32::MAX);
        assert_eq!(fix16_mul(i32::MIN, i32::MAX), i32::MIN);
    }

    #[test]
    fn usat_clamps_both_ends() {
        assert_eq!(usat(i32::MIN, CONTROL_BITS), 0);
        assert_eq!(usat(i32::MAX, CONTROL_BITS), CONTROL_MAX);
        assert_eq!(usat(CV_CENTER, CONTROL_BITS), 2048);
    }

    #[test]
    fn length_split() {
        let length = from_samples(7) + ONE / 4;
        assert_eq!(whole_samples(length), 7);
        assert_eq!(fraction(length), ONE / 4);
        assert!((to_samples_f32(length) - 7.25).abs() < 1e-6);
    }
}
