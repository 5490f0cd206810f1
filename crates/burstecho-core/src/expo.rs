//! Exponential control mapping.
//!
//! The time control behaves like a 1V/oct input: every [`STEPS_PER_OCTAVE`]
//! converter codes double the delay length. [`expo`] evaluates `2^(x / 384)`
//! in 16.16 without tables or floats: the whole octave is a left shift and the
//! fractional octave is a third-order polynomial, the same minimax fit the
//! float `fast_exp2` approximations use, rescaled to 16-bit coefficients.
//!
//! [`ExpoMapper`] wraps the curve with the control conditioning that runs on
//! the slow tick: combine CV and knob, saturate to 12 bits, invert so that
//! turning the control up shortens the delay, then scale by the time constant.

use crate::fixed::{CONTROL_BITS, CONTROL_MAX, CV_CENTER, FRAC_BITS, ONE, fix16_mul, usat};

/// Converter codes per doubling of the output.
pub const STEPS_PER_OCTAVE: i32 = 384;

/// Default time scale applied to the curve (≈ 2.44 in 16.16).
pub const DEFAULT_TIME_SCALE: i32 = 160_000;

// 2^f ≈ 1 + f·(C1 + f·(C2 + f·C3)) for f in [0, 1), coefficients in 16.16.
const C1: i64 = 45_426;
const C2: i64 = 15_744;
const C3: i64 = 3_637;

/// Exponential transfer curve: `2^(x / 384)` in 16.16.
///
/// The input is saturated to 12 bits first, so the curve is never evaluated
/// outside its domain. Strictly increasing over `0..=4095`.
///
/// ```rust
/// use burstecho_core::expo::expo;
/// use burstecho_core::fixed::ONE;
///
/// assert_eq!(expo(0), ONE);
/// assert_eq!(expo(384), 2 * ONE);
/// assert!(expo(4095) > expo(4094));
/// ```
#[inline]
pub const fn expo(x: i32) -> i32 {
    let x = usat(x, CONTROL_BITS);
    let octave = x / STEPS_PER_OCTAVE;
    let step = x % STEPS_PER_OCTAVE;

    let f = (step as i64 * ONE as i64) / STEPS_PER_OCTAVE as i64;
    let mut poly = (C3 * f) >> FRAC_BITS;
    poly = ((poly + C2) * f) >> FRAC_BITS;
    poly = ((poly + C1) * f) >> FRAC_BITS;

    ((ONE as i64 + poly) << octave) as i32
}

/// Combines the CV and knob readings into the inverted curve input.
///
/// `cv` is bipolar around [`CV_CENTER`]; the sum is saturated to 12 bits and
/// inverted (`4095 − value`).
#[inline]
pub const fn curve_input(cv: i32, knob: i32) -> i32 {
    let combined = cv.saturating_sub(CV_CENTER).saturating_add(knob);
    CONTROL_MAX - usat(combined, CONTROL_BITS)
}

/// Maps raw control readings to a target delay length.
///
/// # Example
///
/// ```rust
/// use burstecho_core::ExpoMapper;
///
/// let mapper = ExpoMapper::default();
/// // Knob fully up, CV centered: shortest delay.
/// let short = mapper.map(2048, 4095);
/// // Knob fully down: longest delay.
/// let long = mapper.map(2048, 0);
/// assert!(short < long);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpoMapper {
    time_scale: i32,
}

impl ExpoMapper {
    /// Creates a mapper with the given 16.16 time scale.
    pub const fn new(time_scale: i32) -> Self {
        Self { time_scale }
    }

    /// Returns the 16.16 time scale.
    pub const fn time_scale(&self) -> i32 {
        self.time_scale
    }

    /// Maps an already-inverted 12-bit curve input to a 16.16 delay length.
    #[inline]
    pub const fn map_input(&self, x: i32) -> i32 {
        fix16_mul(expo(x), self.time_scale)
    }

    /// Maps CV and knob readings to a 16.16 delay length.
    #[inline]
    pub const fn map(&self, cv: i32, knob: i32) -> i32 {
        self.map_input(curve_input(cv, knob))
    }

    /// Shortest length this mapper can produce.
    pub const fn min_length(&self) -> i32 {
        self.map_input(0)
    }

    /// Longest length this mapper can produce.
    pub const fn max_length(&self) -> i32 {
        self.map_input(CONTROL_MAX)
    }
}

impl Default for ExpoMapper {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::whole_samples;

    #[test]
    fn octaves_are_exact() {
        for octave in 0..10 {
            assert_eq!(expo(octave * STEPS_PER_OCTAVE), ONE << octave);
        }
    }

    #[test]
    fn half_octave_is_close_to_sqrt2() {
        let ratio = expo(STEPS_PER_OCTAVE / 2) as f32 / ONE as f32;
        assert!((ratio - core::f32::consts::SQRT_2).abs() < 0.01, "got {ratio}");
    }

    #[test]
    fn strictly_increasing() {
        let mut previous = expo(0);
        for x in 1..=CONTROL_MAX {
            let current = expo(x);
            assert!(current > previous, "expo({x}) = {current} <= {previous}");
            previous = current;
        }
    }

    #[test]
    fn out_of_domain_input_saturates() {
        assert_eq!(expo(-100), expo(0));
        assert_eq!(expo(10_000), expo(CONTROL_MAX));
    }

    #[test]
    fn curve_input_inverts_and_saturates() {
        assert_eq!(curve_input(CV_CENTER, 0), CONTROL_MAX);
        assert_eq!(curve_input(CV_CENTER, CONTROL_MAX), 0);
        assert_eq!(curve_input(0, 0), CONTROL_MAX);
        assert_eq!(curve_input(4095, 4095), 0);
        assert_eq!(curve_input(CV_CENTER + 100, 1000), CONTROL_MAX - 1100);
    }

    #[test]
    fn default_range_fits_in_buffer() {
        let mapper = ExpoMapper::default();
        assert_eq!(mapper.min_length(), DEFAULT_TIME_SCALE);
        let longest = whole_samples(mapper.max_length());
        assert!((3900..4094).contains(&longest), "longest = {longest}");
    }
}
