//! Trigger-gated pseudo-random modulation.
//!
//! A rising edge on the main gate opens a burst window lasting as many audio
//! ticks as the current delay length has whole samples. While the window is
//! open every tick advances a 12-bit shift-and-xor register; the engine turns
//! the register value into a read-position offset and/or a feedback boost.
//!
//! # Register
//!
//! Three left shift-xor stages run on a 32-bit word, then the result is masked
//! to 12 bits. The map is linear and invertible over GF(2), so a nonzero seed
//! never reaches zero. Because every shift is to the left, only the `<< 5`
//! stage reaches the low 12 bits and the orbit of seed 1 is short:
//! `1 → 33 → 1025 → 1057 → 1`.

use crate::fixed::{ONE, whole_samples};

/// Mask applied after each register advance.
pub const LFSR_MASK: u32 = 0x0FFF;

/// Bits of the register value.
pub const LFSR_BITS: u32 = 12;

/// 12-bit shift-and-xor pseudo-random register.
///
/// # Example
///
/// ```rust
/// use burstecho_core::Lfsr12;
///
/// let mut lfsr = Lfsr12::new();
/// assert_eq!(lfsr.advance(), 33);
/// assert_eq!(lfsr.advance(), 1025);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lfsr12 {
    state: u32,
}

impl Lfsr12 {
    /// Power-on seed.
    pub const SEED: u32 = 1;

    /// Creates a register holding [`Self::SEED`].
    pub const fn new() -> Self {
        Self { state: Self::SEED }
    }

    /// Creates a register from `seed`, masked to 12 bits; zero becomes 1.
    pub const fn with_seed(seed: u32) -> Self {
        let state = seed & LFSR_MASK;
        Self {
            state: if state == 0 { Self::SEED } else { state },
        }
    }

    /// Advances one step and returns the new value.
    #[inline]
    pub fn advance(&mut self) -> u32 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s << 17;
        s ^= s << 5;
        self.state = s & LFSR_MASK;
        self.state
    }

    /// Current value without advancing.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.state
    }
}

impl Default for Lfsr12 {
    fn default() -> Self {
        Self::new()
    }
}

/// Burst window countdown plus its register.
#[derive(Debug, Clone, Default)]
pub struct BurstGenerator {
    lfsr: Lfsr12,
    countdown: u32,
}

impl BurstGenerator {
    /// Creates an idle generator with a power-on register.
    pub const fn new() -> Self {
        Self {
            lfsr: Lfsr12::new(),
            countdown: 0,
        }
    }

    /// Opens a window of `length >> 16` ticks.
    ///
    /// A trigger during an open window restarts the countdown.
    pub fn trigger(&mut self, length: i32) -> u32 {
        self.countdown = whole_samples(length.max(0)) as u32;
        self.countdown
    }

    /// Steps the window. Returns the fresh register value while it is open.
    #[inline]
    pub fn step(&mut self) -> Option<u32> {
        if self.countdown == 0 {
            return None;
        }
        self.countdown -= 1;
        Some(self.lfsr.advance())
    }

    /// Closes the window immediately.
    pub fn cancel(&mut self) {
        self.countdown = 0;
    }

    /// True while ticks remain in the window.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.countdown > 0
    }

    /// Ticks left in the window.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.countdown
    }

    /// The generator's register.
    pub fn lfsr(&self) -> &Lfsr12 {
        &self.lfsr
    }
}

/// Read-length offset for register value `r`: `r << shift` in 16.16.
///
/// With the default shift of 8 the offset stays under 16 samples.
#[inline]
pub const fn delay_offset(r: u32, shift: u32) -> i32 {
    ((r & LFSR_MASK) << shift) as i32
}

/// Feedback gain raised toward unity by register value `r`.
///
/// Adds `r / 4096` of the headroom above `gain`, so the result stays strictly
/// below unity for any `gain < ONE`.
#[inline]
pub const fn modulated_gain(gain: i32, r: u32) -> i32 {
    let headroom = (ONE - gain) as i64;
    gain + ((((r & LFSR_MASK) as i64) * headroom) >> LFSR_BITS) as i32
}

/// Largest offset [`delay_offset`] can produce for `shift`.
pub const fn max_delay_offset(shift: u32) -> i32 {
    delay_offset(LFSR_MASK, shift)
}
