//! Burstecho Core - fixed-point burst delay engine
//!
//! This crate is the signal-processing core of a trigger-modulated delay: a
//! circular delay line read back at a slewed, interpolated length, optional
//! feedback, and a pseudo-random burst generator opened by an external gate.
//! Everything runs in 16.16 fixed point, with constant-time work per sample
//! and no allocation after construction.
//!
//! # Core Abstractions
//!
//! ## Control path (slow tick)
//!
//! - [`ExpoMapper`] - CV + knob → saturated, inverted, exponential target length
//! - [`expo`] - `2^(x/384)` in 16.16, strictly increasing over 12 bits
//!
//! ## Audio path (fast tick)
//!
//! - [`DelayRamp`] - Overshoot-free slew of the active length toward the target
//! - [`DelayLineBuffer`] - Power-of-two ring with linear fractional readback
//! - [`BurstGenerator`] / [`Lfsr12`] - Gate-opened window of register-driven modulation
//! - [`DelayEngine`] - The sample processor composing all of the above
//!
//! ## Interrupt hand-off
//!
//! - [`ControlPort`] - Atomics shared between the control tick, gate
//!   interrupt and audio interrupt
//!
//! # Fixed-point conventions
//!
//! | Quantity | Format | Notes |
//! |----------|--------|-------|
//! | Delay length | 16.16 samples | `65536` = one sample |
//! | Gain | 16.16 ratio | `32768` = 0.5 |
//! | Controls | 12-bit | saturated before mapping |
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc` for the one-time buffer
//! allocation). Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! burstecho-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use burstecho_core::{DelayEngine, EngineConfig};
//!
//! let mut engine = DelayEngine::new(EngineConfig::DEFAULT)?;
//! let mut dac = [0i32; 2];
//!
//! // Slow tick: CV centered, knob at three quarters.
//! engine.control_tick(2048, 3072);
//!
//! // Gate interrupt.
//! engine.gate_rising();
//!
//! // Half-transfer and transfer-complete interrupts.
//! engine.process(1200, &mut dac, 0);
//! engine.process(1300, &mut dac, 1);
//! # Ok::<(), burstecho_core::EngineError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod burst;
pub mod config;
pub mod delay;
pub mod engine;
pub mod error;
pub mod expo;
pub mod fixed;
pub mod port;
pub mod ramp;

// Re-export main types at crate root
pub use burst::{BurstGenerator, LFSR_MASK, Lfsr12, delay_offset, modulated_gain};
pub use config::{DEFAULT_BLOCK_SIZE, DEFAULT_FEEDBACK_GAIN, EngineConfig};
pub use delay::{DEFAULT_CAPACITY, DelayLineBuffer, MAX_CAPACITY};
pub use engine::DelayEngine;
pub use error::EngineError;
pub use expo::{DEFAULT_TIME_SCALE, ExpoMapper, STEPS_PER_OCTAVE, curve_input, expo};
pub use fixed::{FRAC_BITS, ONE, fix16_mul};
pub use port::ControlPort;
pub use ramp::{DelayRamp, MIN_LENGTH, RAMP_STEPS};
