//! Burstecho Platform - interrupt and panel boundary for the delay engine
//!
//! This crate sits between the hardware callbacks and
//! [`burstecho_core::DelayEngine`]: it turns interrupts into engine calls,
//! owns the DMA double buffer, and routes touch gestures to mode changes.
//!
//! # Core Abstractions
//!
//! ## Dispatch
//!
//! - [`InterruptEvent`] - Every hardware callback as one enum variant
//! - [`DelayModule`] - Engine + double buffer + router behind one `handle`
//! - [`DoubleBuffer`] - Held input sample and `2 * BLOCK` output slots
//!
//! ## Touch UI
//!
//! - [`TouchEvent`] - Tagged gesture `{ kind, target }`
//! - [`UiRouter`] - Fixed-capacity `(menu, gesture, sensor) → action` table
//! - [`TouchSense`] / [`EventQueue`] - Closure registration with the sensing
//!   collaborator and a lock-free hand-off queue
//!
//! ## Offline driving
//!
//! - [`InterruptSchedule`] - Deterministic interrupt timeline for rendering
//!   files and for tests
//!
//! # Default panel bindings
//!
//! | Gesture | Sensor | Action |
//! |---------|--------|--------|
//! | Tap | Button 1 | Toggle delay modulation |
//! | Tap | Button 4 | Toggle feedback modulation |
//! | Tap | Aux 1 | Manual burst |
//! | Hold | Button 1 | Delay modulation off |
//! | Hold | Button 4 | Feedback modulation off |
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! burstecho-platform = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod buffer;
pub mod events;
pub mod module;
pub mod router;
pub mod schedule;
pub mod touch;

// Re-export main types at crate root
pub use buffer::DoubleBuffer;
pub use events::{
    ControlFrame, GestureKind, InterruptEvent, MenuState, SensorId, TouchEvent, UiAction,
};
pub use module::{DelayModule, ROUTER_CAPACITY, TOUCH_QUEUE_CAPACITY, TouchQueue};
pub use router::{Binding, DEFAULT_BINDINGS, UiRouter};
pub use schedule::{DEFAULT_CONTROL_DIVIDER, InterruptSchedule};
pub use touch::{EventQueue, TouchCallback, TouchSense};
