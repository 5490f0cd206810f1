//! Lock-free hand-off between interrupt priorities.
//!
//! The audio interrupt can preempt the control tick and the gate interrupt, so
//! the values they share live in single-word atomics. Each field is
//! independent; nothing needs to be observed together, so there is no lock and
//! no multi-field snapshot.
//!
//! ```text
//!  slow tick ──publish_controls──┐
//!  gate edge ──request_burst─────┤  ControlPort  ──DelayEngine::sync──> audio tick
//!  UI        ──set_*_mod─────────┘
//! ```

use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use crate::config::EngineConfig;
use crate::expo::ExpoMapper;

/// Shared scalars written by slower contexts and pulled by the audio tick.
///
/// Safe to place in a `static` and share by reference.
///
/// # Example
///
/// ```rust
/// use burstecho_core::{ControlPort, DelayEngine, EngineConfig};
///
/// let port = ControlPort::new(&EngineConfig::DEFAULT);
/// let mut engine = DelayEngine::new(EngineConfig::DEFAULT).unwrap();
///
/// port.publish_controls(2048, 1000); // slow tick
/// port.request_burst();              // gate rising edge
///
/// engine.sync(&port);                // start of the audio call
/// assert_eq!(engine.target_length(), port.target());
/// ```
#[derive(Debug)]
pub struct ControlPort {
    mapper: ExpoMapper,
    target: AtomicI32,
    target_fresh: AtomicBool,
    feedback_mod: AtomicBool,
    delay_mod: AtomicBool,
    burst_request: AtomicBool,
}

impl ControlPort {
    /// Creates a port mirroring `config`'s power-on flags.
    pub const fn new(config: &EngineConfig) -> Self {
        Self {
            mapper: ExpoMapper::new(config.time_scale),
            target: AtomicI32::new(config.initial_length),
            target_fresh: AtomicBool::new(false),
            feedback_mod: AtomicBool::new(config.feedback_mod),
            delay_mod: AtomicBool::new(config.delay_mod),
            burst_request: AtomicBool::new(false),
        }
    }

    /// Maps raw control readings and publishes the resulting target.
    pub fn publish_controls(&self, cv: i32, knob: i32) -> i32 {
        let target = self.mapper.map(cv, knob);
        self.publish_target(target);
        target
    }

    /// Publishes a 16.16 target length directly.
    pub fn publish_target(&self, target: i32) {
        self.target.store(target, Ordering::Relaxed);
        self.target_fresh.store(true, Ordering::Release);
    }

    /// Last published target.
    pub fn target(&self) -> i32 {
        self.target.load(Ordering::Relaxed)
    }

    /// Enables or disables feedback modulation.
    pub fn set_feedback_mod(&self, enabled: bool) {
        self.feedback_mod.store(enabled, Ordering::Relaxed);
    }

    /// Enables or disables delay modulation.
    pub fn set_delay_mod(&self, enabled: bool) {
        self.delay_mod.store(enabled, Ordering::Relaxed);
    }

    /// Flips feedback modulation and returns the new state.
    pub fn toggle_feedback_mod(&self) -> bool {
        !self.feedback_mod.fetch_xor(true, Ordering::Relaxed)
    }

    /// Flips delay modulation and returns the new state.
    pub fn toggle_delay_mod(&self) -> bool {
        !self.delay_mod.fetch_xor(true, Ordering::Relaxed)
    }

    /// Current feedback modulation flag.
    pub fn feedback_mod(&self) -> bool {
        self.feedback_mod.load(Ordering::Relaxed)
    }

    /// Current delay modulation flag.
    pub fn delay_mod(&self) -> bool {
        self.delay_mod.load(Ordering::Relaxed)
    }

    /// Records a main-gate rising edge for the next audio call.
    pub fn request_burst(&self) {
        self.burst_request.store(true, Ordering::Release);
    }

    /// Drops a published target and a burst request that no audio call has
    /// pulled yet. The mode flags are kept.
    pub fn clear_pending(&self) {
        self.target_fresh.store(false, Ordering::Release);
        self.burst_request.store(false, Ordering::Release);
    }

    pub(crate) fn take_target(&self) -> Option<i32> {
        if self.target_fresh.swap(false, Ordering::Acquire) {
            Some(self.target.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    pub(crate) fn take_burst_request(&self) -> bool {
        self.burst_request.swap(false, Ordering::Acquire)
    }
}

impl Default for ControlPort {
    fn default() -> Self {
        Self::new(&EngineConfig::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_is_taken_once() {
        let port = ControlPort::default();
        assert_eq!(port.take_target(), None);
        let target = port.publish_controls(2048, 0);
        assert_eq!(port.take_target(), Some(target));
        assert_eq!(port.take_target(), None);
        assert_eq!(port.target(), target);
    }

    #[test]
    fn burst_request_is_edge_like() {
        let port = ControlPort::default();
        assert!(!port.take_burst_request());
        port.request_burst();
        port.request_burst();
        assert!(port.take_burst_request());
        assert!(!port.take_burst_request());
    }

    #[test]
    fn clear_pending_keeps_flags() {
        let port = ControlPort::default();
        port.publish_controls(2048, 2048);
        port.request_burst();
        port.set_feedback_mod(true);
        port.clear_pending();
        assert_eq!(port.take_target(), None);
        assert!(!port.take_burst_request());
        assert!(port.feedback_mod());
    }

    #[test]
    fn toggles_report_new_state() {
        let port = ControlPort::default();
        assert!(!port.feedback_mod());
        assert!(port.toggle_feedback_mod());
        assert!(port.feedback_mod());
        assert!(!port.toggle_delay_mod());
        assert!(!port.delay_mod());
    }
}
