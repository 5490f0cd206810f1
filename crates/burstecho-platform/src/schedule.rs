//! Deterministic interrupt timeline for offline rendering.
//!
//! Stands in for the hardware timers when the module runs against a file:
//! transfer interrupts alternate half/complete, a slow conversion fires every
//! `control_divider` audio calls, and the main gate toggles with a fixed
//! period. The order within one audio call is always slow conversion, gate
//! edge, transfer.

use crate::events::{ControlFrame, InterruptEvent};

/// Audio calls between slow conversions by default.
pub const DEFAULT_CONTROL_DIVIDER: u32 = 16;

/// Infinite iterator of [`InterruptEvent`]s.
///
/// # Example
///
/// ```rust
/// use burstecho_platform::{ControlFrame, InterruptEvent, InterruptSchedule};
///
/// let events: Vec<_> = InterruptSchedule::new(ControlFrame::new(2048, 1000))
///     .with_control_divider(2)
///     .take(5)
///     .collect();
///
/// assert_eq!(events, [
///     InterruptEvent::SlowConversion(ControlFrame::new(2048, 1000)),
///     InterruptEvent::HalfTransfer,
///     InterruptEvent::TransferComplete,
///     InterruptEvent::SlowConversion(ControlFrame::new(2048, 1000)),
///     InterruptEvent::HalfTransfer,
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct InterruptSchedule {
    frame: ControlFrame,
    control_divider: u32,
    gate_period: Option<u32>,
    call: u64,
    stage: u8,
}

impl InterruptSchedule {
    /// Creates a schedule with fixed control readings and no gate.
    pub const fn new(frame: ControlFrame) -> Self {
        Self {
            frame,
            control_divider: DEFAULT_CONTROL_DIVIDER,
            gate_period: None,
            call: 0,
            stage: 0,
        }
    }

    /// Slow conversion every `divider` audio calls (at least 1).
    pub const fn with_control_divider(mut self, divider: u32) -> Self {
        self.control_divider = if divider == 0 { 1 } else { divider };
        self
    }

    /// Main gate rising every `period` audio calls and falling half way
    /// between. `None` or `Some(0)` disables the gate.
    pub const fn with_gate_period(mut self, period: Option<u32>) -> Self {
        self.gate_period = match period {
            Some(0) | None => None,
            Some(p) => Some(p),
        };
        self
    }

    /// Changes the readings reported by later slow conversions.
    pub fn set_frame(&mut self, frame: ControlFrame) {
        self.frame = frame;
    }

    /// Audio calls emitted so far.
    pub const fn calls(&self) -> u64 {
        self.call
    }

    /// Configured slow-conversion divider.
    pub const fn control_divider(&self) -> u32 {
        self.control_divider
    }

    /// Configured gate period.
    pub const fn gate_period(&self) -> Option<u32> {
        self.gate_period
    }

    fn gate_edge(&self) -> Option<InterruptEvent> {
        let period = u64::from(self.gate_period?);
        let phase = self.call % period;
        if phase == 0 {
            Some(InterruptEvent::MainRising)
        } else if period >= 2 && phase == period / 2 {
            Some(InterruptEvent::MainFalling)
        } else {
            None
        }
    }
}

impl Iterator for InterruptSchedule {
    type Item = InterruptEvent;

    fn next(&mut self) -> Option<InterruptEvent> {
        loop {
            let stage = self.stage;
            self.stage += 1;
            match stage {
                0 => {
                    if self.call % u64::from(self.control_divider) == 0 {
                        return Some(InterruptEvent::SlowConversion(self.frame));
                    }
                }
                1 => {
                    if let Some(edge) = self.gate_edge() {
                        return Some(edge);
                    }
                }
                _ => {
                    let transfer = if self.call % 2 == 0 {
                        InterruptEvent::HalfTransfer
                    } else {
                        InterruptEvent::TransferComplete
                    };
                    self.stage = 0;
                    self.call += 1;
                    return Some(transfer);
                }
            }
        }
    }
}
