//! The sample processor: ramp, burst, delay line and feedback composed into
//! one constant-time tick.
//!
//! # Tick order
//!
//! 1. advance the ramp toward the target length
//! 2. step the burst window (advances the register while open)
//! 3. read the delay line, offset by the register when delay modulation is on
//! 4. write the input, plus scaled feedback when feedback modulation is on
//!
//! The read happens before the write, so a length of `N` whole samples returns
//! exactly the input from `N` ticks earlier.

use crate::burst::{BurstGenerator, delay_offset, modulated_gain};
use crate::config::EngineConfig;
use crate::delay::DelayLineBuffer;
use crate::error::EngineError;
use crate::expo::ExpoMapper;
use crate::fixed::fix16_mul;
use crate::port::ControlPort;
use crate::ramp::{DelayRamp, MIN_LENGTH};

/// Fixed-point delay engine with burst modulation.
///
/// Owns its delay buffer; every method after [`DelayEngine::new`] is
/// allocation-free and bounded by the configured block size.
///
/// # Example
///
/// ```rust
/// use burstecho_core::{DelayEngine, EngineConfig};
/// use burstecho_core::fixed::from_samples;
///
/// let mut engine = DelayEngine::new(EngineConfig {
///     delay_mod: false,
///     ..EngineConfig::DEFAULT
/// })
/// .unwrap();
/// engine.set_length_immediate(from_samples(2));
///
/// let out: Vec<i32> = [1000, 2000, 3000].iter().map(|&s| engine.tick(s)).collect();
/// assert_eq!(out, [0, 0, 1000]);
/// ```
#[derive(Debug, Clone)]
pub struct DelayEngine {
    line: DelayLineBuffer,
    ramp: DelayRamp,
    burst: BurstGenerator,
    mapper: ExpoMapper,
    feedback_gain: i32,
    burst_delay_shift: u32,
    feedback_mod: bool,
    delay_mod: bool,
    block_size: usize,
    initial_length: i32,
    requested_target: i32,
    last_read_position: i32,
    last_sample: i32,
}

impl DelayEngine {
    /// Validates `config` and allocates the delay buffer.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let line = DelayLineBuffer::new(config.capacity)?;
        let ramp = DelayRamp::new(config.initial_length, MIN_LENGTH, line.max_length());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            capacity = config.capacity,
            block_size = config.block_size,
            feedback_gain = config.feedback_gain,
            "delay engine allocated"
        );

        Ok(Self {
            line,
            initial_length: ramp.active(),
            ramp,
            burst: BurstGenerator::new(),
            mapper: ExpoMapper::new(config.time_scale),
            feedback_gain: config.feedback_gain,
            burst_delay_shift: config.burst_delay_shift,
            feedback_mod: config.feedback_mod,
            delay_mod: config.delay_mod,
            block_size: config.block_size,
            requested_target: 0,
            last_read_position: 0,
            last_sample: 0,
        })
    }

    /// Slow control tick: maps CV and knob to a new target length.
    ///
    /// Returns the target after clamping to the buffer.
    pub fn control_tick(&mut self, cv: i32, knob: i32) -> i32 {
        self.set_target(self.mapper.map(cv, knob));
        self.ramp.target()
    }

    /// Sets the 16.16 target length; the ramp slews toward it, clamped to
    /// the buffer.
    pub fn set_target(&mut self, length: i32) {
        self.requested_target = length;
        self.ramp.set_target(length);
    }

    /// Sets the active length with no slew.
    pub fn set_length_immediate(&mut self, length: i32) {
        self.requested_target = length;
        self.ramp.set_immediate(length);
    }

    /// Main gate rising edge: opens a burst window of `active >> 16` ticks.
    pub fn gate_rising(&mut self) -> u32 {
        let ticks = self.burst.trigger(self.ramp.active());

        #[cfg(feature = "tracing")]
        tracing::trace!(ticks, "burst window opened");

        ticks
    }

    /// Main gate falling edge. Consumed elsewhere; the engine ignores it.
    pub fn gate_falling(&mut self) {}

    /// Enables or disables feedback modulation.
    pub fn set_feedback_mod(&mut self, enabled: bool) {
        if self.feedback_mod != enabled {
            #[cfg(feature = "tracing")]
            tracing::debug!(enabled, "feedback modulation");
        }
        self.feedback_mod = enabled;
    }

    /// Enables or disables delay modulation.
    pub fn set_delay_mod(&mut self, enabled: bool) {
        if self.delay_mod != enabled {
            #[cfg(feature = "tracing")]
            tracing::debug!(enabled, "delay modulation");
        }
        self.delay_mod = enabled;
    }

    /// Pulls whatever slower contexts published since the last call.
    #[inline]
    pub fn sync(&mut self, port: &ControlPort) {
        if let Some(target) = port.take_target() {
            self.set_target(target);
        }
        self.set_feedback_mod(port.feedback_mod());
        self.set_delay_mod(port.delay_mod());
        if port.take_burst_request() {
            self.gate_rising();
        }
    }

    /// Runs one audio tick and returns the delayed sample.
    #[inline]
    pub fn tick(&mut self, input: i32) -> i32 {
        let length = self.ramp.advance();
        let burst = self.burst.step();

        let read_length = match burst {
            Some(r) if self.delay_mod => length
                .saturating_add(delay_offset(r, self.burst_delay_shift))
                .min(self.line.max_length()),
            _ => length,
        };

        let delayed = self.line.read(read_length);
        self.last_read_position = self.line.read_position(read_length);

        let written = if self.feedback_mod {
            let gain = match burst {
                Some(r) => modulated_gain(self.feedback_gain, r),
                None => self.feedback_gain,
            };
            input.saturating_add(fix16_mul(delayed, gain))
        } else {
            input
        };
        self.line.write(written);

        self.last_sample = delayed;
        delayed
    }

    /// Buffer-swap entry point.
    ///
    /// Runs `block_size` ticks on the held `input` sample and writes them to
    /// `output[write_position..write_position + block_size]`. A slice that
    /// does not fit is skipped, but the ticks still run so timing is kept.
    #[inline]
    pub fn process(&mut self, input: i32, output: &mut [i32], write_position: usize) {
        let end = write_position.saturating_add(self.block_size);
        if let Some(slots) = output.get_mut(write_position..end) {
            for slot in slots {
                *slot = self.tick(input);
            }
        } else {
            for _ in 0..self.block_size {
                self.tick(input);
            }
        }
    }

    /// Clears the buffer, closes any burst window and returns to the
    /// power-on length.
    pub fn reset(&mut self) {
        self.line.clear();
        self.burst.cancel();
        self.ramp.set_immediate(self.initial_length);
        self.requested_target = 0;
        self.last_read_position = 0;
        self.last_sample = 0;
    }

    /// Active 16.16 delay length.
    #[inline]
    pub fn active_length(&self) -> i32 {
        self.ramp.active()
    }

    /// Last requested 16.16 target, as given. Zero until the first control
    /// tick.
    #[inline]
    pub fn target_length(&self) -> i32 {
        self.requested_target
    }

    /// Target the ramp is heading for: [`Self::target_length`] clamped to
    /// `[MIN_LENGTH, max_length]`, or the initial length before any request.
    #[inline]
    pub fn effective_target(&self) -> i32 {
        self.ramp.target()
    }

    /// Signed per-tick ramp step.
    pub fn ramp_increment(&self) -> i32 {
        self.ramp.increment()
    }

    /// 16.16 slot the last tick read from.
    pub fn last_read_position(&self) -> i32 {
        self.last_read_position
    }

    /// Output of the last tick.
    pub fn last_sample(&self) -> i32 {
        self.last_sample
    }

    /// Ticks left in the burst window.
    pub fn burst_remaining(&self) -> u32 {
        self.burst.remaining()
    }

    /// True while a burst window is open.
    pub fn is_bursting(&self) -> bool {
        self.burst.is_active()
    }

    /// Current register value.
    pub fn lfsr_value(&self) -> u32 {
        self.burst.lfsr().value()
    }

    /// Feedback modulation flag.
    pub fn feedback_mod(&self) -> bool {
        self.feedback_mod
    }

    /// Delay modulation flag.
    pub fn delay_mod(&self) -> bool {
        self.delay_mod
    }

    /// Base feedback gain in 16.16.
    pub fn feedback_gain(&self) -> i32 {
        self.feedback_gain
    }

    /// Samples per processor call.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Delay buffer capacity in samples.
    pub fn capacity(&self) -> usize {
        self.line.capacity()
    }

    /// Longest 16.16 length the buffer allows.
    pub fn max_length(&self) -> i32 {
        self.line.max_length()
    }

    /// The mapper used by [`DelayEngine::control_tick`].
    pub fn mapper(&self) -> &ExpoMapper {
        &self.mapper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{ONE, from_samples};
    use crate::ramp::RAMP_STEPS;

    fn plain_engine() -> DelayEngine {
        DelayEngine::new(EngineConfig {
            delay_mod: false,
            feedback_mod: false,
            ..EngineConfig::DEFAULT
        })
        .unwrap()
    }

    #[test]
    fn power_on_state() {
        let engine = DelayEngine::new(EngineConfig::DEFAULT).unwrap();
        assert_eq!(engine.active_length(), ONE);
        assert_eq!(engine.target_length(), 0);
        assert_eq!(engine.effective_target(), ONE);
        assert_eq!(engine.lfsr_value(), 1);
        assert!(!engine.is_bursting());
        assert!(engine.delay_mod());
        assert!(!engine.feedback_mod());
        assert_eq!(engine.capacity(), 4096);
    }

    #[test]
    fn rejects_invalid_config() {
        let err = DelayEngine::new(EngineConfig {
            block_size: 0,
            ..EngineConfig::DEFAULT
        })
        .unwrap_err();
        assert_eq!(err, EngineError::InvalidBlockSize);
    }

    #[test]
    fn two_sample_scenario() {
        let mut engine = plain_engine();
        engine.set_length_immediate(from_samples(2));
        assert_eq!(engine.tick(1000), 0);
        assert_eq!(engine.tick(2000), 0);
        assert_eq!(engine.tick(3000), 1000);
        assert_eq!(engine.tick(0), 2000);
        assert_eq!(engine.tick(0), 3000);
    }

    #[test]
    fn control_tick_ramps_active_length() {
        let mut engine = plain_engine();
        let target = engine.control_tick(2048, 0);
        assert_eq!(target, engine.mapper().max_length());
        assert_eq!(engine.active_length(), ONE);

        for _ in 0..RAMP_STEPS {
            engine.tick(0);
        }
        assert_eq!(engine.active_length(), target);
    }

    #[test]
    fn process_writes_at_offset() {
        let mut engine = plain_engine();
        let mut output = [-1; 2];

        engine.process(500, &mut output, 0);
        assert_eq!(output, [0, -1]);
        engine.process(600, &mut output, 1);
        assert_eq!(output, [0, 500]);
    }

    #[test]
    fn block_of_four_holds_input_per_half() {
        let mut engine = DelayEngine::new(EngineConfig {
            block_size: 4,
            delay_mod: false,
            ..EngineConfig::DEFAULT
        })
        .unwrap();
        let mut output = [-1; 8];

        engine.process(7, &mut output, 0);
        assert_eq!(output, [0, 7, 7, 7, -1, -1, -1, -1]);
        engine.process(9, &mut output, 4);
        assert_eq!(output, [0, 7, 7, 7, 7, 9, 9, 9]);

        // A half that does not fit is skipped but still runs four ticks.
        engine.process(11, &mut output, 6);
        assert_eq!(output, [0, 7, 7, 7, 7, 9, 9, 9]);
        engine.process(0, &mut output, 0);
        assert_eq!(&output[..4], &[11, 0, 0, 0]);
    }

    #[test]
    fn requested_target_is_reported_unclamped() {
        let mut engine = plain_engine();
        engine.set_target(0);
        assert_eq!(engine.target_length(), 0);
        assert_eq!(engine.effective_target(), MIN_LENGTH);

        engine.set_target(i32::MAX);
        assert_eq!(engine.target_length(), i32::MAX);
        assert_eq!(engine.effective_target(), engine.max_length());

        engine.reset();
        assert_eq!(engine.target_length(), 0);
    }

    #[test]
    fn process_out_of_range_still_ticks() {
        let mut engine = plain_engine();
        let mut output = [0; 2];
        engine.process(700, &mut output, 5);
        assert_eq!(output, [0, 0]);
        engine.process(0, &mut output, 0);
        assert_eq!(output[0], 700);
    }

    #[test]
    fn feedback_recirculates() {
        let mut engine = plain_engine();
        engine.set_feedback_mod(true);
        engine.set_length_immediate(from_samples(4));

        let mut out = [0; 13];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = engine.tick(if i == 0 { 8000 } else { 0 });
        }
        assert_eq!(out[4], 8000);
        assert_eq!(out[8], 4000);
        assert_eq!(out[12], 2000);
    }

    #[test]
    fn gate_opens_window_from_active_length() {
        let mut engine = plain_engine();
        engine.set_length_immediate(from_samples(6) + ONE / 3);
        assert_eq!(engine.gate_rising(), 6);
        for remaining in (0..6).rev() {
            engine.tick(0);
            assert_eq!(engine.burst_remaining(), remaining);
        }
        assert!(!engine.is_bursting());
        engine.gate_falling();
        assert!(!engine.is_bursting());
    }

    #[test]
    fn delay_modulation_shifts_read() {
        let mut engine = DelayEngine::new(EngineConfig::DEFAULT).unwrap();
        engine.set_length_immediate(from_samples(10));
        for i in 0..64 {
            engine.tick(i * 100);
        }
        let unmodulated = engine.line.read(from_samples(10));

        engine.gate_rising();
        // Register goes 1 -> 33: offset 33 << 8 = 8448 (about 0.13 samples).
        let modulated = engine.tick(6400);
        assert_ne!(modulated, unmodulated);
        assert_eq!(
            engine.last_read_position(),
            (from_samples(64) - from_samples(10) - (33 << 8)) & (from_samples(4096) - 1)
        );
    }

    #[test]
    fn sync_pulls_port_state() {
        let mut engine = plain_engine();
        let port = ControlPort::new(&EngineConfig::DEFAULT);
        port.set_feedback_mod(true);
        port.publish_target(from_samples(20));
        port.request_burst();

        engine.sync(&port);
        assert!(engine.feedback_mod());
        assert!(engine.delay_mod());
        assert_eq!(engine.target_length(), from_samples(20));
        // Window opens from the active length, still one sample.
        assert_eq!(engine.burst_remaining(), 1);

        engine.sync(&port);
        assert_eq!(engine.burst_remaining(), 1);
    }

    #[test]
    fn reset_returns_to_power_on() {
        let mut engine = plain_engine();
        engine.set_length_immediate(from_samples(3));
        engine.tick(1234);
        engine.gate_rising();
        engine.reset();
        assert_eq!(engine.active_length(), ONE);
        assert!(!engine.is_bursting());
        assert_eq!(engine.tick(0), 0);
    }
}
