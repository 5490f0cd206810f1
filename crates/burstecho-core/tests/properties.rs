//! Property-based tests for burstecho-core.
//!
//! Covers the control curve's range and monotonicity, ramp convergence, the
//! random register, and delay line integrity using proptest for randomized
//! inputs.

use burstecho_core::fixed::{CONTROL_MAX, from_samples};
use burstecho_core::{
    DelayEngine, DelayLineBuffer, DelayRamp, EngineConfig, ExpoMapper, Lfsr12, MIN_LENGTH, ONE,
    RAMP_STEPS,
};
use proptest::prelude::*;

const MAX_LENGTH: i32 = 4094 * ONE;

fn plain_engine() -> DelayEngine {
    DelayEngine::new(EngineConfig {
        feedback_mod: false,
        delay_mod: false,
        ..EngineConfig::DEFAULT
    })
    .expect("default config is valid")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Any pair of raw readings, including out-of-range ones, maps inside the
    /// mapper's range and inside the buffer.
    #[test]
    fn mapped_target_in_range(cv in -20_000i32..20_000, knob in -20_000i32..20_000) {
        let mapper = ExpoMapper::default();
        let target = mapper.map(cv, knob);
        prop_assert!(target >= mapper.min_length());
        prop_assert!(target <= mapper.max_length());
        prop_assert!(target <= MAX_LENGTH);
    }

    /// The mapped length is strictly increasing in the inverted input.
    #[test]
    fn mapped_target_monotonic(a in 0i32..=CONTROL_MAX, b in 0i32..=CONTROL_MAX) {
        prop_assume!(a != b);
        let mapper = ExpoMapper::default();
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        prop_assert!(mapper.map_input(lo) < mapper.map_input(hi));
    }

    /// Turning the knob up never lengthens the delay.
    #[test]
    fn knob_shortens_delay(cv in 0i32..=4095, knob in 0i32..4095) {
        let mapper = ExpoMapper::default();
        prop_assert!(mapper.map(cv, knob + 1) <= mapper.map(cv, knob));
    }

    /// The ramp reaches any target within RAMP_STEPS ticks and stays between
    /// its start and its target on the way.
    #[test]
    fn ramp_converges_without_overshoot(
        from in MIN_LENGTH..=MAX_LENGTH,
        to in MIN_LENGTH..=MAX_LENGTH,
    ) {
        let mut ramp = DelayRamp::new(from, MIN_LENGTH, MAX_LENGTH);
        ramp.set_target(to);
        let (lo, hi) = if from < to { (from, to) } else { (to, from) };

        for _ in 0..RAMP_STEPS {
            let active = ramp.advance();
            prop_assert!(active >= lo && active <= hi);
        }
        prop_assert_eq!(ramp.active(), to);
        prop_assert_eq!(ramp.advance(), to);
    }

    /// With modulation and feedback off, an integer length N reproduces the
    /// input exactly N ticks later.
    #[test]
    fn exact_delay_identity(
        samples in prop::collection::vec(-1_000_000i32..1_000_000, 1..=256),
        n in 1i32..=64,
    ) {
        let mut engine = plain_engine();
        engine.set_length_immediate(from_samples(n));

        let n = n as usize;
        let mut output = Vec::with_capacity(samples.len() + n);
        for &sample in samples.iter().chain(core::iter::repeat(&0).take(n)) {
            output.push(engine.tick(sample));
        }

        prop_assert!(output[..n].iter().all(|&s| s == 0));
        prop_assert_eq!(&output[n..n + samples.len()], &samples[..]);
    }

    /// A fractional read lands between the two samples it interpolates.
    #[test]
    fn interpolation_is_bounded(
        a in -100_000i32..100_000,
        b in -100_000i32..100_000,
        frac in 0i32..ONE,
    ) {
        let mut line = DelayLineBuffer::new(16).expect("valid capacity");
        line.write(b); // two back
        line.write(a); // one back
        let out = line.read(ONE + frac);
        prop_assert!(out >= a.min(b) && out <= a.max(b), "{out} not within [{a}, {b}]");
    }

    /// No seed drives the register to zero, and it stays within 12 bits.
    #[test]
    fn register_never_zero(seed in any::<u32>(), steps in 1usize..64) {
        let mut lfsr = Lfsr12::with_seed(seed);
        for _ in 0..steps {
            let r = lfsr.advance();
            prop_assert!(r != 0 && r <= 0x0FFF);
        }
    }

    /// Any interleaving of control ticks, gate edges and audio blocks keeps
    /// the active length inside the buffer.
    #[test]
    fn engine_survives_any_control_sequence(
        ops in prop::collection::vec((0u8..4, -5000i32..9000, -5000i32..9000), 1..300),
        input in -2048i32..2048,
    ) {
        let mut engine = DelayEngine::new(EngineConfig {
            feedback_mod: true,
            delay_mod: true,
            ..EngineConfig::DEFAULT
        })
        .expect("default config is valid");
        let mut output = [0i32; 2];

        for (op, cv, knob) in ops {
            match op {
                0 => {
                    engine.control_tick(cv, knob);
                }
                1 => {
                    engine.gate_rising();
                }
                2 => engine.process(input, &mut output, 1),
                _ => engine.process(input, &mut output, 5),
            }
            prop_assert!(engine.active_length() >= MIN_LENGTH);
            prop_assert!(engine.active_length() <= engine.max_length());
        }
    }
}
