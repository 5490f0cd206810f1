//! Integration tests for burstecho-platform.
//!
//! Runs a [`DelayModule`] off an [`InterruptSchedule`] the way the firmware
//! timers would, feeds touch gestures through a registered closure, and
//! publishes controls from another thread through the module's port.

use burstecho_core::EngineConfig;
use burstecho_core::fixed::from_samples;
use burstecho_platform::{
    ControlFrame, DelayModule, InterruptEvent, InterruptSchedule, SensorId, TouchCallback,
    TouchEvent, TouchSense,
};
use proptest::prelude::*;

#[derive(Default)]
struct Panel {
    callback: Option<TouchCallback>,
}

impl TouchSense for Panel {
    fn register(&mut self, callback: TouchCallback) {
        self.callback = Some(callback);
    }
}

impl Panel {
    fn touch(&mut self, event: TouchEvent) {
        if let Some(callback) = self.callback.as_mut() {
            callback(event);
        }
    }
}

fn render(
    module: &mut DelayModule<1>,
    schedule: InterruptSchedule,
    input: &[i32],
) -> Vec<i32> {
    let mut samples = input.iter();
    let mut output = Vec::with_capacity(input.len());
    for event in schedule {
        if event.is_transfer() {
            let Some(&sample) = samples.next() else { break };
            module.set_input(sample);
            module.handle(event);
            output.extend_from_slice(module.last_block());
        } else {
            module.handle(event);
        }
    }
    output
}

fn plain_config() -> EngineConfig {
    EngineConfig {
        delay_mod: false,
        ..EngineConfig::DEFAULT
    }
}

#[test]
fn scheduled_render_delays_by_settled_length() {
    let mut module = DelayModule::<1>::new(plain_config()).unwrap();
    let frame = ControlFrame::new(2048, 3000);
    let target = module.engine().mapper().map(frame.cv, frame.knob);
    let n = (target >> 16) as usize;

    // Impulse long after the ramp settles.
    let mut input = vec![0; 4000];
    input[1000] = 30_000;
    let output = render(&mut module, InterruptSchedule::new(frame), &input);

    assert_eq!(output.len(), input.len());
    assert_eq!(module.engine().active_length(), target);
    let peak = output
        .iter()
        .enumerate()
        .max_by_key(|(_, s)| s.abs())
        .map(|(i, _)| i)
        .unwrap();
    assert!(peak == 1000 + n || peak == 1000 + n + 1, "peak at {peak}, n = {n}");
}

#[test]
fn gate_schedule_bursts_every_period() {
    let mut module = DelayModule::<1>::new(EngineConfig::DEFAULT).unwrap();
    module.engine_mut().set_length_immediate(from_samples(40));

    let frame = ControlFrame::new(2048, 2048);
    let n = module.engine().mapper().map(frame.cv, frame.knob) >> 16;
    assert!(n < 100);

    let schedule = InterruptSchedule::new(frame)
        .with_control_divider(u32::MAX)
        .with_gate_period(Some(100));

    // The register advances exactly once per tick inside a window, and no
    // two consecutive values of its sequence are equal.
    let mut bursting_ticks = 0;
    let mut calls = 0;
    for event in schedule {
        if event.is_transfer() {
            calls += 1;
            if calls > 1000 {
                break;
            }
        }
        let before = module.engine().lfsr_value();
        module.handle(event);
        if event.is_transfer() && module.engine().lfsr_value() != before {
            bursting_ticks += 1;
        }
    }

    // Ten gate periods. The only slow conversion lands just before the first
    // edge, so the first window is sized from the length the ramp starts at.
    assert_eq!(bursting_ticks, 40 + 9 * n);
}

#[test]
fn panel_gestures_reach_engine_after_slow_tick() {
    let mut module = DelayModule::<1>::new(plain_config()).unwrap();
    let mut panel = Panel::default();
    module.link_touch(&mut panel);

    panel.touch(TouchEvent::tap(SensorId::Button1));
    panel.touch(TouchEvent::tap(SensorId::Button4));
    assert!(!module.control_port().delay_mod());

    module.handle(InterruptEvent::SlowConversion(ControlFrame::new(2048, 2048)));
    assert!(module.control_port().delay_mod());
    assert!(module.control_port().feedback_mod());
    module.handle(InterruptEvent::HalfTransfer);
    assert!(module.engine().delay_mod());
    assert!(module.engine().feedback_mod());

    panel.touch(TouchEvent::hold(SensorId::Button1));
    panel.touch(TouchEvent::hold(SensorId::Button4));
    module.drain_touch();
    module.handle(InterruptEvent::TransferComplete);
    assert!(!module.engine().delay_mod());
    assert!(!module.engine().feedback_mod());
}

#[test]
fn slow_tick_gate_and_panel_share_the_port() {
    let mut module = DelayModule::<1>::new(plain_config()).unwrap();
    module.engine_mut().set_length_immediate(from_samples(12));
    let port = module.control_port();

    // Slower interrupts run elsewhere and only touch the port.
    let frame = ControlFrame::new(2048, 3000);
    let publisher = {
        let port = port.clone();
        std::thread::spawn(move || {
            let target = port.publish_controls(frame.cv, frame.knob);
            port.request_burst();
            port.toggle_feedback_mod();
            target
        })
    };
    let target = publisher.join().unwrap();

    assert_eq!(module.engine().target_length(), from_samples(12));
    assert!(!module.engine().is_bursting());
    assert!(!module.engine().feedback_mod());

    module.set_input(1000);
    module.handle(InterruptEvent::HalfTransfer);
    assert_eq!(module.engine().target_length(), target);
    assert!(module.engine().feedback_mod());
    // Window sized from the 12-sample active length, one tick already used.
    assert_eq!(module.engine().burst_remaining(), 11);

    // Requests are consumed once.
    module.handle(InterruptEvent::TransferComplete);
    assert_eq!(module.engine().burst_remaining(), 10);

    // Same path through the module's own handlers.
    module.handle(InterruptEvent::SlowConversion(ControlFrame::new(2048, 0)));
    module.handle(InterruptEvent::MainRising);
    module.handle(InterruptEvent::HalfTransfer);
    assert_eq!(
        module.engine().target_length(),
        module.engine().mapper().max_length()
    );
    assert!(module.engine().burst_remaining() > 10);
}

proptest! {
    /// Whatever the schedule, output length matches input length and the
    /// active length stays inside the buffer.
    #[test]
    fn any_schedule_is_safe(
        cv in 0i32..=4095,
        knob in 0i32..=4095,
        divider in 1u32..64,
        gate in proptest::option::of(1u32..500),
        len in 1usize..2000,
    ) {
        let mut module = DelayModule::<1>::new(EngineConfig::DEFAULT).unwrap();
        let schedule = InterruptSchedule::new(ControlFrame::new(cv, knob))
            .with_control_divider(divider)
            .with_gate_period(gate);
        let input: Vec<i32> = (0..len as i32).map(|i| (i * 31) % 4096 - 2048).collect();

        let output = render(&mut module, schedule, &input);
        prop_assert_eq!(output.len(), len);
        prop_assert!(module.engine().active_length() <= module.engine().max_length());
    }
}
