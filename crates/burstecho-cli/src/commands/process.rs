//! Offline rendering command.
//!
//! Converts the input to the converter's fixed-point width, then drives a
//! [`DelayModule`] with the same interrupt sequence the hardware produces:
//! a transfer per sample, a slow conversion every `control_divider` samples,
//! and an optional clock on the main gate.

use crate::commands::common::{
    linear_to_db, load_settings, parse_bit_depth, peak, rms, samples_to_ms,
};
use anyhow::Context;
use burstecho_core::fixed::to_samples_f32;
use burstecho_io::{FixedScale, WavSpec, read_wav, write_wav};
use burstecho_platform::{ControlFrame, DelayModule, InterruptEvent, InterruptSchedule};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Samples between progress bar updates.
const PROGRESS_STRIDE: usize = 4096;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Time knob, 0-4095 (higher is shorter)
    #[arg(long, default_value_t = 2048, value_parser = clap::value_parser!(i32).range(0..=4095))]
    knob: i32,

    /// Time CV, 0-4095, centered at 2048
    #[arg(long, default_value_t = 2048, value_parser = clap::value_parser!(i32).range(0..=4095))]
    cv: i32,

    /// Clock the main gate at this rate (opens a burst window per rising edge)
    #[arg(long)]
    gate_hz: Option<f32>,

    /// Override feedback modulation (true/false)
    #[arg(long)]
    feedback_mod: Option<bool>,

    /// Override delay modulation (true/false)
    #[arg(long)]
    delay_mod: Option<bool>,

    /// Override the number of samples between control updates
    #[arg(long)]
    control_divider: Option<u32>,

    /// Engine settings file (TOML); defaults to the user settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Converter width the engine sees, in bits
    #[arg(long, default_value_t = burstecho_io::DEFAULT_BITS)]
    bits: u32,

    /// Output bit depth (16, 24, or 32 for float)
    #[arg(long, default_value_t = 16, value_parser = parse_bit_depth)]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(enabled) = args.feedback_mod {
        settings.feedback_mod = enabled;
    }
    if let Some(enabled) = args.delay_mod {
        settings.delay_mod = enabled;
    }
    if let Some(divider) = args.control_divider {
        settings.control_divider = divider;
    }
    let control_divider = settings.control_divider;
    let config = settings.into_engine_config()?;
    anyhow::ensure!(
        config.block_size == 1,
        "offline rendering runs one sample per transfer; set block_size = 1"
    );
    let scale = FixedScale::new(args.bits)?;

    // Read input file
    println!("Reading {}...", args.input.display());
    let (samples, spec) = read_wav(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let sample_rate = spec.sample_rate;

    println!(
        "  {} samples, {} Hz, {:.2}s",
        samples.len(),
        sample_rate,
        samples.len() as f32 / sample_rate as f32
    );

    let gate_period = match args.gate_hz {
        Some(hz) if hz > 0.0 => Some((sample_rate as f32 / hz).round().max(1.0) as u32),
        Some(hz) => anyhow::bail!("gate rate must be positive, got {hz}"),
        None => None,
    };

    let mut module = DelayModule::<1>::new(config)?;
    let frame = ControlFrame::new(args.cv, args.knob);
    let target = module.engine().mapper().map(frame.cv, frame.knob);
    let target_samples = to_samples_f32(target.min(module.engine().max_length()));

    tracing::info!(
        knob = args.knob,
        cv = args.cv,
        delay_samples = target_samples,
        feedback_mod = config.feedback_mod,
        delay_mod = config.delay_mod,
        control_divider,
        gate_period,
        "engine configured"
    );
    println!(
        "Delay {:.1} samples ({:.2} ms), feedback mod {}, delay mod {}",
        target_samples,
        samples_to_ms(target_samples, sample_rate),
        on_off(config.feedback_mod),
        on_off(config.delay_mod),
    );

    let schedule = InterruptSchedule::new(frame)
        .with_control_divider(control_divider)
        .with_gate_period(gate_period);

    let fixed_in = scale.encode(&samples);
    let mut fixed_out = Vec::with_capacity(fixed_in.len());

    // Process with progress bar
    let pb = ProgressBar::new(fixed_in.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut pending = fixed_in.iter().peekable();
    let mut bursts = 0u64;
    for event in schedule {
        if pending.peek().is_none() {
            break;
        }
        if event.is_transfer() {
            if let Some(&sample) = pending.next() {
                module.set_input(sample);
            }
            module.handle(event);
            fixed_out.extend_from_slice(module.last_block());
            if fixed_out.len() % PROGRESS_STRIDE == 0 {
                pb.set_position(fixed_out.len() as u64);
            }
        } else {
            if event == InterruptEvent::MainRising {
                bursts += 1;
            }
            module.handle(event);
        }
    }

    pb.finish_with_message("done");

    let clipped = scale.count_clipped(&fixed_out);
    let output = scale.decode(&fixed_out);

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&samples)),
        linear_to_db(peak(&samples))
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&output)),
        linear_to_db(peak(&output))
    );
    println!("  Bursts: {bursts}, clipped samples: {clipped}");
    if clipped > 0 {
        tracing::warn!(clipped, "output exceeded full scale");
    }

    // Write output file
    let out_spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: args.bit_depth,
    };

    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output, out_spec)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
