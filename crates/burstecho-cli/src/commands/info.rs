//! Display the effective engine settings, and optionally WAV file metadata.

use crate::commands::common::{load_settings, samples_to_ms};
use anyhow::Context;
use burstecho_config::{default_settings_path, ensure_user_config_dir, paths::SETTINGS_FILE};
use burstecho_core::{DelayEngine, burst::max_delay_offset, fixed::to_samples_f32};
use burstecho_io::{WavFormat, read_wav_info};
use clap::Args;
use std::path::{Path, PathBuf};

/// Display engine settings and the delay range they produce.
#[derive(Args)]
pub struct InfoArgs {
    /// WAV file to describe alongside the settings
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Engine settings file (TOML); defaults to the user settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sample rate used to express lengths in milliseconds
    #[arg(long, default_value_t = 48000)]
    pub sample_rate: u32,

    /// Write the effective settings to the user settings file
    #[arg(long)]
    pub save: bool,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let sample_rate = match &args.file {
        Some(file) => print_wav_info(file)?,
        None => args.sample_rate,
    };

    let settings = load_settings(args.config.as_deref())?;
    let source = settings_source(args.config.as_deref());
    let engine = DelayEngine::new(settings.clone().into_engine_config()?)?;

    println!("Settings:    {source}");
    println!("Capacity:    {} samples", settings.capacity);
    println!("Block Size:  {}", settings.block_size);
    println!("Feedback:    {:.3}", settings.feedback_gain);
    println!("Time Scale:  {}", settings.time_scale);
    println!("Modulation:  feedback {}, delay {}", settings.feedback_mod, settings.delay_mod);
    println!("Control Div: {}", settings.control_divider);

    let ms = |length: i32| {
        let samples = to_samples_f32(length);
        format!("{samples:.1} samples ({:.2} ms)", samples_to_ms(samples, sample_rate))
    };
    let mapper = engine.mapper();
    println!("\nAt {sample_rate} Hz:");
    println!("  Shortest:  {}", ms(mapper.min_length()));
    println!("  Longest:   {}", ms(mapper.max_length().min(engine.max_length())));
    println!("  Buffer:    {}", ms(engine.max_length()));
    println!("  Burst Max: {}", ms(max_delay_offset(settings.burst_delay_shift)));

    if args.save {
        let path = ensure_user_config_dir()?.join(SETTINGS_FILE);
        settings
            .save(&path)
            .with_context(|| format!("saving {}", path.display()))?;
        println!("\nSaved settings to {}", path.display());
    }

    Ok(())
}

/// Where `load_settings` took its values from.
fn settings_source(config: Option<&Path>) -> String {
    let path = match config {
        Some(path) => path.to_path_buf(),
        None => default_settings_path(),
    };
    if config.is_some() || path.is_file() {
        path.display().to_string()
    } else {
        "(defaults)".to_string()
    }
}

/// Prints the file's metadata and returns its sample rate.
fn print_wav_info(file: &Path) -> anyhow::Result<u32> {
    let info = read_wav_info(file).with_context(|| format!("reading {}", file.display()))?;

    let format_str = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };

    println!("File:        {}", file.display());
    println!("Format:      {} {}-bit", format_str, info.bits_per_sample);
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)\n",
        info.duration_secs, info.num_frames
    );

    Ok(info.sample_rate)
}
