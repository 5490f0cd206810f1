//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use burstecho_config::EngineSettings;
use std::path::Path;

/// Load settings from `path`, the user settings file, or the defaults.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<EngineSettings> {
    let settings = EngineSettings::load_or_default(path).context("loading engine settings")?;
    settings.validate()?;
    Ok(settings)
}

/// Output bit depths `write_wav` accepts.
pub const BIT_DEPTHS: [u16; 3] = [16, 24, 32];

/// Parse an output bit depth for clap's `value_parser`.
pub fn parse_bit_depth(s: &str) -> Result<u16, String> {
    let depth: u16 = s
        .parse()
        .map_err(|_| format!("Invalid bit depth: '{s}' (expected 16, 24 or 32)"))?;
    if BIT_DEPTHS.contains(&depth) {
        Ok(depth)
    } else {
        Err(format!("Unsupported bit depth: {depth} (expected 16, 24 or 32)"))
    }
}

/// Root mean square of `samples`.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Largest absolute sample.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

/// Linear amplitude in dBFS, floored at -120.
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}

/// Samples to milliseconds at `sample_rate`.
pub fn samples_to_ms(samples: f32, sample_rate: u32) -> f32 {
    samples * 1000.0 / sample_rate as f32
}
