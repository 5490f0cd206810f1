//! Engine settings file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use burstecho_core::config::DEFAULT_BURST_DELAY_SHIFT;
use burstecho_core::fixed::ONE;
use burstecho_core::{DEFAULT_BLOCK_SIZE, DEFAULT_CAPACITY, DEFAULT_TIME_SCALE, EngineConfig};

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_settings};

/// Largest block size accepted from a settings file.
pub const MAX_BLOCK_SIZE: usize = 64;

/// Largest feedback gain accepted from a settings file.
pub const MAX_FEEDBACK_GAIN: f32 = 0.99;

/// Default audio calls between slow control conversions.
pub const DEFAULT_CONTROL_DIVIDER: u32 = 16;

/// Engine settings in human units.
///
/// Every field has a default, so a file only needs the values it changes.
///
/// # TOML Format
///
/// ```toml
/// capacity = 4096
/// block_size = 1
/// feedback_gain = 0.5
/// time_scale = 160000
/// initial_delay = 1.0
/// feedback_mod = false
/// delay_mod = true
/// burst_delay_shift = 8
/// control_divider = 16
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Delay ring capacity in samples (power of two).
    pub capacity: usize,

    /// Samples produced per processor call.
    pub block_size: usize,

    /// Feedback gain as a ratio, `0.0..=0.99`.
    pub feedback_gain: f32,

    /// Multiplier applied to the exponential curve (16.16).
    pub time_scale: i32,

    /// Power-on delay in samples.
    pub initial_delay: f32,

    /// Power-on state of feedback modulation.
    pub feedback_mod: bool,

    /// Power-on state of delay modulation.
    pub delay_mod: bool,

    /// Left shift turning a register value into a read offset.
    pub burst_delay_shift: u32,

    /// Audio calls between slow control conversions.
    pub control_divider: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            block_size: DEFAULT_BLOCK_SIZE,
            feedback_gain: 0.5,
            time_scale: DEFAULT_TIME_SCALE,
            initial_delay: 1.0,
            feedback_mod: false,
            delay_mod: true,
            burst_delay_shift: DEFAULT_BURST_DELAY_SHIFT,
            control_divider: DEFAULT_CONTROL_DIVIDER,
        }
    }
}

fn ratio_to_fixed(value: f32) -> i32 {
    (value * ONE as f32).round() as i32
}

fn fixed_to_ratio(value: i32) -> f32 {
    value as f32 / ONE as f32
}

impl EngineSettings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Loads `path` if given, else the user settings file if it exists, else
    /// the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default_path = crate::paths::default_settings_path();
        if default_path.is_file() {
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;

        Ok(())
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks every field; see [`validate_settings`].
    pub fn validate(&self) -> ValidationResult<()> {
        validate_settings(self)
    }

    /// Validates and converts to the engine's fixed-point configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use burstecho_config::EngineSettings;
    ///
    /// let config = EngineSettings::default().into_engine_config().unwrap();
    /// assert_eq!(config.feedback_gain, 32768);
    /// ```
    pub fn into_engine_config(self) -> Result<EngineConfig, ConfigError> {
        self.validate()?;
        let config = EngineConfig {
            capacity: self.capacity,
            block_size: self.block_size,
            feedback_gain: ratio_to_fixed(self.feedback_gain),
            time_scale: self.time_scale,
            initial_length: ratio_to_fixed(self.initial_delay),
            feedback_mod: self.feedback_mod,
            delay_mod: self.delay_mod,
            burst_delay_shift: self.burst_delay_shift,
        };
        config.validate()?;
        Ok(config)
    }

    /// Settings describing `config`. The control divider keeps its default.
    pub fn from_engine_config(config: &EngineConfig) -> Self {
        Self {
            capacity: config.capacity,
            block_size: config.block_size,
            feedback_gain: fixed_to_ratio(config.feedback_gain),
            time_scale: config.time_scale,
            initial_delay: fixed_to_ratio(config.initial_length),
            feedback_mod: config.feedback_mod,
            delay_mod: config.delay_mod,
            burst_delay_shift: config.burst_delay_shift,
            ..Self::default()
        }
    }
}
