//! Range checks for [`EngineSettings`](crate::EngineSettings).
//!
//! Every field is checked and all failures are reported together, so a
//! hand-edited file can be fixed in one pass.

use thiserror::Error;

use burstecho_core::MAX_CAPACITY;

use crate::settings::{EngineSettings, MAX_BLOCK_SIZE, MAX_FEEDBACK_GAIN};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the setting.
        param: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Value that must be a power of two.
    #[error("parameter '{param}' value {value} must be a power of two")]
    NotPowerOfTwo {
        /// Name of the setting.
        param: String,
        /// The offending value.
        value: usize,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_range(
    errors: &mut Vec<ValidationError>,
    param: &str,
    value: f64,
    min: f64,
    max: f64,
) {
    // NaN fails both comparisons, so test for containment.
    if !(min..=max).contains(&value) {
        errors.push(ValidationError::OutOfRange {
            param: param.to_string(),
            value,
            min,
            max,
        });
    }
}

/// Checks every field of `settings`.
///
/// # Example
///
/// ```rust
/// use burstecho_config::{EngineSettings, validate_settings};
///
/// let mut settings = EngineSettings::default();
/// assert!(validate_settings(&settings).is_ok());
///
/// settings.feedback_gain = 1.5;
/// assert!(validate_settings(&settings).is_err());
/// ```
pub fn validate_settings(settings: &EngineSettings) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if !settings.capacity.is_power_of_two() {
        errors.push(ValidationError::NotPowerOfTwo {
            param: "capacity".to_string(),
            value: settings.capacity,
        });
    }
    check_range(
        &mut errors,
        "capacity",
        settings.capacity as f64,
        4.0,
        MAX_CAPACITY as f64,
    );
    check_range(
        &mut errors,
        "block_size",
        settings.block_size as f64,
        1.0,
        MAX_BLOCK_SIZE as f64,
    );
    check_range(
        &mut errors,
        "feedback_gain",
        f64::from(settings.feedback_gain),
        0.0,
        f64::from(MAX_FEEDBACK_GAIN),
    );
    check_range(
        &mut errors,
        "time_scale",
        f64::from(settings.time_scale),
        1.0,
        f64::from(i32::MAX),
    );
    check_range(
        &mut errors,
        "initial_delay",
        f64::from(settings.initial_delay),
        1.0,
        (settings.capacity.saturating_sub(2)).max(1) as f64,
    );
    check_range(
        &mut errors,
        "burst_delay_shift",
        f64::from(settings.burst_delay_shift),
        0.0,
        16.0,
    );
    check_range(
        &mut errors,
        "control_divider",
        f64::from(settings.control_divider),
        1.0,
        f64::from(u16::MAX),
    );

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
