//! Configuration management for the burstecho delay.
//!
//! This crate maps a human-readable TOML settings file onto the engine's
//! fixed-point [`EngineConfig`](burstecho_core::EngineConfig).
//!
//! # Features
//!
//! - **Settings**: Load and save [`EngineSettings`] from TOML files
//! - **Validation**: Range-check every field and report all failures at once
//! - **Paths**: Platform-specific config directory and settings file
//!
//! # Example
//!
//! ```rust,no_run
//! use burstecho_config::{EngineSettings, paths};
//!
//! let settings = EngineSettings::load_or_default(None).unwrap();
//! let config = settings.clone().into_engine_config().unwrap();
//!
//! settings.save(paths::default_settings_path()).unwrap();
//! # let _ = config;
//! ```

mod error;
mod settings;

/// Platform-specific paths for configuration.
pub mod paths;

/// Settings validation.
pub mod validation;

pub use error::ConfigError;
pub use paths::{default_settings_path, ensure_user_config_dir, user_config_dir};
pub use settings::{DEFAULT_CONTROL_DIVIDER, EngineSettings, MAX_BLOCK_SIZE, MAX_FEEDBACK_GAIN};
pub use validation::{ValidationError, ValidationResult, validate_settings};
