//! Audio file I/O for the burstecho delay.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] for loading/saving audio files
//! - **Fixed-point conversion**: [`FixedScale`] maps float samples onto the
//!   converter-width integers the engine processes, and back
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use burstecho_io::{FixedScale, read_wav, write_wav};
//!
//! let (samples, spec) = read_wav("input.wav")?;
//! let scale = FixedScale::DEFAULT;
//! let fixed = scale.encode(&samples);
//!
//! // ... run the engine over `fixed` ...
//!
//! write_wav("output.wav", &scale.decode(&fixed), spec)?;
//! ```

mod convert;
mod wav;

pub use convert::{DEFAULT_BITS, FixedScale, MAX_BITS, MIN_BITS};
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Fixed-point width outside the supported range.
    #[error("Unsupported fixed-point width: {0} bits (expected 2..=24)")]
    UnsupportedBits(u32),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
