//! Error types for the pvtsm crate.

use thiserror::Error;

/// Errors that can occur during time-scale modification.
///
/// Configuration problems are reported before any channel is processed.
/// Short input is not an error: such channels come back silent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StretchError {
    /// Stretch ratio out of range or not representable with the chosen hop.
    #[error("invalid stretch ratio: {0}")]
    InvalidRatio(String),
    /// Transform size is not a supported power of two.
    #[error("invalid FFT size: {0}, must be a power of two >= {min}", min = crate::stretch::params::MIN_FFT_SIZE)]
    InvalidFftSize(usize),
    /// Output hop is zero or larger than the transform size.
    #[error("invalid hop size: {hop} (FFT size {fft_size})")]
    InvalidHopSize { hop: usize, fft_size: usize },
    /// Transient threshold is not a positive finite number.
    #[error("invalid transient threshold: {0}")]
    InvalidThreshold(String),
    /// Channel count is zero or inconsistent with the data.
    #[error("invalid channel count: {0}")]
    InvalidChannels(usize),
    /// Sample rate must be positive.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),
    /// Malformed input buffer.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A NaN or infinite sample was found in the input.
    #[error("non-finite sample at channel {channel}, index {index}")]
    NonFiniteInput { channel: usize, index: usize },
    /// Unsupported or malformed audio file.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StretchError {
    fn from(err: std::io::Error) -> Self {
        StretchError::Io(err.to_string())
    }
}

impl From<hound::Error> for StretchError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => StretchError::Io(e.to_string()),
            other => StretchError::InvalidFormat(other.to_string()),
        }
    }
}
