//! Parameter defaults, validation and the frame geometry derived from them.

use crate::core::types::StretchParams;
use crate::error::StretchError;

/// Default transform size.
pub const DEFAULT_FFT_SIZE: usize = 2048;
/// Smallest accepted transform size.
pub const MIN_FFT_SIZE: usize = 16;
/// Default frame energy ratio that marks a transient (a 150% increase).
pub const DEFAULT_TRANSIENT_THRESHOLD: f32 = 2.5;
/// Default cooldown after a phase reset, in frames, counting the reset frame.
pub const DEFAULT_COOLDOWN_FRAMES: usize = 3;
/// Guard added to the previous frame's energy before dividing.
pub const ENERGY_EPSILON: f64 = 1e-7;

/// Slack applied before truncating `hop_out / ratio`, so ratios such as
/// `1.0 / 0.8` land on the same hop as `hop_out * 0.8`.
const HOP_ROUNDING_SLACK: f64 = 1e-9;

/// Validates stretch parameters.
///
/// Everything that can be rejected is rejected here, before any channel is
/// touched; nothing downstream re-checks configuration.
pub fn validate_params(params: &StretchParams) -> Result<(), StretchError> {
    let ratio = params.stretch_ratio;
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(StretchError::InvalidRatio(format!(
            "stretch ratio must be positive and finite, got {}",
            ratio
        )));
    }
    if params.fft_size < MIN_FFT_SIZE || !params.fft_size.is_power_of_two() {
        return Err(StretchError::InvalidFftSize(params.fft_size));
    }
    let hop_out = params.effective_hop_size();
    if hop_out == 0 || hop_out > params.fft_size {
        return Err(StretchError::InvalidHopSize {
            hop: hop_out,
            fft_size: params.fft_size,
        });
    }
    if input_hop(hop_out, ratio) == 0 {
        return Err(StretchError::InvalidRatio(format!(
            "stretch ratio {} leaves no input hop at output hop {}",
            ratio, hop_out
        )));
    }
    let threshold = params.transient_threshold;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(StretchError::InvalidThreshold(format!(
            "transient threshold must be positive and finite, got {}",
            threshold
        )));
    }
    Ok(())
}

/// Analysis hop for a given synthesis hop and duration ratio.
#[inline]
fn input_hop(hop_out: usize, ratio: f64) -> usize {
    (hop_out as f64 / ratio + HOP_ROUNDING_SLACK).floor() as usize
}

/// Frame sizes and hops resolved from validated [`StretchParams`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    /// Transform size N.
    pub fft_size: usize,
    /// Analysis hop: distance between frames read from the input.
    pub hop_in: usize,
    /// Synthesis hop: distance between frames written to the output.
    pub hop_out: usize,
    /// Zeros added to each end of the input, and trimmed from each end of
    /// the output.
    pub padding: usize,
    /// Requested duration ratio.
    pub stretch_ratio: f64,
}

impl FrameGeometry {
    /// Validates `params` and resolves the hop sizes.
    pub fn from_params(params: &StretchParams) -> Result<Self, StretchError> {
        validate_params(params)?;
        let hop_out = params.effective_hop_size();
        Ok(Self {
            fft_size: params.fft_size,
            hop_in: input_hop(hop_out, params.stretch_ratio),
            hop_out,
            padding: params.fft_size,
            stretch_ratio: params.stretch_ratio,
        })
    }

    /// Length of a channel after stretching `input_len` samples.
    #[inline]
    pub fn output_len(&self, input_len: usize) -> usize {
        (input_len as f64 * self.stretch_ratio) as usize
    }

    /// Length of the overlap-add buffer, guard regions included.
    #[inline]
    pub fn output_buffer_len(&self, input_len: usize) -> usize {
        self.output_len(input_len) + 2 * self.padding
    }

    /// Ratio of the hops actually used; differs slightly from the requested
    /// ratio when `hop_out / ratio` is not an integer.
    #[inline]
    pub fn effective_ratio(&self) -> f64 {
        self.hop_out as f64 / self.hop_in as f64
    }
}
