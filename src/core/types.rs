use crate::error::StretchError;
use crate::stretch::params::{
    DEFAULT_COOLDOWN_FRAMES, DEFAULT_FFT_SIZE, DEFAULT_TRANSIENT_THRESHOLD,
};

/// A single audio sample (32-bit float, nominally -1.0 to 1.0).
pub type Sample = f32;

/// Planar multi-channel audio: one sample vector per channel.
///
/// All channels have the same length. The sample rate is carried along
/// for duration reporting only; processing never depends on it.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<Sample>>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer from per-channel sample vectors.
    ///
    /// # Errors
    /// Returns `StretchError::InvalidChannels` if `channels` is empty,
    /// `StretchError::InvalidSampleRate` if `sample_rate` is 0 and
    /// `StretchError::InvalidInput` if the channels differ in length.
    pub fn new(channels: Vec<Vec<Sample>>, sample_rate: u32) -> Result<Self, StretchError> {
        if channels.is_empty() {
            return Err(StretchError::InvalidChannels(0));
        }
        if sample_rate == 0 {
            return Err(StretchError::InvalidSampleRate(sample_rate));
        }
        let len = channels[0].len();
        if channels.iter().any(|ch| ch.len() != len) {
            return Err(StretchError::InvalidInput(
                "all channels must have the same number of samples".to_string(),
            ));
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Create a single-channel buffer.
    pub fn from_mono(samples: Vec<Sample>, sample_rate: u32) -> Result<Self, StretchError> {
        Self::new(vec![samples], sample_rate)
    }

    /// Create a buffer from interleaved samples (`[L0, R0, L1, R1, ...]`).
    ///
    /// Trailing samples that do not make up a whole frame are dropped.
    pub fn from_interleaved(
        data: &[Sample],
        num_channels: usize,
        sample_rate: u32,
    ) -> Result<Self, StretchError> {
        if num_channels == 0 {
            return Err(StretchError::InvalidChannels(0));
        }
        Self::new(crate::deinterleave(data, num_channels), sample_rate)
    }

    /// Interleave the channels into a single vector.
    pub fn to_interleaved(&self) -> Vec<Sample> {
        crate::interleave(&self.channels)
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel.
    pub fn num_frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.num_frames() == 0
    }

    /// Borrow one channel's samples.
    pub fn channel(&self, index: usize) -> Option<&[Sample]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Borrow all channels.
    pub fn channels(&self) -> &[Vec<Sample>] {
        &self.channels
    }

    /// Consume the buffer, returning its channels.
    pub fn into_channels(self) -> Vec<Vec<Sample>> {
        self.channels
    }
}

/// Parameters controlling the time-scale modification.
#[derive(Debug, Clone, PartialEq)]
pub struct StretchParams {
    /// Duration ratio: >1.0 = slower (longer), <1.0 = faster (shorter).
    pub stretch_ratio: f64,
    /// Transform size N (default: 2048).
    pub fft_size: usize,
    /// Output (synthesis) hop; defaults to `fft_size / 4`.
    pub hop_size: Option<usize>,
    /// Frame energy ratio above which a frame is a transient (default: 2.5).
    pub transient_threshold: f32,
    /// Cooldown after a phase reset, in frames, counting the reset frame (default: 3).
    pub cooldown_frames: usize,
}

impl StretchParams {
    /// Create stretch parameters with the given duration ratio.
    pub fn new(stretch_ratio: f64) -> Self {
        Self {
            stretch_ratio,
            fft_size: DEFAULT_FFT_SIZE,
            hop_size: None,
            transient_threshold: DEFAULT_TRANSIENT_THRESHOLD,
            cooldown_frames: DEFAULT_COOLDOWN_FRAMES,
        }
    }

    /// Create stretch parameters from a playback speed.
    ///
    /// A speed of 2.0 plays twice as fast (half the duration).
    pub fn from_speed(speed: f64) -> Self {
        Self::new(1.0 / speed)
    }

    /// Set the transform size.
    pub fn with_fft_size(mut self, fft_size: usize) -> Self {
        self.fft_size = fft_size;
        self
    }

    /// Set the output hop explicitly.
    pub fn with_hop_size(mut self, hop_size: usize) -> Self {
        self.hop_size = Some(hop_size);
        self
    }

    /// Set the transient energy-ratio threshold.
    pub fn with_transient_threshold(mut self, threshold: f32) -> Self {
        self.transient_threshold = threshold;
        self
    }

    /// Set the cooldown after a phase reset.
    pub fn with_cooldown_frames(mut self, frames: usize) -> Self {
        self.cooldown_frames = frames;
        self
    }

    /// Get the effective output hop.
    pub fn effective_hop_size(&self) -> usize {
        self.hop_size.unwrap_or(self.fft_size / 4)
    }
}

impl Default for StretchParams {
    fn default() -> Self {
        Self::new(1.0)
    }
}
