#![forbid(unsafe_code)]
//! Transient-aware phase vocoder for offline audio time-scale modification.
//!
//! `pvtsm` changes the duration of audio without altering its pitch. Each
//! channel is cut into overlapping Hann-windowed frames, the phase of every
//! frequency bin is re-timed from the input hop to the output hop, and the
//! frames are overlap-added back together. Frames whose energy jumps sharply
//! (percussive onsets) reset the synthesis phase to the analysis phase so
//! attacks stay crisp instead of smearing.
//!
//! # Quick Start
//!
//! ```
//! use pvtsm::StretchParams;
//!
//! // 1 second of 440 Hz sine at 44.1 kHz
//! let input: Vec<f32> = (0..44100)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
//!     .collect();
//!
//! let params = StretchParams::new(1.5);
//! let output = pvtsm::stretch(&[input], &params).unwrap();
//! assert_eq!(output[0].len(), 66150); // 1.5x longer
//! ```
//!
//! The engine works on whole, already-decoded buffers. [`io::wav`] is a thin
//! WAV front end for the `pvtsm` binary.

pub mod analysis;
pub mod core;
pub mod error;
pub mod io;
pub mod report;
pub mod stretch;

pub use core::types::{AudioBuffer, Sample, StretchParams};
pub use error::StretchError;
pub use report::{ChannelReport, StretchReport};
pub use stretch::{FrameAction, PhaseVocoder};

/// Deinterleaves multi-channel audio into separate per-channel vectors.
///
/// Trailing samples that do not make up a whole frame are dropped.
#[inline]
fn deinterleave(input: &[f32], num_channels: usize) -> Vec<Vec<f32>> {
    let frames = input.len() / num_channels;
    (0..num_channels)
        .map(|ch| {
            input[..frames * num_channels]
                .iter()
                .skip(ch)
                .step_by(num_channels)
                .copied()
                .collect()
        })
        .collect()
}

/// Interleaves per-channel vectors into a single buffer, truncating to the shortest channel.
#[inline]
fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let min_len = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    (0..min_len)
        .flat_map(|i| channels.iter().map(move |ch| ch[i]))
        .collect()
}

/// Rejects NaN and infinite samples, reporting the first one found.
fn validate_input(channels: &[Vec<f32>]) -> Result<(), StretchError> {
    for (channel, samples) in channels.iter().enumerate() {
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(StretchError::NonFiniteInput { channel, index });
        }
    }
    Ok(())
}

/// Stretches each channel independently and reports what happened.
///
/// Parameters and input are validated before any channel is processed.
/// Channels may differ in length; each output channel has
/// `floor(len * stretch_ratio)` samples.
///
/// # Errors
///
/// Returns a configuration error ([`StretchError::InvalidRatio`],
/// [`StretchError::InvalidFftSize`], [`StretchError::InvalidHopSize`],
/// [`StretchError::InvalidThreshold`]) or
/// [`StretchError::NonFiniteInput`]. Short channels are not an error; they
/// come back silent.
pub fn stretch_with_report(
    channels: &[Vec<f32>],
    params: &StretchParams,
) -> Result<(Vec<Vec<f32>>, StretchReport), StretchError> {
    let vocoder = PhaseVocoder::new(params)?;
    validate_input(channels)?;

    #[cfg(feature = "parallel")]
    let outputs: Vec<stretch::ChannelOutput> = {
        use rayon::prelude::*;
        channels
            .par_iter()
            .map(|ch| vocoder.process_channel(ch))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let outputs: Vec<stretch::ChannelOutput> = channels
        .iter()
        .map(|ch| vocoder.process_channel(ch))
        .collect();

    let mut report = StretchReport::new(vocoder.geometry());
    let mut samples = Vec::with_capacity(outputs.len());
    for output in outputs {
        report.channels.push(output.report);
        samples.push(output.samples);
    }
    Ok((samples, report))
}

/// Stretches each channel independently.
///
/// This is the main entry point for planar audio. For interleaved audio use
/// [`stretch_interleaved`]; to carry the sample rate along use
/// [`stretch_buffer`].
///
/// # Example
///
/// ```
/// use pvtsm::StretchParams;
///
/// let left = vec![0.0f32; 8192];
/// let right = vec![0.0f32; 8192];
/// let params = StretchParams::new(0.5);
/// let output = pvtsm::stretch(&[left, right], &params).unwrap();
/// assert_eq!(output.len(), 2);
/// assert_eq!(output[0].len(), 4096);
/// ```
pub fn stretch(channels: &[Vec<f32>], params: &StretchParams) -> Result<Vec<Vec<f32>>, StretchError> {
    stretch_with_report(channels, params).map(|(samples, _)| samples)
}

/// Stretches interleaved audio (`[L0, R0, L1, R1, ...]`).
///
/// # Errors
///
/// Returns [`StretchError::InvalidChannels`] if `num_channels` is 0, plus
/// everything [`stretch`] can return.
pub fn stretch_interleaved(
    input: &[f32],
    num_channels: usize,
    params: &StretchParams,
) -> Result<Vec<f32>, StretchError> {
    if num_channels == 0 {
        return Err(StretchError::InvalidChannels(0));
    }
    let channels = deinterleave(input, num_channels);
    Ok(interleave(&stretch(&channels, params)?))
}

/// Stretches an [`AudioBuffer`] and returns a new `AudioBuffer` with the
/// same sample rate and channel count.
pub fn stretch_buffer(
    buffer: &AudioBuffer,
    params: &StretchParams,
) -> Result<AudioBuffer, StretchError> {
    stretch_buffer_with_report(buffer, params).map(|(buffer, _)| buffer)
}

/// [`stretch_buffer`] that also returns the processing report.
pub fn stretch_buffer_with_report(
    buffer: &AudioBuffer,
    params: &StretchParams,
) -> Result<(AudioBuffer, StretchReport), StretchError> {
    let (channels, mut report) = stretch_with_report(buffer.channels(), params)?;
    report.sample_rate = Some(buffer.sample_rate);
    Ok((AudioBuffer::new(channels, buffer.sample_rate)?, report))
}
