//! Processing report: frame counts, transient candidates and phase resets.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StretchError;
use crate::stretch::params::FrameGeometry;

/// What happened to one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelReport {
    /// Input length in samples.
    pub input_len: usize,
    /// Output length in samples.
    pub output_len: usize,
    /// Number of analysis frames.
    pub frames: usize,
    /// Frames whose energy ratio exceeded the threshold.
    #[serde(default)]
    pub transient_candidates: Vec<usize>,
    /// Frames where the synthesis phase was reset.
    #[serde(default)]
    pub phase_resets: Vec<usize>,
}

impl ChannelReport {
    /// Candidates that were suppressed by the cooldown.
    pub fn suppressed_transients(&self) -> Vec<usize> {
        self.transient_candidates
            .iter()
            .copied()
            .filter(|f| self.phase_resets.binary_search(f).is_err())
            .collect()
    }
}

/// What happened to a whole multi-channel stretch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StretchReport {
    /// Sample rate, when the input carried one.
    #[serde(default)]
    pub sample_rate: Option<u32>,
    /// Requested duration ratio.
    pub stretch_ratio: f64,
    /// Transform size.
    pub fft_size: usize,
    /// Analysis hop.
    pub hop_in: usize,
    /// Synthesis hop.
    pub hop_out: usize,
    /// One entry per channel, in channel order.
    pub channels: Vec<ChannelReport>,
}

impl StretchReport {
    /// Creates an empty report for the given geometry.
    pub fn new(geometry: &FrameGeometry) -> Self {
        Self {
            sample_rate: None,
            stretch_ratio: geometry.stretch_ratio,
            fft_size: geometry.fft_size,
            hop_in: geometry.hop_in,
            hop_out: geometry.hop_out,
            channels: Vec::new(),
        }
    }

    /// Total phase resets across all channels.
    pub fn total_phase_resets(&self) -> usize {
        self.channels.iter().map(|c| c.phase_resets.len()).sum()
    }

    /// Output duration in seconds, when the sample rate is known.
    pub fn output_duration_secs(&self) -> Option<f64> {
        let rate = self.sample_rate?;
        let len = self.channels.first()?.output_len;
        Some(len as f64 / rate as f64)
    }
}

/// Writes a report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &StretchReport) -> Result<(), StretchError> {
    let json = serde_json::to_string_pretty(report).map_err(|e| {
        StretchError::InvalidFormat(format!("failed to serialize stretch report: {}", e))
    })?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Reads a report from JSON.
pub fn read_report_json(path: &Path) -> Result<StretchReport, StretchError> {
    let data = std::fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|e| {
        StretchError::InvalidFormat(format!(
            "failed to parse stretch report from {}: {}",
            path.display(),
            e
        ))
    })
}
