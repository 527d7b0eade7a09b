//! Windowed DFT analysis of individual frames.

use rustfft::num_complex::Complex;

use crate::core::fft::FftPair;
use crate::core::window::{apply_window, hann_window};

/// Magnitude and phase of one analysis frame, for every bin `k` in `0..N`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// `|X[k]|`, always non-negative.
    pub magnitude: Vec<f32>,
    /// `arg(X[k])` in radians, as returned by the transform (not unwrapped).
    pub phase: Vec<f32>,
}

impl Spectrum {
    /// Splits a complex spectrum into magnitude and phase.
    pub fn from_complex(bins: &[Complex<f32>]) -> Self {
        let (magnitude, phase) = bins.iter().map(|c| (c.norm(), c.arg())).unzip();
        Self { magnitude, phase }
    }

    /// Number of bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.magnitude.len()
    }

    /// Returns true if the spectrum has no bins.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// Broadband energy: the sum of squared magnitudes over all bins.
    pub fn energy(&self) -> f64 {
        self.magnitude
            .iter()
            .map(|&m| (m as f64) * (m as f64))
            .sum()
    }
}

/// Applies the Hann analysis window and an N-point forward DFT to frames.
///
/// Holds no per-frame state, so one analyzer may serve any number of frames
/// and channels concurrently.
#[derive(Debug, Clone)]
pub struct SpectralAnalyzer {
    fft: FftPair,
    window: Vec<f32>,
}

impl SpectralAnalyzer {
    /// Creates an analyzer for frames of `fft.size()` samples.
    pub fn new(fft: FftPair) -> Self {
        let window = hann_window(fft.size());
        Self { fft, window }
    }

    /// Transform size.
    #[inline]
    pub fn fft_size(&self) -> usize {
        self.fft.size()
    }

    /// The analysis window.
    #[inline]
    pub fn window(&self) -> &[f32] {
        &self.window
    }

    /// Windows `frame` and returns its complex spectrum.
    ///
    /// # Panics
    /// Panics if `frame.len()` differs from the transform size.
    pub fn transform(&self, frame: &[f32]) -> Vec<Complex<f32>> {
        assert_eq!(frame.len(), self.fft.size(), "frame length mismatch");
        let mut windowed = frame.to_vec();
        apply_window(&mut windowed, &self.window);
        let mut buffer: Vec<Complex<f32>> =
            windowed.iter().map(|&s| Complex::new(s, 0.0)).collect();
        self.fft.forward(&mut buffer);
        buffer
    }

    /// Windows `frame` and returns its magnitude and phase.
    pub fn analyze(&self, frame: &[f32]) -> Spectrum {
        Spectrum::from_complex(&self.transform(frame))
    }
}
