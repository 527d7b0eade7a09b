//! Frame resynthesis and overlap-add reconstruction.

use rustfft::num_complex::Complex;

use crate::core::fft::{FftPair, COMPLEX_ZERO};
use crate::core::window::{hann_window, window_energy};

/// Turns a magnitude spectrum and a synthesis phase back into a windowed,
/// gain-compensated time-domain frame.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    fft: FftPair,
    window: Vec<f32>,
    scale: f32,
}

impl Synthesizer {
    /// Creates a synthesizer whose frames, overlap-added every `hop_out`
    /// samples, reconstruct at unit gain.
    pub fn new(fft: FftPair, hop_out: usize) -> Self {
        let window = hann_window(fft.size());
        let scale = (hop_out as f64 / window_energy(&window)) as f32;
        Self { fft, window, scale }
    }

    /// Output gain `hop_out / sum(w^2)` applied to every frame.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Transform size.
    #[inline]
    pub fn fft_size(&self) -> usize {
        self.fft.size()
    }

    /// Resynthesizes one frame.
    ///
    /// Builds `magnitude * exp(i * phase)`, inverse-transforms it and keeps
    /// the real part; the imaginary residue of a near-Hermitian spectrum is
    /// discarded.
    pub fn synthesize(&self, magnitude: &[f32], phase: &[f32]) -> Vec<f32> {
        let n = self.fft.size();
        debug_assert_eq!(magnitude.len(), n);
        debug_assert_eq!(phase.len(), n);

        let mut buffer = vec![COMPLEX_ZERO; n];
        for (bin, (&mag, &ph)) in buffer.iter_mut().zip(magnitude.iter().zip(phase.iter())) {
            *bin = Complex::from_polar(mag, ph);
        }
        self.fft.inverse(&mut buffer);

        buffer
            .iter()
            .zip(self.window.iter())
            .map(|(c, &w)| c.re * w * self.scale)
            .collect()
    }
}

/// Accumulates synthesized frames into a fixed-length output, one every
/// `hop` samples, and trims the guard regions at the end.
#[derive(Debug, Clone)]
pub struct OverlapAdd {
    buffer: Vec<f32>,
    hop: usize,
    guard: usize,
}

impl OverlapAdd {
    /// Creates an accumulator of `len` samples whose first and last `guard`
    /// samples are dropped by [`finish`](Self::finish).
    pub fn new(len: usize, hop: usize, guard: usize) -> Self {
        Self {
            buffer: vec![0.0; len],
            hop,
            guard,
        }
    }

    /// Adds frame `index` at offset `index * hop`.
    ///
    /// Whatever part of the frame falls past the end of the buffer is
    /// dropped.
    pub fn add(&mut self, index: usize, frame: &[f32]) {
        let start = index * self.hop;
        if start >= self.buffer.len() {
            return;
        }
        let len = frame.len().min(self.buffer.len() - start);
        for (out, &s) in self.buffer[start..start + len].iter_mut().zip(frame) {
            *out += s;
        }
    }

    /// The accumulated samples, guard regions included.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.buffer
    }

    /// Returns the accumulated signal with `guard` samples removed from each
    /// end.
    pub fn finish(mut self) -> Vec<f32> {
        let end = self.buffer.len().saturating_sub(self.guard);
        let start = self.guard.min(end);
        self.buffer.truncate(end);
        self.buffer.drain(..start);
        self.buffer
    }
}
