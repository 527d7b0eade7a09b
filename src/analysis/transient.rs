//! Energy-ratio transient detection.
//!
//! A frame is a transient candidate when its broadband energy exceeds the
//! previous frame's energy by more than a fixed factor. The detector is
//! causal and single-pass: no lookahead, no smoothing.

use crate::stretch::params::ENERGY_EPSILON;

/// Ratio of each frame's energy to the previous frame's.
///
/// The first ratio is always 0 (there is no previous frame);
/// `ratios[i] = energies[i] / (energies[i - 1] + ENERGY_EPSILON)` after that.
pub fn energy_ratios(energies: &[f64]) -> Vec<f64> {
    let mut ratios = Vec::with_capacity(energies.len());
    if energies.is_empty() {
        return ratios;
    }
    ratios.push(0.0);
    ratios.extend(
        energies
            .windows(2)
            .map(|pair| pair[1] / (pair[0] + ENERGY_EPSILON)),
    );
    ratios
}

/// Flags every frame whose energy ratio exceeds `threshold`.
///
/// Frame 0 is never flagged.
pub fn detect_transients(energies: &[f64], threshold: f32) -> Vec<bool> {
    energy_ratios(energies)
        .into_iter()
        .map(|ratio| ratio > threshold as f64)
        .collect()
}

/// Streaming form of [`detect_transients`]: feed frame energies in order.
#[derive(Debug, Clone)]
pub struct TransientDetector {
    threshold: f64,
    prev_energy: Option<f64>,
}

impl TransientDetector {
    /// Creates a detector with the given energy-ratio threshold.
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold as f64,
            prev_energy: None,
        }
    }

    /// Energy-ratio threshold.
    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Observes the next frame's energy and returns its energy ratio.
    pub fn observe(&mut self, energy: f64) -> f64 {
        let ratio = match self.prev_energy {
            Some(prev) => energy / (prev + ENERGY_EPSILON),
            None => 0.0,
        };
        self.prev_energy = Some(energy);
        ratio
    }

    /// Observes the next frame's energy and reports whether it is a
    /// transient candidate.
    #[inline]
    pub fn is_transient(&mut self, energy: f64) -> bool {
        self.observe(energy) > self.threshold
    }

    /// Forgets the previous frame.
    pub fn reset(&mut self) {
        self.prev_energy = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_never_flagged() {
        let flags = detect_transients(&[1000.0, 1000.0], 2.5);
        assert_eq!(flags, vec![false, false]);
        assert!(detect_transients(&[], 2.5).is_empty());
    }

    #[test]
    fn test_ratio_threshold_is_strict() {
        let ratios = energy_ratios(&[1.0, 2.5, 7.0]);
        assert_eq!(ratios[0], 0.0);
        assert!(ratios[1] < 2.5);
        assert!(ratios[2] > 2.5);
        assert_eq!(detect_transients(&[1.0, 2.5, 7.0], 2.5), vec![false, false, true]);
    }

    #[test]
    fn test_silence_to_sound_is_transient() {
        // Epsilon guards the zero denominator: the ratio is finite and huge.
        let ratios = energy_ratios(&[0.0, 1.0]);
        assert!(ratios[1].is_finite());
        assert!(ratios[1] > 1e6);
        let ratios = energy_ratios(&[0.0, 0.0]);
        assert_eq!(ratios[1], 0.0);
    }

    #[test]
    fn test_streaming_matches_batch() {
        let energies = [0.0, 0.5, 3.0, 3.1, 0.2, 9.0, 9.0, 40.0];
        let batch = detect_transients(&energies, 2.5);
        let mut detector = TransientDetector::new(2.5);
        let streamed: Vec<bool> = energies.iter().map(|&e| detector.is_transient(e)).collect();
        assert_eq!(batch, streamed);
    }

    #[test]
    fn test_detector_reset() {
        let mut detector = TransientDetector::new(2.5);
        detector.observe(1.0);
        assert!(detector.is_transient(10.0));
        detector.reset();
        assert!(!detector.is_transient(100.0));
    }
}
