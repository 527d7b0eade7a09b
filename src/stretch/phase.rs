//! Phase propagation with transient phase resets.
//!
//! Between transients every bin's synthesis phase advances by the output
//! hop's worth of its estimated instantaneous frequency (classic phase
//! vocoder). On an accepted transient the synthesis phase snaps to the
//! analysis phase for all bins at once, restoring the vertical phase
//! coherence of the attack, and further resets are held off for a few frames.

use std::f32::consts::PI;
use std::f64::consts::PI as PI_F64;

const TWO_PI: f32 = 2.0 * PI;

/// Wraps a phase value into `(-PI, PI]`.
///
/// Uses a Euclidean remainder, so large positive and negative inputs wrap
/// the same way.
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    let wrapped = PI - (PI - phase).rem_euclid(TWO_PI);
    // rem_euclid may round up to exactly TWO_PI for tiny negative operands.
    if wrapped <= -PI {
        wrapped + TWO_PI
    } else {
        wrapped
    }
}

/// What the propagator did with a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAction {
    /// First frame: synthesis phase equals analysis phase.
    Initial,
    /// Transient accepted: synthesis phase reset to analysis phase.
    Reset,
    /// Synthesis phase advanced from the previous frame.
    Propagate,
}

/// Cross-frame state of one channel's phase propagation.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseState {
    /// Running synthesis phase per bin, kept in `(-PI, PI]`.
    pub sum_phase: Vec<f32>,
    /// Analysis phase of the previous frame.
    pub last_phase: Vec<f32>,
    /// Frames remaining before another reset is allowed.
    pub cooldown: usize,
}

impl PhaseState {
    /// State after frame 0: both phases equal the frame's analysis phase.
    pub fn from_first_frame(phase: &[f32]) -> Self {
        Self {
            sum_phase: phase.to_vec(),
            last_phase: phase.to_vec(),
            cooldown: 0,
        }
    }
}

/// Frame-by-frame phase propagator for one channel.
///
/// Frames must be fed in increasing order. Each channel needs its own
/// propagator; nothing is shared between instances.
#[derive(Debug, Clone)]
pub struct PhasePropagator {
    hop_in: f32,
    hop_out: f32,
    cooldown_frames: usize,
    /// `2*pi*k*hop_in/N` reduced to `[0, 2*pi)`.
    expected_advance: Vec<f32>,
    /// `2*pi*k*hop_out/N` reduced to `[0, 2*pi)`.
    nominal_advance: Vec<f32>,
    state: Option<PhaseState>,
}

impl PhasePropagator {
    /// Creates a propagator for `fft_size` bins.
    pub fn new(fft_size: usize, hop_in: usize, hop_out: usize, cooldown_frames: usize) -> Self {
        Self {
            hop_in: hop_in as f32,
            hop_out: hop_out as f32,
            cooldown_frames,
            expected_advance: bin_advance(fft_size, hop_in),
            nominal_advance: bin_advance(fft_size, hop_out),
            state: None,
        }
    }

    /// Current state, or `None` before the first frame.
    #[inline]
    pub fn state(&self) -> Option<&PhaseState> {
        self.state.as_ref()
    }

    /// Remaining cooldown frames.
    #[inline]
    pub fn cooldown(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.cooldown)
    }

    /// Synthesis phase of the most recent frame.
    #[inline]
    pub fn synthesis_phase(&self) -> &[f32] {
        self.state.as_ref().map_or(&[], |s| s.sum_phase.as_slice())
    }

    /// Consumes the next frame's analysis phase and transient flag, and
    /// returns what was done. [`synthesis_phase`](Self::synthesis_phase)
    /// holds the result afterwards.
    ///
    /// A transient is accepted only when the cooldown is zero. Acceptance
    /// arms the cooldown with `cooldown_frames`; the counter then drops by
    /// one at the end of every frame, the resetting frame included. With the
    /// default of 3, a reset at frame `i` holds off frames `i + 1` and
    /// `i + 2`, and frame `i + 3` may reset again.
    pub fn advance(&mut self, phase: &[f32], is_transient: bool) -> FrameAction {
        let Some(state) = self.state.as_mut() else {
            self.state = Some(PhaseState::from_first_frame(phase));
            return FrameAction::Initial;
        };
        debug_assert_eq!(phase.len(), state.sum_phase.len());

        let action = if is_transient && state.cooldown == 0 {
            state.sum_phase.copy_from_slice(phase);
            state.cooldown = self.cooldown_frames;
            FrameAction::Reset
        } else {
            let dev_scale = self.hop_out / self.hop_in;
            for (k, sum) in state.sum_phase.iter_mut().enumerate() {
                let phase_diff = phase[k] - state.last_phase[k];
                let deviation = wrap_phase(phase_diff - self.expected_advance[k]);
                // (2*pi*k/N + deviation/hop_in) * hop_out
                *sum = wrap_phase(*sum + self.nominal_advance[k] + deviation * dev_scale);
            }
            FrameAction::Propagate
        };
        if state.cooldown > 0 {
            state.cooldown -= 1;
        }

        state.last_phase.copy_from_slice(phase);
        action
    }

    /// Clears all state; the next frame is treated as frame 0.
    pub fn reset(&mut self) {
        self.state = None;
    }
}

/// Per-bin phase advance `2*pi*k*hop/N` for an exact sinusoid at bin `k`,
/// reduced modulo `2*pi` in integer arithmetic before converting to float.
fn bin_advance(fft_size: usize, hop: usize) -> Vec<f32> {
    (0..fft_size)
        .map(|k| {
            let cycles = (k * hop) % fft_size;
            (2.0 * PI_F64 * cycles as f64 / fft_size as f64) as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_same_angle(a: f32, b: f32, tol: f32) {
        let d = wrap_phase(a - b).abs();
        assert!(d < tol, "angles {} and {} differ by {}", a, b, d);
    }

    #[test]
    fn test_wrap_phase_half_open_interval() {
        // PI stays PI; -PI maps to PI.
        assert_eq!(wrap_phase(PI), PI);
        assert_eq!(wrap_phase(-PI), PI);
        assert_same_angle(wrap_phase(3.0 * PI), PI, 1e-5);
        assert!(wrap_phase(-1e-30) <= 0.0);
    }

    #[test]
    fn test_wrap_phase_crosses_boundary() {
        // Just past +PI lands just above -PI, and vice versa.
        let above = wrap_phase(PI + 0.25);
        assert!(above > -PI && above < -PI + 0.3, "{}", above);
        let below = wrap_phase(-PI - 0.25);
        assert!(below < PI && below > PI - 0.3, "{}", below);
        for turns in [-7i32, -2, 1, 4] {
            let x = 1.2 + turns as f32 * TWO_PI;
            assert!((wrap_phase(x) - 1.2).abs() < 1e-4, "turns {}", turns);
        }
    }

    #[test]
    fn test_first_frame_is_initial() {
        let mut prop = PhasePropagator::new(8, 2, 2, 3);
        let phase = vec![0.1, -0.2, 0.3, 1.0, -3.0, 2.0, 0.0, 0.5];
        assert_eq!(prop.advance(&phase, true), FrameAction::Initial);
        assert_eq!(prop.synthesis_phase(), phase.as_slice());
        assert_eq!(prop.cooldown(), 0);
    }

    #[test]
    fn test_unity_hop_tracks_analysis_phase() {
        // With equal hops, propagation reproduces the analysis phase mod 2*pi.
        let n = 16;
        let mut prop = PhasePropagator::new(n, 4, 4, 3);
        for frame in 0..10 {
            let phase: Vec<f32> = (0..n)
                .map(|k| wrap_phase((frame * 7 + k * 3) as f32 * 0.37))
                .collect();
            prop.advance(&phase, false);
            for k in 0..n {
                assert_same_angle(prop.synthesis_phase()[k], phase[k], 1e-4);
            }
        }
    }

    #[test]
    fn test_bin_centered_sinusoid_advances_by_output_hop() {
        // A sinusoid exactly on bin k advances 2*pi*k*hop_in/N per analysis
        // frame; synthesis must advance 2*pi*k*hop_out/N.
        let n = 64;
        let (hop_in, hop_out) = (8, 16);
        let k = 5;
        let mut prop = PhasePropagator::new(n, hop_in, hop_out, 3);
        let start = 0.3f32;
        for frame in 0..6 {
            let mut phase = vec![0.0; n];
            phase[k] = wrap_phase(start + 2.0 * PI * (k * hop_in * frame) as f32 / n as f32);
            prop.advance(&phase, false);
            let expected = start + 2.0 * PI * (k * hop_out * frame) as f32 / n as f32;
            assert_same_angle(prop.synthesis_phase()[k], expected, 1e-4);
        }
    }

    #[test]
    fn test_reset_snaps_to_analysis_phase() {
        let n = 8;
        let mut prop = PhasePropagator::new(n, 2, 4, 3);
        prop.advance(&vec![0.0; n], false);
        prop.advance(&vec![0.7; n], false);
        let target = vec![-1.0, 1.0, -2.0, 2.0, -3.0, 3.0, 0.5, -0.5];
        assert_eq!(prop.advance(&target, true), FrameAction::Reset);
        assert_eq!(prop.synthesis_phase(), target.as_slice());
        // Armed with 3, then counted down once for the resetting frame.
        assert_eq!(prop.cooldown(), 2);
        assert_eq!(prop.state().unwrap().last_phase, target);
    }

    #[test]
    fn test_cooldown_holds_off_two_frames_after_reset() {
        let n = 4;
        let mut prop = PhasePropagator::new(n, 1, 2, 3);
        let flags = [false, false, true, true, true, true, true, true, false, true];
        let actions: Vec<FrameAction> = flags
            .iter()
            .map(|&t| prop.advance(&vec![0.0; n], t))
            .collect();
        use FrameAction::*;
        assert_eq!(
            actions,
            vec![
                Initial, Propagate, Reset, Propagate, Propagate, Reset, Propagate, Propagate,
                Propagate, Reset
            ]
        );
    }

    #[test]
    fn test_sustained_flags_reset_every_third_frame() {
        let n = 4;
        let mut prop = PhasePropagator::new(n, 1, 2, 3);
        let mut flags = vec![true; 10];
        flags[0] = false;
        let resets: Vec<usize> = flags
            .iter()
            .enumerate()
            .filter(|&(_, &t)| prop.advance(&vec![0.0; n], t) == FrameAction::Reset)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(resets, vec![1, 4, 7]);
    }

    #[test]
    fn test_cooldown_counts_down_once_per_frame() {
        let mut prop = PhasePropagator::new(4, 1, 1, 3);
        prop.advance(&[0.0; 4], false);
        prop.advance(&[0.0; 4], true);
        let mut seen = vec![prop.cooldown()];
        for _ in 0..5 {
            prop.advance(&[0.0; 4], false);
            seen.push(prop.cooldown());
        }
        assert_eq!(seen, vec![2, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_zero_cooldown_resets_every_flagged_frame() {
        let mut prop = PhasePropagator::new(4, 1, 1, 0);
        prop.advance(&[0.0; 4], false);
        for _ in 0..4 {
            assert_eq!(prop.advance(&[0.0; 4], true), FrameAction::Reset);
        }
    }

    #[test]
    fn test_reset_clears_state() {
        let mut prop = PhasePropagator::new(4, 1, 1, 3);
        prop.advance(&[0.0; 4], false);
        prop.advance(&[0.0; 4], true);
        prop.reset();
        assert!(prop.state().is_none());
        assert_eq!(prop.advance(&[0.0; 4], true), FrameAction::Initial);
    }

    #[test]
    fn test_bin_advance_is_reduced() {
        let adv = bin_advance(8, 3);
        // k=3: 9 mod 8 = 1 -> 2*pi/8
        assert!((adv[3] - 2.0 * PI / 8.0).abs() < 1e-6);
        assert!(adv.iter().all(|&a| (0.0..TWO_PI).contains(&a)));
    }
}
