#![allow(dead_code)]

use std::f32::consts::PI;
use std::f64::consts::PI as PI_F64;

pub const SAMPLE_RATE: u32 = 44100;

pub fn gen_sine(freq_hz: f32, sr: u32, n: usize, amp: f32) -> Vec<f32> {
    (0..n)
        .map(|i| amp * (2.0 * PI * freq_hz * i as f32 / sr as f32).sin())
        .collect()
}

/// `silence` zeros, then a sine whose amplitude grows by `growth` per sample
/// from `start_amp` until it reaches `max_amp`.
pub fn gen_swell(
    silence: usize,
    n: usize,
    freq_hz: f32,
    start_amp: f32,
    growth: f32,
    max_amp: f32,
) -> Vec<f32> {
    let mut out = vec![0.0f32; silence];
    out.extend((0..n).map(|i| {
        let amp = (start_amp * (growth * i as f32).exp()).min(max_amp);
        amp * (2.0 * PI * freq_hz * i as f32 / SAMPLE_RATE as f32).sin()
    }));
    out
}

/// Deterministic pseudo-random noise in `[-amp, amp]`.
pub fn gen_noise(n: usize, amp: f32, seed: u32) -> Vec<f32> {
    let mut state = seed.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            amp * (state as f32 / u32::MAX as f32 * 2.0 - 1.0)
        })
        .collect()
}

pub fn rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    (signal.iter().map(|x| x * x).sum::<f32>() / signal.len() as f32).sqrt()
}

/// Hann-weighted DFT magnitude at an arbitrary frequency.
pub fn magnitude_at(signal: &[f32], sr: u32, freq_hz: f64) -> f64 {
    let n = signal.len();
    if n < 2 {
        return 0.0;
    }
    let mut re = 0.0f64;
    let mut im = 0.0f64;
    for (i, &s) in signal.iter().enumerate() {
        let w = 0.5 - 0.5 * (2.0 * PI_F64 * i as f64 / (n - 1) as f64).cos();
        let angle = 2.0 * PI_F64 * freq_hz * i as f64 / sr as f64;
        re += w * s as f64 * angle.cos();
        im -= w * s as f64 * angle.sin();
    }
    (re * re + im * im).sqrt()
}

/// Frequency with the largest magnitude among `lo..=hi` in `step` increments.
pub fn peak_frequency(signal: &[f32], sr: u32, lo: f64, hi: f64, step: f64) -> f64 {
    let steps = ((hi - lo) / step).round() as usize;
    (0..=steps)
        .map(|i| lo + i as f64 * step)
        .map(|f| (f, magnitude_at(signal, sr, f)))
        .fold((lo, f64::MIN), |best, cur| if cur.1 > best.1 { cur } else { best })
        .0
}

/// Cooldown rule applied to a list of flagged frames: a flag becomes a reset
/// only when at least `cooldown` frames have passed since the last reset, the
/// resetting frame itself counting as the first.
pub fn expected_resets(candidates: &[usize], cooldown: usize) -> Vec<usize> {
    let mut resets: Vec<usize> = Vec::new();
    for &frame in candidates {
        match resets.last() {
            Some(&last) if frame < last + cooldown => {}
            _ => resets.push(frame),
        }
    }
    resets
}
