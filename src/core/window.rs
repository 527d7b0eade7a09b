//! Window functions for spectral analysis and resynthesis.
//!
//! Only the symmetric Hann window is used: the same window shapes the
//! analysis frame and the resynthesized frame.

use std::f64::consts::PI;

/// Generates a symmetric Hann window of `size` samples.
///
/// Matches the classic `0.5 * (1 - cos(2*pi*i / (size - 1)))` definition,
/// so both endpoints are zero.
pub fn hann_window(size: usize) -> Vec<f32> {
    match size {
        0 => return vec![],
        1 => return vec![1.0],
        _ => {}
    }
    let n = size as f64;
    (0..size)
        .map(|i| {
            let x = (2.0 * PI * i as f64) / (n - 1.0);
            (0.5 * (1.0 - x.cos())) as f32
        })
        .collect()
}

/// Sum of squared window coefficients.
///
/// Overlap-adding `w^2` at hop `h` sums to roughly `window_energy / h`,
/// which is what the synthesis gain compensates for.
pub fn window_energy(window: &[f32]) -> f64 {
    window.iter().map(|&w| (w as f64) * (w as f64)).sum()
}

/// Applies a window function to a slice in-place.
#[inline]
pub fn apply_window(data: &mut [f32], window: &[f32]) {
    for (sample, &w) in data.iter_mut().zip(window.iter()) {
        *sample *= w;
    }
}
