mod common;

use approx::assert_abs_diff_eq;
use common::{gen_noise, gen_sine, peak_frequency, rms, SAMPLE_RATE};
use pvtsm::{stretch, stretch_with_report, StretchParams};

#[test]
fn test_identity_length_is_exact() {
    for &len in &[2048, 5000, 44100] {
        let input = gen_sine(440.0, SAMPLE_RATE, len, 0.8);
        let output = stretch(&[input], &StretchParams::new(1.0)).unwrap();
        assert_eq!(output[0].len(), len);
    }
}

#[test]
fn test_identity_reconstructs_steady_sine() {
    let input = gen_sine(440.0, SAMPLE_RATE, 44100, 0.8);
    let (output, report) = stretch_with_report(&[input.clone()], &StretchParams::new(1.0)).unwrap();
    let output = &output[0];

    // A steady tone has no energy jumps once the window is full.
    assert!(report.channels[0].phase_resets.len() <= 1);

    for i in 2048..(input.len() - 2048) {
        assert_abs_diff_eq!(output[i], input[i], epsilon = 1e-2);
    }
}

#[test]
fn test_identity_reconstructs_noise() {
    // Every bin starts from its analysis phase and propagation adds exactly
    // the measured advance back, so any stationary input survives.
    let input = gen_noise(20000, 0.5, 7);
    let output = stretch(&[input.clone()], &StretchParams::new(1.0)).unwrap();
    let interior = 2048..(input.len() - 2048);
    let error: Vec<f32> = interior
        .clone()
        .map(|i| output[0][i] - input[i])
        .collect();
    assert!(rms(&error) < 1e-2 * rms(&input[interior]), "error rms {}", rms(&error));
}

#[test]
fn test_one_second_sine_doubled_keeps_pitch() {
    let input = gen_sine(440.0, SAMPLE_RATE, 44100, 0.8);
    let output = stretch(&[input], &StretchParams::new(2.0)).unwrap();
    let output = &output[0];

    assert_eq!(output.len(), 88200);
    assert!((output.len() as i64 - 88200).abs() <= 4096);
    assert!(output.iter().all(|s| s.is_finite()));

    let interior = &output[4096..output.len() - 4096];
    let peak = peak_frequency(interior, SAMPLE_RATE, 420.0, 460.0, 0.25);
    assert!((peak - 440.0).abs() <= 1.0, "peak at {} Hz", peak);
}

#[test]
fn test_compression_keeps_pitch() {
    let input = gen_sine(1000.0, SAMPLE_RATE, 88200, 0.5);
    let output = stretch(&[input], &StretchParams::new(0.5)).unwrap();
    let output = &output[0];

    assert_eq!(output.len(), 44100);
    let interior = &output[4096..output.len() - 4096];
    let peak = peak_frequency(interior, SAMPLE_RATE, 980.0, 1020.0, 0.25);
    assert!((peak - 1000.0).abs() <= 1.0, "peak at {} Hz", peak);
}
