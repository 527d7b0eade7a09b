//! Core types, window functions, FFT plans and framing.

pub mod fft;
pub mod framing;
pub mod types;
pub mod window;

pub use framing::{pad_signal, Framer};
pub use types::*;
pub use window::{apply_window, hann_window, window_energy};
