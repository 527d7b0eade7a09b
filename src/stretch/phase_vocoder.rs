//! Transient-aware phase vocoder for one channel.
//!
//! Frames are read from the zero-padded input every `hop_in` samples,
//! analyzed, classified, phase-propagated, resynthesized and overlap-added
//! every `hop_out` samples. Analysis and synthesis run a block of frames at a
//! time (in parallel with the `parallel` feature); transient detection, phase
//! propagation and overlap-add walk the frames strictly in order.

use std::ops::Range;

use log::{debug, trace, warn};

use crate::analysis::spectrum::{SpectralAnalyzer, Spectrum};
use crate::analysis::transient::TransientDetector;
use crate::core::fft::FftPair;
use crate::core::framing::{pad_signal, Framer};
use crate::core::types::StretchParams;
use crate::error::StretchError;
use crate::report::ChannelReport;
use crate::stretch::params::FrameGeometry;
use crate::stretch::phase::{FrameAction, PhasePropagator};
use crate::stretch::synthesis::{OverlapAdd, Synthesizer};

/// Frames analyzed and synthesized together; bounds memory to this many
/// spectra per channel.
pub const BLOCK_FRAMES: usize = 64;

/// A stretched channel and what happened while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelOutput {
    /// Stretched samples, guard regions removed.
    pub samples: Vec<f32>,
    /// Frame counts, transient candidates and phase resets.
    pub report: ChannelReport,
}

/// Phase vocoder configured for one parameter set.
///
/// Holds only immutable configuration and FFT plans; all per-channel state
/// lives inside [`process_channel`](Self::process_channel), so one vocoder
/// can serve any number of channels, concurrently or not.
#[derive(Debug, Clone)]
pub struct PhaseVocoder {
    geometry: FrameGeometry,
    transient_threshold: f32,
    cooldown_frames: usize,
    analyzer: SpectralAnalyzer,
    synthesizer: Synthesizer,
}

impl PhaseVocoder {
    /// Validates `params` and plans the transforms.
    pub fn new(params: &StretchParams) -> Result<Self, StretchError> {
        let geometry = FrameGeometry::from_params(params)?;
        let fft = FftPair::new(geometry.fft_size);
        debug!(
            "phase vocoder: N={} hop_in={} hop_out={} ratio={} (effective {:.5})",
            geometry.fft_size,
            geometry.hop_in,
            geometry.hop_out,
            geometry.stretch_ratio,
            geometry.effective_ratio()
        );
        Ok(Self {
            geometry,
            transient_threshold: params.transient_threshold,
            cooldown_frames: params.cooldown_frames,
            analyzer: SpectralAnalyzer::new(fft.clone()),
            synthesizer: Synthesizer::new(fft, geometry.hop_out),
        })
    }

    /// Resolved frame geometry.
    #[inline]
    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    /// Stretches one channel and returns only the samples.
    pub fn process(&self, input: &[f32]) -> Vec<f32> {
        self.process_channel(input).samples
    }

    /// Stretches one channel.
    ///
    /// The result always has `geometry().output_len(input.len())` samples.
    /// A channel too short to yield a single frame comes back silent.
    pub fn process_channel(&self, input: &[f32]) -> ChannelOutput {
        let geometry = &self.geometry;
        let padded = pad_signal(input, geometry.padding);
        let framer = Framer::new(geometry.fft_size, geometry.hop_in);
        let num_frames = framer.num_frames(padded.len());

        let mut ola = OverlapAdd::new(
            geometry.output_buffer_len(input.len()),
            geometry.hop_out,
            geometry.padding,
        );
        let mut report = ChannelReport {
            input_len: input.len(),
            output_len: geometry.output_len(input.len()),
            frames: num_frames,
            transient_candidates: Vec::new(),
            phase_resets: Vec::new(),
        };

        if num_frames == 0 {
            warn!(
                "channel of {} samples yields no frames at hop {}; output is silent",
                input.len(),
                geometry.hop_in
            );
            return ChannelOutput {
                samples: ola.finish(),
                report,
            };
        }

        let mut detector = TransientDetector::new(self.transient_threshold);
        let mut propagator = PhasePropagator::new(
            geometry.fft_size,
            geometry.hop_in,
            geometry.hop_out,
            self.cooldown_frames,
        );

        for block_start in (0..num_frames).step_by(BLOCK_FRAMES) {
            let block = block_start..(block_start + BLOCK_FRAMES).min(num_frames);
            let spectra = self.analyze_block(&padded, &framer, block);

            let mut phases = Vec::with_capacity(spectra.len());
            for (offset, spectrum) in spectra.iter().enumerate() {
                let index = block_start + offset;
                let is_transient = detector.is_transient(spectrum.energy());
                if is_transient {
                    report.transient_candidates.push(index);
                }
                if propagator.advance(&spectrum.phase, is_transient) == FrameAction::Reset {
                    trace!("phase reset at frame {}", index);
                    report.phase_resets.push(index);
                }
                phases.push(propagator.synthesis_phase().to_vec());
            }

            for (offset, frame) in self.synthesize_block(&spectra, &phases).iter().enumerate() {
                ola.add(block_start + offset, frame);
            }
        }

        debug!(
            "channel: {} -> {} samples, {} frames, {} transient candidates, {} phase resets",
            report.input_len,
            report.output_len,
            report.frames,
            report.transient_candidates.len(),
            report.phase_resets.len()
        );

        ChannelOutput {
            samples: ola.finish(),
            report,
        }
    }

    fn analyze_block(&self, padded: &[f32], framer: &Framer, frames: Range<usize>) -> Vec<Spectrum> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            frames
                .into_par_iter()
                .map(|i| self.analyzer.analyze(framer.frame(padded, i)))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            frames
                .map(|i| self.analyzer.analyze(framer.frame(padded, i)))
                .collect()
        }
    }

    fn synthesize_block(&self, spectra: &[Spectrum], phases: &[Vec<f32>]) -> Vec<Vec<f32>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            spectra
                .par_iter()
                .zip(phases.par_iter())
                .map(|(spectrum, phase)| self.synthesizer.synthesize(&spectrum.magnitude, phase))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            spectra
                .iter()
                .zip(phases.iter())
                .map(|(spectrum, phase)| self.synthesizer.synthesize(&spectrum.magnitude, phase))
                .collect()
        }
    }
}
