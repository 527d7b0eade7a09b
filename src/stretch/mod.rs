pub mod params;
pub mod phase;
pub mod phase_vocoder;
pub mod synthesis;

pub use phase::{wrap_phase, FrameAction, PhasePropagator, PhaseState};
pub use phase_vocoder::{ChannelOutput, PhaseVocoder};
pub use synthesis::{OverlapAdd, Synthesizer};
