//! Zero padding and fixed-hop framing of a channel signal.

/// Returns `signal` with `pad` zeros prepended and appended.
pub fn pad_signal(signal: &[f32], pad: usize) -> Vec<f32> {
    let mut padded = Vec::with_capacity(signal.len() + 2 * pad);
    padded.resize(pad, 0.0);
    padded.extend_from_slice(signal);
    padded.resize(signal.len() + 2 * pad, 0.0);
    padded
}

/// Slices a signal into overlapping frames of `frame_size` samples, one
/// every `hop` samples.
///
/// Frames are borrowed views; nothing is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framer {
    frame_size: usize,
    hop: usize,
}

impl Framer {
    /// Creates a framer. `hop` must be non-zero.
    pub fn new(frame_size: usize, hop: usize) -> Self {
        debug_assert!(hop > 0, "hop must be non-zero");
        Self { frame_size, hop }
    }

    /// Frame length.
    #[inline]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Distance between consecutive frame starts.
    #[inline]
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Number of frames taken from a signal of `len` samples:
    /// `(len - frame_size) / hop`, or 0 when the signal is shorter than
    /// one frame.
    #[inline]
    pub fn num_frames(&self, len: usize) -> usize {
        len.saturating_sub(self.frame_size) / self.hop
    }

    /// Start offset of frame `index`.
    #[inline]
    pub fn frame_start(&self, index: usize) -> usize {
        index * self.hop
    }

    /// Borrow frame `index` of `signal`.
    ///
    /// # Panics
    /// Panics if the frame extends past the end of `signal`; indices below
    /// `num_frames(signal.len())` are always in range.
    #[inline]
    pub fn frame<'a>(&self, signal: &'a [f32], index: usize) -> &'a [f32] {
        let start = self.frame_start(index);
        &signal[start..start + self.frame_size]
    }

    /// Iterates over every frame of `signal` in order.
    pub fn frames<'a>(&self, signal: &'a [f32]) -> impl Iterator<Item = &'a [f32]> + 'a {
        let framer = *self;
        (0..self.num_frames(signal.len())).map(move |i| framer.frame(signal, i))
    }
}
