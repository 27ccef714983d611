//! Fixed-size audio frames and the accumulator that produces them.
//!
//! The platform delivers input buffers of whatever length it likes;
//! downstream processing wants whole frames of exactly [`FRAME_SIZE`]
//! mono samples.  [`FrameAssembler`] bridges the two: it extracts the
//! first channel from interleaved input, stages the samples, and emits
//! complete [`AudioFrame`]s in arrival order.

// ---------------------------------------------------------------------------
// FRAME_SIZE
// ---------------------------------------------------------------------------

/// Samples per frame at the native rate (latency/overhead tradeoff).
///
/// At 48 kHz one frame covers ~85 ms; at 44.1 kHz, ~93 ms.
pub const FRAME_SIZE: usize = 4096;

// ---------------------------------------------------------------------------
// AudioFrame
// ---------------------------------------------------------------------------

/// One fixed time slice of captured audio at the native sample rate.
///
/// Always mono, always exactly [`FRAME_SIZE`] samples in `[-1.0, 1.0]`.
/// Each frame is a fresh allocation — the assembler copies out of the
/// platform buffer before the capture callback returns, so a frame never
/// aliases memory the platform may reuse.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Mono PCM samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Native sample rate of this frame in Hz (e.g. 44100, 48000).
    pub sample_rate: u32,
}

// ---------------------------------------------------------------------------
// FrameAssembler
// ---------------------------------------------------------------------------

/// Accumulates interleaved device buffers into whole [`AudioFrame`]s.
///
/// Input buffers may be any length; samples left over after the last
/// complete frame are carried into the next [`push`](Self::push) call.
/// Only channel 0 of a multi-channel buffer is kept (the capture contract
/// is mono).
pub struct FrameAssembler {
    staging: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl FrameAssembler {
    /// Create an assembler for a stream of `channels`-interleaved input at
    /// `sample_rate` Hz.
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            staging: Vec::with_capacity(FRAME_SIZE * 2),
            sample_rate,
            channels,
        }
    }

    /// Feed one interleaved device buffer; returns every frame completed by
    /// it, in order.
    ///
    /// Returns an empty `Vec` while fewer than [`FRAME_SIZE`] samples are
    /// staged (and always for `channels == 0` input, which carries no data).
    pub fn push(&mut self, interleaved: &[f32]) -> Vec<AudioFrame> {
        match self.channels {
            0 => return Vec::new(),
            1 => self.staging.extend_from_slice(interleaved),
            n => self
                .staging
                .extend(interleaved.iter().step_by(n as usize).copied()),
        }

        let mut frames = Vec::new();
        while self.staging.len() >= FRAME_SIZE {
            frames.push(AudioFrame {
                samples: self.staging.drain(..FRAME_SIZE).collect(),
                sample_rate: self.sample_rate,
            });
        }
        frames
    }

    /// Number of staged samples not yet part of a complete frame.
    pub fn pending(&self) -> usize {
        self.staging.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
