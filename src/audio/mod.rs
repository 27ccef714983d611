//! Audio capture and conversion — microphone → fixed frames → decimation →
//! 16-bit PCM.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → FrameAssembler → AudioFrame (FRAME_SIZE mono)
//!           → decimate (native → target rate) → encode_i16 → PCM buffer
//! ```
//!
//! [`CaptureSource`] is the seam between the platform and the rest of the
//! crate: [`MicSource`] implements it over cpal; the pipeline never touches
//! cpal directly.

pub mod capture;
pub mod frame;
pub mod pcm;
pub mod resample;

pub use capture::{CaptureError, CaptureSource, FrameHandler, MicSource};
pub use frame::{AudioFrame, FrameAssembler, FRAME_SIZE};
pub use pcm::{encode_i16, pcm_to_le_bytes};
pub use resample::decimate;

// test-only re-exports so pipeline tests can drive a source by hand without
// `use crate::audio::capture::mock::…` paths.
#[cfg(test)]
pub(crate) use capture::{emit, MockSource};
