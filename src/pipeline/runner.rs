//! Pipeline orchestrator — wires capture frames through decimation and PCM
//! encoding into the consumer callback.
//!
//! [`Pipeline`] owns a boxed [`CaptureSource`] (the capture session) and
//! drives the `init → start → stop` lifecycle.  While running, every
//! [`AudioFrame`](crate::audio::AudioFrame) the source delivers is processed
//! synchronously on the capture thread:
//!
//! ```text
//! AudioFrame ─▶ gate (running?) ─▶ decimate ─▶ encode_i16 ─▶ on_pcm(Vec<i16>)
//! ```
//!
//! The processing chain never blocks and never fails mid-stream; the
//! consumer callback runs inside the frame period, so heavy consumers must
//! hand the buffer off (see `src/main.rs` for the mpsc pattern).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::audio::{decimate, encode_i16, CaptureError, CaptureSource, FrameHandler};

use super::state::{PipelineState, StateError};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors surfaced by the pipeline lifecycle operations.
///
/// Two classes, matching how callers react: acquisition failures are
/// user-presentable and retryable; state errors are programmer errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The capture source could not be acquired or started.
    #[error(transparent)]
    Acquisition(#[from] CaptureError),

    /// A lifecycle call arrived in the wrong state.
    #[error(transparent)]
    State(#[from] StateError),
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Capture → decimate → encode → consumer-callback pipeline.
///
/// Owns the capture session exclusively.  All methods take `&mut self`; the
/// pipeline itself is single-threaded by construction — only the capture
/// thread runs the processing chain, and only ever one frame at a time.
pub struct Pipeline {
    source: Box<dyn CaptureSource>,
    target_rate: u32,
    native_rate: Option<u32>,
    state: PipelineState,
    /// Cleared by `stop()` before teardown so a platform callback already in
    /// flight can finish without reaching the consumer.
    running: Arc<AtomicBool>,
}

impl Pipeline {
    /// Create a pipeline over `source`, converting to `target_rate` Hz.
    ///
    /// The source is not touched until [`init`](Self::init).
    pub fn new(source: Box<dyn CaptureSource>, target_rate: u32) -> Self {
        Self {
            source,
            target_rate,
            native_rate: None,
            state: PipelineState::Uninitialized,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Acquire the capture device and record its native sample rate.
    ///
    /// Valid from `Uninitialized` or `Stopped`; a re-`init()` after `stop()`
    /// fully re-acquires the device (the native rate is re-read, so a device
    /// swapped between sessions is picked up here and only here).
    ///
    /// # Errors
    ///
    /// [`PipelineError::State`] when called while initialized or running;
    /// [`PipelineError::Acquisition`] when the device cannot be acquired, in
    /// which case the state is unchanged and the caller may retry.
    pub fn init(&mut self) -> Result<(), PipelineError> {
        if !self.state.can_init() {
            return Err(StateError::InitNotAllowed(self.state).into());
        }

        let native_rate = self.source.acquire()?;
        if self.target_rate > native_rate {
            // Out of the decimation contract; keep going but say so.
            log::warn!(
                "target rate {} Hz exceeds native rate {native_rate} Hz — decimation requires target <= native",
                self.target_rate
            );
        }

        self.native_rate = Some(native_rate);
        self.state = PipelineState::Initialized;
        log::info!(
            "pipeline initialized: {native_rate} Hz native -> {} Hz target",
            self.target_rate
        );
        Ok(())
    }

    /// Begin streaming: every captured frame is decimated, encoded, and
    /// handed to `on_pcm` synchronously, once per frame period.
    ///
    /// `on_pcm` receives ownership of each buffer; the pipeline never reuses
    /// or mutates it afterward.  It runs on the capture thread under a soft
    /// real-time deadline — it must not block.
    ///
    /// # Errors
    ///
    /// [`PipelineError::State`] unless the pipeline is `Initialized`;
    /// [`PipelineError::Acquisition`] when the platform rejects the stream.
    pub fn start<F>(&mut self, mut on_pcm: F) -> Result<(), PipelineError>
    where
        F: FnMut(Vec<i16>) + Send + 'static,
    {
        if !self.state.can_start() {
            return Err(StateError::StartNotAllowed(self.state).into());
        }
        let Some(native_rate) = self.native_rate else {
            return Err(StateError::StartNotAllowed(self.state).into());
        };
        let target_rate = self.target_rate;

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        let handler: FrameHandler = Box::new(move |frame| {
            if !running.load(Ordering::Relaxed) {
                return;
            }
            let resampled = decimate(&frame.samples, native_rate, target_rate);
            let pcm = encode_i16(&resampled);
            on_pcm(pcm);
        });

        if let Err(e) = self.source.begin_streaming(handler) {
            self.running.store(false, Ordering::SeqCst);
            return Err(e.into());
        }

        self.state = PipelineState::Running;
        log::info!("pipeline running");
        Ok(())
    }

    /// Stop streaming and release the capture session.
    ///
    /// Idempotent and infallible from any state.  The running gate is
    /// cleared *before* teardown: a frame already being processed completes,
    /// but no further consumer callbacks occur.  Teardown itself is
    /// fault-isolated inside the source — secondary errors are logged and
    /// swallowed there.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.source.end_streaming();

        if self.state != PipelineState::Stopped {
            log::info!("pipeline stopped");
        }
        self.state = PipelineState::Stopped;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Native sample rate recorded at the last successful `init()`.
    pub fn native_rate(&self) -> Option<u32> {
        self.native_rate
    }

    /// Configured target sample rate in Hz.
    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
