//! Microphone capture via `cpal`.
//!
//! [`CaptureSource`] is the capability interface over live mono capture:
//! acquire the device, stream fixed-size [`AudioFrame`]s to a handler,
//! release everything.  [`MicSource`] is the production adapter built on
//! cpal's default host; the pipeline only ever sees the trait, so tests
//! drive it with [`MockSource`] instead of real hardware.
//!
//! One frame is delivered per [`FRAME_SIZE`] captured samples, strictly in
//! arrival order, from cpal's dedicated audio thread.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use crate::config::CaptureHints;

use super::frame::{AudioFrame, FrameAssembler, FRAME_SIZE};

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while acquiring the device or starting the stream.
///
/// These are the recoverable acquisition failures a caller may present to the
/// user ("microphone unavailable") and retry; none of them is retried
/// automatically.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    /// Reported by backends that surface an explicit denial; hosts that
    /// don't typically fail with [`DefaultConfig`](Self::DefaultConfig) or
    /// [`BuildStream`](Self::BuildStream) instead.
    #[error("microphone access denied by the platform")]
    PermissionDenied,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("streaming requested before the device was acquired")]
    NotAcquired,
}

// ---------------------------------------------------------------------------
// CaptureSource trait
// ---------------------------------------------------------------------------

/// Handler invoked once per completed frame, on the capture thread.
pub type FrameHandler = Box<dyn FnMut(AudioFrame) + Send + 'static>;

/// Capability interface over a live mono capture source.
///
/// # Contract
///
/// - [`acquire`](Self::acquire) claims the device and returns its native
///   sample rate, fixed for the life of the session.  Ready but not yet
///   streaming.
/// - [`begin_streaming`](Self::begin_streaming) registers the frame handler
///   and starts delivery: exactly [`FRAME_SIZE`] mono samples per frame, one
///   frame at a time, in order.  Fails with [`CaptureError::NotAcquired`]
///   before a successful `acquire` or after `end_streaming`.
/// - [`end_streaming`](Self::end_streaming) is idempotent and never fails;
///   it disconnects the handler and releases every resource it can, even
///   when an individual teardown step errors.
pub trait CaptureSource {
    /// Claim the input device; returns its native sample rate in Hz.
    fn acquire(&mut self) -> Result<u32, CaptureError>;

    /// Start streaming frames to `on_frame`.
    fn begin_streaming(&mut self, on_frame: FrameHandler) -> Result<(), CaptureError>;

    /// Stop streaming and release the device.  Idempotent.
    fn end_streaming(&mut self);
}

// Compile-time assertion: Box<dyn CaptureSource> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn CaptureSource>) {}
};

// ---------------------------------------------------------------------------
// MicSource
// ---------------------------------------------------------------------------

/// Production [`CaptureSource`] built on cpal's default host and input device.
///
/// Uses the device's preferred stream configuration, so the native sample
/// rate is whatever the hardware reports (commonly 44 100 or 48 000 Hz).
/// Multi-channel devices are reduced to mono by keeping channel 0.
///
/// The wrapped `cpal::Stream` is not `Send` on all platforms; keep a
/// `MicSource` (and the pipeline that owns it) on one thread.
pub struct MicSource {
    hints: CaptureHints,
    device: Option<cpal::Device>,
    config: Option<cpal::StreamConfig>,
    stream: Option<cpal::Stream>,
    sample_rate: u32,
    channels: u16,
}

impl MicSource {
    /// Create an unacquired source carrying the given capture hints.
    ///
    /// The hints (echo cancellation, noise suppression, auto gain) are
    /// forwarded to the platform where the host supports them and ignored
    /// otherwise — best-effort per the capture contract, never an error.
    pub fn new(hints: CaptureHints) -> Self {
        Self {
            hints,
            device: None,
            config: None,
            stream: None,
            sample_rate: 0,
            channels: 0,
        }
    }
}

impl CaptureSource for MicSource {
    fn acquire(&mut self) -> Result<u32, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;

        let supported = device.default_input_config()?;
        self.channels = supported.channels();
        self.sample_rate = supported.sample_rate().0;
        self.config = Some(supported.into());
        self.device = Some(device);

        log::debug!(
            "capture hints (best-effort): echo_cancellation={}, noise_suppression={}, auto_gain_control={}",
            self.hints.echo_cancellation,
            self.hints.noise_suppression,
            self.hints.auto_gain_control
        );
        log::info!(
            "acquired input device: {} Hz, {} channel(s)",
            self.sample_rate,
            self.channels
        );

        Ok(self.sample_rate)
    }

    fn begin_streaming(&mut self, mut on_frame: FrameHandler) -> Result<(), CaptureError> {
        let device = self.device.as_ref().ok_or(CaptureError::NotAcquired)?;
        let config = self.config.as_ref().ok_or(CaptureError::NotAcquired)?;

        let mut assembler = FrameAssembler::new(self.sample_rate, self.channels);

        let stream = device.build_input_stream(
            config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                for frame in assembler.push(data) {
                    on_frame(frame);
                }
            },
            |err: cpal::StreamError| {
                log::error!("cpal stream error: {err}");
            },
            None, // no timeout
        )?;

        stream.play()?;
        self.stream = Some(stream);
        log::info!("capture streaming started ({FRAME_SIZE} samples per frame)");
        Ok(())
    }

    fn end_streaming(&mut self) {
        // Each step is guarded independently so one failure never blocks the
        // release of the remaining resources.
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                log::warn!("failed to pause input stream during teardown: {e}");
            }
            // Dropping the stream disconnects the callback and stops the
            // hardware stream regardless of whether pause succeeded.
            drop(stream);
            log::info!("capture streaming stopped");
        }

        self.config = None;
        self.device = None;
    }
}

// ---------------------------------------------------------------------------
// MockSource (test-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) use mock::{emit, MockSource};

#[cfg(test)]
mod mock {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::{AudioFrame, CaptureError, CaptureSource, FrameHandler};

    /// Shared slot holding the handler registered by `begin_streaming`.
    ///
    /// Tests keep a clone and use [`emit`] to push frames "from the device",
    /// including after teardown to prove nothing is delivered then.
    pub(crate) type HandlerSlot = Arc<Mutex<Option<FrameHandler>>>;

    /// Hardware-free [`CaptureSource`] stub for pipeline tests.
    pub(crate) struct MockSource {
        sample_rate: u32,
        fail_acquire: Arc<AtomicBool>,
        handler: HandlerSlot,
        acquires: Arc<AtomicUsize>,
        releases: Arc<AtomicUsize>,
    }

    impl MockSource {
        pub(crate) fn new(sample_rate: u32) -> Self {
            Self {
                sample_rate,
                fail_acquire: Arc::new(AtomicBool::new(false)),
                handler: Arc::new(Mutex::new(None)),
                acquires: Arc::new(AtomicUsize::new(0)),
                releases: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Flag shared with the test: while `true`, `acquire` fails with
        /// [`CaptureError::PermissionDenied`].
        pub(crate) fn fail_acquire_flag(&self) -> Arc<AtomicBool> {
            Arc::clone(&self.fail_acquire)
        }

        pub(crate) fn handler_slot(&self) -> HandlerSlot {
            Arc::clone(&self.handler)
        }

        pub(crate) fn acquire_count(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.acquires)
        }

        pub(crate) fn release_count(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.releases)
        }
    }

    impl CaptureSource for MockSource {
        fn acquire(&mut self) -> Result<u32, CaptureError> {
            self.acquires.fetch_add(1, Ordering::SeqCst);
            if self.fail_acquire.load(Ordering::SeqCst) {
                return Err(CaptureError::PermissionDenied);
            }
            Ok(self.sample_rate)
        }

        fn begin_streaming(&mut self, on_frame: FrameHandler) -> Result<(), CaptureError> {
            *self.handler.lock().unwrap() = Some(on_frame);
            Ok(())
        }

        fn end_streaming(&mut self) {
            self.handler.lock().unwrap().take();
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Deliver `frame` through the slot, as the capture thread would.
    /// A released slot (handler gone) delivers nothing.
    pub(crate) fn emit(slot: &HandlerSlot, frame: AudioFrame) {
        if let Some(handler) = slot.lock().unwrap().as_mut() {
            handler(frame);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Frames must be able to cross onto the capture thread.
    #[test]
    fn frame_handler_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<FrameHandler>();
    }

    // ---- MicSource state guards (no hardware required) ---------------------

    #[test]
    fn begin_streaming_before_acquire_is_rejected() {
        let mut source = MicSource::new(CaptureHints::default());
        let result = source.begin_streaming(Box::new(|_| {}));
        assert!(matches!(result, Err(CaptureError::NotAcquired)));
    }

    #[test]
    fn end_streaming_before_acquire_is_a_noop() {
        let mut source = MicSource::new(CaptureHints::default());
        source.end_streaming();
        source.end_streaming(); // idempotent, must not panic
    }

    #[test]
    fn begin_streaming_after_end_streaming_is_rejected() {
        let mut source = MicSource::new(CaptureHints::default());
        source.end_streaming();
        let result = source.begin_streaming(Box::new(|_| {}));
        assert!(matches!(result, Err(CaptureError::NotAcquired)));
    }

    // ---- MockSource wiring -------------------------------------------------

    #[test]
    fn mock_delivers_frames_until_released() {
        let mut source = MockSource::new(48_000);
        let slot = source.handler_slot();

        let rate = source.acquire().expect("mock acquire");
        assert_eq!(rate, 48_000);

        let received = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let received_clone = std::sync::Arc::clone(&received);
        source
            .begin_streaming(Box::new(move |_frame| {
                received_clone.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            }))
            .expect("mock begin_streaming");

        let frame = AudioFrame {
            samples: vec![0.0; FRAME_SIZE],
            sample_rate: 48_000,
        };
        emit(&slot, frame.clone());
        emit(&slot, frame.clone());
        assert_eq!(received.load(std::sync::atomic::Ordering::SeqCst), 2);

        source.end_streaming();
        emit(&slot, frame);
        assert_eq!(received.load(std::sync::atomic::Ordering::SeqCst), 2);
    }
}
