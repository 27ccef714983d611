//! Pipeline lifecycle state machine.
//!
//! [`PipelineState`] tracks where a capture session is in its life; the
//! orchestrator consults it before every operation and returns
//! [`StateError`] when a call arrives in the wrong state.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of the capture pipeline.
///
/// The state machine transitions are:
///
/// ```text
/// Uninitialized ──init()──▶ Initialized ──start()──▶ Running
///                                │                      │
///                                └───────stop()─────────┴──▶ Stopped
///                                                              │
///                        Initialized ◀──────init()─────────────┘
/// ```
///
/// `stop()` is idempotent and additionally tolerated from any state;
/// `init()` after `stop()` fully re-acquires the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No device acquired yet (or acquisition failed and may be retried).
    Uninitialized,

    /// Device acquired and native rate known; not yet streaming.
    Initialized,

    /// Frames are flowing through the processing chain to the consumer.
    Running,

    /// Torn down.  A new session requires `init()` again.
    Stopped,
}

impl PipelineState {
    /// Returns `true` when `init()` is a valid operation in this state.
    ///
    /// ```
    /// use mic_capture::pipeline::PipelineState;
    ///
    /// assert!(PipelineState::Uninitialized.can_init());
    /// assert!(PipelineState::Stopped.can_init());
    /// assert!(!PipelineState::Running.can_init());
    /// ```
    pub fn can_init(&self) -> bool {
        matches!(self, PipelineState::Uninitialized | PipelineState::Stopped)
    }

    /// Returns `true` when `start()` is a valid operation in this state.
    pub fn can_start(&self) -> bool {
        matches!(self, PipelineState::Initialized)
    }

    /// A short human-readable label for logs and status displays.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Uninitialized => "Uninitialized",
            PipelineState::Initialized => "Initialized",
            PipelineState::Running => "Running",
            PipelineState::Stopped => "Stopped",
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        PipelineState::Uninitialized
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// StateError
// ---------------------------------------------------------------------------

/// A lifecycle operation was called in a state where it is not valid.
///
/// These are programmer errors, reported rather than panicking so a caller
/// can recover (e.g. retry `init()` after a failed one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    /// `init()` is only valid from `Uninitialized` or `Stopped`.
    #[error("init() is not valid while the pipeline is {0}")]
    InitNotAllowed(PipelineState),

    /// `start()` requires a successful `init()` first, and a re-`init()`
    /// after every `stop()`.
    #[error("start() requires an initialized pipeline (currently {0})")]
    StartNotAllowed(PipelineState),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- can_init ---

    #[test]
    fn uninitialized_can_init() {
        assert!(PipelineState::Uninitialized.can_init());
    }

    #[test]
    fn stopped_can_init() {
        assert!(PipelineState::Stopped.can_init());
    }

    #[test]
    fn initialized_cannot_init() {
        assert!(!PipelineState::Initialized.can_init());
    }

    #[test]
    fn running_cannot_init() {
        assert!(!PipelineState::Running.can_init());
    }

    // ---- can_start ---

    #[test]
    fn only_initialized_can_start() {
        assert!(PipelineState::Initialized.can_start());
        assert!(!PipelineState::Uninitialized.can_start());
        assert!(!PipelineState::Running.can_start());
        assert!(!PipelineState::Stopped.can_start());
    }

    // ---- label / Display ---

    #[test]
    fn labels() {
        assert_eq!(PipelineState::Uninitialized.label(), "Uninitialized");
        assert_eq!(PipelineState::Initialized.label(), "Initialized");
        assert_eq!(PipelineState::Running.label(), "Running");
        assert_eq!(PipelineState::Stopped.label(), "Stopped");
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(PipelineState::Running.to_string(), "Running");
    }

    // ---- Default ---

    #[test]
    fn default_state_is_uninitialized() {
        assert_eq!(PipelineState::default(), PipelineState::Uninitialized);
    }

    // ---- StateError messages ---

    #[test]
    fn state_error_names_the_offending_state() {
        let err = StateError::StartNotAllowed(PipelineState::Stopped);
        assert!(err.to_string().contains("Stopped"));

        let err = StateError::InitNotAllowed(PipelineState::Running);
        assert!(err.to_string().contains("Running"));
    }
}
