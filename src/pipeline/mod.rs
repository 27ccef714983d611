//! Pipeline orchestration — lifecycle state machine plus the runner that
//! wires capture frames to the consumer callback.
//!
//! # Lifecycle
//!
//! ```text
//! Pipeline::init()   acquire device, read native rate     → Initialized
//! Pipeline::start()  stream frames → decimate → encode    → Running
//! Pipeline::stop()   gate off, fault-isolated teardown    → Stopped
//! ```
//!
//! `stop()` → `init()` re-acquires everything, so a session never straddles
//! a device or sample-rate change.

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{Pipeline, PipelineError};
pub use state::{PipelineState, StateError};
