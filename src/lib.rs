//! Real-time microphone capture and downsampling pipeline.
//!
//! Continuously ingests live microphone audio at the device's native sample
//! rate, decimates it to a fixed target rate (default 16 kHz), quantizes the
//! floating-point samples to signed 16-bit PCM, and hands each resulting
//! buffer to a consumer callback — once per 4096-sample capture period.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → FrameAssembler → AudioFrame (4096 samples)
//!           → decimate → encode_i16 → consumer callback (Vec<i16>)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mic_capture::audio::MicSource;
//! use mic_capture::config::CaptureHints;
//! use mic_capture::pipeline::Pipeline;
//!
//! let source = MicSource::new(CaptureHints::default());
//! let mut pipeline = Pipeline::new(Box::new(source), 16_000);
//!
//! pipeline.init().expect("microphone unavailable");
//! pipeline
//!     .start(|pcm| println!("got {} PCM samples", pcm.len()))
//!     .unwrap();
//!
//! // … later: tear everything down (idempotent).
//! pipeline.stop();
//! ```
//!
//! The consumer callback runs synchronously on the audio thread; heavy work
//! (file writes, network sends) must be handed off, e.g. over an
//! `std::sync::mpsc` channel — see `src/main.rs` for the reference wiring.

pub mod audio;
pub mod config;
pub mod pipeline;
