//! Configuration module for mic-capture.
//!
//! Provides `AppConfig` (top-level settings), `AudioConfig` and
//! `CaptureHints` sub-configs, `AppPaths` for cross-platform data
//! directories, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, AudioConfig, CaptureHints};
