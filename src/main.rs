//! Demonstration binary — capture the default microphone and stream
//! little-endian 16-bit PCM to a file.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Build the pipeline over a [`MicSource`] and `init()` it — a failure
//!    here means "microphone unavailable" and is reported to the user.
//! 4. `start()` with a callback that only forwards each PCM buffer over an
//!    `std::sync::mpsc` channel; a writer thread appends the bytes to the
//!    output file.  The frame handler itself never touches the filesystem.
//! 5. Wait for Enter, `stop()` (idempotent teardown), report stats.
//!
//! Usage: `mic-capture [output.pcm]` — plays back with e.g.
//! `ffplay -f s16le -ar 16000 -ch_layout mono output.pcm`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::mpsc;

use anyhow::{Context, Result};

use mic_capture::audio::{pcm_to_le_bytes, MicSource};
use mic_capture::config::AppConfig;
use mic_capture::pipeline::Pipeline;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("mic-capture starting up");

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    let target_rate = config.audio.target_sample_rate;

    let out_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "capture.pcm".into());
    let file = File::create(&out_path)
        .with_context(|| format!("failed to create output file {out_path}"))?;

    let source = MicSource::new(config.capture);
    let mut pipeline = Pipeline::new(Box::new(source), target_rate);

    if let Err(e) = pipeline.init() {
        log::error!("Microphone unavailable: {e}");
        anyhow::bail!("microphone unavailable: {e}");
    }

    // PCM buffers are handed off the real-time path here; the file write
    // happens on the writer thread, never inside the frame handler.
    let (tx, rx) = mpsc::channel::<Vec<i16>>();

    let writer_handle = std::thread::Builder::new()
        .name("pcm-writer".into())
        .spawn(move || {
            let mut writer = BufWriter::new(file);
            let mut buffers = 0_u64;
            let mut bytes = 0_u64;

            // Ends when the sender is dropped with the frame handler during
            // pipeline teardown.
            while let Ok(pcm) = rx.recv() {
                let chunk = pcm_to_le_bytes(&pcm);
                if let Err(e) = writer.write_all(&chunk) {
                    log::error!("PCM write failed: {e}");
                    break;
                }
                buffers += 1;
                bytes += chunk.len() as u64;
            }

            if let Err(e) = writer.flush() {
                log::error!("PCM flush failed: {e}");
            }
            (buffers, bytes)
        })
        .expect("failed to spawn pcm-writer thread");

    pipeline
        .start(move |pcm| {
            // Send errors mean the writer is gone; the capture thread must
            // never panic over that.
            let _ = tx.send(pcm);
        })
        .context("failed to start capture pipeline")?;

    println!("Recording to {out_path} … press Enter to stop.");
    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);

    pipeline.stop();

    let (buffers, bytes) = writer_handle
        .join()
        .expect("pcm-writer thread panicked");
    let seconds = bytes as f64 / 2.0 / target_rate as f64;
    log::info!("captured {buffers} buffers, {bytes} bytes (~{seconds:.1} s at {target_rate} Hz)");
    println!("Wrote {bytes} bytes of PCM (~{seconds:.1} s at {target_rate} Hz) to {out_path}");

    Ok(())
}
