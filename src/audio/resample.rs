//! Sample-rate decimation.
//!
//! Converts one frame of native-rate audio (commonly 44.1/48 kHz) down to the
//! target rate (commonly 16 kHz) by nearest-lower-neighbor point sampling.
//! No band-limiting filter is applied — aliasing is an accepted property of
//! this conversion, chosen for its constant per-sample cost on the real-time
//! path.

// ---------------------------------------------------------------------------
// decimate
// ---------------------------------------------------------------------------

/// Decimate `samples` from `native_rate` Hz to `target_rate` Hz by point
/// sampling.
///
/// With `ratio = native_rate / target_rate`, the output has
/// `floor(len / ratio)` samples and `out[i] = samples[floor(i * ratio)]`.
/// Equal rates return the input unchanged.  Deterministic, stateless, and
/// allocates nothing beyond the output buffer.
///
/// # Preconditions
///
/// `target_rate` must not exceed `native_rate`.  Upsampling is out of
/// contract: the formula still terminates (source indices simply repeat) but
/// the result is degenerate and carries no guarantee.
///
/// # Example
///
/// ```rust
/// use mic_capture::audio::decimate;
///
/// // 48 kHz → 16 kHz keeps every third sample
/// let input: Vec<f32> = (0..12).map(|i| i as f32).collect();
/// let out = decimate(&input, 48_000, 16_000);
/// assert_eq!(out, vec![0.0, 3.0, 6.0, 9.0]);
/// ```
pub fn decimate(samples: &[f32], native_rate: u32, target_rate: u32) -> Vec<f32> {
    if native_rate == target_rate {
        return samples.to_vec();
    }

    let ratio = native_rate as f64 / target_rate as f64;
    let out_len = (samples.len() as f64 / ratio).floor() as usize;

    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let source_index = (i as f64 * ratio).floor() as usize;
        out.push(samples[source_index]);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
