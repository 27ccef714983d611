//! Float → 16-bit PCM quantization.
//!
//! Converts `f32` samples in `[-1.0, 1.0]` to signed 16-bit PCM with
//! saturation, plus the little-endian byte view used for transport.

// ---------------------------------------------------------------------------
// encode_i16
// ---------------------------------------------------------------------------

/// Quantize `samples` to signed 16-bit PCM with saturation.
///
/// Each sample is clamped to `[-1.0, 1.0]`, then scaled by 32 768 when
/// negative and 32 767 otherwise, and rounded.  The asymmetric scale matches
/// the standard full-scale convention for signed 16-bit PCM (`i16` has one
/// more negative value than positive).  Out-of-range input is clamped, never
/// rejected — this is a total function with no failure mode.
///
/// # Example
///
/// ```rust
/// use mic_capture::audio::encode_i16;
///
/// assert_eq!(encode_i16(&[0.0, 1.0, -1.0]), vec![0, 32767, -32768]);
/// // Out-of-range input saturates:
/// assert_eq!(encode_i16(&[1.5, -1.5]), vec![32767, -32768]);
/// ```
pub fn encode_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&sample| {
            let s = sample.clamp(-1.0, 1.0);
            if s < 0.0 {
                (s * 32_768.0).round() as i16
            } else {
                (s * 32_767.0).round() as i16
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// pcm_to_le_bytes
// ---------------------------------------------------------------------------

/// Serialize PCM samples as a little-endian byte sequence.
///
/// This is the consumer-facing wire form: two bytes per sample,
/// least-significant byte first.
///
/// ```rust
/// use mic_capture::audio::pcm_to_le_bytes;
///
/// assert_eq!(pcm_to_le_bytes(&[1_i16, -2]), vec![0x01, 0x00, 0xFE, 0xFF]);
/// ```
pub fn pcm_to_le_bytes(pcm: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(pcm.len() * 2);
    for &sample in pcm {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Boundary law ------------------------------------------------------

    #[test]
    fn positive_full_scale() {
        assert_eq!(encode_i16(&[1.0]), vec![32_767]);
    }

    #[test]
    fn negative_full_scale() {
        assert_eq!(encode_i16(&[-1.0]), vec![-32_768]);
    }

    #[test]
    fn zero_maps_to_zero() {
        assert_eq!(encode_i16(&[0.0]), vec![0]);
    }

    // ---- Saturation --------------------------------------------------------

    #[test]
    fn over_range_clamps_to_positive_full_scale() {
        assert_eq!(encode_i16(&[1.5]), vec![32_767]);
    }

    #[test]
    fn under_range_clamps_to_negative_full_scale() {
        assert_eq!(encode_i16(&[-1.5]), vec![-32_768]);
    }

    // ---- Scale and rounding ------------------------------------------------

    #[test]
    fn half_scale_values() {
        assert_eq!(encode_i16(&[0.5]), vec![16_384]); // round(0.5 * 32767) = round(16383.5)
        assert_eq!(encode_i16(&[-0.5]), vec![-16_384]); // round(-0.5 * 32768)
    }

    #[test]
    fn small_values_round_to_nearest() {
        // One LSB step is 1/32767 on the positive side, 1/32768 negative.
        assert_eq!(encode_i16(&[1.0 / 32_767.0]), vec![1]);
        assert_eq!(encode_i16(&[-1.0 / 32_768.0]), vec![-1]);
    }

    #[test]
    fn mixed_buffer_preserves_order() {
        let out = encode_i16(&[0.0, 1.0, -1.0, 0.5, -0.5]);
        assert_eq!(out, vec![0, 32_767, -32_768, 16_384, -16_384]);
    }

    // ---- Byte serialization ------------------------------------------------

    #[test]
    fn le_bytes_layout() {
        // 0x1234 → [0x34, 0x12]; -32768 = 0x8000 → [0x00, 0x80]
        assert_eq!(
            pcm_to_le_bytes(&[0x1234, -32_768]),
            vec![0x34, 0x12, 0x00, 0x80]
        );
    }

    #[test]
    fn le_bytes_length_is_two_per_sample() {
        assert_eq!(pcm_to_le_bytes(&[0; 1365]).len(), 2730);
        assert!(pcm_to_le_bytes(&[]).is_empty());
    }
}
