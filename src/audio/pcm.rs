// PCM sample conversion and resampling
//
// Pure functions shared by the outbound capture path (float -> 16kHz PCM16 ->
// base64) and the inbound playback path (base64 -> PCM16 -> float). No state:
// repeated calls with identical arguments are deterministic.

use base64::Engine;

/// Linearly resample mono samples from `src_rate` to `dst_rate`.
///
/// Identical rates return a copy; empty input returns an empty vector.
pub fn resample_linear(input: &[f32], src_rate: u32, dst_rate: u32) -> Vec<f32> {
    if input.is_empty() || src_rate == dst_rate {
        return input.to_vec();
    }

    let ratio = src_rate as f64 / dst_rate as f64;
    let out_len = ((input.len() as f64) / ratio).round() as usize;
    let mut output = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let pos = i as f64 * ratio;
        let idx = pos as usize;
        let frac = (pos - idx as f64) as f32;

        let a = input[idx.min(input.len() - 1)];
        let b = input[(idx + 1).min(input.len() - 1)];
        output.push(a + (b - a) * frac);
    }

    output
}

/// Encode float samples in [-1.0, 1.0] as signed 16-bit little-endian PCM.
///
/// Samples are clamped before scaling so that exactly 1.0/-1.0 do not overflow:
/// negative samples scale by 32768, positive by 32767.
pub fn encode_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let s = sample.clamp(-1.0, 1.0);
        let value = if s < 0.0 {
            (s * 32768.0) as i16
        } else {
            (s * 32767.0) as i16
        };
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decode signed 16-bit little-endian PCM bytes to float samples.
///
/// A trailing odd byte is ignored rather than rejected; truncated payloads are
/// a per-message condition the receive path tolerates.
pub fn decode_pcm16(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect()
}

/// Base64-encode bytes for text transport (standard alphabet).
pub fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 text back to bytes. Exact inverse of [`encode_base64`].
pub fn decode_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    base64::engine::general_purpose::STANDARD.decode(text)
}

/// Root-mean-square amplitude of a frame, used as the visualizer level.
///
/// Silence yields exactly 0.0; a full-scale square wave yields 1.0.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_silence_is_zero() {
        let frame = vec![0.0f32; 4096];
        assert_eq!(rms(&frame), 0.0);
    }

    #[test]
    fn test_rms_full_scale_square_is_one() {
        let frame: Vec<f32> = (0..4096)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        assert_eq!(rms(&frame), 1.0);
    }

    #[test]
    fn test_rms_empty_frame() {
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_base64_round_trip() {
        let cases: Vec<Vec<u8>> = vec![
            vec![],
            vec![0u8; 64],
            vec![0xFFu8; 64],
            (0..=255u8).collect(),
        ];

        for bytes in cases {
            let encoded = encode_base64(&bytes);
            let decoded = decode_base64(&encoded).unwrap();
            assert_eq!(decoded, bytes);
        }
    }

    #[test]
    fn test_pcm16_clamps_at_full_scale() {
        let bytes = encode_pcm16(&[1.0, -1.0, 1.5, -1.5]);
        let decoded = decode_pcm16(&bytes);

        assert_eq!(decoded.len(), 4);
        // Positive full scale encodes to 32767, negative to -32768.
        assert!((decoded[0] - 32767.0 / 32768.0).abs() < 1e-6);
        assert_eq!(decoded[1], -1.0);
        assert_eq!(decoded[2], decoded[0]);
        assert_eq!(decoded[3], -1.0);
    }

    #[test]
    fn test_pcm16_decode_ignores_trailing_byte() {
        let samples = decode_pcm16(&[0x00, 0x40, 0x7F]);
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_resample_identity_and_empty() {
        let input = vec![0.1, 0.2, 0.3];
        assert_eq!(resample_linear(&input, 16000, 16000), input);
        assert!(resample_linear(&[], 48000, 16000).is_empty());
    }

    #[test]
    fn test_resample_halves_length() {
        let input = vec![0.5f32; 4096];
        let output = resample_linear(&input, 32000, 16000);
        assert_eq!(output.len(), 2048);
        assert!(output.iter().all(|&s| (s - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_resample_is_deterministic() {
        let input: Vec<f32> = (0..1000).map(|i| (i as f32 * 0.01).sin()).collect();
        let a = resample_linear(&input, 44100, 16000);
        let b = resample_linear(&input, 44100, 16000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sine_round_trip_within_quantization_bounds() {
        // 440Hz sine at 48kHz, resampled to 16kHz, encoded and decoded,
        // compared against a directly generated 16kHz sine.
        let freq = 440.0f32;
        let src: Vec<f32> = (0..4800)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / 48000.0).sin() * 0.8)
            .collect();

        let resampled = resample_linear(&src, 48000, 16000);
        let decoded = decode_pcm16(&encode_pcm16(&resampled));

        let reference: Vec<f32> = (0..decoded.len())
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / 16000.0).sin() * 0.8)
            .collect();

        let max_err = decoded
            .iter()
            .zip(reference.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);

        // Linear interpolation error dominates quantization here; bound is
        // loose but catches frequency or scaling mistakes outright.
        assert!(max_err < 0.05, "max error {} out of bounds", max_err);
    }
}
