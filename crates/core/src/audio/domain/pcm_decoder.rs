//! Little-endian signed 16-bit PCM decoding.

use crate::shared::constants::PCM_NORMALIZER;

use super::audio_segment::AudioSegment;

/// Decodes raw s16le bytes into samples in [-1.0, 1.0).
///
/// A trailing unpaired byte is dropped.
pub fn decode(raw: &[u8]) -> Vec<f32> {
    raw.chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / PCM_NORMALIZER)
        .collect()
}

/// Decodes `raw` and tags the samples with `sample_rate`.
pub fn decode_segment(raw: &[u8], sample_rate: u32) -> AudioSegment {
    AudioSegment::new(decode(raw), sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::min(&[0x00, 0x80], -1.0)]
    #[case::max(&[0xFF, 0x7F], 32767.0 / 32768.0)]
    #[case::zero(&[0x00, 0x00], 0.0)]
    #[case::minus_one(&[0xFF, 0xFF], -1.0 / 32768.0)]
    #[case::half(&[0x00, 0x40], 0.5)]
    fn test_decode_single_sample(#[case] raw: &[u8], #[case] expected: f32) {
        let samples = decode(raw);
        assert_eq!(samples.len(), 1);
        assert_relative_eq!(samples[0], expected, epsilon = 1e-6);
    }

    #[test]
    fn test_decode_max_is_just_below_one() {
        let samples = decode(&[0xFF, 0x7F]);
        assert_relative_eq!(samples[0], 0.999969, epsilon = 1e-6);
        assert!(samples[0] < 1.0);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode(&[]).is_empty());
    }

    #[rstest]
    #[case(1, 0)]
    #[case(3, 1)]
    #[case(7, 3)]
    #[case(32001, 16000)]
    fn test_decode_drops_trailing_byte(#[case] len: usize, #[case] expected: usize) {
        let raw = vec![0x12u8; len];
        assert_eq!(decode(&raw).len(), expected);
    }

    #[test]
    fn test_decode_preserves_order() {
        let samples = decode(&[0x00, 0x40, 0x00, 0xC0, 0x00, 0x00]);
        assert_eq!(samples, vec![0.5, -0.5, 0.0]);
    }

    #[test]
    fn test_decode_segment_carries_sample_rate() {
        let seg = decode_segment(&[0u8; 32000], 16000);
        assert_eq!(seg.samples().len(), 16000);
        assert_eq!(seg.duration(), 1.0);
    }
}
