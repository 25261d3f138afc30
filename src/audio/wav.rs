//! 16-bit PCM/WAV encoding for the transcription subprocess.
//!
//! whisper-cli consumes a plain uncompressed WAV: a 44-byte header followed
//! by little-endian `i16` samples, mono.  Nothing else is supported or
//! needed, so the writer is hand-rolled rather than pulling in an audio
//! container crate.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Size of the canonical RIFF/WAVE header in bytes.
pub const WAV_HEADER_LEN: usize = 44;

// ---------------------------------------------------------------------------
// Sample conversion
// ---------------------------------------------------------------------------

/// Convert normalized `f32` samples to signed 16-bit PCM.
///
/// Values are clamped to `[-1.0, 1.0]` first.  The positive and negative
/// scale factors differ because the `i16` range is asymmetric: non-negative
/// samples scale by 32 767, negative samples by 32 768, so both full-scale
/// inputs map exactly onto `i16::MAX` / `i16::MIN`.
pub fn f32_to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| {
            let s = s.clamp(-1.0, 1.0);
            if s < 0.0 {
                (s * 32_768.0) as i16
            } else {
                (s * 32_767.0) as i16
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Serialize `samples` as a mono 16-bit PCM WAV file body.
///
/// The declared data size is exactly `2 × samples.len()` and the total
/// output length `44 + 2 × samples.len()`.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    const CHANNELS: u16 = 1;
    const BITS_PER_SAMPLE: u16 = 16;

    let bytes_per_sample = u32::from(BITS_PER_SAMPLE / 8);
    let byte_rate = sample_rate * u32::from(CHANNELS) * bytes_per_sample;
    let block_align = CHANNELS * (BITS_PER_SAMPLE / 8);
    let data_size = samples.len() as u32 * bytes_per_sample;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_size as usize);

    // RIFF chunk
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_size).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes()); // fmt chunk size
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM format tag
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }

    out
}

/// Encode and write `samples` to `path`.
pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> io::Result<()> {
    std::fs::write(path, encode_wav(samples, sample_rate))
}

// ---------------------------------------------------------------------------
// Header parsing (diagnostics + tests)
// ---------------------------------------------------------------------------

/// Errors when reading a WAV header back.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WavError {
    #[error("file too short for a WAV header ({0} bytes)")]
    TooShort(usize),
    #[error("not a RIFF/WAVE file")]
    BadMagic,
}

/// The fields of a parsed 44-byte PCM WAV header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Declared size of the data chunk in bytes.
    pub data_size: u32,
}

impl WavHeader {
    /// Parse the canonical header layout produced by [`encode_wav`].
    pub fn parse(bytes: &[u8]) -> Result<Self, WavError> {
        if bytes.len() < WAV_HEADER_LEN {
            return Err(WavError::TooShort(bytes.len()));
        }
        if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" || &bytes[36..40] != b"data" {
            return Err(WavError::BadMagic);
        }

        let u16_at = |i: usize| u16::from_le_bytes([bytes[i], bytes[i + 1]]);
        let u32_at =
            |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);

        Ok(Self {
            channels: u16_at(22),
            sample_rate: u32_at(24),
            bits_per_sample: u16_at(34),
            data_size: u32_at(40),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- f32 → i16 ---------------------------------------------------------

    #[test]
    fn zero_maps_to_zero() {
        assert_eq!(f32_to_i16(&[0.0]), vec![0]);
    }

    #[test]
    fn full_scale_positive_maps_to_max() {
        assert_eq!(f32_to_i16(&[1.0]), vec![i16::MAX]);
    }

    #[test]
    fn full_scale_negative_maps_to_min() {
        assert_eq!(f32_to_i16(&[-1.0]), vec![i16::MIN]);
    }

    #[test]
    fn over_range_clamps() {
        assert_eq!(f32_to_i16(&[1.5]), vec![i16::MAX]);
        assert_eq!(f32_to_i16(&[-1.5]), vec![i16::MIN]);
    }

    #[test]
    fn half_scale_values() {
        let out = f32_to_i16(&[0.5, -0.5]);
        assert_eq!(out[0], (0.5 * 32_767.0) as i16);
        assert_eq!(out[1], (-0.5 * 32_768.0) as i16);
    }

    // ---- Container layout --------------------------------------------------

    #[test]
    fn encoded_sizes_match_sample_count() {
        let samples = vec![0i16; 1_000];
        let bytes = encode_wav(&samples, 16_000);
        assert_eq!(bytes.len(), WAV_HEADER_LEN + 2 * samples.len());

        let header = WavHeader::parse(&bytes).unwrap();
        assert_eq!(header.data_size, 2 * samples.len() as u32);
    }

    #[test]
    fn header_round_trip() {
        let bytes = encode_wav(&[1, -1, 300], 16_000);
        let header = WavHeader::parse(&bytes).unwrap();
        assert_eq!(header.channels, 1);
        assert_eq!(header.sample_rate, 16_000);
        assert_eq!(header.bits_per_sample, 16);
        assert_eq!(header.data_size, 6);
    }

    #[test]
    fn samples_are_little_endian_after_header() {
        let bytes = encode_wav(&[0x0102, -2], 16_000);
        assert_eq!(&bytes[44..46], &[0x02, 0x01]);
        assert_eq!(&bytes[46..48], &(-2i16).to_le_bytes());
    }

    #[test]
    fn riff_size_field_covers_rest_of_file() {
        let bytes = encode_wav(&[0i16; 10], 16_000);
        let riff_size = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        assert_eq!(riff_size as usize, bytes.len() - 8);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(WavHeader::parse(&[0u8; 10]), Err(WavError::TooShort(10)));
        assert_eq!(WavHeader::parse(&[0u8; 44]), Err(WavError::BadMagic));
    }

    #[test]
    fn write_wav_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let samples = f32_to_i16(&[0.0, 0.25, -0.25, 1.0]);

        write_wav(&path, &samples, 16_000).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), WAV_HEADER_LEN + 2 * samples.len());
        let header = WavHeader::parse(&bytes).unwrap();
        assert_eq!(header.sample_rate, 16_000);
        assert_eq!(header.channels, 1);
    }
}
