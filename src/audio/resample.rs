//! Channel downmix and sample-rate conversion.
//!
//! The transcription engine wants 16 kHz mono; capture devices deliver
//! whatever they like (typically 44.1 or 48 kHz, often stereo).  Linear
//! interpolation is plenty for speech headed into Whisper.

// ---------------------------------------------------------------------------
// downmix_to_mono
// ---------------------------------------------------------------------------

/// Average interleaved multi-channel audio down to mono.
///
/// Output length is `samples.len() / channels`.  Already-mono input is
/// returned as an owned copy; zero channels yields an empty vector.
pub fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample
// ---------------------------------------------------------------------------

/// Linear-interpolation resample from `source_rate` to `target_rate` Hz.
///
/// Same-rate input is copied through untouched.
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate {
        return samples.to_vec();
    }
    if samples.is_empty() {
        return Vec::new();
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let output_len = (samples.len() as f64 * ratio).floor() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 / ratio;
        let idx = src_pos as usize;
        let frac = (src_pos - idx as f64) as f32;

        let sample = match samples.get(idx + 1) {
            Some(&next) => samples[idx] * (1.0 - frac) + next * frac,
            None => samples[idx.min(samples.len() - 1)],
        };
        output.push(sample);
    }

    output
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_passthrough() {
        let input = vec![0.1_f32, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&input, 1), input);
    }

    #[test]
    fn stereo_averages_pairs() {
        let out = downmix_to_mono(&[1.0, -1.0, 0.5, 0.5], 2);
        assert_eq!(out.len(), 2);
        assert!(out[0].abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_channels_is_empty() {
        assert!(downmix_to_mono(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn same_rate_is_noop() {
        let input: Vec<f32> = (0..160).map(|i| i as f32 / 160.0).collect();
        assert_eq!(resample(&input, 16_000, 16_000), input);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(resample(&[], 48_000, 16_000).is_empty());
    }

    #[test]
    fn downsample_48k_length() {
        // 10 ms at 48 kHz → 10 ms at 16 kHz
        assert_eq!(resample(&vec![0.5; 480], 48_000, 16_000).len(), 160);
    }

    #[test]
    fn upsample_8k_length() {
        assert_eq!(resample(&vec![0.0; 80], 8_000, 16_000).len(), 160);
    }

    #[test]
    fn dc_signal_amplitude_preserved() {
        for s in resample(&vec![0.5; 480], 48_000, 16_000) {
            assert!((s - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn fractional_ratio_length() {
        // 44.1 kHz → 16 kHz over 1 s gives 16 000 ± 1 samples.
        let out = resample(&vec![0.0; 44_100], 44_100, 16_000);
        assert!(out.len().abs_diff(16_000) <= 1);
    }
}
