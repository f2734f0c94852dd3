use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::PlaybackError;

/// Decoded PCM audio: per-channel normalized samples plus the rate they
/// were produced at. Owned by the playback attempt that decoded it.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn frame_count(&self) -> usize {
        self.channels.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Collapse to mono for the output device. Interleaved speech from
    /// the gateway is mono already; anything wider is averaged.
    pub fn downmix(&self) -> Vec<f32> {
        match self.channels.len() {
            0 => Vec::new(),
            1 => self.channels[0].clone(),
            n => {
                let frames = self.frame_count();
                let mut mono = Vec::with_capacity(frames);
                for i in 0..frames {
                    let sum: f32 = self.channels.iter().map(|c| c[i]).sum();
                    mono.push(sum / n as f32);
                }
                mono
            }
        }
    }
}

/// Decode a base64 payload of interleaved 16-bit little-endian signed
/// PCM into normalized per-channel buffers.
///
/// Samples are scaled by 1/32768, so the result lies in (-1.0, 1.0].
/// Frame count is floor(samples / channels): a trailing partial frame
/// (or a trailing odd byte) is dropped rather than rejected, matching
/// what upstream payloads have always allowed.
pub fn decode_pcm_base64(
    payload: &str,
    sample_rate: u32,
    num_channels: usize,
) -> Result<DecodedAudio, PlaybackError> {
    let bytes = STANDARD.decode(payload)?;

    // Zero channels would make the frame count meaningless; treat it
    // as an empty buffer rather than dividing by zero.
    if num_channels == 0 {
        return Ok(DecodedAudio {
            channels: Vec::new(),
            sample_rate,
        });
    }

    let samples: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();

    let frames = samples.len() / num_channels;

    let mut channels = vec![Vec::with_capacity(frames); num_channels];
    for (c, channel) in channels.iter_mut().enumerate() {
        for i in 0..frames {
            channel.push(samples[i * num_channels + c] as f32 / 32768.0);
        }
    }

    Ok(DecodedAudio {
        channels,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_i16(samples: &[i16]) -> String {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for s in samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        STANDARD.encode(bytes)
    }

    #[test]
    fn mono_reference_samples() {
        let payload = encode_i16(&[0, 16384, -32768, 32767]);
        let audio = decode_pcm_base64(&payload, 24000, 1).unwrap();

        assert_eq!(audio.channel_count(), 1);
        assert_eq!(audio.frame_count(), 4);
        assert_eq!(audio.sample_rate, 24000);

        let ch = &audio.channels[0];
        assert_eq!(ch[0], 0.0);
        assert_eq!(ch[1], 0.5);
        assert_eq!(ch[2], -1.0);
        assert!((ch[3] - 0.999969).abs() < 1e-5);
    }

    #[test]
    fn stereo_deinterleaves_round_robin() {
        // [L0, R0, L1, R1, L2, R2]
        let payload = encode_i16(&[10, -10, 20, -20, 30, -30]);
        let audio = decode_pcm_base64(&payload, 24000, 2).unwrap();

        assert_eq!(audio.channel_count(), 2);
        assert_eq!(audio.frame_count(), 3);

        let left: Vec<i16> = audio.channels[0]
            .iter()
            .map(|s| (s * 32768.0) as i16)
            .collect();
        let right: Vec<i16> = audio.channels[1]
            .iter()
            .map(|s| (s * 32768.0) as i16)
            .collect();
        assert_eq!(left, vec![10, 20, 30]);
        assert_eq!(right, vec![-10, -20, -30]);
    }

    #[test]
    fn round_trip_within_one_quantization_step() {
        let original: Vec<f32> = vec![0.0, 0.25, -0.5, 0.99, -1.0, 0.123456, -0.987654];
        let quantized: Vec<i16> = original
            .iter()
            .map(|s| (s * 32768.0).clamp(-32768.0, 32767.0) as i16)
            .collect();

        let payload = encode_i16(&quantized);
        let audio = decode_pcm_base64(&payload, 24000, 1).unwrap();

        for (a, b) in original.iter().zip(audio.channels[0].iter()) {
            assert!((a - b).abs() <= 1.0 / 32768.0, "{a} vs {b}");
        }
    }

    #[test]
    fn trailing_partial_frame_is_dropped() {
        // 5 samples into 2 channels: only 2 whole frames survive.
        let payload = encode_i16(&[1, 2, 3, 4, 5]);
        let audio = decode_pcm_base64(&payload, 24000, 2).unwrap();
        assert_eq!(audio.frame_count(), 2);

        // A trailing odd byte never forms a sample either.
        let mut bytes = Vec::new();
        for s in [7i16, 8, 9] {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        bytes.push(0xAB);
        let audio = decode_pcm_base64(&STANDARD.encode(bytes), 24000, 1).unwrap();
        assert_eq!(audio.frame_count(), 3);
    }

    #[test]
    fn invalid_base64_is_a_decode_error() {
        let err = decode_pcm_base64("not*valid*base64!", 24000, 1).unwrap_err();
        assert!(matches!(err, PlaybackError::Decode(_)));
    }

    #[test]
    fn empty_payload_decodes_to_empty_buffer() {
        let audio = decode_pcm_base64("", 24000, 1).unwrap();
        assert_eq!(audio.frame_count(), 0);
        assert!(audio.downmix().is_empty());
    }

    #[test]
    fn zero_channels_yield_an_empty_buffer() {
        let payload = encode_i16(&[1, 2, 3, 4]);
        let audio = decode_pcm_base64(&payload, 24000, 0).unwrap();
        assert_eq!(audio.channel_count(), 0);
        assert_eq!(audio.frame_count(), 0);
        assert!(audio.downmix().is_empty());
    }

    #[test]
    fn downmix_averages_channels() {
        let payload = encode_i16(&[16384, -16384, 8192, 8192]);
        let audio = decode_pcm_base64(&payload, 24000, 2).unwrap();
        let mono = audio.downmix();
        assert_eq!(mono.len(), 2);
        assert!(mono[0].abs() < 1e-6);
        assert!((mono[1] - 0.25).abs() < 1e-6);
    }
}
