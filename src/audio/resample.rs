use anyhow::Result;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Resample a mono buffer between sample rates. Speech arrives at
/// 24 kHz; output devices rarely run at that rate.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(
        ratio,
        2.0,
        params,
        samples.len(),
        1, // mono
    )?;

    let input = vec![samples.to_vec()];
    let output = resampler.process(&input, None)?;

    Ok(output.into_iter().next().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_rate_is_identity() {
        let samples = vec![0.0, 0.5, -0.5, 1.0];
        let out = resample(&samples, 24000, 24000).unwrap();
        assert_eq!(out, samples);
    }

    #[test]
    fn upsampling_scales_length() {
        let samples: Vec<f32> = (0..2400).map(|i| (i as f32 / 2400.0).sin()).collect();
        let out = resample(&samples, 24000, 48000).unwrap();
        // Sinc resampling trims edges; expect roughly double the frames.
        let ratio = out.len() as f32 / samples.len() as f32;
        assert!(ratio > 1.8 && ratio < 2.2, "unexpected ratio {ratio}");
    }
}
