// Resample module - linear-interpolation sample-rate conversion for mono PCM

/// Resample mono `samples` from `src_rate` to `dst_rate`
///
/// The first and last samples are preserved exactly; intermediate samples
/// are linearly interpolated. Output length is
/// `round(len * dst_rate / src_rate)`, at least 1 for non-empty input.
pub fn resample_linear(samples: &[f32], src_rate: u32, dst_rate: u32) -> Vec<f32> {
    if samples.is_empty() || src_rate == 0 || dst_rate == 0 {
        return Vec::new();
    }
    if src_rate == dst_rate || samples.len() == 1 {
        return samples.to_vec();
    }

    let frames = samples.len();
    let target_frames = ((frames as f64) * (dst_rate as f64) / (src_rate as f64))
        .round()
        .max(1.0) as usize;
    if target_frames == 1 {
        return vec![samples[0]];
    }

    let step = (frames - 1) as f64 / (target_frames - 1) as f64;
    (0..target_frames)
        .map(|i| {
            let src_pos = step * i as f64;
            let idx = (src_pos.floor() as usize).min(frames - 1);
            let frac = (src_pos - idx as f64) as f32;
            let s0 = samples[idx];
            let s1 = samples[(idx + 1).min(frames - 1)];
            s0 + (s1 - s0) * frac
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::resample_linear;

    #[test]
    fn resample_empty_returns_empty() {
        assert!(resample_linear(&[], 48_000, 22_050).is_empty());
    }

    #[test]
    fn resample_same_rate_is_identity() {
        let samples = [0.25, -0.5, 0.75];
        assert_eq!(resample_linear(&samples, 22_050, 22_050), samples.to_vec());
    }

    #[test]
    fn resample_44k_to_22k_halves_a_ramp() {
        let samples: Vec<f32> = (0..44_100).map(|i| i as f32 / 44_099.0).collect();
        let out = resample_linear(&samples, 44_100, 22_050);

        assert_eq!(out.len(), 22_050);
        assert_eq!(out[0], 0.0);
        assert!((out[22_049] - 1.0).abs() < 1e-6);
        // A linear ramp stays linear after interpolation
        let expected = 11_024.0 / 22_049.0;
        assert!((out[11_024] - expected).abs() < 1e-4, "got {}", out[11_024]);
    }

    #[test]
    fn resample_single_sample_is_unchanged() {
        assert_eq!(resample_linear(&[0.42], 44_100, 22_050), vec![0.42]);
        assert_eq!(resample_linear(&[-0.3], 8_000, 22_050), vec![-0.3]);
    }

    #[test]
    fn resample_22k_to_44k_fills_between_samples() {
        let samples: Vec<f32> = (0..1_000).map(|i| i as f32).collect();
        let out = resample_linear(&samples, 22_050, 44_100);

        assert_eq!(out.len(), 2_000);
        assert_eq!(out[0], 0.0);
        assert!((out[1_999] - 999.0).abs() < 1e-3);
        for (j, got) in out.iter().enumerate() {
            let expected = j as f32 * 999.0 / 1_999.0;
            assert!((got - expected).abs() < 1e-2, "out[{j}] = {got}, expected {expected}");
        }
    }

    #[test]
    fn resample_48k_to_22k_length() {
        let samples = vec![0.0; 48_000];
        assert_eq!(resample_linear(&samples, 48_000, 22_050).len(), 22_050);
    }
}
