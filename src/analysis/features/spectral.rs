// Spectral module - Frequency-domain feature extraction
//
// This module computes spectral features from magnitude spectra. Per-frame
// values are averaged over all frames of the spectrogram.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

use super::types::{FrequencyAxis, Spectrogram};

/// Spectral rolloff threshold (85% of spectral magnitude)
pub const ROLLOFF_THRESHOLD: f64 = 0.85;

/// Frames whose magnitude sum is below this are treated as silent
const SILENCE_EPSILON: f64 = 1e-10;

/// Spectral feature computation functions
pub struct SpectralFeatures {
    rolloff_percent: f64,
}

impl SpectralFeatures {
    /// Create a new spectral features processor
    ///
    /// # Arguments
    /// * `rolloff_percent` - Fraction of magnitude below the roll-off frequency
    pub fn new(rolloff_percent: f64) -> Self {
        Self { rolloff_percent }
    }

    /// Compute spectral centroid (weighted mean frequency) of one frame
    ///
    /// Formula: centroid = Σ(f_i × |X[i]|) / Σ|X[i]|
    ///
    /// The spectral centroid represents the "center of mass" of the spectrum,
    /// and is a measure of the brightness of a sound.
    ///
    /// # Returns
    /// Spectral centroid in Hz (0 for a silent frame)
    pub fn compute_centroid(&self, spectrum: &[f32], freqs: &[f64]) -> f64 {
        let (weighted_sum, magnitude_sum) = spectrum.iter().zip(freqs).fold(
            (0.0f64, 0.0f64),
            |(weighted, total), (&mag, &freq)| (weighted + freq * mag as f64, total + mag as f64),
        );

        if magnitude_sum > SILENCE_EPSILON {
            weighted_sum / magnitude_sum
        } else {
            0.0
        }
    }

    /// Compute spectral rolloff of one frame
    ///
    /// Finds the lowest bin frequency at which the cumulative magnitude
    /// reaches `rolloff_percent` of the frame total.
    ///
    /// # Returns
    /// Rolloff frequency in Hz (the lowest bin frequency for a silent frame)
    pub fn compute_rolloff(&self, spectrum: &[f32], freqs: &[f64]) -> f64 {
        let total: f64 = spectrum.iter().map(|&mag| mag as f64).sum();
        let lowest = freqs.first().copied().unwrap_or(0.0);

        if total < SILENCE_EPSILON {
            return lowest;
        }

        let threshold = self.rolloff_percent * total;
        let mut cumulative = 0.0;
        for (&mag, &freq) in spectrum.iter().zip(freqs) {
            cumulative += mag as f64;
            if cumulative >= threshold {
                return freq;
            }
        }

        // Rounding can leave the running sum a hair short of the threshold
        freqs
            .get(spectrum.len().saturating_sub(1))
            .copied()
            .unwrap_or(lowest)
    }

    /// Mean spectral centroid over all frames (Hz)
    pub fn mean_centroid(&self, spectrogram: &Spectrogram, freqs: &FrequencyAxis) -> f64 {
        mean_over_frames(spectrogram, |frame| {
            self.compute_centroid(frame, freqs.as_slice())
        })
    }

    /// Mean spectral rolloff over all frames (Hz)
    pub fn mean_rolloff(&self, spectrogram: &Spectrogram, freqs: &FrequencyAxis) -> f64 {
        mean_over_frames(spectrogram, |frame| {
            self.compute_rolloff(frame, freqs.as_slice())
        })
    }
}

impl Default for SpectralFeatures {
    fn default() -> Self {
        Self::new(ROLLOFF_THRESHOLD)
    }
}

fn mean_over_frames<F>(spectrogram: &Spectrogram, per_frame: F) -> f64
where
    F: Fn(&[f32]) -> f64,
{
    let n_frames = spectrogram.n_frames();
    if n_frames == 0 {
        return 0.0;
    }
    spectrogram.frames().map(per_frame).sum::<f64>() / n_frames as f64
}
