// Temporal module - Time-domain feature extraction
//
// This module computes features directly from time-domain audio signals:
// zero-crossing rate and RMS loudness. Both are evaluated on the same
// centered frame grid as the spectrogram and averaged over frames.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

use super::framing::{centered_frames, PadMode};

/// Samples with an absolute value at or below this count as zero (positive)
const ZERO_THRESHOLD: f32 = 1e-10;

/// Temporal feature computation functions
pub struct TemporalFeatures {
    frame_length: usize,
    hop_length: usize,
}

impl TemporalFeatures {
    /// Create a new temporal features processor
    ///
    /// # Arguments
    /// * `frame_length` - Frame size in samples
    /// * `hop_length` - Distance between frame starts in samples
    pub fn new(frame_length: usize, hop_length: usize) -> Self {
        Self {
            frame_length: frame_length.max(1),
            hop_length: hop_length.max(1),
        }
    }

    /// Compute zero-crossing rate (ZCR) of one frame
    ///
    /// Counts adjacent sample pairs whose signs differ and divides by the
    /// frame length. Near-zero samples are treated as positive so that
    /// silence or DC offset never registers as crossings.
    ///
    /// # Returns
    /// Zero-crossing rate (0.0 to 1.0)
    pub fn compute_zcr(&self, frame: &[f32]) -> f64 {
        if frame.len() < 2 {
            return 0.0;
        }

        let is_negative = |x: f32| x < -ZERO_THRESHOLD;
        let crossings = frame
            .windows(2)
            .filter(|pair| is_negative(pair[0]) != is_negative(pair[1]))
            .count();

        crossings as f64 / frame.len() as f64
    }

    /// Compute root-mean-square amplitude of one frame
    pub fn compute_rms(&self, frame: &[f32]) -> f64 {
        if frame.is_empty() {
            return 0.0;
        }
        let energy: f64 = frame.iter().map(|&x| (x as f64) * (x as f64)).sum();
        (energy / frame.len() as f64).sqrt()
    }

    /// Mean zero-crossing rate over edge-padded centered frames
    pub fn mean_zcr(&self, samples: &[f32]) -> f64 {
        let frames = centered_frames(samples, self.frame_length, self.hop_length, PadMode::Edge);
        mean(frames.iter().map(|frame| self.compute_zcr(frame)), frames.len())
    }

    /// Mean RMS over zero-padded centered frames
    pub fn mean_rms(&self, samples: &[f32]) -> f64 {
        let frames =
            centered_frames(samples, self.frame_length, self.hop_length, PadMode::Constant);
        mean(frames.iter().map(|frame| self.compute_rms(frame)), frames.len())
    }
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        values.sum::<f64>() / count as f64
    }
}
