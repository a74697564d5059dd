// Types module - Data structures shared by the feature extraction pipeline
//
// The spectrogram and frequency axis are intermediate artifacts. The band
// percentages and the feature vector are part of every analysis result.

use serde::{Serialize, Serializer};

/// Number of values in a [`FeatureVector`]
pub const FEATURE_COUNT: usize = 7;

/// Magnitude spectrogram indexed by (frequency bin, time frame)
///
/// Stored frame-major: each frame holds `n_bins` non-negative magnitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    frames: Vec<Vec<f32>>,
    n_bins: usize,
}

impl Spectrogram {
    pub fn new(frames: Vec<Vec<f32>>, n_bins: usize) -> Self {
        debug_assert!(frames.iter().all(|frame| frame.len() == n_bins));
        Self { frames, n_bins }
    }

    /// Number of frequency bins per frame
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Number of time frames
    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    /// Iterate over frames, each a slice of `n_bins` magnitudes
    pub fn frames(&self) -> impl Iterator<Item = &[f32]> {
        self.frames.iter().map(Vec::as_slice)
    }
}

/// Bin center frequencies in Hz, monotonically increasing from 0 to Nyquist
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyAxis(Vec<f64>);

impl FrequencyAxis {
    /// Frequencies for a real FFT of `n_fft` points at `sample_rate`
    pub fn for_fft(n_fft: usize, sample_rate: u32) -> Self {
        let bin_width = sample_rate as f64 / n_fft as f64;
        Self((0..=n_fft / 2).map(|k| k as f64 * bin_width).collect())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Share of spectral energy in the BASS, MID and HIGH bands (percent)
///
/// Serialized with the presentation format `"NN.N%"` under the keys
/// `BASS`, `MID` and `HIGH`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BandPercentages {
    #[serde(rename = "BASS", serialize_with = "serialize_percent")]
    pub bass_pct: f64,
    #[serde(rename = "MID", serialize_with = "serialize_percent")]
    pub mid_pct: f64,
    #[serde(rename = "HIGH", serialize_with = "serialize_percent")]
    pub high_pct: f64,
}

impl BandPercentages {
    pub fn total(&self) -> f64 {
        self.bass_pct + self.mid_pct + self.high_pct
    }
}

/// Format a percentage with one decimal place and a `%` sign
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn serialize_percent<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_percent(*value))
}

/// Fixed-order descriptor consumed by every classifier
///
/// Order: `[spectral_centroid, spectral_rolloff, zero_crossing_rate, rms,
/// bass_pct, mid_pct, high_pct]`. Trained models depend on this order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub const CENTROID: usize = 0;
    pub const ROLLOFF: usize = 1;
    pub const ZCR: usize = 2;
    pub const RMS: usize = 3;
    pub const BASS_PCT: usize = 4;
    pub const MID_PCT: usize = 5;
    pub const HIGH_PCT: usize = 6;

    pub fn new(
        spectral_centroid: f64,
        spectral_rolloff: f64,
        zero_crossing_rate: f64,
        rms: f64,
        bands: BandPercentages,
    ) -> Self {
        Self([
            spectral_centroid,
            spectral_rolloff,
            zero_crossing_rate,
            rms,
            bands.bass_pct,
            bands.mid_pct,
            bands.high_pct,
        ])
    }

    pub fn spectral_centroid(&self) -> f64 {
        self.0[Self::CENTROID]
    }

    pub fn spectral_rolloff(&self) -> f64 {
        self.0[Self::ROLLOFF]
    }

    pub fn zero_crossing_rate(&self) -> f64 {
        self.0[Self::ZCR]
    }

    pub fn rms(&self) -> f64 {
        self.0[Self::RMS]
    }

    pub fn bass_pct(&self) -> f64 {
        self.0[Self::BASS_PCT]
    }

    pub fn mid_pct(&self) -> f64 {
        self.0[Self::MID_PCT]
    }

    pub fn high_pct(&self) -> f64 {
        self.0[Self::HIGH_PCT]
    }

    pub fn bands(&self) -> BandPercentages {
        BandPercentages {
            bass_pct: self.bass_pct(),
            mid_pct: self.mid_pct(),
            high_pct: self.high_pct(),
        }
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
