// FeatureExtractor - DSP feature extraction for drum sample classification
//
// This module extracts the descriptors used for distinguishing between kick,
// snare and hi-hat samples. Features are computed from time-domain and
// frequency-domain representations of the whole sample.
//
// Module organization:
// - types: Data structures (Spectrogram, FrequencyAxis, BandPercentages, FeatureVector)
// - framing: Centered sliding-window framing shared by all frame features
// - fft: STFT front-end (windowed FFT over sliding frames)
// - bands: BASS/MID/HIGH energy split
// - spectral: Frequency-domain features (centroid, rolloff)
// - temporal: Time-domain features (ZCR, RMS)
// - mod.rs: Coordinator (FeatureExtractor)
//
// Feature vector, in order:
// 1. Spectral Centroid: Weighted mean frequency (brightness measure)
// 2. Spectral Rolloff: Frequency below which 85% of magnitude is contained
// 3. Zero-Crossing Rate (ZCR): Rate of sign changes (noise/tonality measure)
// 4. RMS: Root-mean-square amplitude (loudness)
// 5-7. BASS/MID/HIGH band percentages

mod bands;
mod fft;
mod framing;
mod spectral;
mod temporal;
mod types;

pub use bands::{Band, BandEnergyAnalyzer, BASS_UPPER_HZ, MID_UPPER_HZ};
pub use fft::{FftProcessor, SpectralFrontEnd, FFT_SIZE, HOP_LENGTH};
pub use spectral::ROLLOFF_THRESHOLD;
pub use types::{
    format_percent, BandPercentages, FeatureVector, FrequencyAxis, Spectrogram, FEATURE_COUNT,
};

use crate::audio::Waveform;
use crate::config::SpectralConfig;
use spectral::SpectralFeatures;
use temporal::TemporalFeatures;

/// FeatureExtractor coordinates the DSP feature extraction pipeline
///
/// This struct combines the STFT front-end, band analysis, spectral feature
/// extraction and temporal feature extraction into a single interface.
pub struct FeatureExtractor {
    front_end: SpectralFrontEnd,
    band_analyzer: BandEnergyAnalyzer,
    spectral_features: SpectralFeatures,
    temporal_features: TemporalFeatures,
}

impl FeatureExtractor {
    /// Create a FeatureExtractor from spectral configuration
    pub fn new(config: &SpectralConfig) -> Self {
        Self {
            front_end: SpectralFrontEnd::new(config.n_fft, config.hop_length),
            band_analyzer: BandEnergyAnalyzer::new(),
            spectral_features: SpectralFeatures::new(config.rolloff_percent),
            temporal_features: TemporalFeatures::new(config.n_fft, config.hop_length),
        }
    }

    /// Magnitude spectrogram and frequency axis of a waveform
    pub fn compute_spectrum(&self, waveform: &Waveform) -> (Spectrogram, FrequencyAxis) {
        self.front_end
            .compute_spectrum(waveform.samples(), waveform.sample_rate())
    }

    /// BASS/MID/HIGH percentages of a spectrogram
    pub fn band_percentages(
        &self,
        spectrogram: &Spectrogram,
        freqs: &FrequencyAxis,
    ) -> BandPercentages {
        self.band_analyzer.band_percentages(spectrogram, freqs)
    }

    /// Extract the feature vector of a waveform given its band percentages
    ///
    /// Recomputes the spectrogram; use [`FeatureExtractor::analyze`] to get
    /// bands and features from a single STFT pass.
    pub fn extract(&self, waveform: &Waveform, bands: BandPercentages) -> FeatureVector {
        let (spectrogram, freqs) = self.compute_spectrum(waveform);
        self.extract_with_spectrum(waveform, &spectrogram, &freqs, bands)
    }

    /// Extract the feature vector reusing an already computed spectrogram
    pub fn extract_with_spectrum(
        &self,
        waveform: &Waveform,
        spectrogram: &Spectrogram,
        freqs: &FrequencyAxis,
        bands: BandPercentages,
    ) -> FeatureVector {
        let centroid = self.spectral_features.mean_centroid(spectrogram, freqs);
        let rolloff = self.spectral_features.mean_rolloff(spectrogram, freqs);

        let zcr = self.temporal_features.mean_zcr(waveform.samples());
        let rms = self.temporal_features.mean_rms(waveform.samples());

        FeatureVector::new(centroid, rolloff, zcr, rms, bands)
    }

    /// Band percentages and feature vector from one STFT pass
    pub fn analyze(&self, waveform: &Waveform) -> (BandPercentages, FeatureVector) {
        let (spectrogram, freqs) = self.compute_spectrum(waveform);
        let bands = self.band_percentages(&spectrogram, &freqs);
        let features = self.extract_with_spectrum(waveform, &spectrogram, &freqs, bands);
        (bands, features)
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(&SpectralConfig::default())
    }
}
