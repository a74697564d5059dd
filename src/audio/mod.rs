// Audio module - file decoding and sample-rate conversion
//
// Everything the analysis pipeline consumes is a mono `Waveform` at
// `TARGET_SAMPLE_RATE`. Decoding WAV/OGG/FLAC and resampling happen here so
// the spectral code never sees container formats or channel layouts.

pub mod decoder;
pub mod resample;

use std::path::Path;

use crate::error::AnalysisError;

pub use decoder::decode_file;
pub use resample::resample_linear;

/// Sample rate all spectral computations assume (Hz)
pub const TARGET_SAMPLE_RATE: u32 = 22_050;

/// Mono PCM samples at a known sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Convert to `target_rate`, consuming self when no conversion is needed
    pub fn resampled(self, target_rate: u32) -> Self {
        if self.sample_rate == target_rate {
            return self;
        }
        let samples = resample_linear(&self.samples, self.sample_rate, target_rate);
        Self::new(samples, target_rate)
    }
}

/// Decode `path` and bring it to the analysis sample rate
pub fn load_for_analysis(path: &Path) -> Result<Waveform, AnalysisError> {
    let waveform = decode_file(path)?;
    let source_rate = waveform.sample_rate();
    let waveform = waveform.resampled(TARGET_SAMPLE_RATE);
    tracing::debug!(
        "[Decoder] {} decoded: {} samples @ {} Hz (source {} Hz)",
        path.display(),
        waveform.len(),
        waveform.sample_rate(),
        source_rate
    );
    Ok(waveform)
}
