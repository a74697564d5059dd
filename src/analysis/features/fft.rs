// FFT module - short-time Fourier transform front-end
//
// This module handles FFT computation with Hann windowing to reduce
// spectral leakage, and slides it over the waveform to produce the
// magnitude spectrogram that band and spectral features are computed from.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::framing::{centered_frames, PadMode};
use super::types::{FrequencyAxis, Spectrogram};

/// Default FFT window size (samples)
pub const FFT_SIZE: usize = 2048;

/// Default hop between consecutive frames (samples)
pub const HOP_LENGTH: usize = 512;

/// FFT processor that computes magnitude spectra from audio windows
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Periodic Hann window (pre-computed)
    window: Vec<f32>,
}

impl FftProcessor {
    /// Create a new FFT processor
    ///
    /// # Arguments
    /// * `fft_size` - FFT window size (2048 for the default analysis policy)
    pub fn new(fft_size: usize) -> Self {
        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0 - ((2.0 * std::f32::consts::PI * i as f32) / fft_size as f32).cos())
            })
            .collect();

        let mut planner = FftPlanner::new();
        Self {
            fft: planner.plan_fft_forward(fft_size),
            fft_size,
            window,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Compute magnitude spectrum using FFT
    ///
    /// Applies Hann windowing, performs FFT, and returns magnitude spectrum
    /// for positive frequencies only (exploiting symmetry of real-valued FFT).
    /// Shorter input is zero-padded; longer input is truncated.
    ///
    /// # Returns
    /// Magnitude spectrum (size = fft_size / 2 + 1)
    pub fn compute_magnitude_spectrum(&self, audio: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = audio
            .iter()
            .zip(&self.window)
            .map(|(&sample, &w)| Complex::new(sample * w, 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer[..self.fft_size / 2 + 1]
            .iter()
            .map(|c| c.norm())
            .collect()
    }
}

/// Sliding-window magnitude spectrogram of a waveform
pub struct SpectralFrontEnd {
    processor: FftProcessor,
    hop_length: usize,
}

impl SpectralFrontEnd {
    pub fn new(fft_size: usize, hop_length: usize) -> Self {
        Self {
            processor: FftProcessor::new(fft_size),
            hop_length: hop_length.max(1),
        }
    }

    pub fn fft_size(&self) -> usize {
        self.processor.fft_size()
    }

    /// Magnitude spectrogram and bin frequencies for `samples`
    ///
    /// Frames are centered (zero-padded by half a window at both ends), so
    /// there are `1 + len / hop_length` frames. Empty input produces a
    /// single all-zero frame.
    pub fn compute_spectrum(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> (Spectrogram, FrequencyAxis) {
        let fft_size = self.processor.fft_size();
        let frames = centered_frames(samples, fft_size, self.hop_length, PadMode::Constant)
            .iter()
            .map(|frame| self.processor.compute_magnitude_spectrum(frame))
            .collect();

        (
            Spectrogram::new(frames, fft_size / 2 + 1),
            FrequencyAxis::for_fft(fft_size, sample_rate),
        )
    }
}

impl Default for SpectralFrontEnd {
    fn default() -> Self {
        Self::new(FFT_SIZE, HOP_LENGTH)
    }
}
