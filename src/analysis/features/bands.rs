// Bands module - BASS/MID/HIGH energy split
//
// Band energy is the mean magnitude over every (bin, frame) cell whose bin
// frequency falls inside the band. The three energies are normalized to
// percentages of their sum.

use super::types::{BandPercentages, FrequencyAxis, Spectrogram};

/// Upper edge of the BASS band (exclusive, Hz)
pub const BASS_UPPER_HZ: f64 = 250.0;

/// Upper edge of the MID band (exclusive, Hz); HIGH runs from here to Nyquist
pub const MID_UPPER_HZ: f64 = 4000.0;

/// Denominator used when the three band energies sum to zero
const DEGENERATE_TOTAL: f64 = 1.0;

/// Frequency band a bin belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Bass,
    Mid,
    High,
}

impl Band {
    /// BASS = [0, 250), MID = [250, 4000), HIGH = [4000, Nyquist]
    pub fn for_frequency(hz: f64) -> Self {
        if hz < BASS_UPPER_HZ {
            Band::Bass
        } else if hz < MID_UPPER_HZ {
            Band::Mid
        } else {
            Band::High
        }
    }

    fn index(self) -> usize {
        match self {
            Band::Bass => 0,
            Band::Mid => 1,
            Band::High => 2,
        }
    }
}

/// Integrates spectrogram magnitude into the three fixed bands
#[derive(Debug, Default, Clone, Copy)]
pub struct BandEnergyAnalyzer;

impl BandEnergyAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Mean magnitude per band, in BASS/MID/HIGH order
    ///
    /// A band that contains no bins has energy 0.
    pub fn band_energies(&self, spectrogram: &Spectrogram, freqs: &FrequencyAxis) -> [f64; 3] {
        let bands: Vec<usize> = freqs
            .as_slice()
            .iter()
            .take(spectrogram.n_bins())
            .map(|&hz| Band::for_frequency(hz).index())
            .collect();

        let mut bins_per_band = [0usize; 3];
        for &band in &bands {
            bins_per_band[band] += 1;
        }

        let mut sums = [0.0f64; 3];
        for frame in spectrogram.frames() {
            for (&magnitude, &band) in frame.iter().zip(&bands) {
                sums[band] += magnitude as f64;
            }
        }

        let n_frames = spectrogram.n_frames();
        let mut energies = [0.0f64; 3];
        for band in 0..3 {
            let cells = bins_per_band[band] * n_frames;
            if cells > 0 {
                energies[band] = sums[band] / cells as f64;
            }
        }
        energies
    }

    /// Normalized band shares in percent
    ///
    /// The three values sum to 100 whenever there is any energy. With zero
    /// total energy the denominator falls back to 1.0, so every band is 0%.
    pub fn band_percentages(
        &self,
        spectrogram: &Spectrogram,
        freqs: &FrequencyAxis,
    ) -> BandPercentages {
        let [bass, mid, high] = self.band_energies(spectrogram, freqs);

        let mut total = bass + mid + high;
        if total.is_nan() || total <= 0.0 {
            total = DEGENERATE_TOTAL;
        }

        BandPercentages {
            bass_pct: bass / total * 100.0,
            mid_pct: mid / total * 100.0,
            high_pct: high / total * 100.0,
        }
    }
}
