//! Synthetic signal generators.
//!
//! Every generator is deterministic: random components come from a seeded
//! `StdRng`, so repeated runs produce identical sample buffers.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::PI;
use std::path::Path;

/// Linear attack time of the synthetic drum envelope.
const ATTACK_SECS: f32 = 0.002;

/// Default length of a synthetic drum hit.
pub const HIT_DURATION_SECS: f32 = 0.5;

/// Pure sine tone.
pub fn sine(sample_rate: u32, frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let len = (sample_rate as f32 * duration_secs) as usize;
    (0..len)
        .map(|i| amplitude * (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Uniform white noise in `[-amplitude, amplitude)`.
pub fn white_noise(len: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| rng.gen_range(-amplitude..amplitude))
        .collect()
}

/// Percussive envelope: short linear attack, exponential decay and a
/// linear taper that reaches zero at the last sample.
fn drum_envelope(t: f32, duration_secs: f32, decay_secs: f32) -> f32 {
    let attack = (t / ATTACK_SECS).min(1.0);
    let taper = (1.0 - t / duration_secs).max(0.0);
    attack * (-t / decay_secs).exp() * taper
}

/// Sum of equal-amplitude partials spread evenly over `[low_hz, high_hz]`
/// with seeded random phases, normalized to `amplitude` RMS.
fn partial_cluster(
    sample_rate: u32,
    low_hz: f32,
    high_hz: f32,
    partials: usize,
    duration_secs: f32,
    amplitude: f32,
    seed: u64,
) -> Vec<f32> {
    let partials = partials.max(1);
    let mut rng = StdRng::seed_from_u64(seed);
    let step = if partials > 1 {
        (high_hz - low_hz) / (partials - 1) as f32
    } else {
        0.0
    };
    let components: Vec<(f32, f32)> = (0..partials)
        .map(|k| (low_hz + step * k as f32, rng.gen_range(0.0..2.0 * PI)))
        .collect();

    // Each partial contributes a^2 / 2 to the mean square
    let per_partial = amplitude * (2.0 / partials as f32).sqrt();
    let len = (sample_rate as f32 * duration_secs) as usize;

    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            components
                .iter()
                .map(|&(freq, phase)| (2.0 * PI * freq * t + phase).sin())
                .sum::<f32>()
                * per_partial
        })
        .collect()
}

fn shape_hit(samples: Vec<f32>, sample_rate: u32, decay_secs: f32) -> Vec<f32> {
    let duration = samples.len() as f32 / sample_rate as f32;
    samples
        .into_iter()
        .enumerate()
        .map(|(i, x)| x * drum_envelope(i as f32 / sample_rate as f32, duration, decay_secs))
        .collect()
}

/// Kick-like hit: a decaying 60 Hz tone.
pub fn kick_hit(sample_rate: u32) -> Vec<f32> {
    let tone = sine(sample_rate, 60.0, HIT_DURATION_SECS, 0.9);
    shape_hit(tone, sample_rate, 0.12)
}

/// Snare-like hit: decaying dense partials across 300 Hz to 3.8 kHz.
pub fn snare_hit(sample_rate: u32, seed: u64) -> Vec<f32> {
    let body = partial_cluster(sample_rate, 300.0, 3800.0, 40, HIT_DURATION_SECS, 0.2, seed);
    shape_hit(body, sample_rate, 0.15)
}

/// Hi-hat-like hit: short burst of partials between 5 kHz and 10 kHz.
pub fn hihat_hit(sample_rate: u32, seed: u64) -> Vec<f32> {
    let body = partial_cluster(sample_rate, 5000.0, 10_000.0, 40, HIT_DURATION_SECS, 0.2, seed);
    shape_hit(body, sample_rate, 0.08)
}

/// Write mono samples as a 16-bit PCM WAV file.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> hound::Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * i16::MAX as f32) as i16)?;
    }
    writer.finalize()
}
