// Decoder module - turn audio files into mono PCM
//
// WAV files go through hound, with symphonia as fallback when hound cannot
// read the header. Everything else (OGG/Vorbis, FLAC) is probed
// and decoded with symphonia. Multi-channel input is averaged down to mono.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::Waveform;
use crate::error::AnalysisError;

/// Decode `path` to a mono waveform at its native sample rate
pub fn decode_file(path: &Path) -> Result<Waveform, AnalysisError> {
    let is_wav = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);

    if is_wav {
        read_wav(path)
    } else {
        decode_with_symphonia(path)
    }
}

fn read_wav(path: &Path) -> Result<Waveform, AnalysisError> {
    let mut reader = match hound::WavReader::open(path) {
        Ok(reader) => reader,
        Err(err) => {
            tracing::debug!(
                "[Decoder] hound rejected {} ({}), retrying with symphonia",
                path.display(),
                err
            );
            return decode_with_symphonia(path)
                .map_err(|_| AnalysisError::decode_failed(path, err));
        }
    };
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let mut interleaved = match spec.sample_format {
        hound::SampleFormat::Float => read_samples(path, reader.samples::<f32>(), |v: f32| v)?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(AnalysisError::decode_failed(
                    path,
                    format!("unsupported bits per sample {}", spec.bits_per_sample),
                ));
            }
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            read_samples(path, reader.samples::<i32>(), |v: i32| v as f32 / scale)?
        }
    };

    // A truncated data chunk can end mid-frame
    interleaved.truncate(interleaved.len() - interleaved.len() % channels);

    Ok(Waveform::new(
        mix_to_mono(&interleaved, channels),
        spec.sample_rate,
    ))
}

/// Collect samples up to the first read error
///
/// A data chunk shorter than the header claims keeps the samples that are
/// present. An error before any sample was read fails the file.
fn read_samples<T, I, F>(path: &Path, samples: I, convert: F) -> Result<Vec<f32>, AnalysisError>
where
    I: Iterator<Item = hound::Result<T>>,
    F: Fn(T) -> f32,
{
    let mut out = Vec::with_capacity(samples.size_hint().0);
    for sample in samples {
        match sample {
            Ok(value) => out.push(convert(value)),
            Err(err) if out.is_empty() => return Err(AnalysisError::decode_failed(path, err)),
            Err(err) => {
                tracing::warn!(
                    "[Decoder] {} is truncated after {} samples: {}",
                    path.display(),
                    out.len(),
                    err
                );
                break;
            }
        }
    }
    Ok(out)
}

/// Decide whether a packet-read error ends the stream or fails the file
///
/// End of file and reset requests end the stream. Any other error fails the
/// file when nothing has been decoded yet, and truncates it otherwise.
fn end_of_stream(path: &Path, err: SymphoniaError, decoded: usize) -> Result<(), AnalysisError> {
    match err {
        SymphoniaError::IoError(ref io) if io.kind() == std::io::ErrorKind::UnexpectedEof => Ok(()),
        SymphoniaError::ResetRequired => Ok(()),
        err if decoded == 0 => Err(AnalysisError::decode_failed(path, err)),
        err => {
            tracing::warn!("[Decoder] Error reading packet from {}: {}", path.display(), err);
            Ok(())
        }
    }
}

fn decode_with_symphonia(path: &Path) -> Result<Waveform, AnalysisError> {
    let file = File::open(path).map_err(|err| AnalysisError::decode_failed(path, err))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| AnalysisError::decode_failed(path, format!("probe failed: {err}")))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::decode_failed(path, "no audio track found"))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AnalysisError::decode_failed(path, "no sample rate in audio track"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|err| AnalysisError::decode_failed(path, err))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut skipped = 0usize;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(err) => {
                end_of_stream(path, err, samples.len())?;
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(err)) => {
                tracing::warn!("[Decoder] Skipping corrupt packet in {}: {}", path.display(), err);
                skipped += 1;
                continue;
            }
            Err(err) => return Err(AnalysisError::decode_failed(path, err)),
        };

        let spec = *decoded.spec();
        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        samples.extend(mix_to_mono(buffer.samples(), spec.channels.count()));
    }

    if samples.is_empty() && skipped > 0 {
        return Err(AnalysisError::decode_failed(
            path,
            format!("all {skipped} packets failed to decode"),
        ));
    }

    Ok(Waveform::new(samples, sample_rate))
}

/// Average interleaved frames down to a single channel
fn mix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
