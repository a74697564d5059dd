// Framing module - centered sliding windows over a signal
//
// All frame-based features share the same geometry: the signal is padded by
// `frame_length / 2` on each side and cut into frames every `hop_length`
// samples, giving `1 + len / hop_length` frames.

/// How the signal is extended past its ends before framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadMode {
    /// Pad with zeros
    Constant,
    /// Repeat the first/last sample
    Edge,
}

/// Number of centered frames for a signal of `len` samples
pub fn frame_count(len: usize, hop_length: usize) -> usize {
    1 + len / hop_length.max(1)
}

/// Split `samples` into centered frames of `frame_length` samples
///
/// An empty signal yields a single all-zero frame.
pub fn centered_frames(
    samples: &[f32],
    frame_length: usize,
    hop_length: usize,
    pad_mode: PadMode,
) -> Vec<Vec<f32>> {
    let pad = frame_length / 2;
    let (head, tail) = match (pad_mode, samples.first(), samples.last()) {
        (PadMode::Edge, Some(&first), Some(&last)) => (first, last),
        _ => (0.0, 0.0),
    };

    let mut padded = Vec::with_capacity(samples.len() + 2 * pad);
    padded.resize(pad, head);
    padded.extend_from_slice(samples);
    padded.resize(samples.len() + 2 * pad, tail);

    let hop = hop_length.max(1);
    (0..frame_count(samples.len(), hop))
        .map(|i| {
            let start = i * hop;
            let end = (start + frame_length).min(padded.len());
            let mut frame = padded[start.min(end)..end].to_vec();
            frame.resize(frame_length, tail);
            frame
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_matches_centered_geometry() {
        assert_eq!(frame_count(0, 512), 1);
        assert_eq!(frame_count(511, 512), 1);
        assert_eq!(frame_count(512, 512), 2);
        assert_eq!(frame_count(11_025, 512), 22);
    }

    #[test]
    fn test_constant_padding_centers_first_frame() {
        let samples = [1.0, 2.0, 3.0, 4.0];
        let frames = centered_frames(&samples, 4, 2, PadMode::Constant);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], vec![0.0, 0.0, 1.0, 2.0]);
        assert_eq!(frames[1], vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(frames[2], vec![3.0, 4.0, 0.0, 0.0]);
    }

    #[test]
    fn test_edge_padding_repeats_boundary_samples() {
        let samples = [1.0, 2.0, 3.0, 4.0];
        let frames = centered_frames(&samples, 4, 2, PadMode::Edge);
        assert_eq!(frames[0], vec![1.0, 1.0, 1.0, 2.0]);
        assert_eq!(frames[2], vec![3.0, 4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_empty_signal_yields_one_silent_frame() {
        let frames = centered_frames(&[], 8, 4, PadMode::Edge);
        assert_eq!(frames, vec![vec![0.0; 8]]);
    }
}
