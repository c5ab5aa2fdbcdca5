//! Rasterization of subtitle intervals onto the frame grid.

use crate::subtitles::types::SubtitleEvent;

/// Rasterize subtitle intervals onto the sample timeline.
///
/// Sample indices in `[round(sr * begin), round(sr * end))` are marked as
/// speech; everything else stays silent. Indices outside `[0, n)` are
/// clipped, and a reversed interval (end before begin) marks nothing.
pub fn build_label_samples(events: &[SubtitleEvent], sample_rate: f64, n: usize) -> Vec<bool> {
    let mut samples = vec![false; n];
    for event in events {
        let begin = ((sample_rate * event.begin_secs).round().max(0.0) as usize).min(n);
        let end = ((sample_rate * event.end_secs).round().max(0.0) as usize)
            .min(n)
            .max(begin);
        for slot in &mut samples[begin..end] {
            *slot = true;
        }
    }
    samples
}

/// Reduce a label sample timeline to one value per frame.
///
/// A frame is labeled 1 iff speech is present for the strict majority of its
/// span; an exactly half-covered frame stays 0. A trailing partial frame is
/// discarded, mirroring feature extraction.
pub fn frame_labels(label_samples: &[bool], frame_size: usize) -> Vec<f64> {
    label_samples
        .chunks_exact(frame_size)
        .map(|frame| {
            let ones = frame.iter().filter(|&&v| v).count();
            if 2 * ones > frame_size {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}
