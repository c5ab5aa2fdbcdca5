//! Spectral-bank feature extraction.
//!
//! Each 0.05 s frame is concatenated with its immediate neighbors, tapered
//! with a Hann window over the 3-frame span, transformed with a real-input
//! FFT and reduced to 50 log-energy banks over the audible band. Subtitle
//! labels are rasterized on the same frame grid so every downstream sequence
//! shares identical length and indexing.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use tracing::debug;

use crate::audio::AudioTrack;
use crate::config::SyncConfig;
use crate::parallel::maybe_parallel_map;

use super::labels::frame_labels;

/// Lower edge of the retained spectrum in Hz (exclusive).
const AUDIBLE_LOW_HZ: f64 = 20.0;
/// Upper edge of the retained spectrum in Hz (exclusive).
const AUDIBLE_HIGH_HZ: f64 = 20000.0;

/// Equal-length per-frame feature and label sequences.
#[derive(Debug, Clone)]
pub struct FrameFeatures {
    /// One spectral-bank vector per frame.
    pub features: Vec<Vec<f64>>,
    /// One binary (majority-vote) label per frame.
    pub labels: Vec<f64>,
}

/// Errors that can occur during feature extraction.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    /// Sample and label timelines have different lengths.
    #[error("label timeline has {labels} samples, audio has {samples}")]
    LengthMismatch { labels: usize, samples: usize },

    /// Sample rate too low to hold a single frame.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),

    /// Worker pool could not be created.
    #[error("worker pool error: {0}")]
    WorkerPool(String),
}

/// Compute per-frame features and labels for a whole track.
///
/// The track is split into frame-aligned chunks of roughly
/// `config.chunk_secs` which are mapped onto the worker pool independently;
/// frames at a chunk boundary lose one neighbor of taper context, an
/// accepted approximation. Output order always matches the timeline.
///
/// Pure function of its inputs; no I/O.
pub fn compute(
    track: &AudioTrack,
    label_samples: &[bool],
    config: &SyncConfig,
) -> Result<FrameFeatures, FeatureError> {
    if label_samples.len() != track.len() {
        return Err(FeatureError::LengthMismatch {
            labels: label_samples.len(),
            samples: track.len(),
        });
    }

    let frame_size = config.frame_size(track.sample_rate);
    if frame_size == 0 {
        return Err(FeatureError::InvalidSampleRate(track.sample_rate));
    }

    let chunk_frames = (config.chunk_secs / config.frame_secs).round().max(1.0) as usize;
    let chunk_samples = chunk_frames * frame_size;

    let span = SpectralSpan::new(frame_size, config.frame_secs, config.n_banks);
    let fft: Arc<dyn Fft<f64>> = FftPlanner::new().plan_fft_forward(3 * frame_size);

    let chunks: Vec<&[f64]> = track.samples.chunks(chunk_samples).collect();
    let dynamic_range = track.dynamic_range;

    let feature_chunks = maybe_parallel_map(chunks, config.parallelism, |chunk| {
        chunk_features(chunk, dynamic_range, frame_size, &span, &fft)
    })
    .map_err(|e| FeatureError::WorkerPool(e.to_string()))?;

    let features: Vec<Vec<f64>> = feature_chunks.into_iter().flatten().collect();
    let labels: Vec<f64> = label_samples
        .chunks(chunk_samples)
        .flat_map(|chunk| frame_labels(chunk, frame_size))
        .collect();

    debug_assert_eq!(features.len(), labels.len());
    debug!(
        frames = features.len(),
        banks = config.n_banks,
        "extracted frame features"
    );

    Ok(FrameFeatures { features, labels })
}

/// Precomputed audible-band layout of the 3-frame spectrum.
struct SpectralSpan {
    /// Retained (audible) rFFT bin indices, contiguous.
    audible_bins: Vec<usize>,
    /// Bins per bank; trailing remainder bins are dropped.
    bank_size: usize,
    n_banks: usize,
}

impl SpectralSpan {
    fn new(frame_size: usize, frame_secs: f64, n_banks: usize) -> Self {
        let window_secs = 3.0 * frame_secs;
        let n_bins = (3 * frame_size) / 2 + 1;

        let audible_bins: Vec<usize> = (0..n_bins)
            .filter(|&bin| {
                let freq = bin as f64 / window_secs;
                freq > AUDIBLE_LOW_HZ && freq < AUDIBLE_HIGH_HZ
            })
            .collect();

        let bank_size = audible_bins.len() / n_banks;

        Self {
            audible_bins,
            bank_size,
            n_banks,
        }
    }
}

/// Compute spectral-bank features for all whole frames in one chunk.
fn chunk_features(
    samples: &[f64],
    dynamic_range: f64,
    frame_size: usize,
    span: &SpectralSpan,
    fft: &Arc<dyn Fft<f64>>,
) -> Vec<Vec<f64>> {
    let n_frames = samples.len() / frame_size;
    let window_len = 3 * frame_size;
    let window = hann_window(window_len);

    let mut features = Vec::with_capacity(n_frames);
    let mut buffer = vec![Complex::new(0.0, 0.0); window_len];

    for frame in 0..n_frames {
        // Concatenated span: previous frame, this frame, next frame.
        // Out-of-chunk neighbors are zero-filled.
        let begin = frame as isize * frame_size as isize - frame_size as isize;
        for (j, slot) in buffer.iter_mut().enumerate() {
            let idx = begin + j as isize;
            let sample = if idx >= 0 && (idx as usize) < n_frames * frame_size {
                samples[idx as usize]
            } else {
                0.0
            };
            *slot = Complex::new(sample * window[j] / dynamic_range, 0.0);
        }

        fft.process(&mut buffer);

        features.push(compute_banks(&buffer, span));
    }

    features
}

/// Partition the audible magnitude spectrum into equal-width banks and
/// summarize each as `ln(1 + sqrt(sum(magnitude^2)))`.
fn compute_banks(spectrum: &[Complex<f64>], span: &SpectralSpan) -> Vec<f64> {
    let mut banks = Vec::with_capacity(span.n_banks);
    for bank in 0..span.n_banks {
        let begin = bank * span.bank_size;
        let end = begin + span.bank_size;
        let energy: f64 = span.audible_bins[begin..end]
            .iter()
            .map(|&bin| spectrum[bin].norm_sqr())
            .sum();
        banks.push(energy.sqrt().ln_1p());
    }
    banks
}

/// Symmetric Hann window of the given length.
fn hann_window(len: usize) -> Vec<f64> {
    if len < 2 {
        return vec![1.0; len];
    }
    (0..len)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / (len - 1) as f64).cos())
        .collect()
}
