//! End-to-end synchronization pipeline.
//!
//! Composes the pure stages: decimation, label rasterization, feature
//! extraction, augmentation, speech detection, and the shift/skew search.
//! A low quality of fit is a normal outcome reported as `success = false`;
//! the best-effort transform is still returned so the caller can choose to
//! apply or discard it.

use std::path::Path;

use tracing::{info, warn};

use crate::analysis::{self, AnalysisError, TransformParams};
use crate::audio::AudioTrack;
use crate::config::SyncConfig;
use crate::features::{self, augment, build_label_samples, FeatureError};
use crate::model::{ModelError, SpeechModel};
use crate::subtitles::{
    read_srt_file, transform_events, write_srt_file, SubtitleData, SubtitleError,
};

/// Subtitle and audio lengths differing by more than this fraction suggest
/// a wrong subtitle file.
const LENGTH_MISMATCH_WARN: f64 = 0.25;

/// Errors that can occur during synchronization.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Feature extraction failed.
    #[error("feature extraction failed: {0}")]
    Feature(#[from] FeatureError),

    /// Model loading or inference failed.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Alignment search failed.
    #[error("alignment search failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// Subtitle I/O failed.
    #[error("subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),
}

/// Outcome of a synchronization run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Whether the quality of fit cleared the acceptance threshold.
    pub success: bool,
    /// Quality of fit of the winning candidate.
    pub quality: f64,
    /// Best-fit transform, valid even when `success` is false.
    pub transform: TransformParams,
}

impl SyncReport {
    /// Winning skew (speed ratio).
    pub fn skew(&self) -> f64 {
        self.transform.skew
    }

    /// Winning shift in seconds.
    pub fn shift_secs(&self) -> f64 {
        self.transform.shift_secs
    }
}

/// Estimate the transform aligning subtitles with the audio track.
pub fn synchronize(
    track: &AudioTrack,
    subtitles: &SubtitleData,
    model: &SpeechModel,
    config: &SyncConfig,
) -> Result<SyncReport, SyncError> {
    let track = track.decimated_for_analysis();

    if subtitles.is_empty() {
        warn!("empty subtitle file");
    } else {
        let subs_secs = subtitles.duration_secs();
        let audio_secs = track.duration_secs();
        let rel_err = (subs_secs - audio_secs).abs() / subs_secs.max(audio_secs);
        if rel_err > LENGTH_MISMATCH_WARN {
            warn!(
                subtitle_secs = subs_secs,
                audio_secs = audio_secs,
                "subtitle and audio lengths differ substantially, wrong subtitle file?"
            );
        }
    }

    info!(
        samples = track.len(),
        parallelism = config.parallelism,
        "computing frame features"
    );
    let label_samples = build_label_samples(&subtitles.events, track.sample_rate, track.len());
    let frames = features::compute(&track, &label_samples, config)?;

    let augmented = augment(&frames.features);
    let probs = model.predict(&augmented)?;
    info!(frames = probs.len(), "speech detection done, fitting transform");

    let fit = analysis::find_transform(&frames.labels, &probs, model.sync_bias, config)?;

    let success = fit.quality > config.quality_threshold;
    info!(
        quality = fit.quality,
        threshold = config.quality_threshold,
        success,
        skew = fit.params.skew,
        shift_secs = fit.params.shift_secs,
        "fit complete"
    );

    Ok(SyncReport {
        success,
        quality: fit.quality,
        transform: fit.params,
    })
}

/// Synchronize an SRT file against a track and write the remapped result.
///
/// The output is written even on a low-quality fit, with sequence numbers
/// reassigned from 1 and text bytes untouched.
pub fn synchronize_files(
    track: &AudioTrack,
    subtitle_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    model: &SpeechModel,
    config: &SyncConfig,
) -> Result<SyncReport, SyncError> {
    let subtitles = read_srt_file(subtitle_path)?;
    let report = synchronize(track, &subtitles, model, config)?;

    let remapped = transform_events(&subtitles, |t| report.transform.apply(t));
    write_srt_file(output_path, &remapped)?;

    Ok(report)
}
