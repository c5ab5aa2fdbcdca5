//! Decoded-audio container.
//!
//! Audio decoding itself is a collaborator concern; the core only consumes
//! raw samples together with their sample rate and dynamic range.

use tracing::warn;

/// Target sample rate for analysis; higher-rate input is decimated.
pub const ANALYSIS_SAMPLE_RATE: f64 = 20000.0;

/// Sample rates below this trigger a warning.
const LOW_RATE_THRESHOLD: f64 = 8000.0;

/// Raw decoded audio, immutable once produced by the decoding collaborator.
#[derive(Debug, Clone)]
pub struct AudioTrack {
    /// Mono samples in their native integer scale.
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Maximum representable magnitude of a sample, used for normalization
    /// (e.g. 32768 for 16-bit audio).
    pub dynamic_range: f64,
}

impl AudioTrack {
    /// Create a track from raw samples.
    pub fn new(samples: Vec<f64>, sample_rate: f64, dynamic_range: f64) -> Self {
        Self {
            samples,
            sample_rate,
            dynamic_range,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check whether the track is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    /// Decimate toward the analysis sample rate by an integer factor.
    ///
    /// Keeps every `floor(sample_rate / 20000)`-th sample; a factor below 1
    /// leaves the track unchanged. Warns when the resulting rate is too low
    /// for reliable speech detection.
    pub fn decimated_for_analysis(&self) -> AudioTrack {
        let factor = (self.sample_rate / ANALYSIS_SAMPLE_RATE).floor().max(1.0) as usize;

        let track = if factor <= 1 {
            self.clone()
        } else {
            AudioTrack {
                samples: self.samples.iter().copied().step_by(factor).collect(),
                sample_rate: self.sample_rate / factor as f64,
                dynamic_range: self.dynamic_range,
            }
        };

        if track.sample_rate < LOW_RATE_THRESHOLD {
            warn!(sample_rate = track.sample_rate, "low sound sample rate");
        }

        track
    }
}
