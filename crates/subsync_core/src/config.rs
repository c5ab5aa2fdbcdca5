//! Process-wide fixed configuration.
//!
//! All tunable constants live in a single `SyncConfig` value that is passed
//! explicitly into each component, so multiple searches with different
//! parameters can run concurrently without interference.

use serde::{Deserialize, Serialize};

/// Configuration for the whole alignment pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Duration of one analysis frame in seconds (20 frames per second).
    #[serde(default = "default_frame_secs")]
    pub frame_secs: f64,

    /// Number of spectral banks per frame feature vector.
    #[serde(default = "default_n_banks")]
    pub n_banks: usize,

    /// Length of one parallel feature-extraction chunk in seconds.
    /// Chunk boundaries are aligned to whole frames.
    #[serde(default = "default_chunk_secs")]
    pub chunk_secs: f64,

    /// Maximum subtitle shift searched, in seconds on both sides of zero.
    #[serde(default = "default_max_shift_secs")]
    pub max_shift_secs: f64,

    /// Known frame rates whose pairwise ratios form the skew candidates.
    #[serde(default = "default_frame_rates")]
    pub frame_rates: Vec<f64>,

    /// Fixed skew disabling the skew search, if set.
    #[serde(default)]
    pub fixed_skew: Option<f64>,

    /// Quality-of-fit acceptance threshold (empirically calibrated).
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f64,

    /// Half-window around the score peak used by the monotonicity and
    /// prominence metrics, in seconds.
    #[serde(default = "default_peak_window_secs")]
    pub peak_window_secs: f64,

    /// Tighter half-window used by the non-edgeness metric, in seconds.
    #[serde(default = "default_edge_window_secs")]
    pub edge_window_secs: f64,

    /// Worker parallelism degree; 1 means strictly sequential.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

fn default_frame_secs() -> f64 {
    0.05
}

fn default_n_banks() -> usize {
    50
}

fn default_chunk_secs() -> f64 {
    120.0
}

fn default_max_shift_secs() -> f64 {
    20.0
}

fn default_frame_rates() -> Vec<f64> {
    vec![23.976, 24.0, 25.0]
}

fn default_quality_threshold() -> f64 {
    0.75
}

fn default_peak_window_secs() -> f64 {
    2.0
}

fn default_edge_window_secs() -> f64 {
    0.5
}

fn default_parallelism() -> usize {
    3
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            frame_secs: default_frame_secs(),
            n_banks: default_n_banks(),
            chunk_secs: default_chunk_secs(),
            max_shift_secs: default_max_shift_secs(),
            frame_rates: default_frame_rates(),
            fixed_skew: None,
            quality_threshold: default_quality_threshold(),
            peak_window_secs: default_peak_window_secs(),
            edge_window_secs: default_edge_window_secs(),
            parallelism: default_parallelism(),
        }
    }
}

impl SyncConfig {
    /// Number of samples in one frame at the given sample rate.
    pub fn frame_size(&self, sample_rate: f64) -> usize {
        (self.frame_secs * sample_rate).round() as usize
    }

    /// Fix the skew from plain (`"0.96"`) or fractional (`"24/25"`) notation,
    /// disabling the skew search. Returns `None` on unparseable input.
    pub fn with_fixed_skew(mut self, skew: &str) -> Option<Self> {
        self.fixed_skew = Some(parse_skew(skew)?);
        Some(self)
    }
}

/// Parse a skew given in plain (`"0.96"`) or fractional (`"24/25"`) notation.
pub fn parse_skew(skew: &str) -> Option<f64> {
    let skew = skew.trim();
    if let Some((a, b)) = skew.split_once('/') {
        let a: f64 = a.trim().parse().ok()?;
        let b: f64 = b.trim().parse().ok()?;
        if b == 0.0 {
            return None;
        }
        Some(a / b)
    } else {
        skew.parse().ok()
    }
}
