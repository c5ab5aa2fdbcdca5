//! Alignment search between subtitle labels and speech probabilities.
//!
//! The search pipeline consists of pure functions composed by the caller:
//!
//! 1. **Scoring** (`score`): expected-accuracy agreement between a
//!    skew/shift-transformed label sequence and the probability sequence,
//!    with a penalty for labels mapped outside the timeline.
//!
//! 2. **Search** (`search`): the 2D grid of skew candidates (frame-rate
//!    ratios) and 1-frame-resolution shifts, evaluated per skew on the
//!    worker pool.
//!
//! 3. **Quality** (`quality`): peak-shape analysis of a shift score curve,
//!    producing the scalar confidence that separates a genuine match from a
//!    coincidental one.

pub mod quality;
pub mod score;
pub mod search;
pub mod types;

pub use quality::{
    compute_quality, metric_non_edgeness, metric_peak_monotonicity, metric_peak_prominence,
};
pub use score::{compute_shift_scores, score_function, sub_score, sub_score_transform};
pub use search::{find_transform, skew_candidates, SkewCandidate, TransformFit};
pub use types::{AnalysisError, AnalysisResult, ScoreCurve, SkewFit, TransformParams};
