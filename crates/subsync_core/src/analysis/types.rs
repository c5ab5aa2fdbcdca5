//! Core types for the alignment search.

use serde::{Deserialize, Serialize};

/// A linear time transform `f(t) = t * skew + shift`.
///
/// `skew` is a multiplicative speed ratio (1.0 = no frame-rate change);
/// `shift` is an additive offset in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformParams {
    pub skew: f64,
    pub shift_secs: f64,
}

impl TransformParams {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            skew: 1.0,
            shift_secs: 0.0,
        }
    }

    /// Remap a timestamp in seconds.
    pub fn apply(&self, secs: f64) -> f64 {
        secs * self.skew + self.shift_secs
    }

    /// The algebraic inverse; composing the two is the identity up to
    /// floating-point error.
    pub fn inverse(&self) -> Self {
        Self {
            skew: 1.0 / self.skew,
            shift_secs: -self.shift_secs / self.skew,
        }
    }
}

/// One evaluated skew candidate: the best shift found for it, the raw score
/// of that shift and the peak-shape quality of its score curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkewFit {
    /// Candidate skew (speed ratio).
    pub skew: f64,
    /// Human-readable candidate origin, e.g. `"24/25"`.
    pub label: String,
    /// Best shift for this skew, in seconds (sync bias not yet applied).
    pub shift_secs: f64,
    /// Raw score at the best shift.
    pub score: f64,
    /// Quality of fit of the shift score curve.
    pub quality: f64,
}

/// Scores over the contiguous integer shift grid for one fixed skew.
#[derive(Debug, Clone)]
pub struct ScoreCurve {
    /// First shift of the grid, in frames (typically negative).
    pub min_shift: i64,
    /// One score per 1-frame shift step starting at `min_shift`.
    pub scores: Vec<f64>,
}

impl ScoreCurve {
    /// Shift in frames at the given curve index.
    pub fn shift_at(&self, index: usize) -> i64 {
        self.min_shift + index as i64
    }
}

/// Errors that can occur during the alignment search.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Label and probability sequences differ in length.
    #[error("sequence length mismatch: {labels} labels vs {probs} probabilities")]
    LengthMismatch { labels: usize, probs: usize },

    /// Empty input sequences.
    #[error("empty label/probability sequences")]
    EmptyInput,

    /// Labels contain only one class; no alignment signal exists.
    #[error("degenerate labels: every frame is {0}")]
    SingleClass(u8),

    /// No skew candidates configured.
    #[error("no skew candidates to search")]
    NoCandidates,

    /// Worker pool could not be created.
    #[error("worker pool error: {0}")]
    WorkerPool(String),
}

/// Type alias for analysis results.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_composes_with_its_inverse() {
        let params = TransformParams {
            skew: 24.0 / 25.0,
            shift_secs: 4.0,
        };
        let inverse = params.inverse();

        for t in [0.0, 1.5, 60.0, 5400.0] {
            let back = inverse.apply(params.apply(t));
            assert!((back - t).abs() < 1e-9, "round trip of {} gave {}", t, back);
        }
    }

    #[test]
    fn identity_transform_is_a_no_op() {
        let id = TransformParams::identity();
        assert_eq!(id.apply(12.5), 12.5);
    }

    #[test]
    fn score_curve_indexes_from_min_shift() {
        let curve = ScoreCurve {
            min_shift: -3,
            scores: vec![0.0; 7],
        };
        assert_eq!(curve.shift_at(0), -3);
        assert_eq!(curve.shift_at(6), 3);
    }
}
