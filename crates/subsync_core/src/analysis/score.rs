//! Scoring of candidate transforms.
//!
//! Pure functions that measure how well a skew/shift-transformed label
//! sequence agrees with a speech probability sequence. No I/O, no side
//! effects.

use super::types::ScoreCurve;

/// Score binary labels against probabilistic predictions.
///
/// Computes the expected accuracy if the predictions were independent
/// Bernoulli draws with the given probabilities: a fast proxy for an
/// ROC-AUC style ranking score that avoids any sort-based cost. The divisor
/// is the full sequence length, so an all-one-class input is well defined.
pub fn score_function(labels: &[f64], probs: &[f64]) -> f64 {
    debug_assert_eq!(labels.len(), probs.len());
    let total: f64 = labels
        .iter()
        .zip(probs)
        .map(|(&label, &p)| if label == 1.0 { p } else { 1.0 - p })
        .sum();
    total / labels.len() as f64
}

/// Score a candidate transform applied to the label timeline.
///
/// Every frame index `i` (time `i * frame_secs`) is remapped through `f`,
/// rounded to the nearest frame, and its label scattered into a zeroed
/// array at the target index when that lies in `[0, n)`. Labels mapped out
/// of range are not an error: they feed a multiplicative penalty factor
/// `1 - lost/n` so transforms discarding many labeled frames are disfavored.
pub fn sub_score_transform<F>(labels: &[f64], probs: &[f64], frame_secs: f64, f: F) -> f64
where
    F: Fn(f64) -> f64,
{
    let n = labels.len();
    let mut shifted = vec![0.0; n];
    let mut missed = 0.0;

    for (i, &label) in labels.iter().enumerate() {
        let target = (f(i as f64 * frame_secs) / frame_secs).round() as i64;
        if target >= 0 && (target as usize) < n {
            shifted[target as usize] = label;
        } else {
            missed += label;
        }
    }

    let penalty_factor = 1.0 - missed / n as f64;
    score_function(&shifted, probs) * penalty_factor
}

/// Score one `(skew, shift)` candidate; `shift` is in whole frames.
pub fn sub_score(labels: &[f64], probs: &[f64], frame_secs: f64, shift: i64, skew: f64) -> f64 {
    let shift_secs = shift as f64 * frame_secs;
    sub_score_transform(labels, probs, frame_secs, |t| t * skew + shift_secs)
}

/// Compute the full shift score curve for one fixed skew.
///
/// Shifts run at 1-frame resolution over `[-max_shift_secs, +max_shift_secs]`.
pub fn compute_shift_scores(
    labels: &[f64],
    probs: &[f64],
    frame_secs: f64,
    max_shift_secs: f64,
    skew: f64,
) -> ScoreCurve {
    let min_shift = (-max_shift_secs / frame_secs) as i64;
    let max_shift = (max_shift_secs / frame_secs) as i64;

    let scores = (min_shift..=max_shift)
        .map(|shift| sub_score(labels, probs, frame_secs, shift, skew))
        .collect();

    ScoreCurve { min_shift, scores }
}
