//! Quality-of-fit analysis of a shift score curve.
//!
//! Turns the shape of the curve around its maximum into a scalar confidence:
//! the product of peak monotonicity, peak prominence and non-edgeness, each
//! in [0, 1]. The window sizes and the 20 %-of-range walk-out threshold are
//! empirically calibrated constants.

use crate::config::SyncConfig;

/// Fraction of the local score range used when walking outward from the
/// maximum to delimit the peak's extent.
const WALK_OUT_THRESHOLD: f64 = 0.2;

/// First index of the maximum value (ties resolve to the earliest index).
pub(crate) fn argmax_first(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Clamp a half-window in seconds around the curve maximum to the curve.
///
/// Returns `(low_bound, best, high_bound)` with `high_bound` exclusive.
fn find_max_window(scores: &[f64], frame_secs: f64, half_window_secs: f64) -> (usize, usize, usize) {
    let wnd = (half_window_secs / frame_secs).ceil() as usize;
    let best = argmax_first(scores);
    let low_bound = best.saturating_sub(wnd);
    let high_bound = (best + wnd + 1).min(scores.len());
    (low_bound, best, high_bound)
}

/// The curve split around its peak.
struct PeakParts<'a> {
    /// Ascent into the peak, from the walk-out point to the maximum.
    peak_up: &'a [f64],
    /// Descent out of the peak, from the maximum to the walk-out point.
    peak_down: &'a [f64],
    /// Everything left of the ascent.
    before_peak: &'a [f64],
    /// Everything right of the descent.
    after_peak: &'a [f64],
}

/// Isolate the peak's local extent by walking outward from the maximum until
/// the curve drops below `low + 0.2 * (high - low)` on each side.
fn find_peak(scores: &[f64], frame_secs: f64, half_window_secs: f64) -> PeakParts<'_> {
    let (low_bound, best, high_bound) = find_max_window(scores, frame_secs, half_window_secs);

    let before = &scores[low_bound..=best];
    let after = &scores[best..high_bound];

    let low = before
        .iter()
        .chain(after)
        .fold(f64::INFINITY, |acc, &v| acc.min(v));
    let high = scores[best];
    let limit = low + (high - low) * WALK_OUT_THRESHOLD;

    // First point below the limit leaving the peak to the right; when none
    // exists the remainder overlaps the peak itself, which zeroes the
    // prominence metric.
    let (down_len, after_start) = match after.iter().position(|&v| v < limit) {
        None | Some(0) => (after.len() - 1, best.saturating_sub(1)),
        Some(end) => (end, best + end),
    };

    // First point below the limit approaching the peak from the left.
    let begin = match before.iter().rev().position(|&v| v < limit) {
        None | Some(0) => 0,
        Some(k) => before.len() - k,
    };

    PeakParts {
        peak_up: &before[begin..],
        peak_down: &after[..down_len],
        before_peak: &scores[..low_bound + begin],
        after_peak: &scores[after_start..],
    }
}

/// Fraction of strictly rising adjacent steps.
fn mean_raising(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let rising = values.windows(2).filter(|w| w[1] > w[0]).count();
    rising as f64 / (values.len() - 1) as f64
}

/// Fraction of clean monotone steps ascending into and descending out of
/// the peak; the minimum of the two one-sided fractions.
pub fn metric_peak_monotonicity(scores: &[f64], frame_secs: f64, half_window_secs: f64) -> f64 {
    let parts = find_peak(scores, frame_secs, half_window_secs);

    let up = mean_raising(parts.peak_up);
    let down_reversed: Vec<f64> = parts.peak_down.iter().rev().copied().collect();
    let down = mean_raising(&down_reversed);

    up.min(down)
}

/// How far the maximum sits from the boundary of the search window: the
/// ratio of the shorter side's span to the longer side's. 1 when centered,
/// 0 when the maximum is a window-edge artifact.
pub fn metric_non_edgeness(scores: &[f64], frame_secs: f64, half_window_secs: f64) -> f64 {
    let (low_bound, best, high_bound) = find_max_window(scores, frame_secs, half_window_secs);
    let right = high_bound - best;
    let left = best - low_bound;
    let longer = right.max(left);
    if longer == 0 {
        return 0.0;
    }
    right.min(left) as f64 / longer as f64
}

/// How much the peak rises above the curve just outside its extent; a peak
/// that barely clears its surroundings scores near 0, an isolated spike
/// near 1. Zero-height peaks score 0, never an arithmetic fault.
pub fn metric_peak_prominence(scores: &[f64], frame_secs: f64, half_window_secs: f64) -> f64 {
    let parts = find_peak(scores, frame_secs, half_window_secs);

    fn one_sided(peak: &[f64], others: &[f64]) -> f64 {
        if peak.is_empty() {
            return 0.0;
        }
        if others.is_empty() {
            return 1.0;
        }
        let peak_high = peak.iter().fold(f64::NEG_INFINITY, |a, &v| a.max(v));
        let peak_low = peak.iter().fold(f64::INFINITY, |a, &v| a.min(v));
        let peak_height = peak_high - peak_low;
        if peak_height <= 0.0 {
            return 0.0;
        }
        let others_high = others.iter().fold(f64::NEG_INFINITY, |a, &v| a.max(v));
        (1.0 - (others_high - peak_low) / peak_height).min(1.0)
    }

    let before = one_sided(parts.peak_up, parts.before_peak);
    let after = one_sided(parts.peak_down, parts.after_peak);
    before.min(after)
}

/// Scalar confidence that the curve's maximum is a genuine alignment peak.
///
/// Product of the three peak-shape metrics, clamped to [0, 1]. Degenerate
/// curves (flat, too short, maximum at an edge) score 0.
pub fn compute_quality(scores: &[f64], config: &SyncConfig) -> f64 {
    if scores.len() < 2 {
        return 0.0;
    }

    let monotonicity = metric_peak_monotonicity(scores, config.frame_secs, config.peak_window_secs);
    let prominence = metric_peak_prominence(scores, config.frame_secs, config.peak_window_secs);
    let non_edgeness = metric_non_edgeness(scores, config.frame_secs, config.edge_window_secs);

    (monotonicity * prominence * non_edgeness).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SyncConfig {
        SyncConfig::default()
    }

    /// A clean triangular peak centered in an otherwise flat curve.
    fn triangular_curve(len: usize, center: usize, ramp: usize) -> Vec<f64> {
        let mut scores = vec![0.0; len];
        for step in 0..=ramp {
            let height = step as f64 / ramp as f64;
            scores[center - ramp + step] = height;
            scores[center + ramp - step] = height;
        }
        scores
    }

    #[test]
    fn triangular_spike_has_quality_near_one() {
        let scores = triangular_curve(801, 400, 4);
        let quality = compute_quality(&scores, &config());
        assert!(quality > 0.9, "expected ~1, got {}", quality);
    }

    #[test]
    fn flat_curve_has_quality_zero() {
        let scores = vec![0.5; 801];
        assert_eq!(compute_quality(&scores, &config()), 0.0);
    }

    #[test]
    fn quality_is_always_within_bounds() {
        let curves: Vec<Vec<f64>> = vec![
            vec![],
            vec![1.0],
            vec![0.0, 1.0],
            triangular_curve(801, 400, 4),
            // Jagged curve with a higher plateau elsewhere.
            (0..801)
                .map(|i| if i % 7 == 0 { 0.9 } else { 0.3 })
                .collect(),
            // Monotone ramp: maximum at the very edge.
            (0..801).map(|i| i as f64 / 800.0).collect(),
        ];

        for scores in curves {
            let quality = compute_quality(&scores, &config());
            assert!(
                (0.0..=1.0).contains(&quality),
                "quality {} out of bounds",
                quality
            );
        }
    }

    #[test]
    fn edge_maximum_scores_zero() {
        // Maximum at the first index: the left window side has zero span.
        let mut scores = vec![0.1; 801];
        scores[0] = 1.0;
        assert_eq!(compute_quality(&scores, &config()), 0.0);
    }

    #[test]
    fn jagged_peak_scores_below_clean_peak() {
        let clean = triangular_curve(801, 400, 8);

        let mut jagged = triangular_curve(801, 400, 8);
        // Break the monotone ascent and descent.
        jagged[396] = 0.05;
        jagged[398] = 0.1;
        jagged[403] = 0.02;

        let clean_q = compute_quality(&clean, &config());
        let jagged_q = compute_quality(&jagged, &config());
        assert!(
            jagged_q < clean_q,
            "jagged {} should score below clean {}",
            jagged_q,
            clean_q
        );
    }

    #[test]
    fn low_plateau_is_not_prominent() {
        // Peak rises barely above a nearby plateau of similar height.
        let mut scores = vec![0.0; 801];
        for slot in &mut scores[300..500] {
            *slot = 0.9;
        }
        scores[400] = 1.0;

        let prominence = metric_peak_prominence(&scores, 0.05, 2.0);
        assert!(prominence < 0.2, "expected near 0, got {}", prominence);
    }
}
