//! Shift/skew grid search.
//!
//! For each candidate skew the full shift score curve is computed and its
//! best shift recorded together with the curve's quality of fit. Skew
//! candidates are independent and evaluated on the worker pool; the winning
//! candidate is the one with the highest quality of fit, not the highest
//! raw score.

use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::parallel::maybe_parallel_map;

use super::quality::{argmax_first, compute_quality};
use super::score::compute_shift_scores;
use super::types::{AnalysisError, AnalysisResult, SkewFit, TransformParams};

/// One skew to evaluate, with its human-readable origin.
#[derive(Debug, Clone)]
pub struct SkewCandidate {
    pub skew: f64,
    pub label: String,
}

/// The winning transform with its quality and the per-candidate record.
#[derive(Debug, Clone)]
pub struct TransformFit {
    /// Best-fit transform, sync bias already applied to the shift.
    pub params: TransformParams,
    /// Quality of fit of the winning candidate's score curve.
    pub quality: f64,
    /// All evaluated candidates, in submission order.
    pub candidates: Vec<SkewFit>,
}

/// Build the skew candidate set.
///
/// Candidates are the pairwise ratios of the known frame rates with 1.0
/// (no rate change) inserted first, deduplicated keeping the first
/// occurrence. A fixed skew replaces the whole set.
pub fn skew_candidates(frame_rates: &[f64], fixed_skew: Option<f64>) -> Vec<SkewCandidate> {
    if let Some(skew) = fixed_skew {
        return vec![SkewCandidate {
            skew,
            label: skew.to_string(),
        }];
    }

    let mut pairs: Vec<(f64, f64)> = vec![(1.0, 1.0)];
    for &a in frame_rates {
        for &b in frame_rates {
            pairs.push((a, b));
        }
    }

    let mut candidates: Vec<SkewCandidate> = Vec::new();
    for (a, b) in pairs {
        let skew = a / b;
        if !candidates.iter().any(|c| c.skew == skew) {
            candidates.push(SkewCandidate {
                skew,
                label: format!("{}/{}", a, b),
            });
        }
    }
    candidates
}

/// Evaluate one skew: best shift on the 1-frame grid, its score and the
/// curve's quality.
fn best_shift(labels: &[f64], probs: &[f64], config: &SyncConfig, skew: f64) -> (f64, f64, f64) {
    let curve = compute_shift_scores(
        labels,
        probs,
        config.frame_secs,
        config.max_shift_secs,
        skew,
    );
    let quality = compute_quality(&curve.scores, config);
    let best_idx = argmax_first(&curve.scores);

    let shift_secs = curve.shift_at(best_idx) as f64 * config.frame_secs;
    (shift_secs, curve.scores[best_idx], quality)
}

/// Find the `(skew, shift)` best aligning the label sequence with the
/// probability sequence.
///
/// `sync_bias` (the model's training-time shift correction, in seconds) is
/// added to the winning shift only, never to the skew. Requires equal-length,
/// non-empty sequences with at least one frame of each label class.
pub fn find_transform(
    labels: &[f64],
    probs: &[f64],
    sync_bias: f64,
    config: &SyncConfig,
) -> AnalysisResult<TransformFit> {
    if labels.len() != probs.len() {
        return Err(AnalysisError::LengthMismatch {
            labels: labels.len(),
            probs: probs.len(),
        });
    }
    if labels.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    if labels.iter().all(|&l| l == 1.0) {
        return Err(AnalysisError::SingleClass(1));
    }
    if labels.iter().all(|&l| l != 1.0) {
        return Err(AnalysisError::SingleClass(0));
    }

    let candidates = skew_candidates(&config.frame_rates, config.fixed_skew);
    if candidates.is_empty() {
        return Err(AnalysisError::NoCandidates);
    }

    debug!(
        candidates = candidates.len(),
        max_shift_secs = config.max_shift_secs,
        step_secs = config.frame_secs,
        "searching shift/skew grid"
    );

    let fits = maybe_parallel_map(candidates, config.parallelism, |candidate| {
        let (shift_secs, score, quality) = best_shift(labels, probs, config, candidate.skew);
        SkewFit {
            skew: candidate.skew,
            label: candidate.label,
            shift_secs,
            score,
            quality,
        }
    })
    .map_err(|e| AnalysisError::WorkerPool(e.to_string()))?;

    for fit in &fits {
        debug!(
            skew = %fit.label,
            shift_secs = fit.shift_secs,
            score = fit.score,
            quality = fit.quality,
            "skew candidate evaluated"
        );
    }

    // Quality, not raw score, discriminates between candidates; ties keep
    // the earliest candidate, so the no-resample skew wins ambiguous fits.
    let mut best = 0;
    for (i, fit) in fits.iter().enumerate() {
        if fit.quality > fits[best].quality {
            best = i;
        }
    }

    let winner = &fits[best];
    let params = TransformParams {
        skew: winner.skew,
        shift_secs: winner.shift_secs + sync_bias,
    };

    info!(
        skew = %winner.label,
        shift_secs = params.shift_secs,
        quality = winner.quality,
        "best transform found"
    );

    Ok(TransformFit {
        params,
        quality: winner.quality,
        candidates: fits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic xorshift generator for noise in synthetic fixtures.
    struct XorShift(u64);

    impl XorShift {
        fn next_f64(&mut self) -> f64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            (self.0 >> 11) as f64 / (1u64 << 53) as f64
        }
    }

    fn test_config() -> SyncConfig {
        SyncConfig {
            parallelism: 1,
            ..SyncConfig::default()
        }
    }

    /// Speech-like label blocks over `n` frames.
    fn synthetic_labels(n: usize, rng: &mut XorShift) -> Vec<f64> {
        let mut labels = vec![0.0; n];
        let mut i = 0;
        let mut speech = false;
        while i < n {
            let span = 20 + (rng.next_f64() * 80.0) as usize;
            if speech {
                for slot in labels[i..(i + span).min(n)].iter_mut() {
                    *slot = 1.0;
                }
            }
            i += span;
            speech = !speech;
        }
        labels
    }

    /// Probabilities consistent with the labels transformed by `params`,
    /// plus bounded noise.
    fn transformed_probs(
        labels: &[f64],
        params: TransformParams,
        frame_secs: f64,
        noise: f64,
        rng: &mut XorShift,
    ) -> Vec<f64> {
        let n = labels.len();
        let mut probs: Vec<f64> = (0..n)
            .map(|_| 0.05 + noise * (rng.next_f64() - 0.5))
            .collect();
        for (i, &label) in labels.iter().enumerate() {
            if label == 1.0 {
                let target = (params.apply(i as f64 * frame_secs) / frame_secs).round() as i64;
                if target >= 0 && (target as usize) < n {
                    probs[target as usize] = 0.95 - noise * rng.next_f64();
                }
            }
        }
        probs
    }

    #[test]
    fn skew_candidates_are_deduplicated_ratios() {
        let candidates = skew_candidates(&[23.976, 24.0, 25.0], None);

        // 1/1 plus 6 distinct cross ratios.
        assert_eq!(candidates.len(), 7);
        assert_eq!(candidates[0].skew, 1.0);
        assert!(candidates.iter().any(|c| c.label == "24/25"));
        // Identity ratios (24/24 etc.) collapse into the leading 1/1.
        assert_eq!(
            candidates.iter().filter(|c| c.skew == 1.0).count(),
            1
        );
    }

    #[test]
    fn fixed_skew_disables_the_search() {
        let candidates = skew_candidates(&[24.0, 25.0], Some(0.96));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].skew, 0.96);
    }

    #[test]
    fn known_transform_is_recovered() {
        let mut rng = XorShift(7);
        let config = test_config();
        let truth = TransformParams {
            skew: 24.0 / 25.0,
            shift_secs: 4.0,
        };

        let labels = synthetic_labels(6000, &mut rng);
        let probs = transformed_probs(&labels, truth, config.frame_secs, 0.05, &mut rng);

        let fit = find_transform(&labels, &probs, 0.0, &config).unwrap();

        assert_eq!(fit.params.skew, truth.skew, "skew must match exactly");
        assert!(
            (fit.params.shift_secs - truth.shift_secs).abs() <= config.frame_secs,
            "shift {} too far from {}",
            fit.params.shift_secs,
            truth.shift_secs
        );
        assert!(fit.quality > config.quality_threshold);
    }

    #[test]
    fn sync_bias_is_applied_to_shift_only() {
        let mut rng = XorShift(21);
        let config = test_config();
        let truth = TransformParams {
            skew: 1.0,
            shift_secs: 2.0,
        };

        let labels = synthetic_labels(4000, &mut rng);
        let probs = transformed_probs(&labels, truth, config.frame_secs, 0.02, &mut rng);

        let unbiased = find_transform(&labels, &probs, 0.0, &config).unwrap();
        let biased = find_transform(&labels, &probs, 0.25, &config).unwrap();

        assert_eq!(biased.params.skew, unbiased.params.skew);
        assert!(
            (biased.params.shift_secs - unbiased.params.shift_secs - 0.25).abs() < 1e-9
        );
    }

    #[test]
    fn mismatched_sequences_score_low_quality() {
        let mut rng = XorShift(99);
        let config = test_config();

        let labels = synthetic_labels(6000, &mut rng);
        // Unrelated probability sequence from a different random stream.
        let mut other = XorShift(123456789);
        let unrelated = synthetic_labels(6000, &mut other);
        let probs = transformed_probs(
            &unrelated,
            TransformParams::identity(),
            config.frame_secs,
            0.05,
            &mut other,
        );

        let fit = find_transform(&labels, &probs, 0.0, &config).unwrap();
        assert!(
            fit.quality < config.quality_threshold,
            "unrelated pairing scored quality {}",
            fit.quality
        );
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = find_transform(&[1.0, 0.0], &[0.5], 0.0, &test_config()).unwrap_err();
        assert!(matches!(err, AnalysisError::LengthMismatch { .. }));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = find_transform(&[], &[], 0.0, &test_config()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput));
    }

    #[test]
    fn single_class_labels_are_rejected() {
        let labels = vec![0.0; 100];
        let probs = vec![0.5; 100];
        let err = find_transform(&labels, &probs, 0.0, &test_config()).unwrap_err();
        assert!(matches!(err, AnalysisError::SingleClass(0)));
    }
}
