//! Weighted random draws over relative scores.
//!
//! All randomness flows through an explicitly passed [`Rng`], never a
//! process-wide generator.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

/// Pick an index with probability proportional to `scores[i]`.
///
/// Scores need not be normalized. Negative and non-finite scores count as
/// zero. When every score is zero the draw falls back to a uniform choice
/// over all candidates. Returns `None` only for an empty slice.
pub fn weighted_index<R: Rng + ?Sized>(scores: &[f64], rng: &mut R) -> Option<usize> {
    if scores.is_empty() {
        return None;
    }

    let mut sanitized: Vec<f64> = scores
        .iter()
        .map(|&s| if s.is_finite() && s > 0.0 { s } else { 0.0 })
        .collect();

    // Finite scores can still overflow when summed.
    if !sanitized.iter().sum::<f64>().is_finite() {
        let max = sanitized.iter().copied().fold(0.0, f64::max);
        debug!(
            candidates = scores.len(),
            max,
            "score total overflows, rescaling by the largest score"
        );
        for score in &mut sanitized {
            *score /= max;
        }
    }

    match WeightedIndex::new(&sanitized) {
        Ok(dist) => Some(dist.sample(rng)),
        Err(err) => {
            debug!(
                candidates = scores.len(),
                %err,
                "degenerate weights, falling back to uniform choice"
            );
            Some(rng.gen_range(0..scores.len()))
        }
    }
}

/// Draw one material id from a normalized material table.
///
/// Returns `None` when the table is empty or carries no positive weight;
/// an all-zero table means no material applies at that depth.
pub fn sample_table<'a, R: Rng + ?Sized>(
    table: &'a BTreeMap<String, f64>,
    rng: &mut R,
) -> Option<&'a str> {
    let total: f64 = table.values().filter(|w| w.is_finite() && **w > 0.0).sum();
    if total <= 0.0 {
        return None;
    }

    let keys: Vec<&String> = table.keys().collect();
    let weights: Vec<f64> = table.values().copied().collect();
    weighted_index(&weights, rng).map(|i| keys[i].as_str())
}
