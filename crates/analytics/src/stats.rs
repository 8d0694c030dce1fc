use std::cmp::Ordering;

use crate::config::ScoreWeights;

/// Mid-rank percentile position (0-100) of `value` within `peers`.
///
/// percentile = 100 * (count_below + 0.5 * count_equal) / n, so ties split
/// the difference rather than favoring either side. A peer set of one (or
/// none) pins to 50.0 — there is nothing to compare against.
pub fn percentile_rank(value: f64, peers: &[f64]) -> f64 {
    if peers.len() <= 1 {
        return 50.0;
    }

    let mut below = 0usize;
    let mut equal = 0usize;
    for &peer in peers {
        match peer.partial_cmp(&value) {
            Some(Ordering::Less) => below += 1,
            Some(Ordering::Equal) => equal += 1,
            _ => {}
        }
    }

    100.0 * (below as f64 + 0.5 * equal as f64) / peers.len() as f64
}

/// One member's three normalized score axes, each already in 0-100.
///
/// "Lower raw value is better" metrics (cycle time, revert rate) must be
/// inverted to `100 - percentile` before being placed here.
#[derive(Debug, Clone, Copy)]
pub struct ScoreAxes {
    pub capability: f64,
    pub speed: f64,
    pub quality: f64,
}

/// Weighted composite of the three axes, clamped to 0-100.
pub fn composite_score(axes: ScoreAxes, weights: &ScoreWeights) -> f64 {
    (axes.capability * weights.capability
        + axes.speed * weights.speed
        + axes.quality * weights.quality)
        .clamp(0.0, 100.0)
}

/// Average of `values`; None when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
