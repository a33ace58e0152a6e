//! Percentile Computation
//!
//! Percentiles are taken over every sample, outliers included: the slow tail
//! is what p99 is supposed to show.

/// Percentiles reported for each case
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct Percentiles {
    /// 50th percentile
    pub p50: f64,
    /// 90th percentile
    pub p90: f64,
    /// 99th percentile
    pub p99: f64,
}

/// Copy and sort samples ascending
pub(crate) fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Percentile of an already sorted slice, interpolating linearly between
/// the two nearest ranks
pub(crate) fn percentile_of_sorted(sorted: &[f64], pct: f64) -> f64 {
    match sorted {
        [] => 0.0,
        [only] => *only,
        _ => {
            let last = sorted.len() - 1;
            let rank = (pct.clamp(0.0, 100.0) / 100.0) * last as f64;
            let lo = rank.floor() as usize;
            let hi = (lo + 1).min(last);
            let frac = rank - lo as f64;
            sorted[lo] + frac * (sorted[hi] - sorted[lo])
        }
    }
}

/// Percentile `pct` (0..=100) of unsorted samples; 0 when empty
pub fn compute_percentile(samples: &[f64], pct: f64) -> f64 {
    percentile_of_sorted(&sorted(samples), pct)
}

/// p50, p90 and p99 with a single sort
pub fn compute_percentiles(samples: &[f64]) -> Percentiles {
    let sorted = sorted(samples);
    Percentiles {
        p50: percentile_of_sorted(&sorted, 50.0),
        p90: percentile_of_sorted(&sorted, 90.0),
        p99: percentile_of_sorted(&sorted, 99.0),
    }
}
