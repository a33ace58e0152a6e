//! Summary Statistics
//!
//! Mean, median and stddev are computed from the cleaned samples (outliers
//! removed). Min, max and percentiles are computed from all samples.

use crate::outliers::{OutlierMethod, detect_outliers};
use crate::percentiles::{Percentiles, percentile_of_sorted, sorted};

/// Two-sided z value for a 99% confidence level
pub const Z_99: f64 = 2.576;

/// Summary of one case's samples, in nanoseconds
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct SummaryStatistics {
    /// Mean of the cleaned samples
    pub mean: f64,
    /// Median of the cleaned samples
    pub median: f64,
    /// Sample standard deviation of the cleaned samples
    pub std_dev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Percentiles over all samples
    pub percentiles: Percentiles,
    /// Number of samples, outliers included
    pub sample_count: usize,
    /// Number of samples behind mean/median/stddev
    pub cleaned_count: usize,
    /// Number of samples rejected as outliers
    pub outlier_count: usize,
}

impl SummaryStatistics {
    /// Relative standard deviation, in percent
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.std_dev / self.mean * 100.0
        }
    }

    /// Half-width of the 99% confidence interval of the mean, as a
    /// percentage of the mean: `2.576 · stddev / √n / mean · 100`.
    ///
    /// Zero when the mean is zero or fewer than two samples were kept.
    pub fn confidence_pct(&self) -> f64 {
        if self.mean == 0.0 || self.cleaned_count < 2 {
            return 0.0;
        }
        Z_99 * self.std_dev / (self.cleaned_count as f64).sqrt() / self.mean * 100.0
    }
}

/// Summarize raw samples
pub fn compute_summary(samples: &[f64], method: OutlierMethod) -> SummaryStatistics {
    if samples.is_empty() {
        return SummaryStatistics::default();
    }

    let analysis = detect_outliers(samples, method);
    let cleaned = sorted(&analysis.cleaned_samples);
    let all = sorted(samples);

    let n = cleaned.len();
    let mean = if n == 0 {
        0.0
    } else {
        cleaned.iter().sum::<f64>() / n as f64
    };
    let std_dev = if n < 2 {
        0.0
    } else {
        let variance = cleaned.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    };

    SummaryStatistics {
        mean,
        median: percentile_of_sorted(&cleaned, 50.0),
        std_dev,
        min: all[0],
        max: all[all.len() - 1],
        percentiles: Percentiles {
            p50: percentile_of_sorted(&all, 50.0),
            p90: percentile_of_sorted(&all, 90.0),
            p99: percentile_of_sorted(&all, 99.0),
        },
        sample_count: samples.len(),
        cleaned_count: n,
        outlier_count: analysis.outlier_count(),
    }
}

/// [`compute_summary`] over integer nanosecond samples
pub fn summarize_nanos(samples: &[u64], method: OutlierMethod) -> SummaryStatistics {
    let as_f64: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    compute_summary(&as_f64, method)
}
