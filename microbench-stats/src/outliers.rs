//! Outlier Detection
//!
//! Tukey fences: a sample is an outlier when it falls outside
//! `[Q1 - k·IQR, Q3 + k·IQR]`. Outliers are only excluded from the central
//! tendency (mean, median, stddev); extremes and percentiles keep them.

use crate::percentiles::{percentile_of_sorted, sorted};

/// Default fence multiplier
pub const DEFAULT_IQR_K: f64 = 1.5;

/// How outliers are identified
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlierMethod {
    /// Interquartile-range fences with multiplier `k`
    Iqr {
        /// Fence multiplier, 1.5 for Tukey's standard fences
        k: f64,
    },
    /// Keep every sample
    None,
}

impl Default for OutlierMethod {
    fn default() -> Self {
        OutlierMethod::Iqr { k: DEFAULT_IQR_K }
    }
}

/// Samples split into kept and rejected
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierAnalysis {
    /// Samples inside the fences, in input order
    pub cleaned_samples: Vec<f64>,
    /// Input indices of the rejected samples
    pub outlier_indices: Vec<usize>,
    /// Rejected below the lower fence
    pub low_outlier_count: usize,
    /// Rejected above the upper fence
    pub high_outlier_count: usize,
    /// Lower fence
    pub lower_bound: f64,
    /// Upper fence
    pub upper_bound: f64,
}

impl OutlierAnalysis {
    /// Number of rejected samples
    pub fn outlier_count(&self) -> usize {
        self.outlier_indices.len()
    }
}

/// Classify `samples` with `method`
pub fn detect_outliers(samples: &[f64], method: OutlierMethod) -> OutlierAnalysis {
    let k = match method {
        OutlierMethod::Iqr { k } if !samples.is_empty() => k,
        _ => {
            return OutlierAnalysis {
                cleaned_samples: samples.to_vec(),
                outlier_indices: Vec::new(),
                low_outlier_count: 0,
                high_outlier_count: 0,
                lower_bound: f64::NEG_INFINITY,
                upper_bound: f64::INFINITY,
            };
        }
    };

    let ordered = sorted(samples);
    let q1 = percentile_of_sorted(&ordered, 25.0);
    let q3 = percentile_of_sorted(&ordered, 75.0);
    let iqr = q3 - q1;
    let lower_bound = q1 - k * iqr;
    let upper_bound = q3 + k * iqr;

    let mut analysis = OutlierAnalysis {
        cleaned_samples: Vec::with_capacity(samples.len()),
        outlier_indices: Vec::new(),
        low_outlier_count: 0,
        high_outlier_count: 0,
        lower_bound,
        upper_bound,
    };

    for (i, &sample) in samples.iter().enumerate() {
        if sample < lower_bound {
            analysis.low_outlier_count += 1;
            analysis.outlier_indices.push(i);
        } else if sample > upper_bound {
            analysis.high_outlier_count += 1;
            analysis.outlier_indices.push(i);
        } else {
            analysis.cleaned_samples.push(sample);
        }
    }

    analysis
}
