#![warn(missing_docs)]
//! MicroBench Statistics
//!
//! Reduces a case's nanosecond samples to the numbers the reporters print:
//! - Percentiles with linear interpolation
//! - Outlier detection via IQR fences
//! - Summary statistics and a 99% relative confidence interval

mod outliers;
mod percentiles;
mod summary;

pub use outliers::{DEFAULT_IQR_K, OutlierAnalysis, OutlierMethod, detect_outliers};
pub use percentiles::{Percentiles, compute_percentile, compute_percentiles};
pub use summary::{SummaryStatistics, Z_99, compute_summary, summarize_nanos};
