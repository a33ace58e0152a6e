//! Statistics Computation
//!
//! Summary statistics are computed per case as soon as it finishes, so results
//! can be streamed. Whole-body passes are scaled to nanoseconds per iteration
//! in `f64`, then outlier-filtered with 1.5·IQR fences.

use super::execution::CaseExecution;
use microbench_stats::{OutlierMethod, SummaryStatistics, compute_summary};

/// Compute statistics for one executed case.
///
/// Returns `None` for failed cases and for cases that recorded no samples.
pub fn compute_statistics(execution: &CaseExecution) -> Option<SummaryStatistics> {
    match &execution.outcome {
        Ok(m) if !m.is_empty() => Some(compute_summary(
            &m.per_iteration_nanos(),
            OutlierMethod::default(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use microbench_core::{CaseError, Measurement, TimingMode};

    fn execution(outcome: Result<Measurement, CaseError>) -> CaseExecution {
        CaseExecution {
            id: "q.unit".to_string(),
            suite: "q".to_string(),
            name: "unit".to_string(),
            timing: TimingMode::WholeBody,
            fixture: None,
            file: file!(),
            line: line!(),
            outcome,
        }
    }

    #[test]
    fn test_passes_scaled_per_iteration() {
        let exec = execution(Ok(Measurement {
            samples: vec![1_000, 1_250, 1_500],
            iters_per_sample: 1_000,
            iterations: 3_000,
            total_time_ns: 3_750,
        }));
        let stats = compute_statistics(&exec).unwrap();

        assert!((stats.mean - 1.25).abs() < 1e-9);
        assert!((stats.min - 1.0).abs() < 1e-9);
        assert!((stats.max - 1.5).abs() < 1e-9);
        assert!(stats.confidence_pct() > 0.0);
    }

    #[test]
    fn test_no_statistics_without_samples() {
        assert!(compute_statistics(&execution(Ok(Measurement::default()))).is_none());
        assert!(
            compute_statistics(&execution(Err(CaseError::Panic("x".to_string())))).is_none()
        );
    }
}
