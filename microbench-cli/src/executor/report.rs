//! Report Building
//!
//! Turns one [`CaseExecution`] and its statistics into the [`CaseReport`] the
//! reporters see, deciding the case status:
//!
//! ```text
//! outcome Err(_)                          ─▶ Failed
//! outcome Ok, no samples                  ─▶ Empty
//! confidence_pct > max_confidence_pct     ─▶ Unstable
//! otherwise                               ─▶ Passed
//! ```

use super::execution::{CaseExecution, ExecutionConfig};
use microbench_report::{CaseMetrics, CaseReport, CaseStatus, FailureInfo};
use microbench_stats::SummaryStatistics;

/// Build the report entry for one executed case
pub fn build_case_report(
    execution: &CaseExecution,
    stats: Option<&SummaryStatistics>,
    config: &ExecutionConfig,
) -> CaseReport {
    let metrics = stats.map(CaseMetrics::from);

    let (status, failure, iters_per_sample, iterations) = match &execution.outcome {
        Err(err) => (CaseStatus::Failed, Some(FailureInfo::from(err)), 0, 0),
        Ok(m) if m.is_empty() => (CaseStatus::Empty, None, m.iters_per_sample, m.iterations),
        Ok(m) => {
            let unstable = match (config.max_confidence_pct, &metrics) {
                (Some(limit), Some(metrics)) => metrics.confidence_pct > limit,
                _ => false,
            };
            let status = if unstable {
                CaseStatus::Unstable
            } else {
                CaseStatus::Passed
            };
            (status, None, m.iters_per_sample, m.iterations)
        }
    };

    CaseReport {
        id: execution.id.clone(),
        suite: execution.suite.clone(),
        name: execution.name.clone(),
        status,
        timing: execution.timing,
        fixture: execution.fixture.map(str::to_string),
        file: execution.file.to_string(),
        line: execution.line,
        iters_per_sample,
        iterations,
        metrics,
        failure,
    }
}
