//! Report Data Structures

use chrono::{DateTime, Utc};
use microbench_core::TimingMode;
use microbench_stats::SummaryStatistics;
use serde::Serialize;

/// Complete run report
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Run metadata
    pub meta: ReportMeta,
    /// Per-case results, in registration order
    pub results: Vec<CaseReport>,
    /// Status counts and total duration
    pub summary: ReportSummary,
}

impl Report {
    /// Empty report for a run described by `meta`
    pub fn new(meta: ReportMeta) -> Self {
        Self {
            meta,
            results: Vec::new(),
            summary: ReportSummary::default(),
        }
    }

    /// Append one case result and count it in the summary
    pub fn push(&mut self, result: CaseReport) {
        self.summary.record(result.status);
        self.results.push(result);
    }

    /// Results that did not complete
    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.results
            .iter()
            .filter(|r| r.status == CaseStatus::Failed)
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    /// MicroBench version
    pub version: String,
    /// UTC time the report was created
    pub timestamp: DateTime<Utc>,
    /// Host the run executed on
    pub system: SystemInfo,
    /// Loop parameters before per-case overrides
    pub config: ReportConfig,
}

/// Loop configuration the run used
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportConfig {
    /// Timed passes per case
    pub samples: usize,
    /// Calibration target for one whole-body pass
    pub min_sample_time_ns: u64,
    /// Calibration ceiling
    pub max_iterations_per_sample: u64,
    /// Fixed iterations per pass, if calibration was skipped
    pub iterations: Option<u64>,
    /// Confidence limit for `Unstable`, percent
    pub max_confidence_pct: Option<f64>,
    /// Substring filter the run was given
    pub filter: Option<String>,
}

/// Host description
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemInfo {
    /// Operating system
    pub os: String,
    /// CPU architecture
    pub arch: String,
    /// CPU model name
    pub cpu: String,
    /// Available parallelism
    pub cpu_cores: u32,
}

/// One case in the report
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    /// `suite.name`
    pub id: String,
    /// Suite name
    pub suite: String,
    /// Case name
    pub name: String,
    /// Outcome
    pub status: CaseStatus,
    /// Whole-body or manual timing
    pub timing: TimingMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Fixture type name, if any
    pub fixture: Option<String>,
    /// Source file of the registration
    pub file: String,
    /// Source line of the registration
    pub line: u32,
    /// Body calls per whole-body sample (1 for manual cases)
    pub iters_per_sample: u64,
    /// Body calls in total, calibration included
    pub iterations: u64,
    /// Timing metrics, absent for failed and empty cases
    pub metrics: Option<CaseMetrics>,
    /// Why the case failed
    pub failure: Option<FailureInfo>,
}

/// Outcome of one case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// Completed with samples
    Passed,
    /// Setup, body or teardown failed
    Failed,
    /// Manual case that never opened a timed region
    Empty,
    /// Completed, but the confidence interval exceeds the configured limit
    Unstable,
}

impl CaseStatus {
    /// Lowercase name, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Passed => "passed",
            CaseStatus::Failed => "failed",
            CaseStatus::Empty => "empty",
            CaseStatus::Unstable => "unstable",
        }
    }

    /// Whether this outcome should turn the exit code non-zero
    pub fn fails_run(&self, fail_on_unstable: bool) -> bool {
        match self {
            CaseStatus::Failed => true,
            CaseStatus::Unstable => fail_on_unstable,
            CaseStatus::Passed | CaseStatus::Empty => false,
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timing metrics, all in nanoseconds per iteration (or per region)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseMetrics {
    /// Samples recorded
    pub samples: usize,
    /// Mean of the outlier-free samples
    pub mean_ns: f64,
    /// Median of the outlier-free samples
    pub median_ns: f64,
    /// Sample standard deviation of the outlier-free samples
    pub std_dev_ns: f64,
    /// Fastest sample
    pub min_ns: f64,
    /// Slowest sample
    pub max_ns: f64,
    /// 50th percentile of all samples
    pub p50_ns: f64,
    /// 90th percentile of all samples
    pub p90_ns: f64,
    /// 99th percentile of all samples
    pub p99_ns: f64,
    /// Samples outside the IQR fences
    pub outliers: usize,
    /// 99% confidence half-width, percent of the mean
    pub confidence_pct: f64,
}

impl From<&SummaryStatistics> for CaseMetrics {
    fn from(stats: &SummaryStatistics) -> Self {
        Self {
            samples: stats.sample_count,
            mean_ns: stats.mean,
            median_ns: stats.median,
            std_dev_ns: stats.std_dev,
            min_ns: stats.min,
            max_ns: stats.max,
            p50_ns: stats.percentiles.p50,
            p90_ns: stats.percentiles.p90,
            p99_ns: stats.percentiles.p99,
            outliers: stats.outlier_count,
            confidence_pct: stats.confidence_pct(),
        }
    }
}

/// Failure information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureInfo {
    /// `setup`, `teardown` or `panic`
    pub kind: String,
    /// Error or panic message
    pub message: String,
}

impl From<&microbench_core::CaseError> for FailureInfo {
    fn from(err: &microbench_core::CaseError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.message().to_string(),
        }
    }
}

/// Report summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Cases executed
    pub total_benchmarks: usize,
    /// Cases that passed
    pub passed: usize,
    /// Cases that failed
    pub failed: usize,
    /// Manual cases without samples
    pub empty: usize,
    /// Cases above the confidence limit
    pub unstable: usize,
    /// Wall time of the whole run
    pub total_duration_ms: f64,
}

impl ReportSummary {
    /// Count one result
    pub fn record(&mut self, status: CaseStatus) {
        self.total_benchmarks += 1;
        match status {
            CaseStatus::Passed => self.passed += 1,
            CaseStatus::Failed => self.failed += 1,
            CaseStatus::Empty => self.empty += 1,
            CaseStatus::Unstable => self.unstable += 1,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use microbench_stats::{OutlierMethod, summarize_nanos};

    pub(crate) fn meta() -> ReportMeta {
        ReportMeta {
            version: "0.1.0".to_string(),
            timestamp: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
            system: SystemInfo {
                os: "linux".to_string(),
                arch: "x86_64".to_string(),
                cpu: "Test CPU".to_string(),
                cpu_cores: 8,
            },
            config: ReportConfig {
                samples: 10,
                min_sample_time_ns: 5_000_000,
                max_iterations_per_sample: 1 << 30,
                ..ReportConfig::default()
            },
        }
    }

    pub(crate) fn passed(suite: &str, name: &str, samples: &[u64]) -> CaseReport {
        let stats = summarize_nanos(samples, OutlierMethod::default());
        CaseReport {
            id: format!("{suite}.{name}"),
            suite: suite.to_string(),
            name: name.to_string(),
            status: CaseStatus::Passed,
            timing: TimingMode::WholeBody,
            fixture: None,
            file: "benches/suite.rs".to_string(),
            line: 12,
            iters_per_sample: 64,
            iterations: 64 * samples.len() as u64,
            metrics: Some(CaseMetrics::from(&stats)),
            failure: None,
        }
    }

    pub(crate) fn failed(suite: &str, name: &str, kind: &str, message: &str) -> CaseReport {
        CaseReport {
            status: CaseStatus::Failed,
            metrics: None,
            failure: Some(FailureInfo {
                kind: kind.to_string(),
                message: message.to_string(),
            }),
            iters_per_sample: 0,
            iterations: 0,
            ..passed(suite, name, &[])
        }
    }

    #[test]
    fn test_push_updates_summary() {
        let mut report = Report::new(meta());
        report.push(passed("c", "a", &[10, 11, 12]));
        report.push(failed("c", "b", "panic", "boom"));
        report.push(CaseReport {
            status: CaseStatus::Empty,
            ..passed("c", "c", &[])
        });

        assert_eq!(report.summary.total_benchmarks, 3);
        assert_eq!(report.summary.passed, 1);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.empty, 1);
        let failures: Vec<_> = report.failures().map(|r| r.id.as_str()).collect();
        assert_eq!(failures, vec!["c.b"]);
    }

    #[test]
    fn test_status_fails_run() {
        assert!(CaseStatus::Failed.fails_run(false));
        assert!(!CaseStatus::Empty.fails_run(true));
        assert!(!CaseStatus::Unstable.fails_run(false));
        assert!(CaseStatus::Unstable.fails_run(true));
    }

    #[test]
    fn test_failure_from_case_error() {
        let info = FailureInfo::from(&microbench_core::CaseError::Setup("no disk".to_string()));
        assert_eq!(info.kind, "setup");
        assert_eq!(info.message, "no disk");
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(passed("cpp11", "do_nothing", &[100, 100, 100])).unwrap();

        assert_eq!(value["id"], "cpp11.do_nothing");
        assert_eq!(value["status"], "passed");
        assert_eq!(value["timing"], "whole-body");
        assert_eq!(value["metrics"]["mean_ns"], 100.0);
        assert!(value.get("fixture").is_none());
    }
}
