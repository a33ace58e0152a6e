//! Benchmark Execution
//!
//! Runs the planned cases one at a time, to completion, in registration order.
//! A case that fails (panic, fixture setup or teardown error) is recorded and
//! the run moves on to the next case.
//!
//! ## Data Flow
//!
//! ```text
//! BenchmarkCase (from the Registry)
//!        │
//!        ▼
//!   ExecutionConfig ── resolve_for_case ──▶ LoopConfig
//!        │
//!        ▼
//! ┌──────────────────┐
//! │     Executor     │  setup → calibrate → samples → teardown
//! └────────┬─────────┘
//!          │
//!          ▼
//!  CaseExecution ─▶ statistics ─▶ CaseReport ─▶ Reporter::report
//! ```

use super::metadata::build_report_meta;
use super::report::build_case_report;
use super::statistics::compute_statistics;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use microbench_core::{BenchmarkCase, CaseError, LoopConfig, Measurement, TimingMode};
use microbench_report::{CaseStatus, Report, Reporter};
use std::time::Instant;

/// Configuration for benchmark execution
#[derive(Debug, Clone, Default)]
pub struct ExecutionConfig {
    /// Loop parameters before per-case overrides
    pub loop_config: LoopConfig,
    /// `--iterations` was given explicitly and beats per-case overrides
    pub force_iterations: bool,
    /// Results above this confidence half-width (percent) are `Unstable`
    pub max_confidence_pct: Option<f64>,
    /// Substring filter the plan was built with
    pub filter: Option<String>,
}

impl ExecutionConfig {
    /// Merge per-case overrides with the global loop parameters.
    ///
    /// Priority:
    /// 1. Explicit `--iterations` on the command line
    /// 2. Per-case `samples` / `iterations`
    /// 3. Configuration file and defaults
    pub fn resolve_for_case(&self, case: &BenchmarkCase) -> LoopConfig {
        let iterations = if self.force_iterations {
            self.loop_config.iterations
        } else {
            case.iteration_override().or(self.loop_config.iterations)
        };

        LoopConfig {
            samples: case.sample_override().unwrap_or(self.loop_config.samples),
            iterations,
            ..self.loop_config
        }
    }
}

/// Outcome of running one case
#[derive(Debug)]
pub struct CaseExecution {
    /// Display id, `suite.name`
    pub id: String,
    /// Suite name
    pub suite: String,
    /// Case name
    pub name: String,
    /// Whole-body or manual timing
    pub timing: TimingMode,
    /// Fixture type name, if any
    pub fixture: Option<&'static str>,
    /// Source file of the registration
    pub file: &'static str,
    /// Source line of the registration
    pub line: u32,
    /// Samples, or why the case failed
    pub outcome: Result<Measurement, CaseError>,
}

/// Execute benchmarks and stream results to a reporter
pub struct Executor {
    config: ExecutionConfig,
    show_progress: bool,
}

impl Executor {
    /// Executor without a progress bar
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            show_progress: false,
        }
    }

    /// Draw a progress bar on stderr while running
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::with_draw_target(Some(len as u64), ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }

    /// Run every case in order. The reporter sees `report` for each case
    /// after its fixture has been torn down.
    pub fn execute(
        &self,
        cases: Vec<BenchmarkCase>,
        reporter: &mut dyn Reporter,
    ) -> anyhow::Result<Report> {
        let start = Instant::now();
        let mut report = Report::new(build_report_meta(&self.config));
        let pb = self.progress_bar(cases.len());

        reporter.begin(cases.len())?;

        for mut case in cases {
            let id = case.id();
            pb.set_message(id.clone());
            reporter.case_started(&id)?;

            let execution = self.execute_single(&mut case);
            // The case (and any closure state it owns) is released before reporting
            drop(case);

            let stats = compute_statistics(&execution);
            let result = build_case_report(&execution, stats.as_ref(), &self.config);

            match result.status {
                CaseStatus::Passed => {}
                CaseStatus::Empty => {
                    tracing::warn!(case = %id, "manual benchmark never opened a timed region")
                }
                CaseStatus::Unstable => tracing::warn!(
                    case = %id,
                    confidence = ?result.metrics.as_ref().map(|m| m.confidence_pct),
                    "result exceeds the confidence limit"
                ),
                CaseStatus::Failed => tracing::debug!(case = %id, "benchmark failed"),
            }

            reporter.report(&result)?;
            report.push(result);
            pb.inc(1);
        }

        pb.finish_and_clear();
        report.summary.total_duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        reporter.finish(&report)?;
        Ok(report)
    }

    /// Execute a single benchmark
    fn execute_single(&self, case: &mut BenchmarkCase) -> CaseExecution {
        let cfg = self.config.resolve_for_case(case);
        tracing::debug!(
            case = %case.id(),
            samples = cfg.samples,
            iterations = ?cfg.iterations,
            "running benchmark"
        );

        let outcome = case.execute(&cfg);

        CaseExecution {
            id: case.id(),
            suite: case.suite().to_string(),
            name: case.name().to_string(),
            timing: case.timing(),
            fixture: case.fixture_tag(),
            file: case.file(),
            line: case.line(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use microbench_report::{CaseReport, HumanReporter};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn quick() -> ExecutionConfig {
        ExecutionConfig {
            loop_config: LoopConfig {
                samples: 3,
                iterations: Some(2),
                ..LoopConfig::default()
            },
            ..ExecutionConfig::default()
        }
    }

    /// Records the reporter calls in order
    struct Recorder {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl Reporter for Recorder {
        fn begin(&mut self, total: usize) -> std::io::Result<()> {
            self.events.borrow_mut().push(format!("begin {total}"));
            Ok(())
        }

        fn case_started(&mut self, id: &str) -> std::io::Result<()> {
            self.events.borrow_mut().push(format!("start {id}"));
            Ok(())
        }

        fn report(&mut self, result: &CaseReport) -> std::io::Result<()> {
            self.events
                .borrow_mut()
                .push(format!("report {} {}", result.id, result.status));
            Ok(())
        }

        fn finish(&mut self, report: &Report) -> std::io::Result<()> {
            self.events
                .borrow_mut()
                .push(format!("finish {}", report.results.len()));
            Ok(())
        }
    }

    #[test]
    fn test_resolve_per_case_overrides() {
        let exec = quick();
        let case = BenchmarkCase::new("s", "n", || ()).samples(7).iterations(9);
        let cfg = exec.resolve_for_case(&case);
        assert_eq!(cfg.samples, 7);
        assert_eq!(cfg.iterations, Some(9));

        let forced = ExecutionConfig {
            force_iterations: true,
            ..quick()
        };
        assert_eq!(forced.resolve_for_case(&case).iterations, Some(2));

        let plain = BenchmarkCase::new("s", "m", || ());
        assert_eq!(exec.resolve_for_case(&plain), exec.loop_config);
    }

    #[test]
    fn test_reporter_call_sequence() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut recorder = Recorder {
            events: events.clone(),
        };
        let cases = vec![
            BenchmarkCase::new("s", "a", || ()),
            BenchmarkCase::new("s", "b", || -> () { panic!("bad input") }),
            BenchmarkCase::manual("s", "c", |_| {}),
        ];

        let report = Executor::new(quick()).execute(cases, &mut recorder).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                "begin 3",
                "start s.a",
                "report s.a passed",
                "start s.b",
                "report s.b failed",
                "start s.c",
                "report s.c empty",
                "finish 3",
            ]
        );
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.empty, 1);
        assert_eq!(report.results[1].failure.as_ref().unwrap().message, "bad input");
    }

    #[test]
    fn test_unstable_with_tight_limit() {
        let mut config = quick();
        config.max_confidence_pct = Some(0.0);
        let mut n = 0u64;
        let cases = vec![BenchmarkCase::manual("s", "jitter", move |b| {
            n += 1;
            let spins = 1_000 * (n % 3 + 1);
            b.measure(|| {
                for i in 0..spins {
                    std::hint::black_box(i);
                }
            });
        })
        .samples(6)];

        let mut reporter = HumanReporter::new(Vec::new());
        let report = Executor::new(config).execute(cases, &mut reporter).unwrap();
        assert_eq!(report.results[0].status, CaseStatus::Unstable);
    }
}
