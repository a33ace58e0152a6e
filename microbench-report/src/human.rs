//! Human-Readable Output
//!
//! Streams one line per event, so results appear while the run progresses:
//!
//! ```text
//! [==========] Running 3 benchmarks.
//! [ RUN      ] cpp11.tenth_of_a_second
//! [       OK ] cpp11.tenth_of_a_second (mean 100.091ms, confidence interval +- 0.032%)
//! [ RUN      ] cpp11.ex
//! [  EMPTY   ] cpp11.ex (no timed region was recorded)
//! [ RUN      ] cpp11_my_fixture.strchr
//! [  FAILED  ] cpp11_my_fixture.strchr (setup: out of memory)
//! [==========] 3 benchmarks ran.
//! [  PASSED  ] 1 benchmarks.
//! [  FAILED  ] 1 benchmarks, listed below:
//! [  FAILED  ] cpp11_my_fixture.strchr
//! ```

use crate::report::{CaseReport, CaseStatus, Report};
use crate::reporter::Reporter;
use std::io::{self, Write};

/// Format nanoseconds with the largest unit that keeps the value >= 1
pub fn format_duration(nanos: f64) -> String {
    if nanos >= 1_000_000_000.0 {
        format!("{:.3}s", nanos / 1_000_000_000.0)
    } else if nanos >= 1_000_000.0 {
        format!("{:.3}ms", nanos / 1_000_000.0)
    } else if nanos >= 1_000.0 {
        format!("{:.3}us", nanos / 1_000.0)
    } else {
        format!("{nanos:.3}ns")
    }
}

/// Streaming terminal reporter
pub struct HumanReporter<W: Write> {
    out: W,
    verbose: bool,
}

impl<W: Write> HumanReporter<W> {
    /// Reporter writing to `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            verbose: false,
        }
    }

    /// Also print the spread and percentiles under each result
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Recover the sink
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for HumanReporter<W> {
    fn begin(&mut self, total: usize) -> io::Result<()> {
        writeln!(self.out, "[==========] Running {total} benchmarks.")
    }

    fn case_started(&mut self, id: &str) -> io::Result<()> {
        writeln!(self.out, "[ RUN      ] {id}")
    }

    fn report(&mut self, result: &CaseReport) -> io::Result<()> {
        let tag = match result.status {
            CaseStatus::Passed => "[       OK ]",
            CaseStatus::Empty => "[  EMPTY   ]",
            CaseStatus::Unstable => "[ UNSTABLE ]",
            CaseStatus::Failed => "[  FAILED  ]",
        };

        match (&result.metrics, &result.failure) {
            (_, Some(failure)) => {
                writeln!(
                    self.out,
                    "{tag} {} ({}: {})",
                    result.id, failure.kind, failure.message
                )?;
            }
            (Some(m), None) => {
                writeln!(
                    self.out,
                    "{tag} {} (mean {}, confidence interval +- {:.6}%)",
                    result.id,
                    format_duration(m.mean_ns),
                    m.confidence_pct
                )?;
                if self.verbose {
                    writeln!(
                        self.out,
                        "             median {}  stddev {}  min {}  max {}",
                        format_duration(m.median_ns),
                        format_duration(m.std_dev_ns),
                        format_duration(m.min_ns),
                        format_duration(m.max_ns)
                    )?;
                    writeln!(
                        self.out,
                        "             p90 {}  p99 {}  samples {}  outliers {}  iters/sample {}",
                        format_duration(m.p90_ns),
                        format_duration(m.p99_ns),
                        m.samples,
                        m.outliers,
                        result.iters_per_sample
                    )?;
                }
            }
            (None, None) => {
                writeln!(self.out, "{tag} {} (no timed region was recorded)", result.id)?;
            }
        }
        self.out.flush()
    }

    fn finish(&mut self, report: &Report) -> io::Result<()> {
        let summary = &report.summary;
        writeln!(
            self.out,
            "[==========] {} benchmarks ran. ({:.0} ms total)",
            summary.total_benchmarks, summary.total_duration_ms
        )?;
        writeln!(self.out, "[  PASSED  ] {} benchmarks.", summary.passed)?;

        if summary.empty > 0 {
            writeln!(
                self.out,
                "[  EMPTY   ] {} benchmarks recorded no samples.",
                summary.empty
            )?;
        }
        if summary.unstable > 0 {
            let limit = report
                .meta
                .config
                .max_confidence_pct
                .map(|c| format!(" (limit {c}%)"))
                .unwrap_or_default();
            writeln!(
                self.out,
                "[ UNSTABLE ] {} benchmarks exceeded the confidence limit{limit}.",
                summary.unstable
            )?;
        }
        if summary.failed > 0 {
            writeln!(
                self.out,
                "[  FAILED  ] {} benchmarks, listed below:",
                summary.failed
            )?;
            for failure in report.failures() {
                writeln!(self.out, "[  FAILED  ] {}", failure.id)?;
            }
        }
        self.out.flush()
    }
}
