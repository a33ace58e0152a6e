#![warn(missing_docs)]
//! # MicroBench
//!
//! Sequential micro-benchmarking harness for Rust.
//!
//! - **Explicit registration**: cases are added to a [`Registry`] in order;
//!   duplicate `(suite, name)` pairs are rejected
//! - **Fixtures**: per-case setup and teardown, with teardown guaranteed on
//!   every exit path
//! - **Whole-body or manual timing**: time the entire closure, or only the
//!   [`Region`]s the closure opens
//! - **Failure recovery**: a panicking or failing case is reported and the
//!   run moves on
//! - **Output**: human (streaming), JSON and CSV reports
//!
//! ## Quick Start
//!
//! ```no_run
//! use microbench::prelude::*;
//!
//! fn main() {
//!     let code = run_cases(
//!         [
//!             BenchmarkCase::new("vec", "push_1k", || {
//!                 let mut v = Vec::new();
//!                 for i in 0..1_000u32 {
//!                     v.push(i);
//!                 }
//!                 v
//!             }),
//!             BenchmarkCase::manual("vec", "sort_only", |b: &mut Bencher| {
//!                 let mut v: Vec<u32> = (0..1_000).rev().collect();
//!                 let _region = b.region();
//!                 v.sort();
//!             }),
//!         ],
//!         std::env::args_os(),
//!     );
//!     std::process::exit(code);
//! }
//! ```
//!
//! ## Fixtures
//!
//! ```no_run
//! use microbench::prelude::*;
//!
//! #[derive(Default)]
//! struct Buffer(Vec<u8>);
//!
//! impl Fixture for Buffer {
//!     fn setup(&mut self) -> anyhow::Result<()> {
//!         self.0 = vec![b' '; 1 << 20];
//!         Ok(())
//!     }
//! }
//!
//! let case = BenchmarkCase::fixture("buffer", "find", |buf: &mut Buffer| {
//!     buf.0.iter().position(|&c| c == b'f')
//! });
//! # let _ = case;
//! ```

// Re-export core types
pub use microbench_core::{
    Bencher, BenchmarkCase, CaseError, Fixture, FixturePhase, FixtureSlot, Instant, LoopConfig,
    Measurement, Region, Registry, RegistryError, Timer, TimingMode, do_nothing,
};

// Re-export stats
pub use microbench_stats::{
    OutlierMethod, Percentiles, SummaryStatistics, compute_summary, summarize_nanos,
};

// Re-export report types
pub use microbench_report::{
    CaseReport, CaseStatus, OutputFormat, Report, ReportSummary, Reporter,
};

// Re-export the harness entry points
pub use microbench_cli::{
    Cli, ConfigError, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE, MicroConfig, RunSummary, run_all,
    run_cases, run_with_cli,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Bencher, BenchmarkCase, Fixture, Region, Registry, do_nothing, run_all, run_cases,
    };
}
