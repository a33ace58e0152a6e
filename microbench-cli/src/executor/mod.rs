//! Benchmark Executor
//!
//! Runs benchmarks sequentially in-process and streams results to a
//! [`Reporter`](microbench_report::Reporter).
//!
//! ## Pipeline Overview
//!
//! ```text
//! BenchmarkCase (registered explicitly)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Fixture setup, calibration, samples, teardown
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Summary stats for the case just finished
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Status + metrics → CaseReport → reporter
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Sequential per-case driver
//! - [`statistics`] - Per-case summary statistics
//! - [`report`] - Case status and report entries
//! - [`metadata`] - System metadata collection

mod execution;
mod metadata;
mod report;
mod statistics;

// Re-export public API
pub use execution::{CaseExecution, ExecutionConfig, Executor};
pub use metadata::build_report_meta;
pub use report::build_case_report;
pub use statistics::compute_statistics;
