//! Reporter Trait
//!
//! The run drives a reporter through a fixed sequence:
//!
//! ```text
//! begin(total) ─▶ { case_started(id) ─▶ report(result) }* ─▶ finish(report)
//! ```
//!
//! `report` is called exactly once per executed case, after its fixture has
//! been torn down, in registration order.

use crate::report::{CaseReport, Report};
use std::io;

/// Sink for run progress and results
pub trait Reporter {
    /// The run is about to execute `total` cases
    fn begin(&mut self, total: usize) -> io::Result<()>;

    /// Case `id` is about to run
    fn case_started(&mut self, id: &str) -> io::Result<()>;

    /// Case finished (successfully or not)
    fn report(&mut self, result: &CaseReport) -> io::Result<()>;

    /// All cases finished; `report` holds every result and the summary
    fn finish(&mut self, report: &Report) -> io::Result<()>;
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn begin(&mut self, total: usize) -> io::Result<()> {
        (**self).begin(total)
    }

    fn case_started(&mut self, id: &str) -> io::Result<()> {
        (**self).case_started(id)
    }

    fn report(&mut self, result: &CaseReport) -> io::Result<()> {
        (**self).report(result)
    }

    fn finish(&mut self, report: &Report) -> io::Result<()> {
        (**self).finish(report)
    }
}
