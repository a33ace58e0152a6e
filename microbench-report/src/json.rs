//! JSON Output

use crate::report::{CaseReport, Report};
use crate::reporter::Reporter;
use std::io::{self, Write};

/// Generate a prettified JSON report.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Writes the whole report as one JSON document when the run finishes
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    /// Reporter writing to `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the sink
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn begin(&mut self, _total: usize) -> io::Result<()> {
        Ok(())
    }

    fn case_started(&mut self, _id: &str) -> io::Result<()> {
        Ok(())
    }

    fn report(&mut self, _result: &CaseReport) -> io::Result<()> {
        Ok(())
    }

    fn finish(&mut self, report: &Report) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, report)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::{failed, meta, passed};

    #[test]
    fn test_document_shape() {
        let mut report = Report::new(meta());
        report.push(passed("cpp11", "tenth_of_a_second", &[100_000_000, 100_100_000]));
        report.push(failed("cpp11", "boom", "panic", "kaboom"));

        let mut reporter = JsonReporter::new(Vec::new());
        reporter.begin(2).unwrap();
        reporter.finish(&report).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
        assert_eq!(value["meta"]["system"]["cpu_cores"], 8);
        assert_eq!(value["results"][0]["id"], "cpp11.tenth_of_a_second");
        assert_eq!(value["results"][1]["status"], "failed");
        assert_eq!(value["results"][1]["failure"]["kind"], "panic");
        assert!(value["results"][1]["metrics"].is_null());
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["summary"]["total_benchmarks"], 2);
    }

    #[test]
    fn test_generate_matches_reporter() {
        let mut report = Report::new(meta());
        report.push(passed("s", "a", &[5, 6, 7]));

        let mut reporter = JsonReporter::new(Vec::new());
        reporter.finish(&report).unwrap();
        let written = String::from_utf8(reporter.into_inner()).unwrap();

        assert_eq!(written.trim_end(), generate_json_report(&report).unwrap());
    }
}
