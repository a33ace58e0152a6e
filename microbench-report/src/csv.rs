//! CSV Output
//!
//! One row per case. Failed and empty cases have blank metric columns.

use crate::report::{CaseReport, Report};
use crate::reporter::Reporter;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Column header
pub const CSV_HEADER: &str =
    "name,status,samples,mean_ns,median_ns,stddev_ns,min_ns,max_ns,confidence_pct";

/// Quote a field if it contains a separator, quote or newline
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn row(result: &CaseReport) -> String {
    let mut line = format!("{},{}", escape(&result.id), result.status);
    match &result.metrics {
        Some(m) => {
            let _ = write!(
                line,
                ",{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.4}",
                m.samples, m.mean_ns, m.median_ns, m.std_dev_ns, m.min_ns, m.max_ns, m.confidence_pct
            );
        }
        None => line.push_str(",0,,,,,,"),
    }
    line
}

/// Render the full CSV document
pub fn generate_csv_report(report: &Report) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');
    for result in &report.results {
        csv.push_str(&row(result));
        csv.push('\n');
    }
    csv
}

/// Writes the CSV document when the run finishes
pub struct CsvReporter<W: Write> {
    out: W,
}

impl<W: Write> CsvReporter<W> {
    /// Reporter writing to `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the sink
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for CsvReporter<W> {
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
        self.out.write_all(generate_csv_report(report).as_bytes())?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::{failed, meta, passed};

    #[test]
    fn test_rows() {
        let mut report = Report::new(meta());
        report.push(passed("cpp11", "do_nothing", &[200, 200]));
        report.push(failed("cpp11", "boom", "panic", "kaboom"));

        let csv = generate_csv_report(&report);
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            "cpp11.do_nothing,passed,2,200.00,200.00,0.00,200.00,200.00,0.0000"
        );
        assert_eq!(lines[2], "cpp11.boom,failed,0,,,,,,");
        // Every row has as many columns as the header
        for line in &lines {
            assert_eq!(line.split(',').count(), 9);
        }
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_reporter_writes_on_finish() {
        let mut report = Report::new(meta());
        report.push(passed("s", "a", &[1]));

        let mut reporter = CsvReporter::new(Vec::new());
        reporter.begin(1).unwrap();
        reporter.report(&report.results[0]).unwrap();
        assert!(reporter.out.is_empty());

        reporter.finish(&report).unwrap();
        assert_eq!(
            String::from_utf8(reporter.into_inner()).unwrap(),
            generate_csv_report(&report)
        );
    }
}
