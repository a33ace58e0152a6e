#![warn(missing_docs)]
//! MicroBench Report - Result Model and Output Formats
//!
//! Generates various output formats:
//! - Human (streaming terminal lines)
//! - JSON (machine-readable)
//! - CSV (spreadsheet-compatible)

mod csv;
mod human;
mod json;
mod report;
mod reporter;

use std::io::Write;

pub use csv::{CSV_HEADER, CsvReporter, generate_csv_report};
pub use human::{HumanReporter, format_duration};
pub use json::{JsonReporter, generate_json_report};
pub use report::{
    CaseMetrics, CaseReport, CaseStatus, FailureInfo, Report, ReportConfig, ReportMeta,
    ReportSummary, SystemInfo,
};
pub use reporter::Reporter;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// JSON with full metadata
    Json,
    /// CSV for spreadsheets
    Csv,
}

impl OutputFormat {
    /// Whether the format streams its own progress lines
    pub fn is_streaming(&self) -> bool {
        matches!(self, OutputFormat::Human)
    }

    /// Build the reporter for this format over `out`
    pub fn reporter<'a, W: Write + 'a>(&self, out: W, verbose: bool) -> Box<dyn Reporter + 'a> {
        match self {
            OutputFormat::Human => Box::new(HumanReporter::new(out).verbose(verbose)),
            OutputFormat::Json => Box::new(JsonReporter::new(out)),
            OutputFormat::Csv => Box::new(CsvReporter::new(out)),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputFormat::Human => "human",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        })
    }
}
