#![warn(missing_docs)]
//! MicroBench CLI Library
//!
//! This module provides the CLI infrastructure for benchmark binaries.
//! Build a [`Registry`] in your `main`, then hand it to [`run_all`] together
//! with the process arguments.
//!
//! # Example
//!
//! ```ignore
//! use microbench::prelude::*;
//!
//! fn main() {
//!     let registry = Registry::from_cases([
//!         BenchmarkCase::new("strings", "concat", || format!("{}{}", "a", "b")),
//!     ])
//!     .expect("unique benchmark names");
//!     std::process::exit(microbench_cli::run_all(registry, std::env::args_os()));
//! }
//! ```

mod config;
mod executor;
mod planner;

pub use config::*;
pub use executor::{
    CaseExecution, ExecutionConfig, Executor, build_case_report, build_report_meta,
    compute_statistics,
};
pub use planner::{ExecutionPlan, build_plan, matches, select};

use clap::{Parser, Subcommand};
use microbench_core::{BenchmarkCase, Registry, TimingMode};
use microbench_report::{OutputFormat, Report};
use std::ffi::OsString;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Every case completed (empty and, by default, unstable results included)
pub const EXIT_SUCCESS: i32 = 0;
/// At least one case failed
pub const EXIT_FAILURE: i32 = 1;
/// Bad arguments, configuration or registration
pub const EXIT_USAGE: i32 = 2;

/// MicroBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "microbench")]
#[command(author, version, about = "MicroBench - sequential micro-benchmark harness")]
pub struct Cli {
    /// Optional subcommand (List, Run); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Run only benchmarks whose `suite.name` contains this substring
    pub filter: Option<String>,

    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Timed passes per benchmark
    #[arg(long, short = 'n')]
    pub samples: Option<usize>,

    /// Fixed iterations per whole-body pass; skips calibration and
    /// overrides per-benchmark settings
    #[arg(long)]
    pub iterations: Option<u64>,

    /// Calibration target for one whole-body pass (e.g. "5ms", "200us")
    #[arg(long, value_name = "DURATION")]
    pub min_sample_time: Option<String>,

    /// Mark results whose 99% confidence interval exceeds this percentage
    #[arg(long, value_name = "PCT")]
    pub confidence: Option<f64>,

    /// Exit non-zero when a result exceeds the confidence limit
    #[arg(long)]
    pub fail_on_unstable: bool,

    /// List benchmarks without executing
    #[arg(long)]
    pub list: bool,

    /// Dry run - same as --list
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print results (no progress bar, warnings only in logs)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Internal: Absorb cargo bench's --bench flag
    #[arg(long, hide = true)]
    pub bench: bool,
}

impl Cli {
    fn wants_listing(&self) -> bool {
        self.list || self.dry_run || matches!(self.command, Some(Commands::List))
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// List registered benchmarks
    List,
    /// Run benchmarks (default)
    Run,
}

/// What a run produced
#[derive(Debug)]
pub struct RunSummary {
    /// Full report, `None` when only listing
    pub report: Option<Report>,
    /// Cases printed by a listing
    pub listed: usize,
    /// Unstable results count as failures
    pub fail_on_unstable: bool,
}

impl RunSummary {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        let failed = self.report.as_ref().is_some_and(|report| {
            report
                .results
                .iter()
                .any(|r| r.status.fails_run(self.fail_on_unstable))
        });
        if failed { EXIT_FAILURE } else { EXIT_SUCCESS }
    }
}

/// Install the stderr log subscriber. Does nothing if one is already set.
pub fn init_tracing(verbose: bool, quiet: bool) {
    let default_directive = if verbose {
        "microbench=debug"
    } else if quiet {
        "microbench=warn"
    } else {
        "microbench=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Build an ExecutionConfig by layering: microbench.toml → CLI overrides.
pub fn build_execution_config(
    cli: &Cli,
    config: &MicroConfig,
) -> Result<ExecutionConfig, ConfigError> {
    let mut loop_config = config.runner.loop_config()?;

    if let Some(samples) = cli.samples {
        if samples == 0 {
            return Err(ConfigError::InvalidValue {
                field: "--samples",
                message: "must be at least 1".to_string(),
            });
        }
        loop_config.samples = samples;
    }

    if let Some(iterations) = cli.iterations {
        if iterations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "--iterations",
                message: "must be at least 1".to_string(),
            });
        }
        loop_config.iterations = Some(iterations);
    }

    if let Some(ref min_sample_time) = cli.min_sample_time {
        loop_config.min_sample_time_ns = MicroConfig::parse_duration(min_sample_time)?;
    }

    let max_confidence_pct = cli.confidence.or(config.ci.max_confidence);
    if let Some(pct) = max_confidence_pct.filter(|pct| !(pct.is_finite() && *pct >= 0.0)) {
        return Err(ConfigError::InvalidValue {
            field: "confidence",
            message: format!("{pct} is not a non-negative percentage"),
        });
    }

    Ok(ExecutionConfig {
        loop_config,
        force_iterations: cli.iterations.is_some(),
        max_confidence_pct,
        filter: cli.filter.clone().filter(|f| !f.is_empty()),
    })
}

/// Print the selected cases in registration order
pub fn list_benchmarks(
    registry: &Registry,
    filter: Option<&str>,
    out: &mut dyn Write,
) -> io::Result<usize> {
    writeln!(out, "MicroBench Plan:")?;

    let selected = select(registry.all(), filter);
    for case in &selected {
        writeln!(out, "├── {}{} ({}:{})", case.id(), describe(case), case.file(), case.line())?;
    }

    writeln!(out, "{} benchmarks found.", selected.len())?;
    Ok(selected.len())
}

fn describe(case: &BenchmarkCase) -> String {
    let mut tags = Vec::new();
    if case.timing() == TimingMode::Manual {
        tags.push("manual".to_string());
    }
    if let Some(fixture) = case.fixture_tag() {
        tags.push(format!("fixture: {fixture}"));
    }
    if tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", tags.join(", "))
    }
}

/// Run the harness with pre-parsed arguments and an explicit output sink.
///
/// Configuration errors surface as [`ConfigError`] inside the returned
/// `anyhow::Error`.
pub fn run_with_cli(
    registry: Registry,
    cli: &Cli,
    config: &MicroConfig,
    sink: &mut dyn Write,
) -> anyhow::Result<RunSummary> {
    let exec_config = build_execution_config(cli, config)?;
    let fail_on_unstable = cli.fail_on_unstable || config.ci.fail_on_unstable;

    if cli.wants_listing() {
        let listed = list_benchmarks(&registry, exec_config.filter.as_deref(), sink)?;
        return Ok(RunSummary {
            report: None,
            listed,
            fail_on_unstable,
        });
    }

    let plan = build_plan(registry, exec_config.filter.as_deref());
    if plan.cases.is_empty() {
        tracing::warn!(
            filter = ?exec_config.filter,
            skipped = plan.filtered_out,
            "no benchmarks selected"
        );
    }

    let format = cli.format.unwrap_or(config.output.format);
    let show_progress = !cli.quiet && !format.is_streaming();

    let report = {
        let mut reporter = format.reporter(&mut *sink, cli.verbose);
        Executor::new(exec_config)
            .with_progress(show_progress)
            .execute(plan.cases, &mut reporter)?
    };
    sink.flush()?;

    Ok(RunSummary {
        report: Some(report),
        listed: 0,
        fail_on_unstable,
    })
}

/// Parse `argv`, load configuration, run every selected case and return the
/// process exit code.
///
/// `argv` includes the program name, as `std::env::args_os()` does.
pub fn run_all<I, T>(registry: Registry, argv: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return e.exit_code();
        }
    };

    init_tracing(cli.verbose, cli.quiet);

    // Discover microbench.toml configuration (CLI flags override)
    let config = match MicroConfig::discover() {
        Ok(Some((path, config))) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            config
        }
        Ok(None) => MicroConfig::default(),
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };

    let output_path = cli.output.clone().or_else(|| config.output.file.clone());
    let mut sink: Box<dyn Write> = match &output_path {
        Some(path) if !cli.wants_listing() => match std::fs::File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(e) => {
                eprintln!("error: cannot create {}: {e}", path.display());
                return EXIT_USAGE;
            }
        },
        _ => Box::new(io::stdout().lock()),
    };

    match run_with_cli(registry, &cli, &config, &mut sink) {
        Ok(summary) => {
            if let (Some(path), Some(_)) = (&output_path, &summary.report) {
                eprintln!("Report written to: {}", path.display());
            }
            summary.exit_code()
        }
        Err(e) if e.downcast_ref::<ConfigError>().is_some() => {
            eprintln!("error: {e:#}");
            EXIT_USAGE
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            EXIT_FAILURE
        }
    }
}

/// Register `cases` in order and [`run_all`] them.
///
/// A duplicate (suite, name) aborts before anything runs, with [`EXIT_USAGE`].
pub fn run_cases<C, I, T>(cases: C, argv: I) -> i32
where
    C: IntoIterator<Item = BenchmarkCase>,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Registry::from_cases(cases) {
        Ok(registry) => run_all(registry, argv),
        Err(e) => {
            eprintln!("error: {e}");
            EXIT_USAGE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use microbench_core::Bencher;
    use microbench_report::CaseStatus;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bench").chain(args.iter().copied())).unwrap()
    }

    fn registry() -> Registry {
        Registry::from_cases([
            BenchmarkCase::new("math", "sum", || (0..64u64).sum::<u64>()),
            BenchmarkCase::manual("math", "manual_sum", |b: &mut Bencher| {
                b.measure(|| (0..64u64).sum::<u64>());
            }),
            BenchmarkCase::new("math", "explode", || -> u64 { panic!("overflow") }),
        ])
        .unwrap()
    }

    fn run(args: &[&str]) -> (anyhow::Result<RunSummary>, String) {
        let cli = parse(args);
        let mut out = Vec::new();
        let result = run_with_cli(registry(), &cli, &MicroConfig::default(), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = parse(&[
            "sum",
            "--format",
            "csv",
            "-n",
            "4",
            "--iterations",
            "8",
            "--min-sample-time",
            "1ms",
            "--confidence",
            "2.5",
            "--bench",
        ]);
        assert_eq!(cli.filter.as_deref(), Some("sum"));
        assert_eq!(cli.format, Some(OutputFormat::Csv));
        assert_eq!(cli.samples, Some(4));
        assert_eq!(cli.iterations, Some(8));
        assert!(cli.bench);

        let exec = build_execution_config(&cli, &MicroConfig::default()).unwrap();
        assert_eq!(exec.loop_config.samples, 4);
        assert_eq!(exec.loop_config.iterations, Some(8));
        assert_eq!(exec.loop_config.min_sample_time_ns, 1_000_000);
        assert!(exec.force_iterations);
        assert_eq!(exec.max_confidence_pct, Some(2.5));
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let config: MicroConfig =
            toml::from_str("[runner]\nsamples = 30\n[ci]\nmax_confidence = 9.0\n").unwrap();

        let from_file = build_execution_config(&parse(&[]), &config).unwrap();
        assert_eq!(from_file.loop_config.samples, 30);
        assert_eq!(from_file.max_confidence_pct, Some(9.0));
        assert!(!from_file.force_iterations);

        let overridden = build_execution_config(&parse(&["-n", "5"]), &config).unwrap();
        assert_eq!(overridden.loop_config.samples, 5);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let (result, _) = run(&["--min-sample-time", "soon"]);
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidDuration(_))
        ));

        let (result, _) = run(&["-n", "0"]);
        assert!(result.unwrap_err().downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_list() {
        let (result, out) = run(&["--list"]);
        let summary = result.unwrap();

        assert_eq!(summary.listed, 3);
        assert_eq!(summary.exit_code(), EXIT_SUCCESS);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "MicroBench Plan:");
        assert!(lines[1].starts_with("├── math.sum ("));
        assert!(lines[2].starts_with("├── math.manual_sum [manual] ("));
        assert_eq!(lines[4], "3 benchmarks found.");
    }

    #[test]
    fn test_list_honours_filter() {
        let (result, out) = run(&["--list", "manual"]);
        assert_eq!(result.unwrap().listed, 1);
        assert!(out.contains("math.manual_sum"));
        assert!(!out.contains("math.sum "));

        let (result, _) = run(&["list"]);
        assert_eq!(result.unwrap().listed, 3);
    }

    #[test]
    fn test_human_run_continues_after_failure() {
        let (result, out) = run(&["-n", "3", "--iterations", "4"]);
        let summary = result.unwrap();
        let report = summary.report.as_ref().unwrap();

        let statuses: Vec<_> = report.results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![CaseStatus::Passed, CaseStatus::Passed, CaseStatus::Failed]
        );
        assert_eq!(summary.exit_code(), EXIT_FAILURE);
        assert!(out.starts_with("[==========] Running 3 benchmarks.\n"));
        assert!(out.contains("[  FAILED  ] math.explode (panic: overflow)"));
    }

    #[test]
    fn test_json_run_with_filter() {
        let (result, out) = run(&["--format", "json", "-q", "-n", "2", "sum"]);
        assert_eq!(result.unwrap().exit_code(), EXIT_SUCCESS);

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let ids: Vec<_> = value["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["math.sum", "math.manual_sum"]);
        assert_eq!(value["meta"]["config"]["filter"], "sum");
    }

    #[test]
    fn test_unstable_only_fails_when_asked() {
        let summary = RunSummary {
            report: Some({
                let (result, _) = run(&["-q", "-n", "3", "--iterations", "2", "math.sum"]);
                let mut report = result.unwrap().report.unwrap();
                report.results[0].status = CaseStatus::Unstable;
                report
            }),
            listed: 0,
            fail_on_unstable: false,
        };
        assert_eq!(summary.exit_code(), EXIT_SUCCESS);

        let strict = RunSummary {
            fail_on_unstable: true,
            ..summary
        };
        assert_eq!(strict.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_run_all_usage_error() {
        assert_eq!(run_all(registry(), ["bench", "--no-such-flag"]), EXIT_USAGE);
    }

    #[test]
    fn test_run_all_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let path_arg = path.to_string_lossy().to_string();

        let code = run_all(
            registry(),
            [
                "bench",
                "--format",
                "csv",
                "-q",
                "-n",
                "2",
                "--iterations",
                "2",
                "-o",
                path_arg.as_str(),
            ],
        );
        assert_eq!(code, EXIT_FAILURE);

        let csv = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], microbench_report::CSV_HEADER);
        assert!(lines[1].starts_with("math.sum,passed,2,"));
        assert!(lines[3].starts_with("math.explode,failed,"));
    }

    #[test]
    fn test_run_cases_rejects_duplicates() {
        let code = run_cases(
            [
                BenchmarkCase::new("dup", "x", || ()),
                BenchmarkCase::new("dup", "x", || ()),
            ],
            ["bench", "--list"],
        );
        assert_eq!(code, EXIT_USAGE);
    }
}
