//! Benchmark Case Descriptors
//!
//! A [`BenchmarkCase`] pairs a `(suite, name)` identity with a type-erased
//! runner. The four constructors cover every combination of timing mode
//! (whole-body or manual region) and fixture use.

use crate::bencher::{Bencher, LoopConfig, Measurement, measure_manual, measure_whole_body};
use crate::fixture::{Fixture, run_with_fixture};
use std::panic::{AssertUnwindSafe, Location, catch_unwind};
use thiserror::Error;

/// How a case's duration is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingMode {
    /// The harness times the whole body, amortized over many iterations
    WholeBody,
    /// The body marks timed regions itself
    Manual,
}

/// Why a single case failed. Never aborts the run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaseError {
    /// `Fixture::setup` returned an error
    #[error("fixture setup failed: {0}")]
    Setup(String),

    /// `Fixture::teardown` returned an error
    #[error("fixture teardown failed: {0}")]
    Teardown(String),

    /// The body (or a fixture hook) panicked
    #[error("benchmark panicked: {0}")]
    Panic(String),
}

impl CaseError {
    /// Short machine-readable failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            CaseError::Setup(_) => "setup",
            CaseError::Teardown(_) => "teardown",
            CaseError::Panic(_) => "panic",
        }
    }

    /// Failure message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            CaseError::Setup(m) | CaseError::Teardown(m) | CaseError::Panic(m) => m,
        }
    }
}

type CaseRunner = Box<dyn FnMut(&LoopConfig) -> Result<Measurement, CaseError>>;

/// One registered benchmark
pub struct BenchmarkCase {
    suite: String,
    name: String,
    timing: TimingMode,
    fixture: Option<&'static str>,
    file: &'static str,
    line: u32,
    samples: Option<usize>,
    iterations: Option<u64>,
    runner: CaseRunner,
}

impl BenchmarkCase {
    fn from_runner(
        suite: impl Into<String>,
        name: impl Into<String>,
        timing: TimingMode,
        fixture: Option<&'static str>,
        location: &'static Location<'static>,
        runner: CaseRunner,
    ) -> Self {
        Self {
            suite: suite.into(),
            name: name.into(),
            timing,
            fixture,
            file: location.file(),
            line: location.line(),
            samples: None,
            iterations: None,
            runner,
        }
    }

    /// Whole-body case: the harness times repeated calls of `body`.
    #[track_caller]
    pub fn new<T, B>(suite: impl Into<String>, name: impl Into<String>, mut body: B) -> Self
    where
        B: FnMut() -> T + 'static,
    {
        let runner: CaseRunner = Box::new(move |cfg| {
            Ok(measure_whole_body(cfg, || {
                std::hint::black_box(body());
            }))
        });
        Self::from_runner(
            suite,
            name,
            TimingMode::WholeBody,
            None,
            Location::caller(),
            runner,
        )
    }

    /// Manual case: only the regions `body` opens on the [`Bencher`] are timed.
    #[track_caller]
    pub fn manual<B>(suite: impl Into<String>, name: impl Into<String>, mut body: B) -> Self
    where
        B: FnMut(&mut Bencher) + 'static,
    {
        let runner: CaseRunner = Box::new(move |cfg| Ok(measure_manual(cfg, &mut body)));
        Self::from_runner(
            suite,
            name,
            TimingMode::Manual,
            None,
            Location::caller(),
            runner,
        )
    }

    /// Whole-body case over fixture `F`, set up once for the whole loop.
    #[track_caller]
    pub fn fixture<F, T, B>(suite: impl Into<String>, name: impl Into<String>, mut body: B) -> Self
    where
        F: Fixture,
        B: FnMut(&mut F) -> T + 'static,
    {
        let runner: CaseRunner = Box::new(move |cfg| {
            run_with_fixture::<F, _>(|slot| {
                measure_whole_body(cfg, || {
                    slot.with_body(|state| {
                        std::hint::black_box(body(state));
                    })
                })
            })
        });
        Self::from_runner(
            suite,
            name,
            TimingMode::WholeBody,
            Some(fixture_tag::<F>()),
            Location::caller(),
            runner,
        )
    }

    /// Manual case over fixture `F`, set up once for the whole loop.
    #[track_caller]
    pub fn fixture_manual<F, B>(
        suite: impl Into<String>,
        name: impl Into<String>,
        mut body: B,
    ) -> Self
    where
        F: Fixture,
        B: FnMut(&mut Bencher, &mut F) + 'static,
    {
        let runner: CaseRunner = Box::new(move |cfg| {
            run_with_fixture::<F, _>(|slot| {
                measure_manual(cfg, |bencher| slot.with_body(|state| body(bencher, state)))
            })
        });
        Self::from_runner(
            suite,
            name,
            TimingMode::Manual,
            Some(fixture_tag::<F>()),
            Location::caller(),
            runner,
        )
    }

    /// Override the number of samples for this case
    pub fn samples(mut self, samples: usize) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Fix the iterations per whole-body sample, skipping calibration
    pub fn iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Suite name
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Case name within the suite
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display identifier, `suite.name`
    pub fn id(&self) -> String {
        format!("{}.{}", self.suite, self.name)
    }

    /// Timing mode
    pub fn timing(&self) -> TimingMode {
        self.timing
    }

    /// Fixture type tag, for fixture-based cases
    pub fn fixture_tag(&self) -> Option<&'static str> {
        self.fixture
    }

    /// Source file of the registration call
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Source line of the registration call
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Per-case sample override
    pub fn sample_override(&self) -> Option<usize> {
        self.samples
    }

    /// Per-case iteration override
    pub fn iteration_override(&self) -> Option<u64> {
        self.iterations
    }

    /// Run the case once with the given loop parameters.
    ///
    /// Panics from the body or fixture hooks are caught and returned as
    /// [`CaseError::Panic`]; fixture teardown has already run by then.
    pub fn execute(&mut self, config: &LoopConfig) -> Result<Measurement, CaseError> {
        let runner = &mut self.runner;
        match catch_unwind(AssertUnwindSafe(|| runner(config))) {
            Ok(result) => result,
            Err(panic) => {
                let message = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                Err(CaseError::Panic(message))
            }
        }
    }
}

impl std::fmt::Debug for BenchmarkCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkCase")
            .field("suite", &self.suite)
            .field("name", &self.name)
            .field("timing", &self.timing)
            .field("fixture", &self.fixture)
            .field("file", &self.file)
            .field("line", &self.line)
            .field("samples", &self.samples)
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}

/// Unqualified type name of a fixture, e.g. `Haystack`
fn fixture_tag<F: 'static>() -> &'static str {
    let full = std::any::type_name::<F>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
