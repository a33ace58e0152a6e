//! Bencher - Measurement Loops
//!
//! Two timing modes:
//! - **Whole-body**: the harness owns the loop. A calibration phase doubles the
//!   iteration count until one timed pass is long enough to swamp clock
//!   overhead, then each sample is one timed pass divided by its iteration count.
//! - **Manual**: the body owns the timing. It runs once per pass and opens
//!   [`Region`]s through the [`Bencher`]; every closed region is one sample.

use crate::measure::Timer;

/// Default number of samples (timed passes) per case
pub const DEFAULT_SAMPLE_COUNT: usize = 10;

/// Minimum number of passes, whatever the configuration says
pub const MIN_SAMPLE_COUNT: usize = 1;

/// Default minimum duration of one whole-body pass (5 ms)
pub const DEFAULT_MIN_SAMPLE_TIME_NS: u64 = 5_000_000;

/// Default cap on calibrated iterations per pass
pub const DEFAULT_MAX_ITERATIONS_PER_SAMPLE: u64 = 1 << 30;

/// Loop parameters for one case, after overrides are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Number of timed passes
    pub samples: usize,
    /// Fixed iterations per whole-body pass; `None` calibrates
    pub iterations: Option<u64>,
    /// Calibration stops once a pass takes at least this long
    pub min_sample_time_ns: u64,
    /// Calibration never grows a pass beyond this many iterations
    pub max_iterations_per_sample: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLE_COUNT,
            iterations: None,
            min_sample_time_ns: DEFAULT_MIN_SAMPLE_TIME_NS,
            max_iterations_per_sample: DEFAULT_MAX_ITERATIONS_PER_SAMPLE,
        }
    }
}

/// Timing samples collected for one case
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measurement {
    /// Raw nanoseconds per timed pass (whole-body, spanning
    /// `iters_per_sample` iterations) or per region (manual), in recording
    /// order
    pub samples: Vec<u64>,
    /// Iterations bracketed by each timed pass (1 for manual cases)
    pub iters_per_sample: u64,
    /// Total body executions, calibration included
    pub iterations: u64,
    /// Sum of all measured pass or region durations
    pub total_time_ns: u64,
}

impl Measurement {
    /// No sample was recorded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples scaled to nanoseconds per iteration
    pub fn per_iteration_nanos(&self) -> Vec<f64> {
        let iters = self.iters_per_sample.max(1) as f64;
        self.samples.iter().map(|&s| s as f64 / iters).collect()
    }
}

/// Handle passed to manual-timing bodies for opening timed regions.
///
/// ```ignore
/// BenchmarkCase::manual("strings", "sum", |b: &mut Bencher| {
///     let input: Vec<u32> = (0..1024).collect(); // not timed
///     b.measure(|| input.iter().sum::<u32>());     // timed
/// });
/// ```
#[derive(Debug, Default)]
pub struct Bencher {
    samples: Vec<u64>,
    total_time_ns: u64,
    passes: u64,
}

impl Bencher {
    /// Create an empty Bencher
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a timed region. Timing stops and the sample is recorded when the
    /// returned guard is dropped.
    #[inline]
    pub fn region(&mut self) -> Region<'_> {
        Region {
            bencher: self,
            timer: Timer::start(),
        }
    }

    /// Time `f` as one region and return its output
    #[inline]
    pub fn measure<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let _region = self.region();
        std::hint::black_box(f())
    }

    /// Number of regions closed so far
    pub fn regions_recorded(&self) -> usize {
        self.samples.len()
    }

    /// Zero-based index of the pass currently running
    pub fn pass(&self) -> u64 {
        self.passes
    }

    #[inline]
    fn record(&mut self, nanos: u64) {
        self.samples.push(nanos);
        self.total_time_ns = self.total_time_ns.saturating_add(nanos);
    }

    /// Finalize and return results
    pub fn finish(self) -> Measurement {
        Measurement {
            iterations: self.passes,
            iters_per_sample: 1,
            total_time_ns: self.total_time_ns,
            samples: self.samples,
        }
    }
}

/// A timed region inside a manual benchmark body.
///
/// Records exactly one sample when dropped, including during unwinding.
#[must_use = "a region measures until it is dropped; binding it to `_` closes it immediately"]
pub struct Region<'a> {
    bencher: &'a mut Bencher,
    timer: Timer,
}

impl Region<'_> {
    /// Close the region explicitly
    #[inline]
    pub fn end(self) {}
}

impl Drop for Region<'_> {
    #[inline]
    fn drop(&mut self) {
        let nanos = self.timer.stop();
        self.bencher.record(nanos);
    }
}

/// Time `iters` back-to-back executions of `body` with one timer
#[inline]
fn time_pass<F>(body: &mut F, iters: u64) -> u64
where
    F: FnMut(),
{
    let timer = Timer::start();
    for _ in 0..iters {
        body();
    }
    timer.stop()
}

/// Find an iteration count whose pass lasts at least `min_sample_time_ns`.
///
/// Starts at one iteration and doubles, stopping at
/// `max_iterations_per_sample`. Returns the chosen count and the number of
/// body executions spent calibrating.
pub fn calibrate<F>(body: &mut F, config: &LoopConfig) -> (u64, u64)
where
    F: FnMut(),
{
    let max_iters = config.max_iterations_per_sample.max(1);
    let mut iters = 1u64;
    let mut executed = 0u64;

    loop {
        let elapsed = time_pass(body, iters);
        executed = executed.saturating_add(iters);

        if elapsed >= config.min_sample_time_ns || iters >= max_iters {
            break;
        }
        iters = iters.saturating_mul(2).min(max_iters);
    }

    (iters, executed)
}

/// Run a whole-body case: calibrate (unless the iteration count is fixed),
/// then record one sample per timed pass.
pub fn measure_whole_body<F>(config: &LoopConfig, mut body: F) -> Measurement
where
    F: FnMut(),
{
    let passes = config.samples.max(MIN_SAMPLE_COUNT);

    let (iters_per_sample, mut iterations) = match config.iterations {
        Some(n) => (n.max(1), 0),
        None => calibrate(&mut body, config),
    };
    tracing::debug!(iters_per_sample, passes, "whole-body loop configured");

    let mut samples = Vec::with_capacity(passes);
    let mut total_time_ns = 0u64;

    for _ in 0..passes {
        let elapsed = time_pass(&mut body, iters_per_sample);
        iterations = iterations.saturating_add(iters_per_sample);
        total_time_ns = total_time_ns.saturating_add(elapsed);
        samples.push(elapsed);
    }

    Measurement {
        samples,
        iters_per_sample,
        iterations,
        total_time_ns,
    }
}

/// Run a manual case: invoke the body once per pass and keep only the
/// regions it records.
pub fn measure_manual<F>(config: &LoopConfig, mut body: F) -> Measurement
where
    F: FnMut(&mut Bencher),
{
    let passes = config.samples.max(MIN_SAMPLE_COUNT);
    let mut bencher = Bencher::new();

    for _ in 0..passes {
        body(&mut bencher);
        bencher.passes += 1;
    }

    tracing::debug!(
        passes,
        regions = bencher.regions_recorded(),
        "manual loop finished"
    );
    bencher.finish()
}
