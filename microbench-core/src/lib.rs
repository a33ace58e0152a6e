#![warn(missing_docs)]
//! MicroBench Core - Registry, Timing and Fixtures
//!
//! This crate provides the in-process pieces of the harness:
//! - [`Registry`] of [`BenchmarkCase`]s, unique per (suite, name)
//! - Monotonic [`Timer`] built on `std::time::Instant`
//! - [`Fixture`] lifecycle with drop-guaranteed teardown
//! - Whole-body and manual-region measurement loops ([`Bencher`])

mod bencher;
mod case;
mod fixture;
mod measure;
mod registry;

pub use bencher::{
    Bencher, DEFAULT_MAX_ITERATIONS_PER_SAMPLE, DEFAULT_MIN_SAMPLE_TIME_NS, DEFAULT_SAMPLE_COUNT,
    LoopConfig, MIN_SAMPLE_COUNT, Measurement, Region, calibrate, measure_manual,
    measure_whole_body,
};
pub use case::{BenchmarkCase, CaseError, TimingMode};
pub use fixture::{Fixture, FixturePhase, FixtureSlot, run_with_fixture};
pub use measure::{Instant, Timer, duration_to_nanos, elapsed_nanos};
pub use registry::{Registry, RegistryError};

/// Hide `value` from the optimizer so the computation producing it is kept
#[inline(always)]
pub fn do_nothing<T>(value: T) -> T {
    std::hint::black_box(value)
}
