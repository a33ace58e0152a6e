//! Monotonic Timing
//!
//! Thin wrappers over `std::time::Instant`. Wall-clock time is never consulted,
//! so clock adjustments cannot produce negative or skewed durations.

use std::time::Duration;

// ─── Instant ─────────────────────────────────────────────────────────────────

/// Monotonic timestamp for benchmarking
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Instant {
    instant: std::time::Instant,
}

impl Instant {
    /// Capture current instant
    #[inline(always)]
    pub fn now() -> Self {
        Self {
            instant: std::time::Instant::now(),
        }
    }

    /// Compute elapsed time since this instant
    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.instant.elapsed()
    }

    /// Duration from `earlier` to `self`, zero if `earlier` is later
    #[inline(always)]
    pub fn duration_since(&self, earlier: Instant) -> Duration {
        self.instant.saturating_duration_since(earlier.instant)
    }
}

/// Nanoseconds between two instants taken in call order.
///
/// Saturates at zero, so the result is never negative even if the pair is
/// passed in the wrong order.
#[inline(always)]
pub fn elapsed_nanos(start: Instant, end: Instant) -> u64 {
    duration_to_nanos(end.duration_since(start))
}

/// Convert a duration to whole nanoseconds, clamping at `u64::MAX`
#[inline(always)]
pub fn duration_to_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

// ─── Timer ───────────────────────────────────────────────────────────────────

/// Timer for measuring a single bracketed region
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed nanoseconds
    #[inline(always)]
    pub fn stop(&self) -> u64 {
        elapsed_nanos(self.start, Instant::now())
    }
}
