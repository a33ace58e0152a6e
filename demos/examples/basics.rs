//! Basic MicroBench Suite
//!
//! Whole-body cases, a manual-timing case and a fixture shared by three cases.
//!
//! Run with:
//!   cargo run --example basics -p microbench-demos --release
//!   cargo run --example basics -p microbench-demos --release -- --list
//!   cargo run --example basics -p microbench-demos --release -- haystack

use microbench::prelude::*;
use std::time::Duration;

const COPY_LEN: usize = 8 * 1024 * 1024;
const HAYSTACK_LEN: usize = 128 * 1024 * 1024;

// ============================================================================
// Whole-body cases
// ============================================================================

fn tenth_of_a_second() {
    std::thread::sleep(Duration::from_millis(100));
}

fn copy_buffer() -> impl FnMut() -> usize {
    let src = vec![0u8; COPY_LEN];
    let mut dst = vec![0u8; COPY_LEN];
    move || {
        dst.copy_from_slice(do_nothing(&src));
        do_nothing(&dst).len()
    }
}

// ============================================================================
// Manual timing
// ============================================================================

fn sum_region(b: &mut Bencher) {
    let scratch = [0i32; 1024];
    do_nothing(&scratch);

    let sum = b.measure(|| (0..1024).sum::<i32>());
    do_nothing(sum);
}

// ============================================================================
// Fixture: a large buffer with a single needle in the middle
// ============================================================================

#[derive(Default)]
struct Haystack {
    data: Vec<u8>,
}

impl Fixture for Haystack {
    fn setup(&mut self) -> anyhow::Result<()> {
        self.data = vec![b' '; HAYSTACK_LEN];
        self.data[HAYSTACK_LEN / 2] = b'f';
        Ok(())
    }

    fn teardown(&mut self) -> anyhow::Result<()> {
        self.data = Vec::new();
        Ok(())
    }
}

fn find_first(h: &mut Haystack) -> Option<usize> {
    do_nothing(&h.data).iter().position(|&c| c == b'f')
}

fn find_last(h: &mut Haystack) -> Option<usize> {
    do_nothing(&h.data).iter().rposition(|&c| c == b'f')
}

fn find_in_prefix(b: &mut Bencher, h: &mut Haystack) {
    let prefix = h.data[..512].to_vec();

    let _region = b.region();
    do_nothing(prefix.iter().position(|&c| c == b'f'));
}

fn main() {
    let cases = [
        BenchmarkCase::new("basics", "tenth_of_a_second", tenth_of_a_second).samples(3),
        BenchmarkCase::new("basics", "copy_8mb", copy_buffer()),
        BenchmarkCase::manual("basics", "sum_region", sum_region),
        BenchmarkCase::fixture("haystack", "position", find_first),
        BenchmarkCase::fixture("haystack", "rposition", find_last),
        BenchmarkCase::fixture_manual("haystack", "position_prefix", find_in_prefix),
    ];

    std::process::exit(run_cases(cases, std::env::args_os()));
}
