//! Failure Handling
//!
//! One case panics, one fixture cannot be set up, one manual case forgets to
//! open a region. The remaining cases still run and the process exits with 1.
//!
//! Run with: cargo run --example failures -p microbench-demos --release

use microbench::prelude::*;
use std::collections::HashMap;

#[derive(Default)]
struct Connection {
    open: bool,
}

impl Fixture for Connection {
    fn setup(&mut self) -> anyhow::Result<()> {
        anyhow::bail!("connection refused (127.0.0.1:5432)")
    }

    fn teardown(&mut self) -> anyhow::Result<()> {
        // Runs even though setup failed
        self.open = false;
        Ok(())
    }
}

fn main() {
    let mut registry = Registry::new();

    let cases = [
        BenchmarkCase::new("collections", "hashmap_insert", || {
            let mut map = HashMap::with_capacity(256);
            for i in 0u64..256 {
                map.insert(i, i.wrapping_mul(2654435761));
            }
            map.len()
        }),
        BenchmarkCase::new("collections", "out_of_bounds", || {
            let v = do_nothing(vec![1u32, 2, 3]);
            v[do_nothing(7)]
        }),
        BenchmarkCase::fixture("database", "query", |c: &mut Connection| c.open),
        BenchmarkCase::manual("manual", "no_region", |_b: &mut Bencher| {
            do_nothing((0..64u64).sum::<u64>());
        }),
        BenchmarkCase::new("collections", "vec_sort", || {
            let mut v: Vec<u32> = (0..1024).rev().collect();
            v.sort_unstable();
            v
        }),
    ];

    for case in cases {
        if let Err(e) = registry.register(case) {
            eprintln!("error: {e}");
            std::process::exit(microbench::EXIT_USAGE);
        }
    }

    std::process::exit(run_all(registry, std::env::args_os()));
}
