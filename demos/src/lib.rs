//! MicroBench Examples
//!
//! Runnable demonstrations of MicroBench. This crate is not published; it
//! exists solely to host examples that depend on `microbench`.
//!
//! Run any example with:
//! ```sh
//! cargo run --example <name> -p microbench-demos --release
//! ```
//!
//! | Example | Feature |
//! |---------|---------|
//! | `basics` | Whole-body cases, manual regions, fixtures |
//! | `failures` | Panics, fixture errors and empty manual cases |
//!
//! Every example accepts the harness flags, e.g. `-- --list`,
//! `-- --format json -o out.json` or a substring filter.
