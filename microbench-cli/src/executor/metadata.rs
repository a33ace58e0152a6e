//! System Metadata Collection
//!
//! Collects system information for report metadata.
//!
//! ## Collected Data
//!
//! - **OS**: Operating system name and architecture
//! - **CPU**: Model name and core count
//! - **Config**: Loop parameters the run used
//! - **Timestamp**: UTC time of report generation
//!
//! The CPU model is read from `/proc/cpuinfo` and degrades to "Unknown" on
//! other platforms.

use super::execution::ExecutionConfig;
use chrono::Utc;
use microbench_report::{ReportConfig, ReportMeta, SystemInfo};

/// Build report metadata including system info
pub fn build_report_meta(config: &ExecutionConfig) -> ReportMeta {
    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: num_cpus(),
    };

    let lc = &config.loop_config;
    ReportMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        system,
        config: ReportConfig {
            samples: lc.samples,
            min_sample_time_ns: lc.min_sample_time_ns,
            max_iterations_per_sample: lc.max_iterations_per_sample,
            iterations: lc.iterations,
            max_confidence_pct: config.max_confidence_pct,
            filter: config.filter.clone(),
        },
    }
}

/// Get CPU model name from /proc/cpuinfo (Linux only)
fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

/// Get number of available CPU cores
fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}
