//! Configuration loading from microbench.toml
//!
//! MicroBench configuration can be specified in a `microbench.toml` file in the
//! project root. The configuration is automatically discovered by walking up
//! from the current directory. Command-line flags override file values.

use microbench_core::{
    DEFAULT_MAX_ITERATIONS_PER_SAMPLE, DEFAULT_SAMPLE_COUNT, LoopConfig, MIN_SAMPLE_COUNT,
};
use microbench_report::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up during discovery
pub const CONFIG_FILE_NAME: &str = "microbench.toml";

/// Errors loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// A duration string could not be parsed
    #[error("invalid duration '{0}': expected a number followed by ns, us, ms, s or m")]
    InvalidDuration(String),

    /// A value is out of range
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Dotted key, e.g. `runner.samples`
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// MicroBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MicroConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// CI configuration
    #[serde(default)]
    pub ci: CiConfig,
}

/// Measurement loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Timed passes per case
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Calibration target for one whole-body pass (e.g., "5ms")
    #[serde(default = "default_min_sample_time")]
    pub min_sample_time: String,
    /// Calibration ceiling for iterations per pass
    #[serde(default = "default_max_iterations_per_sample")]
    pub max_iterations_per_sample: u64,
    /// Fixed iterations per pass, skipping calibration
    #[serde(default)]
    pub iterations: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            min_sample_time: default_min_sample_time(),
            max_iterations_per_sample: default_max_iterations_per_sample(),
            iterations: None,
        }
    }
}

fn default_samples() -> usize {
    DEFAULT_SAMPLE_COUNT
}
fn default_min_sample_time() -> String {
    "5ms".to_string()
}
fn default_max_iterations_per_sample() -> u64 {
    DEFAULT_MAX_ITERATIONS_PER_SAMPLE
}

impl RunnerConfig {
    /// Validate and convert to the loop parameters the core crate runs with
    pub fn loop_config(&self) -> Result<LoopConfig, ConfigError> {
        if self.samples < MIN_SAMPLE_COUNT {
            return Err(ConfigError::InvalidValue {
                field: "runner.samples",
                message: format!("must be at least {MIN_SAMPLE_COUNT}"),
            });
        }
        if self.max_iterations_per_sample == 0 {
            return Err(ConfigError::InvalidValue {
                field: "runner.max_iterations_per_sample",
                message: "must be at least 1".to_string(),
            });
        }
        if self.iterations == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "runner.iterations",
                message: "must be at least 1".to_string(),
            });
        }

        Ok(LoopConfig {
            samples: self.samples,
            iterations: self.iterations,
            min_sample_time_ns: MicroConfig::parse_duration(&self.min_sample_time)?,
            max_iterations_per_sample: self.max_iterations_per_sample,
        })
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Default output format: "human", "json" or "csv"
    #[serde(default)]
    pub format: OutputFormat,
    /// Write the report to this file instead of stdout
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            file: None,
        }
    }
}

/// CI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CiConfig {
    /// Largest acceptable 99% confidence half-width, percent of the mean
    #[serde(default)]
    pub max_confidence: Option<f64>,
    /// Exit non-zero when a case exceeds `max_confidence`
    #[serde(default)]
    pub fail_on_unstable: bool,
}

impl MicroConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Walk up from `start` and load the first `microbench.toml` found
    pub fn discover_from(start: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                let config = Self::load(&config_path)?;
                return Ok(Some((config_path, config)));
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// [`discover_from`](Self::discover_from) the current directory
    pub fn discover() -> Result<Option<(PathBuf, Self)>, ConfigError> {
        match std::env::current_dir() {
            Ok(dir) => Self::discover_from(&dir),
            Err(_) => Ok(None),
        }
    }

    /// Parse duration string (e.g., "5ms", "100us", "2m") to nanoseconds
    pub fn parse_duration(s: &str) -> Result<u64, ConfigError> {
        let s = s.trim();
        let invalid = || ConfigError::InvalidDuration(s.to_string());
        if s.is_empty() {
            return Err(invalid());
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid());
        }

        let multiplier: u64 = match unit_part.trim().to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(invalid()),
        };

        Ok((value * multiplier as f64) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MicroConfig::default();
        assert_eq!(config.runner.samples, 10);
        assert_eq!(config.runner.min_sample_time, "5ms");
        assert_eq!(config.output.format, OutputFormat::Human);
        assert!(!config.ci.fail_on_unstable);

        let lc = config.runner.loop_config().unwrap();
        assert_eq!(lc, LoopConfig::default());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(MicroConfig::parse_duration("3s").unwrap(), 3_000_000_000);
        assert_eq!(MicroConfig::parse_duration("500ms").unwrap(), 500_000_000);
        assert_eq!(MicroConfig::parse_duration("100us").unwrap(), 100_000);
        assert_eq!(MicroConfig::parse_duration("100µs").unwrap(), 100_000);
        assert_eq!(MicroConfig::parse_duration("1000ns").unwrap(), 1000);
        assert_eq!(MicroConfig::parse_duration("2m").unwrap(), 120_000_000_000);
        assert_eq!(MicroConfig::parse_duration("1min").unwrap(), 60_000_000_000);
        assert_eq!(MicroConfig::parse_duration("1.5s").unwrap(), 1_500_000_000);
        // Bare numbers are seconds
        assert_eq!(MicroConfig::parse_duration("2").unwrap(), 2_000_000_000);
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        for bad in ["", "fast", "5 parsecs", "-1ms", "ms"] {
            assert!(
                matches!(
                    MicroConfig::parse_duration(bad),
                    Err(ConfigError::InvalidDuration(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [runner]
            samples = 25
            min_sample_time = "1ms"

            [output]
            format = "json"

            [ci]
            max_confidence = 2.5
        "#;

        let config: MicroConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.samples, 25);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.ci.max_confidence, Some(2.5));
        // Defaults should still apply
        assert_eq!(config.runner.max_iterations_per_sample, 1 << 30);

        let lc = config.runner.loop_config().unwrap();
        assert_eq!(lc.min_sample_time_ns, 1_000_000);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = toml::from_str::<MicroConfig>("[runner]\nwarmup_time = \"3s\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values() {
        let mut runner = RunnerConfig {
            samples: 0,
            ..RunnerConfig::default()
        };
        assert!(matches!(
            runner.loop_config(),
            Err(ConfigError::InvalidValue {
                field: "runner.samples",
                ..
            })
        ));

        runner.samples = 3;
        runner.iterations = Some(0);
        assert!(runner.loop_config().is_err());
    }

    #[test]
    fn test_discover_walks_up() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[runner]\nsamples = 3\n",
        )
        .unwrap();
        let nested = root.path().join("crates").join("bench");
        std::fs::create_dir_all(&nested).unwrap();

        let (path, config) = MicroConfig::discover_from(&nested).unwrap().unwrap();
        assert_eq!(path, root.path().join(CONFIG_FILE_NAME));
        assert_eq!(config.runner.samples, 3);
    }

    #[test]
    fn test_discover_reports_broken_file() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(CONFIG_FILE_NAME), "[runner\n").unwrap();

        let err = MicroConfig::discover_from(root.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
