use std::path::{Path, PathBuf};

use crate::cli::{Cli, ColorMode};
use crate::error::{AnalyzerError, Result};
use crate::parallel::ParallelConfig;

/// Upper bound on worker threads accepted from the command line
pub const MAX_THREADS: usize = 1000;

/// Main configuration struct for reqtrace
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub performance: PerformanceConfig,
    pub logging: LoggingConfig,
}

/// Input configuration
#[derive(Debug, Clone, PartialEq)]
pub struct InputConfig {
    pub dir: PathBuf,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    /// File path, or "-" for stdout
    pub target: String,
    pub pretty: bool,
    pub stats: bool,
}

/// Performance configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceConfig {
    pub threads: usize,
}

/// Diagnostic output configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub verbose: u8,
    pub quiet: u8,
    pub color: ColorMode,
}

impl AnalyzerConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            input: InputConfig {
                dir: PathBuf::from(&cli.input_dir),
            },
            output: OutputConfig {
                target: cli.output_file.clone(),
                pretty: !cli.compact,
                stats: cli.stats,
            },
            performance: PerformanceConfig {
                threads: cli.threads,
            },
            logging: LoggingConfig {
                verbose: cli.verbose,
                quiet: cli.quiet,
                color: cli.color,
            },
        }
    }

    /// Reject settings that cannot work before any thread or file is touched
    pub fn validate(&self) -> Result<()> {
        validate_input_dir(&self.input.dir)?;

        if self.performance.threads == 0 {
            return Err(AnalyzerError::configuration(
                "thread count must be at least 1",
            ));
        }
        if self.performance.threads > MAX_THREADS {
            return Err(AnalyzerError::configuration(format!(
                "thread count too high (max {})",
                MAX_THREADS
            )));
        }

        if self.output.target.is_empty() {
            return Err(AnalyzerError::configuration("output file must not be empty"));
        }

        Ok(())
    }

    pub fn parallel_config(&self) -> ParallelConfig {
        ParallelConfig::with_workers(self.performance.threads)
    }
}

impl LoggingConfig {
    /// Default filter directive derived from -v/-q; `warn` when neither is given
    pub fn log_level(&self) -> &'static str {
        match i16::from(self.verbose) - i16::from(self.quiet) {
            i16::MIN..=-2 => "off",
            -1 => "error",
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            input: InputConfig {
                dir: PathBuf::from("."),
            },
            output: OutputConfig {
                target: "results.json".to_string(),
                pretty: true,
                stats: false,
            },
            performance: PerformanceConfig {
                threads: crate::parallel::DEFAULT_NUM_WORKERS,
            },
            logging: LoggingConfig {
                verbose: 0,
                quiet: 0,
                color: ColorMode::Auto,
            },
        }
    }
}

fn validate_input_dir(dir: &Path) -> Result<()> {
    let metadata = std::fs::metadata(dir).map_err(|e| {
        AnalyzerError::configuration(format!(
            "input directory {} is not accessible: {}",
            dir.display(),
            e
        ))
    })?;

    if !metadata.is_dir() {
        return Err(AnalyzerError::configuration(format!(
            "input path {} is not a directory",
            dir.display()
        )));
    }

    Ok(())
}
