//! Structured logging configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Default filter directive.
const DEFAULT_LEVEL: &str = "info";

/// Filter directive used with `--verbose`.
const VERBOSE_LEVEL: &str = "debug";

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Log file; `None` logs to stderr.
    pub file: Option<PathBuf>,
    /// Level filter.
    pub filter: EnvFilter,
}

impl LoggingConfig {
    /// Builds logging configuration from settings.
    ///
    /// `RUST_LOG` takes precedence over the verbosity flag.
    #[must_use]
    pub fn from_settings(file: Option<PathBuf>, format: LogFormat, verbose: bool) -> Self {
        let default_level = if verbose { VERBOSE_LEVEL } else { DEFAULT_LEVEL };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        Self {
            format,
            file,
            filter,
        }
    }
}
