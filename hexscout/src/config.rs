use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{SearchError, SearchResult};

/// Configuration for a search run.
///
/// # Configuration Locations
///
/// Values are merged from these files, later ones taking precedence:
/// 1. Global `$CONFIG_DIR/hexscout/config.yaml`
/// 2. Local `.hexscout.yaml` in the current directory
/// 3. A file passed with `--config`
///
/// Command-line flags override all of them (see [`SearchConfig::merge_with_cli`]).
///
/// # Configuration Format
///
/// ```yaml
/// # Binary to scan
/// binary_path: "firmware.bin"
///
/// # JSON list of hex/regex patterns
/// patterns_path: "patterns.json"
///
/// # Worker threads (default: CPU cores)
/// worker_count: 8
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "warn"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Binary file to scan
    #[serde(default)]
    pub binary_path: PathBuf,

    /// JSON file holding the list of patterns
    #[serde(default)]
    pub patterns_path: PathBuf,

    /// Number of worker threads
    /// Defaults to number of CPU cores if not specified
    #[serde(default = "default_worker_count")]
    pub worker_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Print a summary instead of the JSON report
    #[serde(default)]
    pub stats_only: bool,

    /// Pretty-print the JSON report
    #[serde(default)]
    pub pretty: bool,
}

/// Values given on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub binary_path: Option<PathBuf>,
    pub patterns_path: Option<PathBuf>,
    pub worker_count: Option<NonZeroUsize>,
    pub log_level: Option<String>,
    pub stats_only: bool,
    pub pretty: bool,
}

pub fn default_worker_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            binary_path: PathBuf::new(),
            patterns_path: PathBuf::new(),
            worker_count: default_worker_count(),
            log_level: default_log_level(),
            stats_only: false,
            pretty: false,
        }
    }
}

impl SearchConfig {
    /// Creates a config for the given inputs with default settings
    pub fn new(binary_path: impl Into<PathBuf>, patterns_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
            patterns_path: patterns_path.into(),
            ..Default::default()
        }
    }

    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("hexscout/config.yaml")),
            Some(PathBuf::from(".hexscout.yaml")),
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Applies command-line values on top of file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(path) = cli.binary_path {
            self.binary_path = path;
        }
        if let Some(path) = cli.patterns_path {
            self.patterns_path = path;
        }
        if let Some(count) = cli.worker_count {
            self.worker_count = count;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        if cli.stats_only {
            self.stats_only = true;
        }
        if cli.pretty {
            self.pretty = true;
        }
        self
    }

    /// Checks that both inputs are set
    pub fn validate(&self) -> SearchResult<()> {
        if self.binary_path.as_os_str().is_empty() {
            return Err(SearchError::config_error("no binary file given (--bin)"));
        }
        if self.patterns_path.as_os_str().is_empty() {
            return Err(SearchError::config_error(
                "no pattern file given (--pattern)",
            ));
        }
        Ok(())
    }
}
