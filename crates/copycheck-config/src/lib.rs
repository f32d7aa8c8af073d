//! copycheck configuration
//!
//! Harness settings are resolved from, in increasing precedence:
//! 1. Built-in defaults
//! 2. `copycheck.toml` (found by walking up from the working directory, or
//!    given explicitly)
//! 3. Environment variables (`COPYCHECK_*`, `NO_COLOR`)
//! 4. CLI flags (applied by the caller)
//!
//! # Example
//!
//! ```no_run
//! use copycheck_config::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::new().load_from_directory(Path::new(".")).unwrap();
//! assert!(config.harness.executor.iterations > 0);
//! ```

pub mod harness;
pub mod loader;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use harness::{ExecutorConfig, HarnessConfig, OutputConfig};
pub use loader::{ConfigLoader, LoadedConfig, CONFIG_FILE_NAME};
