//! Harness settings (`copycheck.toml`)

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level harness configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Iteration budgets
    pub executor: ExecutorConfig,

    /// Report formatting
    pub output: OutputConfig,
}

/// Iteration budgets for scenario execution and driver hooks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutorConfig {
    /// Invocations per scenario. Large enough by default to push a tiered
    /// runtime past its compilation threshold.
    pub iterations: u32,

    /// Calls made by warm-up hooks before their scenario runs
    pub warmup_iterations: u32,

    /// Crafted invalid calls made by expected-violation hooks
    pub violation_attempts: u32,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            iterations: 20_000,
            warmup_iterations: 20_000,
            violation_attempts: 10,
        }
    }
}

/// Report formatting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Print every scenario, not only failures
    pub verbose: bool,

    /// Colored terminal output
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            color: true,
        }
    }
}

impl HarnessConfig {
    /// Config with small budgets, for tests
    pub fn for_testing() -> Self {
        Self {
            executor: ExecutorConfig {
                iterations: 64,
                warmup_iterations: 16,
                violation_attempts: 3,
            },
            output: OutputConfig {
                verbose: false,
                color: false,
            },
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str, origin: &Path) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: origin.to_path_buf(),
            error: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Every budget must be positive
    pub fn validate(&self) -> ConfigResult<()> {
        let budgets = [
            ("executor.iterations", self.executor.iterations),
            ("executor.warmup_iterations", self.executor.warmup_iterations),
            ("executor.violation_attempts", self.executor.violation_attempts),
        ];
        for (field, value) in budgets {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }
}
