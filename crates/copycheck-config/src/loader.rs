//! Configuration loader
//!
//! Finds `copycheck.toml`, then applies environment overrides:
//! - `COPYCHECK_ITERATIONS`, `COPYCHECK_WARMUP`, `COPYCHECK_ATTEMPTS` (positive integers)
//! - `COPYCHECK_VERBOSE` (`1`/`true`/`yes`)
//! - `COPYCHECK_NO_COLOR` or `NO_COLOR` (any value)

use crate::harness::HarnessConfig;
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the configuration file searched for
pub const CONFIG_FILE_NAME: &str = "copycheck.toml";

/// Resolved configuration and where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub harness: HarnessConfig,

    /// The file that was read, `None` when running on defaults
    pub source: Option<PathBuf>,
}

/// Configuration loader
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Skip environment overrides (tests, embedding)
    ignore_env: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { ignore_env: false }
    }

    /// Do not consult `COPYCHECK_*` variables
    pub fn without_env(mut self) -> Self {
        self.ignore_env = true;
        self
    }

    /// Walk up from `start_dir` looking for `copycheck.toml`; fall back to
    /// defaults when none exists
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<LoadedConfig> {
        let mut current = Some(start_dir);
        while let Some(dir) = current {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return self.load_from_file(&candidate);
            }
            current = dir.parent();
        }

        self.finish(HarnessConfig::default(), None)
    }

    /// Load an explicit config file; a missing file is an error
    pub fn load_from_file(&self, path: &Path) -> ConfigResult<LoadedConfig> {
        let harness = HarnessConfig::load_from_file(path)?;
        self.finish(harness, Some(path.to_path_buf()))
    }

    fn finish(&self, harness: HarnessConfig, source: Option<PathBuf>) -> ConfigResult<LoadedConfig> {
        let harness = if self.ignore_env {
            harness
        } else {
            apply_env_overrides(harness)?
        };
        harness.validate()?;
        Ok(LoadedConfig { harness, source })
    }
}

fn apply_env_overrides(mut config: HarnessConfig) -> ConfigResult<HarnessConfig> {
    if let Some(value) = env_count("COPYCHECK_ITERATIONS")? {
        config.executor.iterations = value;
    }
    if let Some(value) = env_count("COPYCHECK_WARMUP")? {
        config.executor.warmup_iterations = value;
    }
    if let Some(value) = env_count("COPYCHECK_ATTEMPTS")? {
        config.executor.violation_attempts = value;
    }
    if let Ok(verbose) = env::var("COPYCHECK_VERBOSE") {
        config.output.verbose = matches!(verbose.to_lowercase().as_str(), "true" | "1" | "yes");
    }
    if env::var("COPYCHECK_NO_COLOR").is_ok() || env::var("NO_COLOR").is_ok() {
        config.output.color = false;
    }
    Ok(config)
}

fn env_count(var: &str) -> ConfigResult<Option<u32>> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                field: var.to_string(),
                reason: format!("'{}' is not a count: {}", raw, e),
            }),
        Err(_) => Ok(None),
    }
}
