//! Run command - execute the scenario plan

use crate::reporter::Reporter;
use anyhow::{Context, Result};
use copycheck_config::{ConfigLoader, HarnessConfig, LoadedConfig};
use copycheck_harness::{builtin_driver, RunReport, ScenarioResult};
use std::path::PathBuf;
use tracing::info;

/// Arguments for the run command; `None` keeps the configured value
#[derive(Debug, Default)]
pub struct RunArgs {
    pub iterations: Option<u32>,
    pub warmup: Option<u32>,
    pub attempts: Option<u32>,
    /// Only run scenarios whose name contains this pattern
    pub filter: Option<String>,
    /// Explicit config file instead of the nearest `copycheck.toml`
    pub config: Option<PathBuf>,
    pub json: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Run the plan; `Ok(false)` when the report has failures
pub fn run(args: RunArgs) -> Result<bool> {
    let loaded = load_config(args.config.as_ref())?;
    let config = apply_flags(loaded.harness, &args)?;

    info!(
        source = ?loaded.source,
        iterations = config.executor.iterations,
        warmup = config.executor.warmup_iterations,
        attempts = config.executor.violation_attempts,
        "configuration resolved"
    );

    let driver = builtin_driver(config.executor.clone())?.with_filter(args.filter.clone());
    let report = driver.run().context("harness run aborted")?;

    if args.json {
        println!("{}", json_report(&report));
    } else {
        let verbose = args.verbose || config.output.verbose;
        let no_color = args.no_color || !config.output.color;
        Reporter::new(verbose).with_no_color(no_color).report(&report);
    }

    Ok(report.passed())
}

fn load_config(path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let loader = ConfigLoader::new();
    match path {
        Some(path) => loader
            .load_from_file(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None => loader
            .load_from_directory(&std::env::current_dir()?)
            .context("failed to load configuration"),
    }
}

/// Command-line flags take precedence over file and environment
fn apply_flags(mut config: HarnessConfig, args: &RunArgs) -> Result<HarnessConfig> {
    if let Some(iterations) = args.iterations {
        config.executor.iterations = iterations;
    }
    if let Some(warmup) = args.warmup {
        config.executor.warmup_iterations = warmup;
    }
    if let Some(attempts) = args.attempts {
        config.executor.violation_attempts = attempts;
    }
    config.validate().context("invalid command-line budget")?;
    Ok(config)
}

fn json_report(report: &RunReport) -> serde_json::Value {
    let results: Vec<_> = report
        .runs
        .iter()
        .map(|run| match &run.result {
            ScenarioResult::Pass {
                iterations,
                duration,
            } => serde_json::json!({
                "name": run.scenario,
                "passed": true,
                "iterations": iterations,
                "duration_ms": duration.as_millis(),
            }),
            ScenarioResult::Fail {
                iteration,
                duration,
                ..
            } => serde_json::json!({
                "name": run.scenario,
                "passed": false,
                "failed_iteration": iteration,
                "duration_ms": duration.as_millis(),
                "mismatches": run.diagnostics(),
            }),
        })
        .collect();

    let hook_failures: Vec<_> = report
        .hook_failures
        .iter()
        .map(|failure| {
            serde_json::json!({
                "scenario": failure.owner,
                "hook": failure.label,
                "expected": failure.expected.to_string(),
                "attempts": failure.attempts,
                "message": failure.to_string(),
            })
        })
        .collect();

    serde_json::json!({
        "success": report.passed(),
        "scenarios": report.runs.len(),
        "passed": report.runs.iter().filter(|r| r.result.is_pass()).count(),
        "failed": report.failed_runs().count(),
        "skipped": report.skipped,
        "duration_ms": report.duration.as_millis(),
        "results": results,
        "hook_failures": hook_failures,
    })
}
