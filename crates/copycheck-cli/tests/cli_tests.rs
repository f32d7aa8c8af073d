//! End-to-end tests for the copycheck binary
//!
//! Every test runs in a fresh temporary directory with small budgets so no
//! stray `copycheck.toml` or environment setting leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

/// `copycheck` in an empty temp dir with a clean, low-budget environment
fn copycheck(dir: &TempDir) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("copycheck");
    cmd.current_dir(dir.path())
        .env_remove("NO_COLOR")
        .env_remove("COPYCHECK_NO_COLOR")
        .env_remove("COPYCHECK_VERBOSE")
        .env_remove("COPYCHECK_JSON")
        .env_remove("COPYCHECK_LOG")
        .env("COPYCHECK_ITERATIONS", "50")
        .env("COPYCHECK_WARMUP", "10")
        .env("COPYCHECK_ATTEMPTS", "2");
    cmd
}

fn json_stdout(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout is JSON")
}

// ============================================================================
// copycheck run
// ============================================================================

#[test]
fn test_run_passes() {
    let dir = TempDir::new().unwrap();
    copycheck(&dir)
        .args(["run", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"))
        .stdout(predicate::str::contains("25 scenarios"));
}

#[test]
fn test_run_verbose_lists_scenarios() {
    let dir = TempDir::new().unwrap();
    copycheck(&dir)
        .args(["run", "--no-color", "--verbose", "--filter", "overlap"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS overlap_backward (50 iterations"))
        .stdout(predicate::str::contains("PASS overlap_single_element"))
        .stdout(predicate::str::contains("clone_small_refs").not())
        .stdout(predicate::str::contains("Skipped: 21"));
}

#[test]
fn test_run_json() {
    let dir = TempDir::new().unwrap();
    let output = copycheck(&dir)
        .args(["run", "--json", "--iterations", "5"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = json_stdout(&output.stdout);
    assert_eq!(report["success"], true);
    assert_eq!(report["scenarios"], 25);
    assert_eq!(report["failed"], 0);
    let results = report["results"].as_array().unwrap();
    assert!(results.iter().all(|r| r["iterations"] == 5));
}

#[test]
fn test_run_reads_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("copycheck.toml"),
        "[executor]\niterations = 3\n\n[output]\nverbose = true\ncolor = false\n",
    )
    .unwrap();

    copycheck(&dir)
        .env_remove("COPYCHECK_ITERATIONS")
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS clone_small_refs (3 iterations"));
}

#[test]
fn test_run_explicit_config_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ci.toml");
    fs::write(&path, "[executor]\niterations = 4\n").unwrap();

    let output = copycheck(&dir)
        .env_remove("COPYCHECK_ITERATIONS")
        .args(["run", "--json", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(json_stdout(&output.stdout)["results"][0]["iterations"], 4);
}

// ============================================================================
// copycheck run - configuration errors (exit code 2)
// ============================================================================

#[test]
fn test_zero_iterations_rejected() {
    let dir = TempDir::new().unwrap();
    copycheck(&dir)
        .args(["run", "--iterations", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("executor.iterations"));
}

#[test]
fn test_unknown_config_field_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("copycheck.toml"), "[executor]\nthreads = 4\n").unwrap();
    copycheck(&dir)
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_bad_env_budget_rejected() {
    let dir = TempDir::new().unwrap();
    copycheck(&dir)
        .env("COPYCHECK_ATTEMPTS", "many")
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("COPYCHECK_ATTEMPTS"));
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    copycheck(&dir)
        .args(["run", "--config", "nope.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope.toml"));
}

// ============================================================================
// copycheck list / completions
// ============================================================================

#[test]
fn test_list() {
    let dir = TempDir::new().unwrap();
    copycheck(&dir)
        .env("NO_COLOR", "1")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("overlap_backward"))
        .stdout(predicate::str::contains("int small src dest=alias"))
        .stdout(predicate::str::contains("25 scenarios"));
}

#[test]
fn test_list_json() {
    let dir = TempDir::new().unwrap();
    let output = copycheck(&dir).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    let listing = json_stdout(&output.stdout);
    assert_eq!(listing["count"], 25);
    assert_eq!(listing["scenarios"][0]["name"], "clone_small_refs");
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    copycheck(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("copycheck"));
}
