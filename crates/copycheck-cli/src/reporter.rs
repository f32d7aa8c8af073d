//! Run reporter - display a harness run report

use colored::*;
use copycheck_harness::{RunReport, ScenarioResult, ScenarioRun};
use std::io::{self, Write};

/// Report printer with output configuration
pub struct Reporter {
    /// One line per scenario instead of progress dots
    verbose: bool,
    /// Disable colored output
    no_color: bool,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            no_color: false,
        }
    }

    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    pub fn report(&self, report: &RunReport) {
        if self.no_color {
            colored::control::set_override(false);
        }

        for run in &report.runs {
            self.print_run(run);
        }

        // Dots need a newline
        if !self.verbose && !report.runs.is_empty() {
            println!();
        }

        self.print_failures(report);

        println!();
        self.print_summary(report);

        if self.no_color {
            colored::control::unset_override();
        }
    }

    fn print_run(&self, run: &ScenarioRun) {
        match &run.result {
            ScenarioResult::Pass {
                iterations,
                duration,
            } => {
                if self.verbose {
                    println!(
                        "{} {} ({} iterations, {:.2?})",
                        "PASS".green().bold(),
                        run.scenario,
                        iterations,
                        duration
                    );
                } else {
                    print!("{}", ".".green());
                    let _ = io::stdout().flush();
                }
            }
            ScenarioResult::Fail {
                iteration,
                duration,
                ..
            } => {
                if self.verbose {
                    println!(
                        "{} {} (iteration {}, {:.2?})",
                        "FAIL".red().bold(),
                        run.scenario,
                        iteration,
                        duration
                    );
                } else {
                    print!("{}", "F".red().bold());
                    let _ = io::stdout().flush();
                }
            }
        }
    }

    /// One line per mismatch and per unobserved violation
    fn print_failures(&self, report: &RunReport) {
        let failed: Vec<_> = report.failed_runs().collect();
        if failed.is_empty() && report.hook_failures.is_empty() {
            return;
        }

        println!();
        println!("{}", "Failures:".red().bold());
        for run in failed {
            for line in run.diagnostics() {
                println!("  {} {}", "●".red(), line);
            }
        }
        for failure in &report.hook_failures {
            println!("  {} {}", "●".yellow(), failure);
        }
    }

    fn print_summary(&self, report: &RunReport) {
        let total = report.runs.len();
        let failed = report.failed_runs().count();
        let passed = total - failed;
        let hooks = report.hook_failures.len();

        println!("{}", "─".repeat(50));

        let status = if report.passed() {
            "PASSED".green().bold()
        } else {
            "FAILED".red().bold()
        };

        println!(
            "Run result: {} | {} scenarios, {} passed, {} failed, {} hook failures",
            status,
            total.to_string().bold(),
            passed.to_string().green().bold(),
            if failed > 0 {
                failed.to_string().red().bold()
            } else {
                failed.to_string().normal()
            },
            if hooks > 0 {
                hooks.to_string().red().bold()
            } else {
                hooks.to_string().normal()
            }
        );
        if report.skipped > 0 {
            println!("Skipped: {} (filtered out)", report.skipped);
        }
        println!("Time: {:.2?}", report.duration);
    }
}
