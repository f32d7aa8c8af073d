//! Scenario executor - invoke a scenario repeatedly and verify every result

use crate::error::{HarnessError, HarnessResult};
use crate::fixture::Fixture;
use crate::scenario::{Outcome, Scenario};
use crate::synth::synthesize;
use crate::verify::{aliasing, verify, Mismatch};
use copycheck_config::ExecutorConfig;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Result of running a single scenario
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioResult {
    /// Every iteration matched the expected output
    Pass { iterations: u32, duration: Duration },
    /// The first iteration that diverged, with everything it got wrong
    Fail {
        iteration: u32,
        mismatches: Vec<Mismatch>,
        duration: Duration,
    },
}

impl ScenarioResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, ScenarioResult::Pass { .. })
    }

    pub fn is_fail(&self) -> bool {
        !self.is_pass()
    }

    pub fn duration(&self) -> Duration {
        match self {
            ScenarioResult::Pass { duration, .. } => *duration,
            ScenarioResult::Fail { duration, .. } => *duration,
        }
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        match self {
            ScenarioResult::Pass { .. } => &[],
            ScenarioResult::Fail { mismatches, .. } => mismatches,
        }
    }
}

/// A completed scenario run
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRun {
    pub scenario: String,
    pub result: ScenarioResult,
}

impl ScenarioRun {
    /// Diagnostic lines, one per mismatch, e.g.
    /// `Test overlap_backward failed for 1 src[0]=0, dest[1]=1`
    pub fn diagnostics(&self) -> Vec<String> {
        self.result
            .mismatches()
            .iter()
            .map(|m| match m {
                Mismatch::Element { .. } => format!("Test {} failed {}", self.scenario, m),
                _ => format!("Test {} failed: {}", self.scenario, m),
            })
            .collect()
    }
}

/// Runs scenarios against a fixture with a fixed iteration budget
pub struct Executor<'f> {
    fixture: &'f Fixture,
    iterations: u32,
}

impl<'f> Executor<'f> {
    pub fn new(fixture: &'f Fixture, config: &ExecutorConfig) -> Self {
        Self {
            fixture,
            iterations: config.iterations,
        }
    }

    /// Invoke `scenario` up to the iteration budget, stopping at the first
    /// iteration whose result does not verify.
    ///
    /// Results are checked against a copy of the canonical source taken
    /// before the first iteration. An iteration that writes into the fixture
    /// fails, and the fixture is restored before returning.
    ///
    /// A runtime violation escaping the operation aborts the whole run.
    pub fn run(&self, scenario: &Scenario) -> HarnessResult<ScenarioRun> {
        let start = Instant::now();
        let shape = scenario.shape();
        let canonical = self.fixture.source(shape.source(), shape.element());
        let expected = canonical.clone_array();
        let pristine = self.fixture.snapshot();

        debug!(
            scenario = scenario.name(),
            shape = %shape,
            iterations = self.iterations,
            "running scenario"
        );

        for iteration in 0..self.iterations {
            let args =
                synthesize(shape, self.fixture).map_err(|source| HarnessError::Synthesis {
                    scenario: scenario.name().to_string(),
                    source,
                })?;

            let outcome = scenario.invoke(self.fixture, &args).map_err(|source| {
                HarnessError::UnexpectedViolation {
                    scenario: scenario.name().to_string(),
                    context: format!("iteration {}", iteration),
                    source,
                }
            })?;

            let mut mismatches = match &outcome {
                Outcome::Array(array) => aliasing(array, std::iter::once(&canonical))
                    .into_iter()
                    .collect(),
                _ => Vec::new(),
            };
            if mismatches.is_empty() {
                mismatches = verify(scenario, &expected, &args, &outcome)?;
            }

            let changed = pristine.changed_buffers(&self.fixture.snapshot());
            if !changed.is_empty() {
                warn!(
                    scenario = scenario.name(),
                    iteration,
                    buffers = ?changed,
                    "scenario wrote into the fixture"
                );
                self.fixture.restore(&pristine).map_err(|source| {
                    HarnessError::UnexpectedViolation {
                        scenario: scenario.name().to_string(),
                        context: "restoring the fixture".to_string(),
                        source,
                    }
                })?;
                mismatches.extend(
                    changed
                        .into_iter()
                        .map(|buffer| Mismatch::FixtureModified { buffer }),
                );
            }

            if !mismatches.is_empty() {
                warn!(
                    scenario = scenario.name(),
                    iteration,
                    mismatches = mismatches.len(),
                    "scenario produced a wrong result"
                );
                return Ok(ScenarioRun {
                    scenario: scenario.name().to_string(),
                    result: ScenarioResult::Fail {
                        iteration,
                        mismatches,
                        duration: start.elapsed(),
                    },
                });
            }
        }

        Ok(ScenarioRun {
            scenario: scenario.name().to_string(),
            result: ScenarioResult::Pass {
                iterations: self.iterations,
                duration: start.elapsed(),
            },
        })
    }
}
