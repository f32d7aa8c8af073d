//! Driver - run a plan of scenarios and hooks in a fixed order
//!
//! A [`Plan`] is an ordered list of [`Step`]s. Besides running scenarios it
//! can warm up helper code paths and make crafted calls that must raise a
//! particular runtime violation. Every step belongs to a scenario, so a
//! filter that skips a scenario also skips its hooks.

use crate::error::{HarnessError, HarnessResult, PlanError};
use crate::executor::{Executor, ScenarioRun};
use crate::fixture::Fixture;
use crate::registry::Registry;
use copycheck_config::ExecutorConfig;
use copycheck_runtime::{RuntimeResult, ViolationKind};
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Called with the iteration index, `warmup_iterations` times
pub type WarmAction = Box<dyn Fn(&Fixture, u32) -> RuntimeResult<()>>;

/// A call expected to fail with a specific violation
pub type ViolationCall = Box<dyn Fn(&Fixture) -> RuntimeResult<()>>;

pub enum Step {
    Run(String),
    Warm {
        owner: String,
        label: String,
        action: WarmAction,
    },
    ExpectViolation {
        owner: String,
        label: String,
        expected: ViolationKind,
        /// `None` uses the configured `violation_attempts`
        attempts: Option<u32>,
        call: ViolationCall,
    },
}

impl Step {
    /// Scenario this step belongs to
    pub fn owner(&self) -> &str {
        match self {
            Step::Run(name) => name,
            Step::Warm { owner, .. } | Step::ExpectViolation { owner, .. } => owner,
        }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Run(name) => f.debug_tuple("Run").field(name).finish(),
            Step::Warm { owner, label, .. } => f
                .debug_struct("Warm")
                .field("owner", owner)
                .field("label", label)
                .finish(),
            Step::ExpectViolation {
                owner,
                label,
                expected,
                attempts,
                ..
            } => f
                .debug_struct("ExpectViolation")
                .field("owner", owner)
                .field("label", label)
                .field("expected", expected)
                .field("attempts", attempts)
                .finish(),
        }
    }
}

/// Ordered list of driver steps
#[derive(Debug, Default)]
pub struct Plan {
    steps: Vec<Step>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(mut self, scenario: &str) -> Self {
        self.steps.push(Step::Run(scenario.to_string()));
        self
    }

    pub fn warm<F>(mut self, owner: &str, label: &str, action: F) -> Self
    where
        F: Fn(&Fixture, u32) -> RuntimeResult<()> + 'static,
    {
        self.steps.push(Step::Warm {
            owner: owner.to_string(),
            label: label.to_string(),
            action: Box::new(action),
        });
        self
    }

    pub fn expect_violation<F>(
        mut self,
        owner: &str,
        label: &str,
        expected: ViolationKind,
        attempts: Option<u32>,
        call: F,
    ) -> Self
    where
        F: Fn(&Fixture) -> RuntimeResult<()> + 'static,
    {
        self.steps.push(Step::ExpectViolation {
            owner: owner.to_string(),
            label: label.to_string(),
            expected,
            attempts,
            call: Box::new(call),
        });
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Every registered scenario scheduled exactly once, every step owned by
    /// a registered scenario
    pub fn validate(&self, registry: &Registry) -> Result<(), PlanError> {
        let mut scheduled = HashSet::new();
        for step in &self.steps {
            if !registry.contains(step.owner()) {
                return Err(PlanError::UnknownScenario(step.owner().to_string()));
            }
            if let Step::Run(name) = step {
                if !scheduled.insert(name.as_str()) {
                    return Err(PlanError::ScheduledTwice(name.clone()));
                }
            }
        }
        match registry.names().find(|name| !scheduled.contains(name)) {
            Some(missing) => Err(PlanError::NotScheduled(missing.to_string())),
            None => Ok(()),
        }
    }
}

/// An expected-violation hook whose violation never showed up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookFailure {
    pub owner: String,
    pub label: String,
    pub expected: ViolationKind,
    pub attempts: u32,
}

impl fmt::Display for HookFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Test {}: exception wasn't thrown ({}: no {} violation in {} attempts)",
            self.owner, self.label, self.expected, self.attempts
        )
    }
}

/// Everything a driver run produced
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub runs: Vec<ScenarioRun>,
    pub hook_failures: Vec<HookFailure>,
    /// Scenarios left out by the filter
    pub skipped: usize,
    pub duration: Duration,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.hook_failures.is_empty() && self.runs.iter().all(|r| r.result.is_pass())
    }

    pub fn failed_runs(&self) -> impl Iterator<Item = &ScenarioRun> {
        self.runs.iter().filter(|r| r.result.is_fail())
    }
}

/// Owns the fixture, the registry and the plan for one harness run
pub struct Driver {
    config: ExecutorConfig,
    registry: Registry,
    plan: Plan,
    fixture: Fixture,
    filter: Option<String>,
}

impl Driver {
    pub fn new(config: ExecutorConfig, registry: Registry, plan: Plan) -> Result<Self, PlanError> {
        plan.validate(&registry)?;
        Ok(Self {
            config,
            registry,
            plan,
            fixture: Fixture::new(),
            filter: None,
        })
    }

    /// Only run scenarios whose name contains `pattern`
    pub fn with_filter(mut self, pattern: Option<String>) -> Self {
        self.filter = pattern.filter(|p| !p.is_empty());
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn fixture(&self) -> &Fixture {
        &self.fixture
    }

    fn selected(&self, scenario: &str) -> bool {
        self.filter
            .as_deref()
            .map_or(true, |pattern| scenario.contains(pattern))
    }

    pub fn run(&self) -> HarnessResult<RunReport> {
        let start = Instant::now();
        let executor = Executor::new(&self.fixture, &self.config);
        let mut report = RunReport::default();

        for step in self.plan.steps() {
            if !self.selected(step.owner()) {
                if let Step::Run(_) = step {
                    report.skipped += 1;
                }
                continue;
            }

            match step {
                Step::Run(name) => {
                    let scenario = self.registry.get(name)?;
                    let run = executor.run(scenario)?;
                    debug!(
                        scenario = name.as_str(),
                        passed = run.result.is_pass(),
                        duration = ?run.result.duration(),
                        "scenario finished"
                    );
                    report.runs.push(run);
                }
                Step::Warm {
                    owner,
                    label,
                    action,
                } => {
                    debug!(
                        owner = owner.as_str(),
                        label = label.as_str(),
                        iterations = self.config.warmup_iterations,
                        "warming up"
                    );
                    for i in 0..self.config.warmup_iterations {
                        action(&self.fixture, i).map_err(|source| {
                            HarnessError::UnexpectedViolation {
                                scenario: owner.clone(),
                                context: format!("warm-up '{}', call {}", label, i),
                                source,
                            }
                        })?;
                    }
                }
                Step::ExpectViolation {
                    owner,
                    label,
                    expected,
                    attempts,
                    call,
                } => {
                    let attempts = attempts.unwrap_or(self.config.violation_attempts);
                    let failure = self.expect_violation(owner, label, *expected, attempts, call)?;
                    if let Some(failure) = failure {
                        warn!(
                            owner = owner.as_str(),
                            label = label.as_str(),
                            expected = %expected,
                            "expected violation was not raised"
                        );
                        report.hook_failures.push(failure);
                    }
                }
            }
        }

        report.duration = start.elapsed();
        info!(
            scenarios = report.runs.len(),
            failed = report.failed_runs().count(),
            hook_failures = report.hook_failures.len(),
            skipped = report.skipped,
            duration = ?report.duration,
            "run complete"
        );
        Ok(report)
    }

    /// Make `attempts` crafted calls; `Some` when none raised `expected`
    fn expect_violation(
        &self,
        owner: &str,
        label: &str,
        expected: ViolationKind,
        attempts: u32,
        call: &ViolationCall,
    ) -> HarnessResult<Option<HookFailure>> {
        let mut observed = false;
        for attempt in 0..attempts {
            match call(&self.fixture) {
                Ok(()) => {}
                Err(err) if err.kind() == expected => observed = true,
                Err(source) => {
                    return Err(HarnessError::UnexpectedViolation {
                        scenario: owner.to_string(),
                        context: format!("hook '{}', attempt {}", label, attempt),
                        source,
                    })
                }
            }
        }

        Ok((!observed).then(|| HookFailure {
            owner: owner.to_string(),
            label: label.to_string(),
            expected,
            attempts,
        }))
    }
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("plan", &self.plan)
            .field("filter", &self.filter)
            .finish()
    }
}
