//! Harness errors
//!
//! Verification mismatches are not errors: they are recorded in the
//! [`ScenarioRun`](crate::executor::ScenarioRun) and the run continues. The
//! variants here are the conditions that abort a run.

use crate::registry::RegistryError;
use crate::shape::ShapeError;
use copycheck_runtime::RuntimeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// A runtime violation nobody asked for escaped an operation or hook
    #[error("unexpected runtime violation in {scenario} ({context}): {source}")]
    UnexpectedViolation {
        scenario: String,
        context: String,
        #[source]
        source: RuntimeError,
    },

    /// Arguments could not be built for a shape
    #[error("cannot synthesize arguments for {scenario}: {source}")]
    Synthesis {
        scenario: String,
        #[source]
        source: ShapeError,
    },

    /// A unit-returning operation has no destination to inspect
    #[error("{0} returns nothing and has no destination argument to verify")]
    MissingDestination(String),

    /// A scalar result was produced for a non-integer source
    #[error("{0} reduces over a source that is not an integer array")]
    ScalarOverReferences(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Problems with a driver plan, found before anything runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("plan refers to unknown scenario '{0}'")]
    UnknownScenario(String),

    #[error("scenario '{0}' is registered but never scheduled")]
    NotScheduled(String),

    #[error("scenario '{0}' is scheduled more than once")]
    ScheduledTwice(String),
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;
