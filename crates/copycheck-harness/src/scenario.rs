//! Scenario definitions: the operation, its arguments and its result

use crate::fixture::Fixture;
use crate::shape::Shape;
use crate::verify::Mismatch;
use copycheck_runtime::{ArrayRef, IntArray, RefArray, RuntimeError, RuntimeResult};

/// Arguments synthesized for one invocation
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    /// Private clone of the canonical source
    pub source: Option<ArrayRef>,
    /// Destination per the shape's policy; may be the same handle as `source`
    pub dest: Option<ArrayRef>,
    /// Trailing scalar arguments
    pub extra: Vec<i32>,
}

impl Arguments {
    pub fn source_ints(&self) -> RuntimeResult<&IntArray> {
        slot(&self.source, "source").and_then(|a| {
            a.as_ints()
                .ok_or_else(|| kind_error("source", "an int", a))
        })
    }

    pub fn source_refs(&self) -> RuntimeResult<&RefArray> {
        slot(&self.source, "source").and_then(|a| {
            a.as_refs()
                .ok_or_else(|| kind_error("source", "a reference", a))
        })
    }

    pub fn dest_ints(&self) -> RuntimeResult<&IntArray> {
        slot(&self.dest, "destination").and_then(|a| {
            a.as_ints()
                .ok_or_else(|| kind_error("destination", "an int", a))
        })
    }

    pub fn dest_refs(&self) -> RuntimeResult<&RefArray> {
        slot(&self.dest, "destination").and_then(|a| {
            a.as_refs()
                .ok_or_else(|| kind_error("destination", "a reference", a))
        })
    }

    /// Scalar argument `index`
    pub fn extra(&self, index: usize) -> RuntimeResult<i32> {
        self.extra.get(index).copied().ok_or_else(|| {
            RuntimeError::IllegalArgument(format!(
                "missing scalar argument {} (got {})",
                index,
                self.extra.len()
            ))
        })
    }
}

fn slot<'a>(slot: &'a Option<ArrayRef>, role: &str) -> RuntimeResult<&'a ArrayRef> {
    slot.as_ref()
        .ok_or_else(|| RuntimeError::NullPointer(format!("no {} argument", role)))
}

fn kind_error(role: &str, wanted: &str, found: &ArrayRef) -> RuntimeError {
    RuntimeError::IllegalArgument(format!(
        "{} argument is {}, expected {} array",
        role,
        found.type_label(),
        wanted
    ))
}

/// What an operation produced
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Nothing returned; the destination argument holds the result
    Unit,
    /// Reduction over the copied elements
    Scalar(i32),
    /// A newly produced array
    Array(ArrayRef),
}

impl From<IntArray> for Outcome {
    fn from(array: IntArray) -> Self {
        Outcome::Array(array.into())
    }
}

impl From<RefArray> for Outcome {
    fn from(array: RefArray) -> Self {
        Outcome::Array(array.into())
    }
}

/// One invocation of a scenario's operation
pub type Operation = Box<dyn Fn(&Fixture, &Arguments) -> RuntimeResult<Outcome>>;

/// Dedicated verifier: `(canonical source, destination) -> mismatches`
pub type Checker = Box<dyn Fn(&ArrayRef, &ArrayRef) -> Vec<Mismatch>>;

/// A named operation with its shape and optional dedicated checker
pub struct Scenario {
    pub(crate) name: String,
    pub(crate) summary: String,
    pub(crate) shape: Shape,
    pub(crate) operation: Operation,
    pub(crate) checker: Option<Checker>,
}

impl Scenario {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn has_checker(&self) -> bool {
        self.checker.is_some()
    }

    /// Run the operation once
    pub fn invoke(&self, fixture: &Fixture, args: &Arguments) -> RuntimeResult<Outcome> {
        (self.operation)(fixture, args)
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("checker", &self.checker.is_some())
            .finish()
    }
}
