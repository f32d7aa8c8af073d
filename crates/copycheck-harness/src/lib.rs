//! copycheck harness - correctness oracle for array clone and copy
//!
//! This library provides:
//! - A registry of named scenarios with declarative argument shapes
//! - Argument synthesis from a fixture of canonical buffers
//! - An executor that invokes each scenario many times and verifies every result
//! - A driver that runs scenarios in a fixed plan, with warm-up and
//!   expected-violation hooks
//! - The built-in catalogue of scenarios and its default plan

/// copycheck harness version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod catalog;
pub mod driver;
pub mod error;
pub mod executor;
pub mod fixture;
pub mod registry;
pub mod scenario;
pub mod shape;
pub mod synth;
pub mod verify;

pub use catalog::{builtin_driver, builtin_plan, builtin_registry};
pub use driver::{Driver, HookFailure, Plan, RunReport, Step};
pub use error::{HarnessError, HarnessResult, PlanError};
pub use executor::{Executor, ScenarioResult, ScenarioRun};
pub use fixture::{Fixture, FixtureSnapshot, LARGE_LEN, SMALL_LEN};
pub use registry::{Registry, RegistryBuilder, RegistryError};
pub use scenario::{Arguments, Outcome, Scenario};
pub use shape::{DestPolicy, ElementKind, Shape, ShapeError, SourceKind};
pub use synth::synthesize;
pub use verify::{aliasing, compare_elements, compare_remapped, verify, Mismatch};
