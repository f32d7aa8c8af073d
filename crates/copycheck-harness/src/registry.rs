//! Scenario registry
//!
//! Scenarios are registered explicitly through [`RegistryBuilder`] and kept
//! in registration order. Every shape is validated at build time, so a bad
//! registration never reaches the executor.

use crate::fixture::Fixture;
use crate::scenario::{Arguments, Checker, Outcome, Scenario};
use crate::shape::{Shape, ShapeError};
use crate::verify::Mismatch;
use copycheck_runtime::{ArrayRef, RuntimeResult};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("scenario '{0}' is registered twice")]
    Duplicate(String),

    #[error("'{0}' is not a valid scenario name (expected lower snake_case)")]
    InvalidName(String),

    #[error("scenario '{name}' has an invalid shape: {source}")]
    InvalidShape {
        name: String,
        #[source]
        source: ShapeError,
    },

    #[error("scenario '{0}' is a reduction and cannot carry a dedicated checker")]
    CheckerOnReduction(String),

    #[error("no scenario named '{0}'")]
    NotFound(String),
}

/// Collects scenario registrations; problems surface in [`RegistryBuilder::build`]
#[derive(Default)]
pub struct RegistryBuilder {
    scenarios: Vec<Scenario>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scenario verified by the generic comparison
    pub fn scenario<F>(self, name: &str, summary: &str, shape: Shape, operation: F) -> Self
    where
        F: Fn(&Fixture, &Arguments) -> RuntimeResult<Outcome> + 'static,
    {
        self.push(name, summary, shape, Box::new(operation), None)
    }

    /// Register a scenario with a dedicated checker
    pub fn checked<F, C>(
        self,
        name: &str,
        summary: &str,
        shape: Shape,
        operation: F,
        checker: C,
    ) -> Self
    where
        F: Fn(&Fixture, &Arguments) -> RuntimeResult<Outcome> + 'static,
        C: Fn(&ArrayRef, &ArrayRef) -> Vec<Mismatch> + 'static,
    {
        self.push(name, summary, shape, Box::new(operation), Some(Box::new(checker)))
    }

    fn push(
        mut self,
        name: &str,
        summary: &str,
        shape: Shape,
        operation: crate::scenario::Operation,
        checker: Option<Checker>,
    ) -> Self {
        self.scenarios.push(Scenario {
            name: name.to_string(),
            summary: summary.to_string(),
            shape,
            operation,
            checker,
        });
        self
    }

    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut index = HashMap::with_capacity(self.scenarios.len());
        for (position, scenario) in self.scenarios.iter().enumerate() {
            if !is_valid_name(&scenario.name) {
                return Err(RegistryError::InvalidName(scenario.name.clone()));
            }
            if index.insert(scenario.name.clone(), position).is_some() {
                return Err(RegistryError::Duplicate(scenario.name.clone()));
            }
            scenario
                .shape
                .validate()
                .map_err(|source| RegistryError::InvalidShape {
                    name: scenario.name.clone(),
                    source,
                })?;
            if scenario.shape.reduces() && scenario.checker.is_some() {
                return Err(RegistryError::CheckerOnReduction(scenario.name.clone()));
            }
        }
        Ok(Registry {
            scenarios: self.scenarios,
            index,
        })
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Ordered, validated set of scenarios
pub struct Registry {
    scenarios: Vec<Scenario>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, name: &str) -> Result<&Scenario, RegistryError> {
        self.index
            .get(name)
            .map(|&i| &self.scenarios[i])
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Scenarios in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::SourceKind;
    use rstest::rstest;

    fn noop(_: &Fixture, _: &Arguments) -> RuntimeResult<Outcome> {
        Ok(Outcome::Unit)
    }

    #[rstest]
    #[case("clone_small")]
    #[case("m1")]
    #[case("a_b_2")]
    fn test_valid_names(#[case] name: &str) {
        assert!(is_valid_name(name));
    }

    #[rstest]
    #[case("")]
    #[case("Clone")]
    #[case("1st")]
    #[case("has-dash")]
    #[case("_leading")]
    fn test_invalid_names(#[case] name: &str) {
        assert!(!is_valid_name(name));
    }

    #[test]
    fn test_order_is_preserved() {
        let registry = Registry::builder()
            .scenario("b", "", Shape::ints(SourceKind::Small), noop)
            .scenario("a", "", Shape::ints(SourceKind::Small), noop)
            .build()
            .unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(registry.contains("a"));
        assert_eq!(
            registry.get("c").unwrap_err(),
            RegistryError::NotFound("c".into())
        );
    }
}
