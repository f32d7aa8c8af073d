//! Result verification
//!
//! Integer buffers compare by value, reference buffers by identity. Scalar
//! results are checked against the sum of the canonical source. A returned
//! array must be a new array, never the source handed in. Scenarios whose
//! destination is an index remapping of the source (overlaps, ranges) bring
//! their own checker.

use crate::error::{HarnessError, HarnessResult};
use crate::scenario::{Arguments, Outcome, Scenario};
use copycheck_runtime::{ArrayRef, ElementType};
use std::fmt;

/// One observed divergence between expected and actual output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// `dest[dest_index]` should equal `src[source_index]`
    Element {
        dest_index: usize,
        source_index: usize,
        expected: String,
        actual: String,
    },
    Length {
        expected: usize,
        actual: usize,
    },
    /// Integer result where references were expected, or the reverse
    ElementKind {
        expected: ElementType,
        actual: ElementType,
    },
    Scalar {
        expected: i32,
        actual: i32,
    },
    /// Returned array is the same handle as a source array
    Aliased,
    /// The operation wrote into a canonical buffer
    FixtureModified { buffer: &'static str },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Element {
                dest_index,
                source_index,
                expected,
                actual,
            } => write!(
                f,
                "for {dest_index} src[{source_index}]={expected}, dest[{dest_index}]={actual}"
            ),
            Mismatch::Length { expected, actual } => {
                write!(f, "length = {actual} != {expected}")
            }
            Mismatch::ElementKind { expected, actual } => {
                write!(f, "element type = {actual} != {expected}")
            }
            Mismatch::Scalar { expected, actual } => {
                write!(f, "result = {actual} != {expected}")
            }
            Mismatch::Aliased => f.write_str("result is the source array itself"),
            Mismatch::FixtureModified { buffer } => {
                write!(f, "canonical buffer {buffer} was modified")
            }
        }
    }
}

/// Verify one invocation's outcome. Returns the mismatches found, empty when
/// the iteration passed.
pub fn verify(
    scenario: &Scenario,
    source: &ArrayRef,
    args: &Arguments,
    outcome: &Outcome,
) -> HarnessResult<Vec<Mismatch>> {
    let dest = match outcome {
        Outcome::Scalar(actual) => {
            let ints = source
                .as_ints()
                .ok_or_else(|| HarnessError::ScalarOverReferences(scenario.name().to_string()))?;
            let expected = ints.sum();
            return Ok(if *actual == expected {
                Vec::new()
            } else {
                vec![Mismatch::Scalar {
                    expected,
                    actual: *actual,
                }]
            });
        }
        Outcome::Array(array) => {
            let sources = std::iter::once(source).chain(args.source.as_ref());
            if let Some(mismatch) = aliasing(array, sources) {
                return Ok(vec![mismatch]);
            }
            array
        }
        Outcome::Unit => args
            .dest
            .as_ref()
            .ok_or_else(|| HarnessError::MissingDestination(scenario.name().to_string()))?,
    };

    Ok(match &scenario.checker {
        Some(checker) => checker(source, dest),
        None => compare_elements(source, dest),
    })
}

/// `Some(Mismatch::Aliased)` when `result` is one of `sources`
pub fn aliasing<'a>(
    result: &ArrayRef,
    mut sources: impl Iterator<Item = &'a ArrayRef>,
) -> Option<Mismatch> {
    sources
        .any(|source| result.same_array(source))
        .then_some(Mismatch::Aliased)
}

/// Generic comparison: `dest[i]` must be `src[i]` for every index
pub fn compare_elements(source: &ArrayRef, dest: &ArrayRef) -> Vec<Mismatch> {
    if let Some(mismatch) = kind_mismatch(source, dest) {
        return vec![mismatch];
    }

    let mut mismatches = Vec::new();
    if source.len() != dest.len() {
        mismatches.push(Mismatch::Length {
            expected: source.len(),
            actual: dest.len(),
        });
    }
    let common = source.len().min(dest.len());
    mismatches.extend((0..common).filter_map(|i| element_mismatch(source, i, dest, i)));
    mismatches
}

/// Remapped comparison: `dest[i]` must be `src[map(i)]` for `i` in `0..len`
pub fn compare_remapped(
    source: &ArrayRef,
    dest: &ArrayRef,
    len: usize,
    map: impl Fn(usize) -> usize,
) -> Vec<Mismatch> {
    if let Some(mismatch) = kind_mismatch(source, dest) {
        return vec![mismatch];
    }
    if dest.len() < len {
        return vec![Mismatch::Length {
            expected: len,
            actual: dest.len(),
        }];
    }
    (0..len)
        .filter_map(|i| element_mismatch(source, map(i), dest, i))
        .collect()
}

fn kind_mismatch(source: &ArrayRef, dest: &ArrayRef) -> Option<Mismatch> {
    let same_kind = matches!(
        (source, dest),
        (ArrayRef::Int(_), ArrayRef::Int(_)) | (ArrayRef::Ref(_), ArrayRef::Ref(_))
    );
    (!same_kind).then(|| Mismatch::ElementKind {
        expected: source.element_type(),
        actual: dest.element_type(),
    })
}

fn element_mismatch(
    source: &ArrayRef,
    source_index: usize,
    dest: &ArrayRef,
    dest_index: usize,
) -> Option<Mismatch> {
    let equal = match (source, dest) {
        (ArrayRef::Int(s), ArrayRef::Int(d)) => s.get(source_index).ok() == d.get(dest_index).ok(),
        (ArrayRef::Ref(s), ArrayRef::Ref(d)) => s.get(source_index).ok() == d.get(dest_index).ok(),
        _ => false,
    };
    if equal {
        return None;
    }
    Some(Mismatch::Element {
        dest_index,
        source_index,
        expected: source
            .describe_at(source_index)
            .unwrap_or_else(|| "<missing>".to_string()),
        actual: dest
            .describe_at(dest_index)
            .unwrap_or_else(|| "<missing>".to_string()),
    })
}
