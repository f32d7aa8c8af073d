//! Argument shape descriptors
//!
//! A [`Shape`] says which canonical buffer a scenario works on, whether the
//! operation receives a private clone of it, how its destination argument is
//! produced, and which scalar arguments follow.

use std::fmt;
use thiserror::Error;

/// Which canonical buffer a scenario draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Length 5
    Small,
    /// Length 10
    Large,
    /// Length 0
    Zero,
}

/// How the destination argument is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestPolicy {
    /// No destination argument
    None,
    /// Fresh zeroed/null-filled array, same length and component type as the source clone
    New,
    /// The source clone itself (same handle), for in-place copies
    AliasSource,
}

/// Element category of the buffers a scenario works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Int,
    Ref,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("zero-length sources are only synthesized for integer scenarios")]
    ZeroLengthReferences,

    #[error("scalar reductions are only defined over integer sources")]
    ReductionOverReferences,

    #[error("extra scalar arguments need a source argument in front of them")]
    ExtraArgsWithoutSource,
}

/// Declarative argument shape of a scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    source: SourceKind,
    element: ElementKind,
    passes_source: bool,
    dest: DestPolicy,
    extra_args: Vec<i32>,
    reduces: bool,
}

impl Shape {
    /// Integer scenario reading from `source`, taking no arguments
    pub fn ints(source: SourceKind) -> Self {
        Self::new(source, ElementKind::Int)
    }

    /// Reference scenario reading from `source`, taking no arguments
    pub fn refs(source: SourceKind) -> Self {
        Self::new(source, ElementKind::Ref)
    }

    fn new(source: SourceKind, element: ElementKind) -> Self {
        Self {
            source,
            element,
            passes_source: false,
            dest: DestPolicy::None,
            extra_args: Vec::new(),
            reduces: false,
        }
    }

    /// Pass a private clone of the source as the first argument
    pub fn with_source_arg(mut self) -> Self {
        self.passes_source = true;
        self
    }

    /// Add a destination argument; implies [`Shape::with_source_arg`]
    pub fn with_dest(mut self, dest: DestPolicy) -> Self {
        self.dest = dest;
        if dest != DestPolicy::None {
            self.passes_source = true;
        }
        self
    }

    /// Scalar arguments appended after the array arguments, in order
    pub fn with_extra_args(mut self, args: impl IntoIterator<Item = i32>) -> Self {
        self.extra_args.extend(args);
        self
    }

    /// The operation returns a sum over the source instead of an array
    pub fn reducing(mut self) -> Self {
        self.reduces = true;
        self
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn element(&self) -> ElementKind {
        self.element
    }

    pub fn passes_source(&self) -> bool {
        self.passes_source
    }

    pub fn dest(&self) -> DestPolicy {
        self.dest
    }

    pub fn extra_args(&self) -> &[i32] {
        &self.extra_args
    }

    pub fn reduces(&self) -> bool {
        self.reduces
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.source == SourceKind::Zero
            && self.element == ElementKind::Ref
            && self.passes_source
        {
            return Err(ShapeError::ZeroLengthReferences);
        }
        if self.reduces && self.element == ElementKind::Ref {
            return Err(ShapeError::ReductionOverReferences);
        }
        if !self.extra_args.is_empty() && !self.passes_source {
            return Err(ShapeError::ExtraArgsWithoutSource);
        }
        Ok(())
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Small => "small",
            SourceKind::Large => "large",
            SourceKind::Zero => "zero",
        })
    }
}

impl fmt::Display for DestPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DestPolicy::None => "none",
            DestPolicy::New => "new",
            DestPolicy::AliasSource => "alias",
        })
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementKind::Int => "int",
            ElementKind::Ref => "ref",
        })
    }
}

impl fmt::Display for Shape {
    /// Compact form, e.g. `int small src dest=alias extra=[0, 1]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.source)?;
        if self.passes_source {
            f.write_str(" src")?;
        }
        if self.dest != DestPolicy::None {
            write!(f, " dest={}", self.dest)?;
        }
        if !self.extra_args.is_empty() {
            write!(f, " extra={:?}", self.extra_args)?;
        }
        if self.reduces {
            f.write_str(" sum")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_dest_implies_source_arg() {
        let shape = Shape::ints(SourceKind::Small).with_dest(DestPolicy::New);
        assert!(shape.passes_source());
        assert!(!Shape::ints(SourceKind::Small).passes_source());
    }

    #[rstest]
    #[case(Shape::refs(SourceKind::Zero).with_source_arg(), ShapeError::ZeroLengthReferences)]
    #[case(Shape::refs(SourceKind::Small).reducing(), ShapeError::ReductionOverReferences)]
    #[case(Shape::ints(SourceKind::Small).with_extra_args([1]), ShapeError::ExtraArgsWithoutSource)]
    fn test_invalid_shapes(#[case] shape: Shape, #[case] expected: ShapeError) {
        assert_eq!(shape.validate(), Err(expected));
    }

    #[test]
    fn test_zero_length_refs_without_argument_is_allowed() {
        assert!(Shape::refs(SourceKind::Zero).validate().is_ok());
    }

    #[test]
    fn test_display() {
        let shape = Shape::ints(SourceKind::Small)
            .with_dest(DestPolicy::AliasSource)
            .with_extra_args([0, 1]);
        assert_eq!(shape.to_string(), "int small src dest=alias extra=[0, 1]");
    }
}
