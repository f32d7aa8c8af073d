//! Runtime violations raised by array primitives

use crate::array::ElementType;
use thiserror::Error;

/// Violations raised by the array primitives.
///
/// These are the runtime checks a copy must never skip: bounds, store type,
/// negative sizes, inverted ranges and null arrays.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Index or range outside the array
    #[error("Array index out of bounds: {detail}")]
    IndexOutOfBounds { detail: String },

    /// Element not assignable to the destination's component type
    #[error("Array store violation: cannot store {found} into {target}[]")]
    ArrayStore { found: String, target: ElementType },

    /// Negative length requested for a new array
    #[error("Negative array size: {0}")]
    NegativeArraySize(i32),

    /// Malformed argument (e.g. `from > to` in `copy_of_range`)
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// Null array slot dereferenced where an array was required
    #[error("Null pointer: {0}")]
    NullPointer(String),
}

/// Coarse category of a [`RuntimeError`], used to match expected violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    IndexOutOfBounds,
    ArrayStore,
    NegativeArraySize,
    IllegalArgument,
    NullPointer,
}

impl RuntimeError {
    pub fn kind(&self) -> ViolationKind {
        match self {
            RuntimeError::IndexOutOfBounds { .. } => ViolationKind::IndexOutOfBounds,
            RuntimeError::ArrayStore { .. } => ViolationKind::ArrayStore,
            RuntimeError::NegativeArraySize(_) => ViolationKind::NegativeArraySize,
            RuntimeError::IllegalArgument(_) => ViolationKind::IllegalArgument,
            RuntimeError::NullPointer(_) => ViolationKind::NullPointer,
        }
    }

    pub(crate) fn out_of_bounds(detail: impl Into<String>) -> Self {
        RuntimeError::IndexOutOfBounds {
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ViolationKind::IndexOutOfBounds => "index out of bounds",
            ViolationKind::ArrayStore => "array store",
            ViolationKind::NegativeArraySize => "negative array size",
            ViolationKind::IllegalArgument => "illegal argument",
            ViolationKind::NullPointer => "null pointer",
        };
        f.write_str(name)
    }
}

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
