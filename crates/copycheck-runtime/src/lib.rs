//! copycheck runtime model
//!
//! A small managed-heap model for exercising array clone and copy semantics:
//! - Classes: single-inheritance hierarchy (`Object` <- `Base` <- `Derived`)
//! - Objects: reference-counted instances compared by identity, never structure
//! - Arrays: shared handles with identity; cloning a handle aliases the array,
//!   `clone_array` allocates a new one
//! - Copy primitives: `arraycopy`, `copy_of`, `copy_of_range`, each enforcing
//!   bounds and store-type checks before touching the destination
//!
//! Everything here is single-threaded (`Rc`/`RefCell`).

pub mod array;
pub mod class;
pub mod error;
pub mod object;
pub mod ops;

pub use array::{Array, ArrayRef, Element, ElementType, IntArray, RefArray};
pub use class::Class;
pub use error::{RuntimeError, RuntimeResult, ViolationKind};
pub use object::ObjRef;
pub use ops::{arraycopy, copy_of, copy_of_range};
