//! Built-in scenarios and the default plan
//!
//! Covers the shapes a small-copy fast path has to get right: clones and
//! copies of short, long and empty arrays, overlapping in-place copies in
//! both directions, `copy_of` with and without a subtype check, copies that
//! must fail a store or bounds check, and copies over a sub-range.

use crate::driver::{Driver, Plan};
use crate::error::HarnessResult;
use crate::fixture::{Fixture, SMALL_LEN};
use crate::registry::{Registry, RegistryError};
use crate::scenario::{Arguments, Outcome};
use crate::shape::{DestPolicy, Shape, SourceKind};
use crate::verify::{compare_remapped, Mismatch};
use copycheck_config::ExecutorConfig;
use copycheck_runtime::{
    arraycopy, copy_of, copy_of_range, ArrayRef, Class, ElementType, IntArray, ObjRef, RefArray,
    RuntimeResult, ViolationKind,
};
use std::hint::black_box;

const BASE: ElementType = ElementType::Ref(Class::Base);
const OBJECT: ElementType = ElementType::Ref(Class::Object);

// ============================================================================
// Shared helpers
// ============================================================================

/// `Base[]` on even inputs, `Object[]` of plain objects on odd ones
fn select_source(fixture: &Fixture, i: i32) -> &RefArray {
    if i.rem_euclid(2) == 0 {
        fixture.small_refs()
    } else {
        fixture.small_objects()
    }
}

fn copy_as_base(array: &RefArray) -> RuntimeResult<RefArray> {
    copy_of(array, SMALL_LEN as i32, BASE)
}

fn copy_as_object(array: &RefArray) -> RuntimeResult<RefArray> {
    copy_of(array, SMALL_LEN as i32, OBJECT)
}

/// Self-store of element 0 followed by a copy into a fresh `Base[]`
fn copy_into_base(src: &RefArray) -> RuntimeResult<RefArray> {
    src.set(0, src.get(0)?)?;
    let dest = RefArray::nulls(Class::Base, SMALL_LEN);
    arraycopy(src, 0, &dest, 0, SMALL_LEN as i32)?;
    Ok(dest)
}

/// Element-by-element sum
fn sum_elements(array: &IntArray) -> RuntimeResult<i32> {
    (0..array.len()).try_fold(0i32, |acc, i| Ok(acc.wrapping_add(array.get(i)?)))
}

fn copy_ints(args: &Arguments, src_pos: i32, dst_pos: i32, len: i32) -> RuntimeResult<Outcome> {
    arraycopy(args.source_ints()?, src_pos, args.dest_ints()?, dst_pos, len)?;
    Ok(Outcome::Unit)
}

// ============================================================================
// Checkers
// ============================================================================

/// In-place copy of `[0, 4)` to `[1, 5)`
fn check_backward_shift(src: &ArrayRef, dest: &ArrayRef) -> Vec<Mismatch> {
    compare_remapped(src, dest, src.len(), |i| i.saturating_sub(1))
}

/// In-place copy of `[1, 5)` to `[0, 4)`
fn check_forward_shift(src: &ArrayRef, dest: &ArrayRef) -> Vec<Mismatch> {
    let last = src.len().saturating_sub(1);
    compare_remapped(src, dest, src.len(), |i| (i + 1).min(last))
}

/// In-place copy of element 0 to index 1, everything else untouched
fn check_single_element(src: &ArrayRef, dest: &ArrayRef) -> Vec<Mismatch> {
    compare_remapped(src, dest, src.len(), |i| if i == 1 { 0 } else { i })
}

/// `copy_of_range(src, 1, 4)`
fn check_range(src: &ArrayRef, dest: &ArrayRef) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();
    if dest.len() != 3 {
        mismatches.push(Mismatch::Length {
            expected: 3,
            actual: dest.len(),
        });
    }
    mismatches.extend(compare_remapped(src, dest, 3.min(dest.len()), |i| i + 1));
    mismatches
}

// ============================================================================
// Registry
// ============================================================================

pub fn builtin_registry() -> Result<Registry, RegistryError> {
    Registry::builder()
        .scenario(
            "clone_small_refs",
            "clone of a short reference array",
            Shape::refs(SourceKind::Small),
            |f, _| Ok(f.small_refs().clone_array().into()),
        )
        .scenario(
            "clone_small_ints",
            "clone of a short int array",
            Shape::ints(SourceKind::Small),
            |f, _| Ok(f.small_ints().clone_array().into()),
        )
        .scenario(
            "clone_small_ints_sum",
            "sum over a clone that never escapes",
            Shape::ints(SourceKind::Small).reducing(),
            |f, _| sum_elements(&f.small_ints().clone_array()).map(Outcome::Scalar),
        )
        .scenario(
            "clone_large_ints",
            "clone of a long int array",
            Shape::ints(SourceKind::Large),
            |f, _| Ok(f.large_ints().clone_array().into()),
        )
        .scenario(
            "clone_zero_ints",
            "clone of an empty int array",
            Shape::ints(SourceKind::Zero),
            |f, _| Ok(f.zero_ints().clone_array().into()),
        )
        .scenario(
            "copy_small_ints_into_new",
            "copy of 5 ints into a fresh destination",
            Shape::ints(SourceKind::Small).with_dest(DestPolicy::New),
            |_, args| copy_ints(args, 0, 0, 5),
        )
        .scenario(
            "copy_large_ints_into_new",
            "copy of 10 ints into a fresh destination",
            Shape::ints(SourceKind::Large).with_dest(DestPolicy::New),
            |_, args| copy_ints(args, 0, 0, 10),
        )
        .scenario(
            "copy_small_refs_into_local",
            "copy of 5 references into a locally allocated array",
            Shape::refs(SourceKind::Small).with_source_arg(),
            |_, args| copy_into_base(args.source_refs()?).map(Outcome::from),
        )
        .scenario(
            "copy_small_refs_into_new",
            "copy of 5 references into a fresh destination",
            Shape::refs(SourceKind::Small).with_dest(DestPolicy::New),
            |_, args| {
                arraycopy(args.source_refs()?, 0, args.dest_refs()?, 0, 5)?;
                Ok(Outcome::Unit)
            },
        )
        .checked(
            "overlap_backward",
            "in-place copy of [0, 4) to [1, 5)",
            Shape::ints(SourceKind::Small).with_dest(DestPolicy::AliasSource),
            |_, args| copy_ints(args, 0, 1, 4),
            check_backward_shift,
        )
        .checked(
            "overlap_forward",
            "in-place copy of [1, 5) to [0, 4)",
            Shape::ints(SourceKind::Small).with_dest(DestPolicy::AliasSource),
            |_, args| copy_ints(args, 1, 0, 4),
            check_forward_shift,
        )
        .checked(
            "overlap_runtime_offsets",
            "in-place copy of 4 ints with offsets known only at run time",
            Shape::ints(SourceKind::Small)
                .with_dest(DestPolicy::AliasSource)
                .with_extra_args([0, 1]),
            |_, args| copy_ints(args, args.extra(0)?, args.extra(1)?, 4),
            check_backward_shift,
        )
        .scenario(
            "copy_small_ints_sum",
            "sum over a local copy that never escapes",
            Shape::ints(SourceKind::Small).with_source_arg().reducing(),
            |_, args| {
                let dest = IntArray::zeroed(SMALL_LEN);
                arraycopy(args.source_ints()?, 0, &dest, 0, 5)?;
                sum_elements(&dest).map(Outcome::Scalar)
            },
        )
        .scenario(
            "copy_zero_length",
            "copy of zero elements between empty arrays",
            Shape::ints(SourceKind::Zero).with_dest(DestPolicy::New),
            |_, args| copy_ints(args, 0, 0, 0),
        )
        .scenario(
            "copy_of_small_refs",
            "copy_of a short reference array",
            Shape::refs(SourceKind::Small),
            |f, _| copy_of(f.small_refs(), 5, BASE).map(Outcome::from),
        )
        .scenario(
            "copy_of_with_subtype_check",
            "copy_of to Base[] from a statically untyped source",
            Shape::refs(SourceKind::Small)
                .with_source_arg()
                .with_extra_args([0]),
            |f, args| copy_of(select_source(f, args.extra(0)?), 5, BASE).map(Outcome::from),
        )
        .scenario(
            "copy_of_speculated_type",
            "copy_of to Base[] through a separate helper",
            Shape::refs(SourceKind::Small)
                .with_source_arg()
                .with_extra_args([0]),
            |f, args| copy_as_base(select_source(f, args.extra(0)?)).map(Outcome::from),
        )
        .scenario(
            "copy_of_to_object_array",
            "copy_of to Object[], where no subtype check is needed",
            Shape::refs(SourceKind::Small)
                .with_source_arg()
                .with_extra_args([0]),
            |f, args| copy_as_object(select_source(f, args.extra(0)?)).map(Outcome::from),
        )
        .scenario(
            "copy_of_after_store_failure",
            "copy_of to Base[] after the subtype check has failed",
            Shape::refs(SourceKind::Small)
                .with_source_arg()
                .with_extra_args([0]),
            |f, args| copy_of(select_source(f, args.extra(0)?), 5, BASE).map(Outcome::from),
        )
        .scenario(
            "copy_of_large_refs",
            "copy_of a long reference array",
            Shape::refs(SourceKind::Large),
            |f, _| copy_of(f.large_refs(), 10, BASE).map(Outcome::from),
        )
        .scenario(
            "copy_of_zero_refs",
            "copy_of an empty reference array",
            Shape::refs(SourceKind::Zero),
            |f, _| copy_of(f.zero_refs(), 0, BASE).map(Outcome::from),
        )
        .scenario(
            "copy_after_bounds_failure",
            "copy with a run-time source offset after a failed bounds check",
            Shape::ints(SourceKind::Small)
                .with_dest(DestPolicy::New)
                .with_extra_args([0]),
            |_, args| copy_ints(args, args.extra(0)?, 0, 5),
        )
        .checked(
            "copy_of_range_small_refs",
            "copy_of_range(1, 4) of a short reference array",
            Shape::refs(SourceKind::Small),
            |f, _| copy_of_range(f.small_refs(), 1, 4, BASE).map(Outcome::from),
            check_range,
        )
        .scenario(
            "copy_refs_from_object_array",
            "copy into Base[] from a source typed as Object[]",
            Shape::refs(SourceKind::Small).with_source_arg(),
            |_, args| copy_into_base(args.source_refs()?).map(Outcome::from),
        )
        .checked(
            "overlap_single_element",
            "in-place copy of one int with run-time offsets",
            Shape::ints(SourceKind::Small)
                .with_dest(DestPolicy::AliasSource)
                .with_extra_args([0, 1]),
            |_, args| copy_ints(args, args.extra(0)?, args.extra(1)?, 1),
            check_single_element,
        )
        .build()
}

// ============================================================================
// Plan
// ============================================================================

fn alternate_sources(fixture: &Fixture, i: u32) -> RuntimeResult<()> {
    let _ = black_box(select_source(fixture, i as i32));
    Ok(())
}

pub fn builtin_plan() -> Plan {
    Plan::new()
        .run("clone_small_refs")
        .run("clone_small_ints")
        .run("clone_small_ints_sum")
        .run("clone_large_ints")
        .run("clone_zero_ints")
        .run("copy_small_ints_into_new")
        .run("copy_large_ints_into_new")
        .run("copy_small_refs_into_local")
        .run("copy_small_refs_into_new")
        .run("overlap_backward")
        .run("overlap_forward")
        .run("overlap_runtime_offsets")
        .run("copy_small_ints_sum")
        .run("copy_zero_length")
        .run("copy_of_small_refs")
        .warm(
            "copy_of_with_subtype_check",
            "take both source branches",
            alternate_sources,
        )
        .run("copy_of_with_subtype_check")
        .warm(
            "copy_of_speculated_type",
            "instantiate Derived, take both source branches",
            |f, i| {
                if i == 0 {
                    let _ = black_box(ObjRef::new(Class::Derived));
                }
                alternate_sources(f, i)
            },
        )
        .run("copy_of_speculated_type")
        .warm(
            "copy_of_to_object_array",
            "take both source branches",
            alternate_sources,
        )
        .run("copy_of_to_object_array")
        .warm(
            "copy_of_after_store_failure",
            "take both source branches",
            alternate_sources,
        )
        .warm(
            "copy_of_after_store_failure",
            "copy Base[] sources",
            |f, _| {
                let _ = black_box(copy_of(select_source(f, 0), 5, BASE)?);
                Ok(())
            },
        )
        .expect_violation(
            "copy_of_after_store_failure",
            "copy Object[] of plain objects to Base[]",
            ViolationKind::ArrayStore,
            None,
            |f| copy_of(select_source(f, 1), 5, BASE).map(drop),
        )
        .run("copy_of_after_store_failure")
        .run("copy_of_large_refs")
        .run("copy_of_zero_refs")
        .warm(
            "copy_after_bounds_failure",
            "copy with source offset 0",
            |f, _| arraycopy(f.small_ints(), 0, &IntArray::zeroed(SMALL_LEN), 0, 5),
        )
        .expect_violation(
            "copy_after_bounds_failure",
            "copy with source offset 5",
            ViolationKind::IndexOutOfBounds,
            None,
            |f| arraycopy(f.small_ints(), 5, &IntArray::zeroed(SMALL_LEN), 0, 5),
        )
        .run("copy_after_bounds_failure")
        .run("copy_of_range_small_refs")
        .run("copy_refs_from_object_array")
        .expect_violation(
            "copy_refs_from_object_array",
            "copy Object[] of plain objects into Base[]",
            ViolationKind::ArrayStore,
            Some(1),
            |f| copy_into_base(&f.small_objects().clone_array()).map(drop),
        )
        .run("overlap_single_element")
}

/// Driver over the built-in registry and plan
pub fn builtin_driver(config: ExecutorConfig) -> HarnessResult<Driver> {
    Ok(Driver::new(config, builtin_registry()?, builtin_plan())?)
}
