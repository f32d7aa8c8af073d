//! Array primitive tests
//!
//! Covers clone fidelity, overlap direction, zero-length copies, and the
//! bounds/store checks that must fire before any damage is done.

use copycheck_runtime::{
    arraycopy, copy_of, copy_of_range, Class, ElementType, IntArray, ObjRef, RefArray,
    RuntimeError, ViolationKind,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

fn ints(n: i32) -> IntArray {
    IntArray::from_vec((0..n).collect())
}

fn bases(n: usize) -> (RefArray, Vec<Option<ObjRef>>) {
    let objs: Vec<_> = (0..n).map(|_| Some(ObjRef::new(Class::Base))).collect();
    (RefArray::from_elements(Class::Base, objs.clone()).unwrap(), objs)
}

/// memmove over a plain Vec, the model `arraycopy` must agree with
fn model_copy(src: &[i32], src_pos: usize, dst: &mut Vec<i32>, dst_pos: usize, len: usize) {
    let staged = src[src_pos..src_pos + len].to_vec();
    dst[dst_pos..dst_pos + len].copy_from_slice(&staged);
}

// ============================================================================
// Overlapping copies within one array
// ============================================================================

#[test]
fn test_backward_overlap() {
    let a = ints(5);
    arraycopy(&a, 0, &a, 1, 4).unwrap();
    assert_eq!(a.to_vec(), vec![0, 0, 1, 2, 3]);
}

#[test]
fn test_forward_overlap() {
    let a = ints(5);
    arraycopy(&a, 1, &a, 0, 4).unwrap();
    assert_eq!(a.to_vec(), vec![1, 2, 3, 4, 4]);
}

#[rstest]
#[case(0, 1)]
#[case(1, 0)]
#[case(4, 0)]
#[case(2, 2)]
fn test_single_element_overlap(#[case] src_pos: i32, #[case] dst_pos: i32) {
    let a = ints(5);
    arraycopy(&a, src_pos, &a, dst_pos, 1).unwrap();
    let mut expected: Vec<i32> = (0..5).collect();
    expected[dst_pos as usize] = src_pos;
    assert_eq!(a.to_vec(), expected);
}

#[test]
fn test_overlap_on_reference_array_keeps_identity() {
    let (a, objs) = bases(5);
    arraycopy(&a, 0, &a, 1, 4).unwrap();
    for i in 0..5 {
        let j = i.max(1) - 1;
        assert_eq!(a.get(i).unwrap(), objs[j]);
    }
}

// ============================================================================
// Disjoint copies
// ============================================================================

#[rstest]
#[case(5)]
#[case(10)]
fn test_copy_into_fresh_array(#[case] n: i32) {
    let src = ints(n);
    let dst = IntArray::zeroed(n as usize);
    arraycopy(&src, 0, &dst, 0, n).unwrap();
    assert_eq!(dst.to_vec(), src.to_vec());
}

#[test]
fn test_zero_length_copy_of_empty_arrays() {
    let src = IntArray::zeroed(0);
    let dst = IntArray::zeroed(0);
    arraycopy(&src, 0, &dst, 0, 0).unwrap();
    assert!(dst.is_empty());
}

#[test]
fn test_reference_copy_is_by_identity() {
    let (src, objs) = bases(5);
    let dst = RefArray::nulls(Class::Base, 5);
    arraycopy(&src, 0, &dst, 0, 5).unwrap();
    for (i, obj) in objs.iter().enumerate() {
        assert_eq!(&dst.get(i).unwrap(), obj);
    }
}

#[test]
fn test_copy_into_supertype_array_needs_no_check() {
    let (src, objs) = bases(3);
    let dst = RefArray::nulls(Class::Object, 3);
    arraycopy(&src, 0, &dst, 0, 3).unwrap();
    assert_eq!(dst.to_vec(), objs);
}

// ============================================================================
// Bounds enforcement
// ============================================================================

#[rstest]
#[case(5, 0, 5)]
#[case(-1, 0, 1)]
#[case(0, -1, 1)]
#[case(0, 0, -1)]
#[case(0, 1, 5)]
#[case(3, 0, 3)]
fn test_out_of_range_leaves_destination_untouched(
    #[case] src_pos: i32,
    #[case] dst_pos: i32,
    #[case] length: i32,
) {
    let src = ints(5);
    let dst = IntArray::from_vec(vec![9; 5]);
    let err = arraycopy(&src, src_pos, &dst, dst_pos, length).unwrap_err();
    assert_eq!(err.kind(), ViolationKind::IndexOutOfBounds);
    assert_eq!(dst.to_vec(), vec![9; 5]);
}

#[test]
fn test_bounds_message_names_array() {
    let src = ints(5);
    let dst = IntArray::zeroed(5);
    let err = arraycopy(&src, 5, &dst, 0, 5).unwrap_err();
    assert!(err.to_string().contains("int[5]"), "{}", err);
}

// ============================================================================
// Store-type enforcement
// ============================================================================

#[test]
fn test_store_violation_stops_at_first_foreign_element() {
    let base = ObjRef::new(Class::Base);
    let plain = ObjRef::new(Class::Object);
    let src = RefArray::from_elements(
        Class::Object,
        vec![Some(base.clone()), Some(plain), Some(ObjRef::new(Class::Base))],
    )
    .unwrap();
    let dst = RefArray::nulls(Class::Base, 3);

    let err = arraycopy(&src, 0, &dst, 0, 3).unwrap_err();
    assert_eq!(err.kind(), ViolationKind::ArrayStore);
    // Prefix before the offending element is stored, nothing after it
    assert_eq!(dst.get(0).unwrap(), Some(base));
    assert_eq!(dst.get(1).unwrap(), None);
    assert_eq!(dst.get(2).unwrap(), None);
}

#[test]
fn test_object_array_of_bases_copies_into_base_array() {
    let objs: Vec<_> = (0..3).map(|_| Some(ObjRef::new(Class::Derived))).collect();
    let src = RefArray::from_elements(Class::Object, objs.clone()).unwrap();
    let dst = RefArray::nulls(Class::Base, 3);
    arraycopy(&src, 0, &dst, 0, 3).unwrap();
    assert_eq!(dst.to_vec(), objs);
}

// ============================================================================
// copy_of / copy_of_range
// ============================================================================

#[test]
fn test_copy_of_same_length() {
    let (src, objs) = bases(5);
    let copy = copy_of(&src, 5, ElementType::Ref(Class::Base)).unwrap();
    assert!(!copy.same_array(&src));
    assert_eq!(copy.to_vec(), objs);
}

#[test]
fn test_copy_of_pads_and_truncates() {
    let src = ints(3);
    assert_eq!(
        copy_of(&src, 5, ElementType::Int).unwrap().to_vec(),
        vec![0, 1, 2, 0, 0]
    );
    assert_eq!(copy_of(&src, 2, ElementType::Int).unwrap().to_vec(), vec![0, 1]);
}

#[test]
fn test_copy_of_zero_length() {
    let src = RefArray::nulls(Class::Base, 0);
    let copy = copy_of(&src, 0, ElementType::Ref(Class::Base)).unwrap();
    assert!(copy.is_empty());
}

#[test]
fn test_copy_of_rejects_foreign_elements() {
    let plain: Vec<_> = (0..5).map(|_| Some(ObjRef::new(Class::Object))).collect();
    let src = RefArray::from_elements(Class::Object, plain).unwrap();
    let err = copy_of(&src, 5, ElementType::Ref(Class::Base)).unwrap_err();
    assert_eq!(err.kind(), ViolationKind::ArrayStore);
}

#[test]
fn test_copy_of_negative_length() {
    let src = ints(3);
    assert_eq!(
        copy_of(&src, -2, ElementType::Int).unwrap_err(),
        RuntimeError::NegativeArraySize(-2)
    );
}

#[test]
fn test_copy_of_range_middle() {
    let (src, objs) = bases(5);
    let copy = copy_of_range(&src, 1, 4, ElementType::Ref(Class::Base)).unwrap();
    assert_eq!(copy.to_vec(), objs[1..4].to_vec());
}

#[rstest]
#[case(3, 1, ViolationKind::IllegalArgument)]
#[case(-1, 2, ViolationKind::IndexOutOfBounds)]
#[case(6, 7, ViolationKind::IndexOutOfBounds)]
fn test_copy_of_range_rejects(#[case] from: i32, #[case] to: i32, #[case] kind: ViolationKind) {
    let src = ints(5);
    let err = copy_of_range(&src, from, to, ElementType::Int).unwrap_err();
    assert_eq!(err.kind(), kind);
}

#[test]
fn test_copy_of_range_past_end_pads() {
    let src = ints(5);
    let copy = copy_of_range(&src, 3, 7, ElementType::Int).unwrap();
    assert_eq!(copy.to_vec(), vec![3, 4, 0, 0]);
}

// ============================================================================
// Properties against the memmove model
// ============================================================================

fn copy_request() -> impl Strategy<Value = (Vec<i32>, usize, usize, usize)> {
    prop::collection::vec(any::<i32>(), 0..24).prop_flat_map(|values| {
        let n = values.len();
        (0..=n).prop_flat_map(move |len| {
            let values = values.clone();
            (Just(values), 0..=n - len, 0..=n - len, Just(len))
        })
    })
}

proptest! {
    #[test]
    fn prop_in_place_copy_matches_memmove((values, src_pos, dst_pos, len) in copy_request()) {
        let array = IntArray::from_vec(values.clone());
        arraycopy(&array, src_pos as i32, &array, dst_pos as i32, len as i32).unwrap();

        let mut expected = values.clone();
        model_copy(&values, src_pos, &mut expected, dst_pos, len);
        prop_assert_eq!(array.to_vec(), expected);
    }

    #[test]
    fn prop_disjoint_copy_matches_model((values, src_pos, dst_pos, len) in copy_request()) {
        let src = IntArray::from_vec(values.clone());
        let dst = IntArray::zeroed(values.len());
        arraycopy(&src, src_pos as i32, &dst, dst_pos as i32, len as i32).unwrap();

        let mut expected = vec![0; values.len()];
        model_copy(&values, src_pos, &mut expected, dst_pos, len);
        prop_assert_eq!(dst.to_vec(), expected);
        prop_assert_eq!(src.to_vec(), values);
    }

    #[test]
    fn prop_clone_is_faithful_and_distinct(values in prop::collection::vec(any::<i32>(), 0..32)) {
        let array = IntArray::from_vec(values.clone());
        let copy = array.clone_array();
        prop_assert!(!copy.same_array(&array));
        prop_assert_eq!(copy.to_vec(), values);
    }
}
