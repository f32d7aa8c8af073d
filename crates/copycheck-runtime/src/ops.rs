//! Array copy primitives
//!
//! Every primitive validates its whole request (bounds, lengths) before the
//! first store, so a rejected call leaves the destination untouched. The one
//! exception is a per-element store check failure: elements before the
//! offending one have already been stored, elements after it have not.

use crate::array::{Array, Element, ElementType};
use crate::error::{RuntimeError, RuntimeResult};

// ============================================================================
// arraycopy
// ============================================================================

/// Copy `length` elements from `src[src_pos..]` into `dst[dst_pos..]`.
///
/// When `src` and `dst` are the same array the copy behaves as if the source
/// range were first copied to a temporary, so overlapping ranges are safe in
/// both directions.
pub fn arraycopy<T: Element>(
    src: &Array<T>,
    src_pos: i32,
    dst: &Array<T>,
    dst_pos: i32,
    length: i32,
) -> RuntimeResult<()> {
    check_range("source", src_pos, length, src)?;
    check_range("destination", dst_pos, length, dst)?;

    if length == 0 {
        return Ok(());
    }

    let (src_pos, dst_pos, length) = (src_pos as usize, dst_pos as usize, length as usize);

    if src.same_array(dst) {
        dst.elements_mut()
            .copy_within_cloned(src_pos..src_pos + length, dst_pos);
        return Ok(());
    }

    let from = src.elements();
    let mut to = dst.elements_mut();
    let source = &from[src_pos..src_pos + length];
    let target = &mut to[dst_pos..dst_pos + length];

    if src.element_type().is_assignable_to(dst.element_type()) {
        target.clone_from_slice(source);
        return Ok(());
    }

    let component = dst.element_type();
    for (slot, value) in target.iter_mut().zip(source) {
        if !value.storable_in(component) {
            return Err(RuntimeError::ArrayStore {
                found: value.describe(),
                target: component,
            });
        }
        *slot = value.clone();
    }
    Ok(())
}

fn check_range<T: Element>(
    role: &str,
    pos: i32,
    length: i32,
    array: &Array<T>,
) -> RuntimeResult<()> {
    if pos < 0 {
        return Err(RuntimeError::out_of_bounds(format!(
            "arraycopy: {} index {} out of bounds for {}",
            role,
            pos,
            array.type_label()
        )));
    }
    if length < 0 {
        return Err(RuntimeError::out_of_bounds(format!(
            "arraycopy: length {} is negative",
            length
        )));
    }
    let end = i64::from(pos) + i64::from(length);
    if end > array.len() as i64 {
        return Err(RuntimeError::out_of_bounds(format!(
            "arraycopy: last {} index {} out of bounds for {}",
            role,
            end,
            array.type_label()
        )));
    }
    Ok(())
}

/// `copy_within` for element types that are `Clone` but not `Copy`
trait CopyWithinCloned {
    fn copy_within_cloned(&mut self, src: std::ops::Range<usize>, dest: usize);
}

impl<T: Clone> CopyWithinCloned for Vec<T> {
    fn copy_within_cloned(&mut self, src: std::ops::Range<usize>, dest: usize) {
        let staged: Vec<T> = self[src].to_vec();
        self[dest..dest + staged.len()].clone_from_slice(&staged);
    }
}

// ============================================================================
// copy_of / copy_of_range
// ============================================================================

/// New array of `new_length` elements with component type `element_type`,
/// holding the first `min(new_length, original.len())` elements of
/// `original`; the tail is default-filled.
pub fn copy_of<T: Element>(
    original: &Array<T>,
    new_length: i32,
    element_type: ElementType,
) -> RuntimeResult<Array<T>> {
    let copy = Array::allocate(element_type, new_length)?;
    let count = new_length.min(original.len() as i32);
    arraycopy(original, 0, &copy, 0, count)?;
    Ok(copy)
}

/// New array holding `original[from..to]`, padded with defaults when `to`
/// runs past the end of `original`.
pub fn copy_of_range<T: Element>(
    original: &Array<T>,
    from: i32,
    to: i32,
    element_type: ElementType,
) -> RuntimeResult<Array<T>> {
    if from > to {
        return Err(RuntimeError::IllegalArgument(format!("{} > {}", from, to)));
    }
    let len = original.len() as i32;
    if from < 0 || from > len {
        return Err(RuntimeError::out_of_bounds(format!(
            "copy_of_range: from index {} out of bounds for {}",
            from,
            original.type_label()
        )));
    }
    let new_length = to - from;
    let copy = Array::allocate(element_type, new_length)?;
    arraycopy(original, from, &copy, 0, (len - from).min(new_length))?;
    Ok(copy)
}
