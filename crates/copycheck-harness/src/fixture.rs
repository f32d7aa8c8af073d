//! Canonical source buffers
//!
//! Built once by the driver and only read afterwards. Operations get private
//! clones of these through the synthesizer; the handles here never reach an
//! operation as an argument. Operations still see the fixture itself, so the
//! executor snapshots it and puts back anything an operation overwrites.

use crate::shape::{ElementKind, SourceKind};
use copycheck_runtime::{ArrayRef, Class, IntArray, ObjRef, RefArray, RuntimeResult};

pub const SMALL_LEN: usize = 5;
pub const LARGE_LEN: usize = 10;

/// The canonical buffers every scenario compares against
pub struct Fixture {
    small_refs: RefArray,
    large_refs: RefArray,
    zero_refs: RefArray,
    small_ints: IntArray,
    large_ints: IntArray,
    zero_ints: IntArray,
    small_objects: RefArray,
}

impl Fixture {
    /// Seed all buffers: `Base` instances in the reference buffers, `0..n`
    /// in the integer buffers, plain `Object` instances in `small_objects`
    pub fn new() -> Self {
        Self {
            small_refs: RefArray::instances(Class::Base, SMALL_LEN),
            large_refs: RefArray::instances(Class::Base, LARGE_LEN),
            zero_refs: RefArray::nulls(Class::Base, 0),
            small_ints: ascending(SMALL_LEN),
            large_ints: ascending(LARGE_LEN),
            zero_ints: IntArray::zeroed(0),
            small_objects: RefArray::instances(Class::Object, SMALL_LEN),
        }
    }

    /// Canonical buffer for a scenario's source kind and element kind
    pub fn source(&self, kind: SourceKind, element: ElementKind) -> ArrayRef {
        match (element, kind) {
            (ElementKind::Int, SourceKind::Small) => self.small_ints.clone().into(),
            (ElementKind::Int, SourceKind::Large) => self.large_ints.clone().into(),
            (ElementKind::Int, SourceKind::Zero) => self.zero_ints.clone().into(),
            (ElementKind::Ref, SourceKind::Small) => self.small_refs.clone().into(),
            (ElementKind::Ref, SourceKind::Large) => self.large_refs.clone().into(),
            (ElementKind::Ref, SourceKind::Zero) => self.zero_refs.clone().into(),
        }
    }

    pub fn small_refs(&self) -> &RefArray {
        &self.small_refs
    }

    pub fn large_refs(&self) -> &RefArray {
        &self.large_refs
    }

    pub fn zero_refs(&self) -> &RefArray {
        &self.zero_refs
    }

    pub fn small_ints(&self) -> &IntArray {
        &self.small_ints
    }

    pub fn large_ints(&self) -> &IntArray {
        &self.large_ints
    }

    pub fn zero_ints(&self) -> &IntArray {
        &self.zero_ints
    }

    /// `Object[]` of plain objects; never storable into a `Base[]`
    pub fn small_objects(&self) -> &RefArray {
        &self.small_objects
    }

    fn ref_buffers(&self) -> [&RefArray; 4] {
        [
            &self.small_refs,
            &self.large_refs,
            &self.zero_refs,
            &self.small_objects,
        ]
    }

    fn int_buffers(&self) -> [&IntArray; 3] {
        [&self.small_ints, &self.large_ints, &self.zero_ints]
    }

    /// Write `snapshot` back into the buffers
    pub fn restore(&self, snapshot: &FixtureSnapshot) -> RuntimeResult<()> {
        for (buffer, values) in self.ref_buffers().into_iter().zip(&snapshot.refs) {
            for (i, value) in values.iter().enumerate() {
                buffer.set(i, value.clone())?;
            }
        }
        for (buffer, values) in self.int_buffers().into_iter().zip(&snapshot.ints) {
            for (i, value) in values.iter().enumerate() {
                buffer.set(i, *value)?;
            }
        }
        Ok(())
    }

    /// Snapshot of every buffer's contents, for detecting stray writes
    pub fn snapshot(&self) -> FixtureSnapshot {
        FixtureSnapshot {
            refs: self.ref_buffers().map(RefArray::to_vec),
            ints: self.int_buffers().map(IntArray::to_vec),
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Contents of every canonical buffer at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSnapshot {
    refs: [Vec<Option<ObjRef>>; 4],
    ints: [Vec<i32>; 3],
}

const REF_BUFFERS: [&str; 4] = ["small_refs", "large_refs", "zero_refs", "small_objects"];
const INT_BUFFERS: [&str; 3] = ["small_ints", "large_ints", "zero_ints"];

impl FixtureSnapshot {
    /// Names of the buffers whose contents differ between the two snapshots
    pub fn changed_buffers(&self, other: &FixtureSnapshot) -> Vec<&'static str> {
        let refs = REF_BUFFERS
            .iter()
            .zip(self.refs.iter().zip(&other.refs))
            .filter(|(_, (a, b))| a != b);
        let ints = INT_BUFFERS
            .iter()
            .zip(self.ints.iter().zip(&other.ints))
            .filter(|(_, (a, b))| a != b);
        refs.map(|(name, _)| *name)
            .chain(ints.map(|(name, _)| *name))
            .collect()
    }
}

fn ascending(len: usize) -> IntArray {
    IntArray::from_vec((0..len as i32).collect())
}
