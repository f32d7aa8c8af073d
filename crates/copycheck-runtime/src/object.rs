//! Heap instances with identity

use crate::class::Class;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

thread_local! {
    static NEXT_SERIAL: Cell<u64> = const { Cell::new(1) };
}

#[derive(Debug)]
struct Instance {
    class: Class,
    serial: u64,
}

/// Reference to a heap instance.
///
/// Cloning the reference does not copy the instance. Equality is identity:
/// two `ObjRef`s are equal only if they point at the same allocation.
#[derive(Clone)]
pub struct ObjRef(Rc<Instance>);

impl ObjRef {
    /// Allocate a fresh instance of `class`
    pub fn new(class: Class) -> Self {
        let serial = NEXT_SERIAL.with(|next| {
            let serial = next.get();
            next.set(serial + 1);
            serial
        });
        ObjRef(Rc::new(Instance { class, serial }))
    }

    pub fn class(&self) -> Class {
        self.0.class
    }

    /// Allocation serial, unique per thread; only used for diagnostics
    pub fn serial(&self) -> u64 {
        self.0.serial
    }

    pub fn ptr_eq(&self, other: &ObjRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjRef {}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:x}", self.0.class, self.0.serial)
    }
}
