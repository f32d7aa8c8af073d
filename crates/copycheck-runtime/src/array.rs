//! Array handles with identity
//!
//! An [`Array`] is a handle onto shared, interior-mutable storage. Cloning the
//! handle aliases the array (both handles see every store); `clone_array`
//! is the structural clone that allocates a new array with the same elements.

use crate::class::Class;
use crate::error::{RuntimeError, RuntimeResult};
use crate::object::ObjRef;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Declared component type of an array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Int,
    Ref(Class),
}

impl ElementType {
    /// Whether every value of `self` can be stored into a `target` array
    /// without a per-element check
    pub fn is_assignable_to(self, target: ElementType) -> bool {
        match (self, target) {
            (ElementType::Int, ElementType::Int) => true,
            (ElementType::Ref(from), ElementType::Ref(to)) => from.is_subclass_of(to),
            _ => false,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Int => f.write_str("int"),
            ElementType::Ref(class) => write!(f, "{}", class),
        }
    }
}

/// Values that can live in an array slot
pub trait Element: Clone + Default + PartialEq + fmt::Debug {
    /// What an array of `Self` records about its declared component type
    type Component: Copy + fmt::Debug;

    /// Component for `element_type`, or `None` when such arrays cannot hold
    /// `Self` at all
    fn component_of(element_type: ElementType) -> Option<Self::Component>;

    fn element_type(component: Self::Component) -> ElementType;

    /// Store check: can this particular value go into a `component` array
    fn storable_in(&self, component: ElementType) -> bool;

    /// Human-readable rendering for diagnostics
    fn describe(&self) -> String;
}

impl Element for i32 {
    type Component = ();

    fn component_of(element_type: ElementType) -> Option<()> {
        (element_type == ElementType::Int).then_some(())
    }

    fn element_type(_: ()) -> ElementType {
        ElementType::Int
    }

    fn storable_in(&self, component: ElementType) -> bool {
        component == ElementType::Int
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl Element for Option<ObjRef> {
    type Component = Class;

    fn component_of(element_type: ElementType) -> Option<Class> {
        match element_type {
            ElementType::Ref(class) => Some(class),
            ElementType::Int => None,
        }
    }

    fn element_type(component: Class) -> ElementType {
        ElementType::Ref(component)
    }

    fn storable_in(&self, component: ElementType) -> bool {
        match (self, component) {
            (_, ElementType::Int) => false,
            (None, ElementType::Ref(_)) => true,
            (Some(obj), ElementType::Ref(class)) => obj.class().is_subclass_of(class),
        }
    }

    fn describe(&self) -> String {
        match self {
            Some(obj) => obj.to_string(),
            None => "null".to_string(),
        }
    }
}

struct ArrayBody<T: Element> {
    component: T::Component,
    elements: RefCell<Vec<T>>,
}

/// Shared array handle
pub struct Array<T: Element> {
    body: Rc<ArrayBody<T>>,
}

pub type IntArray = Array<i32>;
pub type RefArray = Array<Option<ObjRef>>;

impl<T: Element> Clone for Array<T> {
    /// Aliases the array; use [`Array::clone_array`] for a new one.
    fn clone(&self) -> Self {
        Array {
            body: Rc::clone(&self.body),
        }
    }
}

impl<T: Element> Array<T> {
    /// Build an array from raw parts. Callers guarantee that every element
    /// passes the store check.
    fn from_parts(component: T::Component, elements: Vec<T>) -> Self {
        Array {
            body: Rc::new(ArrayBody {
                component,
                elements: RefCell::new(elements),
            }),
        }
    }

    /// Allocate a default-filled array with the given component type
    pub fn allocate(element_type: ElementType, len: i32) -> RuntimeResult<Self> {
        let component = T::component_of(element_type).ok_or_else(|| {
            RuntimeError::IllegalArgument(format!(
                "{}[] cannot hold {}",
                element_type,
                std::any::type_name::<T>()
            ))
        })?;
        if len < 0 {
            return Err(RuntimeError::NegativeArraySize(len));
        }
        Ok(Self::from_parts(component, vec![T::default(); len as usize]))
    }

    pub fn element_type(&self) -> ElementType {
        T::element_type(self.body.component)
    }

    pub fn len(&self) -> usize {
        self.body.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bounds-checked read
    pub fn get(&self, index: usize) -> RuntimeResult<T> {
        let elements = self.body.elements.borrow();
        elements.get(index).cloned().ok_or_else(|| {
            RuntimeError::out_of_bounds(format!(
                "index {} out of bounds for length {}",
                index,
                elements.len()
            ))
        })
    }

    /// Bounds- and store-checked write
    pub fn set(&self, index: usize, value: T) -> RuntimeResult<()> {
        if !value.storable_in(self.element_type()) {
            return Err(RuntimeError::ArrayStore {
                found: value.describe(),
                target: self.element_type(),
            });
        }
        let mut elements = self.body.elements.borrow_mut();
        let len = elements.len();
        match elements.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RuntimeError::out_of_bounds(format!(
                "index {} out of bounds for length {}",
                index, len
            ))),
        }
    }

    /// Snapshot of the current contents
    pub fn to_vec(&self) -> Vec<T> {
        self.body.elements.borrow().clone()
    }

    /// Structural clone: new identity, same component type, same elements.
    /// References are copied, not the objects they point at.
    pub fn clone_array(&self) -> Self {
        Self::from_parts(self.body.component, self.to_vec())
    }

    /// Fresh default-filled array with this array's component type and length
    pub fn allocate_like(&self) -> Self {
        Self::from_parts(self.body.component, vec![T::default(); self.len()])
    }

    /// Whether both handles refer to the same array
    pub fn same_array(&self, other: &Array<T>) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }

    pub(crate) fn elements(&self) -> Ref<'_, Vec<T>> {
        self.body.elements.borrow()
    }

    pub(crate) fn elements_mut(&self) -> RefMut<'_, Vec<T>> {
        self.body.elements.borrow_mut()
    }

    /// Label in the style `int[5]`, used in diagnostics
    pub fn type_label(&self) -> String {
        format!("{}[{}]", self.element_type(), self.len())
    }
}

impl IntArray {
    /// Zero-filled integer array
    pub fn zeroed(len: usize) -> Self {
        Self::from_parts((), vec![0; len])
    }

    pub fn from_vec(values: Vec<i32>) -> Self {
        Self::from_parts((), values)
    }

    /// Sum of all elements with two's-complement wrap-around
    pub fn sum(&self) -> i32 {
        self.elements()
            .iter()
            .fold(0i32, |acc, value| acc.wrapping_add(*value))
    }
}

impl RefArray {
    /// Null-filled reference array with component type `component`
    pub fn nulls(component: Class, len: usize) -> Self {
        Self::from_parts(component, vec![None; len])
    }

    /// Reference array of `len` fresh `class` instances
    pub fn instances(class: Class, len: usize) -> Self {
        let elements = (0..len).map(|_| Some(ObjRef::new(class))).collect();
        Self::from_parts(class, elements)
    }

    /// Reference array holding `elements`; every element must pass the store
    /// check for `component`
    pub fn from_elements(component: Class, elements: Vec<Option<ObjRef>>) -> RuntimeResult<Self> {
        let element_type = ElementType::Ref(component);
        if let Some(bad) = elements.iter().find(|e| !e.storable_in(element_type)) {
            return Err(RuntimeError::ArrayStore {
                found: bad.describe(),
                target: element_type,
            });
        }
        Ok(Self::from_parts(component, elements))
    }

    /// Component class of this reference array
    pub fn component(&self) -> Class {
        self.body.component
    }
}

impl<T: Element> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[]", self.element_type())?;
        f.debug_list().entries(self.elements().iter()).finish()
    }
}

/// Type-erased array handle passed through the harness
#[derive(Clone, Debug)]
pub enum ArrayRef {
    Int(IntArray),
    Ref(RefArray),
}

impl ArrayRef {
    pub fn len(&self) -> usize {
        match self {
            ArrayRef::Int(a) => a.len(),
            ArrayRef::Ref(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            ArrayRef::Int(a) => a.element_type(),
            ArrayRef::Ref(a) => a.element_type(),
        }
    }

    pub fn clone_array(&self) -> ArrayRef {
        match self {
            ArrayRef::Int(a) => ArrayRef::Int(a.clone_array()),
            ArrayRef::Ref(a) => ArrayRef::Ref(a.clone_array()),
        }
    }

    pub fn allocate_like(&self) -> ArrayRef {
        match self {
            ArrayRef::Int(a) => ArrayRef::Int(a.allocate_like()),
            ArrayRef::Ref(a) => ArrayRef::Ref(a.allocate_like()),
        }
    }

    /// Identity comparison; arrays of different element kinds are never the same
    pub fn same_array(&self, other: &ArrayRef) -> bool {
        match (self, other) {
            (ArrayRef::Int(a), ArrayRef::Int(b)) => a.same_array(b),
            (ArrayRef::Ref(a), ArrayRef::Ref(b)) => a.same_array(b),
            _ => false,
        }
    }

    pub fn as_ints(&self) -> Option<&IntArray> {
        match self {
            ArrayRef::Int(a) => Some(a),
            ArrayRef::Ref(_) => None,
        }
    }

    pub fn as_refs(&self) -> Option<&RefArray> {
        match self {
            ArrayRef::Ref(a) => Some(a),
            ArrayRef::Int(_) => None,
        }
    }

    /// Rendering of the element at `index`, `None` past the end
    pub fn describe_at(&self, index: usize) -> Option<String> {
        match self {
            ArrayRef::Int(a) => a.get(index).ok().map(|v| v.describe()),
            ArrayRef::Ref(a) => a.get(index).ok().map(|v| v.describe()),
        }
    }

    pub fn type_label(&self) -> String {
        match self {
            ArrayRef::Int(a) => a.type_label(),
            ArrayRef::Ref(a) => a.type_label(),
        }
    }
}

impl From<IntArray> for ArrayRef {
    fn from(array: IntArray) -> Self {
        ArrayRef::Int(array)
    }
}

impl From<RefArray> for ArrayRef {
    fn from(array: RefArray) -> Self {
        ArrayRef::Ref(array)
    }
}
