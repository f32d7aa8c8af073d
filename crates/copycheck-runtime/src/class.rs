//! Class hierarchy for heap instances and reference-array components

use std::fmt;

/// A class in the model's single-inheritance hierarchy.
///
/// `Derived` extends `Base`, which extends `Object`. Having a proper subclass
/// of `Base` around keeps store checks against `Base[]` from degenerating into
/// an exact class comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    Object,
    Base,
    Derived,
}

impl Class {
    /// Direct superclass, `None` for the root
    pub fn superclass(self) -> Option<Class> {
        match self {
            Class::Object => None,
            Class::Base => Some(Class::Object),
            Class::Derived => Some(Class::Base),
        }
    }

    /// Whether `self` is `other` or one of its subclasses
    pub fn is_subclass_of(self, other: Class) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == other {
                return true;
            }
            current = class.superclass();
        }
        false
    }

    pub fn name(self) -> &'static str {
        match self {
            Class::Object => "Object",
            Class::Base => "Base",
            Class::Derived => "Derived",
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
