use std::collections::BTreeMap;

use crate::names::QualifiedName;

/// A linked enum declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub name: QualifiedName,
    /// Value to symbolic name.
    pub elements: BTreeMap<i32, String>,
}

impl EnumDescriptor {
    pub fn element(&self, value: i32) -> Option<&str> {
        self.elements.get(&value).map(String::as_str)
    }
}
