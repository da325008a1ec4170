use crate::field_desc::FieldDescriptor;
use crate::names::QualifiedName;

/// A linked struct or exception declaration. The two are the same shape;
/// an aggregated [snapshot](crate::MetadataSnapshot) keeps them in
/// separate mappings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDescriptor {
    pub name: QualifiedName,
    /// `true` for unions. Always `false` for exceptions.
    pub is_union: bool,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl StructDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_by_id(&self, id: i32) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.id == id)
    }
}
