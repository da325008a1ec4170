use std::sync::Arc;

use crate::field_desc::FieldDescriptor;
use crate::type_desc::TypeDescriptor;

/// One function of a [service](crate::ServiceDescriptor).
///
/// A `void` return links to the interned void primitive rather than an
/// absent type, so every function has a resolvable return descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub name: String,
    pub oneway: bool,
    pub return_type: Arc<TypeDescriptor>,
    /// Arguments in declaration order.
    pub arguments: Vec<FieldDescriptor>,
    /// Declared exceptions in declaration order.
    pub exceptions: Vec<FieldDescriptor>,
}
