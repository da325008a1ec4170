use std::sync::Arc;

use crate::type_desc::TypeDescriptor;

/// One field of a struct, exception, argument list or declared-exception
/// list.
///
/// Field ids are unique within the owning list; they are not required to
/// be contiguous.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub id: i32,
    pub name: String,
    pub optional: bool,
    pub ty: Arc<TypeDescriptor>,
}
