//! Interned descriptor singletons for the primitive kinds.
//!
//! Every module's type table hands out the same descriptor object for a
//! given primitive, so primitives compare equal by pointer across the
//! whole process.

use std::sync::Arc;

use lazy_static::lazy_static;

use crate::type_desc::{PrimitiveKind, TypeDescriptor};

lazy_static! {
    static ref BOOL: Arc<TypeDescriptor> = Arc::new(TypeDescriptor::Primitive(PrimitiveKind::Bool));
    static ref BYTE: Arc<TypeDescriptor> = Arc::new(TypeDescriptor::Primitive(PrimitiveKind::Byte));
    static ref I16: Arc<TypeDescriptor> = Arc::new(TypeDescriptor::Primitive(PrimitiveKind::I16));
    static ref I32: Arc<TypeDescriptor> = Arc::new(TypeDescriptor::Primitive(PrimitiveKind::I32));
    static ref I64: Arc<TypeDescriptor> = Arc::new(TypeDescriptor::Primitive(PrimitiveKind::I64));
    static ref FLOAT: Arc<TypeDescriptor> =
        Arc::new(TypeDescriptor::Primitive(PrimitiveKind::Float));
    static ref DOUBLE: Arc<TypeDescriptor> =
        Arc::new(TypeDescriptor::Primitive(PrimitiveKind::Double));
    static ref STRING: Arc<TypeDescriptor> =
        Arc::new(TypeDescriptor::Primitive(PrimitiveKind::String));
    static ref BINARY: Arc<TypeDescriptor> =
        Arc::new(TypeDescriptor::Primitive(PrimitiveKind::Binary));
    static ref VOID: Arc<TypeDescriptor> = Arc::new(TypeDescriptor::Primitive(PrimitiveKind::Void));
}

/// Returns the interned descriptor for a primitive kind.
pub fn primitive(kind: PrimitiveKind) -> Arc<TypeDescriptor> {
    let descriptor = match kind {
        PrimitiveKind::Bool => &*BOOL,
        PrimitiveKind::Byte => &*BYTE,
        PrimitiveKind::I16 => &*I16,
        PrimitiveKind::I32 => &*I32,
        PrimitiveKind::I64 => &*I64,
        PrimitiveKind::Float => &*FLOAT,
        PrimitiveKind::Double => &*DOUBLE,
        PrimitiveKind::String => &*STRING,
        PrimitiveKind::Binary => &*BINARY,
        PrimitiveKind::Void => &*VOID,
    };
    Arc::clone(descriptor)
}

/// Looks a primitive up by its IDL keyword; `None` for anything else.
pub fn by_keyword(keyword: &str) -> Option<Arc<TypeDescriptor>> {
    PrimitiveKind::from_keyword(keyword).map(primitive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_interned() {
        for kind in PrimitiveKind::ALL {
            assert!(Arc::ptr_eq(&primitive(kind), &primitive(kind)));
        }
    }

    #[test]
    fn keyword_lookup() {
        let by_name = by_keyword("i64").unwrap();
        assert!(Arc::ptr_eq(&by_name, &primitive(PrimitiveKind::I64)));
        assert!(by_keyword("quux").is_none());
    }
}
