use std::sync::Arc;

use crate::names::QualifiedName;

/// The Thrift primitive kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Byte,
    I16,
    I32,
    I64,
    Float,
    Double,
    String,
    Binary,
    Void,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 10] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Byte,
        PrimitiveKind::I16,
        PrimitiveKind::I32,
        PrimitiveKind::I64,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::String,
        PrimitiveKind::Binary,
        PrimitiveKind::Void,
    ];

    /// The IDL keyword naming this primitive.
    pub const fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::String => "string",
            PrimitiveKind::Binary => "binary",
            PrimitiveKind::Void => "void",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<PrimitiveKind> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }
}

/// Immutable metadata describing a declared or structural type.
///
/// Descriptors are shared via `Arc` and cross-reference each other by
/// object identity once a module is linked: a field's descriptor is the
/// identical object stored in the owning module's [type
/// table](crate::TypeTable), never a copy resolved again by name.
///
/// Named kinds (`Enum`, `Struct`, `Union`) carry only the qualified name;
/// the full shape of the referenced declaration lives in the aggregated
/// [snapshot](crate::MetadataSnapshot), keyed by that name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    Enum(QualifiedName),
    Struct(QualifiedName),
    Union(QualifiedName),
    Typedef {
        name: QualifiedName,
        underlying: Arc<TypeDescriptor>,
    },
    List(Arc<TypeDescriptor>),
    Set(Arc<TypeDescriptor>),
    Map(Arc<TypeDescriptor>, Arc<TypeDescriptor>),
}

impl TypeDescriptor {
    /// The name this descriptor is registered under in a type table:
    /// the declared qualified name for named kinds, the bare keyword for
    /// primitives, and a `list<T>`-style rendering for structural kinds.
    pub fn canonical_name(&self) -> QualifiedName {
        match self {
            TypeDescriptor::Primitive(kind) => QualifiedName::unscoped(kind.keyword()),
            TypeDescriptor::Enum(name)
            | TypeDescriptor::Struct(name)
            | TypeDescriptor::Union(name) => name.clone(),
            TypeDescriptor::Typedef { name, .. } => name.clone(),
            TypeDescriptor::List(element) => {
                QualifiedName::unscoped(format!("list<{}>", element.canonical_name()))
            }
            TypeDescriptor::Set(element) => {
                QualifiedName::unscoped(format!("set<{}>", element.canonical_name()))
            }
            TypeDescriptor::Map(key, value) => QualifiedName::unscoped(format!(
                "map<{}, {}>",
                key.canonical_name(),
                value.canonical_name()
            )),
        }
    }

    /// Follows typedef indirections down to the first non-typedef
    /// descriptor.
    pub fn resolved(self: &Arc<Self>) -> Arc<TypeDescriptor> {
        let mut current = Arc::clone(self);
        while let TypeDescriptor::Typedef { underlying, .. } = current.as_ref() {
            let next = Arc::clone(underlying);
            current = next;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;

    #[test]
    fn canonical_names_for_structural_types() {
        let element = builtins::primitive(PrimitiveKind::I32);
        let list = TypeDescriptor::List(element);
        assert_eq!(list.canonical_name(), QualifiedName::unscoped("list<i32>"));

        let map = TypeDescriptor::Map(
            builtins::primitive(PrimitiveKind::String),
            Arc::new(TypeDescriptor::Struct(QualifiedName::scoped("a", "B"))),
        );
        assert_eq!(
            map.canonical_name(),
            QualifiedName::unscoped("map<string, a.B>")
        );
    }

    #[test]
    fn resolved_unwraps_typedef_chains() {
        let base = builtins::primitive(PrimitiveKind::I64);
        let inner = Arc::new(TypeDescriptor::Typedef {
            name: QualifiedName::scoped("a", "Inner"),
            underlying: Arc::clone(&base),
        });
        let outer = Arc::new(TypeDescriptor::Typedef {
            name: QualifiedName::scoped("a", "Outer"),
            underlying: inner,
        });
        assert!(Arc::ptr_eq(&outer.resolved(), &base));
    }
}
