//! The compile-time input surface: plain-data declaration records as the
//! IDL front end emits them, with name-based type references that are
//! resolved when the owning module links.

use crate::names::QualifiedName;
use crate::type_desc::PrimitiveKind;

/// A type reference as written in schema source, before linking.
///
/// `Named` references are resolved against the declaring module first and
/// then against the module's includes; the other variants are interned
/// structurally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    Named(QualifiedName),
    List(Box<TypeRef>),
    Set(Box<TypeRef>),
    Map(Box<TypeRef>, Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: &str) -> Self {
        TypeRef::Named(QualifiedName::parse(name))
    }

    pub fn list(element: TypeRef) -> Self {
        TypeRef::List(Box::new(element))
    }

    pub fn set(element: TypeRef) -> Self {
        TypeRef::Set(Box::new(element))
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map(Box::new(key), Box::new(value))
    }
}

/// `typedef <target> <name>`
#[derive(Clone, Debug)]
pub struct TypedefDecl {
    pub name: String,
    pub target: TypeRef,
}

impl TypedefDecl {
    pub fn new(name: impl Into<String>, target: TypeRef) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EnumDecl {
    pub name: String,
    /// `(value, symbolic name)` pairs in declaration order.
    pub elements: Vec<(i32, String)>,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>, elements: &[(i32, &str)]) -> Self {
        Self {
            name: name.into(),
            elements: elements
                .iter()
                .map(|(value, element)| (*value, (*element).to_string()))
                .collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub id: i32,
    pub name: String,
    pub optional: bool,
    pub ty: TypeRef,
}

impl FieldDecl {
    pub fn new(id: i32, name: impl Into<String>, optional: bool, ty: TypeRef) -> Self {
        Self {
            id,
            name: name.into(),
            optional,
            ty,
        }
    }
}

/// A struct, union or exception declaration. Which of the three it is
/// depends on the [`ModuleDecls`] collection it is placed in and on
/// `is_union`.
#[derive(Clone, Debug)]
pub struct StructDecl {
    pub name: String,
    pub is_union: bool,
    pub fields: Vec<FieldDecl>,
}

impl StructDecl {
    pub fn new(name: impl Into<String>, is_union: bool, fields: Vec<FieldDecl>) -> Self {
        Self {
            name: name.into(),
            is_union,
            fields,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FunctionDecl {
    pub name: String,
    pub oneway: bool,
    /// `None` declares a `void` return.
    pub return_type: Option<TypeRef>,
    pub arguments: Vec<FieldDecl>,
    /// The exceptions the function is declared to throw.
    pub exceptions: Vec<FieldDecl>,
}

impl FunctionDecl {
    pub fn new(
        name: impl Into<String>,
        oneway: bool,
        return_type: Option<TypeRef>,
        arguments: Vec<FieldDecl>,
        exceptions: Vec<FieldDecl>,
    ) -> Self {
        Self {
            name: name.into(),
            oneway,
            return_type,
            arguments,
            exceptions,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServiceDecl {
    pub name: String,
    /// Qualified name of the extended service, possibly in another module.
    pub parent: Option<QualifiedName>,
    pub functions: Vec<FunctionDecl>,
}

impl ServiceDecl {
    pub fn new(name: impl Into<String>, parent: Option<&str>, functions: Vec<FunctionDecl>) -> Self {
        Self {
            name: name.into(),
            parent: parent.map(QualifiedName::parse),
            functions,
        }
    }
}

/// Everything one module declares. Names are local; the owning
/// [`SchemaModule`](crate::SchemaModule) scopes them with its module name.
#[derive(Clone, Debug, Default)]
pub struct ModuleDecls {
    pub typedefs: Vec<TypedefDecl>,
    pub enums: Vec<EnumDecl>,
    pub structs: Vec<StructDecl>,
    pub exceptions: Vec<StructDecl>,
    pub services: Vec<ServiceDecl>,
}
