//! Cross-module metadata registry and linker for Thrift schemas.
//!
//! Each independently compiled schema module knows its own declarations
//! plus name-based references into the modules it includes. A
//! [`SchemaModule`] links those declarations into shared, immutable
//! descriptors on first use; [`SchemaModule::aggregate`] merges a module
//! with everything it transitively includes into one [`MetadataSnapshot`];
//! [`SchemaModule::lineage`] extracts a single service together with its
//! inheritance chain.

pub mod builtins;
pub mod decl;
pub mod enum_desc;
pub mod error;
pub mod field_desc;
pub mod function_desc;
pub mod module;
pub mod names;
pub mod service_desc;
pub mod snapshot;
pub mod struct_desc;
pub mod type_desc;
pub mod type_table;

pub use decl::{
    EnumDecl, FieldDecl, FunctionDecl, ModuleDecls, ServiceDecl, StructDecl, TypeRef, TypedefDecl,
};
pub use enum_desc::EnumDescriptor;
pub use error::LinkError;
pub use field_desc::FieldDescriptor;
pub use function_desc::FunctionDescriptor;
pub use module::SchemaModule;
pub use names::QualifiedName;
pub use service_desc::ServiceDescriptor;
pub use snapshot::MetadataSnapshot;
pub use struct_desc::StructDescriptor;
pub use type_desc::{PrimitiveKind, TypeDescriptor};
pub use type_table::TypeTable;
