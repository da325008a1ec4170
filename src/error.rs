use thiserror::Error;

use crate::names::QualifiedName;

/// A fault in the schema graph supplied to the linker.
///
/// Link errors are construction-time: they are produced once, when a
/// module's tables are first built, and the stored fault is replayed to
/// every later caller. Name lookups that merely find nothing are not
/// errors; they return an absent result.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    /// A name-based reference that resolves neither in the declaring
    /// module nor in the include that owns the referenced module.
    #[error("unresolved type reference `{reference}` in `{context}`")]
    UnresolvedType {
        reference: QualifiedName,
        context: QualifiedName,
    },

    /// Two declarations in one module share a qualified name.
    #[error("duplicate declaration of `{name}`")]
    DuplicateDeclaration { name: QualifiedName },

    /// A field list reuses a field id.
    #[error("duplicate field id {id} in `{owner}`")]
    DuplicateFieldId { owner: QualifiedName, id: i32 },
}
