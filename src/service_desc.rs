use crate::function_desc::FunctionDescriptor;
use crate::names::QualifiedName;

/// A linked service declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub name: QualifiedName,
    pub functions: Vec<FunctionDescriptor>,
    /// Qualified name of the extended service. Resolved against the
    /// services mapping of the snapshot produced by the same aggregation
    /// call; see [`MetadataSnapshot::service_lineage`](crate::MetadataSnapshot::service_lineage).
    pub parent: Option<QualifiedName>,
}

impl ServiceDescriptor {
    pub fn function(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.iter().find(|function| function.name == name)
    }
}
