//! The merged metadata view produced by one aggregation call.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::warn;

use crate::enum_desc::EnumDescriptor;
use crate::names::QualifiedName;
use crate::service_desc::ServiceDescriptor;
use crate::struct_desc::StructDescriptor;

/// The fully merged metadata for a module and everything it transitively
/// includes: four mappings from qualified name to descriptor.
///
/// A snapshot is a derived, disposable value built fresh by every
/// [`SchemaModule::aggregate`](crate::SchemaModule::aggregate) call. It is
/// immutable once returned and freely shareable without synchronization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataSnapshot {
    enums: HashMap<QualifiedName, Arc<EnumDescriptor>>,
    structs: HashMap<QualifiedName, Arc<StructDescriptor>>,
    exceptions: HashMap<QualifiedName, Arc<StructDescriptor>>,
    services: HashMap<QualifiedName, Arc<ServiceDescriptor>>,
}

impl MetadataSnapshot {
    pub fn enums(&self) -> &HashMap<QualifiedName, Arc<EnumDescriptor>> {
        &self.enums
    }

    pub fn structs(&self) -> &HashMap<QualifiedName, Arc<StructDescriptor>> {
        &self.structs
    }

    pub fn exceptions(&self) -> &HashMap<QualifiedName, Arc<StructDescriptor>> {
        &self.exceptions
    }

    pub fn services(&self) -> &HashMap<QualifiedName, Arc<ServiceDescriptor>> {
        &self.services
    }

    /// Restricts the services mapping to `name` and its ancestor chain;
    /// the other three mappings are carried over unchanged.
    ///
    /// An absent starting service yields an empty services mapping. A
    /// parent reference that cannot be found terminates the chain at the
    /// node that declared it. A circular parent chain is cut at the first
    /// revisited name; the walk keeps a visited set, so it always
    /// terminates.
    pub fn service_lineage(&self, name: &QualifiedName) -> MetadataSnapshot {
        let mut relevant = HashMap::new();
        let mut visited = HashSet::new();
        let mut current = self.services.get(name);
        while let Some(service) = current {
            if !visited.insert(service.name.clone()) {
                warn!(
                    "service inheritance cycle at `{}`; truncating lineage",
                    service.name
                );
                break;
            }
            relevant.insert(service.name.clone(), Arc::clone(service));
            current = service
                .parent
                .as_ref()
                .and_then(|parent| self.services.get(parent));
        }
        MetadataSnapshot {
            enums: self.enums.clone(),
            structs: self.structs.clone(),
            exceptions: self.exceptions.clone(),
            services: relevant,
        }
    }
}

/// Mutable staging area for one aggregation call, frozen into a
/// [`MetadataSnapshot`] when the merge is complete.
#[derive(Default)]
pub(crate) struct SnapshotBuilder {
    enums: HashMap<QualifiedName, Arc<EnumDescriptor>>,
    structs: HashMap<QualifiedName, Arc<StructDescriptor>>,
    exceptions: HashMap<QualifiedName, Arc<StructDescriptor>>,
    services: HashMap<QualifiedName, Arc<ServiceDescriptor>>,
}

impl SnapshotBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn into_snapshot(self) -> MetadataSnapshot {
        MetadataSnapshot {
            enums: self.enums,
            structs: self.structs,
            exceptions: self.exceptions,
            services: self.services,
        }
    }
}

macro_rules! snapshot_kinds {
    ($(($field:ident, $descriptor:ty, $insert:ident, $label:literal)),+ $(,)?) => {
        impl SnapshotBuilder {
            $(
                pub(crate) fn $insert(&mut self, descriptors: &[Arc<$descriptor>]) {
                    for descriptor in descriptors {
                        self.$field
                            .insert(descriptor.name.clone(), Arc::clone(descriptor));
                    }
                }
            )+

            /// Merges a previously aggregated snapshot. On a key
            /// collision the merged-in value wins, which makes the
            /// overall policy last-writer-wins in include order. Equal
            /// content merging over itself (diamond includes) is
            /// idempotent and silent; a replacement that differs in
            /// content is logged.
            pub(crate) fn merge(&mut self, other: &MetadataSnapshot) {
                $(
                    for (name, descriptor) in &other.$field {
                        let replaced = self
                            .$field
                            .insert(name.clone(), Arc::clone(descriptor));
                        if let Some(previous) = replaced {
                            if previous != *descriptor {
                                warn!(
                                    concat!(
                                        $label,
                                        " `{}` merged with a different shape; keeping the later version"
                                    ),
                                    name
                                );
                            }
                        }
                    }
                )+
            }
        }
    };
}

snapshot_kinds!(
    (enums, EnumDescriptor, insert_enums, "enum"),
    (structs, StructDescriptor, insert_structs, "struct"),
    (exceptions, StructDescriptor, insert_exceptions, "exception"),
    (services, ServiceDescriptor, insert_services, "service"),
);
