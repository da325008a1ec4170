//! One independently compiled schema module and its lazily linked
//! metadata.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use log::debug;

use crate::builtins;
use crate::decl::{FieldDecl, ModuleDecls, StructDecl};
use crate::enum_desc::EnumDescriptor;
use crate::error::LinkError;
use crate::field_desc::FieldDescriptor;
use crate::function_desc::FunctionDescriptor;
use crate::names::QualifiedName;
use crate::service_desc::ServiceDescriptor;
use crate::snapshot::{MetadataSnapshot, SnapshotBuilder};
use crate::struct_desc::StructDescriptor;
use crate::type_desc::{PrimitiveKind, TypeDescriptor};
use crate::type_table::TypeTable;

/// A schema module: its own declarations, the modules it includes, and
/// the metadata linked from both.
///
/// Linking is lazy and happens at most once, no matter how many threads
/// hit the module first: one thread builds, the rest block until the
/// result (or the stored fault) is available. A module can only include
/// modules constructed before it, so the include graph is acyclic by
/// construction and linking always terminates.
pub struct SchemaModule {
    name: String,
    decls: ModuleDecls,
    imports: Vec<Arc<SchemaModule>>,
    types: OnceLock<Result<TypeTable, LinkError>>,
    linked: OnceLock<Result<LinkedDecls, LinkError>>,
}

/// This module's four declaration collections, linked against the type
/// table. Declaration order is preserved.
struct LinkedDecls {
    enums: Vec<Arc<EnumDescriptor>>,
    structs: Vec<Arc<StructDescriptor>>,
    exceptions: Vec<Arc<StructDescriptor>>,
    services: Vec<Arc<ServiceDescriptor>>,
}

impl SchemaModule {
    pub fn new(
        name: impl Into<String>,
        decls: ModuleDecls,
        imports: Vec<Arc<SchemaModule>>,
    ) -> Arc<SchemaModule> {
        Arc::new(SchemaModule {
            name: name.into(),
            decls,
            imports,
            types: OnceLock::new(),
            linked: OnceLock::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directly included modules, in declared include order.
    pub fn imports(&self) -> &[Arc<SchemaModule>] {
        &self.imports
    }

    /// The module's type descriptor table, linking it on first access.
    pub fn type_table(&self) -> Result<&TypeTable, LinkError> {
        self.types
            .get_or_init(|| TypeTable::build(&self.name, &self.decls, &self.imports))
            .as_ref()
            .map_err(LinkError::clone)
    }

    /// Looks up a type descriptor in this module's table. Absent names
    /// yield `None`; so does a module that failed to link, whose fault is
    /// reported by [`Self::link`].
    pub fn resolve(&self, name: &QualifiedName) -> Option<Arc<TypeDescriptor>> {
        self.type_table().ok()?.resolve(name)
    }

    /// Forces the module's table and collections, reporting the stored
    /// fault if construction failed.
    pub fn link(&self) -> Result<(), LinkError> {
        self.linked_decls().map(|_| ())
    }

    /// Enums declared by this module only, in declaration order.
    pub fn enums(&self) -> Result<&[Arc<EnumDescriptor>], LinkError> {
        self.linked_decls().map(|decls| decls.enums.as_slice())
    }

    /// Structs and unions declared by this module only, in declaration
    /// order.
    pub fn structs(&self) -> Result<&[Arc<StructDescriptor>], LinkError> {
        self.linked_decls().map(|decls| decls.structs.as_slice())
    }

    /// Exceptions declared by this module only, in declaration order.
    pub fn exceptions(&self) -> Result<&[Arc<StructDescriptor>], LinkError> {
        self.linked_decls().map(|decls| decls.exceptions.as_slice())
    }

    /// Services declared by this module only, in declaration order.
    pub fn services(&self) -> Result<&[Arc<ServiceDescriptor>], LinkError> {
        self.linked_decls().map(|decls| decls.services.as_slice())
    }

    /// Merges this module's declarations with the recursively aggregated
    /// declarations of every module it includes, direct and transitive.
    ///
    /// Own declarations are inserted first, then each include's snapshot
    /// is merged in declared include order; on a qualified-name collision
    /// the later write wins. The snapshot is rebuilt on every call, so
    /// include graphs with shared transitive dependencies converge to the
    /// same mappings no matter how often each module is visited.
    pub fn aggregate(&self) -> Result<MetadataSnapshot, LinkError> {
        let decls = self.linked_decls()?;
        let mut builder = SnapshotBuilder::new();
        builder.insert_enums(&decls.enums);
        builder.insert_structs(&decls.structs);
        builder.insert_exceptions(&decls.exceptions);
        builder.insert_services(&decls.services);
        for import in &self.imports {
            builder.merge(&import.aggregate()?);
        }
        Ok(builder.into_snapshot())
    }

    /// Aggregates, then restricts the services mapping to `service` and
    /// its ancestor chain. See
    /// [`MetadataSnapshot::service_lineage`] for the walk's termination
    /// rules.
    pub fn lineage(&self, service: &QualifiedName) -> Result<MetadataSnapshot, LinkError> {
        Ok(self.aggregate()?.service_lineage(service))
    }

    fn linked_decls(&self) -> Result<&LinkedDecls, LinkError> {
        self.linked
            .get_or_init(|| self.build_decls())
            .as_ref()
            .map_err(LinkError::clone)
    }

    fn build_decls(&self) -> Result<LinkedDecls, LinkError> {
        let table = self.type_table()?;

        let mut enums = Vec::with_capacity(self.decls.enums.len());
        for decl in &self.decls.enums {
            enums.push(Arc::new(EnumDescriptor {
                name: self.scoped(&decl.name),
                elements: decl
                    .elements
                    .iter()
                    .map(|(value, element)| (*value, element.clone()))
                    .collect(),
            }));
        }

        let mut structs = Vec::with_capacity(self.decls.structs.len());
        for decl in &self.decls.structs {
            structs.push(self.link_struct(table, decl)?);
        }
        let mut exceptions = Vec::with_capacity(self.decls.exceptions.len());
        for decl in &self.decls.exceptions {
            exceptions.push(self.link_struct(table, decl)?);
        }

        let mut services = Vec::with_capacity(self.decls.services.len());
        let mut seen = HashSet::new();
        for decl in &self.decls.services {
            let name = self.scoped(&decl.name);
            if !seen.insert(name.clone()) {
                return Err(LinkError::DuplicateDeclaration { name });
            }
            let mut functions = Vec::with_capacity(decl.functions.len());
            for function in &decl.functions {
                let return_type = match &function.return_type {
                    Some(ty) => table.lookup_ref(ty, &name)?,
                    None => builtins::primitive(PrimitiveKind::Void),
                };
                functions.push(FunctionDescriptor {
                    name: function.name.clone(),
                    oneway: function.oneway,
                    return_type,
                    arguments: self.link_fields(table, &function.arguments, &name)?,
                    exceptions: self.link_fields(table, &function.exceptions, &name)?,
                });
            }
            services.push(Arc::new(ServiceDescriptor {
                name,
                functions,
                parent: decl.parent.clone(),
            }));
        }

        debug!(
            "linked module `{}`: {} types, {} structs, {} exceptions, {} enums, {} services",
            self.name,
            table.len(),
            structs.len(),
            exceptions.len(),
            enums.len(),
            services.len()
        );

        Ok(LinkedDecls {
            enums,
            structs,
            exceptions,
            services,
        })
    }

    fn link_struct(
        &self,
        table: &TypeTable,
        decl: &StructDecl,
    ) -> Result<Arc<StructDescriptor>, LinkError> {
        let name = self.scoped(&decl.name);
        let fields = self.link_fields(table, &decl.fields, &name)?;
        Ok(Arc::new(StructDescriptor {
            name,
            is_union: decl.is_union,
            fields,
        }))
    }

    fn link_fields(
        &self,
        table: &TypeTable,
        decls: &[FieldDecl],
        owner: &QualifiedName,
    ) -> Result<Vec<FieldDescriptor>, LinkError> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(decls.len());
        for decl in decls {
            if !seen.insert(decl.id) {
                return Err(LinkError::DuplicateFieldId {
                    owner: owner.clone(),
                    id: decl.id,
                });
            }
            fields.push(FieldDescriptor {
                id: decl.id,
                name: decl.name.clone(),
                optional: decl.optional,
                ty: table.lookup_ref(&decl.ty, owner)?,
            });
        }
        Ok(fields)
    }

    fn scoped(&self, name: &str) -> QualifiedName {
        QualifiedName::scoped(&self.name, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{ServiceDecl, TypeRef, TypedefDecl};
    use std::thread;

    fn i32_ref() -> TypeRef {
        TypeRef::Primitive(PrimitiveKind::I32)
    }

    /// The module from the worked example: `TrivialStruct { 1: i32 }` and
    /// `S { 1: i32 a; 2: optional i32 b; 3: TrivialStruct c }`.
    fn example_module() -> Arc<SchemaModule> {
        SchemaModule::new(
            "module",
            ModuleDecls {
                structs: vec![
                    StructDecl::new(
                        "TrivialStruct",
                        false,
                        vec![FieldDecl::new(1, "int_value", false, i32_ref())],
                    ),
                    StructDecl::new(
                        "S",
                        false,
                        vec![
                            FieldDecl::new(1, "a", false, i32_ref()),
                            FieldDecl::new(2, "b", true, i32_ref()),
                            FieldDecl::new(3, "c", false, TypeRef::named("module.TrivialStruct")),
                        ],
                    ),
                ],
                ..Default::default()
            },
            vec![],
        )
    }

    #[test]
    fn worked_example_links_and_aggregates() {
        let module = example_module();
        let merged = module.aggregate().unwrap();
        assert_eq!(merged.structs().len(), 2);

        let s = &merged.structs()[&QualifiedName::scoped("module", "S")];
        let names: Vec<&str> = s.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        let optional: Vec<bool> = s.fields.iter().map(|f| f.optional).collect();
        assert_eq!(optional, [false, true, false]);

        let trivial = module
            .resolve(&QualifiedName::scoped("module", "TrivialStruct"))
            .unwrap();
        assert!(Arc::ptr_eq(&s.fields[2].ty, &trivial));
    }

    #[test]
    fn collections_are_built_once_and_ordered() {
        let module = example_module();
        let first = module.structs().unwrap();
        let second = module.structs().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].name, QualifiedName::scoped("module", "TrivialStruct"));
        assert_eq!(first[1].name, QualifiedName::scoped("module", "S"));
        assert!(Arc::ptr_eq(&first[0], &second[0]));
    }

    #[test]
    fn typedef_shares_the_included_modules_descriptor() {
        let included = SchemaModule::new(
            "includes",
            ModuleDecls {
                structs: vec![StructDecl::new("Included", false, vec![])],
                ..Default::default()
            },
            vec![],
        );
        let service = SchemaModule::new(
            "service",
            ModuleDecls {
                typedefs: vec![TypedefDecl::new(
                    "IncludesIncluded",
                    TypeRef::named("includes.Included"),
                )],
                ..Default::default()
            },
            vec![Arc::clone(&included)],
        );

        let alias = service
            .resolve(&QualifiedName::scoped("service", "IncludesIncluded"))
            .unwrap();
        let target = included
            .resolve(&QualifiedName::scoped("includes", "Included"))
            .unwrap();
        match alias.as_ref() {
            TypeDescriptor::Typedef { underlying, .. } => {
                assert!(Arc::ptr_eq(underlying, &target));
            }
            other => panic!("expected a typedef, got {other:?}"),
        }
        assert!(Arc::ptr_eq(&alias.resolved(), &target));
    }

    #[test]
    fn absent_lookups_are_not_errors() {
        let module = example_module();
        assert!(module
            .resolve(&QualifiedName::parse("nonexistent.Type"))
            .is_none());
        let lineage = module
            .lineage(&QualifiedName::parse("nonexistent.Service"))
            .unwrap();
        assert!(lineage.services().is_empty());
    }

    #[test]
    fn link_faults_are_stored_once_and_replayed() {
        let module = SchemaModule::new(
            "module",
            ModuleDecls {
                typedefs: vec![TypedefDecl::new("Broken", TypeRef::named("gone.Type"))],
                ..Default::default()
            },
            vec![],
        );
        let first = module.link().unwrap_err();
        let second = module.aggregate().unwrap_err();
        assert_eq!(first, second);
        assert!(module.resolve(&QualifiedName::scoped("module", "Broken")).is_none());
    }

    #[test]
    fn duplicate_field_ids_are_rejected() {
        let module = SchemaModule::new(
            "module",
            ModuleDecls {
                structs: vec![StructDecl::new(
                    "Clash",
                    false,
                    vec![
                        FieldDecl::new(1, "a", false, i32_ref()),
                        FieldDecl::new(1, "b", false, i32_ref()),
                    ],
                )],
                ..Default::default()
            },
            vec![],
        );
        assert_eq!(
            module.link().unwrap_err(),
            LinkError::DuplicateFieldId {
                owner: QualifiedName::scoped("module", "Clash"),
                id: 1,
            }
        );
    }

    #[test]
    fn concurrent_first_access_builds_one_table() {
        let module = example_module();
        let name = QualifiedName::scoped("module", "TrivialStruct");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let module = Arc::clone(&module);
            let name = name.clone();
            handles.push(thread::spawn(move || module.resolve(&name).unwrap()));
        }
        let descriptors: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        for descriptor in &descriptors[1..] {
            assert!(Arc::ptr_eq(descriptor, &descriptors[0]));
        }
    }

    #[test]
    fn void_returns_link_to_the_interned_void() {
        let module = SchemaModule::new(
            "module",
            ModuleDecls {
                services: vec![ServiceDecl::new(
                    "Svc",
                    None,
                    vec![crate::decl::FunctionDecl::new("fire", true, None, vec![], vec![])],
                )],
                ..Default::default()
            },
            vec![],
        );
        let services = module.services().unwrap();
        let function = &services[0].functions[0];
        assert!(function.oneway);
        assert!(Arc::ptr_eq(
            &function.return_type,
            &builtins::primitive(PrimitiveKind::Void)
        ));
        assert!(module
            .resolve(&QualifiedName::unscoped("void"))
            .is_some());
    }
}
