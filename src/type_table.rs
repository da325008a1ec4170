//! The per-module table mapping canonical type names to interned
//! descriptors.

use std::collections::HashMap;
use std::sync::Arc;

use crate::builtins;
use crate::decl::{ModuleDecls, TypeRef};
use crate::error::LinkError;
use crate::module::SchemaModule;
use crate::names::QualifiedName;
use crate::type_desc::{PrimitiveKind, TypeDescriptor};

/// One module's type descriptor table, built exactly once when the module
/// first links.
///
/// Construction interns every type reachable from the module's
/// declarations: one entry per declared type, one per distinct primitive
/// keyword the declarations mention, and one per distinct structural type
/// (so two `list<i32>` fields share a single descriptor object). `Named`
/// references into an included module are resolved through that module's
/// own table, at most once per distinct name, and cached on the side:
/// they become part of this module's link result without being
/// re-registered under this module's name space.
///
/// After construction the table is read-only. Descriptors reference each
/// other directly by `Arc` identity; nothing is re-resolved by name.
#[derive(Debug)]
pub struct TypeTable {
    module: String,
    entries: HashMap<QualifiedName, Arc<TypeDescriptor>>,
    externals: HashMap<QualifiedName, Arc<TypeDescriptor>>,
}

impl TypeTable {
    /// The name of the module this table belongs to.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Looks up a descriptor registered in this module's table. Names
    /// declared by included modules are absent here; they live in the
    /// including module's own table.
    pub fn resolve(&self, name: &QualifiedName) -> Option<Arc<TypeDescriptor>> {
        self.entries.get(name).map(Arc::clone)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &QualifiedName> {
        self.entries.keys()
    }

    pub(crate) fn build(
        module: &str,
        decls: &ModuleDecls,
        imports: &[Arc<SchemaModule>],
    ) -> Result<TypeTable, LinkError> {
        let mut table = TypeTable {
            module: module.to_owned(),
            entries: HashMap::new(),
            externals: HashMap::new(),
        };

        for decl in &decls.enums {
            let name = table.scoped(&decl.name);
            table.register(name.clone(), Arc::new(TypeDescriptor::Enum(name)))?;
        }
        for decl in &decls.structs {
            let name = table.scoped(&decl.name);
            let descriptor = if decl.is_union {
                TypeDescriptor::Union(name.clone())
            } else {
                TypeDescriptor::Struct(name.clone())
            };
            table.register(name, Arc::new(descriptor))?;
        }
        for decl in &decls.exceptions {
            let name = table.scoped(&decl.name);
            table.register(name.clone(), Arc::new(TypeDescriptor::Struct(name)))?;
        }

        // Typedefs resolve in declaration order: a typedef may target any
        // declared type and any typedef declared before it.
        for decl in &decls.typedefs {
            let name = table.scoped(&decl.name);
            let underlying = table.intern(&decl.target, imports, &name)?;
            table.register(
                name.clone(),
                Arc::new(TypeDescriptor::Typedef { name, underlying }),
            )?;
        }

        // Intern everything the field and function lists mention, so the
        // declaration collections can link without resolving names again.
        for decl in decls.structs.iter().chain(decls.exceptions.iter()) {
            let owner = table.scoped(&decl.name);
            for field in &decl.fields {
                table.intern(&field.ty, imports, &owner)?;
            }
        }
        for decl in &decls.services {
            let owner = table.scoped(&decl.name);
            for function in &decl.functions {
                match &function.return_type {
                    Some(ty) => {
                        table.intern(ty, imports, &owner)?;
                    }
                    None => {
                        table.intern_primitive(PrimitiveKind::Void);
                    }
                }
                for field in function.arguments.iter().chain(function.exceptions.iter()) {
                    table.intern(&field.ty, imports, &owner)?;
                }
            }
        }

        Ok(table)
    }

    /// Resolves a linked reference against the finished table. Intended
    /// for the declaration-collection build, which runs strictly after
    /// [`Self::build`] has interned every reference it will ask for.
    pub(crate) fn lookup_ref(
        &self,
        ty: &TypeRef,
        context: &QualifiedName,
    ) -> Result<Arc<TypeDescriptor>, LinkError> {
        match ty {
            TypeRef::Primitive(kind) => Ok(builtins::primitive(*kind)),
            TypeRef::Named(name) => self.lookup_named(name, context),
            TypeRef::List(element) => {
                let element = self.lookup_ref(element, context)?;
                self.lookup_structural(TypeDescriptor::List(element), context)
            }
            TypeRef::Set(element) => {
                let element = self.lookup_ref(element, context)?;
                self.lookup_structural(TypeDescriptor::Set(element), context)
            }
            TypeRef::Map(key, value) => {
                let key = self.lookup_ref(key, context)?;
                let value = self.lookup_ref(value, context)?;
                self.lookup_structural(TypeDescriptor::Map(key, value), context)
            }
        }
    }

    fn scoped(&self, name: &str) -> QualifiedName {
        QualifiedName::scoped(&self.module, name)
    }

    fn register(
        &mut self,
        name: QualifiedName,
        descriptor: Arc<TypeDescriptor>,
    ) -> Result<(), LinkError> {
        match self.entries.insert(name.clone(), descriptor) {
            Some(_) => Err(LinkError::DuplicateDeclaration { name }),
            None => Ok(()),
        }
    }

    fn intern(
        &mut self,
        ty: &TypeRef,
        imports: &[Arc<SchemaModule>],
        context: &QualifiedName,
    ) -> Result<Arc<TypeDescriptor>, LinkError> {
        match ty {
            TypeRef::Primitive(kind) => Ok(self.intern_primitive(*kind)),
            TypeRef::Named(name) => self.intern_named(name, imports, context),
            TypeRef::List(element) => {
                let element = self.intern(element, imports, context)?;
                Ok(self.intern_structural(TypeDescriptor::List(element)))
            }
            TypeRef::Set(element) => {
                let element = self.intern(element, imports, context)?;
                Ok(self.intern_structural(TypeDescriptor::Set(element)))
            }
            TypeRef::Map(key, value) => {
                let key = self.intern(key, imports, context)?;
                let value = self.intern(value, imports, context)?;
                Ok(self.intern_structural(TypeDescriptor::Map(key, value)))
            }
        }
    }

    fn intern_primitive(&mut self, kind: PrimitiveKind) -> Arc<TypeDescriptor> {
        let descriptor = builtins::primitive(kind);
        self.entries
            .entry(QualifiedName::unscoped(kind.keyword()))
            .or_insert_with(|| Arc::clone(&descriptor));
        descriptor
    }

    fn intern_structural(&mut self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let name = descriptor.canonical_name();
        Arc::clone(
            self.entries
                .entry(name)
                .or_insert_with(|| Arc::new(descriptor)),
        )
    }

    fn intern_named(
        &mut self,
        name: &QualifiedName,
        imports: &[Arc<SchemaModule>],
        context: &QualifiedName,
    ) -> Result<Arc<TypeDescriptor>, LinkError> {
        match name.module.as_deref() {
            // Unscoped names refer to this module's own declarations or
            // to a primitive keyword.
            None => {
                let scoped = self.scoped(&name.name);
                if let Some(found) = self.entries.get(&scoped) {
                    return Ok(Arc::clone(found));
                }
                if let Some(kind) = PrimitiveKind::from_keyword(&name.name) {
                    return Ok(self.intern_primitive(kind));
                }
            }
            Some(module) if module == self.module => {
                if let Some(found) = self.entries.get(name) {
                    return Ok(Arc::clone(found));
                }
            }
            Some(module) => {
                if let Some(cached) = self.externals.get(name) {
                    return Ok(Arc::clone(cached));
                }
                let found = imports
                    .iter()
                    .find(|import| import.name() == module)
                    .and_then(|import| import.resolve(name));
                if let Some(found) = found {
                    self.externals.insert(name.clone(), Arc::clone(&found));
                    return Ok(found);
                }
            }
        }
        Err(LinkError::UnresolvedType {
            reference: name.clone(),
            context: context.clone(),
        })
    }

    fn lookup_named(
        &self,
        name: &QualifiedName,
        context: &QualifiedName,
    ) -> Result<Arc<TypeDescriptor>, LinkError> {
        let found = match name.module.as_deref() {
            None => self
                .entries
                .get(&self.scoped(&name.name))
                .map(Arc::clone)
                .or_else(|| builtins::by_keyword(&name.name)),
            Some(module) if module == self.module => self.entries.get(name).map(Arc::clone),
            Some(_) => self.externals.get(name).map(Arc::clone),
        };
        found.ok_or_else(|| LinkError::UnresolvedType {
            reference: name.clone(),
            context: context.clone(),
        })
    }

    fn lookup_structural(
        &self,
        descriptor: TypeDescriptor,
        context: &QualifiedName,
    ) -> Result<Arc<TypeDescriptor>, LinkError> {
        let name = descriptor.canonical_name();
        self.entries
            .get(&name)
            .map(Arc::clone)
            .ok_or_else(|| LinkError::UnresolvedType {
                reference: name,
                context: context.clone(),
            })
    }
}
