// src/resolvers/jar.rs
//! Resolves types out of jar archives on the classpath.
//!
//! A jar is a zip container of compiled class resources. Opening the
//! container may block on I/O and fails with `MalformedArchive`; once
//! open, entry names are indexed and lookups decode class metadata on
//! demand, memoized per qualified name.

use std::cell::RefCell;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use zip::ZipArchive;

use crate::ast::{PropertyDecl, PropertyRef};
use crate::classfile::ClassFile;
use crate::definitions::{ExternalTypeDefinition, TypeDefinition};
use crate::errors::ArchiveError;
use crate::jvm::{JvmMethodDescriptor, canonical_to_internal, internal_to_canonical};
use crate::resolvers::{CallQuery, LookupContext, ParentLink, SymbolInfo, SymbolResolver};
use crate::typesystem::TypeUsage;

pub struct JarTypeResolver {
    path: PathBuf,
    archive: RefCell<ZipArchive<File>>,
    packages: Vec<String>,
    cache: RefCell<FxHashMap<String, Option<Rc<TypeDefinition>>>>,
    parent: ParentLink,
}

impl JarTypeResolver {
    /// Open a jar. Fails with `MalformedArchive` when the container
    /// cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let path = path.as_ref().to_path_buf();
        let file =
            File::open(&path).map_err(|e| ArchiveError::malformed(path.clone(), e))?;
        let archive =
            ZipArchive::new(file).map_err(|e| ArchiveError::malformed(path.clone(), e))?;

        let packages: Vec<String> = {
            let mut seen: Vec<String> = Vec::new();
            for entry in archive.file_names() {
                let Some(internal) = entry.strip_suffix(".class") else {
                    continue;
                };
                let package = internal_to_canonical(package_of_internal(internal));
                if !package.is_empty() && !seen.contains(&package) {
                    seen.push(package);
                }
            }
            seen
        };

        tracing::debug!(path = %path.display(), packages = packages.len(), "opened archive");
        Ok(Self {
            path,
            archive: RefCell::new(archive),
            packages,
            cache: RefCell::new(FxHashMap::default()),
            parent: ParentLink::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lookup(&self, name: &str) -> Option<Rc<TypeDefinition>> {
        if let Some(cached) = self.cache.borrow().get(name) {
            return cached.clone();
        }
        let built = self.read_definition(name);
        self.cache
            .borrow_mut()
            .insert(name.to_string(), built.clone());
        built
    }

    fn read_definition(&self, name: &str) -> Option<Rc<TypeDefinition>> {
        let entry_name = format!("{}.class", canonical_to_internal(name));
        let mut archive = self.archive.borrow_mut();
        let mut entry = archive.by_name(&entry_name).ok()?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        if let Err(error) = entry.read_to_end(&mut bytes) {
            tracing::warn!(%entry_name, %error, "failed to read archive entry");
            return None;
        }
        drop(entry);

        let class = match ClassFile::parse(&bytes) {
            Ok(class) => class,
            Err(error) => {
                tracing::warn!(%entry_name, %error, "undecodable class resource");
                return None;
            }
        };
        match ExternalTypeDefinition::from_class_file(&class) {
            Ok(definition) => Some(Rc::new(TypeDefinition::Archive(definition))),
            Err(error) => {
                tracing::warn!(%entry_name, %error, "malformed descriptor in class resource");
                None
            }
        }
    }
}

fn package_of_internal(internal: &str) -> &str {
    match internal.rfind('/') {
        Some(idx) => &internal[..idx],
        None => "",
    }
}

impl SymbolResolver for JarTypeResolver {
    fn find_definition(&self, _reference: &PropertyRef) -> Option<PropertyDecl> {
        None
    }

    fn find_type_definition(
        &self,
        name: &str,
        _ctx: LookupContext<'_>,
    ) -> Option<Rc<TypeDefinition>> {
        self.lookup(name)
    }

    fn find_type_usage(&self, name: &str, _ctx: LookupContext<'_>) -> Option<TypeUsage> {
        self.lookup(name)
            .map(|definition| TypeUsage::reference(definition.qualified_name()))
    }

    fn find_jvm_definition(&self, call: &CallQuery) -> Option<JvmMethodDescriptor> {
        let definition = self.lookup(&call.type_name)?;
        definition
            .find_method_by_descriptors(
                &call.method_name,
                &call.argument_types,
                call.static_context,
                self,
            )
            .ok()
    }

    fn find_symbol(&self, _name: &str, _ctx: LookupContext<'_>) -> Option<SymbolInfo> {
        None
    }

    fn has_package(&self, name: &str) -> bool {
        self.packages
            .iter()
            .any(|p| p == name || p.starts_with(&format!("{}.", name)))
    }

    fn parent(&self) -> Option<Rc<dyn SymbolResolver>> {
        self.parent.get()
    }

    fn set_parent(&self, parent: &Rc<dyn SymbolResolver>) {
        self.parent.set(parent);
    }
}
