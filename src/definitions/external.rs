// src/definitions/external.rs
//! Type definitions loaded from outside the compilation unit.
//!
//! Both the reflective catalog and archive class files reduce to the same
//! shape: a qualified name, a kind, member descriptors, and supertype
//! names. Members are eager; there is nothing lazy to compute once the
//! descriptors are known. Unlike source-defined types, external types may
//! overload methods.

use rustc_hash::FxHashMap;

use crate::classfile::{ClassFile, MemberInfo};
use crate::definitions::internal::{
    ActualArgument, FormalParameter, InternalConstructorDefinition, InternalMethodDefinition,
    resolve_constructor_call, verify_order,
};
use crate::definitions::property::Property;
use crate::definitions::CallError;
use crate::errors::InternalError;
use crate::jvm::{
    JvmConstructorDescriptor, JvmMethodDescriptor, JvmType, canonical_to_internal,
    internal_to_canonical, parse_method_descriptor,
};
use crate::jvm::types::DescriptorError;
use crate::resolvers::{LookupContext, SymbolResolver};
use crate::typesystem::{ReferenceTypeUsage, TypeUsage};

/// Whether an external type is a class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalTypeKind {
    Class,
    Interface,
}

/// A field of an external type.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalField {
    pub name: String,
    pub ty: TypeUsage,
    pub is_static: bool,
    pub is_final: bool,
}

/// A type definition backed by descriptors rather than source.
#[derive(Debug, Clone)]
pub struct ExternalTypeDefinition {
    qualified_name: String,
    kind: ExternalTypeKind,
    superclass: Option<String>,
    interfaces: Vec<String>,
    constructors: Vec<InternalConstructorDefinition>,
    methods: FxHashMap<String, Vec<InternalMethodDefinition>>,
    fields: Vec<ExternalField>,
}

impl ExternalTypeDefinition {
    /// Build from class-file metadata read out of an archive.
    pub fn from_class_file(class: &ClassFile) -> Result<Self, DescriptorError> {
        let mut builder = ExternalTypeBuilder::new(
            internal_to_canonical(class.this_class()),
            if class.is_interface() {
                ExternalTypeKind::Interface
            } else {
                ExternalTypeKind::Class
            },
        );
        if let Some(superclass) = class.super_class() {
            builder = builder.superclass(internal_to_canonical(superclass));
        }
        for interface in class.interfaces() {
            builder = builder.implements(internal_to_canonical(interface));
        }
        for field in class.fields() {
            builder = builder.field(&field.name, &field.descriptor, field.is_static(), field.is_final());
        }
        for method in class.methods() {
            builder = add_class_file_method(builder, method);
        }
        builder.build()
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn internal_name(&self) -> String {
        canonical_to_internal(&self.qualified_name)
    }

    pub fn is_class(&self) -> bool {
        self.kind == ExternalTypeKind::Class
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ExternalTypeKind::Interface
    }

    pub fn superclass_name(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    pub fn interface_names(&self) -> &[String] {
        &self.interfaces
    }

    pub fn constructors(&self) -> &[InternalConstructorDefinition] {
        &self.constructors
    }

    /// All methods, declaration order within each name bucket.
    pub fn methods(&self) -> impl Iterator<Item = &InternalMethodDefinition> {
        self.methods.values().flatten()
    }

    pub fn fields(&self) -> &[ExternalField] {
        &self.fields
    }

    /// Transitive ancestors: the superclass chain, then implemented
    /// interfaces, each followed by its own ancestors.
    pub fn ancestors(&self, resolver: &dyn SymbolResolver) -> Vec<ReferenceTypeUsage> {
        let mut out: Vec<ReferenceTypeUsage> = Vec::new();
        let mut push = |usage: ReferenceTypeUsage, out: &mut Vec<ReferenceTypeUsage>| {
            if !out.iter().any(|a| a.qualified_name() == usage.qualified_name()) {
                out.push(usage);
            }
        };
        for name in self.superclass.iter().chain(self.interfaces.iter()) {
            push(ReferenceTypeUsage::new(name.clone()), &mut out);
            if let Some(definition) = resolver.find_type_definition(name, LookupContext::none()) {
                for ancestor in definition.ancestors(resolver) {
                    push(ancestor, &mut out);
                }
            }
        }
        out
    }

    /// First candidate that matches the actual arguments. External types
    /// may overload, so every candidate with the right name and dispatch
    /// is examined in order.
    pub fn find_method(
        &self,
        name: &str,
        args: &[ActualArgument],
        static_context: bool,
        resolver: &dyn SymbolResolver,
    ) -> Result<Option<InternalMethodDefinition>, CallError> {
        if !verify_order(args) {
            return Err(CallError::IllOrderedParameters);
        }
        let Some(candidates) = self.methods.get(name) else {
            return Ok(None);
        };
        Ok(candidates
            .iter()
            .filter(|m| m.is_static() == static_context)
            .find(|m| m.matches(args, resolver))
            .cloned())
    }

    /// Descriptor-keyed lookup used by the emitter after type checking.
    pub fn find_method_by_descriptors(
        &self,
        name: &str,
        jvm_types: &[JvmType],
        static_context: bool,
    ) -> Result<JvmMethodDescriptor, InternalError> {
        let candidates = self.methods.get(name).ok_or_else(|| {
            InternalError::new(format!(
                "no method '{}' on '{}'",
                name, self.qualified_name
            ))
        })?;
        candidates
            .iter()
            .filter(|m| m.is_static() == static_context)
            .find(|m| m.matches_jvm_types(jvm_types))
            .map(|m| m.jvm_descriptor().clone())
            .ok_or_else(|| {
                InternalError::new(format!(
                    "no overload of '{}.{}' matches the given descriptors",
                    self.qualified_name, name
                ))
            })
    }

    pub fn resolve_constructor_call(
        &self,
        args: &[ActualArgument],
        resolver: &dyn SymbolResolver,
    ) -> Result<JvmConstructorDescriptor, CallError> {
        resolve_constructor_call(&self.qualified_name, &self.constructors, args, resolver)
    }

    pub fn find_constructor(
        &self,
        args: &[ActualArgument],
        resolver: &dyn SymbolResolver,
    ) -> Result<Option<InternalConstructorDefinition>, CallError> {
        if !verify_order(args) {
            return Err(CallError::IllOrderedParameters);
        }
        Ok(self
            .constructors
            .iter()
            .find(|c| c.matches(args, resolver))
            .cloned())
    }

    pub fn field_type(&self, name: &str, static_context: bool) -> Option<TypeUsage> {
        self.fields
            .iter()
            .find(|f| f.name == name && f.is_static == static_context)
            .map(|f| f.ty.clone())
    }

    pub fn can_field_be_assigned(&self, name: &str) -> bool {
        self.fields
            .iter()
            .any(|f| f.name == name && !f.is_final)
    }

    pub fn find_symbol(&self, name: &str) -> Option<Property> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| Property::new(f.name.clone(), f.ty.clone()))
    }
}

fn add_class_file_method(builder: ExternalTypeBuilder, method: &MemberInfo) -> ExternalTypeBuilder {
    match method.name.as_str() {
        "<init>" => builder.constructor(&method.descriptor),
        "<clinit>" => builder,
        _ => builder.method_with_flags(&method.name, &method.descriptor, method.is_static()),
    }
}

/// Builder shared by the reflective catalog and the class-file reader.
#[derive(Debug)]
pub struct ExternalTypeBuilder {
    qualified_name: String,
    kind: ExternalTypeKind,
    superclass: Option<String>,
    interfaces: Vec<String>,
    constructors: Vec<String>,
    methods: Vec<(String, String, bool)>,
    fields: Vec<(String, String, bool, bool)>,
}

impl ExternalTypeBuilder {
    pub fn new(qualified_name: impl Into<String>, kind: ExternalTypeKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
            superclass: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn class(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, ExternalTypeKind::Class)
    }

    pub fn interface(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, ExternalTypeKind::Interface)
    }

    pub fn superclass(mut self, canonical_name: impl Into<String>) -> Self {
        self.superclass = Some(canonical_name.into());
        self
    }

    pub fn implements(mut self, canonical_name: impl Into<String>) -> Self {
        self.interfaces.push(canonical_name.into());
        self
    }

    pub fn constructor(mut self, descriptor: &str) -> Self {
        self.constructors.push(descriptor.to_string());
        self
    }

    pub fn method(self, name: &str, descriptor: &str) -> Self {
        self.method_with_flags(name, descriptor, false)
    }

    pub fn static_method(self, name: &str, descriptor: &str) -> Self {
        self.method_with_flags(name, descriptor, true)
    }

    pub fn method_with_flags(mut self, name: &str, descriptor: &str, is_static: bool) -> Self {
        self.methods.push((name.to_string(), descriptor.to_string(), is_static));
        self
    }

    pub fn field(mut self, name: &str, descriptor: &str, is_static: bool, is_final: bool) -> Self {
        self.fields
            .push((name.to_string(), descriptor.to_string(), is_static, is_final));
        self
    }

    /// Validate every collected descriptor and assemble the definition.
    pub fn build(self) -> Result<ExternalTypeDefinition, DescriptorError> {
        let internal_name = canonical_to_internal(&self.qualified_name);
        let on_interface = self.kind == ExternalTypeKind::Interface;

        let mut constructors = Vec::with_capacity(self.constructors.len());
        for descriptor in &self.constructors {
            let (param_types, _) = parse_method_descriptor(descriptor)?;
            constructors.push(InternalConstructorDefinition::new(
                ReferenceTypeUsage::new(self.qualified_name.clone()),
                descriptor_params(&param_types),
                JvmConstructorDescriptor::new(internal_name.clone(), descriptor.clone()),
            ));
        }

        let mut methods: FxHashMap<String, Vec<InternalMethodDefinition>> = FxHashMap::default();
        for (name, descriptor, is_static) in &self.methods {
            let (param_types, return_type) = parse_method_descriptor(descriptor)?;
            let method = InternalMethodDefinition::new(
                name.clone(),
                descriptor_params(&param_types),
                TypeUsage::from_jvm_type(&return_type),
                JvmMethodDescriptor::new(
                    internal_name.clone(),
                    name.clone(),
                    descriptor.clone(),
                    *is_static,
                    on_interface,
                ),
            );
            methods.entry(name.clone()).or_default().push(method);
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        for (name, descriptor, is_static, is_final) in &self.fields {
            let jvm = JvmType::from_descriptor(descriptor)?;
            fields.push(ExternalField {
                name: name.clone(),
                ty: TypeUsage::from_jvm_type(&jvm),
                is_static: *is_static,
                is_final: *is_final,
            });
        }

        Ok(ExternalTypeDefinition {
            qualified_name: self.qualified_name,
            kind: self.kind,
            superclass: self.superclass,
            interfaces: self.interfaces,
            constructors,
            methods,
            fields,
        })
    }
}

/// External parameters have no source names; they are numbered.
fn descriptor_params(types: &[JvmType]) -> Vec<FormalParameter> {
    types
        .iter()
        .enumerate()
        .map(|(i, t)| FormalParameter::new(format!("arg{}", i), TypeUsage::from_jvm_type(t)))
        .collect()
}
