// src/definitions/source.rs
//! Source-defined type definitions.
//!
//! The semantic view over a `TypeDecl`. Constructor and method tables are
//! lazily materialized on first query and memoized; once built they are
//! immutable for the rest of the compilation.

use std::cell::OnceCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::ast::{CompilationUnit, ConstructorDecl, TypeDecl, TypeExpr};
use crate::definitions::internal::{
    ActualArgument, FormalParameter, InternalConstructorDefinition, InternalMethodDefinition,
    parameters_descriptor, resolve_constructor_call, verify_order,
};
use crate::definitions::property::Property;
use crate::definitions::{CallError, DefinitionError, TypeDefinition};
use crate::errors::InternalError;
use crate::jvm::{
    JvmConstructorDescriptor, JvmMethodDescriptor, JvmType, canonical_to_internal,
};
use crate::resolvers::{LookupContext, SymbolResolver};
use crate::typesystem::{self, ReferenceTypeUsage, TypeUsage, resolve_type_expr};

type MethodIndex = FxHashMap<String, Vec<InternalMethodDefinition>>;

/// A type defined in the current compilation.
#[derive(Debug)]
pub struct SourceTypeDefinition {
    unit: Rc<CompilationUnit>,
    type_name: String,
    qualified_name: String,
    constructors: OnceCell<Result<Vec<InternalConstructorDefinition>, DefinitionError>>,
    methods: OnceCell<Result<MethodIndex, DefinitionError>>,
}

impl SourceTypeDefinition {
    pub fn new(unit: Rc<CompilationUnit>, type_name: &str) -> Self {
        let qualified_name = unit.qualify(type_name);
        Self {
            unit,
            type_name: type_name.to_string(),
            qualified_name,
            constructors: OnceCell::new(),
            methods: OnceCell::new(),
        }
    }

    fn decl(&self) -> &TypeDecl {
        self.unit
            .top_type(&self.type_name)
            .expect("source type definition built from a declaration in its unit")
    }

    fn ctx(&self) -> LookupContext<'_> {
        LookupContext::in_namespace(&self.unit.namespace.name)
    }

    pub fn declaration(&self) -> &TypeDecl {
        self.decl()
    }

    pub fn simple_name(&self) -> &str {
        &self.type_name
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn internal_name(&self) -> String {
        canonical_to_internal(&self.qualified_name)
    }

    pub fn is_class(&self) -> bool {
        true
    }

    pub fn is_interface(&self) -> bool {
        false
    }

    pub fn defines_explicit_constructor(&self) -> bool {
        self.decl().explicit_constructors().next().is_some()
    }

    /// Direct properties: declared property definitions plus resolved
    /// property references, in member order.
    pub fn direct_properties(
        &self,
        resolver: &dyn SymbolResolver,
    ) -> Result<Vec<Property>, DefinitionError> {
        use crate::ast::TypeMember;

        let mut properties = Vec::new();
        for member in &self.decl().members {
            match member {
                TypeMember::Property(decl) => {
                    let property = Property::from_declaration(decl, resolver, self.ctx())
                        .ok_or_else(|| DefinitionError::UnresolvedType {
                            name: decl.ty.display_name(),
                        })?;
                    properties.push(property);
                }
                TypeMember::PropertyReference(reference) => {
                    let property = Property::from_reference(reference, resolver, self.ctx())
                        .ok_or_else(|| DefinitionError::UnresolvedType {
                            name: reference.name.clone(),
                        })?;
                    properties.push(property);
                }
                TypeMember::Method(_) | TypeMember::Constructor(_) => {}
            }
        }
        Ok(properties)
    }

    /// Properties that can be supplied at construction: the ones without
    /// an initializer. Properties with initializers are fixed in place and
    /// never appear in the synthesized constructor.
    pub fn assignable_properties(
        &self,
        resolver: &dyn SymbolResolver,
    ) -> Result<Vec<Property>, DefinitionError> {
        Ok(self
            .direct_properties(resolver)?
            .into_iter()
            .filter(|p| !p.has_initial_value())
            .collect())
    }

    pub fn has_default_properties(
        &self,
        resolver: &dyn SymbolResolver,
    ) -> Result<bool, DefinitionError> {
        Ok(self
            .direct_properties(resolver)?
            .iter()
            .any(Property::has_default_value))
    }

    /// The constructor table, built on first use.
    pub fn constructors(
        &self,
        resolver: &dyn SymbolResolver,
    ) -> Result<&[InternalConstructorDefinition], DefinitionError> {
        let cell = self
            .constructors
            .get_or_init(|| self.initialize_constructors(resolver));
        match cell {
            Ok(constructors) => Ok(constructors),
            Err(e) => Err(e.clone()),
        }
    }

    fn initialize_constructors(
        &self,
        resolver: &dyn SymbolResolver,
    ) -> Result<Vec<InternalConstructorDefinition>, DefinitionError> {
        tracing::trace!(type_name = %self.qualified_name, "initializing constructors");
        let explicit: Vec<&ConstructorDecl> = self.decl().explicit_constructors().collect();
        match explicit.len() {
            0 => Ok(vec![self.synthesize_implicit_constructor(resolver)?]),
            1 => Ok(vec![self.build_explicit_constructor(explicit[0], resolver)?]),
            _ => Err(DefinitionError::MultipleExplicitConstructors {
                type_name: self.qualified_name.clone(),
            }),
        }
    }

    /// Implicit constructor: the base type's sole constructor parameters,
    /// then the assignable properties, stably sorted so that parameters
    /// without defaults come first.
    fn synthesize_implicit_constructor(
        &self,
        resolver: &dyn SymbolResolver,
    ) -> Result<InternalConstructorDefinition, DefinitionError> {
        let mut params: Vec<FormalParameter> = Vec::new();

        if let Some(base_expr) = &self.decl().base_type {
            let base_name = self.base_type_name(base_expr, resolver)?;
            let base = resolver
                .find_type_definition(&base_name, self.ctx())
                .ok_or_else(|| DefinitionError::UnresolvedType {
                    name: base_name.clone(),
                })?;
            let base_constructors = base.constructors(resolver)?;
            if base_constructors.len() != 1 {
                return Err(DefinitionError::UnsupportedInheritance {
                    type_name: self.qualified_name.clone(),
                    base: base_name,
                });
            }
            params.extend(base_constructors[0].formal_parameters().iter().cloned());
        }

        for property in self.assignable_properties(resolver)? {
            params.push(property.to_formal_parameter());
        }

        // Stable: programmer-visible order is preserved within each group.
        params.sort_by_key(FormalParameter::has_default_value);

        self.constructor_from_params(params)
    }

    fn build_explicit_constructor(
        &self,
        decl: &ConstructorDecl,
        resolver: &dyn SymbolResolver,
    ) -> Result<InternalConstructorDefinition, DefinitionError> {
        let mut params = Vec::with_capacity(decl.params.len());
        for param in &decl.params {
            let ty = resolve_type_expr(&param.ty, resolver, self.ctx()).ok_or_else(|| {
                DefinitionError::UnresolvedType {
                    name: param.ty.display_name(),
                }
            })?;
            params.push(FormalParameter {
                name: param.name.clone(),
                ty,
                has_default: param.default_value.is_some(),
            });
        }
        self.constructor_from_params(params)
    }

    fn constructor_from_params(
        &self,
        params: Vec<FormalParameter>,
    ) -> Result<InternalConstructorDefinition, DefinitionError> {
        let descriptor = format!("{}V", parameters_descriptor(&params)?);
        Ok(InternalConstructorDefinition::new(
            ReferenceTypeUsage::new(self.qualified_name.clone()),
            params,
            JvmConstructorDescriptor::new(self.internal_name(), descriptor),
        ))
    }

    fn base_type_name(
        &self,
        base_expr: &TypeExpr,
        resolver: &dyn SymbolResolver,
    ) -> Result<String, DefinitionError> {
        let usage = resolve_type_expr(base_expr, resolver, self.ctx()).ok_or_else(|| {
            DefinitionError::UnresolvedType {
                name: base_expr.display_name(),
            }
        })?;
        match usage.as_reference() {
            Some(reference) => Ok(reference.qualified_name().to_string()),
            None => Err(DefinitionError::UnsupportedInheritance {
                type_name: self.qualified_name.clone(),
                base: base_expr.display_name(),
            }),
        }
    }

    /// The name-keyed method table, built on first use: a getter and a
    /// setter per direct property, plus the directly declared methods.
    fn methods_by_name(
        &self,
        resolver: &dyn SymbolResolver,
    ) -> Result<&MethodIndex, DefinitionError> {
        let cell = self.methods.get_or_init(|| self.initialize_methods(resolver));
        match cell {
            Ok(index) => Ok(index),
            Err(e) => Err(e.clone()),
        }
    }

    fn initialize_methods(
        &self,
        resolver: &dyn SymbolResolver,
    ) -> Result<MethodIndex, DefinitionError> {
        tracing::trace!(type_name = %self.qualified_name, "initializing methods");
        let internal_name = self.internal_name();
        let mut index = MethodIndex::default();

        for property in self.direct_properties(resolver)? {
            let jvm = property.type_usage().jvm_type().ok_or_else(|| {
                DefinitionError::MissingJvmType {
                    name: property.name().to_string(),
                }
            })?;

            let getter = InternalMethodDefinition::new(
                property.getter_name(),
                Vec::new(),
                property.type_usage().clone(),
                JvmMethodDescriptor::new(
                    internal_name.clone(),
                    property.getter_name(),
                    format!("(){}", jvm.signature()),
                    false,
                    false,
                ),
            );
            self.register_method(&mut index, getter)?;

            let setter = InternalMethodDefinition::new(
                property.setter_name(),
                vec![FormalParameter::new(
                    property.name(),
                    property.type_usage().clone(),
                )],
                TypeUsage::Void,
                JvmMethodDescriptor::new(
                    internal_name.clone(),
                    property.setter_name(),
                    format!("({})V", jvm.signature()),
                    false,
                    false,
                ),
            );
            self.register_method(&mut index, setter)?;
        }

        for method_decl in self.decl().direct_methods() {
            let mut params = Vec::with_capacity(method_decl.params.len());
            for param in &method_decl.params {
                let ty = resolve_type_expr(&param.ty, resolver, self.ctx()).ok_or_else(|| {
                    DefinitionError::UnresolvedType {
                        name: param.ty.display_name(),
                    }
                })?;
                params.push(FormalParameter {
                    name: param.name.clone(),
                    ty,
                    has_default: param.default_value.is_some(),
                });
            }
            let return_type = resolve_type_expr(&method_decl.return_type, resolver, self.ctx())
                .ok_or_else(|| DefinitionError::UnresolvedType {
                    name: method_decl.return_type.display_name(),
                })?;
            let return_jvm =
                return_type
                    .jvm_type()
                    .ok_or_else(|| DefinitionError::MissingJvmType {
                        name: method_decl.name.clone(),
                    })?;
            let descriptor = format!(
                "{}{}",
                parameters_descriptor(&params)?,
                return_jvm.signature()
            );

            let method = InternalMethodDefinition::new(
                method_decl.name.clone(),
                params,
                return_type,
                JvmMethodDescriptor::new(
                    internal_name.clone(),
                    method_decl.name.clone(),
                    descriptor,
                    false,
                    false,
                ),
            );
            self.register_method(&mut index, method)?;
        }

        Ok(index)
    }

    fn register_method(
        &self,
        index: &mut MethodIndex,
        method: InternalMethodDefinition,
    ) -> Result<(), DefinitionError> {
        let bucket = index.entry(method.name().to_string()).or_default();
        if !bucket.is_empty() {
            return Err(DefinitionError::DuplicateMethod {
                type_name: self.qualified_name.clone(),
                name: method.name().to_string(),
            });
        }
        bucket.push(method);
        Ok(())
    }

    /// All materialized methods, for the emitter.
    pub fn methods(
        &self,
        resolver: &dyn SymbolResolver,
    ) -> Result<Vec<InternalMethodDefinition>, DefinitionError> {
        Ok(self
            .methods_by_name(resolver)?
            .values()
            .flatten()
            .cloned()
            .collect())
    }

    /// At most one candidate exists per name in a source type.
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
        let index = self.methods_by_name(resolver).map_err(CallError::Definition)?;
        let Some(candidates) = index.get(name) else {
            return Ok(None);
        };
        Ok(candidates
            .iter()
            .filter(|m| m.is_static() == static_context)
            .find(|m| m.matches(args, resolver))
            .cloned())
    }

    pub fn find_method_by_descriptors(
        &self,
        name: &str,
        jvm_types: &[JvmType],
        static_context: bool,
        resolver: &dyn SymbolResolver,
    ) -> Result<JvmMethodDescriptor, InternalError> {
        let index = self.methods_by_name(resolver).map_err(|e| {
            InternalError::new(format!(
                "descriptor lookup on uninitializable type '{}': {}",
                self.qualified_name, e
            ))
        })?;
        let candidates = index.get(name).ok_or_else(|| {
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
                    "method '{}.{}' does not match the given descriptors",
                    self.qualified_name, name
                ))
            })
    }

    pub fn resolve_constructor_call(
        &self,
        args: &[ActualArgument],
        resolver: &dyn SymbolResolver,
    ) -> Result<JvmConstructorDescriptor, CallError> {
        let constructors = self
            .constructors(resolver)
            .map_err(CallError::Definition)?;
        resolve_constructor_call(&self.qualified_name, constructors, args, resolver)
    }

    pub fn find_constructor(
        &self,
        args: &[ActualArgument],
        resolver: &dyn SymbolResolver,
    ) -> Result<Option<InternalConstructorDefinition>, CallError> {
        if !verify_order(args) {
            return Err(CallError::IllOrderedParameters);
        }
        let constructors = self
            .constructors(resolver)
            .map_err(CallError::Definition)?;
        Ok(constructors
            .iter()
            .find(|c| c.matches(args, resolver))
            .cloned())
    }

    pub fn field_type(
        &self,
        name: &str,
        _static_context: bool,
        resolver: &dyn SymbolResolver,
    ) -> Option<TypeUsage> {
        self.direct_properties(resolver)
            .ok()?
            .into_iter()
            .find(|p| p.name() == name)
            .map(|p| p.type_usage().clone())
    }

    pub fn can_field_be_assigned(&self, _name: &str) -> bool {
        true
    }

    pub fn find_symbol(&self, name: &str, resolver: &dyn SymbolResolver) -> Option<Property> {
        self.direct_properties(resolver)
            .ok()?
            .into_iter()
            .find(|p| p.name() == name)
    }

    /// Transitive ancestors, the declared base first. Without an explicit
    /// base the chain is just the platform root object type.
    pub fn ancestors(&self, resolver: &dyn SymbolResolver) -> Vec<ReferenceTypeUsage> {
        if let Some(base_expr) = &self.decl().base_type
            && let Ok(base_name) = self.base_type_name(base_expr, resolver)
        {
            let mut out = vec![ReferenceTypeUsage::new(base_name.clone())];
            if let Some(base) = resolver.find_type_definition(&base_name, self.ctx()) {
                out.extend(base.ancestors(resolver));
            }
            return out;
        }
        vec![ReferenceTypeUsage::object()]
    }

    /// The declared base type's definition, or the platform root object.
    pub fn superclass(&self, resolver: &dyn SymbolResolver) -> Option<Rc<TypeDefinition>> {
        if let Some(base_expr) = &self.decl().base_type
            && let Ok(base_name) = self.base_type_name(base_expr, resolver)
        {
            return resolver.find_type_definition(&base_name, self.ctx());
        }
        resolver.find_type_definition(typesystem::OBJECT, LookupContext::none())
    }

    /// Does the type redeclare `toString(): string`?
    pub fn defines_to_string(&self, resolver: &dyn SymbolResolver) -> bool {
        self.is_defining_method("toString", &[], resolver)
    }

    /// Does the type redeclare `hashCode(): int`?
    pub fn defines_hash_code(&self, resolver: &dyn SymbolResolver) -> bool {
        self.is_defining_method("hashCode", &[], resolver)
    }

    /// Does the type redeclare `equals(java.lang.Object): boolean`?
    pub fn defines_equals(&self, resolver: &dyn SymbolResolver) -> bool {
        self.is_defining_method("equals", &[JvmType::object("java/lang/Object")], resolver)
    }

    /// A direct method matches iff name and parameter JVM descriptors
    /// match exactly.
    fn is_defining_method(
        &self,
        name: &str,
        param_types: &[JvmType],
        resolver: &dyn SymbolResolver,
    ) -> bool {
        self.decl()
            .direct_methods()
            .filter(|m| m.name == name)
            .any(|m| {
                let declared: Option<Vec<JvmType>> = m
                    .params
                    .iter()
                    .map(|p| {
                        resolve_type_expr(&p.ty, resolver, self.ctx()).and_then(|t| t.jvm_type())
                    })
                    .collect();
                declared.as_deref() == Some(param_types)
            })
    }
}
