// src/definitions/mod.rs
//! The type definition model.
//!
//! A `TypeDefinition` is the polymorphic view over a type regardless of
//! origin: defined in source, reified from the reflective catalog, or read
//! out of an archive. The origin is a closed tagged variant; every variant
//! answers the same queries, and the source variant adds lazy constructor
//! synthesis and accessor materialization.

pub mod external;
pub mod internal;
pub mod property;
pub mod source;

pub use external::{ExternalField, ExternalTypeBuilder, ExternalTypeDefinition, ExternalTypeKind};
pub use internal::{
    ActualArgument, FormalParameter, InternalConstructorDefinition, InternalMethodDefinition,
    render_arguments, verify_order,
};
pub use property::Property;
pub use source::SourceTypeDefinition;

use std::rc::Rc;

use thiserror::Error;

use crate::errors::InternalError;
use crate::jvm::{JvmConstructorDescriptor, JvmMethodDescriptor, JvmType};
use crate::resolvers::SymbolResolver;
use crate::typesystem::{ReferenceTypeUsage, TypeUsage};

/// A defect in a type definition itself, surfaced when its members are
/// first materialized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("unresolved type '{name}'")]
    UnresolvedType { name: String },

    #[error("'{type_name}' declares more than one explicit constructor")]
    MultipleExplicitConstructors { type_name: String },

    #[error("'{type_name}' cannot inherit from '{base}': it does not have exactly one constructor")]
    UnsupportedInheritance { type_name: String, base: String },

    #[error("duplicate method '{name}' on '{type_name}'")]
    DuplicateMethod { type_name: String, name: String },

    #[error("'{name}' has no JVM descriptor")]
    MissingJvmType { name: String },
}

/// A call site that does not resolve against the model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("named arguments must all be grouped after the positional ones")]
    IllOrderedParameters,

    #[error("no constructor of '{type_name}' matches ({arguments})")]
    UnresolvedConstructor { type_name: String, arguments: String },

    #[error(transparent)]
    Definition(DefinitionError),
}

/// A type of any origin.
#[derive(Debug)]
pub enum TypeDefinition {
    Source(SourceTypeDefinition),
    Reflective(ExternalTypeDefinition),
    Archive(ExternalTypeDefinition),
}

impl TypeDefinition {
    pub fn as_source(&self) -> Option<&SourceTypeDefinition> {
        match self {
            TypeDefinition::Source(s) => Some(s),
            _ => None,
        }
    }

    /// Canonical qualified name, '.'-separated.
    pub fn qualified_name(&self) -> &str {
        match self {
            TypeDefinition::Source(s) => s.qualified_name(),
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => e.qualified_name(),
        }
    }

    /// Internal name, '/'-separated, as used in descriptors.
    pub fn internal_name(&self) -> String {
        match self {
            TypeDefinition::Source(s) => s.internal_name(),
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => e.internal_name(),
        }
    }

    pub fn is_class(&self) -> bool {
        match self {
            TypeDefinition::Source(s) => s.is_class(),
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => e.is_class(),
        }
    }

    pub fn is_interface(&self) -> bool {
        match self {
            TypeDefinition::Source(s) => s.is_interface(),
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => e.is_interface(),
        }
    }

    /// Transitive ancestor chain. The root is the platform object type
    /// when no explicit base is declared.
    pub fn ancestors(&self, resolver: &dyn SymbolResolver) -> Vec<ReferenceTypeUsage> {
        match self {
            TypeDefinition::Source(s) => s.ancestors(resolver),
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => e.ancestors(resolver),
        }
    }

    /// The superclass definition; None only for the root object type.
    pub fn superclass(&self, resolver: &dyn SymbolResolver) -> Option<Rc<TypeDefinition>> {
        match self {
            TypeDefinition::Source(s) => s.superclass(resolver),
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => {
                let name = e.superclass_name()?;
                resolver.find_type_definition(name, crate::resolvers::LookupContext::none())
            }
        }
    }

    pub fn constructors(
        &self,
        resolver: &dyn SymbolResolver,
    ) -> Result<Vec<InternalConstructorDefinition>, DefinitionError> {
        match self {
            TypeDefinition::Source(s) => s.constructors(resolver).map(<[_]>::to_vec),
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => {
                Ok(e.constructors().to_vec())
            }
        }
    }

    pub fn methods(
        &self,
        resolver: &dyn SymbolResolver,
    ) -> Result<Vec<InternalMethodDefinition>, DefinitionError> {
        match self {
            TypeDefinition::Source(s) => s.methods(resolver),
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => {
                Ok(e.methods().cloned().collect())
            }
        }
    }

    pub fn find_method(
        &self,
        name: &str,
        args: &[ActualArgument],
        static_context: bool,
        resolver: &dyn SymbolResolver,
    ) -> Result<Option<InternalMethodDefinition>, CallError> {
        match self {
            TypeDefinition::Source(s) => s.find_method(name, args, static_context, resolver),
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => {
                e.find_method(name, args, static_context, resolver)
            }
        }
    }

    pub fn find_method_by_descriptors(
        &self,
        name: &str,
        jvm_types: &[JvmType],
        static_context: bool,
        resolver: &dyn SymbolResolver,
    ) -> Result<JvmMethodDescriptor, InternalError> {
        match self {
            TypeDefinition::Source(s) => {
                s.find_method_by_descriptors(name, jvm_types, static_context, resolver)
            }
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => {
                e.find_method_by_descriptors(name, jvm_types, static_context)
            }
        }
    }

    pub fn resolve_constructor_call(
        &self,
        args: &[ActualArgument],
        resolver: &dyn SymbolResolver,
    ) -> Result<JvmConstructorDescriptor, CallError> {
        match self {
            TypeDefinition::Source(s) => s.resolve_constructor_call(args, resolver),
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => {
                e.resolve_constructor_call(args, resolver)
            }
        }
    }

    pub fn find_constructor(
        &self,
        args: &[ActualArgument],
        resolver: &dyn SymbolResolver,
    ) -> Result<Option<InternalConstructorDefinition>, CallError> {
        match self {
            TypeDefinition::Source(s) => s.find_constructor(args, resolver),
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => {
                e.find_constructor(args, resolver)
            }
        }
    }

    pub fn field_type(
        &self,
        name: &str,
        static_context: bool,
        resolver: &dyn SymbolResolver,
    ) -> Option<TypeUsage> {
        match self {
            TypeDefinition::Source(s) => s.field_type(name, static_context, resolver),
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => {
                e.field_type(name, static_context)
            }
        }
    }

    pub fn can_field_be_assigned(&self, name: &str) -> bool {
        match self {
            TypeDefinition::Source(s) => s.can_field_be_assigned(name),
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => {
                e.can_field_be_assigned(name)
            }
        }
    }

    /// Scan properties (or fields) for a named symbol.
    pub fn find_symbol(&self, name: &str, resolver: &dyn SymbolResolver) -> Option<Property> {
        match self {
            TypeDefinition::Source(s) => s.find_symbol(name, resolver),
            TypeDefinition::Reflective(e) | TypeDefinition::Archive(e) => e.find_symbol(name),
        }
    }
}
