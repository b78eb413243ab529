// src/compiler.rs
//! Compilation orchestration.
//!
//! Assembles the resolver stack from the compilation units, the classpath
//! archives (in declaration order, which becomes the shadowing order), and
//! the reflective catalog; runs validation; and produces one emission plan
//! per top-level type. The bytecode emitter consuming the plans is an
//! external collaborator.

use std::path::PathBuf;
use std::rc::Rc;

use thiserror::Error;

use crate::ast::{CompilationUnit, TopLevelNode};
use crate::definitions::{InternalConstructorDefinition, InternalMethodDefinition};
use crate::errors::{ArchiveError, InternalError, SemanticError};
use crate::resolvers::{
    ComposedSymbolResolver, InSourceSymbolResolver, JarTypeResolver, LookupContext,
    ReflectionSymbolResolver, SymbolResolver,
};
use crate::validation::{CallResolutions, ValidationResult, Validator};

/// Driver-facing configuration.
#[derive(Debug, Default, Clone)]
pub struct CompilerOptions {
    /// Archive paths, opened as providers in declaration order.
    pub classpath: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("compilation failed with {} semantic error(s)", .0.len())]
    Semantic(Vec<SemanticError>),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// Everything the emitter needs for one top-level type.
#[derive(Debug)]
pub struct EmissionPlan {
    pub internal_name: String,
    pub superclass_internal_name: String,
    pub interface_internal_names: Vec<String>,
    pub methods: Vec<InternalMethodDefinition>,
    pub constructors: Vec<InternalConstructorDefinition>,
}

/// The front end's output: per-type plans plus the call-site descriptor
/// table.
#[derive(Debug)]
pub struct CompilationOutput {
    pub types: Vec<EmissionPlan>,
    pub resolutions: CallResolutions,
}

pub struct Compiler {
    units: Vec<Rc<CompilationUnit>>,
    resolver: Rc<ComposedSymbolResolver>,
}

impl Compiler {
    /// Build the resolver stack. Fails only when an archive cannot be
    /// opened.
    pub fn new(units: Vec<CompilationUnit>, options: CompilerOptions) -> Result<Self, ArchiveError> {
        let units: Vec<Rc<CompilationUnit>> = units.into_iter().map(Rc::new).collect();

        let mut elements: Vec<Rc<dyn SymbolResolver>> =
            vec![Rc::new(InSourceSymbolResolver::new(units.clone()))];
        for path in &options.classpath {
            elements.push(Rc::new(JarTypeResolver::open(path)?));
        }
        elements.push(Rc::new(ReflectionSymbolResolver::new()));

        Ok(Self {
            units,
            resolver: ComposedSymbolResolver::new(elements),
        })
    }

    /// The composed resolver, for callers that need ad-hoc lookups.
    pub fn resolver(&self) -> Rc<dyn SymbolResolver> {
        self.resolver.clone()
    }

    /// Validate every unit. All diagnostics are collected before failing.
    pub fn validate(&self) -> ValidationResult {
        let mut validator = Validator::new(self.resolver());
        for unit in &self.units {
            validator.validate_unit(unit);
        }
        validator.finish()
    }

    /// Validate and, on success, produce the emission plans.
    pub fn compile(&self) -> Result<CompilationOutput, CompileError> {
        let result = self.validate();
        if !result.is_ok() {
            return Err(CompileError::Semantic(result.errors));
        }

        let resolver = self.resolver();
        let mut types = Vec::new();
        for unit in &self.units {
            for node in &unit.nodes {
                let TopLevelNode::Type(decl) = node else {
                    continue;
                };
                types.push(self.plan_for(unit.qualify(&decl.name), resolver.as_ref())?);
            }
        }

        Ok(CompilationOutput {
            types,
            resolutions: result.resolutions,
        })
    }

    fn plan_for(
        &self,
        qualified_name: String,
        resolver: &dyn SymbolResolver,
    ) -> Result<EmissionPlan, CompileError> {
        let definition = resolver
            .find_type_definition(&qualified_name, LookupContext::none())
            .ok_or_else(|| {
                InternalError::new(format!(
                    "validated type '{}' disappeared from the resolver",
                    qualified_name
                ))
            })?;
        let source = definition.as_source().ok_or_else(|| {
            InternalError::new(format!(
                "top-level type '{}' is not source-defined",
                qualified_name
            ))
        })?;

        let superclass_internal_name = definition
            .superclass(resolver)
            .map(|superclass| superclass.internal_name())
            .unwrap_or_else(|| "java/lang/Object".to_string());

        let namespace_ctx = LookupContext::in_namespace(crate::jvm::package_of(&qualified_name));
        let interface_internal_names = source
            .declaration()
            .interfaces
            .iter()
            .filter_map(|interface| {
                crate::typesystem::resolve_type_expr(interface, resolver, namespace_ctx)
            })
            .filter_map(|usage| {
                usage
                    .as_reference()
                    .map(|r| crate::jvm::canonical_to_internal(r.qualified_name()))
            })
            .collect();

        let methods = source
            .methods(resolver)
            .map_err(|e| InternalError::new(e.to_string()))?;
        let constructors = source
            .constructors(resolver)
            .map_err(|e| InternalError::new(e.to_string()))?
            .to_vec();

        Ok(EmissionPlan {
            internal_name: definition.internal_name(),
            superclass_internal_name,
            interface_internal_names,
            methods,
            constructors,
        })
    }
}
