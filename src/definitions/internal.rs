// src/definitions/internal.rs
//! Internal method and constructor signatures.
//!
//! These sit between the AST and the emitter: a resolved parameter list on
//! one side, a low-level JVM descriptor on the other. Call-site matching
//! happens here, including the named/defaulted parameter protocol.

use smallvec::SmallVec;

use crate::ast::Span;
use crate::definitions::{CallError, DefinitionError};
use crate::jvm::{JvmConstructorDescriptor, JvmMethodDescriptor, JvmType};
use crate::resolvers::SymbolResolver;
use crate::typesystem::{ReferenceTypeUsage, TypeUsage};

/// A formal parameter of a method or constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct FormalParameter {
    pub name: String,
    pub ty: TypeUsage,
    pub has_default: bool,
}

impl FormalParameter {
    pub fn new(name: impl Into<String>, ty: TypeUsage) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default: false,
        }
    }

    pub fn with_default(name: impl Into<String>, ty: TypeUsage) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default: true,
        }
    }

    pub fn has_default_value(&self) -> bool {
        self.has_default
    }
}

/// An actual argument at a call site: positional, or named.
#[derive(Debug, Clone)]
pub struct ActualArgument {
    pub name: Option<String>,
    pub ty: TypeUsage,
    pub span: Span,
}

impl ActualArgument {
    pub fn positional(ty: TypeUsage) -> Self {
        Self {
            name: None,
            ty,
            span: Span::synthetic(),
        }
    }

    pub fn named(name: impl Into<String>, ty: TypeUsage) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            span: Span::synthetic(),
        }
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

/// All positional arguments must precede all named ones.
pub fn verify_order(args: &[ActualArgument]) -> bool {
    let first_named = args.iter().position(ActualArgument::is_named);
    match first_named {
        Some(idx) => args[idx..].iter().all(ActualArgument::is_named),
        None => true,
    }
}

/// Render an argument list for diagnostics, e.g. `int, y=int`.
pub fn render_arguments(args: &[ActualArgument]) -> String {
    let parts: Vec<String> = args
        .iter()
        .map(|arg| match &arg.name {
            Some(name) => format!("{}={}", name, arg.ty),
            None => arg.ty.to_string(),
        })
        .collect();
    parts.join(", ")
}

/// Bind actual arguments to a parameter list.
///
/// Every parameter without a default must be bound exactly once,
/// positionally or by name; defaulted parameters may stay unbound.
/// Positional excess, unknown names, duplicate bindings, or an argument
/// type that does not widen to the parameter type all reject the
/// candidate. Assumes `verify_order` already passed.
pub(crate) fn arguments_bind(
    params: &[FormalParameter],
    args: &[ActualArgument],
    resolver: &dyn SymbolResolver,
) -> bool {
    let positional_count = args.iter().take_while(|a| !a.is_named()).count();
    if positional_count > params.len() {
        return false;
    }

    let mut bound: SmallVec<[bool; 8]> = SmallVec::from_elem(false, params.len());
    for (i, arg) in args[..positional_count].iter().enumerate() {
        if !arg.ty.is_assignable_to(&params[i].ty, resolver) {
            return false;
        }
        bound[i] = true;
    }

    for arg in &args[positional_count..] {
        let Some(name) = &arg.name else {
            return false;
        };
        let Some(idx) = params.iter().position(|p| &p.name == name) else {
            return false;
        };
        if bound[idx] {
            return false;
        }
        if !arg.ty.is_assignable_to(&params[idx].ty, resolver) {
            return false;
        }
        bound[idx] = true;
    }

    params
        .iter()
        .zip(&bound)
        .all(|(p, b)| *b || p.has_default_value())
}

/// Assemble the parenthesized parameter segment of a descriptor: one
/// signature per non-default parameter, plus a trailing map argument iff
/// any parameter carries a default value.
pub(crate) fn parameters_descriptor(params: &[FormalParameter]) -> Result<String, DefinitionError> {
    let mut signatures = String::new();
    for param in params.iter().filter(|p| !p.has_default_value()) {
        let jvm = param
            .ty
            .jvm_type()
            .ok_or_else(|| DefinitionError::MissingJvmType {
                name: param.name.clone(),
            })?;
        signatures.push_str(jvm.signature());
    }
    if params.iter().any(FormalParameter::has_default_value) {
        signatures.push_str("Ljava/util/Map;");
    }
    Ok(format!("({})", signatures))
}

/// A method signature with its backing JVM descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct InternalMethodDefinition {
    name: String,
    params: Vec<FormalParameter>,
    return_type: TypeUsage,
    jvm: JvmMethodDescriptor,
}

impl InternalMethodDefinition {
    pub fn new(
        name: impl Into<String>,
        params: Vec<FormalParameter>,
        return_type: TypeUsage,
        jvm: JvmMethodDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            jvm,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn formal_parameters(&self) -> &[FormalParameter] {
        &self.params
    }

    pub fn return_type(&self) -> &TypeUsage {
        &self.return_type
    }

    pub fn jvm_descriptor(&self) -> &JvmMethodDescriptor {
        &self.jvm
    }

    pub fn is_static(&self) -> bool {
        self.jvm.is_static()
    }

    /// Whether the actual arguments bind to this signature.
    pub fn matches(&self, args: &[ActualArgument], resolver: &dyn SymbolResolver) -> bool {
        arguments_bind(&self.params, args, resolver)
    }

    /// Exact comparison against already-lowered JVM parameter types.
    pub fn matches_jvm_types(&self, types: &[JvmType]) -> bool {
        if self.params.len() != types.len() {
            return false;
        }
        self.params
            .iter()
            .zip(types)
            .all(|(p, t)| p.ty.jvm_type().as_ref() == Some(t))
    }
}

/// A constructor signature with its backing JVM descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct InternalConstructorDefinition {
    owner: ReferenceTypeUsage,
    params: Vec<FormalParameter>,
    jvm: JvmConstructorDescriptor,
}

impl InternalConstructorDefinition {
    pub fn new(
        owner: ReferenceTypeUsage,
        params: Vec<FormalParameter>,
        jvm: JvmConstructorDescriptor,
    ) -> Self {
        Self { owner, params, jvm }
    }

    pub fn owner(&self) -> &ReferenceTypeUsage {
        &self.owner
    }

    pub fn formal_parameters(&self) -> &[FormalParameter] {
        &self.params
    }

    pub fn jvm_descriptor(&self) -> &JvmConstructorDescriptor {
        &self.jvm
    }

    /// Names of the defaulted parameters: the known key set of the
    /// trailing defaults map. Named overrides outside this set were
    /// already rejected at resolution time.
    pub fn defaulted_parameter_names(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|p| p.has_default_value())
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn has_defaulted_parameters(&self) -> bool {
        self.params.iter().any(FormalParameter::has_default_value)
    }

    pub fn matches(&self, args: &[ActualArgument], resolver: &dyn SymbolResolver) -> bool {
        arguments_bind(&self.params, args, resolver)
    }
}

/// Shared constructor call resolution over a candidate list.
pub(crate) fn resolve_constructor_call(
    type_name: &str,
    candidates: &[InternalConstructorDefinition],
    args: &[ActualArgument],
    resolver: &dyn SymbolResolver,
) -> Result<JvmConstructorDescriptor, CallError> {
    if !verify_order(args) {
        return Err(CallError::IllOrderedParameters);
    }
    candidates
        .iter()
        .find(|c| c.matches(args, resolver))
        .map(|c| c.jvm_descriptor().clone())
        .ok_or_else(|| CallError::UnresolvedConstructor {
            type_name: type_name.to_string(),
            arguments: render_arguments(args),
        })
}
