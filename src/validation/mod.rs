// src/validation/mod.rs
//! Semantic validation.
//!
//! Walks each compilation unit, resolves every type usage and call site
//! against the model, and records positioned diagnostics into the error
//! collector. Validation keeps going after recoverable errors; the call
//! resolutions it gathers are what the emitter consumes.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::ast::{
    ActualArg, AstIndex, CompilationUnit, Expr, ExprKind, NodeId, Span, Stmt, TopLevelNode,
    TypeDecl, TypeExpr, TypeMember,
};
use crate::definitions::{ActualArgument, CallError, DefinitionError, TypeDefinition};
use crate::errors::{ErrorCollector, SemanticError};
use crate::jvm::{JvmConstructorDescriptor, JvmFieldDescriptor, JvmMethodDescriptor};
use crate::resolvers::{LookupContext, SymbolResolver};
use crate::typesystem::{PrimitiveTypeUsage, TypeUsage, resolve_type_expr};

/// The descriptor selected for a call or field-access site. Validation
/// populates this, the emitter consumes it.
#[derive(Debug, Clone)]
pub enum ResolvedCall {
    Constructor(JvmConstructorDescriptor),
    Method(JvmMethodDescriptor),
    Field(JvmFieldDescriptor),
}

/// Node-keyed storage for all call resolutions in a compilation.
#[derive(Debug, Default)]
pub struct CallResolutions {
    resolutions: FxHashMap<NodeId, ResolvedCall>,
}

impl CallResolutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, resolved: ResolvedCall) {
        self.resolutions.insert(node, resolved);
    }

    pub fn get(&self, node: NodeId) -> Option<&ResolvedCall> {
        self.resolutions.get(&node)
    }

    pub fn len(&self) -> usize {
        self.resolutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolutions.is_empty()
    }
}

/// Everything validation produced.
#[derive(Debug)]
pub struct ValidationResult {
    pub errors: Vec<SemanticError>,
    pub resolutions: CallResolutions,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct Validator {
    resolver: Rc<dyn SymbolResolver>,
    collector: ErrorCollector,
    resolutions: CallResolutions,
}

impl Validator {
    pub fn new(resolver: Rc<dyn SymbolResolver>) -> Self {
        Self {
            resolver,
            collector: ErrorCollector::new(),
            resolutions: CallResolutions::new(),
        }
    }

    pub fn finish(self) -> ValidationResult {
        ValidationResult {
            errors: self.collector.into_errors(),
            resolutions: self.resolutions,
        }
    }

    pub fn validate_unit(&mut self, unit: &CompilationUnit) {
        let index = AstIndex::build(unit);
        for node in &unit.nodes {
            match node {
                TopLevelNode::Type(decl) => self.validate_type(decl, &index),
                TopLevelNode::Property(decl) => {
                    self.require_type(&decl.ty, LookupContext::at(&index, decl.id));
                }
                TopLevelNode::Program(decl) => {
                    self.validate_body(&decl.body, &index);
                }
            }
        }
    }

    fn validate_type(&mut self, decl: &TypeDecl, index: &AstIndex<'_>) {
        let ctx = LookupContext::at(index, decl.id);

        if let Some(base) = &decl.base_type {
            self.validate_extension(base, ctx);
        }
        for interface in &decl.interfaces {
            self.validate_implementation(interface, ctx);
        }

        let explicit: Vec<_> = decl.explicit_constructors().collect();
        if explicit.len() > 1 {
            for constructor in &explicit {
                self.collector
                    .record(SemanticError::MultipleExplicitConstructors {
                        span: constructor.span.into(),
                    });
            }
        }

        let mut seen_method_names: Vec<&str> = Vec::new();
        for method in decl.direct_methods() {
            if seen_method_names.contains(&method.name.as_str()) {
                self.collector.record(SemanticError::DuplicateMethod {
                    name: method.name.clone(),
                    span: method.span.into(),
                });
            } else {
                seen_method_names.push(&method.name);
            }
        }

        for member in &decl.members {
            match member {
                TypeMember::Property(property) => {
                    self.require_type(&property.ty, LookupContext::at(index, property.id));
                    if let Some(init) = &property.initial_value {
                        self.expr_type(init, index);
                    }
                    if let Some(default) = &property.default_value {
                        self.expr_type(default, index);
                    }
                }
                TypeMember::PropertyReference(reference) => {
                    if self.resolver.find_definition(reference).is_none() {
                        self.collector.record(SemanticError::UnresolvedName {
                            name: reference.name.clone(),
                            span: reference.span.into(),
                        });
                    }
                }
                TypeMember::Method(method) => {
                    for param in &method.params {
                        self.require_type(&param.ty, LookupContext::at(index, param.id));
                    }
                    self.require_type(
                        &method.return_type,
                        LookupContext::at(index, method.id),
                    );
                    self.validate_body(&method.body, index);
                }
                TypeMember::Constructor(constructor) => {
                    for param in &constructor.params {
                        self.require_type(&param.ty, LookupContext::at(index, param.id));
                    }
                    self.validate_body(&constructor.body, index);
                }
            }
        }
    }

    /// Only classes can be extended.
    fn validate_extension(&mut self, base: &TypeExpr, ctx: LookupContext<'_>) {
        let resolver = Rc::clone(&self.resolver);
        let Some(usage) = resolve_type_expr(base, resolver.as_ref(), ctx) else {
            self.collector.record(SemanticError::UnresolvedName {
                name: base.display_name(),
                span: base.span.into(),
            });
            return;
        };
        let definition = usage
            .as_reference()
            .and_then(|r| resolver.find_type_definition(r.qualified_name(), ctx));
        match definition {
            Some(definition) if definition.is_class() => {}
            _ => self.collector.record(SemanticError::InvalidExtension {
                name: base.display_name(),
                span: base.span.into(),
            }),
        }
    }

    /// Only interfaces can be implemented.
    fn validate_implementation(&mut self, interface: &TypeExpr, ctx: LookupContext<'_>) {
        let resolver = Rc::clone(&self.resolver);
        let Some(usage) = resolve_type_expr(interface, resolver.as_ref(), ctx) else {
            self.collector.record(SemanticError::UnresolvedName {
                name: interface.display_name(),
                span: interface.span.into(),
            });
            return;
        };
        let definition = usage
            .as_reference()
            .and_then(|r| resolver.find_type_definition(r.qualified_name(), ctx));
        match definition {
            Some(definition) if definition.is_interface() => {}
            _ => self.collector.record(SemanticError::InvalidImplementation {
                name: interface.display_name(),
                span: interface.span.into(),
            }),
        }
    }

    fn require_type(&mut self, expr: &TypeExpr, ctx: LookupContext<'_>) -> Option<TypeUsage> {
        let resolver = Rc::clone(&self.resolver);
        let resolved = resolve_type_expr(expr, resolver.as_ref(), ctx);
        if resolved.is_none() {
            self.collector.record(SemanticError::UnresolvedName {
                name: expr.display_name(),
                span: expr.span.into(),
            });
        }
        resolved
    }

    fn validate_body(&mut self, body: &[Stmt], index: &AstIndex<'_>) {
        for stmt in body {
            match stmt {
                Stmt::Expression(expr) => {
                    self.expr_type(expr, index);
                }
                Stmt::Return { value, .. } => {
                    if let Some(expr) = value {
                        self.expr_type(expr, index);
                    }
                }
            }
        }
    }

    /// Bottom-up expression typing. Errors are recorded and the failed
    /// subexpression yields None so one defect does not cascade.
    fn expr_type(&mut self, expr: &Expr, index: &AstIndex<'_>) -> Option<TypeUsage> {
        let resolver = Rc::clone(&self.resolver);
        let ctx = LookupContext::at(index, expr.id);
        match &expr.kind {
            ExprKind::IntLiteral(_) => Some(TypeUsage::Primitive(PrimitiveTypeUsage::Int)),
            ExprKind::LongLiteral(_) => Some(TypeUsage::Primitive(PrimitiveTypeUsage::Long)),
            ExprKind::DoubleLiteral(_) => Some(TypeUsage::Primitive(PrimitiveTypeUsage::Double)),
            ExprKind::BoolLiteral(_) => Some(TypeUsage::Primitive(PrimitiveTypeUsage::Boolean)),
            ExprKind::StringLiteral(_) => Some(TypeUsage::string()),

            ExprKind::ValueReference(name) => {
                match resolver.find_symbol(name, ctx) {
                    Some(symbol) => Some(symbol.type_usage().clone()),
                    None => {
                        self.collector.record(SemanticError::UnresolvedName {
                            name: name.clone(),
                            span: expr.span.into(),
                        });
                        None
                    }
                }
            }

            ExprKind::FieldAccess { subject, name } => {
                // A bare type name on the left means static field access.
                if let ExprKind::ValueReference(type_name) = &subject.kind
                    && resolver.find_symbol(type_name, ctx).is_none()
                    && let Some(definition) = resolver.find_type_definition(type_name, ctx)
                {
                    return self.field_of(&definition, name, true, expr.id, expr.span);
                }
                let subject_type = self.expr_type(subject, index)?;
                let definition = self.definition_of(&subject_type, ctx, subject.span)?;
                self.field_of(&definition, name, false, expr.id, expr.span)
            }

            ExprKind::Creation { type_name, args } => {
                let Some(definition) = resolver.find_type_definition(type_name, ctx) else {
                    self.collector.record(SemanticError::UnresolvedName {
                        name: type_name.clone(),
                        span: expr.span.into(),
                    });
                    return None;
                };
                let actual = self.actual_arguments(args, index)?;
                match definition.resolve_constructor_call(&actual, resolver.as_ref()) {
                    Ok(descriptor) => {
                        self.resolutions
                            .insert(expr.id, ResolvedCall::Constructor(descriptor));
                        Some(TypeUsage::reference(definition.qualified_name()))
                    }
                    Err(error) => {
                        self.record_call_error(error, expr.span);
                        None
                    }
                }
            }

            ExprKind::MethodCall { subject, name, args } => {
                let subject_type = self.expr_type(subject, index)?;
                let definition = self.definition_of(&subject_type, ctx, subject.span)?;
                self.resolve_method_call(&definition, name, args, false, expr, index)
            }

            ExprKind::StaticCall {
                type_name, name, args,
            } => {
                let Some(definition) = resolver.find_type_definition(type_name, ctx) else {
                    self.collector.record(SemanticError::UnresolvedName {
                        name: type_name.clone(),
                        span: expr.span.into(),
                    });
                    return None;
                };
                self.resolve_method_call(&definition, name, args, true, expr, index)
            }
        }
    }

    fn resolve_method_call(
        &mut self,
        definition: &Rc<TypeDefinition>,
        name: &str,
        args: &[ActualArg],
        static_context: bool,
        expr: &Expr,
        index: &AstIndex<'_>,
    ) -> Option<TypeUsage> {
        let resolver = Rc::clone(&self.resolver);
        let actual = self.actual_arguments(args, index)?;
        match definition.find_method(name, &actual, static_context, resolver.as_ref()) {
            Ok(Some(method)) => {
                self.resolutions
                    .insert(expr.id, ResolvedCall::Method(method.jvm_descriptor().clone()));
                Some(method.return_type().clone())
            }
            Ok(None) => {
                self.collector.record(SemanticError::UnresolvedMethod {
                    type_name: definition.qualified_name().to_string(),
                    name: name.to_string(),
                    span: expr.span.into(),
                });
                None
            }
            Err(error) => {
                self.record_call_error(error, expr.span);
                None
            }
        }
    }

    /// Type every argument value; None if any subexpression failed.
    fn actual_arguments(
        &mut self,
        args: &[ActualArg],
        index: &AstIndex<'_>,
    ) -> Option<Vec<ActualArgument>> {
        let mut actual = Vec::with_capacity(args.len());
        for arg in args {
            let ty = self.expr_type(&arg.value, index)?;
            actual.push(ActualArgument {
                name: arg.name.clone(),
                ty,
                span: arg.span,
            });
        }
        Some(actual)
    }

    fn definition_of(
        &mut self,
        usage: &TypeUsage,
        ctx: LookupContext<'_>,
        span: Span,
    ) -> Option<Rc<TypeDefinition>> {
        let Some(reference) = usage.as_reference() else {
            self.collector.record(SemanticError::UnresolvedName {
                name: usage.to_string(),
                span: span.into(),
            });
            return None;
        };
        let found = self
            .resolver
            .find_type_definition(reference.qualified_name(), ctx);
        if found.is_none() {
            self.collector.record(SemanticError::UnresolvedName {
                name: reference.qualified_name().to_string(),
                span: span.into(),
            });
        }
        found
    }

    fn field_of(
        &mut self,
        definition: &Rc<TypeDefinition>,
        name: &str,
        static_context: bool,
        node: NodeId,
        span: Span,
    ) -> Option<TypeUsage> {
        let resolver = Rc::clone(&self.resolver);
        let Some(found) = definition.field_type(name, static_context, resolver.as_ref()) else {
            self.collector.record(SemanticError::UnresolvedName {
                name: name.to_string(),
                span: span.into(),
            });
            return None;
        };
        if let Some(jvm) = found.jvm_type() {
            self.resolutions.insert(
                node,
                ResolvedCall::Field(JvmFieldDescriptor::new(
                    definition.internal_name(),
                    name,
                    jvm,
                    static_context,
                )),
            );
        }
        Some(found)
    }

    fn record_call_error(&mut self, error: CallError, span: Span) {
        let diagnostic = match error {
            CallError::IllOrderedParameters => SemanticError::IllOrderedParameters {
                span: span.into(),
            },
            CallError::UnresolvedConstructor {
                type_name,
                arguments,
            } => SemanticError::UnresolvedConstructor {
                type_name,
                arguments,
                span: span.into(),
            },
            CallError::Definition(error) => definition_diagnostic(error, span),
        };
        self.collector.record(diagnostic);
    }
}

fn definition_diagnostic(error: DefinitionError, span: Span) -> SemanticError {
    match error {
        DefinitionError::UnresolvedType { name } | DefinitionError::MissingJvmType { name } => {
            SemanticError::UnresolvedName {
                name,
                span: span.into(),
            }
        }
        DefinitionError::MultipleExplicitConstructors { .. } => {
            SemanticError::MultipleExplicitConstructors { span: span.into() }
        }
        DefinitionError::UnsupportedInheritance { base, .. } => {
            SemanticError::UnsupportedInheritance {
                base,
                span: span.into(),
            }
        }
        DefinitionError::DuplicateMethod { name, .. } => SemanticError::DuplicateMethod {
            name,
            span: span.into(),
        },
    }
}
