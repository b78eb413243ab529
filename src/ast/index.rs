// src/ast/index.rs
//! Sidecar index over a compilation unit.
//!
//! The tree itself owns children only. This index is rebuilt by a one-pass
//! walk whenever a phase needs parent links or id-based node access, which
//! keeps the AST free of cycles.

use rustc_hash::FxHashMap;

use crate::ast::nodes::*;
use crate::ast::{NodeId, Span};

/// A borrowed view of any AST node.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Unit(&'a CompilationUnit),
    Namespace(&'a NamespaceDecl),
    Type(&'a TypeDecl),
    Property(&'a PropertyDecl),
    PropertyReference(&'a PropertyRef),
    Method(&'a MethodDecl),
    Constructor(&'a ConstructorDecl),
    Param(&'a FormalParamDecl),
    Program(&'a ProgramDecl),
    Annotation(&'a AnnotationUse),
    TypeExpr(&'a TypeExpr),
    Expr(&'a Expr),
    Arg(&'a ActualArg),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Unit(n) => n.id,
            NodeRef::Namespace(n) => n.id,
            NodeRef::Type(n) => n.id,
            NodeRef::Property(n) => n.id,
            NodeRef::PropertyReference(n) => n.id,
            NodeRef::Method(n) => n.id,
            NodeRef::Constructor(n) => n.id,
            NodeRef::Param(n) => n.id,
            NodeRef::Program(n) => n.id,
            NodeRef::Annotation(n) => n.id,
            NodeRef::TypeExpr(n) => n.id,
            NodeRef::Expr(n) => n.id,
            NodeRef::Arg(n) => n.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            NodeRef::Unit(n) => n.span,
            NodeRef::Namespace(n) => n.span,
            NodeRef::Type(n) => n.span,
            NodeRef::Property(n) => n.span,
            NodeRef::PropertyReference(n) => n.span,
            NodeRef::Method(n) => n.span,
            NodeRef::Constructor(n) => n.span,
            NodeRef::Param(n) => n.span,
            NodeRef::Program(n) => n.span,
            NodeRef::Annotation(n) => n.span,
            NodeRef::TypeExpr(n) => n.span,
            NodeRef::Expr(n) => n.span,
            NodeRef::Arg(n) => n.span,
        }
    }
}

/// Id-keyed node access and parent links for one compilation unit.
pub struct AstIndex<'a> {
    unit: &'a CompilationUnit,
    nodes: FxHashMap<NodeId, NodeRef<'a>>,
    parents: FxHashMap<NodeId, NodeId>,
}

impl<'a> AstIndex<'a> {
    /// Build the index with a single walk over the unit.
    pub fn build(unit: &'a CompilationUnit) -> Self {
        let mut index = Self {
            unit,
            nodes: FxHashMap::default(),
            parents: FxHashMap::default(),
        };
        index.enter(NodeRef::Unit(unit), None);
        index.enter(NodeRef::Namespace(&unit.namespace), Some(unit.id));
        for node in &unit.nodes {
            match node {
                TopLevelNode::Type(decl) => index.walk_type(decl, unit.id),
                TopLevelNode::Property(decl) => index.walk_property(decl, unit.id),
                TopLevelNode::Program(decl) => index.walk_program(decl, unit.id),
            }
        }
        index
    }

    pub fn unit(&self) -> &'a CompilationUnit {
        self.unit
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'a>> {
        self.nodes.get(&id).copied()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    /// Ancestors of a node, innermost first, ending at the unit.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'a, '_> {
        Ancestors { index: self, current: self.parent(id) }
    }

    /// The type declaration enclosing a node, if any.
    pub fn enclosing_type(&self, id: NodeId) -> Option<&'a TypeDecl> {
        self.node_and_ancestors(id).find_map(|node| match node {
            NodeRef::Type(decl) => Some(decl),
            _ => None,
        })
    }

    /// The method, constructor, or program body enclosing a node, if any.
    pub fn enclosing_callable(&self, id: NodeId) -> Option<NodeRef<'a>> {
        self.node_and_ancestors(id).find(|node| {
            matches!(
                node,
                NodeRef::Method(_) | NodeRef::Constructor(_) | NodeRef::Program(_)
            )
        })
    }

    fn node_and_ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeRef<'a>> + '_ {
        self.node(id).into_iter().chain(self.ancestors(id))
    }

    fn enter(&mut self, node: NodeRef<'a>, parent: Option<NodeId>) {
        self.nodes.insert(node.id(), node);
        if let Some(parent) = parent {
            self.parents.insert(node.id(), parent);
        }
    }

    fn walk_type(&mut self, decl: &'a TypeDecl, parent: NodeId) {
        self.enter(NodeRef::Type(decl), Some(parent));
        if let Some(base) = &decl.base_type {
            self.walk_type_expr(base, decl.id);
        }
        for interface in &decl.interfaces {
            self.walk_type_expr(interface, decl.id);
        }
        for annotation in &decl.annotations {
            self.enter(NodeRef::Annotation(annotation), Some(decl.id));
        }
        for member in &decl.members {
            match member {
                TypeMember::Property(p) => self.walk_property(p, decl.id),
                TypeMember::PropertyReference(r) => {
                    self.enter(NodeRef::PropertyReference(r), Some(decl.id));
                }
                TypeMember::Method(m) => self.walk_method(m, decl.id),
                TypeMember::Constructor(c) => self.walk_constructor(c, decl.id),
            }
        }
    }

    fn walk_property(&mut self, decl: &'a PropertyDecl, parent: NodeId) {
        self.enter(NodeRef::Property(decl), Some(parent));
        self.walk_type_expr(&decl.ty, decl.id);
        if let Some(init) = &decl.initial_value {
            self.walk_expr(init, decl.id);
        }
        if let Some(default) = &decl.default_value {
            self.walk_expr(default, decl.id);
        }
    }

    fn walk_method(&mut self, decl: &'a MethodDecl, parent: NodeId) {
        self.enter(NodeRef::Method(decl), Some(parent));
        for param in &decl.params {
            self.walk_param(param, decl.id);
        }
        self.walk_type_expr(&decl.return_type, decl.id);
        self.walk_body(&decl.body, decl.id);
    }

    fn walk_constructor(&mut self, decl: &'a ConstructorDecl, parent: NodeId) {
        self.enter(NodeRef::Constructor(decl), Some(parent));
        for param in &decl.params {
            self.walk_param(param, decl.id);
        }
        self.walk_body(&decl.body, decl.id);
    }

    fn walk_program(&mut self, decl: &'a ProgramDecl, parent: NodeId) {
        self.enter(NodeRef::Program(decl), Some(parent));
        self.walk_body(&decl.body, decl.id);
    }

    fn walk_param(&mut self, param: &'a FormalParamDecl, parent: NodeId) {
        self.enter(NodeRef::Param(param), Some(parent));
        self.walk_type_expr(&param.ty, param.id);
        if let Some(default) = &param.default_value {
            self.walk_expr(default, param.id);
        }
    }

    fn walk_body(&mut self, body: &'a [Stmt], parent: NodeId) {
        for stmt in body {
            match stmt {
                Stmt::Expression(expr) => self.walk_expr(expr, parent),
                Stmt::Return { value, .. } => {
                    if let Some(expr) = value {
                        self.walk_expr(expr, parent);
                    }
                }
            }
        }
    }

    fn walk_type_expr(&mut self, expr: &'a TypeExpr, parent: NodeId) {
        self.enter(NodeRef::TypeExpr(expr), Some(parent));
        match &expr.kind {
            TypeExprKind::Named { type_args, .. } => {
                for arg in type_args {
                    self.walk_type_expr(arg, expr.id);
                }
            }
            TypeExprKind::Array(element) => self.walk_type_expr(element, expr.id),
            TypeExprKind::Primitive(_) | TypeExprKind::Void => {}
        }
    }

    fn walk_expr(&mut self, expr: &'a Expr, parent: NodeId) {
        self.enter(NodeRef::Expr(expr), Some(parent));
        match &expr.kind {
            ExprKind::FieldAccess { subject, .. } => self.walk_expr(subject, expr.id),
            ExprKind::MethodCall { subject, args, .. } => {
                self.walk_expr(subject, expr.id);
                self.walk_args(args, expr.id);
            }
            ExprKind::Creation { args, .. } | ExprKind::StaticCall { args, .. } => {
                self.walk_args(args, expr.id);
            }
            ExprKind::IntLiteral(_)
            | ExprKind::LongLiteral(_)
            | ExprKind::DoubleLiteral(_)
            | ExprKind::BoolLiteral(_)
            | ExprKind::StringLiteral(_)
            | ExprKind::ValueReference(_) => {}
        }
    }

    fn walk_args(&mut self, args: &'a [ActualArg], parent: NodeId) {
        for arg in args {
            self.enter(NodeRef::Arg(arg), Some(parent));
            self.walk_expr(&arg.value, arg.id);
        }
    }
}

/// Iterator over the ancestor chain, innermost first.
pub struct Ancestors<'a, 'i> {
    index: &'i AstIndex<'a>,
    current: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a, '_> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.index.node(id);
        self.current = self.index.parent(id);
        node
    }
}
