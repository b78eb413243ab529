// src/ast/nodes.rs
//! Node definitions for the Turin AST.

use crate::ast::{NodeId, Span};
use crate::typesystem::PrimitiveTypeUsage;

/// One parsed source file: a namespace plus its top-level declarations.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub id: NodeId,
    pub namespace: NamespaceDecl,
    pub nodes: Vec<TopLevelNode>,
    pub span: Span,
}

impl CompilationUnit {
    /// Top-level type declaration with the given simple name.
    pub fn top_type(&self, name: &str) -> Option<&TypeDecl> {
        self.nodes.iter().find_map(|node| match node {
            TopLevelNode::Type(decl) if decl.name == name => Some(decl),
            _ => None,
        })
    }

    /// Top-level property declaration with the given name.
    pub fn top_property(&self, name: &str) -> Option<&PropertyDecl> {
        self.nodes.iter().find_map(|node| match node {
            TopLevelNode::Property(decl) if decl.name == name => Some(decl),
            _ => None,
        })
    }

    /// Qualified name of a top-level declaration in this unit.
    pub fn qualify(&self, simple_name: &str) -> String {
        if self.namespace.name.is_empty() {
            simple_name.to_string()
        } else {
            format!("{}.{}", self.namespace.name, simple_name)
        }
    }
}

/// Namespace declaration heading a compilation unit.
#[derive(Debug, Clone)]
pub struct NamespaceDecl {
    pub id: NodeId,
    pub name: String,
    pub span: Span,
}

/// Top-level declarations.
#[derive(Debug, Clone)]
pub enum TopLevelNode {
    Type(TypeDecl),
    Property(PropertyDecl),
    Program(ProgramDecl),
}

/// A source type declaration.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub id: NodeId,
    pub name: String,
    pub base_type: Option<TypeExpr>,
    pub interfaces: Vec<TypeExpr>,
    pub annotations: Vec<AnnotationUse>,
    pub members: Vec<TypeMember>,
    pub span: Span,
}

impl TypeDecl {
    pub fn explicit_constructors(&self) -> impl Iterator<Item = &ConstructorDecl> {
        self.members.iter().filter_map(|m| match m {
            TypeMember::Constructor(c) => Some(c),
            _ => None,
        })
    }

    pub fn direct_methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            TypeMember::Method(m) => Some(m),
            _ => None,
        })
    }
}

/// Members of a type declaration.
#[derive(Debug, Clone)]
pub enum TypeMember {
    /// A property declared in place.
    Property(PropertyDecl),
    /// A reference to a peer top-level property declaration.
    PropertyReference(PropertyRef),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
}

/// A property declaration, either top-level or as a type member.
///
/// `initial_value` fixes the property at construction (it never becomes a
/// constructor parameter); `default_value` makes the synthesized parameter
/// optional.
#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub id: NodeId,
    pub name: String,
    pub ty: TypeExpr,
    pub initial_value: Option<Expr>,
    pub default_value: Option<Expr>,
    pub span: Span,
}

/// Reference to a top-level property declaration by name.
#[derive(Debug, Clone)]
pub struct PropertyRef {
    pub id: NodeId,
    pub name: String,
    pub span: Span,
}

/// A method declared on a source type.
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub id: NodeId,
    pub name: String,
    pub params: Vec<FormalParamDecl>,
    pub return_type: TypeExpr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// The single explicit constructor a type may declare.
#[derive(Debug, Clone)]
pub struct ConstructorDecl {
    pub id: NodeId,
    pub params: Vec<FormalParamDecl>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Formal parameter of a method or constructor.
#[derive(Debug, Clone)]
pub struct FormalParamDecl {
    pub id: NodeId,
    pub name: String,
    pub ty: TypeExpr,
    pub default_value: Option<Expr>,
    pub span: Span,
}

/// Program entry declaration.
#[derive(Debug, Clone)]
pub struct ProgramDecl {
    pub id: NodeId,
    pub name: String,
    pub args_name: String,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Annotation attached to a type declaration.
#[derive(Debug, Clone)]
pub struct AnnotationUse {
    pub id: NodeId,
    pub name: String,
    pub span: Span,
}

/// A type expression as written in source.
#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub id: NodeId,
    pub kind: TypeExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeExprKind {
    Primitive(PrimitiveTypeUsage),
    Void,
    Named {
        name: String,
        type_args: Vec<TypeExpr>,
    },
    Array(Box<TypeExpr>),
}

impl TypeExpr {
    /// The name as written in source, for diagnostics.
    pub fn display_name(&self) -> String {
        match &self.kind {
            TypeExprKind::Primitive(p) => p.name().to_string(),
            TypeExprKind::Void => "void".to_string(),
            TypeExprKind::Named { name, .. } => name.clone(),
            TypeExprKind::Array(element) => format!("{}[]", element.display_name()),
        }
    }
}

/// Statements. The semantic core only needs enough statement structure to
/// reach the expressions inside method, constructor, and program bodies.
#[derive(Debug, Clone)]
pub enum Stmt {
    Expression(Expr),
    Return { value: Option<Expr>, span: Span },
}

/// An expression.
#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLiteral(i32),
    LongLiteral(i64),
    DoubleLiteral(f64),
    BoolLiteral(bool),
    StringLiteral(String),
    /// A bare name: a property, parameter, or top-level property.
    ValueReference(String),
    /// `subject.name`
    FieldAccess {
        subject: Box<Expr>,
        name: String,
    },
    /// Instantiation: `TypeName(args...)`
    Creation {
        type_name: String,
        args: Vec<ActualArg>,
    },
    /// `subject.name(args...)`
    MethodCall {
        subject: Box<Expr>,
        name: String,
        args: Vec<ActualArg>,
    },
    /// `TypeName.name(args...)` on a static member.
    StaticCall {
        type_name: String,
        name: String,
        args: Vec<ActualArg>,
    },
}

/// Actual argument at a call site, positional or named.
#[derive(Debug, Clone)]
pub struct ActualArg {
    pub id: NodeId,
    pub name: Option<String>,
    pub value: Expr,
    pub span: Span,
}

impl ActualArg {
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}
