// src/ast/mod.rs
//! Abstract syntax tree handed over by the parser.
//!
//! Nodes are plain owned structs; every node carries a `NodeId` and a
//! `Span`. Parent back-references are not stored in the tree itself: they
//! live in a sidecar index ([`index::AstIndex`]) reconstructed by a
//! one-pass walk, so ownership stays a strict tree.

pub mod index;
pub mod nodes;

pub use index::{AstIndex, NodeRef};
pub use nodes::{
    ActualArg, AnnotationUse, CompilationUnit, ConstructorDecl, Expr, ExprKind, FormalParamDecl,
    MethodDecl, NamespaceDecl, ProgramDecl, PropertyDecl, PropertyRef, Stmt, TopLevelNode,
    TypeDecl, TypeExpr, TypeExprKind, TypeMember,
};

/// Unique identifier for AST nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeId(pub u32);

/// Hands out fresh node ids while the parser assembles a tree.
#[derive(Debug, Default)]
pub struct NodeIdGen {
    next: u32,
}

impl NodeIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// A source position: byte offsets plus 1-indexed line/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Placeholder span for synthesized nodes.
    pub fn synthetic() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.len()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_gen_is_sequential() {
        let mut ids = NodeIdGen::new();
        assert_eq!(ids.fresh(), NodeId(0));
        assert_eq!(ids.fresh(), NodeId(1));
        assert_ne!(ids.fresh(), ids.fresh());
    }

    #[test]
    fn span_to_source_span() {
        let span = Span::new(10, 14, 2, 3);
        let source_span: miette::SourceSpan = span.into();
        assert_eq!(source_span.offset(), 10);
        assert_eq!(source_span.len(), 4);
    }
}
