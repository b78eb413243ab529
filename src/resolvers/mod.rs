// src/resolvers/mod.rs
//! Name resolution.
//!
//! A `SymbolResolver` maps names to type definitions, type usages, and
//! symbols. Resolvers compose by ordered delegation with first-hit-wins
//! semantics ([`composed::ComposedSymbolResolver`]); absence is an
//! `Option`, never an error. The parent back-pointer is a weak relation
//! used only to walk outward when a lookup needs the full stack.

pub mod composed;
pub mod in_source;
pub mod jar;
pub mod reflection;

pub use composed::ComposedSymbolResolver;
pub use in_source::InSourceSymbolResolver;
pub use jar::JarTypeResolver;
pub use reflection::ReflectionSymbolResolver;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::ast::{AstIndex, NodeId, NodeRef, PropertyDecl, PropertyRef, TypeDecl};
use crate::definitions::{FormalParameter, Property, TypeDefinition};
use crate::jvm::{JvmMethodDescriptor, JvmType};
use crate::typesystem::TypeUsage;

/// The syntactic context of a lookup: a node inside an indexed unit, or
/// just a namespace, or nothing at all.
#[derive(Clone, Copy, Default)]
pub struct LookupContext<'a> {
    index: Option<&'a AstIndex<'a>>,
    node: Option<NodeId>,
    namespace: Option<&'a str>,
}

impl<'a> LookupContext<'a> {
    /// No context: only fully qualified lookups succeed.
    pub fn none() -> LookupContext<'static> {
        LookupContext::default()
    }

    /// A bare namespace, used when materializing definitions outside a
    /// validation walk.
    pub fn in_namespace(namespace: &'a str) -> Self {
        Self {
            index: None,
            node: None,
            namespace: Some(namespace),
        }
    }

    /// A node in an indexed compilation unit.
    pub fn at(index: &'a AstIndex<'a>, node: NodeId) -> Self {
        Self {
            index: Some(index),
            node: Some(node),
            namespace: None,
        }
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn index(&self) -> Option<&'a AstIndex<'a>> {
        self.index
    }

    /// The namespace governing simple-name qualification.
    pub fn namespace(&self) -> Option<&'a str> {
        self.namespace
            .or_else(|| self.index.map(|i| i.unit().namespace.name.as_str()))
    }

    /// The type declaration enclosing the context node, via the parent map.
    pub fn enclosing_type(&self) -> Option<&'a TypeDecl> {
        self.index?.enclosing_type(self.node?)
    }

    /// The method, constructor, or program body enclosing the context node.
    pub fn enclosing_callable(&self) -> Option<NodeRef<'a>> {
        self.index?.enclosing_callable(self.node?)
    }
}

/// A resolved symbol.
#[derive(Debug, Clone)]
pub enum SymbolInfo {
    /// A property of the enclosing type.
    Property { owner: String, property: Property },
    /// A formal parameter of the enclosing method or constructor.
    Parameter { param: FormalParameter },
    /// A top-level property declaration.
    TopLevelProperty {
        qualified_name: String,
        property: Property,
    },
}

impl SymbolInfo {
    pub fn type_usage(&self) -> &TypeUsage {
        match self {
            SymbolInfo::Property { property, .. } => property.type_usage(),
            SymbolInfo::Parameter { param } => &param.ty,
            SymbolInfo::TopLevelProperty { property, .. } => property.type_usage(),
        }
    }
}

/// An already-type-checked call, lowered to descriptors: the query the
/// emitter asks when it needs the exact JVM method to invoke.
#[derive(Debug, Clone)]
pub struct CallQuery {
    pub type_name: String,
    pub method_name: String,
    pub argument_types: Vec<JvmType>,
    pub static_context: bool,
}

/// Maps names to definitions, usages, and symbols.
pub trait SymbolResolver {
    /// Resolve a property reference against a peer top-level property
    /// declaration.
    fn find_definition(&self, reference: &PropertyRef) -> Option<PropertyDecl>;

    /// Resolve a (simple or qualified) type name to its definition.
    fn find_type_definition(
        &self,
        name: &str,
        ctx: LookupContext<'_>,
    ) -> Option<Rc<TypeDefinition>>;

    /// Resolve a type name to a usage of it.
    fn find_type_usage(&self, name: &str, ctx: LookupContext<'_>) -> Option<TypeUsage>;

    /// Resolve an already-type-checked call to the JVM method it binds to.
    fn find_jvm_definition(&self, call: &CallQuery) -> Option<JvmMethodDescriptor>;

    /// Resolve a bare name in a syntactic context.
    fn find_symbol(&self, name: &str, ctx: LookupContext<'_>) -> Option<SymbolInfo>;

    fn has_package(&self, name: &str) -> bool;

    fn parent(&self) -> Option<Rc<dyn SymbolResolver>>;

    fn set_parent(&self, parent: &Rc<dyn SymbolResolver>);
}

/// Weak, non-owning link to the composition a resolver belongs to.
#[derive(Default)]
pub(crate) struct ParentLink {
    cell: RefCell<Option<Weak<dyn SymbolResolver>>>,
}

impl ParentLink {
    pub(crate) fn get(&self) -> Option<Rc<dyn SymbolResolver>> {
        self.cell.borrow().as_ref()?.upgrade()
    }

    pub(crate) fn set(&self, parent: &Rc<dyn SymbolResolver>) {
        *self.cell.borrow_mut() = Some(Rc::downgrade(parent));
    }

    /// The outermost resolver reachable from here, if any.
    pub(crate) fn outermost(&self) -> Option<Rc<dyn SymbolResolver>> {
        let mut current = self.get()?;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        Some(current)
    }
}

impl std::fmt::Debug for ParentLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let linked = self.cell.borrow().is_some();
        write!(f, "ParentLink {{ linked: {} }}", linked)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_context_none_has_no_namespace() {
        let ctx = LookupContext::none();
        assert!(ctx.namespace().is_none());
        assert!(ctx.node().is_none());
        assert!(ctx.enclosing_type().is_none());
    }

    #[test]
    fn lookup_context_in_namespace() {
        let ctx = LookupContext::in_namespace("me.example");
        assert_eq!(ctx.namespace(), Some("me.example"));
    }
}
