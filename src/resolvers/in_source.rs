// src/resolvers/in_source.rs
//! Resolves names against the compilation units of the current job.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::ast::{CompilationUnit, NodeRef, PropertyDecl, PropertyRef, TopLevelNode, TypeMember};
use crate::definitions::{
    FormalParameter, Property, SourceTypeDefinition, TypeDefinition,
};
use crate::jvm::JvmMethodDescriptor;
use crate::resolvers::{CallQuery, LookupContext, ParentLink, SymbolInfo, SymbolResolver};
use crate::typesystem::{TypeUsage, resolve_type_expr};

pub struct InSourceSymbolResolver {
    units: Vec<Rc<CompilationUnit>>,
    cache: RefCell<FxHashMap<String, Rc<TypeDefinition>>>,
    parent: ParentLink,
}

impl InSourceSymbolResolver {
    pub fn new(units: Vec<Rc<CompilationUnit>>) -> Self {
        Self {
            units,
            cache: RefCell::new(FxHashMap::default()),
            parent: ParentLink::default(),
        }
    }

    pub fn units(&self) -> &[Rc<CompilationUnit>] {
        &self.units
    }

    /// The full resolver stack when composed, this resolver alone
    /// otherwise. Needed when materializing definitions whose member
    /// types may live outside the current units.
    fn full_stack(&self) -> Option<Rc<dyn SymbolResolver>> {
        self.parent.outermost()
    }

    fn definition_for(&self, unit: &Rc<CompilationUnit>, simple_name: &str) -> Rc<TypeDefinition> {
        let qualified = unit.qualify(simple_name);
        if let Some(cached) = self.cache.borrow().get(&qualified) {
            return cached.clone();
        }
        tracing::trace!(name = %qualified, "materializing source type definition");
        let definition = Rc::new(TypeDefinition::Source(SourceTypeDefinition::new(
            unit.clone(),
            simple_name,
        )));
        self.cache
            .borrow_mut()
            .insert(qualified, definition.clone());
        definition
    }

    /// Match a name against top-level type declarations: fully qualified
    /// first, then simple names qualified by the context namespace, then
    /// bare simple names across units.
    fn lookup(&self, name: &str, ctx: LookupContext<'_>) -> Option<Rc<TypeDefinition>> {
        for unit in &self.units {
            for node in &unit.nodes {
                let TopLevelNode::Type(decl) = node else {
                    continue;
                };
                if unit.qualify(&decl.name) == name {
                    return Some(self.definition_for(unit, &decl.name));
                }
            }
        }
        if name.contains('.') {
            return None;
        }
        if let Some(namespace) = ctx.namespace() {
            for unit in &self.units {
                if unit.namespace.name == namespace && unit.top_type(name).is_some() {
                    return Some(self.definition_for(unit, name));
                }
            }
        }
        for unit in &self.units {
            if unit.top_type(name).is_some() {
                return Some(self.definition_for(unit, name));
            }
        }
        None
    }

    fn property_symbol(
        &self,
        decl: &PropertyDecl,
        owner: &str,
        resolver: &dyn SymbolResolver,
        ctx: LookupContext<'_>,
    ) -> Option<SymbolInfo> {
        let property = Property::from_declaration(decl, resolver, ctx)?;
        Some(SymbolInfo::Property {
            owner: owner.to_string(),
            property,
        })
    }
}

impl SymbolResolver for InSourceSymbolResolver {
    fn find_definition(&self, reference: &PropertyRef) -> Option<PropertyDecl> {
        self.units
            .iter()
            .find_map(|unit| unit.top_property(&reference.name))
            .cloned()
    }

    fn find_type_definition(
        &self,
        name: &str,
        ctx: LookupContext<'_>,
    ) -> Option<Rc<TypeDefinition>> {
        self.lookup(name, ctx)
    }

    fn find_type_usage(&self, name: &str, ctx: LookupContext<'_>) -> Option<TypeUsage> {
        self.lookup(name, ctx)
            .map(|definition| TypeUsage::reference(definition.qualified_name()))
    }

    fn find_jvm_definition(&self, call: &CallQuery) -> Option<JvmMethodDescriptor> {
        let definition = self.lookup(&call.type_name, LookupContext::none())?;
        let full = self.full_stack();
        let resolver: &dyn SymbolResolver = full.as_deref().unwrap_or(self);
        definition
            .find_method_by_descriptors(
                &call.method_name,
                &call.argument_types,
                call.static_context,
                resolver,
            )
            .ok()
    }

    /// Innermost scopes first: the enclosing callable's parameters, then
    /// the enclosing type's properties, then top-level property
    /// declarations.
    fn find_symbol(&self, name: &str, ctx: LookupContext<'_>) -> Option<SymbolInfo> {
        let full = self.full_stack();
        let resolver: &dyn SymbolResolver = full.as_deref().unwrap_or(self);

        if let Some(callable) = ctx.enclosing_callable() {
            let params = match callable {
                NodeRef::Method(m) => Some(&m.params),
                NodeRef::Constructor(c) => Some(&c.params),
                _ => None,
            };
            if let Some(params) = params
                && let Some(param) = params.iter().find(|p| p.name == name)
            {
                let ty = resolve_type_expr(&param.ty, resolver, ctx)?;
                return Some(SymbolInfo::Parameter {
                    param: FormalParameter {
                        name: param.name.clone(),
                        ty,
                        has_default: param.default_value.is_some(),
                    },
                });
            }
        }

        if let Some(enclosing) = ctx.enclosing_type() {
            for member in &enclosing.members {
                match member {
                    TypeMember::Property(decl) if decl.name == name => {
                        return self.property_symbol(decl, &enclosing.name, resolver, ctx);
                    }
                    TypeMember::PropertyReference(reference) if reference.name == name => {
                        let decl = self.find_definition(reference)?;
                        return self.property_symbol(&decl, &enclosing.name, resolver, ctx);
                    }
                    _ => {}
                }
            }
        }

        for unit in &self.units {
            if let Some(decl) = unit.top_property(name) {
                let property = Property::from_declaration(decl, resolver, ctx)?;
                return Some(SymbolInfo::TopLevelProperty {
                    qualified_name: unit.qualify(name),
                    property,
                });
            }
        }

        None
    }

    fn has_package(&self, name: &str) -> bool {
        self.units.iter().any(|unit| {
            let namespace = &unit.namespace.name;
            namespace == name || namespace.starts_with(&format!("{}.", name))
        })
    }

    fn parent(&self) -> Option<Rc<dyn SymbolResolver>> {
        self.parent.get()
    }

    fn set_parent(&self, parent: &Rc<dyn SymbolResolver>) {
        self.parent.set(parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NamespaceDecl, NodeIdGen, Span, TypeDecl, TypeExpr, TypeExprKind};
    use crate::typesystem::PrimitiveTypeUsage;

    fn unit(ids: &mut NodeIdGen, namespace: &str, types: &[&str]) -> Rc<CompilationUnit> {
        Rc::new(CompilationUnit {
            id: ids.fresh(),
            namespace: NamespaceDecl {
                id: ids.fresh(),
                name: namespace.to_string(),
                span: Span::synthetic(),
            },
            nodes: types
                .iter()
                .map(|name| {
                    TopLevelNode::Type(TypeDecl {
                        id: ids.fresh(),
                        name: name.to_string(),
                        base_type: None,
                        interfaces: vec![],
                        annotations: vec![],
                        members: vec![],
                        span: Span::synthetic(),
                    })
                })
                .collect(),
            span: Span::synthetic(),
        })
    }

    #[test]
    fn resolves_qualified_and_simple_names() {
        let mut ids = NodeIdGen::new();
        let resolver =
            InSourceSymbolResolver::new(vec![unit(&mut ids, "me.example", &["Point"])]);

        let qualified = resolver
            .find_type_definition("me.example.Point", LookupContext::none())
            .unwrap();
        assert_eq!(qualified.qualified_name(), "me.example.Point");

        let simple = resolver
            .find_type_definition("Point", LookupContext::in_namespace("me.example"))
            .unwrap();
        assert_eq!(simple.qualified_name(), "me.example.Point");

        assert!(resolver
            .find_type_definition("Missing", LookupContext::none())
            .is_none());
    }

    #[test]
    fn definitions_are_memoized() {
        let mut ids = NodeIdGen::new();
        let resolver =
            InSourceSymbolResolver::new(vec![unit(&mut ids, "me.example", &["Point"])]);

        let first = resolver
            .find_type_definition("me.example.Point", LookupContext::none())
            .unwrap();
        let second = resolver
            .find_type_definition("Point", LookupContext::in_namespace("me.example"))
            .unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn finds_top_level_property_definition() {
        let mut ids = NodeIdGen::new();
        let mut base = (*unit(&mut ids, "me.example", &[])).clone();
        base.nodes.push(TopLevelNode::Property(PropertyDecl {
            id: ids.fresh(),
            name: "age".to_string(),
            ty: TypeExpr {
                id: ids.fresh(),
                kind: TypeExprKind::Primitive(PrimitiveTypeUsage::Int),
                span: Span::synthetic(),
            },
            initial_value: None,
            default_value: None,
            span: Span::synthetic(),
        }));
        let resolver = InSourceSymbolResolver::new(vec![Rc::new(base)]);

        let reference = PropertyRef {
            id: ids.fresh(),
            name: "age".to_string(),
            span: Span::synthetic(),
        };
        let found = resolver.find_definition(&reference).unwrap();
        assert_eq!(found.name, "age");
    }

    #[test]
    fn has_package_matches_prefixes() {
        let mut ids = NodeIdGen::new();
        let resolver =
            InSourceSymbolResolver::new(vec![unit(&mut ids, "me.example.geometry", &[])]);

        assert!(resolver.has_package("me.example.geometry"));
        assert!(resolver.has_package("me.example"));
        assert!(resolver.has_package("me"));
        assert!(!resolver.has_package("org"));
    }
}
