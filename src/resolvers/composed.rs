// src/resolvers/composed.rs
//! Combines several resolvers.
//!
//! Children are asked in order and the first present result wins, so
//! earlier resolvers shadow later ones. Every child is informed of its
//! parent at composition time.

use std::rc::Rc;

use crate::ast::{PropertyDecl, PropertyRef};
use crate::definitions::TypeDefinition;
use crate::jvm::JvmMethodDescriptor;
use crate::resolvers::{CallQuery, LookupContext, ParentLink, SymbolInfo, SymbolResolver};
use crate::typesystem::TypeUsage;

pub struct ComposedSymbolResolver {
    elements: Vec<Rc<dyn SymbolResolver>>,
    parent: ParentLink,
}

impl ComposedSymbolResolver {
    pub fn new(elements: Vec<Rc<dyn SymbolResolver>>) -> Rc<Self> {
        let composed = Rc::new(Self {
            elements,
            parent: ParentLink::default(),
        });
        let as_parent: Rc<dyn SymbolResolver> = composed.clone();
        for element in &composed.elements {
            element.set_parent(&as_parent);
        }
        composed
    }

    fn first_present<T>(&self, query: impl Fn(&dyn SymbolResolver) -> Option<T>) -> Option<T> {
        self.elements
            .iter()
            .find_map(|element| query(element.as_ref()))
    }
}

impl SymbolResolver for ComposedSymbolResolver {
    fn find_definition(&self, reference: &PropertyRef) -> Option<PropertyDecl> {
        self.first_present(|r| r.find_definition(reference))
    }

    fn find_type_definition(
        &self,
        name: &str,
        ctx: LookupContext<'_>,
    ) -> Option<Rc<TypeDefinition>> {
        self.first_present(|r| r.find_type_definition(name, ctx))
    }

    fn find_type_usage(&self, name: &str, ctx: LookupContext<'_>) -> Option<TypeUsage> {
        self.first_present(|r| r.find_type_usage(name, ctx))
    }

    fn find_jvm_definition(&self, call: &CallQuery) -> Option<JvmMethodDescriptor> {
        self.first_present(|r| r.find_jvm_definition(call))
    }

    fn find_symbol(&self, name: &str, ctx: LookupContext<'_>) -> Option<SymbolInfo> {
        self.first_present(|r| r.find_symbol(name, ctx))
    }

    fn has_package(&self, name: &str) -> bool {
        self.elements.iter().any(|r| r.has_package(name))
    }

    fn parent(&self) -> Option<Rc<dyn SymbolResolver>> {
        self.parent.get()
    }

    fn set_parent(&self, parent: &Rc<dyn SymbolResolver>) {
        self.parent.set(parent);
    }
}
