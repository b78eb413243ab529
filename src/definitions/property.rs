// src/definitions/property.rs
//! Properties of source-defined types.
//!
//! A `Property` is the semantic view of a property declaration: either one
//! declared in place, or a property reference resolved against a peer
//! top-level declaration.

use crate::ast::{PropertyDecl, PropertyRef};
use crate::definitions::FormalParameter;
use crate::resolvers::{LookupContext, SymbolResolver};
use crate::typesystem::{TypeUsage, resolve_type_expr};

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    ty: TypeUsage,
    has_initial_value: bool,
    has_default_value: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: TypeUsage) -> Self {
        Self {
            name: name.into(),
            ty,
            has_initial_value: false,
            has_default_value: false,
        }
    }

    /// Materialize from a property declared in place. None when the
    /// declared type cannot be resolved.
    pub fn from_declaration(
        decl: &PropertyDecl,
        resolver: &dyn SymbolResolver,
        ctx: LookupContext<'_>,
    ) -> Option<Self> {
        let ty = resolve_type_expr(&decl.ty, resolver, ctx)?;
        Some(Self {
            name: decl.name.clone(),
            ty,
            has_initial_value: decl.initial_value.is_some(),
            has_default_value: decl.default_value.is_some(),
        })
    }

    /// Materialize from a property reference by resolving it against a
    /// peer top-level property declaration.
    pub fn from_reference(
        reference: &PropertyRef,
        resolver: &dyn SymbolResolver,
        ctx: LookupContext<'_>,
    ) -> Option<Self> {
        let decl = resolver.find_definition(reference)?;
        Self::from_declaration(&decl, resolver, ctx)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_usage(&self) -> &TypeUsage {
        &self.ty
    }

    pub fn has_initial_value(&self) -> bool {
        self.has_initial_value
    }

    pub fn has_default_value(&self) -> bool {
        self.has_default_value
    }

    /// `x` becomes `getX`.
    pub fn getter_name(&self) -> String {
        format!("get{}", pascal_case(&self.name))
    }

    /// `x` becomes `setX`.
    pub fn setter_name(&self) -> String {
        format!("set{}", pascal_case(&self.name))
    }

    /// The formal parameter this property contributes to a synthesized
    /// constructor.
    pub fn to_formal_parameter(&self) -> FormalParameter {
        FormalParameter {
            name: self.name.clone(),
            ty: self.ty.clone(),
            has_default: self.has_default_value,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_default_value(mut self) -> Self {
        self.has_default_value = true;
        self
    }
}

/// Capitalize the first letter, Java bean style.
fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessor_names() {
        let p = Property::new("x", TypeUsage::int());
        assert_eq!(p.getter_name(), "getX");
        assert_eq!(p.setter_name(), "setX");

        let p = Property::new("nickName", TypeUsage::string());
        assert_eq!(p.getter_name(), "getNickName");
        assert_eq!(p.setter_name(), "setNickName");
    }

    #[test]
    fn formal_parameter_carries_default_flag() {
        let plain = Property::new("x", TypeUsage::int()).to_formal_parameter();
        assert!(!plain.has_default_value());

        let defaulted = Property::new("y", TypeUsage::int())
            .with_default_value()
            .to_formal_parameter();
        assert!(defaulted.has_default_value());
        assert_eq!(defaulted.name, "y");
    }
}
