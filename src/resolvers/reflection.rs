// src/resolvers/reflection.rs
//! Reifies core platform classes on demand.
//!
//! The compiler process has no JVM to reflect into, so the platform class
//! library is served from a bundled catalog of the core `java.lang`,
//! `java.util`, and `java.io` classes the language depends on, descriptors
//! and overloads included. Anything outside the catalog is simply not
//! found. Built definitions are memoized per qualified name.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::ast::{PropertyDecl, PropertyRef};
use crate::definitions::{ExternalTypeBuilder, TypeDefinition};
use crate::jvm::JvmMethodDescriptor;
use crate::resolvers::{CallQuery, LookupContext, ParentLink, SymbolInfo, SymbolResolver};
use crate::typesystem::TypeUsage;

const PACKAGES: &[&str] = &["java", "java.lang", "java.util", "java.io"];

pub struct ReflectionSymbolResolver {
    cache: RefCell<FxHashMap<String, Option<Rc<TypeDefinition>>>>,
    parent: ParentLink,
}

impl Default for ReflectionSymbolResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ReflectionSymbolResolver {
    pub fn new() -> Self {
        Self {
            cache: RefCell::new(FxHashMap::default()),
            parent: ParentLink::default(),
        }
    }

    /// Simple names resolve against `java.lang`, mirroring the implicit
    /// import every compilation unit gets.
    fn qualify(name: &str) -> String {
        if name.contains('.') {
            name.to_string()
        } else {
            format!("java.lang.{}", name)
        }
    }

    fn lookup(&self, name: &str) -> Option<Rc<TypeDefinition>> {
        let qualified = Self::qualify(name);
        if let Some(cached) = self.cache.borrow().get(&qualified) {
            return cached.clone();
        }
        let built = catalog_entry(&qualified).map(|builder| {
            tracing::trace!(name = %qualified, "reifying platform class");
            let definition = builder
                .build()
                .expect("catalog descriptors are well-formed");
            Rc::new(TypeDefinition::Reflective(definition))
        });
        self.cache
            .borrow_mut()
            .insert(qualified, built.clone());
        built
    }
}

impl SymbolResolver for ReflectionSymbolResolver {
    fn find_definition(&self, _reference: &PropertyRef) -> Option<PropertyDecl> {
        None
    }

    fn find_type_definition(
        &self,
        name: &str,
        _ctx: LookupContext<'_>,
    ) -> Option<Rc<TypeDefinition>> {
        self.lookup(name)
    }

    fn find_type_usage(&self, name: &str, _ctx: LookupContext<'_>) -> Option<TypeUsage> {
        self.lookup(name)
            .map(|definition| TypeUsage::reference(definition.qualified_name()))
    }

    fn find_jvm_definition(&self, call: &CallQuery) -> Option<JvmMethodDescriptor> {
        let definition = self.lookup(&call.type_name)?;
        definition
            .find_method_by_descriptors(
                &call.method_name,
                &call.argument_types,
                call.static_context,
                self,
            )
            .ok()
    }

    fn find_symbol(&self, _name: &str, _ctx: LookupContext<'_>) -> Option<SymbolInfo> {
        None
    }

    fn has_package(&self, name: &str) -> bool {
        PACKAGES.contains(&name)
    }

    fn parent(&self) -> Option<Rc<dyn SymbolResolver>> {
        self.parent.get()
    }

    fn set_parent(&self, parent: &Rc<dyn SymbolResolver>) {
        self.parent.set(parent);
    }
}

/// The bundled class catalog. Descriptors are the real ones from the
/// platform class library.
fn catalog_entry(qualified_name: &str) -> Option<ExternalTypeBuilder> {
    let builder = match qualified_name {
        "java.lang.Object" => ExternalTypeBuilder::class("java.lang.Object")
            .constructor("()V")
            .method("toString", "()Ljava/lang/String;")
            .method("hashCode", "()I")
            .method("equals", "(Ljava/lang/Object;)Z")
            .method("getClass", "()Ljava/lang/Class;"),

        "java.lang.String" => ExternalTypeBuilder::class("java.lang.String")
            .superclass("java.lang.Object")
            .implements("java.lang.CharSequence")
            .implements("java.lang.Comparable")
            .constructor("()V")
            .constructor("(Ljava/lang/String;)V")
            .method("length", "()I")
            .method("isEmpty", "()Z")
            .method("charAt", "(I)C")
            .method("substring", "(I)Ljava/lang/String;")
            .method("substring", "(II)Ljava/lang/String;")
            .method("concat", "(Ljava/lang/String;)Ljava/lang/String;")
            .method("equals", "(Ljava/lang/Object;)Z")
            .method("hashCode", "()I")
            .method("toString", "()Ljava/lang/String;")
            .static_method("valueOf", "(I)Ljava/lang/String;")
            .static_method("valueOf", "(J)Ljava/lang/String;")
            .static_method("valueOf", "(D)Ljava/lang/String;")
            .static_method("valueOf", "(Z)Ljava/lang/String;")
            .static_method("valueOf", "(Ljava/lang/Object;)Ljava/lang/String;"),

        "java.lang.CharSequence" => ExternalTypeBuilder::interface("java.lang.CharSequence")
            .method("length", "()I")
            .method("charAt", "(I)C"),

        "java.lang.Comparable" => ExternalTypeBuilder::interface("java.lang.Comparable")
            .method("compareTo", "(Ljava/lang/Object;)I"),

        "java.lang.Class" => ExternalTypeBuilder::class("java.lang.Class")
            .superclass("java.lang.Object")
            .method("getName", "()Ljava/lang/String;")
            .method("getSimpleName", "()Ljava/lang/String;"),

        "java.lang.Number" => ExternalTypeBuilder::class("java.lang.Number")
            .superclass("java.lang.Object")
            .constructor("()V")
            .method("intValue", "()I")
            .method("longValue", "()J")
            .method("doubleValue", "()D"),

        "java.lang.Integer" => ExternalTypeBuilder::class("java.lang.Integer")
            .superclass("java.lang.Number")
            .implements("java.lang.Comparable")
            .constructor("(I)V")
            .method("intValue", "()I")
            .method("toString", "()Ljava/lang/String;")
            .static_method("valueOf", "(I)Ljava/lang/Integer;")
            .static_method("parseInt", "(Ljava/lang/String;)I"),

        "java.lang.Double" => ExternalTypeBuilder::class("java.lang.Double")
            .superclass("java.lang.Number")
            .implements("java.lang.Comparable")
            .constructor("(D)V")
            .method("doubleValue", "()D")
            .method("toString", "()Ljava/lang/String;")
            .static_method("valueOf", "(D)Ljava/lang/Double;")
            .static_method("parseDouble", "(Ljava/lang/String;)D"),

        "java.lang.Boolean" => ExternalTypeBuilder::class("java.lang.Boolean")
            .superclass("java.lang.Object")
            .constructor("(Z)V")
            .method("booleanValue", "()Z")
            .method("toString", "()Ljava/lang/String;")
            .static_method("valueOf", "(Z)Ljava/lang/Boolean;"),

        "java.lang.StringBuilder" => ExternalTypeBuilder::class("java.lang.StringBuilder")
            .superclass("java.lang.Object")
            .implements("java.lang.CharSequence")
            .constructor("()V")
            .constructor("(Ljava/lang/String;)V")
            .method("append", "(Ljava/lang/String;)Ljava/lang/StringBuilder;")
            .method("append", "(I)Ljava/lang/StringBuilder;")
            .method("append", "(D)Ljava/lang/StringBuilder;")
            .method("append", "(Z)Ljava/lang/StringBuilder;")
            .method("append", "(Ljava/lang/Object;)Ljava/lang/StringBuilder;")
            .method("length", "()I")
            .method("charAt", "(I)C")
            .method("toString", "()Ljava/lang/String;"),

        "java.lang.System" => ExternalTypeBuilder::class("java.lang.System")
            .superclass("java.lang.Object")
            .field("out", "Ljava/io/PrintStream;", true, true)
            .field("err", "Ljava/io/PrintStream;", true, true)
            .static_method("currentTimeMillis", "()J")
            .static_method("getProperty", "(Ljava/lang/String;)Ljava/lang/String;"),

        "java.io.PrintStream" => ExternalTypeBuilder::class("java.io.PrintStream")
            .superclass("java.lang.Object")
            .method("println", "()V")
            .method("println", "(Ljava/lang/String;)V")
            .method("println", "(I)V")
            .method("println", "(J)V")
            .method("println", "(D)V")
            .method("println", "(Z)V")
            .method("println", "(C)V")
            .method("println", "(Ljava/lang/Object;)V")
            .method("print", "(Ljava/lang/String;)V")
            .method("print", "(I)V"),

        "java.util.Map" => ExternalTypeBuilder::interface("java.util.Map")
            .method("get", "(Ljava/lang/Object;)Ljava/lang/Object;")
            .method("put", "(Ljava/lang/Object;Ljava/lang/Object;)Ljava/lang/Object;")
            .method("containsKey", "(Ljava/lang/Object;)Z")
            .method("size", "()I")
            .method("isEmpty", "()Z"),

        "java.util.HashMap" => ExternalTypeBuilder::class("java.util.HashMap")
            .superclass("java.lang.Object")
            .implements("java.util.Map")
            .constructor("()V")
            .constructor("(I)V")
            .method("get", "(Ljava/lang/Object;)Ljava/lang/Object;")
            .method("put", "(Ljava/lang/Object;Ljava/lang/Object;)Ljava/lang/Object;")
            .method("containsKey", "(Ljava/lang/Object;)Z")
            .method("size", "()I")
            .method("isEmpty", "()Z"),

        _ => return None,
    };
    Some(builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_string_by_simple_and_qualified_name() {
        let resolver = ReflectionSymbolResolver::new();

        let simple = resolver
            .find_type_definition("String", LookupContext::none())
            .unwrap();
        assert_eq!(simple.qualified_name(), "java.lang.String");

        let qualified = resolver
            .find_type_definition("java.lang.String", LookupContext::none())
            .unwrap();
        assert!(Rc::ptr_eq(&simple, &qualified));
    }

    #[test]
    fn unknown_names_are_not_found() {
        let resolver = ReflectionSymbolResolver::new();
        assert!(resolver
            .find_type_definition("java.lang.Nonexistent", LookupContext::none())
            .is_none());
        assert!(resolver
            .find_type_definition("com.example.Custom", LookupContext::none())
            .is_none());
    }

    #[test]
    fn object_ancestry_ends_at_object() {
        let resolver = ReflectionSymbolResolver::new();
        let object = resolver
            .find_type_definition("java.lang.Object", LookupContext::none())
            .unwrap();
        assert!(object.ancestors(&resolver).is_empty());
        assert!(object.superclass(&resolver).is_none());

        let string = resolver
            .find_type_definition("String", LookupContext::none())
            .unwrap();
        let ancestors = string.ancestors(&resolver);
        assert_eq!(ancestors[0].qualified_name(), "java.lang.Object");
        assert!(ancestors
            .iter()
            .any(|a| a.qualified_name() == "java.lang.CharSequence"));
    }

    #[test]
    fn overloading_is_preserved_for_platform_classes() {
        let resolver = ReflectionSymbolResolver::new();
        let found = resolver.find_jvm_definition(&CallQuery {
            type_name: "java.lang.String".to_string(),
            method_name: "valueOf".to_string(),
            argument_types: vec![crate::jvm::JvmType::double()],
            static_context: true,
        });
        assert_eq!(found.unwrap().descriptor(), "(D)Ljava/lang/String;");
    }

    #[test]
    fn has_package_covers_the_catalog() {
        let resolver = ReflectionSymbolResolver::new();
        assert!(resolver.has_package("java.lang"));
        assert!(resolver.has_package("java.util"));
        assert!(!resolver.has_package("com.example"));
    }
}
