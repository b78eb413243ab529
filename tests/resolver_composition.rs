// tests/resolver_composition.rs
//! Shadowing and first-hit-wins delegation across the resolver stack.

mod common;

use common::{AstFactory, point_unit};
use std::rc::Rc;
use turinc::ast::TopLevelNode;
use turinc::compiler::{Compiler, CompilerOptions};
use turinc::resolvers::{
    ComposedSymbolResolver, InSourceSymbolResolver, LookupContext, ReflectionSymbolResolver,
    SymbolResolver,
};

#[test]
fn jdk_types_resolve_through_the_stack() {
    let mut f = AstFactory::new();
    let unit = point_unit(&mut f, "me.example");
    let compiler = Compiler::new(vec![unit], CompilerOptions::default()).unwrap();
    let resolver = compiler.resolver();

    let string = resolver
        .find_type_definition("String", LookupContext::none())
        .unwrap();
    assert_eq!(string.qualified_name(), "java.lang.String");
    assert!(string.is_class());

    let map = resolver
        .find_type_definition("java.util.Map", LookupContext::none())
        .unwrap();
    assert!(map.is_interface());
}

#[test]
fn in_source_types_shadow_platform_types() {
    // A source type deliberately named like the platform's String.
    let mut f = AstFactory::new();
    let decl = f.type_decl("String", None, vec![]);
    let unit = f.unit("me.example", vec![TopLevelNode::Type(decl)]);

    let in_source = Rc::new(InSourceSymbolResolver::new(vec![Rc::new(unit)]));
    let jdk = Rc::new(ReflectionSymbolResolver::new());
    let composed = ComposedSymbolResolver::new(vec![in_source, jdk]);

    let found = composed
        .find_type_definition("String", LookupContext::none())
        .unwrap();
    assert_eq!(found.qualified_name(), "me.example.String");

    // The platform definition is still reachable by qualified name.
    let platform = composed
        .find_type_definition("java.lang.String", LookupContext::none())
        .unwrap();
    assert_eq!(platform.qualified_name(), "java.lang.String");
}

#[test]
fn composition_order_decides_shadowing() {
    let mut f = AstFactory::new();
    let decl = f.type_decl("String", None, vec![]);
    let unit = Rc::new(f.unit("me.example", vec![TopLevelNode::Type(decl)]));

    let source_first = ComposedSymbolResolver::new(vec![
        Rc::new(InSourceSymbolResolver::new(vec![unit.clone()])),
        Rc::new(ReflectionSymbolResolver::new()),
    ]);
    let jdk_first = ComposedSymbolResolver::new(vec![
        Rc::new(ReflectionSymbolResolver::new()),
        Rc::new(InSourceSymbolResolver::new(vec![unit])),
    ]);

    assert_eq!(
        source_first
            .find_type_definition("String", LookupContext::none())
            .unwrap()
            .qualified_name(),
        "me.example.String"
    );
    assert_eq!(
        jdk_first
            .find_type_definition("String", LookupContext::none())
            .unwrap()
            .qualified_name(),
        "java.lang.String"
    );
}

#[test]
fn package_queries_union_across_children() {
    let mut f = AstFactory::new();
    let unit = point_unit(&mut f, "me.example");
    let compiler = Compiler::new(vec![unit], CompilerOptions::default()).unwrap();
    let resolver = compiler.resolver();

    assert!(resolver.has_package("me.example"));
    assert!(resolver.has_package("java.lang"));
    assert!(!resolver.has_package("org.absent"));
}

#[test]
fn ancestors_of_source_type_default_to_object() {
    let mut f = AstFactory::new();
    let unit = point_unit(&mut f, "me.example");
    let compiler = Compiler::new(vec![unit], CompilerOptions::default()).unwrap();
    let resolver = compiler.resolver();

    let point = resolver
        .find_type_definition("me.example.Point", LookupContext::none())
        .unwrap();
    let ancestors = point.ancestors(resolver.as_ref());
    assert_eq!(ancestors.len(), 1);
    assert_eq!(ancestors[0].qualified_name(), "java.lang.Object");

    let superclass = point.superclass(resolver.as_ref()).unwrap();
    assert_eq!(superclass.qualified_name(), "java.lang.Object");
}

#[test]
fn internal_and_canonical_names_round_trip() {
    use turinc::jvm::{canonical_to_internal, internal_to_canonical};

    for name in ["me.example.Point", "java.lang.String", "Single"] {
        assert_eq!(internal_to_canonical(&canonical_to_internal(name)), name);
    }
}
