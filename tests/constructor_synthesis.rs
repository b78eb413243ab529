// tests/constructor_synthesis.rs
//! Implicit constructor synthesis over properties, inheritance, and the
//! defaults-map protocol.

mod common;

use common::{AstFactory, person_members, point_unit};
use turinc::ast::{TopLevelNode, TypeMember};
use turinc::compiler::{Compiler, CompilerOptions};
use turinc::definitions::{ActualArgument, CallError, DefinitionError};
use turinc::resolvers::{LookupContext, SymbolResolver};
use turinc::typesystem::TypeUsage;

#[test]
fn point_constructor_descriptor_and_calls() {
    let mut f = AstFactory::new();
    let unit = point_unit(&mut f, "me.example");
    let compiler = Compiler::new(vec![unit], CompilerOptions::default()).unwrap();
    let resolver = compiler.resolver();

    let point = resolver
        .find_type_definition("me.example.Point", LookupContext::none())
        .unwrap();

    let constructors = point.constructors(resolver.as_ref()).unwrap();
    assert_eq!(constructors.len(), 1);
    assert_eq!(
        constructors[0].jvm_descriptor().descriptor(),
        "(ILjava/util/Map;)V"
    );
    assert_eq!(
        constructors[0].jvm_descriptor().owner_internal_name(),
        "me/example/Point"
    );

    // Point(3)
    let positional = [ActualArgument::positional(TypeUsage::int())];
    assert!(point
        .resolve_constructor_call(&positional, resolver.as_ref())
        .is_ok());

    // Point(3, y=7)
    let with_override = [
        ActualArgument::positional(TypeUsage::int()),
        ActualArgument::named("y", TypeUsage::int()),
    ];
    assert!(point
        .resolve_constructor_call(&with_override, resolver.as_ref())
        .is_ok());

    // Point(y=7): x stays unbound
    let missing_x = [ActualArgument::named("y", TypeUsage::int())];
    match point.resolve_constructor_call(&missing_x, resolver.as_ref()) {
        Err(CallError::UnresolvedConstructor { type_name, .. }) => {
            assert_eq!(type_name, "me.example.Point");
        }
        other => panic!("expected UnresolvedConstructor, got {:?}", other),
    }
}

#[test]
fn person_parameter_order_and_map_tail() {
    let mut f = AstFactory::new();
    let members = person_members(&mut f);
    let person = f.type_decl("Person", None, members);
    let unit = f.unit("me.example", vec![TopLevelNode::Type(person)]);

    let compiler = Compiler::new(vec![unit], CompilerOptions::default()).unwrap();
    let resolver = compiler.resolver();
    let person = resolver
        .find_type_definition("me.example.Person", LookupContext::none())
        .unwrap();

    let constructors = person.constructors(resolver.as_ref()).unwrap();
    assert_eq!(constructors.len(), 1);
    let names: Vec<&str> = constructors[0]
        .formal_parameters()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["name", "age", "nickname"]);
    assert_eq!(
        constructors[0].jvm_descriptor().descriptor(),
        "(Ljava/lang/String;Ljava/util/Map;)V"
    );
    assert_eq!(
        constructors[0].defaulted_parameter_names(),
        ["age", "nickname"]
    );

    // Person(name="A", age=1)
    let named = [
        ActualArgument::named("name", TypeUsage::string()),
        ActualArgument::named("age", TypeUsage::int()),
    ];
    assert!(person
        .resolve_constructor_call(&named, resolver.as_ref())
        .is_ok());

    // positional after named
    let ill_ordered = [
        ActualArgument::named("age", TypeUsage::int()),
        ActualArgument::positional(TypeUsage::string()),
    ];
    assert!(matches!(
        person.resolve_constructor_call(&ill_ordered, resolver.as_ref()),
        Err(CallError::IllOrderedParameters)
    ));
}

#[test]
fn employee_inherits_person_parameters() {
    let mut f = AstFactory::new();
    let members = person_members(&mut f);
    let person = f.type_decl("Person", None, members);

    let salary_ty = f.double_type();
    let salary = f.property("salary", salary_ty);
    let base = f.named_type("Person");
    let employee = f.type_decl("Employee", Some(base), vec![TypeMember::Property(salary)]);

    let unit = f.unit(
        "me.example",
        vec![TopLevelNode::Type(person), TopLevelNode::Type(employee)],
    );
    let compiler = Compiler::new(vec![unit], CompilerOptions::default()).unwrap();
    let resolver = compiler.resolver();

    let employee = resolver
        .find_type_definition("me.example.Employee", LookupContext::none())
        .unwrap();
    let constructors = employee.constructors(resolver.as_ref()).unwrap();
    let names: Vec<&str> = constructors[0]
        .formal_parameters()
        .iter()
        .map(|p| p.name.as_str())
        .collect();

    // Inherited then own, stably sorted: defaulted parameters go last.
    assert_eq!(names, ["name", "salary", "age", "nickname"]);
    assert_eq!(
        constructors[0].jvm_descriptor().descriptor(),
        "(Ljava/lang/String;DLjava/util/Map;)V"
    );
}

#[test]
fn base_with_two_constructors_is_unsupported() {
    // java.lang.String carries two catalog constructors.
    let mut f = AstFactory::new();
    let base = f.named_type("String");
    let sub = f.type_decl("Text", Some(base), vec![]);
    let unit = f.unit("me.example", vec![TopLevelNode::Type(sub)]);

    let compiler = Compiler::new(vec![unit], CompilerOptions::default()).unwrap();
    let resolver = compiler.resolver();
    let text = resolver
        .find_type_definition("me.example.Text", LookupContext::none())
        .unwrap();

    match text.constructors(resolver.as_ref()) {
        Err(DefinitionError::UnsupportedInheritance { base, .. }) => {
            assert_eq!(base, "java.lang.String");
        }
        other => panic!("expected UnsupportedInheritance, got {:?}", other),
    }
}

#[test]
fn properties_with_initializers_never_reach_the_constructor() {
    let mut f = AstFactory::new();
    let x_ty = f.int_type();
    let x = f.property("x", x_ty);
    let cached_ty = f.int_type();
    let init = f.int_lit(42);
    let cached = f.property_with_initializer("cached", cached_ty, init);
    let decl = f.type_decl(
        "Holder",
        None,
        vec![TypeMember::Property(x), TypeMember::Property(cached)],
    );
    let unit = f.unit("me.example", vec![TopLevelNode::Type(decl)]);

    let compiler = Compiler::new(vec![unit], CompilerOptions::default()).unwrap();
    let resolver = compiler.resolver();
    let holder = resolver
        .find_type_definition("me.example.Holder", LookupContext::none())
        .unwrap();

    let constructors = holder.constructors(resolver.as_ref()).unwrap();
    let names: Vec<&str> = constructors[0]
        .formal_parameters()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["x"]);
    assert_eq!(constructors[0].jvm_descriptor().descriptor(), "(I)V");
}

#[test]
fn stable_sort_preserves_order_within_groups() {
    let mut f = AstFactory::new();
    let a_ty = f.int_type();
    let one = f.int_lit(1);
    let a = f.property_with_default("a", a_ty, one);
    let b_ty = f.int_type();
    let b = f.property("b", b_ty);
    let c_ty = f.string_type();
    let x = f.string_lit("x");
    let c = f.property_with_default("c", c_ty, x);
    let d_ty = f.double_type();
    let d = f.property("d", d_ty);

    let decl = f.type_decl(
        "Mixed",
        None,
        vec![
            TypeMember::Property(a),
            TypeMember::Property(b),
            TypeMember::Property(c),
            TypeMember::Property(d),
        ],
    );
    let unit = f.unit("me.example", vec![TopLevelNode::Type(decl)]);

    let compiler = Compiler::new(vec![unit], CompilerOptions::default()).unwrap();
    let resolver = compiler.resolver();
    let mixed = resolver
        .find_type_definition("me.example.Mixed", LookupContext::none())
        .unwrap();

    let constructors = mixed.constructors(resolver.as_ref()).unwrap();
    let names: Vec<&str> = constructors[0]
        .formal_parameters()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["b", "d", "a", "c"]);
}

#[test]
fn explicit_constructor_is_used_verbatim() {
    let mut f = AstFactory::new();
    let x_ty = f.int_type();
    let x = f.property("x", x_ty);
    let p_ty = f.int_type();
    let param = f.param("initial", p_ty);
    let ctor = f.constructor(vec![param]);
    let decl = f.type_decl(
        "Counter",
        None,
        vec![TypeMember::Property(x), TypeMember::Constructor(ctor)],
    );
    let unit = f.unit("me.example", vec![TopLevelNode::Type(decl)]);

    let compiler = Compiler::new(vec![unit], CompilerOptions::default()).unwrap();
    let resolver = compiler.resolver();
    let counter = resolver
        .find_type_definition("me.example.Counter", LookupContext::none())
        .unwrap();

    let constructors = counter.constructors(resolver.as_ref()).unwrap();
    assert_eq!(constructors.len(), 1);
    let names: Vec<&str> = constructors[0]
        .formal_parameters()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["initial"]);
    assert_eq!(constructors[0].jvm_descriptor().descriptor(), "(I)V");
}

#[test]
fn initialization_is_idempotent() {
    let mut f = AstFactory::new();
    let unit = point_unit(&mut f, "me.example");
    let compiler = Compiler::new(vec![unit], CompilerOptions::default()).unwrap();
    let resolver = compiler.resolver();
    let point = resolver
        .find_type_definition("me.example.Point", LookupContext::none())
        .unwrap();

    let first = point.constructors(resolver.as_ref()).unwrap();
    let second = point.constructors(resolver.as_ref()).unwrap();
    assert_eq!(first, second);

    let methods_first = point.methods(resolver.as_ref()).unwrap();
    let methods_second = point.methods(resolver.as_ref()).unwrap();
    assert_eq!(methods_first.len(), methods_second.len());
}

#[test]
fn accessors_are_materialized_per_property() {
    let mut f = AstFactory::new();
    let unit = point_unit(&mut f, "me.example");
    let compiler = Compiler::new(vec![unit], CompilerOptions::default()).unwrap();
    let resolver = compiler.resolver();
    let point = resolver
        .find_type_definition("me.example.Point", LookupContext::none())
        .unwrap();

    let mut names: Vec<String> = point
        .methods(resolver.as_ref())
        .unwrap()
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    names.sort();
    assert_eq!(names, ["getX", "getY", "setX", "setY"]);

    let getter = point
        .find_method("getX", &[], false, resolver.as_ref())
        .unwrap()
        .unwrap();
    assert_eq!(getter.jvm_descriptor().descriptor(), "()I");
    assert_eq!(getter.return_type(), &TypeUsage::int());

    let setter = point
        .find_method(
            "setY",
            &[ActualArgument::positional(TypeUsage::int())],
            false,
            resolver.as_ref(),
        )
        .unwrap()
        .unwrap();
    assert_eq!(setter.jvm_descriptor().descriptor(), "(I)V");
}
