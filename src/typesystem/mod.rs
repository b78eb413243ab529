// src/typesystem/mod.rs
//! Resolved type usages.
//!
//! A `TypeUsage` is a reference to a type at a use site: a primitive, void,
//! a reference to a named type (possibly parameterized), an array, or a type
//! variable. Type variables are carried as data only; nothing in this front
//! end resolves them to concrete types.

use crate::ast::{TypeExpr, TypeExprKind};
use crate::jvm::{JvmType, canonical_to_internal};
use crate::resolvers::{LookupContext, SymbolResolver};

/// Canonical name of the platform root object type.
pub const OBJECT: &str = "java.lang.Object";
/// Canonical name of the platform string type.
pub const STRING: &str = "java.lang.String";
/// Canonical name of the defaults-bag type appended to constructors with
/// defaulted parameters.
pub const MAP: &str = "java.util.Map";

/// Primitive types of the JVM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTypeUsage {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveTypeUsage {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveTypeUsage::Boolean => "boolean",
            PrimitiveTypeUsage::Char => "char",
            PrimitiveTypeUsage::Byte => "byte",
            PrimitiveTypeUsage::Short => "short",
            PrimitiveTypeUsage::Int => "int",
            PrimitiveTypeUsage::Long => "long",
            PrimitiveTypeUsage::Float => "float",
            PrimitiveTypeUsage::Double => "double",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(PrimitiveTypeUsage::Boolean),
            "char" => Some(PrimitiveTypeUsage::Char),
            "byte" => Some(PrimitiveTypeUsage::Byte),
            "short" => Some(PrimitiveTypeUsage::Short),
            "int" => Some(PrimitiveTypeUsage::Int),
            "long" => Some(PrimitiveTypeUsage::Long),
            "float" => Some(PrimitiveTypeUsage::Float),
            "double" => Some(PrimitiveTypeUsage::Double),
            _ => None,
        }
    }

    pub fn jvm_type(self) -> JvmType {
        match self {
            PrimitiveTypeUsage::Boolean => JvmType::boolean(),
            PrimitiveTypeUsage::Char => JvmType::char(),
            PrimitiveTypeUsage::Byte => JvmType::byte(),
            PrimitiveTypeUsage::Short => JvmType::short(),
            PrimitiveTypeUsage::Int => JvmType::int(),
            PrimitiveTypeUsage::Long => JvmType::long(),
            PrimitiveTypeUsage::Float => JvmType::float(),
            PrimitiveTypeUsage::Double => JvmType::double(),
        }
    }

    fn from_jvm_descriptor(letter: char) -> Option<Self> {
        match letter {
            'Z' => Some(PrimitiveTypeUsage::Boolean),
            'C' => Some(PrimitiveTypeUsage::Char),
            'B' => Some(PrimitiveTypeUsage::Byte),
            'S' => Some(PrimitiveTypeUsage::Short),
            'I' => Some(PrimitiveTypeUsage::Int),
            'J' => Some(PrimitiveTypeUsage::Long),
            'F' => Some(PrimitiveTypeUsage::Float),
            'D' => Some(PrimitiveTypeUsage::Double),
            _ => None,
        }
    }

    /// Implicit widening conversions between numeric primitives.
    pub fn can_widen_to(self, target: PrimitiveTypeUsage) -> bool {
        use PrimitiveTypeUsage::*;
        if self == target {
            return true;
        }
        match (self, target) {
            (Byte, Short | Int | Long | Float | Double) => true,
            (Short, Int | Long | Float | Double) => true,
            (Char, Int | Long | Float | Double) => true,
            (Int, Long | Float | Double) => true,
            (Long, Float | Double) => true,
            (Float, Double) => true,
            _ => false,
        }
    }
}

/// Reference to a named type, possibly with type arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTypeUsage {
    qualified_name: String,
    type_args: Vec<TypeUsage>,
}

impl ReferenceTypeUsage {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            type_args: Vec::new(),
        }
    }

    pub fn with_args(qualified_name: impl Into<String>, type_args: Vec<TypeUsage>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            type_args,
        }
    }

    /// `java.lang.Object`, the root of every ancestor chain.
    pub fn object() -> Self {
        Self::new(OBJECT)
    }

    pub fn string() -> Self {
        Self::new(STRING)
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn type_args(&self) -> &[TypeUsage] {
        &self.type_args
    }

    pub fn jvm_type(&self) -> JvmType {
        JvmType::object(&canonical_to_internal(&self.qualified_name))
    }
}

/// Where a type variable was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeVariableSite {
    Class { class: String },
    Method { class: String, method_signature: String },
    Constructor { class: String, constructor_signature: String },
}

/// A type variable. Data only: bounds are recorded but never solved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeVariableUsage {
    pub name: String,
    pub declared_on: TypeVariableSite,
    pub bounds: Vec<TypeUsage>,
}

/// A type at a use site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeUsage {
    Primitive(PrimitiveTypeUsage),
    Void,
    Reference(ReferenceTypeUsage),
    Array(Box<TypeUsage>),
    TypeVariable(TypeVariableUsage),
}

impl TypeUsage {
    pub fn reference(qualified_name: impl Into<String>) -> Self {
        TypeUsage::Reference(ReferenceTypeUsage::new(qualified_name))
    }

    pub fn string() -> Self {
        TypeUsage::Reference(ReferenceTypeUsage::string())
    }

    pub fn object() -> Self {
        TypeUsage::Reference(ReferenceTypeUsage::object())
    }

    pub fn int() -> Self {
        TypeUsage::Primitive(PrimitiveTypeUsage::Int)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeUsage::Void)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, TypeUsage::Reference(_))
    }

    pub fn as_reference(&self) -> Option<&ReferenceTypeUsage> {
        match self {
            TypeUsage::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// The JVM type backing this usage. Type variables have no descriptor
    /// in this front end, so they yield None.
    pub fn jvm_type(&self) -> Option<JvmType> {
        match self {
            TypeUsage::Primitive(p) => Some(p.jvm_type()),
            TypeUsage::Void => Some(JvmType::void()),
            TypeUsage::Reference(r) => Some(r.jvm_type()),
            TypeUsage::Array(elem) => elem.jvm_type().map(|e| JvmType::array_of(&e)),
            TypeUsage::TypeVariable(_) => None,
        }
    }

    /// Rebuild a usage from a JVM type descriptor.
    pub fn from_jvm_type(jvm: &JvmType) -> TypeUsage {
        let descriptor = jvm.descriptor();
        if descriptor == "V" {
            return TypeUsage::Void;
        }
        if let Some(internal) = jvm.internal_name() {
            return TypeUsage::Reference(ReferenceTypeUsage::new(
                crate::jvm::internal_to_canonical(internal),
            ));
        }
        if let Some(element) = jvm.element_type() {
            return TypeUsage::Array(Box::new(TypeUsage::from_jvm_type(&element)));
        }
        let letter = descriptor.chars().next().unwrap_or('V');
        match PrimitiveTypeUsage::from_jvm_descriptor(letter) {
            Some(p) => TypeUsage::Primitive(p),
            None => TypeUsage::Void,
        }
    }

    /// Whether a value of this type can be bound where `target` is expected.
    ///
    /// References widen along the ancestor chain, which may require the
    /// resolver to materialize the source type's definition.
    pub fn is_assignable_to(&self, target: &TypeUsage, resolver: &dyn SymbolResolver) -> bool {
        if self == target {
            return true;
        }
        match (self, target) {
            (TypeUsage::Primitive(from), TypeUsage::Primitive(to)) => from.can_widen_to(*to),
            (TypeUsage::Reference(from), TypeUsage::Reference(to)) => {
                if to.qualified_name() == OBJECT {
                    return true;
                }
                if from.qualified_name() == to.qualified_name() {
                    return true;
                }
                ancestors_of(from.qualified_name(), resolver)
                    .iter()
                    .any(|a| a == to.qualified_name())
            }
            (TypeUsage::Array(_), TypeUsage::Reference(to)) => to.qualified_name() == OBJECT,
            (TypeUsage::Array(from), TypeUsage::Array(to)) => from == to,
            _ => false,
        }
    }
}

/// Transitive ancestor names of a reference type, canonical form.
fn ancestors_of(qualified_name: &str, resolver: &dyn SymbolResolver) -> Vec<String> {
    match resolver.find_type_definition(qualified_name, LookupContext::none()) {
        Some(definition) => definition
            .ancestors(resolver)
            .iter()
            .map(|a| a.qualified_name().to_string())
            .collect(),
        None => Vec::new(),
    }
}

impl std::fmt::Display for TypeUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeUsage::Primitive(p) => write!(f, "{}", p.name()),
            TypeUsage::Void => write!(f, "void"),
            TypeUsage::Reference(r) => write!(f, "{}", r.qualified_name()),
            TypeUsage::Array(elem) => write!(f, "{}[]", elem),
            TypeUsage::TypeVariable(v) => write!(f, "{}", v.name),
        }
    }
}

/// Convert an AST type expression to a resolved type usage.
///
/// Named types go through the resolver; `string` is the language-level
/// alias for `java.lang.String`. Returns None when a named type cannot be
/// resolved, leaving the diagnostic to the caller.
pub fn resolve_type_expr(
    expr: &TypeExpr,
    resolver: &dyn SymbolResolver,
    ctx: LookupContext<'_>,
) -> Option<TypeUsage> {
    match &expr.kind {
        TypeExprKind::Primitive(p) => Some(TypeUsage::Primitive(*p)),
        TypeExprKind::Void => Some(TypeUsage::Void),
        TypeExprKind::Array(element) => {
            let element = resolve_type_expr(element, resolver, ctx)?;
            Some(TypeUsage::Array(Box::new(element)))
        }
        TypeExprKind::Named { name, type_args } => {
            if name == "string" && type_args.is_empty() {
                return Some(TypeUsage::string());
            }
            let base = resolver.find_type_usage(name, ctx)?;
            if type_args.is_empty() {
                return Some(base);
            }
            let args = type_args
                .iter()
                .map(|arg| resolve_type_expr(arg, resolver, ctx))
                .collect::<Option<Vec<_>>>()?;
            match base {
                TypeUsage::Reference(r) => Some(TypeUsage::Reference(
                    ReferenceTypeUsage::with_args(r.qualified_name().to_string(), args),
                )),
                other => Some(other),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_names_round_trip() {
        for p in [
            PrimitiveTypeUsage::Boolean,
            PrimitiveTypeUsage::Char,
            PrimitiveTypeUsage::Byte,
            PrimitiveTypeUsage::Short,
            PrimitiveTypeUsage::Int,
            PrimitiveTypeUsage::Long,
            PrimitiveTypeUsage::Float,
            PrimitiveTypeUsage::Double,
        ] {
            assert_eq!(PrimitiveTypeUsage::from_name(p.name()), Some(p));
        }
        assert_eq!(PrimitiveTypeUsage::from_name("string"), None);
    }

    #[test]
    fn primitive_widening() {
        use PrimitiveTypeUsage::*;
        assert!(Int.can_widen_to(Long));
        assert!(Int.can_widen_to(Double));
        assert!(Char.can_widen_to(Int));
        assert!(Float.can_widen_to(Double));
        assert!(!Long.can_widen_to(Int));
        assert!(!Boolean.can_widen_to(Int));
        assert!(!Int.can_widen_to(Boolean));
    }

    #[test]
    fn jvm_type_of_usages() {
        assert_eq!(TypeUsage::int().jvm_type(), Some(JvmType::int()));
        assert_eq!(TypeUsage::Void.jvm_type(), Some(JvmType::void()));
        assert_eq!(
            TypeUsage::string().jvm_type(),
            Some(JvmType::object("java/lang/String"))
        );
        let ints = TypeUsage::Array(Box::new(TypeUsage::int()));
        assert_eq!(ints.jvm_type().unwrap().descriptor(), "[I");

        let var = TypeUsage::TypeVariable(TypeVariableUsage {
            name: "T".to_string(),
            declared_on: TypeVariableSite::Class {
                class: "Foo".to_string(),
            },
            bounds: vec![],
        });
        assert_eq!(var.jvm_type(), None);
    }

    #[test]
    fn from_jvm_type_round_trip() {
        for usage in [
            TypeUsage::int(),
            TypeUsage::Void,
            TypeUsage::string(),
            TypeUsage::Array(Box::new(TypeUsage::Primitive(PrimitiveTypeUsage::Double))),
        ] {
            let jvm = usage.jvm_type().unwrap();
            assert_eq!(TypeUsage::from_jvm_type(&jvm), usage);
        }
    }

    #[test]
    fn display_forms() {
        assert_eq!(TypeUsage::int().to_string(), "int");
        assert_eq!(TypeUsage::string().to_string(), "java.lang.String");
        assert_eq!(
            TypeUsage::Array(Box::new(TypeUsage::int())).to_string(),
            "int[]"
        );
    }
}
