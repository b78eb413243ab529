// src/errors/sema.rs
//! Semantic analysis errors (E2xxx).

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum SemanticError {
    #[error("unresolved name '{name}'")]
    #[diagnostic(code(E2001))]
    UnresolvedName {
        name: String,
        #[label("not found in any resolver")]
        span: SourceSpan,
    },

    #[error("no constructor of '{type_name}' matches ({arguments})")]
    #[diagnostic(code(E2002))]
    UnresolvedConstructor {
        type_name: String,
        arguments: String,
        #[label("no matching constructor")]
        span: SourceSpan,
    },

    #[error("no method '{name}' of '{type_name}' matches the given arguments")]
    #[diagnostic(code(E2003))]
    UnresolvedMethod {
        type_name: String,
        name: String,
        #[label("no matching method")]
        span: SourceSpan,
    },

    #[error("named arguments must all be grouped after the positional ones")]
    #[diagnostic(code(E2004))]
    IllOrderedParameters {
        #[label("positional argument after a named one")]
        span: SourceSpan,
    },

    #[error("only classes can be extended")]
    #[diagnostic(code(E2005))]
    InvalidExtension {
        name: String,
        #[label("'{name}' is not a class")]
        span: SourceSpan,
    },

    #[error("only interfaces can be implemented")]
    #[diagnostic(code(E2006))]
    InvalidImplementation {
        name: String,
        #[label("'{name}' is not an interface")]
        span: SourceSpan,
    },

    #[error("at most one explicit constructor can be defined")]
    #[diagnostic(code(E2007))]
    MultipleExplicitConstructors {
        #[label("extra constructor")]
        span: SourceSpan,
    },

    #[error("cannot inherit from '{base}': it does not have exactly one constructor")]
    #[diagnostic(code(E2008))]
    UnsupportedInheritance {
        base: String,
        #[label("base type declared here")]
        span: SourceSpan,
    },

    #[error("duplicate method '{name}'")]
    #[diagnostic(
        code(E2009),
        help("method overloading is not permitted in source-defined types")
    )]
    DuplicateMethod {
        name: String,
        #[label("name already registered")]
        span: SourceSpan,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = SemanticError::UnresolvedName {
            name: "Pint".to_string(),
            span: (0, 4).into(),
        };
        assert_eq!(err.to_string(), "unresolved name 'Pint'");

        let err = SemanticError::UnresolvedConstructor {
            type_name: "me.example.Point".to_string(),
            arguments: "y=7".to_string(),
            span: (0, 1).into(),
        };
        assert!(err.to_string().contains("me.example.Point"));
        assert!(err.to_string().contains("y=7"));
    }
}
