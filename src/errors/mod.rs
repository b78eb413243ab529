// src/errors/mod.rs
//! Structured error reporting for the Turin front end.
//!
//! Semantic diagnostics carry source spans and miette codes; resolver
//! lookups represent absence with `Option` and never error on not-found.

pub mod collector;
pub mod sema;

pub use collector::ErrorCollector;
pub use sema::SemanticError;

use std::path::PathBuf;
use thiserror::Error;

/// An archive container that cannot be read.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("cannot open archive '{path}': {source}")]
    MalformedArchive {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ArchiveError {
    pub fn malformed(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ArchiveError::MalformedArchive {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// A violated postcondition. Indicates a compiler bug, never a user error;
/// aborts the compilation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("internal compiler error: {message}")]
pub struct InternalError {
    pub message: String,
}

impl InternalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_error_display() {
        let err = InternalError::new("descriptor lookup on ill-typed arguments");
        assert_eq!(
            err.to_string(),
            "internal compiler error: descriptor lookup on ill-typed arguments"
        );
    }
}
