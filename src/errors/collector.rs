// src/errors/collector.rs
//! The sink semantic validation reports into.
//!
//! Validation keeps walking after recoverable errors so a single run
//! surfaces as many diagnostics as possible; the collector preserves
//! report order.

use crate::errors::SemanticError;

#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<SemanticError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, error: SemanticError) {
        tracing::debug!(%error, "semantic error recorded");
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SemanticError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_preserves_order() {
        let mut collector = ErrorCollector::new();
        assert!(!collector.has_errors());

        collector.record(SemanticError::MultipleExplicitConstructors {
            span: (0, 1).into(),
        });
        collector.record(SemanticError::UnresolvedName {
            name: "Foo".to_string(),
            span: (5, 3).into(),
        });

        assert!(collector.has_errors());
        assert_eq!(collector.len(), 2);
        assert!(matches!(
            collector.errors()[0],
            SemanticError::MultipleExplicitConstructors { .. }
        ));
        assert!(matches!(
            collector.errors()[1],
            SemanticError::UnresolvedName { .. }
        ));
    }
}
