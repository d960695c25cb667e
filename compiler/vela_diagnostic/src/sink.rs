//! Write-only diagnostic sink.

use crate::{Diagnostic, Severity};

/// Collects diagnostics during a parse.
///
/// The sink is write-only from the parser's point of view: emission never
/// fails and never aborts parsing.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Number of error-severity diagnostics recorded so far.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Error))
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// Consume the sink, yielding the recorded diagnostics in emission order.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use vela_ir::Span;

    #[test]
    fn counts_only_errors() {
        let mut sink = DiagnosticSink::new();
        sink.emit(Diagnostic::error(ErrorCode::E1001).with_label(Span::new(0, 1), "here"));
        sink.emit(Diagnostic::note(ErrorCode::E1052));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.error_count(), 1);
        assert!(sink.has_errors());
    }
}
