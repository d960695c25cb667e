//! Structured diagnostic reports.
//!
//! A diagnostic carries a code, severity, message, labeled spans, notes and
//! machine-applicable fix-its. Emission never aborts parsing; recovery is
//! decided by the reporting code.

use std::fmt;

use vela_ir::Span;

use crate::ErrorCode;

/// Severity of a diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }
}

/// A labeled source span attached to a diagnostic.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

/// A machine-applicable source edit attached to a diagnostic.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum FixIt {
    /// Insert `text` at the offset.
    Insert { at: u32, text: String },
    /// Remove the spanned source range.
    Remove { span: Span },
    /// Replace the spanned source range with `text`.
    Replace { span: Span, text: String },
}

impl FixIt {
    pub fn insert(at: u32, text: impl Into<String>) -> Self {
        FixIt::Insert {
            at,
            text: text.into(),
        }
    }

    pub fn remove(span: Span) -> Self {
        FixIt::Remove { span }
    }

    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        FixIt::Replace {
            span,
            text: text.into(),
        }
    }
}

/// A structured diagnostic report.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub fixits: Vec<FixIt>,
    /// Ranges highlighted without a label of their own.
    pub highlights: Vec<Span>,
}

impl Diagnostic {
    /// Start an error diagnostic. The message defaults to the code's
    /// description and is usually refined with `with_message`.
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: code.description().to_owned(),
            labels: Vec::new(),
            notes: Vec::new(),
            fixits: Vec::new(),
            highlights: Vec::new(),
        }
    }

    /// Start a warning diagnostic.
    pub fn warning(code: ErrorCode) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(code)
        }
    }

    /// Start a note diagnostic, attached to a previously reported location.
    pub fn note(code: ErrorCode) -> Self {
        Diagnostic {
            severity: Severity::Note,
            ..Diagnostic::error(code)
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach the primary label.
    #[must_use]
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            message: message.into(),
            is_primary: true,
        });
        self
    }

    /// Attach a secondary label.
    #[must_use]
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            message: message.into(),
            is_primary: false,
        });
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Attach an insertion fix-it.
    #[must_use]
    pub fn with_fixit_insert(mut self, at: u32, text: impl Into<String>) -> Self {
        self.fixits.push(FixIt::insert(at, text));
        self
    }

    /// Attach a removal fix-it.
    #[must_use]
    pub fn with_fixit_remove(mut self, span: Span) -> Self {
        self.fixits.push(FixIt::remove(span));
        self
    }

    /// Attach a replacement fix-it.
    #[must_use]
    pub fn with_fixit_replace(mut self, span: Span, text: impl Into<String>) -> Self {
        self.fixits.push(FixIt::replace(span, text));
        self
    }

    /// Highlight a range without labeling it.
    #[must_use]
    pub fn with_highlight(mut self, span: Span) -> Self {
        self.highlights.push(span);
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// The span of the primary label, if one was attached.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {}",
            self.severity.as_str(),
            self.code,
            self.message
        )?;
        for label in &self.labels {
            write!(f, "\n  --> {}: {}", label.span, label.message)?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}
