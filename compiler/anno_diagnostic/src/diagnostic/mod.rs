//! A single report about annotation usage on one element.

use std::fmt;

use anno_ir::ElementId;

use crate::ErrorCode;

/// Whether a report blocks the element or only informs about it.
///
/// Invalid member values are errors; deprecated annotations are warnings.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A report against the element an annotation was written on.
///
/// Annotations carry no source spans of their own, so the element stands in
/// for the location.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "an unqueued report is lost"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    /// Rendered as `@Simple.member: problem` for invalid values.
    pub message: String,
    /// `None` only for reports built outside resolution.
    pub element: Option<ElementId>,
    /// Follow-up hints, such as the replacement for a deprecated annotation.
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn blank(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            element: None,
            notes: Vec::new(),
        }
    }

    /// Start an error report with `code`.
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::blank(code, Severity::Error)
    }

    /// Start a warning report with `code`.
    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::blank(code, Severity::Warning)
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            ..self
        }
    }

    /// Report against `element`.
    pub fn with_element(self, element: ElementId) -> Self {
        Diagnostic {
            element: Some(element),
            ..self
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }

    /// Whether this report concerns `element`.
    pub fn concerns(&self, element: ElementId) -> bool {
        self.element == Some(element)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Diagnostic {
            code,
            severity,
            message,
            element,
            notes,
        } = self;
        write!(f, "{severity} [{code}]: {message}")?;
        if let Some(element) = element {
            write!(f, "\n  --> {element:?}")?;
        }
        notes
            .iter()
            .try_for_each(|note| write!(f, "\n  = note: {note}"))
    }
}

#[cfg(test)]
mod tests;
