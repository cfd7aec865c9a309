//! Reports collected while resolving annotation metadata.
//!
//! The queue remembers which elements have already failed validation so a
//! cached element is never validated, or reported, a second time.

use anno_ir::ElementId;
use rustc_hash::FxHashSet;

use crate::Diagnostic;

/// Limits applied when queueing reports.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Errors accepted before further reports are dropped; `0` disables the cap.
    pub error_limit: usize,
    /// Drop a report whose element, code and message match a queued one.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 100,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// No cap and no deduplication.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Reports in the order resolution produced them.
///
/// ```text
/// queue.add(Diagnostic::error(ErrorCode::E1001).with_element(field));
/// queue.mark_erroneous(field);
/// for report in queue.flush() { ... }
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    reports: Vec<Diagnostic>,
    errors: usize,
    erroneous: FxHashSet<ElementId>,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Queue `report`, returning `false` when the cap or deduplication
    /// rejected it.
    pub fn add(&mut self, report: Diagnostic) -> bool {
        let rejected = self.limit_reached()
            || (self.config.deduplicate && self.reports.iter().any(|q| same_report(q, &report)));
        if rejected {
            return false;
        }
        self.errors += usize::from(report.is_error());
        self.reports.push(report);
        true
    }

    /// Whether the error cap has been hit.
    pub fn limit_reached(&self) -> bool {
        match self.config.error_limit {
            0 => false,
            limit => self.errors >= limit,
        }
    }

    /// Record that `element` carries an invalid annotation.
    pub fn mark_erroneous(&mut self, element: ElementId) {
        self.erroneous.insert(element);
    }

    pub fn is_erroneous(&self, element: ElementId) -> bool {
        self.erroneous.contains(&element)
    }

    /// Errors reported against `element`.
    pub fn errors_for(&self, element: ElementId) -> impl Iterator<Item = &Diagnostic> {
        self.reports_for(element).filter(|d| d.is_error())
    }

    /// Warnings reported against `element`.
    pub fn warnings_for(&self, element: ElementId) -> impl Iterator<Item = &Diagnostic> {
        self.reports_for(element).filter(|d| d.is_warning())
    }

    fn reports_for(&self, element: ElementId) -> impl Iterator<Item = &Diagnostic> {
        self.reports.iter().filter(move |d| d.concerns(element))
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn has_errors(&self) -> bool {
        self.errors != 0
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Hand every queued report to the caller. Erroneous marks survive.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.errors = 0;
        std::mem::take(&mut self.reports)
    }

    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reports.iter()
    }
}

fn same_report(a: &Diagnostic, b: &Diagnostic) -> bool {
    a.element == b.element && a.code == b.code && a.message == b.message
}

#[cfg(test)]
mod tests;
