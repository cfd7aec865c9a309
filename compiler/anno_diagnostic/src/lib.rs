//! Diagnostics for annotation metadata resolution.
//!
//! Resolution itself never fails on bad annotation usage. Invalid member
//! values and deprecated annotations are reported here, against the element
//! they were written on, and the caller decides what to do with them.

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
