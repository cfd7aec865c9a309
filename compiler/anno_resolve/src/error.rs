use anno_ir::InternError;
use thiserror::Error;

/// Failure reported by the host's element model.
///
/// `kind` names the host-side failure class (for javac, the exception class)
/// so the resolver can decide which failures to swallow.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct SourceError {
    pub kind: String,
    pub message: String,
}

impl SourceError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Errors that abort resolution of an element.
///
/// Invalid annotation usage is not an error here; it is reported through
/// the resolver's diagnostic queue.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("annotation source failed: {0}")]
    Source(#[from] SourceError),
    #[error(transparent)]
    Intern(#[from] InternError),
}
