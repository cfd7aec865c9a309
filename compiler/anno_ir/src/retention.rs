use std::fmt;

/// How long an annotation is retained after compilation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum RetentionPolicy {
    /// Recorded in the class file and visible at run time.
    #[default]
    Runtime,
    /// Recorded in the class file but not visible at run time.
    Class,
    /// Discarded by the compiler.
    Source,
}

impl RetentionPolicy {
    /// Whether an emitter should write this annotation out at all.
    pub fn is_retained(self) -> bool {
        !matches!(self, RetentionPolicy::Source)
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionPolicy::Runtime => write!(f, "RUNTIME"),
            RetentionPolicy::Class => write!(f, "CLASS"),
            RetentionPolicy::Source => write!(f, "SOURCE"),
        }
    }
}
