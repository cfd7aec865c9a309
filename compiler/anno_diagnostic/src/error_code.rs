//! Error codes for resolution diagnostics.

use std::fmt;

/// Stable identifier of a resolution report.
///
/// `E1xxx` codes reject an annotation's usage; `W1xxx` codes only inform.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Annotation member value rejected by the element validator
    E1001,

    /// Deprecated annotation used
    W1001,
}

impl ErrorCode {
    pub const ALL: &[ErrorCode] = &[ErrorCode::E1001, ErrorCode::W1001];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::W1001 => "W1001",
        }
    }

    /// Short description used in listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "invalid annotation member value",
            ErrorCode::W1001 => "deprecated annotation",
        }
    }

    pub fn is_warning(&self) -> bool {
        self.as_str().starts_with('W')
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E1001.to_string(), "E1001");
        assert_eq!(ErrorCode::W1001.as_str(), "W1001");
    }

    #[test]
    fn test_warning_classification() {
        assert!(ErrorCode::W1001.is_warning());
        assert!(!ErrorCode::E1001.is_warning());
    }

    #[test]
    fn test_from_str_covers_all() {
        for code in ErrorCode::ALL {
            assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
        }
        assert!("E0000".parse::<ErrorCode>().is_err());
    }
}
