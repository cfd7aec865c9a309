use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("@Size.max: must not be negative")
        .with_element(ElementId::new(7))
        .with_note("declared on a field");

    assert_eq!(diag.code, ErrorCode::E1001);
    assert_eq!(diag.message, "@Size.max: must not be negative");
    assert_eq!(diag.element, Some(ElementId::new(7)));
    assert_eq!(diag.notes.len(), 1);
    assert!(diag.is_error());
    assert!(!diag.is_warning());
}

#[test]
fn test_warning_builder() {
    let diag = Diagnostic::warning(ErrorCode::W1001).with_message("use @Named instead");

    assert_eq!(diag.severity, Severity::Warning);
    assert!(diag.is_warning());
    assert_eq!(diag.element, None);
}

#[test]
fn test_diagnostic_display() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("bad value")
        .with_element(ElementId::new(3))
        .with_note("see the member declaration");

    assert_eq!(
        diag.to_string(),
        "error [E1001]: bad value\n  --> ElementId(3)\n  = note: see the member declaration"
    );
}
