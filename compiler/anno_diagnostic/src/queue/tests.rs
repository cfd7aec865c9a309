use super::*;
use crate::ErrorCode;
use pretty_assertions::assert_eq;

fn invalid(element: u32, message: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001)
        .with_message(message)
        .with_element(ElementId::new(element))
}

#[test]
fn test_duplicates_dropped() {
    let mut queue = DiagnosticQueue::new();

    assert!(queue.add(invalid(1, "@Size.max: too large")));
    assert!(!queue.add(invalid(1, "@Size.max: too large")));
    // same message, different element
    assert!(queue.add(invalid(2, "@Size.max: too large")));

    assert_eq!(queue.error_count(), 2);
    assert_eq!(queue.len(), 2);
}

#[test]
fn test_unlimited_keeps_duplicates() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());

    assert!(queue.add(invalid(1, "x")));
    assert!(queue.add(invalid(1, "x")));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn test_error_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: true,
    });

    assert!(queue.add(invalid(1, "a")));
    assert!(queue.add(invalid(1, "b")));
    assert!(queue.limit_reached());
    assert!(!queue.add(invalid(1, "c")));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn test_per_element_views() {
    let mut queue = DiagnosticQueue::new();
    queue.add(invalid(1, "a"));
    queue.add(
        Diagnostic::warning(ErrorCode::W1001)
            .with_message("deprecated")
            .with_element(ElementId::new(1)),
    );
    queue.add(invalid(2, "b"));

    let errors: Vec<&str> = queue
        .errors_for(ElementId::new(1))
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(errors, vec!["a"]);
    assert_eq!(queue.warnings_for(ElementId::new(1)).count(), 1);
    assert_eq!(queue.warnings_for(ElementId::new(2)).count(), 0);
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn test_erroneous_survives_flush() {
    let mut queue = DiagnosticQueue::new();
    queue.add(invalid(4, "a"));
    queue.mark_erroneous(ElementId::new(4));

    let flushed = queue.flush();
    assert_eq!(flushed.len(), 1);
    assert!(queue.is_empty());
    assert!(!queue.has_errors());
    assert!(queue.is_erroneous(ElementId::new(4)));
    assert!(!queue.is_erroneous(ElementId::new(5)));
}
