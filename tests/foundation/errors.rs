//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use formtree_foundation::{Error, ErrorContext, ErrorKind, Path, ValueKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_not_an_array() {
    let err = Error::not_an_array(Path::parse("name").unwrap(), ValueKind::String);
    assert!(matches!(err.kind, ErrorKind::NotAnArray { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("name"));
    assert!(msg.contains("string"));
}

#[test]
fn error_index_out_of_bounds() {
    let err = Error::index_out_of_bounds(Path::parse("rows").unwrap(), 5, 2);
    let msg = format!("{err}");
    assert!(msg.contains("rows"));
    assert!(msg.contains('5'));
    assert!(msg.contains('2'));
}

#[test]
fn error_missing_provider() {
    let err = Error::missing_provider(Path::parse("email").unwrap());
    assert!(matches!(err.kind, ErrorKind::MissingProvider { .. }));
    assert!(format!("{err}").contains("email"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_without_context() {
    let err = Error::missing_provider(Path::root());
    assert!(err.context.is_none());
}

#[test]
fn error_in_operation() {
    let err = Error::path_syntax("a..b", 2, "empty segment").in_operation("set_value");
    assert_eq!(err.context.unwrap().operation, Some("set_value"));
}

#[test]
fn context_display() {
    let ctx = ErrorContext::new().with_operation("array_remove");
    assert_eq!(ctx.to_string(), "in array_remove");
}
