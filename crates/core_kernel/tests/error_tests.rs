//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::temporal::TemporalError;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_invalid_page() {
    let error = CoreError::invalid_page("page must be at least 1");

    assert_eq!(error.to_string(), "Invalid page request: page must be at least 1");
}

#[test]
fn test_core_error_from_temporal_error() {
    let temporal = TemporalError::InvalidPeriod {
        start: "2024-02-12".to_string(),
        end: "2024-02-11".to_string(),
    };
    let core_error: CoreError = temporal.into();

    assert!(matches!(core_error, CoreError::Temporal(_)));
    assert!(core_error.to_string().contains("2024-02-12"));
}
