//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::{ListId, MemberId, PortError};

#[test]
fn test_core_error_invalid_identifier() {
    let error = CoreError::invalid_identifier("MailChimpList[abc]");

    match error {
        CoreError::InvalidIdentifier(msg) => assert_eq!(msg, "MailChimpList[abc]"),
        _ => panic!("Expected InvalidIdentifier error"),
    }
}

#[test]
fn test_core_error_invalid_value() {
    let error = CoreError::invalid_value("status", "archived");
    let display = error.to_string();

    assert!(display.contains("status"));
    assert!(display.contains("archived"));
}

#[test]
fn test_core_error_configuration() {
    let error = CoreError::Configuration("Missing API key".to_string());

    match error {
        CoreError::Configuration(msg) => assert_eq!(msg, "Missing API key"),
        _ => panic!("Expected Configuration error"),
    }
}

#[test]
fn test_parse_failure_is_core_error() {
    let list_err = "".parse::<ListId>().unwrap_err();
    let member_err = "12345".parse::<MemberId>().unwrap_err();

    assert!(matches!(list_err, CoreError::InvalidIdentifier(_)));
    assert!(member_err.to_string().contains("MailChimpListMember[12345]"));
}

#[test]
fn test_port_error_internal_detail() {
    let error = PortError::internal("connection reset");
    assert_eq!(error.detail(), "connection reset");
    assert!(!error.is_not_found());
}
