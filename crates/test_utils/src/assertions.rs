//! Custom Test Assertions
//!
//! Provides assertion helpers for member errors and remote calls that give
//! more meaningful failure messages than matching by hand.

use domain_mailchimp::{ListMember, MemberError, RemoteCall};

/// Asserts that an error is a validation failure naming `field`
///
/// # Panics
///
/// Panics if the error is of another kind or `field` has no message
pub fn assert_validation_error(error: &MemberError, field: &str) {
    match error {
        MemberError::ValidationFailed { errors } => assert!(
            errors.has_error(field),
            "Expected a validation error for '{}', got {:?}",
            field,
            errors.errors()
        ),
        other => panic!("Expected a validation failure, got {:?}", other),
    }
}

/// Asserts that an error reports a missing entity
pub fn assert_not_found(error: &MemberError, entity: &str) {
    match error {
        MemberError::NotFound { entity: actual, .. } => assert_eq!(
            *actual, entity,
            "Expected {} to be reported missing, got {}",
            entity, actual
        ),
        other => panic!("Expected NotFound for {}, got {:?}", entity, other),
    }
}

/// Asserts that an error is a remote failure carrying `message`
pub fn assert_remote_error(error: &MemberError, message: &str) {
    match error {
        MemberError::Remote { message: actual, .. } => assert_eq!(
            actual, message,
            "Remote error message mismatch"
        ),
        other => panic!("Expected a remote failure, got {:?}", other),
    }
}

/// Asserts that a member carries the given remote identifier
pub fn assert_synced_as(member: &ListMember, remote_id: &str) {
    assert_eq!(
        member.mail_chimp_member_id.as_deref(),
        Some(remote_id),
        "Member {} is not synced as {}",
        member.member_id,
        remote_id
    );
}

/// Asserts that a member has no remote identifier
pub fn assert_unsynced(member: &ListMember) {
    assert!(
        !member.is_synced(),
        "Member {} unexpectedly synced as {:?}",
        member.member_id,
        member.mail_chimp_member_id
    );
}

/// Asserts the sequence of remote operations by name
///
/// Names are `create`, `update`, `delete` and `delete_permanent`.
pub fn assert_remote_calls(calls: &[RemoteCall], expected: &[&str]) {
    let actual: Vec<&str> = calls
        .iter()
        .map(|call| match call {
            RemoteCall::Create { .. } => "create",
            RemoteCall::Update { .. } => "update",
            RemoteCall::Delete { .. } => "delete",
            RemoteCall::DeletePermanent { .. } => "delete_permanent",
        })
        .collect();
    assert_eq!(actual, expected, "Remote call sequence mismatch");
}
