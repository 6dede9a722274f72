//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating member data, both valid and
//! deliberately invalid.

use proptest::prelude::*;
use serde_json::{Map, Value};

use core_kernel::{ListId, MemberId};
use domain_mailchimp::{EmailType, MemberStatus};

/// Strategy for generating member statuses
pub fn member_status_strategy() -> impl Strategy<Value = MemberStatus> {
    prop_oneof![
        Just(MemberStatus::Subscribed),
        Just(MemberStatus::Unsubscribed),
        Just(MemberStatus::Cleaned),
        Just(MemberStatus::Pending),
    ]
}

/// Strategy for generating email types
pub fn email_type_strategy() -> impl Strategy<Value = EmailType> {
    prop_oneof![Just(EmailType::Html), Just(EmailType::Text)]
}

/// Strategy for generating strings that are not a valid status
pub fn invalid_status_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_]{0,16}".prop_filter("must not be a valid status", |s| {
        !MemberStatus::VALUES.contains(&s.as_str())
    })
}

/// Strategy for generating plausible email addresses
pub fn email_strategy() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9.]{0,15}", "[a-z]{1,12}", prop_oneof!["com", "org", "net", "io"])
        .prop_map(|(local, domain, tld)| format!("{}@{}.{}", local, domain, tld))
}

/// Strategy for generating merge field maps
pub fn merge_fields_strategy() -> impl Strategy<Value = Map<String, Value>> {
    proptest::collection::btree_map("[A-Z]{1,8}", "[A-Za-z ]{0,20}", 0..5).prop_map(|fields| {
        fields
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect()
    })
}

/// Strategy for generating ListId
pub fn list_id_strategy() -> impl Strategy<Value = ListId> {
    any::<u128>().prop_map(|n| ListId::from_uuid(uuid::Uuid::from_u128(n)))
}

/// Strategy for generating MemberId
pub fn member_id_strategy() -> impl Strategy<Value = MemberId> {
    any::<u128>().prop_map(|n| MemberId::from_uuid(uuid::Uuid::from_u128(n)))
}
