//! Pre-built Test Fixtures
//!
//! Provides ready-to-use lists, members, and request payloads. Identifiers
//! and timestamps are fixed so assertions stay predictable.

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};

use core_kernel::{ListId, MemberId};
use domain_mailchimp::{EmailType, ListMember, MailChimpList, MemberPayload, MemberStatus};

static REFERENCE_TIME: Lazy<DateTime<Utc>> =
    Lazy::new(|| Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());

/// Fixture for identifiers and other string data
pub struct StringFixtures;

impl StringFixtures {
    /// Remote identifier of the newsletter list
    pub fn mail_chimp_list_id() -> &'static str {
        "9e67587f52"
    }

    /// Remote identifier of a second list
    pub fn other_mail_chimp_list_id() -> &'static str {
        "b1c4d3e2f0"
    }

    /// Remote member identifier (MD5 of the lowercased address)
    pub fn mail_chimp_member_id() -> &'static str {
        "62eeb292278cc15f5817cb78f7790b08"
    }

    pub fn email() -> &'static str {
        "ada.lovelace@example.com"
    }

    pub fn other_email() -> &'static str {
        "charles.babbage@example.com"
    }
}

/// Fixture for timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The instant every fixture record was created
    pub fn reference_time() -> DateTime<Utc> {
        *REFERENCE_TIME
    }
}

/// Fixture for mirrored lists
pub struct ListFixtures;

impl ListFixtures {
    /// The main newsletter list
    pub fn newsletter() -> MailChimpList {
        MailChimpList {
            list_id: ListId::from_uuid(uuid::Uuid::from_u128(0x0192_0000_0000_7000_8000_0000_0000_0001)),
            mail_chimp_id: StringFixtures::mail_chimp_list_id().to_string(),
            name: "Newsletter".to_string(),
            created_at: TemporalFixtures::reference_time(),
            updated_at: TemporalFixtures::reference_time(),
        }
    }

    /// A second list, for cross-list scenarios
    pub fn product_updates() -> MailChimpList {
        MailChimpList {
            list_id: ListId::from_uuid(uuid::Uuid::from_u128(0x0192_0000_0000_7000_8000_0000_0000_0002)),
            mail_chimp_id: StringFixtures::other_mail_chimp_list_id().to_string(),
            name: "Product Updates".to_string(),
            created_at: TemporalFixtures::reference_time(),
            updated_at: TemporalFixtures::reference_time(),
        }
    }
}

/// Fixture for list members
pub struct MemberFixtures;

impl MemberFixtures {
    /// A subscribed member that MailChimp already knows
    pub fn synced(list: &MailChimpList) -> ListMember {
        ListMember {
            member_id: MemberId::new(),
            email_address: StringFixtures::email().to_string(),
            email_type: Some(EmailType::Html),
            status: MemberStatus::Subscribed,
            merge_fields: json_object(json!({"FNAME": "Ada", "LNAME": "Lovelace"})),
            interests: Map::new(),
            ip_signup: Some("203.0.113.7".to_string()),
            unsubscribe_reason: None,
            email_client: None,
            tags: vec!["vip".to_string()],
            stats: json_object(json!({"avg_open_rate": 0.5, "avg_click_rate": 0.1})),
            mail_chimp_member_id: Some(StringFixtures::mail_chimp_member_id().to_string()),
            mail_chimp_id: list.mail_chimp_id.clone(),
            lists: vec![list.list_id],
            created_at: TemporalFixtures::reference_time(),
            updated_at: TemporalFixtures::reference_time(),
        }
    }

    /// A member whose remote create never succeeded
    pub fn unsynced(list: &MailChimpList) -> ListMember {
        ListMember {
            mail_chimp_member_id: None,
            email_address: StringFixtures::other_email().to_string(),
            status: MemberStatus::Pending,
            ..Self::synced(list)
        }
    }
}

/// Fixture for request payloads
pub struct PayloadFixtures;

impl PayloadFixtures {
    /// A minimal, valid create request
    pub fn create() -> MemberPayload {
        Self::from_json(json!({
            "email_address": StringFixtures::email(),
            "status": "subscribed",
        }))
    }

    /// A create request carrying more than the two creatable attributes
    pub fn create_with_extras() -> MemberPayload {
        Self::from_json(json!({
            "email_address": StringFixtures::email(),
            "status": "pending",
            "merge_fields": {"FNAME": "Ada"},
            "tags": ["vip"],
            "mail_chimp_member_id": "forged",
        }))
    }

    /// Builds a payload from a JSON object literal
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a JSON object
    pub fn from_json(value: Value) -> MemberPayload {
        MemberPayload::new(json_object(value))
    }
}

fn json_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}
