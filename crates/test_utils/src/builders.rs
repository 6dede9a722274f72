//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! Only the fields a test cares about need to be set; email addresses default
//! to random but safe values.

use chrono::{DateTime, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use serde_json::{json, Map, Value};

use core_kernel::{ListId, MemberId};
use domain_mailchimp::{EmailType, ListMember, MailChimpList, MemberPayload, MemberStatus};

use crate::fixtures::{ListFixtures, TemporalFixtures};

/// Builder for list members
pub struct TestMemberBuilder {
    member_id: MemberId,
    email_address: String,
    email_type: Option<EmailType>,
    status: MemberStatus,
    merge_fields: Map<String, Value>,
    tags: Vec<String>,
    mail_chimp_member_id: Option<String>,
    mail_chimp_id: String,
    lists: Vec<ListId>,
    created_at: DateTime<Utc>,
}

impl Default for TestMemberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestMemberBuilder {
    /// Creates a new builder for a synced member of the newsletter list
    pub fn new() -> Self {
        let list = ListFixtures::newsletter();
        let mut merge_fields = Map::new();
        merge_fields.insert("FNAME".to_string(), json!(FirstName().fake::<String>()));
        merge_fields.insert("LNAME".to_string(), json!(LastName().fake::<String>()));

        Self {
            member_id: MemberId::new(),
            email_address: SafeEmail().fake(),
            email_type: None,
            status: MemberStatus::Subscribed,
            merge_fields,
            tags: Vec::new(),
            mail_chimp_member_id: Some(format!("{:032x}", uuid::Uuid::new_v4().as_u128())),
            mail_chimp_id: list.mail_chimp_id,
            lists: vec![list.list_id],
            created_at: TemporalFixtures::reference_time(),
        }
    }

    /// Makes the member belong to `list`
    pub fn for_list(mut self, list: &MailChimpList) -> Self {
        self.mail_chimp_id = list.mail_chimp_id.clone();
        self.lists = vec![list.list_id];
        self
    }

    pub fn with_member_id(mut self, id: MemberId) -> Self {
        self.member_id = id;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email_address = email.into();
        self
    }

    pub fn with_email_type(mut self, email_type: EmailType) -> Self {
        self.email_type = Some(email_type);
        self
    }

    pub fn with_status(mut self, status: MemberStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_merge_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.merge_fields.insert(key.into(), value);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Sets the remote identifier
    pub fn with_remote_id(mut self, id: impl Into<String>) -> Self {
        self.mail_chimp_member_id = Some(id.into());
        self
    }

    /// Clears the remote identifier, as after a failed remote create
    pub fn unsynced(mut self) -> Self {
        self.mail_chimp_member_id = None;
        self
    }

    /// Adds a further list association
    pub fn also_in(mut self, list_id: ListId) -> Self {
        self.lists.push(list_id);
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Builds the member
    pub fn build(self) -> ListMember {
        ListMember {
            member_id: self.member_id,
            email_address: self.email_address,
            email_type: self.email_type,
            status: self.status,
            merge_fields: self.merge_fields,
            interests: Map::new(),
            ip_signup: None,
            unsubscribe_reason: None,
            email_client: None,
            tags: self.tags,
            stats: Map::new(),
            mail_chimp_member_id: self.mail_chimp_member_id,
            mail_chimp_id: self.mail_chimp_id,
            lists: self.lists,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Builder for request payloads
#[derive(Default)]
pub struct MemberPayloadBuilder {
    fields: Map<String, Value>,
}

impl MemberPayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a random email address and `subscribed`
    pub fn valid() -> Self {
        Self::new()
            .email(SafeEmail().fake::<String>())
            .status("subscribed")
    }

    pub fn email(self, email: impl Into<String>) -> Self {
        self.set("email_address", json!(email.into()))
    }

    pub fn status(self, status: &str) -> Self {
        self.set("status", json!(status))
    }

    pub fn email_type(self, email_type: &str) -> Self {
        self.set("email_type", json!(email_type))
    }

    pub fn merge_fields(self, merge_fields: Value) -> Self {
        self.set("merge_fields", merge_fields)
    }

    pub fn tags(self, tags: &[&str]) -> Self {
        self.set("tags", json!(tags))
    }

    /// Sets an arbitrary attribute, including ones the service should ignore
    pub fn set(mut self, field: impl Into<String>, value: Value) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    /// Removes an attribute
    pub fn without(mut self, field: &str) -> Self {
        self.fields.remove(field);
        self
    }

    pub fn build(self) -> MemberPayload {
        MemberPayload::new(self.fields)
    }

    /// The payload as a JSON body
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_builder_defaults() {
        let member = TestMemberBuilder::new().build();
        assert!(member.is_synced());
        assert!(member.email_address.contains('@'));
        assert_eq!(member.mail_chimp_id, ListFixtures::newsletter().mail_chimp_id);
        assert_eq!(member.mail_chimp_member_id.as_deref().map(str::len), Some(32));
    }

    #[test]
    fn test_member_builder_unsynced() {
        let member = TestMemberBuilder::new().unsynced().with_tag("trial").build();
        assert!(!member.is_synced());
        assert_eq!(member.tags, vec!["trial".to_string()]);
    }

    #[test]
    fn test_payload_builder() {
        let payload = MemberPayloadBuilder::valid().without("status").build();
        assert!(payload.contains("email_address"));
        assert!(!payload.contains("status"));
    }
}
