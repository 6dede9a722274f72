//! List members
//!
//! A [`ListMember`] is one contact's subscription to one mirrored list. New
//! and changed members are assembled as a [`MemberDraft`]: a loose field map
//! that can be validated before it is turned into a typed record, so that a
//! bad `status` surfaces as a validation message instead of a decode error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

use core_kernel::{CoreError, ListId, MemberId};

use crate::export::exportable_fields;
use crate::list::MailChimpList;

/// Subscription status of a member, as defined by MailChimp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Subscribed,
    Unsubscribed,
    Cleaned,
    Pending,
}

impl MemberStatus {
    /// Wire values accepted for `status`
    pub const VALUES: [&'static str; 4] = ["subscribed", "unsubscribed", "cleaned", "pending"];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Subscribed => "subscribed",
            MemberStatus::Unsubscribed => "unsubscribed",
            MemberStatus::Cleaned => "cleaned",
            MemberStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscribed" => Ok(MemberStatus::Subscribed),
            "unsubscribed" => Ok(MemberStatus::Unsubscribed),
            "cleaned" => Ok(MemberStatus::Cleaned),
            "pending" => Ok(MemberStatus::Pending),
            other => Err(CoreError::invalid_value("status", other)),
        }
    }
}

/// Preferred email format of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailType {
    Html,
    Text,
}

impl EmailType {
    /// Wire values accepted for `email_type`
    pub const VALUES: [&'static str; 2] = ["html", "text"];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailType::Html => "html",
            EmailType::Text => "text",
        }
    }
}

impl FromStr for EmailType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(EmailType::Html),
            "text" => Ok(EmailType::Text),
            other => Err(CoreError::invalid_value("email_type", other)),
        }
    }
}

/// A contact's subscription to a mirrored list
///
/// Serializes to the flat field map returned by the HTTP API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListMember {
    /// Local identifier, fixed when the record is first built
    pub member_id: MemberId,
    pub email_address: String,
    pub email_type: Option<EmailType>,
    pub status: MemberStatus,
    #[serde(default)]
    pub merge_fields: Map<String, Value>,
    #[serde(default)]
    pub interests: Map<String, Value>,
    pub ip_signup: Option<String>,
    pub unsubscribe_reason: Option<String>,
    pub email_client: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Engagement statistics reported by MailChimp; opaque to this system
    #[serde(default)]
    pub stats: Map<String, Value>,
    /// Identifier MailChimp assigned to the member; `None` until the remote create succeeds
    pub mail_chimp_member_id: Option<String>,
    /// MailChimp identifier of the owning list
    pub mail_chimp_id: String,
    /// Lists this member is associated with
    #[serde(default)]
    pub lists: Vec<ListId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListMember {
    /// Returns true once MailChimp has acknowledged the member
    pub fn is_synced(&self) -> bool {
        self.mail_chimp_member_id.is_some()
    }

    /// Records the identifier MailChimp assigned to this member
    ///
    /// The identifier is write-once: an already assigned value is kept.
    pub fn assign_mail_chimp_member_id(&mut self, remote_id: impl Into<String>) {
        if self.mail_chimp_member_id.is_none() {
            self.mail_chimp_member_id = Some(remote_id.into());
            self.touch();
        }
    }

    /// Associates the member with a list, ignoring duplicates
    pub fn add_list(&mut self, list_id: ListId) {
        if !self.lists.contains(&list_id) {
            self.lists.push(list_id);
        }
    }

    pub fn remove_list(&mut self, list_id: ListId) {
        self.lists.retain(|id| *id != list_id);
    }

    /// Bumps the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Raw member attributes from a request body
///
/// Kept as untyped JSON so the validation rules, not the decoder, decide
/// what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberPayload(Map<String, Value>);

impl MemberPayload {
    /// Attributes a caller may change on an existing member
    pub const FILLABLE: [&'static str; 9] = [
        "email_address",
        "email_type",
        "status",
        "merge_fields",
        "interests",
        "ip_signup",
        "unsubscribe_reason",
        "email_client",
        "tags",
    ];

    /// Attributes taken from the payload when a member is created
    pub const CREATABLE: [&'static str; 2] = ["email_address", "status"];

    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for MemberPayload {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// An unvalidated member under construction
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDraft {
    fields: Map<String, Value>,
}

impl MemberDraft {
    /// Starts a new member owned by `list`
    pub fn for_list(list: &MailChimpList) -> Self {
        let now = Utc::now();
        let mut fields = Map::new();
        fields.insert("member_id".to_string(), json!(MemberId::new()));
        fields.insert("mail_chimp_id".to_string(), json!(list.mail_chimp_id));
        fields.insert("lists".to_string(), json!([list.list_id]));
        fields.insert("created_at".to_string(), json!(now));
        fields.insert("updated_at".to_string(), json!(now));
        Self { fields }
    }

    /// Starts from the current state of an existing member
    pub fn from_member(member: &ListMember) -> Self {
        let mut fields = exportable_fields(member);
        fields.insert("member_id".to_string(), json!(member.member_id));
        fields.insert("lists".to_string(), json!(member.lists));
        fields.insert("created_at".to_string(), json!(member.created_at));
        fields.insert("updated_at".to_string(), json!(Utc::now()));
        Self { fields }
    }

    /// Copies every fillable attribute present in `payload`
    pub fn fill(&mut self, payload: &MemberPayload) {
        self.fill_only(payload, &MemberPayload::FILLABLE);
    }

    /// Copies the named attributes that are present in `payload`
    pub fn fill_only(&mut self, payload: &MemberPayload, attributes: &[&str]) {
        for attribute in attributes {
            if let Some(value) = payload.get(attribute) {
                self.fields
                    .insert(attribute.to_string(), normalize(attribute, value.clone()));
            }
        }
    }

    /// The field set the validation rules run against
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Converts the draft into a typed member
    ///
    /// Only meaningful after validation passed; a draft that breaks the
    /// member rules fails to decode.
    pub fn build(self) -> Result<ListMember, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields))
    }
}

// Collection attributes reset to empty rather than null.
fn normalize(attribute: &str, value: Value) -> Value {
    match (attribute, value) {
        ("merge_fields" | "interests", Value::Null) => Value::Object(Map::new()),
        ("tags", Value::Null) => Value::Array(Vec::new()),
        (_, value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(value: Value) -> MemberPayload {
        match value {
            Value::Object(map) => MemberPayload::new(map),
            _ => panic!("payload must be an object"),
        }
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("pending".parse::<MemberStatus>().unwrap(), MemberStatus::Pending);
        assert!("archived".parse::<MemberStatus>().is_err());
        assert!("Subscribed".parse::<MemberStatus>().is_err());
    }

    #[test]
    fn test_status_values_match_variants() {
        for value in MemberStatus::VALUES {
            let status: MemberStatus = value.parse().unwrap();
            assert_eq!(status.as_str(), value);
        }
    }

    #[test]
    fn test_draft_for_list_builds_after_fill() {
        let list = MailChimpList::new("a1b2c3", "Newsletter");
        let mut draft = MemberDraft::for_list(&list);
        draft.fill_only(
            &payload(json!({
                "email_address": "ada@example.com",
                "status": "subscribed",
                "email_type": "text"
            })),
            &MemberPayload::CREATABLE,
        );

        let member = draft.build().unwrap();
        assert_eq!(member.email_address, "ada@example.com");
        assert_eq!(member.status, MemberStatus::Subscribed);
        // email_type is not creatable
        assert_eq!(member.email_type, None);
        assert_eq!(member.mail_chimp_id, "a1b2c3");
        assert_eq!(member.lists, vec![list.list_id]);
        assert!(!member.is_synced());
    }

    #[test]
    fn test_draft_from_member_preserves_untouched_fields() {
        let list = MailChimpList::new("a1b2c3", "Newsletter");
        let mut draft = MemberDraft::for_list(&list);
        draft.fill_only(
            &payload(json!({"email_address": "ada@example.com", "status": "pending"})),
            &MemberPayload::CREATABLE,
        );
        let mut member = draft.build().unwrap();
        member.merge_fields.insert("FNAME".to_string(), json!("Ada"));
        member.assign_mail_chimp_member_id("abc123");

        let mut update = MemberDraft::from_member(&member);
        update.fill(&payload(json!({"status": "unsubscribed"})));
        let updated = update.build().unwrap();

        assert_eq!(updated.status, MemberStatus::Unsubscribed);
        assert_eq!(updated.member_id, member.member_id);
        assert_eq!(updated.email_address, member.email_address);
        assert_eq!(updated.merge_fields, member.merge_fields);
        assert_eq!(updated.mail_chimp_member_id.as_deref(), Some("abc123"));
        assert_eq!(updated.created_at, member.created_at);
    }

    #[test]
    fn test_fill_ignores_non_fillable_attributes() {
        let list = MailChimpList::new("a1b2c3", "Newsletter");
        let mut draft = MemberDraft::for_list(&list);
        draft.fill(&payload(json!({
            "email_address": "ada@example.com",
            "status": "subscribed",
            "mail_chimp_id": "other",
            "mail_chimp_member_id": "forged"
        })));

        let member = draft.build().unwrap();
        assert_eq!(member.mail_chimp_id, "a1b2c3");
        assert_eq!(member.mail_chimp_member_id, None);
    }

    #[test]
    fn test_null_collections_reset_to_empty() {
        let list = MailChimpList::new("a1b2c3", "Newsletter");
        let mut draft = MemberDraft::for_list(&list);
        draft.fill(&payload(json!({
            "email_address": "ada@example.com",
            "status": "subscribed",
            "merge_fields": null,
            "tags": null
        })));

        let member = draft.build().unwrap();
        assert!(member.merge_fields.is_empty());
        assert!(member.tags.is_empty());
    }

    #[test]
    fn test_remote_id_is_write_once() {
        let list = MailChimpList::new("a1b2c3", "Newsletter");
        let mut draft = MemberDraft::for_list(&list);
        draft.fill_only(
            &payload(json!({"email_address": "ada@example.com", "status": "subscribed"})),
            &MemberPayload::CREATABLE,
        );
        let mut member = draft.build().unwrap();

        member.assign_mail_chimp_member_id("first");
        member.assign_mail_chimp_member_id("second");
        assert_eq!(member.mail_chimp_member_id.as_deref(), Some("first"));
    }

    #[test]
    fn test_list_association_ignores_duplicates() {
        let list = MailChimpList::new("a1b2c3", "Newsletter");
        let mut draft = MemberDraft::for_list(&list);
        draft.fill_only(
            &payload(json!({"email_address": "ada@example.com", "status": "subscribed"})),
            &MemberPayload::CREATABLE,
        );
        let mut member = draft.build().unwrap();

        member.add_list(list.list_id);
        assert_eq!(member.lists.len(), 1);

        let other = ListId::new();
        member.add_list(other);
        member.remove_list(list.list_id);
        assert_eq!(member.lists, vec![other]);
    }
}
