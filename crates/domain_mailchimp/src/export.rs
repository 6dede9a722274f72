//! The exportable field set
//!
//! The attributes of a member that are sent to MailChimp: everything except
//! the local identifier, the list associations and the local timestamps.
//! Unset optional attributes are left out so MailChimp keeps its own defaults.

use serde_json::{json, Map, Value};

use crate::member::ListMember;

/// Attributes that never leave this system
pub const LOCAL_ONLY_FIELDS: [&str; 4] = ["member_id", "lists", "created_at", "updated_at"];

/// Builds the field map sent to the remote directory for `member`
pub fn exportable_fields(member: &ListMember) -> Map<String, Value> {
    let mut fields = Map::new();

    fields.insert("email_address".to_string(), json!(member.email_address));
    if let Some(email_type) = member.email_type {
        fields.insert("email_type".to_string(), json!(email_type.as_str()));
    }
    fields.insert("status".to_string(), json!(member.status.as_str()));
    fields.insert("merge_fields".to_string(), Value::Object(member.merge_fields.clone()));
    fields.insert("interests".to_string(), Value::Object(member.interests.clone()));

    insert_optional(&mut fields, "ip_signup", member.ip_signup.as_deref());
    insert_optional(&mut fields, "unsubscribe_reason", member.unsubscribe_reason.as_deref());
    insert_optional(&mut fields, "email_client", member.email_client.as_deref());

    fields.insert("tags".to_string(), json!(member.tags));
    fields.insert("stats".to_string(), Value::Object(member.stats.clone()));

    insert_optional(&mut fields, "mail_chimp_member_id", member.mail_chimp_member_id.as_deref());
    fields.insert("mail_chimp_id".to_string(), json!(member.mail_chimp_id));

    fields
}

fn insert_optional(fields: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        fields.insert(key.to_string(), json!(value));
    }
}
