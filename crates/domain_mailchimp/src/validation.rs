//! Member validation rules
//!
//! A small rule engine run against the loose field set of a
//! [`MemberDraft`](crate::member::MemberDraft) before anything is written.
//!
//! # Member Rules
//!
//! - `email_address`: required, string
//! - `email_type`: nullable; `html` or `text`
//! - `status`: required; `subscribed`, `unsubscribed`, `cleaned` or `pending`
//! - `lists`: required; every entry references an existing list
//! - `mail_chimp_id`: required; matches an existing list's MailChimp id
//! - `merge_fields`, `interests`: nullable objects
//! - `ip_signup`, `unsubscribe_reason`, `email_client`: nullable strings
//! - `tags`: nullable list of strings
//!
//! Failures are reported per field, e.g. `The email address field is required.`

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use core_kernel::{ListId, PortError};

use crate::member::{EmailType, MemberStatus};
use crate::ports::ListStore;

/// A single constraint on a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The field must be present and non-empty
    Required,
    /// A missing or null field skips the remaining rules
    Nullable,
    String,
    Object,
    /// An array whose entries are all strings
    StringList,
    /// The value must be one of the listed strings
    In(&'static [&'static str]),
    /// Every entry must be the identifier of a stored list
    ExistsList,
    /// The value must be the MailChimp identifier of a stored list
    ExistsRemoteList,
}

/// Ordered rules for a set of fields
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<(&'static str, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the rules for one field
    pub fn field(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.fields.push((name, rules));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[Rule])> {
        self.fields.iter().map(|(name, rules)| (*name, rules.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The rules applied to a member on create and on update
pub fn member_rules() -> RuleSet {
    RuleSet::new()
        .field("email_address", vec![Rule::Required, Rule::String])
        .field(
            "email_type",
            vec![Rule::Nullable, Rule::String, Rule::In(&EmailType::VALUES)],
        )
        .field(
            "status",
            vec![Rule::Required, Rule::String, Rule::In(&MemberStatus::VALUES)],
        )
        .field("lists", vec![Rule::Required, Rule::ExistsList])
        .field("mail_chimp_id", vec![Rule::Required, Rule::ExistsRemoteList])
        .field("merge_fields", vec![Rule::Nullable, Rule::Object])
        .field("interests", vec![Rule::Nullable, Rule::Object])
        .field("ip_signup", vec![Rule::Nullable, Rule::String])
        .field("unsubscribe_reason", vec![Rule::Nullable, Rule::String])
        .field("email_client", vec![Rule::Nullable, Rule::String])
        .field("tags", vec![Rule::Nullable, Rule::StringList])
}

/// Result of validation: messages keyed by field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error for a field
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    /// Merges another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    /// Messages recorded for one field
    pub fn messages_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }
}

/// Evaluates a [`RuleSet`] against a field set
///
/// Existence rules consult the list store, so validation is async and can
/// fail with a [`PortError`] when the store is unreachable.
pub struct Validator<'a> {
    lists: &'a dyn ListStore,
}

impl<'a> Validator<'a> {
    pub fn new(lists: &'a dyn ListStore) -> Self {
        Self { lists }
    }

    /// Validates `fields` against `rules`
    ///
    /// # Returns
    ///
    /// A `ValidationResult` containing every failed rule
    pub async fn validate(
        &self,
        fields: &Map<String, Value>,
        rules: &RuleSet,
    ) -> Result<ValidationResult, PortError> {
        let mut result = ValidationResult::ok();

        for (field, field_rules) in rules.iter() {
            let value = fields.get(field).filter(|v| !v.is_null());

            if value.is_none() && field_rules.contains(&Rule::Nullable) {
                continue;
            }

            for rule in field_rules {
                match (rule, value) {
                    (Rule::Required, _) => {
                        if value.map_or(true, is_blank) {
                            result.add_error(field, format!("The {} field is required.", attribute(field)));
                            break;
                        }
                    }
                    (_, None) => break,
                    (rule, Some(value)) => {
                        if let Some(message) = self.check(field, *rule, value).await? {
                            result.add_error(field, message);
                        }
                    }
                }
            }
        }

        Ok(result)
    }

    async fn check(
        &self,
        field: &str,
        rule: Rule,
        value: &Value,
    ) -> Result<Option<String>, PortError> {
        let name = attribute(field);
        let message = match rule {
            Rule::Required | Rule::Nullable => None,
            Rule::String => (!value.is_string()).then(|| format!("The {} must be a string.", name)),
            Rule::Object => (!value.is_object()).then(|| format!("The {} must be an object.", name)),
            Rule::StringList => {
                let valid = value
                    .as_array()
                    .map_or(false, |items| items.iter().all(Value::is_string));
                (!valid).then(|| format!("The {} must be a list of strings.", name))
            }
            Rule::In(allowed) => {
                let valid = value.as_str().map_or(false, |v| allowed.contains(&v));
                (!valid).then(|| format!("The selected {} is invalid.", name))
            }
            Rule::ExistsList => {
                (!self.lists_exist(value).await?).then(|| format!("The selected {} is invalid.", name))
            }
            Rule::ExistsRemoteList => {
                let exists = match value.as_str() {
                    Some(mail_chimp_id) => self
                        .lists
                        .find_by_mail_chimp_id(mail_chimp_id)
                        .await?
                        .is_some(),
                    None => false,
                };
                (!exists).then(|| format!("The selected {} is invalid.", name))
            }
        };

        Ok(message)
    }

    async fn lists_exist(&self, value: &Value) -> Result<bool, PortError> {
        let entries: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        for entry in entries {
            let Some(list_id) = entry.as_str().and_then(|s| s.parse::<ListId>().ok()) else {
                return Ok(false);
            };
            if self.lists.find_by_id(list_id).await?.is_none() {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn attribute(field: &str) -> String {
    field.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::list::MailChimpList;
    use crate::ports::mock::MockListStore;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fields must be an object"),
        }
    }

    async fn store_with(list: &MailChimpList) -> MockListStore {
        MockListStore::with_lists(vec![list.clone()]).await
    }

    fn valid_fields(list: &MailChimpList) -> Map<String, Value> {
        fields(json!({
            "email_address": "ada@example.com",
            "status": "subscribed",
            "lists": [list.list_id],
            "mail_chimp_id": list.mail_chimp_id,
        }))
    }

    #[tokio::test]
    async fn test_valid_member_passes() {
        let list = MailChimpList::new("abc123", "Newsletter");
        let store = store_with(&list).await;

        let result = Validator::new(&store)
            .validate(&valid_fields(&list), &member_rules())
            .await
            .unwrap();

        assert!(result.is_valid(), "{:?}", result);
    }

    #[tokio::test]
    async fn test_missing_required_fields() {
        let list = MailChimpList::new("abc123", "Newsletter");
        let store = store_with(&list).await;

        let result = Validator::new(&store)
            .validate(&Map::new(), &member_rules())
            .await
            .unwrap();

        assert_eq!(
            result.messages_for("email_address"),
            ["The email address field is required."]
        );
        assert!(result.has_error("status"));
        assert!(result.has_error("lists"));
        assert!(result.has_error("mail_chimp_id"));
        assert!(!result.has_error("email_type"));
    }

    #[tokio::test]
    async fn test_blank_email_is_missing() {
        let list = MailChimpList::new("abc123", "Newsletter");
        let store = store_with(&list).await;
        let mut input = valid_fields(&list);
        input.insert("email_address".to_string(), json!("   "));

        let result = Validator::new(&store).validate(&input, &member_rules()).await.unwrap();

        assert_eq!(
            result.messages_for("email_address"),
            ["The email address field is required."]
        );
    }

    #[tokio::test]
    async fn test_invalid_enumerations() {
        let list = MailChimpList::new("abc123", "Newsletter");
        let store = store_with(&list).await;
        let mut input = valid_fields(&list);
        input.insert("status".to_string(), json!("archived"));
        input.insert("email_type".to_string(), json!("pdf"));

        let result = Validator::new(&store).validate(&input, &member_rules()).await.unwrap();

        assert_eq!(result.messages_for("status"), ["The selected status is invalid."]);
        assert_eq!(result.messages_for("email_type"), ["The selected email type is invalid."]);
    }

    #[tokio::test]
    async fn test_null_email_type_is_allowed() {
        let list = MailChimpList::new("abc123", "Newsletter");
        let store = store_with(&list).await;
        let mut input = valid_fields(&list);
        input.insert("email_type".to_string(), Value::Null);

        let result = Validator::new(&store).validate(&input, &member_rules()).await.unwrap();

        assert!(result.is_valid());
    }

    #[tokio::test]
    async fn test_non_string_email_reports_type() {
        let list = MailChimpList::new("abc123", "Newsletter");
        let store = store_with(&list).await;
        let mut input = valid_fields(&list);
        input.insert("email_address".to_string(), json!(42));

        let result = Validator::new(&store).validate(&input, &member_rules()).await.unwrap();

        assert_eq!(
            result.messages_for("email_address"),
            ["The email address must be a string."]
        );
    }

    #[tokio::test]
    async fn test_unknown_list_references() {
        let list = MailChimpList::new("abc123", "Newsletter");
        let store = store_with(&list).await;
        let mut input = valid_fields(&list);
        input.insert("lists".to_string(), json!([list.list_id, ListId::new()]));
        input.insert("mail_chimp_id".to_string(), json!("zzz999"));

        let result = Validator::new(&store).validate(&input, &member_rules()).await.unwrap();

        assert_eq!(result.messages_for("lists"), ["The selected lists is invalid."]);
        assert_eq!(result.messages_for("mail_chimp_id"), ["The selected mail chimp id is invalid."]);
    }

    #[tokio::test]
    async fn test_collection_shapes() {
        let list = MailChimpList::new("abc123", "Newsletter");
        let store = store_with(&list).await;
        let mut input = valid_fields(&list);
        input.insert("merge_fields".to_string(), json!("FNAME=Ada"));
        input.insert("tags".to_string(), json!(["vip", 3]));

        let result = Validator::new(&store).validate(&input, &member_rules()).await.unwrap();

        assert_eq!(result.messages_for("merge_fields"), ["The merge fields must be an object."]);
        assert_eq!(result.messages_for("tags"), ["The tags must be a list of strings."]);
    }

    #[test]
    fn test_merge_accumulates_messages() {
        let mut first = ValidationResult::ok();
        first.add_error("status", "one");
        let mut second = ValidationResult::ok();
        second.add_error("status", "two");
        second.add_error("email_address", "three");

        first.merge(second);

        assert_eq!(first.messages_for("status"), ["one", "two"]);
        assert_eq!(first.errors().len(), 2);
        assert!(!first.is_valid());
    }

    #[test]
    fn test_serializes_as_field_map() {
        let mut result = ValidationResult::ok();
        result.add_error("status", "The selected status is invalid.");

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"status": ["The selected status is invalid."]})
        );
    }
}
