//! Property tests for the member rules

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use domain_mailchimp::{member_rules, MailChimpList, MemberDraft, MockListStore, Validator};
use test_utils::{
    email_strategy, email_type_strategy, invalid_status_strategy, member_status_strategy,
    merge_fields_strategy, ListFixtures, MemberPayloadBuilder,
};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

fn draft_fields(list: &MailChimpList, payload: Value) -> Map<String, Value> {
    let mut draft = MemberDraft::for_list(list);
    draft.fill(&serde_json::from_value(payload).unwrap());
    draft.fields().clone()
}

proptest! {
    #[test]
    fn test_valid_members_pass(
        email in email_strategy(),
        status in member_status_strategy(),
        email_type in email_type_strategy(),
        merge_fields in merge_fields_strategy(),
    ) {
        let list = ListFixtures::newsletter();
        let fields = draft_fields(&list, json!({
            "email_address": email,
            "status": status.as_str(),
            "email_type": email_type.as_str(),
            "merge_fields": merge_fields,
        }));

        let result = runtime().block_on(async {
            let lists = MockListStore::with_lists(vec![list.clone()]).await;
            Validator::new(&lists).validate(&fields, &member_rules()).await
        }).unwrap();

        prop_assert!(result.is_valid(), "unexpected errors: {:?}", result.errors());
        let mut draft = MemberDraft::for_list(&list);
        draft.fill(&serde_json::from_value(Value::Object(fields)).unwrap());
        prop_assert!(draft.build().is_ok());
    }

    #[test]
    fn test_unknown_statuses_fail_on_status_only(status in invalid_status_strategy()) {
        let list = ListFixtures::newsletter();
        let payload = MemberPayloadBuilder::valid().status(&status).to_json();
        let fields = draft_fields(&list, payload);

        let result = runtime().block_on(async {
            let lists = MockListStore::with_lists(vec![list.clone()]).await;
            Validator::new(&lists).validate(&fields, &member_rules()).await
        }).unwrap();

        prop_assert!(result.has_error("status"));
        prop_assert_eq!(result.errors().len(), 1);
    }
}

#[tokio::test]
async fn test_members_of_unknown_lists_are_rejected() {
    let list = ListFixtures::newsletter();
    let fields = draft_fields(&list, MemberPayloadBuilder::valid().to_json());

    let lists = MockListStore::new();
    let result = Validator::new(&lists)
        .validate(&fields, &member_rules())
        .await
        .unwrap();

    assert!(result.has_error("lists"));
    assert!(result.has_error("mail_chimp_id"));
    assert_eq!(
        result.messages_for("mail_chimp_id"),
        ["The selected mail chimp id is invalid.".to_string()]
    );
}

#[tokio::test]
async fn test_type_rules_cover_optional_fields() {
    let list = ListFixtures::newsletter();
    let fields = draft_fields(
        &list,
        MemberPayloadBuilder::valid()
            .merge_fields(json!("FNAME=Ada"))
            .set("tags", json!(["ok", 7]))
            .set("ip_signup", json!(127))
            .to_json(),
    );

    let lists = MockListStore::with_lists(vec![list]).await;
    let result = Validator::new(&lists)
        .validate(&fields, &member_rules())
        .await
        .unwrap();

    assert!(result.has_error("merge_fields"));
    assert!(result.has_error("tags"));
    assert!(result.has_error("ip_signup"));
    assert!(!result.has_error("email_address"));
}

#[tokio::test]
async fn test_null_collections_reset_to_empty() {
    let list = ListFixtures::newsletter();
    let fields = draft_fields(
        &list,
        MemberPayloadBuilder::valid()
            .set("merge_fields", Value::Null)
            .set("tags", Value::Null)
            .to_json(),
    );

    assert_eq!(fields["merge_fields"], json!({}));
    assert_eq!(fields["tags"], json!([]));
}
