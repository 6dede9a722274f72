//! PostgreSQL store tests
//!
//! These start a PostgreSQL container and are ignored by default:
//! `cargo test -p infra_db -- --ignored`

use core_kernel::MemberId;
use domain_mailchimp::{ListStore, MemberStatus, MemberStore};
use infra_db::{PostgresListStore, PostgresMemberStore};
use test_utils::{db_test, ListFixtures, MemberFixtures, TestMemberBuilder};

db_test!(list_store_finds_by_both_ids, |pool| {
    let store = PostgresListStore::new(pool);
    let list = ListFixtures::newsletter();
    store.save(&list).await.unwrap();

    let by_id = store.find_by_id(list.list_id).await.unwrap().unwrap();
    let by_remote = store
        .find_by_mail_chimp_id(&list.mail_chimp_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(by_id, list);
    assert_eq!(by_remote.list_id, list.list_id);
});

db_test!(member_save_is_an_upsert_with_lists, |pool| {
    let lists = PostgresListStore::new(pool.clone());
    let members = PostgresMemberStore::new(pool);
    let newsletter = ListFixtures::newsletter();
    let updates = ListFixtures::product_updates();
    lists.save(&newsletter).await.unwrap();
    lists.save(&updates).await.unwrap();

    let mut member = MemberFixtures::unsynced(&newsletter);
    members.save(&member).await.unwrap();

    member.assign_mail_chimp_member_id("62eeb292278cc15f5817cb78f7790b08");
    member.status = MemberStatus::Subscribed;
    member.add_list(updates.list_id);
    members.save(&member).await.unwrap();

    let stored = members.find_by_id(member.member_id).await.unwrap().unwrap();
    assert_eq!(stored.status, MemberStatus::Subscribed);
    assert_eq!(stored.mail_chimp_member_id.as_deref(), Some("62eeb292278cc15f5817cb78f7790b08"));
    assert_eq!(stored.lists.len(), 2);
    assert_eq!(stored.merge_fields, member.merge_fields);
    assert_eq!(stored.tags, member.tags);
});

db_test!(members_of_a_remote_list, |pool| {
    let lists = PostgresListStore::new(pool.clone());
    let members = PostgresMemberStore::new(pool);
    let newsletter = ListFixtures::newsletter();
    let updates = ListFixtures::product_updates();
    lists.save(&newsletter).await.unwrap();
    lists.save(&updates).await.unwrap();

    for _ in 0..3 {
        members
            .save(&TestMemberBuilder::new().for_list(&newsletter).build())
            .await
            .unwrap();
    }
    members
        .save(&TestMemberBuilder::new().for_list(&updates).build())
        .await
        .unwrap();

    let found = members
        .find_by_mail_chimp_id(&newsletter.mail_chimp_id)
        .await
        .unwrap();
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|m| m.lists == vec![newsletter.list_id]));
});

db_test!(delete_removes_member_and_reports_missing, |pool| {
    let lists = PostgresListStore::new(pool.clone());
    let members = PostgresMemberStore::new(pool);
    let list = ListFixtures::newsletter();
    lists.save(&list).await.unwrap();

    let member = MemberFixtures::synced(&list);
    members.save(&member).await.unwrap();
    members.delete(member.member_id).await.unwrap();

    assert!(members.find_by_id(member.member_id).await.unwrap().is_none());
    assert!(members.delete(MemberId::new()).await.unwrap_err().is_not_found());
});
