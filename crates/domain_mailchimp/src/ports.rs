//! Member Domain Ports
//!
//! This module defines the port interfaces the member service depends on,
//! enabling swappable implementations (PostgreSQL, the MailChimp API, mocks).
//!
//! # Architecture
//!
//! - **ListStore**: read access to the mirrored lists (owned elsewhere)
//! - **MemberStore**: the local member mirror
//! - **RemoteDirectory**: the provider's member API
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_mailchimp::{MemberService, MailChimpAdapter};
//! use infra_db::adapters::{PostgresListStore, PostgresMemberStore};
//! use std::sync::Arc;
//!
//! let service = MemberService::new(
//!     Arc::new(PostgresListStore::new(pool.clone())),
//!     Arc::new(PostgresMemberStore::new(pool)),
//!     Arc::new(MailChimpAdapter::new(mailchimp_config)?),
//! );
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use core_kernel::{DomainPort, HealthCheckable, ListId, MemberId, PortError};

use crate::list::MailChimpList;
use crate::member::ListMember;

/// Flag value that turns a creation-verb removal into a permanent delete
pub const PERMANENT_DELETE_FLAG: &str = "delete";

/// How a remote member update is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Partial update (HTTP PATCH)
    Patch,
    /// Full replacement (HTTP PUT)
    Replace,
}

/// How a member is removed from the remote directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalMode {
    /// Standard delete; MailChimp archives the contact
    Archive,
    /// Permanent erasure through the `delete-permanent` action
    Permanent,
}

impl RemovalMode {
    /// Resolves the mode of a removal request
    ///
    /// Permanent deletion requires both a creation-style verb and the
    /// [`PERMANENT_DELETE_FLAG`]; anything else is a standard delete.
    pub fn resolve(creation_verb: bool, flag: Option<&str>) -> Self {
        match (creation_verb, flag) {
            (true, Some(PERMANENT_DELETE_FLAG)) => RemovalMode::Permanent,
            _ => RemovalMode::Archive,
        }
    }
}

/// The body MailChimp returned for a member operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteMember(Map<String, Value>);

impl RemoteMember {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns a field of the response
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The member identifier assigned by MailChimp
    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(Value::as_str).filter(|id| !id.is_empty())
    }
}

/// Read access to the mirrored lists
#[async_trait]
pub trait ListStore: DomainPort + HealthCheckable {
    /// Finds a list by its local identifier
    async fn find_by_id(&self, id: ListId) -> Result<Option<MailChimpList>, PortError>;

    /// Finds a list by the identifier MailChimp assigned to it
    async fn find_by_mail_chimp_id(
        &self,
        mail_chimp_id: &str,
    ) -> Result<Option<MailChimpList>, PortError>;

    /// Inserts or replaces a list
    async fn save(&self, list: &MailChimpList) -> Result<(), PortError>;
}

/// The local member mirror
#[async_trait]
pub trait MemberStore: DomainPort + HealthCheckable {
    /// Finds a member by its local identifier
    async fn find_by_id(&self, id: MemberId) -> Result<Option<ListMember>, PortError>;

    /// Returns every member mirrored for the given MailChimp list
    async fn find_by_mail_chimp_id(&self, mail_chimp_id: &str) -> Result<Vec<ListMember>, PortError>;

    /// Inserts or replaces a member together with its list associations
    async fn save(&self, member: &ListMember) -> Result<(), PortError>;

    /// Deletes a member and its list associations
    async fn delete(&self, id: MemberId) -> Result<(), PortError>;
}

/// The provider's member API
///
/// All identifiers are MailChimp's own: `list_id` is a list's
/// `mail_chimp_id`, `member_id` a member's `mail_chimp_member_id`.
#[async_trait]
pub trait RemoteDirectory: DomainPort + HealthCheckable {
    /// Adds a member to a remote list
    async fn create_member(
        &self,
        list_id: &str,
        fields: &Map<String, Value>,
    ) -> Result<RemoteMember, PortError>;

    /// Sends the member's fields to its remote resource
    async fn update_member(
        &self,
        list_id: &str,
        member_id: &str,
        fields: &Map<String, Value>,
        mode: UpdateMode,
    ) -> Result<RemoteMember, PortError>;

    /// Removes (archives) a member
    async fn delete_member(&self, list_id: &str, member_id: &str) -> Result<(), PortError>;

    /// Permanently erases a member
    async fn delete_member_permanent(&self, list_id: &str, member_id: &str) -> Result<(), PortError>;
}

/// Mock implementations for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    fn healthy(adapter_id: &str) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: adapter_id.to_string(),
            status: AdapterHealth::Healthy,
            latency_ms: 0,
            message: Some("Mock adapter always healthy".to_string()),
            checked_at: Utc::now(),
        }
    }

    /// In-memory mock implementation of ListStore
    #[derive(Debug, Default)]
    pub struct MockListStore {
        lists: Arc<RwLock<HashMap<ListId, MailChimpList>>>,
    }

    impl MockListStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with lists for testing
        pub async fn with_lists(lists: Vec<MailChimpList>) -> Self {
            let store = Self::new();
            for list in lists {
                store.lists.write().await.insert(list.list_id, list);
            }
            store
        }
    }

    impl DomainPort for MockListStore {}

    #[async_trait]
    impl HealthCheckable for MockListStore {
        async fn health_check(&self) -> HealthCheckResult {
            healthy("mock-list-store")
        }
    }

    #[async_trait]
    impl ListStore for MockListStore {
        async fn find_by_id(&self, id: ListId) -> Result<Option<MailChimpList>, PortError> {
            Ok(self.lists.read().await.get(&id).cloned())
        }

        async fn find_by_mail_chimp_id(
            &self,
            mail_chimp_id: &str,
        ) -> Result<Option<MailChimpList>, PortError> {
            Ok(self
                .lists
                .read()
                .await
                .values()
                .find(|l| l.mail_chimp_id == mail_chimp_id)
                .cloned())
        }

        async fn save(&self, list: &MailChimpList) -> Result<(), PortError> {
            self.lists.write().await.insert(list.list_id, list.clone());
            Ok(())
        }
    }

    /// In-memory mock implementation of MemberStore
    ///
    /// Every save is also appended to a history so tests can observe the
    /// intermediate states of a multi-step write.
    #[derive(Debug, Default)]
    pub struct MockMemberStore {
        members: Arc<RwLock<HashMap<MemberId, ListMember>>>,
        history: Arc<RwLock<Vec<ListMember>>>,
        fail_writes: bool,
    }

    impl MockMemberStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with members for testing
        pub async fn with_members(members: Vec<ListMember>) -> Self {
            let store = Self::new();
            for member in members {
                store.members.write().await.insert(member.member_id, member);
            }
            store
        }

        /// A store whose saves and deletes always fail
        pub fn failing_writes() -> Self {
            Self {
                fail_writes: true,
                ..Self::default()
            }
        }

        /// Every member passed to `save`, in order
        pub async fn saves(&self) -> Vec<ListMember> {
            self.history.read().await.clone()
        }

        pub async fn len(&self) -> usize {
            self.members.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.members.read().await.is_empty()
        }

        fn check_writable(&self) -> Result<(), PortError> {
            if self.fail_writes {
                return Err(PortError::connection("mock member store is read-only"));
            }
            Ok(())
        }
    }

    impl DomainPort for MockMemberStore {}

    #[async_trait]
    impl HealthCheckable for MockMemberStore {
        async fn health_check(&self) -> HealthCheckResult {
            healthy("mock-member-store")
        }
    }

    #[async_trait]
    impl MemberStore for MockMemberStore {
        async fn find_by_id(&self, id: MemberId) -> Result<Option<ListMember>, PortError> {
            Ok(self.members.read().await.get(&id).cloned())
        }

        async fn find_by_mail_chimp_id(
            &self,
            mail_chimp_id: &str,
        ) -> Result<Vec<ListMember>, PortError> {
            let mut members: Vec<_> = self
                .members
                .read()
                .await
                .values()
                .filter(|m| m.mail_chimp_id == mail_chimp_id)
                .cloned()
                .collect();
            members.sort_by_key(|m| m.created_at);
            Ok(members)
        }

        async fn save(&self, member: &ListMember) -> Result<(), PortError> {
            self.check_writable()?;
            self.members.write().await.insert(member.member_id, member.clone());
            self.history.write().await.push(member.clone());
            Ok(())
        }

        async fn delete(&self, id: MemberId) -> Result<(), PortError> {
            self.check_writable()?;
            self.members
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("MailChimpListMember", id))
        }
    }

    /// A call received by [`MockRemoteDirectory`]
    #[derive(Debug, Clone, PartialEq)]
    pub enum RemoteCall {
        Create {
            list_id: String,
            fields: Map<String, Value>,
        },
        Update {
            list_id: String,
            member_id: String,
            fields: Map<String, Value>,
            mode: UpdateMode,
        },
        Delete {
            list_id: String,
            member_id: String,
        },
        DeletePermanent {
            list_id: String,
            member_id: String,
        },
    }

    /// Recording mock of the MailChimp member API
    ///
    /// Created members get the id `remote-{n}`. A failing mock records the
    /// call and then answers with a provider rejection.
    #[derive(Debug, Default)]
    pub struct MockRemoteDirectory {
        calls: Arc<RwLock<Vec<RemoteCall>>>,
        failure: Option<String>,
    }

    impl MockRemoteDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        /// A directory that rejects every call with `message`
        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                failure: Some(message.into()),
                ..Self::default()
            }
        }

        /// Every call received, in order
        pub async fn calls(&self) -> Vec<RemoteCall> {
            self.calls.read().await.clone()
        }

        async fn record(&self, call: RemoteCall) -> Result<usize, PortError> {
            let mut calls = self.calls.write().await;
            calls.push(call);
            match &self.failure {
                Some(message) => Err(PortError::rejected(400, message.clone())),
                None => Ok(calls.len()),
            }
        }
    }

    impl DomainPort for MockRemoteDirectory {}

    #[async_trait]
    impl HealthCheckable for MockRemoteDirectory {
        async fn health_check(&self) -> HealthCheckResult {
            healthy("mock-remote-directory")
        }
    }

    #[async_trait]
    impl RemoteDirectory for MockRemoteDirectory {
        async fn create_member(
            &self,
            list_id: &str,
            fields: &Map<String, Value>,
        ) -> Result<RemoteMember, PortError> {
            let n = self
                .record(RemoteCall::Create {
                    list_id: list_id.to_string(),
                    fields: fields.clone(),
                })
                .await?;

            let mut body = fields.clone();
            body.insert("id".to_string(), Value::String(format!("remote-{}", n)));
            body.insert("list_id".to_string(), Value::String(list_id.to_string()));
            Ok(RemoteMember::new(body))
        }

        async fn update_member(
            &self,
            list_id: &str,
            member_id: &str,
            fields: &Map<String, Value>,
            mode: UpdateMode,
        ) -> Result<RemoteMember, PortError> {
            self.record(RemoteCall::Update {
                list_id: list_id.to_string(),
                member_id: member_id.to_string(),
                fields: fields.clone(),
                mode,
            })
            .await?;

            let mut body = fields.clone();
            body.insert("id".to_string(), Value::String(member_id.to_string()));
            Ok(RemoteMember::new(body))
        }

        async fn delete_member(&self, list_id: &str, member_id: &str) -> Result<(), PortError> {
            self.record(RemoteCall::Delete {
                list_id: list_id.to_string(),
                member_id: member_id.to_string(),
            })
            .await
            .map(|_| ())
        }

        async fn delete_member_permanent(
            &self,
            list_id: &str,
            member_id: &str,
        ) -> Result<(), PortError> {
            self.record(RemoteCall::DeletePermanent {
                list_id: list_id.to_string(),
                member_id: member_id.to_string(),
            })
            .await
            .map(|_| ())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_removal_mode_requires_verb_and_flag() {
        assert_eq!(RemovalMode::resolve(true, Some("delete")), RemovalMode::Permanent);
        assert_eq!(RemovalMode::resolve(false, Some("delete")), RemovalMode::Archive);
        assert_eq!(RemovalMode::resolve(true, None), RemovalMode::Archive);
        assert_eq!(RemovalMode::resolve(true, Some("archive")), RemovalMode::Archive);
        assert_eq!(RemovalMode::resolve(true, Some("DELETE")), RemovalMode::Archive);
    }

    #[test]
    fn test_remote_member_id() {
        let member = RemoteMember::new(
            json!({"id": "852aaa9532cb36adfb5e9fef7a4206a9", "status": "subscribed"})
                .as_object()
                .cloned()
                .unwrap(),
        );
        assert_eq!(member.id(), Some("852aaa9532cb36adfb5e9fef7a4206a9"));
        assert_eq!(member.get("status"), Some(&json!("subscribed")));

        let blank = RemoteMember::new(json!({"id": ""}).as_object().cloned().unwrap());
        assert_eq!(blank.id(), None);
        assert_eq!(RemoteMember::default().id(), None);
    }
}
