//! PostgreSQL Member Store
//!
//! Implements the `MemberStore` port over `mail_chimp_list_members` and the
//! `mail_chimp_list_members_group` join table.
//!
//! # Error Handling
//!
//! Database errors are translated to `PortError` variants:
//! - `DatabaseError::NotFound` -> `PortError::NotFound`
//! - constraint violations -> `PortError::Conflict`
//! - stored values the domain cannot read -> `PortError::Transformation`
//! - other errors -> `PortError::Internal`

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, ListId, MemberId, PortError};
use domain_mailchimp::{EmailType, ListMember, MemberStatus, MemberStore};

use crate::repositories::member::{MemberListRow, MemberRepository, MemberRow};

/// PostgreSQL-backed implementation of the MemberStore trait
#[derive(Debug, Clone)]
pub struct PostgresMemberStore {
    repository: MemberRepository,
    pool: PgPool,
}

impl PostgresMemberStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: MemberRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &MemberRepository {
        &self.repository
    }

    async fn hydrate(&self, rows: Vec<MemberRow>) -> Result<Vec<ListMember>, PortError> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.member_id).collect();
        let mut links = group_links(self.repository.list_links(&ids).await?);

        rows.into_iter()
            .map(|row| {
                let lists = links.remove(&row.member_id).unwrap_or_default();
                row_to_member(row, lists)
            })
            .collect()
    }
}

impl DomainPort for PostgresMemberStore {}

#[async_trait]
impl HealthCheckable for PostgresMemberStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-member-store").await
    }
}

#[async_trait]
impl MemberStore for PostgresMemberStore {
    #[instrument(skip(self), fields(member_id = %id))]
    async fn find_by_id(&self, id: MemberId) -> Result<Option<ListMember>, PortError> {
        debug!("Fetching member by ID");

        match self.repository.get_by_id(id.into()).await? {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_mail_chimp_id(&self, mail_chimp_id: &str) -> Result<Vec<ListMember>, PortError> {
        let rows = self.repository.find_by_mail_chimp_id(mail_chimp_id).await?;
        debug!(count = rows.len(), "Fetched members of remote list");
        self.hydrate(rows).await
    }

    #[instrument(skip(self, member), fields(member_id = %member.member_id))]
    async fn save(&self, member: &ListMember) -> Result<(), PortError> {
        let list_ids: Vec<Uuid> = member.lists.iter().map(|id| *id.as_uuid()).collect();
        self.repository
            .upsert(member_to_row(member), &list_ids)
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(member_id = %id))]
    async fn delete(&self, id: MemberId) -> Result<(), PortError> {
        self.repository.delete(id.into()).await?;
        Ok(())
    }
}

fn group_links(links: Vec<MemberListRow>) -> HashMap<Uuid, Vec<ListId>> {
    let mut grouped: HashMap<Uuid, Vec<ListId>> = HashMap::new();
    for link in links {
        grouped
            .entry(link.member_id)
            .or_default()
            .push(ListId::from(link.list_id));
    }
    grouped
}

fn row_to_member(row: MemberRow, lists: Vec<ListId>) -> Result<ListMember, PortError> {
    let status: MemberStatus = row
        .status
        .parse()
        .map_err(|e| PortError::transformation(format!("member {}: {}", row.member_id, e)))?;
    let email_type = row
        .email_type
        .as_deref()
        .map(str::parse::<EmailType>)
        .transpose()
        .map_err(|e| PortError::transformation(format!("member {}: {}", row.member_id, e)))?;

    Ok(ListMember {
        member_id: MemberId::from(row.member_id),
        email_address: row.email_address,
        email_type,
        status,
        merge_fields: row.merge_fields.0,
        interests: row.interests.0,
        ip_signup: row.ip_signup,
        unsubscribe_reason: row.unsubscribe_reason,
        email_client: row.email_client,
        tags: row.tags.0,
        stats: row.stats.0,
        mail_chimp_member_id: row.mail_chimp_member_id,
        mail_chimp_id: row.mail_chimp_id,
        lists,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn member_to_row(member: &ListMember) -> MemberRow {
    MemberRow {
        member_id: *member.member_id.as_uuid(),
        email_address: member.email_address.clone(),
        email_type: member.email_type.map(|t| t.as_str().to_string()),
        status: member.status.as_str().to_string(),
        merge_fields: Json(member.merge_fields.clone()),
        interests: Json(member.interests.clone()),
        ip_signup: member.ip_signup.clone(),
        unsubscribe_reason: member.unsubscribe_reason.clone(),
        email_client: member.email_client.clone(),
        tags: Json(member.tags.clone()),
        stats: Json(member.stats.clone()),
        mail_chimp_member_id: member.mail_chimp_member_id.clone(),
        mail_chimp_id: member.mail_chimp_id.clone(),
        created_at: member.created_at,
        updated_at: member.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{ListFixtures, MemberFixtures};

    #[test]
    fn test_member_row_roundtrip_keeps_lists() {
        let list = ListFixtures::newsletter();
        let member = MemberFixtures::synced(&list);

        let restored = row_to_member(member_to_row(&member), member.lists.clone()).unwrap();
        assert_eq!(restored, member);
    }

    #[test]
    fn test_unknown_status_is_a_transformation_error() {
        let list = ListFixtures::newsletter();
        let mut row = member_to_row(&MemberFixtures::synced(&list));
        row.status = "archived".to_string();

        let err = row_to_member(row, Vec::new()).unwrap_err();
        assert!(matches!(err, PortError::Transformation { .. }));
    }

    #[test]
    fn test_group_links() {
        let member = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let grouped = group_links(vec![
            MemberListRow { member_id: member, list_id: a },
            MemberListRow { member_id: member, list_id: b },
        ]);
        assert_eq!(grouped[&member], vec![ListId::from(a), ListId::from(b)]);
    }
}
