//! Member repository implementation
//!
//! Members live in `mail_chimp_list_members`; their list associations in the
//! `mail_chimp_list_members_group` join table. Saving a member rewrites both
//! inside one transaction so a reader never sees a member with half of its
//! associations.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DatabaseError;

const MEMBER_COLUMNS: &str = r#"
    member_id, email_address, email_type, status, merge_fields, interests,
    ip_signup, unsubscribe_reason, email_client, tags, stats,
    mail_chimp_member_id, mail_chimp_id, created_at, updated_at
"#;

/// A row of `mail_chimp_list_members`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MemberRow {
    pub member_id: Uuid,
    pub email_address: String,
    pub email_type: Option<String>,
    pub status: String,
    pub merge_fields: Json<Map<String, Value>>,
    pub interests: Json<Map<String, Value>>,
    pub ip_signup: Option<String>,
    pub unsubscribe_reason: Option<String>,
    pub email_client: Option<String>,
    pub tags: Json<Vec<String>>,
    pub stats: Json<Map<String, Value>>,
    pub mail_chimp_member_id: Option<String>,
    pub mail_chimp_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row of the member/list join table
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct MemberListRow {
    pub member_id: Uuid,
    pub list_id: Uuid,
}

/// Repository for list members and their list associations
#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a member by its local identifier
    pub async fn get_by_id(&self, member_id: Uuid) -> Result<Option<MemberRow>, DatabaseError> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {} FROM mail_chimp_list_members WHERE member_id = $1",
            MEMBER_COLUMNS
        ))
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Retrieves every member of a remote list, oldest first
    pub async fn find_by_mail_chimp_id(
        &self,
        mail_chimp_id: &str,
    ) -> Result<Vec<MemberRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {} FROM mail_chimp_list_members WHERE mail_chimp_id = $1 \
             ORDER BY created_at, member_id",
            MEMBER_COLUMNS
        ))
        .bind(mail_chimp_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Retrieves the list associations of the given members
    pub async fn list_links(&self, member_ids: &[Uuid]) -> Result<Vec<MemberListRow>, DatabaseError> {
        if member_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, MemberListRow>(
            r#"
            SELECT member_id, list_id
            FROM mail_chimp_list_members_group
            WHERE member_id = ANY($1)
            ORDER BY member_id, list_id
            "#,
        )
        .bind(member_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserts or replaces a member and its list associations
    pub async fn upsert(&self, row: MemberRow, list_ids: &[Uuid]) -> Result<(), DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO mail_chimp_list_members (
                member_id, email_address, email_type, status, merge_fields, interests,
                ip_signup, unsubscribe_reason, email_client, tags, stats,
                mail_chimp_member_id, mail_chimp_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (member_id) DO UPDATE SET
                email_address = EXCLUDED.email_address,
                email_type = EXCLUDED.email_type,
                status = EXCLUDED.status,
                merge_fields = EXCLUDED.merge_fields,
                interests = EXCLUDED.interests,
                ip_signup = EXCLUDED.ip_signup,
                unsubscribe_reason = EXCLUDED.unsubscribe_reason,
                email_client = EXCLUDED.email_client,
                tags = EXCLUDED.tags,
                stats = EXCLUDED.stats,
                mail_chimp_member_id = EXCLUDED.mail_chimp_member_id,
                mail_chimp_id = EXCLUDED.mail_chimp_id,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(row.member_id)
        .bind(row.email_address)
        .bind(row.email_type)
        .bind(row.status)
        .bind(row.merge_fields)
        .bind(row.interests)
        .bind(row.ip_signup)
        .bind(row.unsubscribe_reason)
        .bind(row.email_client)
        .bind(row.tags)
        .bind(row.stats)
        .bind(row.mail_chimp_member_id)
        .bind(row.mail_chimp_id)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM mail_chimp_list_members_group WHERE member_id = $1")
            .bind(row.member_id)
            .execute(&mut *tx)
            .await?;

        if !list_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO mail_chimp_list_members_group (member_id, list_id)
                SELECT $1, list_id FROM UNNEST($2::uuid[]) AS t(list_id)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(row.member_id)
            .bind(list_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        debug!(member_id = %row.member_id, lists = list_ids.len(), "Member row saved");
        Ok(())
    }

    /// Deletes a member; the join rows go with it
    pub async fn delete(&self, member_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM mail_chimp_list_members WHERE member_id = $1")
            .bind(member_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("MailChimpListMember", member_id));
        }
        Ok(())
    }
}
