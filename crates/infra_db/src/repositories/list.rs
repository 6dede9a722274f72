//! List repository implementation

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;

/// A row of `mail_chimp_lists`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ListRow {
    pub list_id: Uuid,
    pub mail_chimp_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for the mirrored lists
#[derive(Debug, Clone)]
pub struct ListRepository {
    pool: PgPool,
}

impl ListRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a list by its local identifier
    pub async fn get_by_id(&self, list_id: Uuid) -> Result<Option<ListRow>, DatabaseError> {
        let row = sqlx::query_as::<_, ListRow>(
            r#"
            SELECT list_id, mail_chimp_id, name, created_at, updated_at
            FROM mail_chimp_lists
            WHERE list_id = $1
            "#,
        )
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Retrieves a list by the identifier MailChimp assigned to it
    pub async fn get_by_mail_chimp_id(
        &self,
        mail_chimp_id: &str,
    ) -> Result<Option<ListRow>, DatabaseError> {
        let row = sqlx::query_as::<_, ListRow>(
            r#"
            SELECT list_id, mail_chimp_id, name, created_at, updated_at
            FROM mail_chimp_lists
            WHERE mail_chimp_id = $1
            "#,
        )
        .bind(mail_chimp_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts a list or replaces the stored one
    pub async fn upsert(&self, row: &ListRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO mail_chimp_lists (list_id, mail_chimp_id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (list_id) DO UPDATE SET
                mail_chimp_id = EXCLUDED.mail_chimp_id,
                name = EXCLUDED.name,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(row.list_id)
        .bind(&row.mail_chimp_id)
        .bind(&row.name)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
