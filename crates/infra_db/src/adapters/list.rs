//! PostgreSQL List Store
//!
//! Implements the `ListStore` port over `mail_chimp_lists`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, ListId, PortError};
use domain_mailchimp::{ListStore, MailChimpList};

use crate::repositories::list::{ListRepository, ListRow};

/// PostgreSQL-backed implementation of the ListStore trait
#[derive(Debug, Clone)]
pub struct PostgresListStore {
    repository: ListRepository,
    pool: PgPool,
}

impl PostgresListStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ListRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &ListRepository {
        &self.repository
    }
}

impl DomainPort for PostgresListStore {}

#[async_trait]
impl HealthCheckable for PostgresListStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-list-store").await
    }
}

#[async_trait]
impl ListStore for PostgresListStore {
    #[instrument(skip(self), fields(list_id = %id))]
    async fn find_by_id(&self, id: ListId) -> Result<Option<MailChimpList>, PortError> {
        debug!("Fetching list by ID");
        let row = self.repository.get_by_id(id.into()).await?;
        Ok(row.map(row_to_list))
    }

    #[instrument(skip(self))]
    async fn find_by_mail_chimp_id(
        &self,
        mail_chimp_id: &str,
    ) -> Result<Option<MailChimpList>, PortError> {
        let row = self.repository.get_by_mail_chimp_id(mail_chimp_id).await?;
        Ok(row.map(row_to_list))
    }

    #[instrument(skip(self, list), fields(list_id = %list.list_id))]
    async fn save(&self, list: &MailChimpList) -> Result<(), PortError> {
        self.repository.upsert(&list_to_row(list)).await?;
        Ok(())
    }
}

fn row_to_list(row: ListRow) -> MailChimpList {
    MailChimpList {
        list_id: ListId::from(row.list_id),
        mail_chimp_id: row.mail_chimp_id,
        name: row.name,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn list_to_row(list: &MailChimpList) -> ListRow {
    ListRow {
        list_id: *list.list_id.as_uuid(),
        mail_chimp_id: list.mail_chimp_id.clone(),
        name: list.name.clone(),
        created_at: list.created_at,
        updated_at: list.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_row_conversion() {
        let list = MailChimpList::new("9e67587f52", "Newsletter");
        assert_eq!(row_to_list(list_to_row(&list)), list);
    }
}
