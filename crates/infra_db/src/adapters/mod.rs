//! Domain Adapters
//!
//! This module provides adapter implementations for the member domain ports,
//! connecting them to the PostgreSQL database layer.
//!
//! Each adapter:
//! - Implements a port trait from `domain_mailchimp`
//! - Translates between domain records and database row types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::{PostgresListStore, PostgresMemberStore};
//! use domain_mailchimp::MemberStore;
//!
//! let members = PostgresMemberStore::new(pool);
//! let member = members.find_by_id(member_id).await?;
//! ```

pub mod list;
pub mod member;

pub use list::PostgresListStore;
pub use member::PostgresMemberStore;

use core_kernel::{AdapterHealth, HealthCheckResult};
use sqlx::PgPool;
use std::time::Instant;

/// Runs `SELECT 1` against the pool and reports the outcome
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();

    let result = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await;

    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheckResult::new(adapter_id, AdapterHealth::Healthy, latency_ms),
        Err(e) => HealthCheckResult::new(adapter_id, AdapterHealth::Unhealthy, latency_ms)
            .with_message(format!("Database error: {}", e)),
    }
}
