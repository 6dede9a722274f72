//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL side of the member mirror: the
//! connection pool, repositories over the list and member tables, and the
//! adapters implementing the `ListStore` and `MemberStore` ports.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Repositories speak in row types
//! and plain UUIDs; adapters translate between rows and domain records and
//! turn [`DatabaseError`] into `PortError`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//! use infra_db::adapters::PostgresMemberStore;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/mailchimp")).await?;
//! run_migrations(&pool).await?;
//! let members = PostgresMemberStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use adapters::{PostgresListStore, PostgresMemberStore};
