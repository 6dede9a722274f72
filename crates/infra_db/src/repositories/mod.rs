//! Repository implementations for the mirror tables
//!
//! Repositories encapsulate the SQL and map rows with `sqlx::FromRow`. They
//! know nothing about the domain types; the adapters do that translation.
//!
//! Queries are checked at runtime so the crate builds without a live
//! database.

pub mod list;
pub mod member;

pub use list::{ListRepository, ListRow};
pub use member::{MemberListRow, MemberRepository, MemberRow};
