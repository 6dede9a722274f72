//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! member mirror test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built lists, members, and payloads
//! - `builders`: Builder patterns for test data construction
//! - `database`: PostgreSQL test containers
//! - `assertions`: Assertion helpers for member errors and remote calls
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
