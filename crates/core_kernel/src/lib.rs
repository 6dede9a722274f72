//! Core Kernel - Foundational types shared by every crate of the MailChimp mirror
//!
//! This crate provides the fundamental building blocks used across the workspace:
//! - Strongly-typed identifiers for lists and members
//! - The port error taxonomy shared by internal and external adapters
//! - Health check contracts for adapters

pub mod identifiers;
pub mod ports;
pub mod error;

pub use identifiers::{ListId, MemberId};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
