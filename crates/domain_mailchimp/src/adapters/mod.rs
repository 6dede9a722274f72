//! External Adapters for the Member Domain
//!
//! - **MailChimpAdapter**: the MailChimp Marketing API v3 over HTTPS
//! - **MockRemoteDirectory**: recording mock for tests (re-exported from the ports module)
//!
//! ```rust,ignore
//! use domain_mailchimp::adapters::{MailChimpAdapter, MailChimpConfig};
//! use domain_mailchimp::RemoteDirectory;
//! use std::sync::Arc;
//!
//! let adapter = MailChimpAdapter::new(MailChimpConfig {
//!     api_key: "0123456789abcdef-us6".to_string(),
//!     ..Default::default()
//! })?;
//! let remote: Arc<dyn RemoteDirectory> = Arc::new(adapter);
//! ```

pub mod mailchimp_api;

pub use mailchimp_api::{MailChimpAdapter, MailChimpConfig};
