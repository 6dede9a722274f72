//! Mirrored MailChimp lists
//!
//! Lists are owned by a separate part of the system; the member domain only
//! reads them to resolve the remote list identifier and to check references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::ListId;

/// A local mirror of a MailChimp audience (list)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailChimpList {
    /// Local identifier
    pub list_id: ListId,
    /// Identifier assigned by MailChimp, used in every remote member path
    pub mail_chimp_id: String,
    /// Display name of the list
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MailChimpList {
    /// Creates a list mirror for an audience that already exists remotely
    pub fn new(mail_chimp_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            list_id: ListId::new(),
            mail_chimp_id: mail_chimp_id.into(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
