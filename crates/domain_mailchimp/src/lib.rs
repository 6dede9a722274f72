//! MailChimp List Member Domain
//!
//! This crate mirrors MailChimp list members locally and keeps the mirror in
//! step with MailChimp. Every member write goes through [`MemberService`],
//! which validates the member, then writes to the local store and to
//! MailChimp in a fixed order.
//!
//! # Members and Lists
//!
//! - **MailChimpList**: a mirrored MailChimp list, addressed by its local
//!   `ListId` and by the `mail_chimp_id` MailChimp gave it
//! - **ListMember**: a subscriber of a list; once MailChimp accepted it, it
//!   carries the `mail_chimp_member_id` used for all later remote calls
//!
//! # Examples
//!
//! ```rust
//! use domain_mailchimp::{MailChimpList, MemberDraft, MemberPayload, MemberStatus};
//! use serde_json::json;
//!
//! let list = MailChimpList::new("9e67587f52", "Newsletter");
//! let payload: MemberPayload = serde_json::from_value(json!({
//!     "email_address": "ada@example.com",
//!     "status": "subscribed",
//!     "merge_fields": {"FNAME": "Ada"}
//! })).unwrap();
//!
//! // Only email_address and status are accepted when creating a member
//! let mut draft = MemberDraft::for_list(&list);
//! draft.fill_only(&payload, &MemberPayload::CREATABLE);
//! let member = draft.build().unwrap();
//!
//! assert_eq!(member.status, MemberStatus::Subscribed);
//! assert!(member.merge_fields.is_empty());
//! assert!(!member.is_synced());
//! ```

pub mod list;
pub mod member;
pub mod export;
pub mod validation;
pub mod error;
pub mod ports;
pub mod adapters;
pub mod service;

pub use list::MailChimpList;
pub use member::{EmailType, ListMember, MemberDraft, MemberPayload, MemberStatus};
pub use export::exportable_fields;
pub use validation::{member_rules, Rule, RuleSet, ValidationResult, Validator};
pub use error::MemberError;
pub use ports::{
    ListStore, MemberStore, RemoteDirectory, RemoteMember,
    RemovalMode, UpdateMode, PERMANENT_DELETE_FLAG,
};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockListStore, MockMemberStore, MockRemoteDirectory, RemoteCall};
pub use adapters::{MailChimpAdapter, MailChimpConfig};
pub use service::{MemberService, MemberView};
