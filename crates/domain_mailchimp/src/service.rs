//! Member domain service
//!
//! The `MemberService` coordinates the local member mirror and the remote
//! directory. There is no transaction spanning the two systems; consistency
//! comes from the order of the writes:
//!
//! - **create**: local write, remote create, local write of the remote id.
//!   A remote failure leaves a local record without `mail_chimp_member_id`.
//! - **update**: remote update, then local write. A remote failure leaves
//!   the local record untouched.
//! - **remove**: remote delete, then local delete. A remote failure keeps
//!   the local record.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use core_kernel::{ListId, MemberId};

use crate::error::MemberError;
use crate::export::exportable_fields;
use crate::list::MailChimpList;
use crate::member::{ListMember, MemberDraft, MemberPayload};
use crate::ports::{ListStore, MemberStore, RemoteDirectory, RemovalMode, UpdateMode};
use crate::validation::{member_rules, ValidationResult, Validator};

/// Result of a show request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MemberView {
    One(ListMember),
    Many(Vec<ListMember>),
}

/// Service for managing list members across the local mirror and MailChimp
#[derive(Clone)]
pub struct MemberService {
    lists: Arc<dyn ListStore>,
    members: Arc<dyn MemberStore>,
    remote: Arc<dyn RemoteDirectory>,
}

impl MemberService {
    /// Creates a new member service
    ///
    /// # Arguments
    ///
    /// * `lists` - Read access to the mirrored lists
    /// * `members` - The local member mirror
    /// * `remote` - The MailChimp member API
    pub fn new(
        lists: Arc<dyn ListStore>,
        members: Arc<dyn MemberStore>,
        remote: Arc<dyn RemoteDirectory>,
    ) -> Self {
        Self {
            lists,
            members,
            remote,
        }
    }

    /// Adds a member to a list
    ///
    /// Only `email_address` and `status` are taken from the payload.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the list does not exist
    /// - `ValidationFailed` if the member breaks the rules; nothing is written
    /// - `Remote` if MailChimp rejects the member; the local record is kept
    #[instrument(skip_all, fields(list_id = %list_id))]
    pub async fn create(
        &self,
        list_id: ListId,
        payload: &MemberPayload,
    ) -> Result<ListMember, MemberError> {
        let list = self.require_list(list_id).await?;

        let mut draft = MemberDraft::for_list(&list);
        draft.fill_only(payload, &MemberPayload::CREATABLE);
        let mut member = self.validated(draft).await?;

        // Local first, so a remote failure still leaves a discoverable record.
        self.members.save(&member).await?;
        debug!(member_id = %member.member_id, "Member stored locally");

        let response = self
            .remote
            .create_member(&list.mail_chimp_id, &exportable_fields(&member))
            .await
            .map_err(|e| {
                warn!(member_id = %member.member_id, error = %e, "MailChimp rejected new member");
                MemberError::remote(e)
            })?;

        let remote_id = response.id().ok_or_else(|| {
            MemberError::remote_message("MailChimp response did not include a member id")
        })?;
        member.assign_mail_chimp_member_id(remote_id);
        self.members.save(&member).await?;

        info!(
            member_id = %member.member_id,
            mail_chimp_member_id = remote_id,
            "Member created"
        );
        Ok(member)
    }

    /// Removes a member from a list
    ///
    /// # Errors
    ///
    /// - `NotFound` if the list or member does not exist
    /// - `Remote` if the remote delete fails; the local record is kept
    #[instrument(skip_all, fields(list_id = %list_id, member_id = %member_id))]
    pub async fn remove(
        &self,
        list_id: ListId,
        member_id: MemberId,
        mode: RemovalMode,
    ) -> Result<(), MemberError> {
        let list = self.require_list(list_id).await?;
        let member = self.require_member(member_id).await?;
        let remote_id = require_remote_id(&member)?;

        let outcome = match mode {
            RemovalMode::Permanent => {
                self.remote
                    .delete_member_permanent(&list.mail_chimp_id, remote_id)
                    .await
            }
            RemovalMode::Archive => self.remote.delete_member(&list.mail_chimp_id, remote_id).await,
        };
        outcome.map_err(|e| {
            warn!(error = %e, ?mode, "MailChimp failed to remove member");
            MemberError::remote(e)
        })?;

        self.members.delete(member.member_id).await?;

        info!(?mode, "Member removed");
        Ok(())
    }

    /// Returns one member, or every member mirrored for a list
    ///
    /// A list without members is reported exactly like a missing list.
    #[instrument(skip_all, fields(list_id = %list_id))]
    pub async fn show(
        &self,
        list_id: ListId,
        member_id: Option<MemberId>,
    ) -> Result<MemberView, MemberError> {
        if let Some(member_id) = member_id {
            return self.require_member(member_id).await.map(MemberView::One);
        }

        let list = self.require_list(list_id).await?;
        let members = self.members.find_by_mail_chimp_id(&list.mail_chimp_id).await?;
        if members.is_empty() {
            return Err(MemberError::not_found(ListId::entity(), list_id));
        }

        debug!(count = members.len(), "Members found");
        Ok(MemberView::Many(members))
    }

    /// Changes a member
    ///
    /// Only attributes present in the payload change. MailChimp is updated
    /// first; the local record is written only once it accepted the change.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the list or member does not exist
    /// - `ValidationFailed` if the result breaks the rules; nothing is written
    /// - `Remote` if MailChimp rejects the update; the local record is unchanged
    #[instrument(skip_all, fields(list_id = %list_id, member_id = %member_id))]
    pub async fn update(
        &self,
        list_id: ListId,
        member_id: MemberId,
        payload: &MemberPayload,
        mode: UpdateMode,
    ) -> Result<ListMember, MemberError> {
        let list = self.require_list(list_id).await?;
        let current = self.require_member(member_id).await?;

        let mut draft = MemberDraft::from_member(&current);
        draft.fill(payload);
        let updated = self.validated(draft).await?;

        let remote_id = require_remote_id(&current)?;
        self.remote
            .update_member(&list.mail_chimp_id, remote_id, &exportable_fields(&updated), mode)
            .await
            .map_err(|e| {
                warn!(error = %e, ?mode, "MailChimp rejected member update");
                MemberError::remote(e)
            })?;

        self.members.save(&updated).await?;

        info!(?mode, "Member updated");
        Ok(updated)
    }

    async fn require_list(&self, list_id: ListId) -> Result<MailChimpList, MemberError> {
        self.lists
            .find_by_id(list_id)
            .await?
            .ok_or_else(|| MemberError::not_found(ListId::entity(), list_id))
    }

    async fn require_member(&self, member_id: MemberId) -> Result<ListMember, MemberError> {
        self.members
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| MemberError::not_found(MemberId::entity(), member_id))
    }

    async fn validated(&self, draft: MemberDraft) -> Result<ListMember, MemberError> {
        let result = Validator::new(self.lists.as_ref())
            .validate(draft.fields(), &member_rules())
            .await?;
        if !result.is_valid() {
            debug!(errors = ?result.errors(), "Member failed validation");
            return Err(MemberError::validation(result));
        }

        draft.build().map_err(|e| {
            let mut result = ValidationResult::ok();
            result.add_error("payload", e.to_string());
            MemberError::validation(result)
        })
    }
}

fn require_remote_id(member: &ListMember) -> Result<&str, MemberError> {
    member.mail_chimp_member_id.as_deref().ok_or_else(|| {
        MemberError::remote_message(format!(
            "{}[{}] has not been synchronised with MailChimp",
            MemberId::entity(),
            member.member_id
        ))
    })
}
