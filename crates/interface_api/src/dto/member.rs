//! Member DTOs
//!
//! Path segments arrive as raw strings so an identifier that is not a UUID
//! can be reported as a missing record rather than a malformed request.
//! Member bodies are accepted as JSON or as a flat urlencoded form.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::{Deserialize, Serialize};

use core_kernel::{ListId, MemberId};
use domain_mailchimp::MemberPayload;

use crate::error::ApiError;

/// `/mailchimp/list/:list_id/members`
#[derive(Debug, Deserialize)]
pub struct ListPath {
    pub list_id: String,
}

/// `/mailchimp/list/:list_id/members/:member_id`
#[derive(Debug, Deserialize)]
pub struct MemberPath {
    pub list_id: String,
    pub member_id: String,
}

/// `/mailchimp/list/:list_id/members/:member_id/:remove_flag`
#[derive(Debug, Deserialize)]
pub struct RemovalPath {
    pub list_id: String,
    pub member_id: String,
    pub remove_flag: String,
}

/// Member attributes from a request body
#[derive(Debug)]
pub struct MemberBody(pub MemberPayload);

#[async_trait]
impl<S> FromRequest<S> for MemberBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(payload) = Form::<MemberPayload>::from_request(req, state).await?;
            Ok(MemberBody(payload))
        } else {
            let Json(payload) = Json::<MemberPayload>::from_request(req, state).await?;
            Ok(MemberBody(payload))
        }
    }
}

/// Body of a successful removal: `{}`
#[derive(Debug, Default, Serialize)]
pub struct RemovedResponse {}

impl ListPath {
    pub fn list_id(&self) -> Result<ListId, ApiError> {
        parse_list_id(&self.list_id)
    }
}

impl MemberPath {
    pub fn ids(&self) -> Result<(ListId, MemberId), ApiError> {
        Ok((parse_list_id(&self.list_id)?, parse_member_id(&self.member_id)?))
    }
}

impl RemovalPath {
    pub fn ids(&self) -> Result<(ListId, MemberId), ApiError> {
        Ok((parse_list_id(&self.list_id)?, parse_member_id(&self.member_id)?))
    }
}

fn parse_list_id(raw: &str) -> Result<ListId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("{}[{}] not found", ListId::entity(), raw)))
}

fn parse_member_id(raw: &str) -> Result<MemberId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("{}[{}] not found", MemberId::entity(), raw)))
}
