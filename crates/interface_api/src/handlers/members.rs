//! List member handlers
//!
//! Thin adapters from HTTP onto [`MemberService`](domain_mailchimp::MemberService):
//! the HTTP method picks the update and removal modes.

use axum::{
    extract::{Path, State},
    Json,
};

use domain_mailchimp::{ListMember, MemberView, RemovalMode, UpdateMode};

use crate::dto::member::{ListPath, MemberBody, MemberPath, RemovalPath, RemovedResponse};
use crate::{error::ApiError, AppState};

/// Adds a member to a list
pub async fn create_member(
    State(state): State<AppState>,
    Path(path): Path<ListPath>,
    MemberBody(payload): MemberBody,
) -> Result<Json<ListMember>, ApiError> {
    let list_id = path.list_id()?;

    let member = state.service.create(list_id, &payload).await?;
    Ok(Json(member))
}

/// Lists the members of a list
pub async fn list_members(
    State(state): State<AppState>,
    Path(path): Path<ListPath>,
) -> Result<Json<MemberView>, ApiError> {
    let list_id = path.list_id()?;
    Ok(Json(state.service.show(list_id, None).await?))
}

/// Gets a single member
pub async fn get_member(
    State(state): State<AppState>,
    Path(path): Path<MemberPath>,
) -> Result<Json<MemberView>, ApiError> {
    let (list_id, member_id) = path.ids()?;
    Ok(Json(state.service.show(list_id, Some(member_id)).await?))
}

/// Replaces a member (PUT)
pub async fn replace_member(
    state: State<AppState>,
    path: Path<MemberPath>,
    body: MemberBody,
) -> Result<Json<ListMember>, ApiError> {
    update_member(state, path, body, UpdateMode::Replace).await
}

/// Partially updates a member (PATCH)
pub async fn patch_member(
    state: State<AppState>,
    path: Path<MemberPath>,
    body: MemberBody,
) -> Result<Json<ListMember>, ApiError> {
    update_member(state, path, body, UpdateMode::Patch).await
}

async fn update_member(
    State(state): State<AppState>,
    Path(path): Path<MemberPath>,
    MemberBody(payload): MemberBody,
    mode: UpdateMode,
) -> Result<Json<ListMember>, ApiError> {
    let (list_id, member_id) = path.ids()?;

    let member = state.service.update(list_id, member_id, &payload, mode).await?;
    Ok(Json(member))
}

/// Removes a member (DELETE)
pub async fn delete_member(
    State(state): State<AppState>,
    Path(path): Path<MemberPath>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let (list_id, member_id) = path.ids()?;
    let mode = RemovalMode::resolve(false, None);

    state.service.remove(list_id, member_id, mode).await?;
    Ok(Json(RemovedResponse::default()))
}

/// Removes a member (POST without a flag)
pub async fn remove_member(
    State(state): State<AppState>,
    Path(path): Path<MemberPath>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let (list_id, member_id) = path.ids()?;
    let mode = RemovalMode::resolve(true, None);

    state.service.remove(list_id, member_id, mode).await?;
    Ok(Json(RemovedResponse::default()))
}

/// Removes a member (POST with a flag); `delete` erases it permanently
pub async fn remove_member_with_flag(
    State(state): State<AppState>,
    Path(path): Path<RemovalPath>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let (list_id, member_id) = path.ids()?;
    let mode = RemovalMode::resolve(true, Some(path.remove_flag.as_str()));

    state.service.remove(list_id, member_id, mode).await?;
    Ok(Json(RemovedResponse::default()))
}
