//! Club membership endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use chapter_core::policy::ClubPolicy;
use chapter_core::types::MemberId;
use chapter_store::{ClubOverview, JoinResult, MemberView};

use crate::auth::{MaybeSession, Session};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateClub {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinClub {
    pub code: String,
    pub display_name: String,
}

pub async fn create(
    State(app): State<AppState>,
    Json(body): Json<CreateClub>,
) -> Result<(StatusCode, Json<JoinResult>), ApiError> {
    let result = app
        .store
        .create_club(&body.name, &body.description, &body.display_name)?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn join(
    State(app): State<AppState>,
    Json(body): Json<JoinClub>,
) -> Result<Json<JoinResult>, ApiError> {
    Ok(Json(app.store.join_club(&body.code, &body.display_name)?))
}

pub async fn overview(
    State(app): State<AppState>,
    MaybeSession(token): MaybeSession,
    Path(code): Path<String>,
) -> Result<Json<ClubOverview>, ApiError> {
    Ok(Json(app.store.club_overview(&code, token.as_deref())?))
}

pub async fn leave(
    State(app): State<AppState>,
    Session(token): Session,
    Path(code): Path<String>,
) -> Result<StatusCode, ApiError> {
    app.store.leave_club(&token, &code)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_policy(
    State(app): State<AppState>,
    Session(token): Session,
    Path(code): Path<String>,
    Json(policy): Json<ClubPolicy>,
) -> Result<Json<ClubOverview>, ApiError> {
    app.store.update_policy(&token, &code, policy)?;
    Ok(Json(app.store.club_overview(&code, Some(&token))?))
}

pub async fn promote(
    State(app): State<AppState>,
    Session(token): Session,
    Path((code, member_id)): Path<(String, MemberId)>,
) -> Result<Json<MemberView>, ApiError> {
    Ok(Json(app.store.promote_member(&token, &code, member_id)?))
}

pub async fn demote(
    State(app): State<AppState>,
    Session(token): Session,
    Path((code, member_id)): Path<(String, MemberId)>,
) -> Result<Json<MemberView>, ApiError> {
    Ok(Json(app.store.demote_member(&token, &code, member_id)?))
}
