//! Meeting, schedule and RSVP endpoints

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use chapter_core::types::{MeetingId, MemberId, RsvpStatus};
use chapter_store::{CreateMeeting, MeetingView, MeetingsOverview, RsvpView, ScheduleParams, ScheduleView};

use crate::auth::Session;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TransferHost {
    pub new_host: MemberId,
}

#[derive(Debug, Deserialize)]
pub struct RsvpRequest {
    pub status: RsvpStatus,
    #[serde(default)]
    pub bringing: String,
    #[serde(default)]
    pub notes: String,
}

pub async fn overview(
    State(app): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<MeetingsOverview>, ApiError> {
    Ok(Json(app.store.meetings_overview(&code)?))
}

pub async fn setup_schedule(
    State(app): State<AppState>,
    Session(token): Session,
    Path(code): Path<String>,
    Json(params): Json<ScheduleParams>,
) -> Result<Json<ScheduleView>, ApiError> {
    Ok(Json(app.store.setup_schedule(&token, &code, params)?))
}

pub async fn create(
    State(app): State<AppState>,
    Session(token): Session,
    Path(code): Path<String>,
    Json(fields): Json<CreateMeeting>,
) -> Result<(StatusCode, Json<MeetingView>), ApiError> {
    let view = app.store.create_meeting(&token, &code, fields)?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn complete(
    State(app): State<AppState>,
    Session(token): Session,
    Path(meeting_id): Path<MeetingId>,
) -> Result<Json<MeetingView>, ApiError> {
    Ok(Json(app.store.complete_meeting(&token, meeting_id)?))
}

pub async fn cancel(
    State(app): State<AppState>,
    Session(token): Session,
    Path(meeting_id): Path<MeetingId>,
) -> Result<Json<MeetingView>, ApiError> {
    Ok(Json(app.store.cancel_meeting(&token, meeting_id)?))
}

pub async fn transfer_host(
    State(app): State<AppState>,
    Session(token): Session,
    Path(code): Path<String>,
    Json(body): Json<TransferHost>,
) -> Result<Json<ScheduleView>, ApiError> {
    Ok(Json(app.store.transfer_host(&token, &code, body.new_host)?))
}

pub async fn ics(
    State(app): State<AppState>,
    Path(meeting_id): Path<MeetingId>,
) -> Result<impl IntoResponse, ApiError> {
    let calendar = app.store.meeting_ics(meeting_id)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"meeting.ics\"",
            ),
        ],
        calendar,
    ))
}

pub async fn rsvp_page(
    State(app): State<AppState>,
    Session(token): Session,
    Path(meeting_id): Path<MeetingId>,
) -> Result<Json<RsvpView>, ApiError> {
    Ok(Json(app.store.rsvp_view(&token, meeting_id)?))
}

pub async fn submit_rsvp(
    State(app): State<AppState>,
    Session(token): Session,
    Path(meeting_id): Path<MeetingId>,
    Json(body): Json<RsvpRequest>,
) -> Result<Json<RsvpView>, ApiError> {
    Ok(Json(app.store.submit_rsvp(
        &token,
        meeting_id,
        body.status,
        body.bringing,
        body.notes,
    )?))
}
