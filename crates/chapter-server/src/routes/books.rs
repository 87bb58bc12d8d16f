//! Book workflow endpoints: suggest, select, complete, veto, upvote

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use chapter_core::types::BookId;
use chapter_store::{BookView, SelectionResult, SuggestBook, VetoOutcome};

use crate::auth::Session;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub club_code: String,
    #[serde(flatten)]
    pub book: SuggestBook,
}

pub async fn suggest(
    State(app): State<AppState>,
    Session(token): Session,
    Json(body): Json<SuggestRequest>,
) -> Result<(StatusCode, Json<BookView>), ApiError> {
    let view = app.store.suggest_book(&token, &body.club_code, body.book)?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn select(
    State(app): State<AppState>,
    Session(token): Session,
    Path(code): Path<String>,
) -> Result<Json<SelectionResult>, ApiError> {
    Ok(Json(app.store.select_next_book(&token, &code)?))
}

pub async fn complete(
    State(app): State<AppState>,
    Session(token): Session,
    Path(book_id): Path<BookId>,
) -> Result<Json<BookView>, ApiError> {
    Ok(Json(app.store.complete_book(&token, book_id)?))
}

pub async fn veto(
    State(app): State<AppState>,
    Session(token): Session,
    Path(book_id): Path<BookId>,
) -> Result<Json<VetoOutcome>, ApiError> {
    Ok(Json(app.store.cast_veto(&token, book_id)?))
}

pub async fn vote(
    State(app): State<AppState>,
    Session(token): Session,
    Path(book_id): Path<BookId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let upvotes = app.store.cast_upvote(&token, book_id)?;
    Ok(Json(json!({ "book_id": book_id, "upvotes": upvotes })))
}
