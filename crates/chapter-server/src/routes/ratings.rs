//! Rating and review endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use chapter_core::types::{BookId, RatingId};
use chapter_store::RatingsView;

use crate::auth::{MaybeSession, Session};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RateBook {
    pub stars: u8,
    #[serde(default)]
    pub review: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewComment {
    pub content: String,
}

pub async fn for_book(
    State(app): State<AppState>,
    MaybeSession(token): MaybeSession,
    Path(book_id): Path<BookId>,
) -> Result<Json<RatingsView>, ApiError> {
    Ok(Json(app.store.ratings_view(book_id, token.as_deref())?))
}

pub async fn rate(
    State(app): State<AppState>,
    Session(token): Session,
    Path(book_id): Path<BookId>,
    Json(body): Json<RateBook>,
) -> Result<Json<RatingsView>, ApiError> {
    Ok(Json(app.store.submit_rating(&token, book_id, body.stars, &body.review)?))
}

pub async fn like(
    State(app): State<AppState>,
    Session(token): Session,
    Path(rating_id): Path<RatingId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let liked = app.store.toggle_review_like(&token, rating_id)?;
    Ok(Json(json!({ "liked": liked })))
}

pub async fn comment(
    State(app): State<AppState>,
    Session(token): Session,
    Path(rating_id): Path<RatingId>,
    Json(body): Json<ReviewComment>,
) -> Result<Json<RatingsView>, ApiError> {
    Ok(Json(app.store.add_review_comment(&token, rating_id, &body.content)?))
}

pub async fn delete(
    State(app): State<AppState>,
    Session(token): Session,
    Path(rating_id): Path<RatingId>,
) -> Result<StatusCode, ApiError> {
    app.store.delete_rating(&token, rating_id)?;
    Ok(StatusCode::NO_CONTENT)
}
