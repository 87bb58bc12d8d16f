//! Discussion thread endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use chapter_core::types::{BookId, CommentId, DiscussionId, PostId};
use chapter_store::{DiscussionView, PostView};

use crate::auth::Session;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateDiscussion {
    pub book_id: BookId,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePost {
    pub content: String,
    #[serde(default)]
    pub is_spoiler: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<CommentId>,
    #[serde(default)]
    pub is_spoiler: bool,
}

pub async fn list_for_book(
    State(app): State<AppState>,
    Path(book_id): Path<BookId>,
) -> Result<Json<Vec<DiscussionView>>, ApiError> {
    Ok(Json(app.store.discussions_for_book(book_id)?))
}

pub async fn create(
    State(app): State<AppState>,
    Session(token): Session,
    Json(body): Json<CreateDiscussion>,
) -> Result<(StatusCode, Json<DiscussionView>), ApiError> {
    let view = app.store.create_discussion(&token, body.book_id, &body.title)?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn detail(
    State(app): State<AppState>,
    Path(discussion_id): Path<DiscussionId>,
) -> Result<Json<DiscussionView>, ApiError> {
    Ok(Json(app.store.discussion_view(discussion_id)?))
}

pub async fn add_post(
    State(app): State<AppState>,
    Session(token): Session,
    Path(discussion_id): Path<DiscussionId>,
    Json(body): Json<CreatePost>,
) -> Result<(StatusCode, Json<PostView>), ApiError> {
    let view = app
        .store
        .add_post(&token, discussion_id, &body.content, body.is_spoiler)?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn like_post(
    State(app): State<AppState>,
    Session(token): Session,
    Path(post_id): Path<PostId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let liked = app.store.toggle_post_like(&token, post_id)?;
    Ok(Json(json!({ "liked": liked })))
}

pub async fn add_comment(
    State(app): State<AppState>,
    Session(token): Session,
    Path(post_id): Path<PostId>,
    Json(body): Json<CreateComment>,
) -> Result<(StatusCode, Json<PostView>), ApiError> {
    let view = app.store.add_comment(
        &token,
        post_id,
        body.parent_id,
        &body.content,
        body.is_spoiler,
    )?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn like_comment(
    State(app): State<AppState>,
    Session(token): Session,
    Path(comment_id): Path<CommentId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let liked = app.store.toggle_comment_like(&token, comment_id)?;
    Ok(Json(json!({ "liked": liked })))
}
