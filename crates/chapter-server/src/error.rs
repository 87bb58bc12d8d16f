//! Domain-error to HTTP-status mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use chapter_store::StoreError;

/// Wraps the store error so handlers can use `?` straight through
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] StoreError);

impl ApiError {
    pub fn unauthorized() -> Self {
        Self(StoreError::InvalidSession)
    }

    fn status(&self) -> StatusCode {
        match &self.0 {
            StoreError::InvalidSession => StatusCode::UNAUTHORIZED,
            e if e.is_forbidden() => StatusCode::FORBIDDEN,
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            StoreError::SnapshotIo(_) | StoreError::SnapshotEncoding(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, %status, "request rejected");
        }
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_line_up_with_error_classes() {
        assert_eq!(
            ApiError::from(StoreError::InvalidSession).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(StoreError::NotAdmin).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(StoreError::VetoDisabled).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(StoreError::ClubNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::EmptyContent).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::InvalidStars(9)).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
