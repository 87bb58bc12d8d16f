//! Session-token extraction from request headers
//!
//! Clients present the token either as `Authorization: Bearer <token>` or
//! as a `session` cookie. The token itself is only checked against the
//! store inside each operation.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::error::ApiError;

/// A required session token; rejects with 401 when absent
pub struct Session(pub String);

/// An optional session token, for endpoints that personalize their
/// response but also serve anonymous readers
pub struct MaybeSession(pub Option<String>);

fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
        if let Some(token) = value.to_str().ok().and_then(|s| s.strip_prefix("Bearer ")) {
            return Some(token.trim().to_string());
        }
    }
    let cookies = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == "session").then(|| value.to_string())
    })
}

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        token_from_parts(parts)
            .map(Session)
            .ok_or_else(ApiError::unauthorized)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(token_from_parts(parts)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header_name: &str, value: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .header(header_name, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn bearer_header_wins() {
        let parts = parts_with("authorization", "Bearer abc123");
        assert_eq!(token_from_parts(&parts).as_deref(), Some("abc123"));
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let parts = parts_with("cookie", "theme=dark; session=tok42; lang=en");
        assert_eq!(token_from_parts(&parts).as_deref(), Some("tok42"));
    }

    #[test]
    fn no_credentials_means_none() {
        let (parts, ()) = Request::builder().body(()).unwrap().into_parts();
        assert_eq!(token_from_parts(&parts), None);
    }
}
