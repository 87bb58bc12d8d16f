//! The HTTP surface: an axum JSON API over the club store

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use chapter_store::Store;

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use state::AppState;

pub fn router(app: AppState, allowed_origin: Option<&str>) -> Router {
    let cors = cors_layer(allowed_origin);

    Router::new()
        .route("/health", get(health))
        .route("/clubs", post(routes::clubs::create))
        .route("/clubs/join", post(routes::clubs::join))
        .route("/clubs/{code}", get(routes::clubs::overview))
        .route("/clubs/{code}/leave", post(routes::clubs::leave))
        .route("/clubs/{code}/policy", post(routes::clubs::update_policy))
        .route(
            "/clubs/{code}/members/{id}/promote",
            post(routes::clubs::promote),
        )
        .route(
            "/clubs/{code}/members/{id}/demote",
            post(routes::clubs::demote),
        )
        .route("/books/suggest", post(routes::books::suggest))
        .route("/books/select/{code}", post(routes::books::select))
        .route("/books/{id}/complete", post(routes::books::complete))
        .route("/books/{id}/veto", post(routes::books::veto))
        .route("/books/{id}/vote", post(routes::books::vote))
        .route(
            "/discussions/book/{book_id}",
            get(routes::discussions::list_for_book),
        )
        .route("/discussions", post(routes::discussions::create))
        .route("/discussions/{id}", get(routes::discussions::detail))
        .route("/discussions/{id}/posts", post(routes::discussions::add_post))
        .route(
            "/discussions/posts/{id}/like",
            post(routes::discussions::like_post),
        )
        .route(
            "/discussions/posts/{id}/comments",
            post(routes::discussions::add_comment),
        )
        .route(
            "/discussions/comments/{id}/like",
            post(routes::discussions::like_comment),
        )
        .route("/meetings/club/{code}", get(routes::meetings::overview))
        .route(
            "/meetings/schedule/{code}",
            post(routes::meetings::setup_schedule),
        )
        .route("/meetings/create/{code}", post(routes::meetings::create))
        .route("/meetings/{id}/complete", post(routes::meetings::complete))
        .route("/meetings/{id}/cancel", post(routes::meetings::cancel))
        .route(
            "/meetings/transfer-host/{code}",
            post(routes::meetings::transfer_host),
        )
        .route("/meetings/{id}/ics", get(routes::meetings::ics))
        .route(
            "/meetings/{id}/rsvp",
            get(routes::meetings::rsvp_page).post(routes::meetings::submit_rsvp),
        )
        .route(
            "/ratings/book/{book_id}",
            get(routes::ratings::for_book).post(routes::ratings::rate),
        )
        .route("/ratings/{id}/like", post(routes::ratings::like))
        .route("/ratings/{id}/comments", post(routes::ratings::comment))
        .route("/ratings/{id}/delete", post(routes::ratings::delete))
        .layer(cors)
        .with_state(app)
}

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);
    match allowed_origin.and_then(|o| match o.parse::<HeaderValue>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Invalid CHAPTER_ALLOWED_ORIGIN {o:?}: {e}; allowing any");
            None
        }
    }) {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": chapter_core::VERSION,
    }))
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let store = match &config.data_path {
        Some(path) => Store::open(path)?,
        None => Store::in_memory(),
    };
    let app = router(AppState::new(store), config.allowed_origin.as_deref());

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", config.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to install ctrl-c handler: {e}");
        return;
    }
    info!("shutdown signal received");
}
