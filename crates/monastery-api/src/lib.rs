//! REST API for the Monastery360 heritage platform.
//!
//! axum router over in-memory stores: monastery catalog, documentation
//! records, media upload and JWT auth. Every list endpoint answers with
//! the `{success, data, pagination}` envelope; errors use
//! `{success: false, message}` with the taxonomy in [`error`].

pub mod auth;
pub mod config;
pub mod error;
pub mod pagination;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::{AppState, SharedState};

use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// When set, 500 bodies carry the underlying error text. Off in
/// production.
static EXPOSE_ERRORS: AtomicBool = AtomicBool::new(false);

pub fn set_expose_errors(value: bool) {
    EXPOSE_ERRORS.store(value, Ordering::Relaxed);
}

pub(crate) fn expose_errors() -> bool {
    EXPOSE_ERRORS.load(Ordering::Relaxed)
}

/// Slack on top of the per-file cap for multipart framing overhead.
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

/// Build the full application router.
pub fn router(state: SharedState) -> Router {
    let body_limit = state.media.max_upload_bytes + BODY_LIMIT_SLACK;

    Router::new()
        .route("/health", get(health))
        // Monasteries
        .route("/api/v1/monasteries", get(routes::monasteries::list))
        .route(
            "/api/v1/monasteries/featured/list",
            get(routes::monasteries::featured),
        )
        .route(
            "/api/v1/monasteries/slug/{slug}",
            get(routes::monasteries::by_slug),
        )
        .route("/api/v1/monasteries/{id}", get(routes::monasteries::by_id))
        // Documentation
        .route(
            "/api/v1/documentation/artifacts",
            get(routes::documentation::artifacts),
        )
        .route(
            "/api/v1/documentation/artifacts/{id}",
            get(routes::documentation::artifact_by_id),
        )
        .route(
            "/api/v1/documentation/rituals",
            get(routes::documentation::rituals),
        )
        .route(
            "/api/v1/documentation/rituals/{id}",
            get(routes::documentation::ritual_by_id),
        )
        .route(
            "/api/v1/documentation/historical-records",
            get(routes::documentation::historical_records),
        )
        .route(
            "/api/v1/documentation/historical-records/{id}",
            get(routes::documentation::historical_record_by_id),
        )
        // Media
        .route("/api/v1/media/upload", post(routes::media::upload))
        .route(
            "/api/v1/media/upload-multiple",
            post(routes::media::upload_multiple),
        )
        .route(
            "/api/v1/media/files/{filename}",
            get(routes::media::serve_file).delete(routes::media::delete_file),
        )
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/me", get(auth::me))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct Health {
    success: bool,
    message: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        success: true,
        message: "Monastery360 API is running",
    })
}
