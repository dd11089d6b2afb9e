//! JSON API.
//!
//! Routes:
//!   GET  /api/health   → health check
//!   GET  /api/images   → one page of images (`?limit=&cursor=`)

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use gallery_common::model::{HealthResponse, ImagesError};
use gallery_common::paging::clamp_limit;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::gallery::{self, LOAD_ERROR};
use crate::store::ImageStore;

/// Shared state for route handlers.
struct ApiState<S> {
    store: Arc<S>,
    start_time: Instant,
}

impl<S> Clone for ApiState<S> {
    fn clone(&self) -> Self {
        ApiState {
            store: self.store.clone(),
            start_time: self.start_time,
        }
    }
}

/// Raw query parameters.  Kept as strings so malformed values fall back to
/// defaults instead of being rejected.
#[derive(Debug, Default, Deserialize)]
struct ImagesParams {
    limit: Option<String>,
    cursor: Option<String>,
}

/// Build the API router over `store`.
pub fn router<S: ImageStore + 'static>(store: Arc<S>) -> Router {
    let state = ApiState {
        store,
        start_time: Instant::now(),
    };

    Router::new()
        .route("/api/health", get(health::<S>))
        .route("/api/images", get(list_images::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── route handlers ───────────────────────────────────────────────────────

async fn health<S: ImageStore>(State(state): State<ApiState<S>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn list_images<S: ImageStore>(
    State(state): State<ApiState<S>>,
    Query(params): Query<ImagesParams>,
) -> Response {
    let limit = clamp_limit(params.limit.as_deref());

    match gallery::load_page(state.store.as_ref(), limit, params.cursor).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            error!("Failed to load images from Datastore: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ImagesError::new(LOAD_ERROR)),
            )
                .into_response()
        }
    }
}
