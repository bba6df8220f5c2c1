use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::config::defaults::default_cors_origins;
use crate::server::handlers::{documents, health};
use crate::state::AppState;

/// Creates the application router with all routes and middleware.
///
/// This function sets up:
/// - CORS middleware
/// - Upload body limit
/// - Status and health endpoints
/// - Upload and question endpoints (with and without trailing slash)
pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = build_cors_layer(&state);
    let body_limit = DefaultBodyLimit::max(state.config.server.max_upload_bytes);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/upload_pdf/", post(documents::upload_pdf))
        .route("/upload_pdf", post(documents::upload_pdf))
        .route("/ask/", post(documents::ask))
        .route("/ask", post(documents::ask))
        .with_state(state)
        .layer(body_limit)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}

fn build_cors_layer(state: &Arc<AppState>) -> CorsLayer {
    let configured = &state.config.server.cors_allowed_origins;
    let origins = if configured.is_empty() {
        default_cors_origins()
    } else {
        configured.clone()
    };

    let allow_origin = AllowOrigin::list(
        origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect::<Vec<_>>(),
    );

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
}
