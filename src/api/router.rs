// src/api/router.rs
// HTTP router composition

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::handlers::{
    health_handler, index_handler, process_file_handler, process_text_handler,
};
use crate::config::CONFIG;
use crate::state::AppState;

/// Main HTTP router: health, text processing, and file upload endpoints.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    let origins: Vec<HeaderValue> = CONFIG
        .allowed_origins()
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(600));

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/process", post(process_text_handler))
        .route("/process-file", post(process_file_handler))
        .layer(DefaultBodyLimit::max(CONFIG.max_upload_bytes()))
        .layer(cors)
        .with_state(app_state)
}
