use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_size as usize;

    Router::new()
        // Terms
        .route("/api/terms", get(handlers::list_terms))
        .route("/api/terms", post(handlers::create_term))
        .route("/api/terms/:id", put(handlers::update_term))
        .route("/api/terms/:id", delete(handlers::delete_term))
        // Images
        .route("/api/images", get(handlers::list_images))
        .route(
            "/api/images",
            post(handlers::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/images/:id", delete(handlers::delete_image))
        .route("/images/:filename", get(handlers::serve_image))
        // Equations
        .route("/api/equations", get(handlers::list_equations))
        .route("/api/equations", post(handlers::create_equation))
        .route("/api/equations/:id", put(handlers::update_equation))
        .route("/api/equations/:id", delete(handlers::delete_equation))
        // Internal
        .route("/_internal/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
