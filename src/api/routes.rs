use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::handlers::*;
use super::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ndvi", post(compute_ndvi))
        .route("/api/health", get(health))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(2 * 1024 * 1024)) // 2MB limit
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
