//! Router assembly for the penfix HTTP API.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the router with every route, CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/repair", post(handlers::repair::repair))
        .route("/check", post(handlers::check::check))
        .route("/actions", post(handlers::actions::actions))
        .route("/score", post(handlers::score::score))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
