use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Call control
        .route("/call/start", post(handlers::start_call))
        .route("/call/stop", post(handlers::stop_call))
        .route("/call/status", get(handlers::call_status))
        // Business profile
        .route("/profile", get(handlers::get_profile))
        .route("/profile", put(handlers::update_profile))
        .route("/profile/reset", post(handlers::reset_profile))
        // Browser front end lives on another origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
