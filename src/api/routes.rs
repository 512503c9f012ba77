use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        // outermost, so the trace span sees the request ID
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        // Rating and recommendations
        .route("/movies/random", get(handlers::random_movies))
        .route("/recommendations", post(handlers::recommend))
}
