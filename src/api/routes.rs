use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/items", get(handlers::get_items).post(handlers::upsert_item))
        // Per-user preferences
        .route("/users/:user_id/interactions", post(handlers::record_interaction))
        .route("/users/:user_id/profile", get(handlers::get_profile))
        // Recommendations
        .route("/users/:user_id/recommendations", post(handlers::recommend))
        .route("/users/:user_id/recommendations/explain", post(handlers::explain))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
