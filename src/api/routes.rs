use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Screens
        .route("/", get(handlers::home))
        .route("/search", get(handlers::search))
        .route("/details", get(handlers::details_by_title))
        .route("/details/:key", get(handlers::details))
        .route("/movie/:key", get(handlers::legacy_movie))
        // Fragments for in-page updates
        .route("/fragments/search", get(handlers::search_fragment))
        .route("/fragments/home", get(handlers::home_fragment))
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}
