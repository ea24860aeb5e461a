//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Period lifecycle
        .route("/periods", get(handlers::list_periods))
        .route("/periods", post(handlers::create_period))
        .route("/periods/{period_id}/status", get(handlers::get_period_status))
        .route("/periods/{period_id}/open", post(handlers::open_period))
        .route(
            "/periods/{period_id}/schedule-open",
            post(handlers::schedule_period_open),
        )
        .route(
            "/periods/{period_id}/cancel-schedule",
            post(handlers::cancel_period_schedule),
        )
        .route("/periods/{period_id}/close", post(handlers::close_period))
        .route("/periods/{period_id}", delete(handlers::delete_period))
        // Defense events
        .route("/periods/{period_id}/events", post(handlers::propose_event))
        .route("/periods/{period_id}/events", get(handlers::list_events))
        .route(
            "/periods/{period_id}/generate",
            post(handlers::generate_schedule),
        )
        .route("/events/{event_id}", delete(handlers::withdraw_event))
        // Batch publication
        .route(
            "/periods/{period_id}/batch/status",
            get(handlers::get_batch_status),
        )
        .route(
            "/periods/{period_id}/batch/schedule",
            post(handlers::schedule_batch_publish),
        )
        .route(
            "/periods/{period_id}/batch/cancel",
            post(handlers::cancel_batch_schedule),
        )
        .route(
            "/periods/{period_id}/batch/publish",
            post(handlers::publish_batch),
        );

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulingSettings;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo =
            Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(repo, SchedulingSettings::default());
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
