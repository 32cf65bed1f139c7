//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get, post, put},
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

    let api = Router::new()
        // Feature preconditions
        .route("/feature-preconditions", post(handlers::create_precondition))
        .route("/feature-preconditions/{id}", put(handlers::update_precondition))
        // Questionnaires
        .route("/questionnaires", get(handlers::list_questionnaires))
        .route("/questionnaires", post(handlers::save_questionnaire))
        .route("/questionnaires/{id}", delete(handlers::delete_questionnaire))
        // Validation answers
        .route(
            "/validation-answers",
            get(handlers::list_validation_answers)
                .post(handlers::save_validation_answer)
                .delete(handlers::delete_validation_answer_row),
        )
        // Read-only reference tables
        .route("/validations", get(handlers::list_validations))
        .route("/validation-summaries", get(handlers::list_validation_summaries))
        .route("/validation-values", get(handlers::list_validation_values))
        .route(
            "/validation-combination-results",
            get(handlers::list_validation_combination_results),
        );

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo =
            Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(repo);
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
