pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ats::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route(
            "/api/v1/analysis/ats-score/:document_id",
            post(handlers::handle_ats_score),
        )
        .route(
            "/api/v1/analysis/ats-score/:document_id/:analysis_id",
            get(handlers::handle_get_analysis),
        )
        .route(
            "/api/v1/analysis/optimize-resume/:document_id",
            post(handlers::handle_optimize_resume),
        )
        .with_state(state)
}
