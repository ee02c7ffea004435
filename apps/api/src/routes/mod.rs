pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog
        .route("/api/v1/schema", get(handlers::handle_schema))
        .route("/api/v1/schema/:family", get(handlers::handle_family_schema))
        .route("/api/v1/models/status", get(handlers::handle_model_status))
        // Analysis
        .route("/api/v1/prompt", post(handlers::handle_prompt_preview))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .with_state(state)
}
