use std::sync::Arc;

use crate::extraction::orchestrator::ParameterExtractor;
use crate::prediction::registry::ModelRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// LLM parameter extraction with ordered model failover.
    pub extractor: Arc<ParameterExtractor>,
    /// Prediction artifacts, loaded once at startup and read-only afterwards.
    pub registry: Arc<ModelRegistry>,
}
