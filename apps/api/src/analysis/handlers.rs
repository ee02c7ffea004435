use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;

use crate::analysis::pipeline::{run_analysis, validate_inputs, AnalysisReport, AnalysisRequest};
use crate::errors::AppError;
use crate::extraction::attribution::intervention_features;
use crate::extraction::prompts::build_extraction_prompt;
use crate::prediction::registry::FamilyStatus;
use crate::schema::{FeatureSpec, ModelFamily, TargetSpec};
use crate::state::AppState;

#[derive(Serialize)]
pub struct PromptPreview {
    pub prompt: String,
}

#[derive(Serialize)]
pub struct ModelStatusResponse {
    pub models_dir: Option<String>,
    pub extraction_models: Vec<String>,
    pub families: BTreeMap<ModelFamily, FamilyStatus>,
}

#[derive(Serialize)]
pub struct FamilySchema {
    pub family: ModelFamily,
    pub title: &'static str,
    pub features: &'static [FeatureSpec],
    pub targets: &'static [TargetSpec],
    pub intervention_features: &'static [&'static str],
}

impl FamilySchema {
    fn describe(family: ModelFamily) -> Self {
        Self {
            family,
            title: family.title(),
            features: family.features(),
            targets: family.targets(),
            intervention_features: intervention_features(family),
        }
    }
}

/// POST /api/v1/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisReport>, AppError> {
    let Json(req) = payload?;
    let report = run_analysis(&state.extractor, &state.registry, &req).await?;
    Ok(Json(report))
}

/// POST /api/v1/prompt
/// Renders the extraction prompt without calling any model.
pub async fn handle_prompt_preview(
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<PromptPreview>, AppError> {
    let Json(req) = payload?;
    validate_inputs(&req.persona, &req.intervention)?;
    Ok(Json(PromptPreview {
        prompt: build_extraction_prompt(&req.persona, &req.intervention),
    }))
}

/// GET /api/v1/models/status
pub async fn handle_model_status(State(state): State<AppState>) -> Json<ModelStatusResponse> {
    Json(ModelStatusResponse {
        models_dir: state
            .registry
            .source_dir()
            .map(|dir| dir.display().to_string()),
        extraction_models: state.extractor.models().to_vec(),
        families: state.registry.status(),
    })
}

/// GET /api/v1/schema
pub async fn handle_schema() -> Json<Vec<FamilySchema>> {
    Json(
        ModelFamily::ALL
            .into_iter()
            .map(FamilySchema::describe)
            .collect(),
    )
}

/// GET /api/v1/schema/:family
pub async fn handle_family_schema(
    Path(family): Path<String>,
) -> Result<Json<FamilySchema>, AppError> {
    let family: ModelFamily = family
        .parse()
        .map_err(|_| AppError::NotFound(format!("Model family '{family}' not found")))?;
    Ok(Json(FamilySchema::describe(family)))
}
