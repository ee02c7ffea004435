use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::attribution::{split_by_source, AttributedParameters};
use crate::extraction::orchestrator::{FailedAttempt, ParameterExtractor, ParameterSource};
use crate::extraction::parser::{ExtractedParameters, FamilySummary};
use crate::prediction::aggregator::{predict_requested, PredictionResults};
use crate::prediction::recommendations::generate_recommendations;
use crate::prediction::registry::ModelRegistry;
use crate::prediction::report::{summarize_results, ResultSummary};
use crate::schema::ModelFamily;

/// Missing fields deserialize as blank and are rejected by `validate_inputs`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisRequest {
    pub persona: String,
    pub intervention: String,
}

/// Where the parameters came from and how complete they were.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub source: ParameterSource,
    pub summary: BTreeMap<ModelFamily, FamilySummary>,
    pub attempts: Vec<FailedAttempt>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub parameters: ExtractedParameters,
    pub attribution: AttributedParameters,
    pub extraction: ExtractionReport,
    pub results: PredictionResults,
    pub summary: ResultSummary,
    pub recommendations: Vec<String>,
}

/// Both descriptions must contain non-whitespace text.
pub fn validate_inputs(persona: &str, intervention: &str) -> Result<(), AppError> {
    match (persona.trim().is_empty(), intervention.trim().is_empty()) {
        (false, false) => Ok(()),
        (true, true) => Err(AppError::Validation(
            "persona and intervention descriptions are required".to_string(),
        )),
        (true, false) => Err(AppError::Validation(
            "persona description is required".to_string(),
        )),
        (false, true) => Err(AppError::Validation(
            "intervention description is required".to_string(),
        )),
    }
}

/// Validates, extracts parameters, predicts every family and assembles the report.
///
/// Rejected before any LLM call when the input is blank or when no model family is loaded.
pub async fn run_analysis(
    extractor: &ParameterExtractor,
    registry: &ModelRegistry,
    request: &AnalysisRequest,
) -> Result<AnalysisReport, AppError> {
    validate_inputs(&request.persona, &request.intervention)?;
    if registry.loaded_families().is_empty() {
        return Err(AppError::ModelsUnavailable);
    }

    let analysis_id = Uuid::new_v4();
    let span = info_span!("analysis", %analysis_id);

    async move {
        info!("Starting analysis");
        let outcome = extractor
            .extract(&request.persona, &request.intervention)
            .await;
        if outcome.used_defaults() {
            warn!("Predicting from default parameters");
        }

        let results = predict_requested(registry, &outcome.parameters);
        let summary = summarize_results(&results);
        let recommendations = generate_recommendations(&results);
        info!(
            "Analysis complete: {} of {} families predicted, {} recommendations",
            results.available_families().len(),
            ModelFamily::ALL.len(),
            recommendations.len()
        );

        Ok(AnalysisReport {
            analysis_id,
            analyzed_at: Utc::now(),
            attribution: split_by_source(&outcome.parameters),
            parameters: outcome.parameters,
            extraction: ExtractionReport {
                source: outcome.source,
                summary: outcome.summary,
                attempts: outcome.attempts,
            },
            results,
            summary,
            recommendations,
        })
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::orchestrator::tests::{ScriptedBackend, DEVELOPER_RESPONSE};
    use crate::prediction::recommendations::FALLBACK_RECOMMENDATIONS;
    use crate::prediction::registry::tests::FixedPredictor;
    use serde_json::json;
    use std::sync::Arc;

    fn request(persona: &str, intervention: &str) -> AnalysisRequest {
        AnalysisRequest {
            persona: persona.to_string(),
            intervention: intervention.to_string(),
        }
    }

    fn full_registry(wash_safety: f64, oliver_score: f64, lorin_accuracy: f64) -> ModelRegistry {
        let mut registry = ModelRegistry::empty();
        for target in ModelFamily::Wash.targets() {
            registry.insert(
                ModelFamily::Wash,
                target.name,
                Box::new(FixedPredictor {
                    value: 1.0,
                    proba: Some(wash_safety),
                }),
            );
        }
        for target in ModelFamily::Oliver.targets() {
            registry.insert(
                ModelFamily::Oliver,
                target.name,
                Box::new(FixedPredictor {
                    value: oliver_score,
                    proba: None,
                }),
            );
        }
        for target in ModelFamily::Lorin.targets() {
            registry.insert(
                ModelFamily::Lorin,
                target.name,
                Box::new(FixedPredictor {
                    value: lorin_accuracy,
                    proba: None,
                }),
            );
        }
        registry
    }

    #[test]
    fn test_validate_inputs_rejects_blank_text() {
        assert!(validate_inputs("a developer", "an email").is_ok());
        assert!(matches!(
            validate_inputs("   ", "an email"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_inputs("a developer", "\n\t"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(validate_inputs("", ""), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_blank_input_makes_no_llm_call() {
        let backend = Arc::new(ScriptedBackend::default().reply("gpt-4o", "{}"));
        let extractor = ParameterExtractor::with_defaults(backend.clone());
        let registry = full_registry(0.5, 0.0, 0.6);

        let result = run_analysis(&extractor, &registry, &request(" ", "email")).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_loaded_models_is_unavailable() {
        let backend = Arc::new(ScriptedBackend::default().reply("gpt-4o", "{}"));
        let extractor = ParameterExtractor::with_defaults(backend.clone());

        let result = run_analysis(&extractor, &ModelRegistry::empty(), &request("dev", "email")).await;

        assert!(matches!(result, Err(AppError::ModelsUnavailable)));
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_developer_scenario_end_to_end() {
        let backend = Arc::new(ScriptedBackend::default().reply("gpt-4o", DEVELOPER_RESPONSE));
        let extractor = ParameterExtractor::with_defaults(backend);
        let registry = full_registry(0.8, 2.5, 0.9);

        let report = run_analysis(
            &extractor,
            &registry,
            &request(
                "A 28-year-old software developer with strong technical skills",
                "An email asking to click a link to reset a password",
            ),
        )
        .await
        .unwrap();

        assert_eq!(
            report.extraction.source,
            ParameterSource::Llm {
                model: "gpt-4o".into()
            }
        );
        assert_eq!(
            report.parameters.get(ModelFamily::Oliver, "perceived_knowledge"),
            Some(&json!(1.5))
        );
        assert_eq!(
            report.parameters.get(ModelFamily::Lorin, "security_training_prior"),
            Some(&json!(0))
        );
        assert_eq!(report.extraction.summary[&ModelFamily::Oliver].supplied, 5);
        assert_eq!(report.results.available_families().len(), 3);

        // actions_requested_click_link is driven by the intervention
        assert!(report.attribution.intervention[&ModelFamily::Wash]
            .contains_key("actions_requested_click_link"));
        assert!(report.attribution.persona[&ModelFamily::Oliver].contains_key("it_job"));

        assert!(report
            .recommendations
            .contains(&crate::prediction::recommendations::SECURITY_CHAMPION.to_string()));
        assert!(report
            .recommendations
            .contains(&crate::prediction::recommendations::PERSONALITY_PROTECTED.to_string()));
    }

    #[tokio::test]
    async fn test_all_models_failing_still_produces_report() {
        let extractor = ParameterExtractor::with_defaults(Arc::new(ScriptedBackend::default()));
        let registry = full_registry(0.5, 1.0, 0.6);

        let report = run_analysis(&extractor, &registry, &request("dev", "email"))
            .await
            .unwrap();

        assert_eq!(report.extraction.source, ParameterSource::Defaults);
        assert_eq!(report.extraction.attempts.len(), 3);
        assert_eq!(
            report.recommendations,
            FALLBACK_RECOMMENDATIONS.map(String::from).to_vec()
        );
    }

    #[tokio::test]
    async fn test_partial_registry_reports_missing_family_as_absent() {
        let mut registry = ModelRegistry::empty();
        registry.insert(
            ModelFamily::Lorin,
            "class_phish_accuracy",
            Box::new(FixedPredictor {
                value: 0.3,
                proba: None,
            }),
        );
        let extractor = ParameterExtractor::with_defaults(Arc::new(
            ScriptedBackend::default().reply("gpt-4o", DEVELOPER_RESPONSE),
        ));

        let report = run_analysis(&extractor, &registry, &request("dev", "email"))
            .await
            .unwrap();

        assert_eq!(report.results.available_families(), vec![ModelFamily::Lorin]);
        assert!(report.summary.wash.is_none());
        assert!(report.summary.lorin.is_some());
    }
}
