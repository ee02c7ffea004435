//! Prediction Aggregator: runs every loaded artifact of every requested
//! family over the normalized parameters.
//!
//! Failures are contained: a family that cannot run is recorded as absent, a
//! target whose inference fails is omitted, and neither affects its siblings.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::extraction::parser::{ExtractedParameters, FeatureValues};
use crate::prediction::artifact::{InferenceError, Predictor};
use crate::prediction::registry::ModelRegistry;
use crate::schema::{ModelFamily, TargetKind};

/// Output for one target. Classification targets carry P(class = 1) when the
/// artifact exposes it; regression targets never do.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub prediction: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

/// target → record, for one family.
pub type FamilyPrediction = BTreeMap<String, PredictionRecord>;

/// Results for every requested family; `None` marks a family with no result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PredictionResults(BTreeMap<ModelFamily, Option<FamilyPrediction>>);

impl PredictionResults {
    #[allow(dead_code)]
    pub fn from_families(families: BTreeMap<ModelFamily, Option<FamilyPrediction>>) -> Self {
        Self(families)
    }

    /// The family's records, or `None` if it was not requested or is absent.
    pub fn family(&self, family: ModelFamily) -> Option<&FamilyPrediction> {
        self.0.get(&family).and_then(Option::as_ref)
    }

    pub fn record(&self, family: ModelFamily, target: &str) -> Option<&PredictionRecord> {
        self.family(family).and_then(|records| records.get(target))
    }

    #[allow(dead_code)]
    pub fn contains(&self, family: ModelFamily) -> bool {
        self.0.contains_key(&family)
    }

    pub fn available_families(&self) -> Vec<ModelFamily> {
        self.0
            .iter()
            .filter(|(_, result)| result.is_some())
            .map(|(family, _)| *family)
            .collect()
    }
}

/// Builds the feature row in declared order. Missing features and nulls are
/// 0; booleans are 1/0; any other non-numeric value rejects the row.
pub fn build_feature_row(
    family: ModelFamily,
    values: &FeatureValues,
) -> Result<Vec<f64>, InferenceError> {
    family
        .features()
        .iter()
        .map(|spec| match values.get(spec.name) {
            None | Some(Value::Null) => Ok(0.0),
            Some(Value::Bool(b)) => Ok(if *b { 1.0 } else { 0.0 }),
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| non_numeric(spec.name, n)),
            Some(other) => Err(non_numeric(spec.name, other)),
        })
        .collect()
}

fn non_numeric(feature: &str, value: impl ToString) -> InferenceError {
    InferenceError::NonNumericFeature {
        feature: feature.to_string(),
        value: value.to_string(),
    }
}

/// Runs the requested families. The result has one entry per requested family.
pub fn predict_all(
    registry: &ModelRegistry,
    parameters: &ExtractedParameters,
    families: &[ModelFamily],
) -> PredictionResults {
    let results = families
        .iter()
        .map(|&family| {
            let result = predict_family(registry, parameters, family);
            match &result {
                Some(records) => info!("Prediction successful for {family} ({} targets)", records.len()),
                None => warn!("No prediction for {family}"),
            }
            (family, result)
        })
        .collect();

    PredictionResults(results)
}

/// `predict_all` over every family.
pub fn predict_requested(
    registry: &ModelRegistry,
    parameters: &ExtractedParameters,
) -> PredictionResults {
    predict_all(registry, parameters, &ModelFamily::ALL)
}

fn predict_family(
    registry: &ModelRegistry,
    parameters: &ExtractedParameters,
    family: ModelFamily,
) -> Option<FamilyPrediction> {
    if !registry.is_loaded(family) {
        warn!("Model family {family} is not loaded");
        return None;
    }

    let Some(values) = parameters.family(family) else {
        warn!("No parameters provided for {family}");
        return None;
    };

    let row = match build_feature_row(family, values) {
        Ok(row) => row,
        Err(e) => {
            warn!("Cannot build feature row for {family}: {e}");
            return None;
        }
    };

    let mut records = FamilyPrediction::new();
    for target in family.targets() {
        let Some(predictor) = registry.predictor(family, target.name) else {
            continue;
        };
        match predict_target(predictor, target.kind, &row) {
            Ok(record) => {
                records.insert(target.name.to_string(), record);
            }
            Err(e) => warn!("Inference failed for {family}.{}: {e}", target.name),
        }
    }

    if records.is_empty() {
        None
    } else {
        Some(records)
    }
}

fn predict_target(
    predictor: &dyn Predictor,
    kind: TargetKind,
    row: &[f64],
) -> Result<PredictionRecord, InferenceError> {
    let prediction = predictor.predict(row)?;
    match kind {
        TargetKind::Classification => Ok(PredictionRecord {
            prediction: prediction.trunc(),
            probability: predictor.predict_proba(row)?.map(|[_, p1]| p1),
        }),
        TargetKind::Regression => Ok(PredictionRecord {
            prediction,
            probability: None,
        }),
    }
}
