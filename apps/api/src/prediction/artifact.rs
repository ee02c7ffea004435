//! Prediction artifacts: a uniform `Predictor` contract over heterogeneous
//! persisted model types.
//!
//! Artifacts are JSON documents tagged by `"kind"`. Each kind has one adapter:
//! `linear`, `logistic` and `tree_ensemble`. Structural checks run at load time
//! so a bad file surfaces as an `ArtifactError` before any request uses it.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InferenceError {
    #[error("Feature row has {got} values, model expects {expected}")]
    RowLength { expected: usize, got: usize },

    #[error("Feature '{feature}' is not numeric: {value}")]
    NonNumericFeature { feature: String, value: String },

    #[error("Model produced a non-finite output")]
    NonFinite,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid artifact JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Artifact has {got} coefficients, family declares {expected} features")]
    FeatureCount { expected: usize, got: usize },

    #[error("Invalid artifact: {0}")]
    Invalid(String),
}

/// Opaque predictor over a feature row in the family's declared order.
pub trait Predictor: Send + Sync {
    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError>;

    /// `[P(class 0), P(class 1)]` for models that expose class probabilities.
    fn predict_proba(&self, _row: &[f64]) -> Result<Option<[f64; 2]>, InferenceError> {
        Ok(None)
    }

    fn kind(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// Artifact documents
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactSpec {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    Logistic {
        intercept: f64,
        coefficients: Vec<f64>,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    TreeEnsemble {
        mode: EnsembleMode,
        trees: Vec<Tree>,
    },
}

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnsembleMode {
    /// Leaves hold P(class 1); the ensemble averages them.
    Classification,
    /// Leaves hold scores; the ensemble averages them.
    Regression,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Go `left` when `row[feature] <= threshold`, else `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl ArtifactSpec {
    /// Validates the document against the family's feature count and builds
    /// the matching adapter.
    pub fn into_predictor(self, n_features: usize) -> Result<Box<dyn Predictor>, ArtifactError> {
        match self {
            ArtifactSpec::Linear {
                intercept,
                coefficients,
            } => {
                let weights = Weights::new(intercept, coefficients, n_features)?;
                Ok(Box::new(LinearModel { weights }))
            }
            ArtifactSpec::Logistic {
                intercept,
                coefficients,
                threshold,
            } => {
                if !(threshold > 0.0 && threshold < 1.0) {
                    return Err(ArtifactError::Invalid(format!(
                        "logistic threshold {threshold} outside (0, 1)"
                    )));
                }
                let weights = Weights::new(intercept, coefficients, n_features)?;
                Ok(Box::new(LogisticModel { weights, threshold }))
            }
            ArtifactSpec::TreeEnsemble { mode, trees } => {
                validate_trees(&trees, mode, n_features)?;
                Ok(Box::new(TreeEnsemble {
                    mode,
                    trees,
                    n_features,
                }))
            }
        }
    }
}

/// Reads and validates one artifact file.
pub fn load_artifact(path: &Path, n_features: usize) -> Result<Box<dyn Predictor>, ArtifactError> {
    let raw = std::fs::read_to_string(path)?;
    let spec: ArtifactSpec = serde_json::from_str(&raw)?;
    spec.into_predictor(n_features)
}

fn check_row(row: &[f64], expected: usize) -> Result<(), InferenceError> {
    if row.len() != expected {
        return Err(InferenceError::RowLength {
            expected,
            got: row.len(),
        });
    }
    Ok(())
}

fn finite(value: f64) -> Result<f64, InferenceError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InferenceError::NonFinite)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Linear / logistic adapters
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Weights {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl Weights {
    fn new(intercept: f64, coefficients: Vec<f64>, n_features: usize) -> Result<Self, ArtifactError> {
        if coefficients.len() != n_features {
            return Err(ArtifactError::FeatureCount {
                expected: n_features,
                got: coefficients.len(),
            });
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactError::Invalid("non-finite weight".to_string()));
        }
        Ok(Self {
            intercept,
            coefficients,
        })
    }

    fn decision(&self, row: &[f64]) -> Result<f64, InferenceError> {
        check_row(row, self.coefficients.len())?;
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum();
        finite(dot + self.intercept)
    }
}

/// Ordinary least-squares style regressor.
#[derive(Debug)]
pub struct LinearModel {
    weights: Weights,
}

impl Predictor for LinearModel {
    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError> {
        self.weights.decision(row)
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

/// Binary logistic classifier.
#[derive(Debug)]
pub struct LogisticModel {
    weights: Weights,
    threshold: f64,
}

impl LogisticModel {
    fn positive_probability(&self, row: &[f64]) -> Result<f64, InferenceError> {
        let z = self.weights.decision(row)?;
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl Predictor for LogisticModel {
    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError> {
        let p = self.positive_probability(row)?;
        Ok(if p >= self.threshold { 1.0 } else { 0.0 })
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Option<[f64; 2]>, InferenceError> {
        let p = self.positive_probability(row)?;
        Ok(Some([1.0 - p, p]))
    }

    fn kind(&self) -> &'static str {
        "logistic"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tree ensemble adapter
// ────────────────────────────────────────────────────────────────────────────

/// Averaging ensemble of binary decision trees (random-forest style).
#[derive(Debug)]
pub struct TreeEnsemble {
    mode: EnsembleMode,
    trees: Vec<Tree>,
    n_features: usize,
}

impl TreeEnsemble {
    fn score(&self, row: &[f64]) -> Result<f64, InferenceError> {
        check_row(row, self.n_features)?;
        let total: f64 = self.trees.iter().map(|tree| tree.evaluate(row)).sum();
        finite(total / self.trees.len() as f64)
    }
}

impl Tree {
    fn evaluate(&self, row: &[f64]) -> f64 {
        // Children always sit at higher indices (checked at load), so this terminates.
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

impl Predictor for TreeEnsemble {
    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError> {
        let score = self.score(row)?;
        Ok(match self.mode {
            EnsembleMode::Classification => {
                if score >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            EnsembleMode::Regression => score,
        })
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Option<[f64; 2]>, InferenceError> {
        match self.mode {
            EnsembleMode::Classification => {
                let p = self.score(row)?;
                Ok(Some([1.0 - p, p]))
            }
            EnsembleMode::Regression => Ok(None),
        }
    }

    fn kind(&self) -> &'static str {
        "tree_ensemble"
    }
}

fn validate_trees(trees: &[Tree], mode: EnsembleMode, n_features: usize) -> Result<(), ArtifactError> {
    if trees.is_empty() {
        return Err(ArtifactError::Invalid("tree ensemble has no trees".to_string()));
    }

    for (t, tree) in trees.iter().enumerate() {
        if tree.nodes.is_empty() {
            return Err(ArtifactError::Invalid(format!("tree {t} has no nodes")));
        }
        for (idx, node) in tree.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(ArtifactError::Invalid(format!(
                            "tree {t} node {idx}: feature index {feature} out of range"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ArtifactError::Invalid(format!(
                            "tree {t} node {idx}: non-finite threshold"
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= tree.nodes.len() {
                            return Err(ArtifactError::Invalid(format!(
                                "tree {t} node {idx}: child {child} must point forward within the tree"
                            )));
                        }
                    }
                }
                Node::Leaf { value } => {
                    let in_range = match mode {
                        EnsembleMode::Classification => (0.0..=1.0).contains(value),
                        EnsembleMode::Regression => value.is_finite(),
                    };
                    if !in_range {
                        return Err(ArtifactError::Invalid(format!(
                            "tree {t} node {idx}: leaf value {value} invalid for {mode:?}"
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}
