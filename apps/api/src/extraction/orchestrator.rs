//! LLM Extraction Orchestrator: ordered failover across model identifiers.
//!
//! Each configured model is tried once, in priority order. The first attempt
//! that yields a JSON object wins; if every model fails the run degrades to the
//! all-default parameter set. No backoff, no repeated attempts on one model.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::extraction::parser::{
    default_parameters, extract_json, normalize, summarize, ExtractedParameters, ExtractionError,
    FamilySummary,
};
use crate::extraction::prompts::build_extraction_prompt;
use crate::llm_client::{CompletionBackend, LlmError};
use crate::schema::ModelFamily;

pub const DEFAULT_MODELS: [&str; 3] = ["gpt-4o", "gpt-4-turbo", "gpt-3.5-turbo"];
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Where the parameters of a run came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterSource {
    Llm { model: String },
    Defaults,
}

/// A failed attempt, kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedAttempt {
    pub model: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    pub parameters: ExtractedParameters,
    pub source: ParameterSource,
    pub summary: BTreeMap<ModelFamily, FamilySummary>,
    pub attempts: Vec<FailedAttempt>,
}

impl ExtractionOutcome {
    pub fn used_defaults(&self) -> bool {
        self.source == ParameterSource::Defaults
    }
}

pub struct ParameterExtractor {
    backend: Arc<dyn CompletionBackend>,
    models: Vec<String>,
    temperature: f32,
    timeout: Duration,
}

impl ParameterExtractor {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        models: Vec<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            models,
            temperature,
            timeout,
        }
    }

    /// Extractor with the stock model list, temperature and timeout.
    #[allow(dead_code)]
    pub fn with_defaults(backend: Arc<dyn CompletionBackend>) -> Self {
        Self::new(
            backend,
            DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            DEFAULT_TEMPERATURE,
            DEFAULT_TIMEOUT,
        )
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Runs the failover loop. Never fails: exhausting every model yields the
    /// default parameter set with `ParameterSource::Defaults`.
    pub async fn extract(&self, persona: &str, intervention: &str) -> ExtractionOutcome {
        let prompt = build_extraction_prompt(persona, intervention);
        let mut attempts = Vec::new();

        for model in &self.models {
            info!("Requesting parameter extraction from {model}");
            match self.attempt(model, &prompt).await {
                Ok(parsed) => {
                    info!("Extracted parameters with {model}");
                    return ExtractionOutcome {
                        parameters: normalize(&parsed),
                        source: ParameterSource::Llm {
                            model: model.clone(),
                        },
                        summary: summarize(&parsed),
                        attempts,
                    };
                }
                Err(error) => {
                    warn!("Model {model} failed: {error}");
                    attempts.push(FailedAttempt {
                        model: model.clone(),
                        error,
                    });
                }
            }
        }

        warn!(
            "All {} models failed, using default parameters",
            self.models.len()
        );
        let defaults = serde_json::Value::Object(serde_json::Map::new());
        ExtractionOutcome {
            parameters: default_parameters(),
            source: ParameterSource::Defaults,
            summary: summarize(&defaults),
            attempts,
        }
    }

    async fn attempt(&self, model: &str, prompt: &str) -> Result<serde_json::Value, String> {
        let call = self.backend.complete(model, prompt, self.temperature);
        let content = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(|e| e.to_string())?,
            Err(_) => return Err(LlmError::Timeout(self.timeout).to_string()),
        };
        let parsed = extract_json(&content).map_err(|e| e.to_string())?;
        // `{}` carries no parameters; let the next model try.
        if parsed.as_object().is_some_and(|obj| obj.is_empty()) {
            return Err(ExtractionError::EmptyObject.to_string());
        }
        Ok(parsed)
    }
}
