//! Response Parser: locates a JSON object in raw LLM output and normalizes it
//! against the feature schema.
//!
//! Normalization guarantees that every family carries exactly its declared
//! feature set, however incomplete the LLM output was.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::schema::ModelFamily;

/// Fallback patterns, tried in order after a direct parse fails:
/// fenced ```json block, bare fenced block, nested-brace heuristic, first brace pair.
static JSON_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?s)```json\s*(\{.*?\})\s*```",
        r"(?s)```\s*(\{.*?\})\s*```",
        r"(?s)(\{[^{}]*\{.*?\}[^{}]*\})",
        r"(?s)(\{.*?\})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

#[derive(Debug, Error, PartialEq)]
pub enum ExtractionError {
    #[error("LLM response was empty")]
    Empty,

    #[error("No JSON object found in LLM response")]
    NoJson,

    #[error("LLM response held an empty JSON object")]
    EmptyObject,
}

/// Feature name → value for one family. Values are kept exactly as the LLM
/// supplied them (int vs float preserved, no clamping).
pub type FeatureValues = BTreeMap<String, Value>;

/// Normalized parameters for all three families.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExtractedParameters(BTreeMap<ModelFamily, FeatureValues>);

impl ExtractedParameters {
    #[allow(dead_code)]
    pub fn from_families(families: BTreeMap<ModelFamily, FeatureValues>) -> Self {
        Self(families)
    }

    pub fn family(&self, family: ModelFamily) -> Option<&FeatureValues> {
        self.0.get(&family)
    }

    pub fn get(&self, family: ModelFamily, feature: &str) -> Option<&Value> {
        self.0.get(&family).and_then(|values| values.get(feature))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModelFamily, &FeatureValues)> {
        self.0.iter()
    }

    /// Canonical `{"wash": {..}, "oliver": {..}, "lorin": {..}}` form, the
    /// shape the extraction prompt asks the LLM for.
    #[allow(dead_code)]
    pub fn to_json(&self) -> Value {
        let root: Map<String, Value> = self
            .0
            .iter()
            .map(|(family, values)| {
                let object: Map<String, Value> = values
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                (family.as_str().to_string(), Value::Object(object))
            })
            .collect();
        Value::Object(root)
    }
}

/// Per-family count of declared features the LLM actually supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilySummary {
    pub supplied: usize,
    pub total: usize,
    pub completeness: f64,
}

/// Finds the first JSON object in `text`: a direct parse of the whole text,
/// then each fallback pattern in turn, trying every match of a pattern before
/// moving on to the next one.
pub fn extract_json(text: &str) -> Result<Value, ExtractionError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractionError::Empty);
    }

    if let Some(value) = parse_object(text) {
        return Ok(value);
    }

    JSON_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.captures_iter(text))
        .filter_map(|caps| caps.get(1))
        .find_map(|m| parse_object(m.as_str().trim()))
        .ok_or(ExtractionError::NoJson)
}

fn parse_object(candidate: &str) -> Option<Value> {
    serde_json::from_str::<Value>(candidate)
        .ok()
        .filter(Value::is_object)
}

/// Fills every declared feature of every family. Supplied values are used
/// verbatim; anything absent takes the schema default. Undeclared keys are dropped.
pub fn normalize(parsed: &Value) -> ExtractedParameters {
    let families = ModelFamily::ALL
        .iter()
        .map(|&family| {
            let supplied = family_object(parsed, family);
            let values: FeatureValues = family
                .features()
                .iter()
                .map(|spec| {
                    let value = supplied
                        .and_then(|obj| obj.get(spec.name))
                        .cloned()
                        .unwrap_or_else(|| spec.default_value());
                    (spec.name.to_string(), value)
                })
                .collect();
            (family, values)
        })
        .collect();

    ExtractedParameters(families)
}

/// Parameters for a run where nothing usable came back from the LLM.
pub fn default_parameters() -> ExtractedParameters {
    normalize(&Value::Object(Map::new()))
}

pub fn summarize(parsed: &Value) -> BTreeMap<ModelFamily, FamilySummary> {
    ModelFamily::ALL
        .iter()
        .map(|&family| {
            let total = family.features().len();
            let supplied = family_object(parsed, family)
                .map(|obj| {
                    family
                        .features()
                        .iter()
                        .filter(|spec| obj.contains_key(spec.name))
                        .count()
                })
                .unwrap_or(0);
            let completeness = if total > 0 {
                supplied as f64 / total as f64
            } else {
                0.0
            };
            (
                family,
                FamilySummary {
                    supplied,
                    total,
                    completeness,
                },
            )
        })
        .collect()
}

fn family_object(parsed: &Value, family: ModelFamily) -> Option<&Map<String, Value>> {
    parsed.get(family.as_str()).and_then(Value::as_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature_names(params: &ExtractedParameters, family: ModelFamily) -> Vec<String> {
        params.family(family).unwrap().keys().cloned().collect()
    }

    fn declared_names(family: ModelFamily) -> Vec<String> {
        let mut names: Vec<String> = family.features().iter().map(|f| f.name.to_string()).collect();
        names.sort();
        names
    }

    // ── extract_json ──────────────────────────────────────────────────────

    #[test]
    fn test_direct_json_parses() {
        let value = extract_json(r#"{"wash": {"gender": 1}}"#).unwrap();
        assert_eq!(value["wash"]["gender"], json!(1));
    }

    #[test]
    fn test_fenced_json_block() {
        let text = "Here are the parameters:\n```json\n{\"oliver\": {\"it_job\": 1}}\n```\nDone.";
        let value = extract_json(text).unwrap();
        assert_eq!(value["oliver"]["it_job"], json!(1));
    }

    #[test]
    fn test_bare_fenced_block() {
        let text = "Result:\n```\n{\"lorin\": {\"proficiency\": 1.5}}\n```";
        let value = extract_json(text).unwrap();
        assert_eq!(value["lorin"]["proficiency"], json!(1.5));
    }

    #[test]
    fn test_nested_object_in_prose() {
        let text = r#"Sure! {"wash": {"age_category": 2, "gender": 1}} Hope this helps."#;
        let value = extract_json(text).unwrap();
        assert_eq!(value["wash"]["age_category"], json!(2));
    }

    #[test]
    fn test_flat_object_in_prose() {
        let text = r#"The answer is {"score": 3} and nothing else."#;
        let value = extract_json(text).unwrap();
        assert_eq!(value["score"], json!(3));
    }

    #[test]
    fn test_invalid_fenced_block_falls_through_to_later_match() {
        let text = "```json\n{not json}\n```\nActual: {\"oliver\": {\"email_trust\": -1}}";
        let value = extract_json(text).unwrap();
        assert_eq!(value["oliver"]["email_trust"], json!(-1));
    }

    #[test]
    fn test_empty_text_is_empty_error() {
        assert_eq!(extract_json("   \n"), Err(ExtractionError::Empty));
    }

    #[test]
    fn test_prose_without_json_is_no_json() {
        assert_eq!(
            extract_json("I cannot help with that request."),
            Err(ExtractionError::NoJson)
        );
    }

    #[test]
    fn test_top_level_array_is_not_accepted() {
        assert_eq!(extract_json("[1, 2, 3]"), Err(ExtractionError::NoJson));
    }

    // ── normalize ─────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_empty_object_has_exact_feature_sets() {
        let params = normalize(&json!({}));
        for family in ModelFamily::ALL {
            assert_eq!(feature_names(&params, family), declared_names(family));
        }
    }

    #[test]
    fn test_normalize_partial_input_has_exact_feature_sets() {
        let params = normalize(&json!({
            "wash": {"gender": 1, "not_a_feature": 9},
            "lorin": "garbage"
        }));
        for family in ModelFamily::ALL {
            assert_eq!(feature_names(&params, family), declared_names(family));
        }
        assert!(params.get(ModelFamily::Wash, "not_a_feature").is_none());
    }

    #[test]
    fn test_normalize_non_object_input_uses_defaults() {
        assert_eq!(normalize(&json!([1, 2])), default_parameters());
        assert_eq!(normalize(&json!(null)), default_parameters());
    }

    #[test]
    fn test_missing_features_take_pattern_defaults() {
        let params = default_parameters();
        assert_eq!(params.get(ModelFamily::Wash, "sender_issues_none"), Some(&json!(1)));
        assert_eq!(params.get(ModelFamily::Wash, "email_account_personal"), Some(&json!(1)));
        assert_eq!(params.get(ModelFamily::Wash, "age_category"), Some(&json!(3)));
        assert_eq!(params.get(ModelFamily::Wash, "email_recency"), Some(&json!(3)));
        assert_eq!(params.get(ModelFamily::Oliver, "education_level"), Some(&json!(3)));
        assert_eq!(params.get(ModelFamily::Oliver, "gender"), Some(&json!(0)));
        assert_eq!(params.get(ModelFamily::Lorin, "proficiency"), Some(&json!(0)));
    }

    #[test]
    fn test_supplied_values_are_kept_verbatim() {
        let params = normalize(&json!({
            "oliver": {"perceived_knowledge": 1.75, "age_category": 9, "email_trust": "high"}
        }));
        assert_eq!(params.get(ModelFamily::Oliver, "perceived_knowledge"), Some(&json!(1.75)));
        // No clamping to the documented 1-5 range.
        assert_eq!(params.get(ModelFamily::Oliver, "age_category"), Some(&json!(9)));
        // No type coercion either.
        assert_eq!(params.get(ModelFamily::Oliver, "email_trust"), Some(&json!("high")));
    }

    #[test]
    fn test_shared_feature_names_are_per_family() {
        let params = normalize(&json!({"wash": {"age_category": 1}}));
        assert_eq!(params.get(ModelFamily::Wash, "age_category"), Some(&json!(1)));
        assert_eq!(params.get(ModelFamily::Oliver, "age_category"), Some(&json!(3)));
    }

    #[test]
    fn test_canonical_json_round_trips() {
        let mut families = BTreeMap::new();
        for family in ModelFamily::ALL {
            let values: FeatureValues = family
                .features()
                .iter()
                .enumerate()
                .map(|(i, spec)| {
                    let value = if i % 2 == 0 { json!(i) } else { json!(i as f64 / 4.0 - 1.0) };
                    (spec.name.to_string(), value)
                })
                .collect();
            families.insert(family, values);
        }
        let expected = ExtractedParameters::from_families(families);

        let text = expected.to_json().to_string();
        let parsed = extract_json(&text).unwrap();
        assert_eq!(normalize(&parsed), expected);
    }

    #[test]
    fn test_canonical_json_family_keys() {
        let json = default_parameters().to_json();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["lorin", "oliver", "wash"]);
    }

    // ── summarize ─────────────────────────────────────────────────────────

    #[test]
    fn test_summarize_counts_only_declared_features() {
        let summary = summarize(&json!({
            "oliver": {"it_job": 1, "gender": 0, "unknown": 5},
        }));
        let oliver = &summary[&ModelFamily::Oliver];
        assert_eq!(oliver.supplied, 2);
        assert_eq!(oliver.total, 12);
        assert!((oliver.completeness - 2.0 / 12.0).abs() < 1e-9);
        assert_eq!(summary[&ModelFamily::Wash].supplied, 0);
        assert_eq!(summary[&ModelFamily::Lorin].total, 17);
    }
}
