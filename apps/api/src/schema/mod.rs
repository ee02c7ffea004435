//! Feature Schema Registry: the three model families, their ordered feature
//! lists and the prediction targets each family's artifacts answer for.
//!
//! Everything here is static. Feature order is significant: it is the column
//! order the persisted artifacts were trained on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod features;
pub mod targets;

pub use features::{LORIN_FEATURES, OLIVER_FEATURES, WASH_FEATURES};
pub use targets::{LORIN_TARGETS, OLIVER_TARGETS, WASH_TARGETS};

// ────────────────────────────────────────────────────────────────────────────
// Model families
// ────────────────────────────────────────────────────────────────────────────

/// One of the three independently trained prediction model groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    Wash,
    Oliver,
    Lorin,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 3] = [ModelFamily::Wash, ModelFamily::Oliver, ModelFamily::Lorin];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::Wash => "wash",
            ModelFamily::Oliver => "oliver",
            ModelFamily::Lorin => "lorin",
        }
    }

    /// Human-facing title used in reports.
    pub fn title(&self) -> &'static str {
        match self {
            ModelFamily::Wash => "WASH 2021 - Real Incident Behavior",
            ModelFamily::Oliver => "Oliver 2022 - Competence Assessment",
            ModelFamily::Lorin => "Lorin 2025 - Personality-Based",
        }
    }

    /// Declared features, in artifact column order.
    pub fn features(&self) -> &'static [FeatureSpec] {
        match self {
            ModelFamily::Wash => WASH_FEATURES,
            ModelFamily::Oliver => OLIVER_FEATURES,
            ModelFamily::Lorin => LORIN_FEATURES,
        }
    }

    pub fn targets(&self) -> &'static [TargetSpec] {
        match self {
            ModelFamily::Wash => WASH_TARGETS,
            ModelFamily::Oliver => OLIVER_TARGETS,
            ModelFamily::Lorin => LORIN_TARGETS,
        }
    }

    #[allow(dead_code)]
    pub fn feature(&self, name: &str) -> Option<&'static FeatureSpec> {
        self.features().iter().find(|f| f.name == name)
    }

    #[allow(dead_code)]
    pub fn target(&self, name: &str) -> Option<&'static TargetSpec> {
        self.targets().iter().find(|t| t.name == name)
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown model family: {0}")]
pub struct UnknownFamily(pub String);

impl FromStr for ModelFamily {
    type Err = UnknownFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wash" => Ok(ModelFamily::Wash),
            "oliver" => Ok(ModelFamily::Oliver),
            "lorin" => Ok(ModelFamily::Lorin),
            other => Err(UnknownFamily(other.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Feature metadata
// ────────────────────────────────────────────────────────────────────────────

/// Semantic type of a feature value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureKind {
    /// 0/1 indicator.
    Binary,
    /// Small bounded positive category.
    Ordinal { min: i64, max: i64 },
    /// Standardized score, roughly -2..2.
    Standardized,
}

/// One declared feature: its name, semantic kind and the value used when the
/// LLM does not supply it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub kind: FeatureKind,
    pub default: i64,
}

impl FeatureSpec {
    pub const fn binary(name: &'static str) -> Self {
        Self {
            name,
            kind: FeatureKind::Binary,
            default: 0,
        }
    }

    /// Binary indicator that is set unless told otherwise ("no issues" style flags).
    pub const fn binary_set(name: &'static str) -> Self {
        Self {
            name,
            kind: FeatureKind::Binary,
            default: 1,
        }
    }

    pub const fn ordinal(name: &'static str, min: i64, max: i64, default: i64) -> Self {
        Self {
            name,
            kind: FeatureKind::Ordinal { min, max },
            default,
        }
    }

    pub const fn standardized(name: &'static str) -> Self {
        Self {
            name,
            kind: FeatureKind::Standardized,
            default: 0,
        }
    }

    pub fn default_value(&self) -> serde_json::Value {
        serde_json::Value::from(self.default)
    }
}

/// Name-pattern default rule. The explicit tables must agree with it for
/// every declared feature; it is kept so that agreement stays checkable.
#[allow(dead_code, clippy::if_same_then_else)]
pub fn pattern_default(name: &str) -> i64 {
    if name.contains("issues_none") || name.contains("email_account_personal") {
        1
    } else if ["category", "level", "recency"]
        .iter()
        .any(|p| name.contains(p))
    {
        3
    } else if name.contains("gender") {
        0
    } else {
        0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Targets
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Binary class label, optionally with P(class = 1).
    Classification,
    /// Continuous score.
    Regression,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetSpec {
    pub name: &'static str,
    pub kind: TargetKind,
}

/// Artifact filename for a (family, target) pair: `<family>_<target>_model.json`.
pub fn artifact_file_name(family: ModelFamily, target: &str) -> String {
    format!("{}_{}_model.json", family.as_str(), target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_feature_counts() {
        assert_eq!(ModelFamily::Wash.features().len(), 73);
        assert_eq!(ModelFamily::Oliver.features().len(), 12);
        assert_eq!(ModelFamily::Lorin.features().len(), 17);
    }

    #[test]
    fn test_feature_names_unique_within_family() {
        for family in ModelFamily::ALL {
            let names: HashSet<_> = family.features().iter().map(|f| f.name).collect();
            assert_eq!(names.len(), family.features().len(), "duplicate in {family}");
        }
    }

    #[test]
    fn test_table_defaults_match_name_pattern_rule() {
        for family in ModelFamily::ALL {
            for spec in family.features() {
                assert_eq!(
                    spec.default,
                    pattern_default(spec.name),
                    "{family}.{} default drifted from the name-pattern rule",
                    spec.name
                );
            }
        }
    }

    #[test]
    fn test_pattern_default_examples() {
        assert_eq!(pattern_default("sender_issues_none"), 1);
        assert_eq!(pattern_default("subject_line_issues_none"), 1);
        assert_eq!(pattern_default("email_body_issues_none"), 1);
        assert_eq!(pattern_default("email_account_personal"), 1);
        assert_eq!(pattern_default("age_category"), 3);
        assert_eq!(pattern_default("education_level"), 3);
        assert_eq!(pattern_default("email_recency"), 3);
        assert_eq!(pattern_default("gender"), 0);
        assert_eq!(pattern_default("annual_income"), 0);
        assert_eq!(pattern_default("sender_issues_name_different"), 0);
        assert_eq!(pattern_default("perceived_knowledge"), 0);
    }

    #[test]
    fn test_ordinal_defaults_within_range_or_zero() {
        // Legacy defaults put some ordinals at 0, below their documented minimum.
        for family in ModelFamily::ALL {
            for spec in family.features() {
                if let FeatureKind::Ordinal { min, max } = spec.kind {
                    assert!(spec.default == 0 || (min..=max).contains(&spec.default));
                }
            }
        }
    }

    #[test]
    fn test_family_round_trips_through_str() {
        for family in ModelFamily::ALL {
            assert_eq!(family.as_str().parse::<ModelFamily>(), Ok(family));
        }
        assert!("WASH".parse::<ModelFamily>().is_err());
    }

    #[test]
    fn test_family_serde_lowercase() {
        let json = serde_json::to_string(&ModelFamily::Oliver).unwrap();
        assert_eq!(json, r#""oliver""#);
    }

    #[test]
    fn test_artifact_file_name_convention() {
        assert_eq!(
            artifact_file_name(ModelFamily::Wash, "final_decision"),
            "wash_final_decision_model.json"
        );
        assert_eq!(
            artifact_file_name(ModelFamily::Lorin, "class_phish_accuracy"),
            "lorin_class_phish_accuracy_model.json"
        );
    }

    #[test]
    fn test_feature_lookup() {
        let spec = ModelFamily::Lorin.feature("security_training_prior").unwrap();
        assert_eq!(spec.kind, FeatureKind::Binary);
        assert!(ModelFamily::Lorin.feature("gender").is_none());
    }

    #[test]
    fn test_wash_classification_targets() {
        let classification: Vec<_> = ModelFamily::Wash
            .targets()
            .iter()
            .filter(|t| t.kind == TargetKind::Classification)
            .map(|t| t.name)
            .collect();
        assert_eq!(classification.len(), 5);
        assert!(classification.contains(&"final_decision"));
        assert_eq!(
            ModelFamily::Wash.target("decision_confidence").map(|t| t.kind),
            Some(TargetKind::Regression)
        );
    }
}
