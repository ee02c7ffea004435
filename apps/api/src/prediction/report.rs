//! Display metrics derived from raw predictions.
//!
//! The artifacts emit scores on their training scales; these helpers map them
//! to the 0–100 percentages shown to users and used by the recommendation rules.

use serde::Serialize;

use crate::prediction::aggregator::PredictionResults;
use crate::schema::ModelFamily;

/// WASH decision-confidence score → percentage: 50 + 25·score, clamped.
pub fn confidence_percent(score: f64) -> f64 {
    (50.0 + score * 25.0).clamp(0.0, 100.0)
}

/// Oliver standardized test score → percentage correct: 50 + 15·score, clamped.
pub fn competence_percent(score: f64) -> f64 {
    (50.0 + score * 15.0).clamp(0.0, 100.0)
}

/// Lorin accuracy fraction → percentage, clamped.
pub fn accuracy_percent(fraction: f64) -> f64 {
    (fraction * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    BelowAverage,
    Average,
    AboveAverage,
}

impl Band {
    pub fn from_percent(pct: f64) -> Self {
        if pct < 60.0 {
            Band::BelowAverage
        } else if pct > 80.0 {
            Band::AboveAverage
        } else {
            Band::Average
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WashSummary {
    pub title: &'static str,
    /// `Some(true)` when the final decision predicts the email is treated as safe.
    pub decision_safe: Option<bool>,
    pub decision_confidence_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreWithBand {
    pub pct: f64,
    pub band: Band,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OliverSummary {
    pub title: &'static str,
    pub phishing_detection: Option<ScoreWithBand>,
    pub security_knowledge: Option<ScoreWithBand>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LorinSummary {
    pub title: &'static str,
    pub phishing_detection_pct: Option<f64>,
    pub legitimate_recognition_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub wash: Option<WashSummary>,
    pub oliver: Option<OliverSummary>,
    pub lorin: Option<LorinSummary>,
}

pub fn summarize_results(results: &PredictionResults) -> ResultSummary {
    let wash = results.family(ModelFamily::Wash).map(|_| WashSummary {
        title: ModelFamily::Wash.title(),
        decision_safe: results
            .record(ModelFamily::Wash, "final_decision")
            .map(|r| r.prediction == 1.0),
        decision_confidence_pct: results
            .record(ModelFamily::Wash, "decision_confidence")
            .map(|r| confidence_percent(r.prediction)),
    });

    let oliver = results.family(ModelFamily::Oliver).map(|_| {
        let banded = |target: &str| {
            results.record(ModelFamily::Oliver, target).map(|r| {
                let pct = competence_percent(r.prediction);
                ScoreWithBand {
                    pct,
                    band: Band::from_percent(pct),
                }
            })
        };
        OliverSummary {
            title: ModelFamily::Oliver.title(),
            phishing_detection: banded("phishing_test_percent_correct"),
            security_knowledge: banded("knowledge_test_percent_correct"),
        }
    });

    let lorin = results.family(ModelFamily::Lorin).map(|records| {
        let pct = |target: &str| {
            records
                .contains_key(target)
                .then(|| accuracy_percent(records[target].prediction))
        };
        LorinSummary {
            title: ModelFamily::Lorin.title(),
            phishing_detection_pct: pct("class_phish_accuracy"),
            legitimate_recognition_pct: pct("class_nophish_accuracy"),
        }
    });

    ResultSummary { wash, oliver, lorin }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::aggregator::{FamilyPrediction, PredictionRecord};
    use std::collections::BTreeMap;

    fn results(entries: &[(ModelFamily, &str, f64, Option<f64>)]) -> PredictionResults {
        let mut families: BTreeMap<ModelFamily, Option<FamilyPrediction>> =
            ModelFamily::ALL.into_iter().map(|f| (f, None)).collect();
        for &(family, target, prediction, probability) in entries {
            families
                .entry(family)
                .or_default()
                .get_or_insert_with(FamilyPrediction::new)
                .insert(
                    target.to_string(),
                    PredictionRecord {
                        prediction,
                        probability,
                    },
                );
        }
        PredictionResults::from_families(families)
    }

    #[test]
    fn test_percent_helpers_clamp() {
        assert!((confidence_percent(0.4) - 60.0).abs() < 1e-9);
        assert_eq!(confidence_percent(5.0), 100.0);
        assert_eq!(competence_percent(-1.0), 35.0);
        assert_eq!(competence_percent(-10.0), 0.0);
        assert!((accuracy_percent(0.62) - 62.0).abs() < 1e-9);
        assert_eq!(accuracy_percent(1.3), 100.0);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(Band::from_percent(59.9), Band::BelowAverage);
        assert_eq!(Band::from_percent(60.0), Band::Average);
        assert_eq!(Band::from_percent(80.0), Band::Average);
        assert_eq!(Band::from_percent(80.1), Band::AboveAverage);
    }

    #[test]
    fn test_wash_summary() {
        let summary = summarize_results(&results(&[
            (ModelFamily::Wash, "final_decision", 1.0, Some(0.8)),
            (ModelFamily::Wash, "decision_confidence", 1.0, None),
        ]));
        let wash = summary.wash.unwrap();
        assert_eq!(wash.decision_safe, Some(true));
        assert_eq!(wash.decision_confidence_pct, Some(75.0));
        assert!(summary.oliver.is_none());
        assert!(summary.lorin.is_none());
    }

    #[test]
    fn test_oliver_summary_bands() {
        let summary = summarize_results(&results(&[
            (ModelFamily::Oliver, "phishing_test_percent_correct", 2.0, None),
            (ModelFamily::Oliver, "knowledge_test_percent_correct", -1.0, None),
        ]));
        let oliver = summary.oliver.unwrap();
        let phishing = oliver.phishing_detection.unwrap();
        assert_eq!(phishing.pct, 80.0);
        assert_eq!(phishing.band, Band::Average);
        assert_eq!(oliver.security_knowledge.unwrap().band, Band::BelowAverage);
    }

    #[test]
    fn test_lorin_summary_missing_target_is_none() {
        let summary = summarize_results(&results(&[(
            ModelFamily::Lorin,
            "class_phish_accuracy",
            0.55,
            None,
        )]));
        let lorin = summary.lorin.unwrap();
        assert!((lorin.phishing_detection_pct.unwrap() - 55.0).abs() < 1e-9);
        assert_eq!(lorin.legitimate_recognition_pct, None);
    }
}
