//! Recommendation Rules: a fixed decision table from prediction values to
//! advisory strings.
//!
//! Rules (evaluated in order, each may add one message):
//! - wash.final_decision probability (absent → 0.5): < 0.30 high risk, > 0.70 low risk
//! - wash.actions_taken_clicked probability > 0.50: link verification
//! - wash.actions_taken_reported probability < 0.30: reporting
//! - oliver.phishing_test_percent_correct pct < 60 awareness training, > 80 security champion
//! - oliver.knowledge_test_percent_correct pct < 60: foundational training
//! - lorin.class_phish_accuracy pct (unclamped) < 50 vulnerable, > 75 protected
//!
//! When nothing fires the fixed four-item fallback list is returned.

use crate::prediction::aggregator::{FamilyPrediction, PredictionResults};
use crate::prediction::report::competence_percent;
use crate::schema::ModelFamily;

pub const HIGH_RISK: &str = "High risk user - implement immediate targeted phishing training";
pub const LOW_RISK: &str = "Low risk user - maintain current security practices";
pub const HIGH_CLICK_RISK: &str = "High click risk - provide link verification training";
pub const LOW_REPORTING: &str = "Low reporting behavior - encourage suspicious email reporting";
pub const WEAK_DETECTION: &str =
    "Below average phishing detection - intensive awareness training needed";
pub const SECURITY_CHAMPION: &str =
    "Strong phishing detection skills - consider as security champion";
pub const KNOWLEDGE_GAP: &str = "Security knowledge gap - foundational training required";
pub const PERSONALITY_VULNERABLE: &str =
    "Personality traits suggest high vulnerability - personalized training approach needed";
pub const PERSONALITY_PROTECTED: &str =
    "Natural protection from personality - leverage strengths in training others";

pub const FALLBACK_RECOMMENDATIONS: [&str; 4] = [
    "Implement regular phishing simulations",
    "Provide security awareness training",
    "Monitor email behavior patterns",
    "Establish clear reporting procedures",
];

pub fn generate_recommendations(results: &PredictionResults) -> Vec<String> {
    let mut recommendations: Vec<&str> = Vec::new();

    if let Some(wash) = results.family(ModelFamily::Wash) {
        wash_rules(wash, &mut recommendations);
    }
    if let Some(oliver) = results.family(ModelFamily::Oliver) {
        oliver_rules(oliver, &mut recommendations);
    }
    if let Some(lorin) = results.family(ModelFamily::Lorin) {
        lorin_rules(lorin, &mut recommendations);
    }

    if recommendations.is_empty() {
        recommendations.extend(FALLBACK_RECOMMENDATIONS);
    }

    recommendations.into_iter().map(String::from).collect()
}

fn wash_rules(wash: &FamilyPrediction, out: &mut Vec<&'static str>) {
    if let Some(decision) = wash.get("final_decision") {
        let safety = decision.probability.unwrap_or(0.5);
        if safety < 0.3 {
            out.push(HIGH_RISK);
        } else if safety > 0.7 {
            out.push(LOW_RISK);
        }
    }

    if let Some(clicked) = wash.get("actions_taken_clicked").and_then(|r| r.probability) {
        if clicked > 0.5 {
            out.push(HIGH_CLICK_RISK);
        }
    }

    if let Some(reported) = wash.get("actions_taken_reported").and_then(|r| r.probability) {
        if reported < 0.3 {
            out.push(LOW_REPORTING);
        }
    }
}

fn oliver_rules(oliver: &FamilyPrediction, out: &mut Vec<&'static str>) {
    if let Some(phishing) = oliver.get("phishing_test_percent_correct") {
        let pct = competence_percent(phishing.prediction);
        if pct < 60.0 {
            out.push(WEAK_DETECTION);
        } else if pct > 80.0 {
            out.push(SECURITY_CHAMPION);
        }
    }

    if let Some(knowledge) = oliver.get("knowledge_test_percent_correct") {
        if competence_percent(knowledge.prediction) < 60.0 {
            out.push(KNOWLEDGE_GAP);
        }
    }
}

fn lorin_rules(lorin: &FamilyPrediction, out: &mut Vec<&'static str>) {
    if let Some(accuracy) = lorin.get("class_phish_accuracy") {
        let pct = accuracy.prediction * 100.0;
        if pct < 50.0 {
            out.push(PERSONALITY_VULNERABLE);
        } else if pct > 75.0 {
            out.push(PERSONALITY_PROTECTED);
        }
    }
}
