//! Persona / intervention attribution: which features the intervention text
//! is expected to drive. The table is hand-authored and fixed; everything not
//! listed here is attributed to the persona.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::extraction::parser::{ExtractedParameters, FeatureValues};
use crate::schema::ModelFamily;

const WASH_INTERVENTION: &[&str] = &[
    "sender_issues_none",
    "sender_issues_name_different",
    "sender_issues_email_different",
    "subject_line_issues_none",
    "subject_line_issues_different",
    "email_body_issues_none",
    "email_body_issues_typos",
    "email_body_issues_missing",
    "email_body_issues_strange",
    "email_body_issues_more_info",
    "email_body_issues_less_info",
    "actions_requested_click_link",
    "actions_requested_open_attachment",
    "actions_requested_respond_info",
    "actions_requested_external_action",
];

const OLIVER_INTERVENTION: &[&str] = &["perceived_severity", "perceived_vulnerability"];

const LORIN_INTERVENTION: &[&str] = &["security_training_prior"];

pub fn intervention_features(family: ModelFamily) -> &'static [&'static str] {
    match family {
        ModelFamily::Wash => WASH_INTERVENTION,
        ModelFamily::Oliver => OLIVER_INTERVENTION,
        ModelFamily::Lorin => LORIN_INTERVENTION,
    }
}

pub fn is_intervention_feature(family: ModelFamily, feature: &str) -> bool {
    intervention_features(family).iter().any(|f| *f == feature)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttributedParameters {
    pub intervention: BTreeMap<ModelFamily, FeatureValues>,
    pub persona: BTreeMap<ModelFamily, FeatureValues>,
}

/// Partitions normalized parameters into intervention-driven and
/// persona-driven halves.
pub fn split_by_source(parameters: &ExtractedParameters) -> AttributedParameters {
    let mut split = AttributedParameters::default();

    for (&family, values) in parameters.iter() {
        let (intervention, persona): (FeatureValues, FeatureValues) = values
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .partition(|(name, _)| is_intervention_feature(family, name));
        split.intervention.insert(family, intervention);
        split.persona.insert(family, persona);
    }

    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::parser::default_parameters;

    #[test]
    fn test_intervention_features_are_declared() {
        for family in ModelFamily::ALL {
            for name in intervention_features(family) {
                assert!(family.feature(name).is_some(), "{family}.{name} not declared");
            }
        }
    }

    #[test]
    fn test_split_covers_every_feature_once() {
        let split = split_by_source(&default_parameters());
        for family in ModelFamily::ALL {
            let intervention = &split.intervention[&family];
            let persona = &split.persona[&family];
            assert_eq!(intervention.len() + persona.len(), family.features().len());
            assert!(intervention.keys().all(|k| !persona.contains_key(k)));
        }
    }

    #[test]
    fn test_split_sizes() {
        let split = split_by_source(&default_parameters());
        assert_eq!(split.intervention[&ModelFamily::Wash].len(), 15);
        assert_eq!(split.persona[&ModelFamily::Wash].len(), 58);
        assert_eq!(split.intervention[&ModelFamily::Oliver].len(), 2);
        assert_eq!(split.persona[&ModelFamily::Lorin].len(), 16);
    }

    #[test]
    fn test_training_is_intervention_driven() {
        assert!(is_intervention_feature(ModelFamily::Lorin, "security_training_prior"));
        assert!(!is_intervention_feature(ModelFamily::Lorin, "proficiency"));
        assert!(!is_intervention_feature(ModelFamily::Wash, "perceived_severity"));
    }
}
