// Declared feature tables, one per model family, in artifact column order.

use super::FeatureSpec;

const fn b(name: &'static str) -> FeatureSpec {
    FeatureSpec::binary(name)
}

const fn z(name: &'static str) -> FeatureSpec {
    FeatureSpec::standardized(name)
}

/// WASH 2021: real incident behavior (73 features).
pub const WASH_FEATURES: &[FeatureSpec] = &[
    // Demographics
    FeatureSpec::ordinal("age_category", 1, 5, 3),
    b("gender"),
    FeatureSpec::ordinal("education_level", 1, 4, 3),
    b("employment_status"),
    FeatureSpec::ordinal("annual_income", 1, 4, 0),
    // IT background & security history
    b("has_it_training"),
    b("has_it_job"),
    b("previous_incidents_phishing_email"),
    b("previous_incidents_data_breach"),
    b("previous_incidents_computer_virus"),
    b("previous_incidents_device_hacked"),
    b("previous_incidents_credit_card_fraud"),
    b("previous_incidents_identity_theft"),
    b("previous_incidents_any"),
    // Digital literacy
    z("digital_literacy_wiki"),
    z("digital_literacy_meme"),
    z("digital_literacy_phishing"),
    z("digital_literacy_bookmark"),
    z("digital_literacy_cache"),
    z("digital_literacy_ssl"),
    z("digital_literacy_ajax"),
    z("digital_literacy_rss"),
    z("digital_literacy_other"),
    z("digital_literacy_total"),
    // Emotions
    z("emotion_dread"),
    z("emotion_terror"),
    z("emotion_anxiety"),
    z("emotion_nervous"),
    z("emotion_scared"),
    z("emotion_panic"),
    z("emotion_fear"),
    z("emotion_worry"),
    z("emotion_total"),
    // Investigation
    b("investigated_sender"),
    b("investigated_links"),
    b("investigated_external"),
    // Email context
    FeatureSpec::ordinal("email_recency", 1, 5, 3),
    b("email_account_work"),
    b("email_account_student"),
    FeatureSpec::binary_set("email_account_personal"),
    b("email_content_work_related"),
    b("email_content_personal"),
    b("email_sender_work_colleague"),
    b("email_sender_friend_family"),
    b("email_sender_acquaintance"),
    b("email_sender_organization"),
    FeatureSpec::ordinal("sender_relationship_duration", 1, 6, 0),
    b("expected_this_email"),
    FeatureSpec::ordinal("felt_similar_before", 1, 5, 0),
    b("previous_sender_emails"),
    b("previous_sender_interaction"),
    FeatureSpec::ordinal("email_seemed_different", 1, 5, 0),
    b("noticed_sender_issues"),
    b("noticed_content_issues"),
    b("noticed_technical_issues"),
    b("actions_requested_click_link"),
    b("actions_requested_open_attachment"),
    b("actions_requested_respond_info"),
    b("actions_requested_external_action"),
    FeatureSpec::binary_set("sender_issues_none"),
    b("sender_issues_name_different"),
    b("sender_issues_email_different"),
    FeatureSpec::binary_set("subject_line_issues_none"),
    b("subject_line_issues_different"),
    FeatureSpec::binary_set("email_body_issues_none"),
    b("email_body_issues_typos"),
    b("email_body_issues_missing"),
    b("email_body_issues_strange"),
    b("email_body_issues_more_info"),
    b("email_body_issues_less_info"),
    // Confidence & perception
    z("suspicion_confidence"),
    b("overall_suspicion"),
    z("perceived_harm"),
];

/// Oliver 2022: competence assessment (12 features).
pub const OLIVER_FEATURES: &[FeatureSpec] = &[
    FeatureSpec::ordinal("age_category", 1, 5, 3),
    b("gender"),
    FeatureSpec::ordinal("education_level", 1, 4, 3),
    b("employment_status"),
    b("it_job"),
    b("phishing_victim"),
    z("phishing_victim_count"),
    // Protection-motivation constructs
    z("perceived_knowledge"),
    z("perceived_self_efficacy"),
    z("perceived_severity"),
    z("perceived_vulnerability"),
    z("email_trust"),
];

/// Lorin 2025: personality-based (17 features).
pub const LORIN_FEATURES: &[FeatureSpec] = &[
    FeatureSpec::ordinal("age_category", 1, 5, 3),
    FeatureSpec::ordinal("education_level", 1, 4, 3),
    z("it_experience"),
    z("email_frequency"),
    b("security_training_prior"),
    // Big Five
    z("personality_extraversion"),
    z("personality_agreeableness"),
    z("personality_conscientiousness"),
    z("personality_neuroticism"),
    z("personality_openness"),
    // Security attitudes
    z("pre_security_engagement"),
    z("pre_security_attentiveness"),
    z("pre_security_resistance"),
    z("pre_security_concern"),
    z("pre_security_attitude_total"),
    // Capabilities
    z("knowledge_total"),
    z("proficiency"),
];
