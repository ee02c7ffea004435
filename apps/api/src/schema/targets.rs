use super::{TargetKind, TargetSpec};

const fn class(name: &'static str) -> TargetSpec {
    TargetSpec {
        name,
        kind: TargetKind::Classification,
    }
}

const fn score(name: &'static str) -> TargetSpec {
    TargetSpec {
        name,
        kind: TargetKind::Regression,
    }
}

pub const WASH_TARGETS: &[TargetSpec] = &[
    class("final_decision"),
    class("actions_taken_clicked"),
    class("actions_taken_reported"),
    class("actions_taken_deleted"),
    class("actions_taken_ignored"),
    score("decision_confidence"),
];

pub const OLIVER_TARGETS: &[TargetSpec] = &[
    score("phishing_test_percent_correct"),
    score("knowledge_test_percent_correct"),
];

pub const LORIN_TARGETS: &[TargetSpec] = &[
    score("class_phish_accuracy"),
    score("class_nophish_accuracy"),
];
