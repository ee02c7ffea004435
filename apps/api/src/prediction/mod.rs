// Prediction: persisted artifacts → per-family predictions → display metrics and recommendations.

pub mod aggregator;
pub mod artifact;
pub mod recommendations;
pub mod registry;
pub mod report;
