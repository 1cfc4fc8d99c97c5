pub mod engine;
pub mod fungicide;
pub mod pest_pressure;
pub mod spray_window;

pub use engine::RulesEngine;

use crate::models::{DiseaseRisk, EngineThresholds, ParameterSnapshot, Recommendation, SprayWindow};

/// Everything a rule may look at: the raw readings plus the already
/// classified disease risk and spray window.
pub struct RuleContext<'a> {
    pub snapshot: &'a ParameterSnapshot,
    pub disease_risk: &'a DiseaseRisk,
    pub spray_window: &'a SprayWindow,
    pub thresholds: &'a EngineThresholds,
}

/// Trait for orchard treatment rules
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule and return a recommendation if conditions are met
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation>;
}
