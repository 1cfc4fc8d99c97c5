use super::{Rule, RuleContext};
use crate::models::{Recommendation, RecommendationCategory, RiskLevel, Severity};

/// Apple scab protection rule
///
/// Scab (Venturia inaequalis) ascospores infect when leaves stay wet long
/// enough at a given temperature (Mills table). A high risk tier (wetness
/// beyond the high limit) calls for a fungicide; the temperature is quoted so
/// the grower can read the infection period off the table.
pub struct FungicideRule;

impl Rule for FungicideRule {
    fn id(&self) -> &'static str {
        "scab_fungicide"
    }

    fn name(&self) -> &'static str {
        "Scab Protection"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        if ctx.disease_risk.level != RiskLevel::High {
            return None;
        }
        let wetness = ctx.snapshot.leaf_wetness_hours;

        Some(Recommendation::new(
            self.id(),
            RecommendationCategory::Fungicide,
            Severity::Critical,
            "Scab protection",
            format!(
                "High leaf wetness ({} h). Fungicide treatment recommended per the Mills \
                 table at {}°C.",
                wetness, ctx.snapshot.air_temperature
            ),
        ))
    }
}
