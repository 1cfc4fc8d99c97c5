use super::{Rule, RuleContext};
use crate::models::{Recommendation, RecommendationCategory, Severity};

/// Codling moth action threshold
///
/// Pheromone trap catches above the weekly threshold mean larvae will hatch
/// in damaging numbers; an insecticide cover is due.
pub struct PestPressureRule;

impl Rule for PestPressureRule {
    fn id(&self) -> &'static str {
        "codling_moth"
    }

    fn name(&self) -> &'static str {
        "Codling Moth Threshold"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        let catches = ctx.snapshot.pest_trap_count;
        let limit = ctx.thresholds.pest_trap_threshold;
        if catches <= limit {
            return None;
        }

        Some(Recommendation::new(
            self.id(),
            RecommendationCategory::PestControl,
            Severity::Critical,
            "Codling moth treatment",
            format!(
                "Threshold exceeded ({} per week, limit {}). Insecticide recommended.",
                catches, limit
            ),
        ))
    }
}
