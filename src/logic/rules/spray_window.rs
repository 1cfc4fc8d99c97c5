use super::{Rule, RuleContext};
use crate::models::{Recommendation, RecommendationCategory, Severity};

/// Warns against spraying while the weather window is closed, carrying
/// every reason the window evaluator gave.
pub struct SprayWindowRule;

impl Rule for SprayWindowRule {
    fn id(&self) -> &'static str {
        "spray_window"
    }

    fn name(&self) -> &'static str {
        "Spray Window"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        if ctx.spray_window.is_open() {
            return None;
        }

        Some(Recommendation::new(
            self.id(),
            RecommendationCategory::SprayWindow,
            Severity::Warning,
            "Spraying prohibited",
            ctx.spray_window.reason.clone(),
        ))
    }
}
