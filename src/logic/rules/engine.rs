use super::{
    fungicide::FungicideRule, pest_pressure::PestPressureRule, spray_window::SprayWindowRule, Rule,
    RuleContext,
};
use crate::models::{Recommendation, RecommendationCategory, Severity};
use tracing::debug;

pub const MONITORING_ID: &str = "monitoring";

/// Runs the treatment rules in priority order.
///
/// The order of `rules` is the display order of the result. Nothing is
/// merged or deduplicated, and when no rule fires a single monitoring
/// notice is returned so the list is never empty.
pub struct RulesEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RulesEngine {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(FungicideRule),
            Box::new(SprayWindowRule),
            Box::new(PestPressureRule),
        ];

        Self { rules }
    }

    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
        let mut recommendations: Vec<Recommendation> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let rec = rule.evaluate(ctx);
                if rec.is_some() {
                    debug!(rule = rule.id(), "Rule fired");
                }
                rec
            })
            .collect();

        if recommendations.is_empty() {
            recommendations.push(monitoring_notice());
        }

        recommendations
    }

    pub fn evaluate_rule(&self, rule_id: &str, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        self.rules
            .iter()
            .find(|r| r.id() == rule_id)
            .and_then(|rule| rule.evaluate(ctx))
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn monitoring_notice() -> Recommendation {
    Recommendation::new(
        MONITORING_ID,
        RecommendationCategory::Monitoring,
        Severity::Info,
        "Monitoring",
        "No tasks. System operating normally.",
    )
}
