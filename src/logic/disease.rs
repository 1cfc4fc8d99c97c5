use crate::models::{DiseaseRisk, EngineThresholds, RiskLevel};

/// Classify apple scab infection risk from leaf wetness duration.
///
/// Risk tiers:
/// - High: wetness above `leaf_wetness_high_hours` (10 h by default)
/// - Moderate: above `leaf_wetness_moderate_hours` (5 h) up to the high limit
/// - Low: everything else
///
/// Air temperature does not move the tiers. It is taken so the caller keeps
/// the reading next to the wetness figure for the Mills-table dosing advice.
pub fn assess_disease_risk(
    leaf_wetness_hours: f64,
    _air_temperature: f64,
    thresholds: &EngineThresholds,
) -> DiseaseRisk {
    if leaf_wetness_hours > thresholds.leaf_wetness_high_hours {
        DiseaseRisk {
            level: RiskLevel::High,
            reason: format!(
                "High leaf wetness ({} h) creates conditions for apple scab infection",
                leaf_wetness_hours
            ),
        }
    } else if leaf_wetness_hours > thresholds.leaf_wetness_moderate_hours {
        DiseaseRisk {
            level: RiskLevel::Moderate,
            reason: format!(
                "Moderate leaf wetness ({} h) requires attention",
                leaf_wetness_hours
            ),
        }
    } else {
        DiseaseRisk {
            level: RiskLevel::Low,
            reason: "Leaf wetness within normal range".to_string(),
        }
    }
}
