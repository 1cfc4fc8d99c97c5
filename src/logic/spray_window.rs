use crate::models::{EngineThresholds, SprayWindow, WindowStatus};

pub const SUITABLE_REASON: &str = "Conditions suitable for spraying";

/// Decide whether current weather allows a chemical application.
///
/// Closing conditions:
/// - Wind above `max_spray_wind_ms` (drift)
/// - Temperature below `min_spray_temp_c` (poor efficacy)
/// - Temperature above `max_spray_temp_c` (leaf scorch)
///
/// Every condition is checked and every failing one is listed in the reason.
pub fn evaluate_spray_window(
    air_temperature: f64,
    wind_speed_ms: f64,
    thresholds: &EngineThresholds,
) -> SprayWindow {
    let mut clauses = Vec::new();

    if wind_speed_ms > thresholds.max_spray_wind_ms {
        clauses.push(format!(
            "wind speed {} m/s exceeds safe threshold",
            wind_speed_ms
        ));
    }
    if air_temperature < thresholds.min_spray_temp_c {
        clauses.push(format!(
            "temperature {}°C too low for treatment efficacy",
            air_temperature
        ));
    }
    if air_temperature > thresholds.max_spray_temp_c {
        clauses.push(format!(
            "temperature {}°C too high, scorch risk",
            air_temperature
        ));
    }

    if clauses.is_empty() {
        SprayWindow {
            status: WindowStatus::Open,
            reason: SUITABLE_REASON.to_string(),
        }
    } else {
        SprayWindow {
            status: WindowStatus::Closed,
            reason: clauses.join(", "),
        }
    }
}
