use crate::error::{OrchardError, Result};
use serde::{Deserialize, Serialize};

/// One set of orchard readings to evaluate.
///
/// Field names on the wire follow the demo front end (`gdd`, `temperature`,
/// `leafWetness`, ...). The short sensor names (`temp`, `lw`, `wind`, ...)
/// are accepted as aliases so raw station payloads can be fed in directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    /// Growing degree days accumulated since season start, base 5°C
    #[serde(
        rename = "gdd",
        alias = "accumulatedHeatUnits",
        alias = "heatUnits",
        default
    )]
    pub accumulated_heat_units: f64,

    /// Air temperature, °C
    #[serde(rename = "temperature", alias = "temp", alias = "t")]
    pub air_temperature: f64,

    /// Hours of continuous leaf moisture
    #[serde(rename = "leafWetness", alias = "leaf", alias = "lw", default)]
    pub leaf_wetness_hours: f64,

    /// Wind speed, m/s
    #[serde(rename = "windSpeed", alias = "wind", alias = "w", default)]
    pub wind_speed_ms: f64,

    /// Codling moth catches per trap per week
    #[serde(
        rename = "codlingMothTraps",
        alias = "pestTrapCount",
        alias = "traps",
        default
    )]
    pub pest_trap_count: u32,

    /// Volumetric soil moisture, percent. Carried through but not used by any rule.
    #[serde(
        rename = "soilMoisture",
        alias = "soil",
        alias = "sm",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub soil_moisture_percent: Option<f64>,
}

impl ParameterSnapshot {
    pub fn new(
        accumulated_heat_units: f64,
        air_temperature: f64,
        leaf_wetness_hours: f64,
        wind_speed_ms: f64,
        pest_trap_count: u32,
    ) -> Self {
        Self {
            accumulated_heat_units,
            air_temperature,
            leaf_wetness_hours,
            wind_speed_ms,
            pest_trap_count,
            soil_moisture_percent: None,
        }
    }

    pub fn with_soil_moisture(mut self, percent: f64) -> Self {
        self.soil_moisture_percent = Some(percent);
        self
    }

    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Boundary check for callers that take readings from untrusted input.
    /// The decision engine itself assumes well-formed numbers.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        check_non_negative(
            &mut problems,
            "accumulated heat units",
            self.accumulated_heat_units,
        );
        if !self.air_temperature.is_finite() {
            problems.push(format!(
                "air temperature must be a finite number, got {}",
                self.air_temperature
            ));
        }
        check_non_negative(&mut problems, "leaf wetness hours", self.leaf_wetness_hours);
        check_non_negative(&mut problems, "wind speed", self.wind_speed_ms);

        if let Some(moisture) = self.soil_moisture_percent {
            if !(0.0..=100.0).contains(&moisture) {
                problems.push(format!(
                    "soil moisture must be between 0 and 100 percent, got {}",
                    moisture
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(OrchardError::InvalidData(problems.join("; ")))
        }
    }
}

fn check_non_negative(problems: &mut Vec<String>, label: &str, value: f64) {
    if !value.is_finite() {
        problems.push(format!("{} must be a finite number, got {}", label, value));
    } else if value < 0.0 {
        problems.push(format!("{} cannot be negative, got {}", label, value));
    }
}
