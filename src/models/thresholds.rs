use serde::{Deserialize, Serialize};

/// Decision boundaries for the orchard rules.
///
/// Every comparison against these values is strict: a reading equal to a
/// limit does not trip it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineThresholds {
    /// Leaf wetness above this is a moderate scab risk
    pub leaf_wetness_moderate_hours: f64,
    /// Leaf wetness above this is a high scab risk and calls for fungicide
    pub leaf_wetness_high_hours: f64,
    pub max_spray_wind_ms: f64,
    pub min_spray_temp_c: f64,
    pub max_spray_temp_c: f64,
    /// Weekly codling moth catches per trap
    pub pest_trap_threshold: u32,
}

impl Default for EngineThresholds {
    fn default() -> Self {
        Self {
            leaf_wetness_moderate_hours: 5.0,
            leaf_wetness_high_hours: 10.0,
            max_spray_wind_ms: 5.0,
            min_spray_temp_c: 10.0,
            max_spray_temp_c: 25.0,
            pest_trap_threshold: 5,
        }
    }
}

impl EngineThresholds {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.leaf_wetness_moderate_hours > self.leaf_wetness_high_hours {
            return Err(format!(
                "leaf_wetness_moderate_hours ({}) must not exceed leaf_wetness_high_hours ({})",
                self.leaf_wetness_moderate_hours, self.leaf_wetness_high_hours
            ));
        }
        if self.min_spray_temp_c > self.max_spray_temp_c {
            return Err(format!(
                "min_spray_temp_c ({}) must not exceed max_spray_temp_c ({})",
                self.min_spray_temp_c, self.max_spray_temp_c
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let thresholds: EngineThresholds =
            serde_yaml::from_str("max_spray_wind_ms: 4.0\npest_trap_threshold: 8\n").unwrap();

        assert_eq!(thresholds.max_spray_wind_ms, 4.0);
        assert_eq!(thresholds.pest_trap_threshold, 8);
        assert_eq!(thresholds.leaf_wetness_high_hours, 10.0);
        assert_eq!(thresholds.min_spray_temp_c, 10.0);
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        assert!(EngineThresholds::default().validate().is_ok());

        let wetness = EngineThresholds {
            leaf_wetness_moderate_hours: 12.0,
            ..Default::default()
        };
        assert!(wetness.validate().is_err());

        let temps = EngineThresholds {
            min_spray_temp_c: 30.0,
            ..Default::default()
        };
        assert!(temps.validate().is_err());
    }
}
