use serde::{Deserialize, Serialize};

pub const DORMANT_STAGE_NAME: &str = "Dormant";
pub const NOT_ACCUMULATED_DESCRIPTION: &str = "No heat accumulated";
pub const LOOKUP_FAILED_DESCRIPTION: &str = "Stage table unavailable";

/// A BBCH growth stage and the heat units at which it begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhenologyStage {
    #[serde(rename = "bbchCode", alias = "stageCode")]
    pub stage_code: i32,
    pub stage_name: String,
    /// Minimum growing degree days (base 5°C) for this stage
    #[serde(rename = "gddThreshold", alias = "heatThreshold")]
    pub heat_threshold: f64,
    #[serde(default)]
    pub description: Option<String>,
}

impl PhenologyStage {
    pub fn new(stage_code: i32, stage_name: impl Into<String>, heat_threshold: f64) -> Self {
        Self {
            stage_code,
            stage_name: stage_name.into(),
            heat_threshold,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Stand-in used when there is no stage table to consult.
    pub fn dormant() -> Self {
        Self::new(0, DORMANT_STAGE_NAME, 0.0).with_description(NOT_ACCUMULATED_DESCRIPTION)
    }

    /// Stand-in used when the stage table could not be loaded.
    pub fn lookup_failed() -> Self {
        Self::new(0, DORMANT_STAGE_NAME, 0.0).with_description(LOOKUP_FAILED_DESCRIPTION)
    }
}

/// How the reported stage was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StageResolution {
    /// Highest threshold at or below the accumulated heat units
    Matched,
    /// Heat units below every threshold; earliest stage reported
    BelowFirstThreshold,
    /// No stages supplied
    EmptyTable,
    /// Stage table could not be loaded
    LookupFailed,
}

impl StageResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageResolution::Matched => "Matched",
            StageResolution::BelowFirstThreshold => "Below first threshold",
            StageResolution::EmptyTable => "Empty stage table",
            StageResolution::LookupFailed => "Lookup failed",
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, StageResolution::Matched)
    }
}

impl std::fmt::Display for StageResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPhase {
    #[serde(flatten)]
    pub stage: PhenologyStage,
    pub resolution: StageResolution,
}

impl ResolvedPhase {
    pub fn new(stage: PhenologyStage, resolution: StageResolution) -> Self {
        Self { stage, resolution }
    }
}

/// BBCH stages for apple with approximate GDD (base 5°C) onsets.
pub fn default_apple_stages() -> Vec<PhenologyStage> {
    vec![
        PhenologyStage::new(0, "Dormancy", 0.0)
            .with_description("Winter dormancy, buds closed and covered by scales"),
        PhenologyStage::new(7, "Green tip", 60.0)
            .with_description("First green leaf tips visible at bud apex"),
        PhenologyStage::new(10, "Mouse ear", 90.0)
            .with_description("Leaves separating, green tissue about 10 mm"),
        PhenologyStage::new(57, "Pink bud", 150.0)
            .with_description("Flower petals elongating, closed pink buds"),
        PhenologyStage::new(60, "First bloom", 180.0).with_description("First flowers open"),
        PhenologyStage::new(65, "Full bloom", 200.0)
            .with_description("At least 50% of flowers open"),
        PhenologyStage::new(67, "Petal fall", 230.0)
            .with_description("Flowers fading, majority of petals fallen"),
        PhenologyStage::new(71, "Fruit set", 260.0)
            .with_description("Fruit size up to 10 mm, fruit fall after flowering"),
        PhenologyStage::new(74, "Fruitlet growth", 400.0)
            .with_description("Fruit diameter up to 40 mm, fruit erect"),
        PhenologyStage::new(81, "Beginning of ripening", 1200.0)
            .with_description("First appearance of cultivar-specific colour"),
        PhenologyStage::new(87, "Harvest maturity", 1500.0)
            .with_description("Fruit ripe for picking"),
        PhenologyStage::new(93, "Leaf fall", 1800.0)
            .with_description("Beginning of leaf fall"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_stages_are_distinguishable() {
        let dormant = PhenologyStage::dormant();
        let failed = PhenologyStage::lookup_failed();

        assert_eq!(dormant.stage_code, failed.stage_code);
        assert_eq!(dormant.stage_name, failed.stage_name);
        assert_eq!(dormant.heat_threshold, 0.0);
        assert_ne!(dormant.description, failed.description);
        assert_eq!(dormant.description.as_deref(), Some("No heat accumulated"));
    }

    #[test]
    fn default_table_is_sorted_with_unique_codes() {
        let stages = default_apple_stages();
        assert_eq!(stages[0].heat_threshold, 0.0);
        assert!(stages
            .windows(2)
            .all(|w| w[0].heat_threshold < w[1].heat_threshold));

        let mut codes: Vec<i32> = stages.iter().map(|s| s.stage_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), stages.len());
    }

    #[test]
    fn resolved_phase_flattens_stage_fields() {
        let phase = ResolvedPhase::new(
            PhenologyStage::new(67, "Petal fall", 230.0),
            StageResolution::Matched,
        );
        let json = serde_json::to_value(&phase).unwrap();

        assert_eq!(json["bbchCode"], 67);
        assert_eq!(json["stageName"], "Petal fall");
        assert_eq!(json["gddThreshold"], 230.0);
        assert_eq!(json["resolution"], "matched");
    }

    #[test]
    fn stage_accepts_generic_field_names() {
        let stage: PhenologyStage = serde_json::from_str(
            r#"{"stageCode": 7, "stageName": "Green tip", "heatThreshold": 60}"#,
        )
        .unwrap();
        assert_eq!(stage.stage_code, 7);
        assert_eq!(stage.heat_threshold, 60.0);
        assert!(stage.description.is_none());
    }

    #[test]
    fn only_matched_is_not_a_fallback() {
        assert!(!StageResolution::Matched.is_fallback());
        assert!(StageResolution::BelowFirstThreshold.is_fallback());
        assert!(StageResolution::EmptyTable.is_fallback());
        assert!(StageResolution::LookupFailed.is_fallback());
    }
}
