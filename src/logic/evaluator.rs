use super::disease::assess_disease_risk;
use super::phenology::{resolve_from_source, resolve_stage, StageSource};
use super::rules::{RuleContext, RulesEngine};
use super::spray_window::evaluate_spray_window;
use crate::models::{
    EngineThresholds, OrchardState, ParameterSnapshot, PhenologyStage, ResolvedPhase,
};

/// Turns a parameter snapshot into a full orchard diagnosis.
///
/// Holds no per-call state; one evaluator can serve any number of
/// snapshots, from any number of threads.
pub struct OrchardStateEvaluator {
    thresholds: EngineThresholds,
    rules: RulesEngine,
}

impl OrchardStateEvaluator {
    pub fn new(thresholds: EngineThresholds) -> Self {
        Self {
            thresholds,
            rules: RulesEngine::new(),
        }
    }

    pub fn thresholds(&self) -> &EngineThresholds {
        &self.thresholds
    }

    pub fn rules(&self) -> &RulesEngine {
        &self.rules
    }

    pub fn evaluate(&self, snapshot: &ParameterSnapshot, stages: &[PhenologyStage]) -> OrchardState {
        let phase = resolve_stage(snapshot.accumulated_heat_units, stages);
        self.assemble(snapshot, phase)
    }

    /// Like [`evaluate`](Self::evaluate), but loads the stage table from
    /// `source`. A failed load degrades the phenology result only.
    pub fn evaluate_with_source(
        &self,
        snapshot: &ParameterSnapshot,
        source: &dyn StageSource,
    ) -> OrchardState {
        let phase = resolve_from_source(snapshot.accumulated_heat_units, source);
        self.assemble(snapshot, phase)
    }

    fn assemble(&self, snapshot: &ParameterSnapshot, phase: ResolvedPhase) -> OrchardState {
        let disease_risk = assess_disease_risk(
            snapshot.leaf_wetness_hours,
            snapshot.air_temperature,
            &self.thresholds,
        );
        let spray_window = evaluate_spray_window(
            snapshot.air_temperature,
            snapshot.wind_speed_ms,
            &self.thresholds,
        );

        let recommendations = self.rules.evaluate(&RuleContext {
            snapshot,
            disease_risk: &disease_risk,
            spray_window: &spray_window,
            thresholds: &self.thresholds,
        });

        OrchardState {
            pheno_phase: phase,
            disease_risk,
            weather_window: spray_window,
            recommendations,
        }
    }
}

impl Default for OrchardStateEvaluator {
    fn default() -> Self {
        Self::new(EngineThresholds::default())
    }
}

/// Evaluate with the default thresholds.
pub fn evaluate(snapshot: &ParameterSnapshot, stages: &[PhenologyStage]) -> OrchardState {
    OrchardStateEvaluator::default().evaluate(snapshot, stages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{OrchardError, Result};
    use crate::logic::phenology::StaticStageTable;
    use crate::models::{
        default_apple_stages, RiskLevel, Severity, StageResolution, WindowStatus,
    };

    struct BrokenStore;

    impl StageSource for BrokenStore {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn load_stages(&self) -> Result<Vec<PhenologyStage>> {
            Err(OrchardError::StageLookup("disk I/O error".into()))
        }
    }

    fn two_stage_table() -> Vec<PhenologyStage> {
        vec![
            PhenologyStage::new(0, "Dormant", 0.0),
            PhenologyStage::new(7, "Green Tip", 100.0),
        ]
    }

    #[test]
    fn early_season_quiet_day() {
        let snapshot = ParameterSnapshot::new(0.0, 22.0, 8.0, 2.0, 0);
        let state = evaluate(&snapshot, &two_stage_table());

        assert_eq!(state.pheno_phase.stage.stage_name, "Dormant");
        assert_eq!(state.pheno_phase.resolution, StageResolution::Matched);
        assert_eq!(state.disease_risk.level, RiskLevel::Moderate);
        assert_eq!(state.weather_window.status, WindowStatus::Open);
        assert_eq!(state.recommendations.len(), 1);
        assert_eq!(state.recommendations[0].severity, Severity::Info);
        assert_eq!(state.recommendations[0].title, "Monitoring");
    }

    #[test]
    fn wet_windy_bloom_with_moth_flight() {
        let snapshot = ParameterSnapshot::new(205.0, 16.0, 14.0, 6.5, 8);
        let state = evaluate(&snapshot, &default_apple_stages());

        assert_eq!(state.pheno_phase.stage.stage_code, 65);
        assert_eq!(state.disease_risk.level, RiskLevel::High);
        assert_eq!(state.weather_window.status, WindowStatus::Closed);
        assert_eq!(state.recommendations.len(), 3);
        assert_eq!(state.highest_severity(), Severity::Critical);
    }

    #[test]
    fn lookup_failure_still_assesses_weather() {
        let snapshot = ParameterSnapshot::new(250.0, 30.0, 11.0, 1.0, 0);
        let state = OrchardStateEvaluator::default().evaluate_with_source(&snapshot, &BrokenStore);

        assert_eq!(state.pheno_phase.resolution, StageResolution::LookupFailed);
        assert_eq!(state.pheno_phase.stage, PhenologyStage::lookup_failed());
        assert_eq!(state.disease_risk.level, RiskLevel::High);
        assert_eq!(state.weather_window.status, WindowStatus::Closed);
        assert!(state.weather_window.reason.contains("scorch"));
        assert_eq!(state.recommendations.len(), 2);
    }

    #[test]
    fn evaluation_is_repeatable() {
        let snapshot = ParameterSnapshot::new(180.0, 9.0, 6.0, 5.5, 6);
        let stages = default_apple_stages();
        let evaluator = OrchardStateEvaluator::default();

        assert_eq!(
            evaluator.evaluate(&snapshot, &stages),
            evaluator.evaluate(&snapshot, &stages)
        );
        assert_eq!(
            evaluator.evaluate(&snapshot, &stages),
            evaluator.evaluate_with_source(&snapshot, &StaticStageTable::new(stages.clone()))
        );
    }

    #[test]
    fn soil_moisture_does_not_affect_outcome() {
        let stages = default_apple_stages();
        let dry = ParameterSnapshot::new(120.0, 18.0, 3.0, 2.0, 1).with_soil_moisture(5.0);
        let wet = ParameterSnapshot::new(120.0, 18.0, 3.0, 2.0, 1).with_soil_moisture(95.0);

        assert_eq!(evaluate(&dry, &stages), evaluate(&wet, &stages));
    }

    #[test]
    fn custom_thresholds_flow_through() {
        let evaluator = OrchardStateEvaluator::new(EngineThresholds {
            max_spray_wind_ms: 3.0,
            pest_trap_threshold: 10,
            ..Default::default()
        });
        let snapshot = ParameterSnapshot::new(0.0, 18.0, 0.0, 4.0, 8);
        let state = evaluator.evaluate(&snapshot, &[]);

        assert_eq!(state.pheno_phase.resolution, StageResolution::EmptyTable);
        assert_eq!(state.weather_window.status, WindowStatus::Closed);
        // 8 catches is under the raised limit
        assert_eq!(state.recommendations.len(), 1);
        assert_eq!(state.recommendations[0].id, "spray_window");
    }

    #[test]
    fn serializes_with_front_end_field_names() {
        let snapshot = ParameterSnapshot::new(0.0, 22.0, 8.0, 2.0, 0);
        let json = serde_json::to_value(evaluate(&snapshot, &two_stage_table())).unwrap();

        assert_eq!(json["phenoPhase"]["stageName"], "Dormant");
        assert_eq!(json["phenoPhase"]["gddThreshold"], 0.0);
        assert_eq!(json["diseaseRisk"]["level"], "Moderate");
        assert_eq!(json["weatherWindow"]["status"], "Open");
        assert_eq!(json["recommendations"][0]["severity"], "info");
    }
}
