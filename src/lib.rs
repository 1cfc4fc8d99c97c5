//! Orchard decision engine: phenology stage, scab risk, spray window and
//! prioritized recommendations from one set of orchard readings.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod logic;
pub mod models;
pub mod report;

pub use error::{OrchardError, Result};
pub use logic::evaluator::evaluate;
pub use logic::OrchardStateEvaluator;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_apple_stages, ParameterSnapshot, StageResolution};

    #[test]
    fn root_evaluate_matches_default_evaluator() {
        let snapshot = ParameterSnapshot::new(210.0, 16.0, 11.0, 1.5, 2);
        let stages = default_apple_stages();

        let state = evaluate(&snapshot, &stages);
        assert_eq!(state.pheno_phase.stage.stage_code, 65);
        assert_eq!(state.pheno_phase.resolution, StageResolution::Matched);
        assert_eq!(state, OrchardStateEvaluator::default().evaluate(&snapshot, &stages));
    }
}
