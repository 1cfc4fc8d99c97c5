pub mod disease;
pub mod evaluator;
pub mod phenology;
pub mod rules;
pub mod spray_window;

pub use evaluator::OrchardStateEvaluator;
pub use phenology::{StageSource, StaticStageTable};
