use crate::error::{OrchardError, Result};
use crate::models::{PhenologyStage, ResolvedPhase, StageResolution};
use tracing::{debug, warn};

/// Anything that can hand over the phenology stage table.
pub trait StageSource: Send + Sync {
    /// Short label for log messages
    fn name(&self) -> &'static str;

    fn load_stages(&self) -> Result<Vec<PhenologyStage>>;
}

/// Stage table held in memory (built-in or from the config file).
#[derive(Debug, Clone, Default)]
pub struct StaticStageTable {
    stages: Vec<PhenologyStage>,
}

impl StaticStageTable {
    pub fn new(stages: Vec<PhenologyStage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[PhenologyStage] {
        &self.stages
    }
}

impl StageSource for StaticStageTable {
    fn name(&self) -> &'static str {
        "static"
    }

    fn load_stages(&self) -> Result<Vec<PhenologyStage>> {
        Ok(self.stages.clone())
    }
}

/// Stands in for a store that could not be opened, so evaluation still
/// runs and reports the lookup failure.
#[derive(Debug, Clone)]
pub struct UnavailableStageSource {
    reason: String,
}

impl UnavailableStageSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl StageSource for UnavailableStageSource {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn load_stages(&self) -> Result<Vec<PhenologyStage>> {
        Err(OrchardError::StageLookup(self.reason.clone()))
    }
}

/// Problems worth flagging in a stage table. Resolution works regardless;
/// these only make results surprising.
pub fn table_problems(stages: &[PhenologyStage]) -> Vec<String> {
    let mut problems = Vec::new();

    for (i, stage) in stages.iter().enumerate() {
        if !stage.heat_threshold.is_finite() || stage.heat_threshold < 0.0 {
            problems.push(format!(
                "BBCH {} ({}) has invalid threshold {}",
                stage.stage_code, stage.stage_name, stage.heat_threshold
            ));
        }
        if let Some(dup) = stages[..i].iter().find(|s| s.stage_code == stage.stage_code) {
            problems.push(format!(
                "BBCH code {} used by both '{}' and '{}'",
                stage.stage_code, dup.stage_name, stage.stage_name
            ));
        }
        if let Some(tie) = stages[..i]
            .iter()
            .find(|s| s.heat_threshold == stage.heat_threshold)
        {
            problems.push(format!(
                "'{}' and '{}' share threshold {}; the first listed wins",
                tie.stage_name, stage.stage_name, stage.heat_threshold
            ));
        }
    }

    if !stages.is_empty() && !stages.iter().any(|s| s.heat_threshold == 0.0) {
        problems.push("No stage starts at 0 GDD; early-season readings fall back".to_string());
    }

    problems
}

/// Pick the stage for the given heat units.
///
/// The stage with the highest threshold not above `heat_units` wins. When
/// several stages share that threshold the first one in table order is
/// kept. Below every threshold the lowest-threshold stage is reported (first
/// in table order on ties); an empty table yields the synthetic dormant
/// stage. The table does not need to be sorted. Stages with a non-finite
/// threshold are ignored.
pub fn resolve_stage(heat_units: f64, stages: &[PhenologyStage]) -> ResolvedPhase {
    let mut best: Option<&PhenologyStage> = None;
    let mut earliest: Option<&PhenologyStage> = None;

    for stage in stages.iter().filter(|s| s.heat_threshold.is_finite()) {
        if stage.heat_threshold <= heat_units
            && best.map_or(true, |b| stage.heat_threshold > b.heat_threshold)
        {
            best = Some(stage);
        }
        if earliest.map_or(true, |e| stage.heat_threshold < e.heat_threshold) {
            earliest = Some(stage);
        }
    }

    let phase = match (best, earliest) {
        (Some(stage), _) => ResolvedPhase::new(stage.clone(), StageResolution::Matched),
        (None, Some(stage)) => {
            ResolvedPhase::new(stage.clone(), StageResolution::BelowFirstThreshold)
        }
        (None, None) => {
            ResolvedPhase::new(PhenologyStage::dormant(), StageResolution::EmptyTable)
        }
    };

    debug!(
        heat_units,
        bbch = phase.stage.stage_code,
        stage = %phase.stage.stage_name,
        resolution = %phase.resolution,
        "Resolved phenology stage"
    );

    phase
}

/// Load the table from `source` and resolve against it. A failed load is
/// logged and reported as the lookup-failed dormant stage rather than an
/// error.
pub fn resolve_from_source(heat_units: f64, source: &dyn StageSource) -> ResolvedPhase {
    match source.load_stages() {
        Ok(stages) => resolve_stage(heat_units, &stages),
        Err(e) => {
            warn!(source = source.name(), error = %e, "Failed to load phenology stages");
            ResolvedPhase::new(
                PhenologyStage::lookup_failed(),
                StageResolution::LookupFailed,
            )
        }
    }
}
