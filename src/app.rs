use crate::config::{Config, StageSourceKind};
use crate::db::Database;
use crate::error::{OrchardError, Result};
use crate::logic::phenology::{table_problems, UnavailableStageSource};
use crate::logic::{OrchardStateEvaluator, StageSource, StaticStageTable};
use crate::models::{OrchardState, ParameterSnapshot, PhenologyStage};
use std::path::PathBuf;

/// Wires configuration, the stage table and the evaluator together.
pub struct App {
    pub config: Config,
    pub evaluator: OrchardStateEvaluator,
    stage_source: Box<dyn StageSource>,
}

/// Result of `orchardops check`.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub source: StageSourceKind,
    pub stage_count: usize,
    pub problems: Vec<String>,
}

impl App {
    pub fn new(config: Config, data_dir: Option<&PathBuf>) -> Self {
        let stage_source = open_stage_source(&config, data_dir);
        Self::with_source(config, stage_source)
    }

    pub fn with_source(config: Config, stage_source: Box<dyn StageSource>) -> Self {
        let evaluator = OrchardStateEvaluator::new(config.thresholds);
        Self {
            config,
            evaluator,
            stage_source,
        }
    }

    pub fn evaluate(&self, snapshot: &ParameterSnapshot) -> OrchardState {
        self.evaluator
            .evaluate_with_source(snapshot, self.stage_source.as_ref())
    }

    /// Active stage table, lowest threshold first.
    pub fn stages(&self) -> Result<Vec<PhenologyStage>> {
        let mut stages = self.stage_source.load_stages()?;
        // Stable, so equal thresholds keep table order
        stages.sort_by(|a, b| a.heat_threshold.total_cmp(&b.heat_threshold));
        Ok(stages)
    }

    pub fn check(&self) -> Result<CheckReport> {
        let stages = self.stage_source.load_stages()?;
        let mut problems = table_problems(&stages);
        if stages.is_empty() {
            problems.push("Stage table is empty; every reading resolves to Dormant".to_string());
        }

        Ok(CheckReport {
            source: self.config.phenology.source,
            stage_count: stages.len(),
            problems,
        })
    }
}

fn open_stage_source(config: &Config, data_dir: Option<&PathBuf>) -> Box<dyn StageSource> {
    match config.phenology.source {
        StageSourceKind::Builtin | StageSourceKind::Config => {
            Box::new(StaticStageTable::new(config.phenology.static_stages()))
        }
        StageSourceKind::Database => {
            match Config::db_path(data_dir).and_then(|p| Database::open(&p)) {
                Ok(db) => {
                    tracing::debug!(path = %db.path().display(), "Using SQLite stage table");
                    Box::new(db)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Stage database unavailable");
                    Box::new(UnavailableStageSource::new(e.to_string()))
                }
            }
        }
    }
}

/// Replace the SQLite stage table with `stages`. Returns the stored count.
pub fn import_stages(
    stages: &[PhenologyStage],
    data_dir: Option<&PathBuf>,
) -> Result<(usize, PathBuf)> {
    if stages.is_empty() {
        return Err(OrchardError::InvalidData(
            "stage file contains no stages".into(),
        ));
    }
    for problem in table_problems(stages) {
        tracing::warn!("{}", problem);
    }

    let path = Config::db_path(data_dir)?;
    let db = Database::open(&path)?;
    let count = db.replace_phenology_stages(stages)?;
    Ok((count, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_apple_stages, StageResolution};

    #[test]
    fn builtin_source_by_default() {
        let app = App::new(Config::default(), None);
        assert_eq!(app.stages().unwrap(), default_apple_stages());

        let report = app.check().unwrap();
        assert_eq!(report.source, StageSourceKind::Builtin);
        assert_eq!(report.stage_count, default_apple_stages().len());
        assert!(report.problems.is_empty());
    }

    #[test]
    fn stages_are_listed_in_threshold_order() {
        let mut config = Config::default();
        config.phenology.source = StageSourceKind::Config;
        config.phenology.stages = vec![
            PhenologyStage::new(7, "Green Tip", 100.0),
            PhenologyStage::new(0, "Dormant", 0.0),
        ];
        let app = App::new(config, None);

        let names: Vec<String> = app.stages().unwrap().into_iter().map(|s| s.stage_name).collect();
        assert_eq!(names, vec!["Dormant", "Green Tip"]);
    }

    #[test]
    fn empty_config_table_is_flagged() {
        let mut config = Config::default();
        config.phenology.source = StageSourceKind::Config;
        let report = App::new(config, None).check().unwrap();

        assert_eq!(report.stage_count, 0);
        assert_eq!(report.problems.len(), 1);
    }

    #[test]
    fn unavailable_store_degrades_evaluation() {
        let app = App::with_source(
            Config::default(),
            Box::new(UnavailableStageSource::new("permission denied")),
        );
        let state = app.evaluate(&ParameterSnapshot::new(150.0, 18.0, 0.0, 0.0, 0));

        assert_eq!(state.pheno_phase.resolution, StageResolution::LookupFailed);
        assert!(app.stages().is_err());
        assert!(app.check().is_err());
    }

    #[test]
    fn import_then_evaluate_from_database() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_path_buf();

        let (count, path) = import_stages(&default_apple_stages(), Some(&data_dir)).unwrap();
        assert_eq!(count, default_apple_stages().len());
        assert!(path.exists());

        let mut config = Config::default();
        config.phenology.source = StageSourceKind::Database;
        let app = App::new(config, Some(&data_dir));

        let state = app.evaluate(&ParameterSnapshot::new(65.0, 12.0, 0.0, 0.0, 0));
        assert_eq!(state.pheno_phase.stage.stage_code, 7);
        assert_eq!(state.pheno_phase.resolution, StageResolution::Matched);
    }

    #[test]
    fn import_rejects_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_path_buf();
        assert!(matches!(
            import_stages(&[], Some(&data_dir)),
            Err(OrchardError::InvalidData(_))
        ));
    }
}
