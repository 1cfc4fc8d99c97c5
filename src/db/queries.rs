use crate::db::Database;
use crate::error::Result;
use crate::logic::StageSource;
use crate::models::PhenologyStage;
use rusqlite::{params, Row};
use tracing::{info, warn};

// Phenology Stage Queries

impl Database {
    /// All stages, lowest threshold first. Ties keep insertion order.
    pub fn list_phenology_stages(&self) -> Result<Vec<PhenologyStage>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT bbch_code, stage_name, gdd_threshold, description \
                 FROM phenology_stages ORDER BY gdd_threshold ASC, id ASC",
            )?;
            let stages = stmt
                .query_map([], row_to_stage)?
                .filter_map(|r| match r {
                    Ok(stage) if stage.heat_threshold.is_finite() => Some(stage),
                    Ok(stage) => {
                        warn!(
                            bbch = stage.stage_code,
                            "Non-finite gdd_threshold in database, skipping stage"
                        );
                        None
                    }
                    Err(e) => {
                        warn!(error = %e, "Malformed phenology_stages row, skipping");
                        None
                    }
                })
                .collect();
            Ok(stages)
        })
    }

    #[cfg(test)]
    pub fn get_phenology_stage(&self, bbch_code: i32) -> Result<Option<PhenologyStage>> {
        use rusqlite::OptionalExtension;

        self.with_conn(|conn| {
            conn.query_row(
                "SELECT bbch_code, stage_name, gdd_threshold, description \
                 FROM phenology_stages WHERE bbch_code = ?1",
                [bbch_code],
                row_to_stage,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn upsert_phenology_stage(&self, stage: &PhenologyStage) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO phenology_stages (bbch_code, stage_name, gdd_threshold, description)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(bbch_code) DO UPDATE SET
                    stage_name = excluded.stage_name,
                    gdd_threshold = excluded.gdd_threshold,
                    description = excluded.description
                "#,
                params![
                    stage.stage_code,
                    stage.stage_name,
                    stage.heat_threshold,
                    stage.description,
                ],
            )?;
            Ok(())
        })
    }

    /// Swap the whole table in one transaction. Returns the number of stages stored.
    pub fn replace_phenology_stages(&self, stages: &[PhenologyStage]) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM phenology_stages", [])?;
            {
                let mut stmt = tx.prepare(
                    r#"
                    INSERT INTO phenology_stages (bbch_code, stage_name, gdd_threshold, description)
                    VALUES (?1, ?2, ?3, ?4)
                    "#,
                )?;
                for stage in stages {
                    stmt.execute(params![
                        stage.stage_code,
                        stage.stage_name,
                        stage.heat_threshold,
                        stage.description,
                    ])?;
                }
            }
            tx.commit()?;
            info!(count = stages.len(), "Replaced phenology stage table");
            Ok(stages.len())
        })
    }

    pub fn count_phenology_stages(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM phenology_stages", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }
}

impl StageSource for Database {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn load_stages(&self) -> Result<Vec<PhenologyStage>> {
        self.list_phenology_stages()
    }
}

fn row_to_stage(row: &Row) -> rusqlite::Result<PhenologyStage> {
    Ok(PhenologyStage {
        stage_code: row.get("bbch_code")?,
        stage_name: row.get("stage_name")?,
        heat_threshold: row.get("gdd_threshold")?,
        description: row.get("description")?,
    })
}
