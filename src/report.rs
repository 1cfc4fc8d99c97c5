use crate::models::{OrchardState, PhenologyStage};
use std::fmt::Write;

/// Plain-text rendering of an evaluation for terminals.
pub fn render_state(state: &OrchardState) -> String {
    let mut out = String::new();
    let phase = &state.pheno_phase;

    let _ = writeln!(
        out,
        "Stage:    BBCH {} {} (GDD >= {})",
        phase.stage.stage_code, phase.stage.stage_name, phase.stage.heat_threshold
    );
    if let Some(desc) = &phase.stage.description {
        let _ = writeln!(out, "          {}", desc);
    }
    if phase.resolution.is_fallback() {
        let _ = writeln!(out, "          [{}]", phase.resolution);
    }
    let _ = writeln!(
        out,
        "Disease:  {} - {}",
        state.disease_risk.level, state.disease_risk.reason
    );
    let _ = writeln!(
        out,
        "Spraying: {} - {}",
        state.weather_window.status, state.weather_window.reason
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Recommendations (highest: {}):",
        state.highest_severity()
    );
    for rec in &state.recommendations {
        let _ = writeln!(
            out,
            "  {} [{}] {}: {}",
            rec.severity.symbol(),
            rec.severity,
            rec.title,
            rec.message
        );
    }

    out
}

pub fn render_stages(stages: &[PhenologyStage]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>5}  {:>7}  {}", "BBCH", "GDD", "Stage");
    for stage in stages {
        let _ = write!(
            out,
            "{:>5}  {:>7.1}  {}",
            stage.stage_code, stage.heat_threshold, stage.stage_name
        );
        if let Some(desc) = &stage.description {
            let _ = write!(out, " - {}", desc);
        }
        let _ = writeln!(out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::evaluator::evaluate;
    use crate::models::ParameterSnapshot;

    #[test]
    fn text_report_lists_every_recommendation() {
        let state = evaluate(
            &ParameterSnapshot::new(0.0, 5.0, 12.0, 6.0, 6),
            &[PhenologyStage::new(7, "Green tip", 60.0)],
        );
        let text = render_state(&state);

        assert!(text.contains("BBCH 7 Green tip"));
        assert!(text.contains("[Below first threshold]"));
        assert!(text.contains("Disease:  High"));
        assert!(text.contains("Spraying: Closed"));
        assert!(text.contains("Scab protection"));
        assert!(text.contains("Spraying prohibited"));
        assert!(text.contains("Codling moth treatment"));
        assert!(text.contains("(highest: Critical)"));
    }

    #[test]
    fn matched_stage_has_no_fallback_note() {
        let state = evaluate(
            &ParameterSnapshot::new(70.0, 18.0, 0.0, 0.0, 0),
            &[PhenologyStage::new(7, "Green tip", 60.0)],
        );
        let text = render_state(&state);
        assert!(!text.lines().any(|l| l.trim_start().starts_with('[')));
    }

    #[test]
    fn stage_table_rows() {
        let text = render_stages(&[
            PhenologyStage::new(0, "Dormancy", 0.0),
            PhenologyStage::new(65, "Full bloom", 200.0).with_description("50% open"),
        ]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("200.0"));
        assert!(lines[2].ends_with("Full bloom - 50% open"));
    }
}
