//! Debug bundle writer for inspecting one solve end to end.

use std::fs::{File, create_dir_all};
use std::io::Write as _;
use std::path::PathBuf;

use chrono::Local;

use crate::domain::{InvertConfig, SoundingInput};
use crate::error::AppError;
use crate::fit::SolveOutcome;
use crate::io::AggregatedSounding;

/// Write a markdown bundle (inputs, solver trace, recovered model) under
/// `debug/`. Returns the created path.
pub fn write_debug_bundle(
    input: &SoundingInput,
    agg: &AggregatedSounding,
    outcome: &SolveOutcome,
    config: &InvertConfig,
) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir)
        .map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("ves_debug_{ts}.md"));

    let md = render_bundle(input, agg, outcome, config);

    let mut file = File::create(&path)
        .map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;
    file.write_all(md.as_bytes())
        .map_err(|e| AppError::new(4, format!("Failed to write debug bundle: {e}")))?;

    Ok(path)
}

fn render_bundle(
    input: &SoundingInput,
    agg: &AggregatedSounding,
    outcome: &SolveOutcome,
    config: &InvertConfig,
) -> String {
    let mut out = String::new();

    out.push_str("# ves debug bundle\n");
    out.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    if let Some(site) = &input.site {
        out.push_str(&format!("- site: {site}\n"));
    }
    if let Some(date) = &input.date {
        out.push_str(&format!("- date: {date}\n"));
    }
    out.push_str(&format!("- method: {}\n", outcome.method.display_name()));
    out.push_str(&format!(
        "- config: max_iter={}, target_misfit={}, beta0_ratio={}, cooling={}, alpha_s={}, alpha_x={}, pad_cells={}, pad_width_m={}\n",
        config.max_iterations,
        config.target_misfit,
        config.beta0_ratio,
        config.beta_cooling,
        config.alpha_s,
        config.alpha_x,
        config.pad_cells,
        config.pad_width_m,
    ));
    out.push_str(&format!(
        "- aggregation: spacings_read={}, readings_used={}, readings_dropped={}, merged={}\n",
        agg.stats.spacings_read,
        agg.stats.readings_used,
        agg.stats.readings_dropped,
        agg.stats.merged_spacings,
    ));
    for note in &outcome.notes {
        out.push_str(&format!("- note: {note}\n"));
    }

    out.push_str("\n## Aggregated points\n");
    out.push_str("| a_ft | a_m | rho_app | n_readings |\n");
    out.push_str("| - | - | - | - |\n");
    for p in &agg.points {
        out.push_str(&format!(
            "| {:.2} | {:.4} | {:.4} | {} |\n",
            p.spacing_ft, p.spacing_m, p.resistivity, p.n_readings,
        ));
    }

    if let Some(stats) = &outcome.stats {
        out.push_str("\n## Solver\n");
        out.push_str(&format!("- beta0: {:.6}\n", stats.beta0));
        out.push_str(&format!(
            "- rms: {:.6} -> {:.6}\n",
            stats.initial_rms, stats.final_rms
        ));
        out.push_str(&format!("- termination: {}\n", stats.termination.label()));

        out.push_str("\n### Iterations\n");
        out.push_str("| iter | beta | step | phi_data | phi_model | rms |\n");
        out.push_str("| - | - | - | - | - | - |\n");
        for rec in &stats.history {
            out.push_str(&format!(
                "| {} | {:.6} | {:.3} | {:.6} | {:.6} | {:.6} |\n",
                rec.iteration, rec.beta, rec.step, rec.phi_data, rec.phi_model, rec.rms,
            ));
        }
    }

    out.push_str("\n## Recovered model\n");
    out.push_str("| cell | depth_m | rho_ohm_m |\n");
    out.push_str("| - | - | - |\n");
    for (idx, (depth, rho)) in outcome
        .result
        .depths_m
        .iter()
        .zip(&outcome.result.resistivities)
        .enumerate()
    {
        out.push_str(&format!("| {idx} | {depth:.4} | {rho:.4} |\n"));
    }

    out.push_str("\n## Fit\n");
    out.push_str("| a_ft | observed | predicted |\n");
    out.push_str("| - | - | - |\n");
    for (p, pred) in agg.points.iter().zip(&outcome.result.fit_curve) {
        out.push_str(&format!(
            "| {:.2} | {:.4} | {:.4} |\n",
            p.spacing_ft, p.resistivity, pred,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AggregatedPoint, FEET_TO_METERS, InversionResult, SolveMethod};
    use crate::fit::{IterationRecord, SolveStats, Termination};
    use crate::io::AggregationStats;

    #[test]
    fn bundle_lists_points_iterations_and_model() {
        let input = SoundingInput {
            a_ft: vec![5.0, 10.0],
            rho_ns: Vec::new(),
            rho_we: Vec::new(),
            site: Some("Test pit".to_string()),
            date: None,
        };
        let agg = AggregatedSounding {
            points: vec![
                AggregatedPoint {
                    spacing_ft: 5.0,
                    spacing_m: 5.0 * FEET_TO_METERS,
                    resistivity: 41.0,
                    n_readings: 2,
                },
                AggregatedPoint {
                    spacing_ft: 10.0,
                    spacing_m: 10.0 * FEET_TO_METERS,
                    resistivity: 56.5,
                    n_readings: 2,
                },
            ],
            stats: AggregationStats {
                spacings_read: 2,
                readings_used: 4,
                readings_dropped: 0,
                merged_spacings: 0,
            },
        };
        let outcome = SolveOutcome {
            result: InversionResult {
                depths_m: vec![0.381, 1.143],
                resistivities: vec![40.0, 60.0],
                fit_curve: vec![41.2, 56.0],
            },
            method: SolveMethod::GaussNewton,
            stats: Some(SolveStats {
                iterations: 1,
                beta0: 100.0,
                initial_rms: 0.5,
                final_rms: 0.01,
                termination: Termination::TargetReached,
                history: vec![IterationRecord {
                    iteration: 1,
                    beta: 100.0,
                    step: 1.0,
                    phi_data: 0.02,
                    phi_model: 0.3,
                    rms: 0.01,
                }],
            }),
            notes: Vec::new(),
        };

        let md = render_bundle(&input, &agg, &outcome, &InvertConfig::default());
        assert!(md.starts_with("# ves debug bundle\n"));
        assert!(md.contains("- site: Test pit"));
        assert!(md.contains("## Aggregated points"));
        assert!(md.contains("| 5.00 | 1.5240 | 41.0000 | 2 |"));
        assert!(md.contains("### Iterations"));
        assert!(md.contains("- termination: target misfit reached"));
        assert!(md.contains("## Recovered model"));
        assert!(md.contains("| 0 | 0.3810 | 40.0000 |"));
    }

    #[test]
    fn half_spacing_bundle_has_no_solver_section() {
        let input = SoundingInput {
            a_ft: Vec::new(),
            rho_ns: Vec::new(),
            rho_we: Vec::new(),
            site: None,
            date: None,
        };
        let agg = AggregatedSounding {
            points: Vec::new(),
            stats: AggregationStats {
                spacings_read: 0,
                readings_used: 0,
                readings_dropped: 0,
                merged_spacings: 0,
            },
        };
        let outcome = SolveOutcome {
            result: InversionResult {
                depths_m: Vec::new(),
                resistivities: Vec::new(),
                fit_curve: Vec::new(),
            },
            method: SolveMethod::HalfSpacing,
            stats: None,
            notes: vec!["iterative solver not compiled into this build; using half-spacing estimate".to_string()],
        };

        let md = render_bundle(&input, &agg, &outcome, &InvertConfig::default());
        assert!(!md.contains("## Solver"));
        assert!(md.contains("- note: iterative solver not compiled into this build"));
        assert!(md.contains("- method: half-spacing estimate"));
    }
}
