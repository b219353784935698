//! Render a solved sounding as a plain-text terminal summary.
//!
//! Formatting stays in one place so:
//! - the solver code never learns about column widths
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{InvertConfig, SoundingInput};
use crate::fit::SolveOutcome;
use crate::io::AggregatedSounding;
use crate::report::PointResidual;

/// Format the full run summary (site header + solve diagnostics + model + fit).
///
/// `residuals` must come from [`crate::report::compute_residuals`] on the same
/// points and result that produced `outcome`.
pub fn format_run_summary(
    input: &SoundingInput,
    agg: &AggregatedSounding,
    outcome: &SolveOutcome,
    residuals: &[PointResidual],
    config: &InvertConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== ves - Wenner Sounding Inversion ===\n");
    if let Some(line) = site_line(input) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&format!(
        "Points: {} spacings | readings used {}, dropped {} | merged {}\n",
        agg.points.len(),
        agg.stats.readings_used,
        agg.stats.readings_dropped,
        agg.stats.merged_spacings,
    ));
    out.push_str(&format!("Method: {}\n", outcome.method.display_name()));

    if let Some(stats) = &outcome.stats {
        out.push_str(&format!(
            "Solver: {} iterations | rms {:.4} -> {:.4} | beta0 {:.3e} | {}\n",
            stats.iterations,
            stats.initial_rms,
            stats.final_rms,
            stats.beta0,
            stats.termination.label(),
        ));
        out.push_str(&format!(
            "Config: max_iter {} | target_misfit {:.4} | beta0_ratio {} | cooling {}\n",
            config.max_iterations, config.target_misfit, config.beta0_ratio, config.beta_cooling,
        ));
    }

    out.push_str(&format!(
        "\nLayered model ({} cells):\n",
        outcome.result.depths_m.len()
    ));
    out.push_str(&format!("{:>12} {:>12}\n", "depth_m", "rho_ohm_m"));
    for (depth, rho) in outcome
        .result
        .depths_m
        .iter()
        .zip(&outcome.result.resistivities)
    {
        out.push_str(&format!("{depth:>12.3} {rho:>12.3}\n"));
    }

    out.push_str("\nFit at observed spacings:\n");
    out.push_str(&format!(
        "{:>8} {:>10} {:>11} {:>11} {:>9}\n",
        "a_ft", "a_m", "observed", "predicted", "rel_err"
    ));
    for r in residuals {
        out.push_str(&format!(
            "{:>8.1} {:>10.3} {:>11.3} {:>11.3} {:>+8.2}%\n",
            r.spacing_ft,
            r.spacing_m,
            r.observed,
            r.predicted,
            r.rel_error * 100.0,
        ));
    }

    out
}

fn site_line(input: &SoundingInput) -> Option<String> {
    match (&input.site, &input.date) {
        (Some(site), Some(date)) => Some(format!("Site: {site} ({date})")),
        (Some(site), None) => Some(format!("Site: {site}")),
        (None, Some(date)) => Some(format!("Date: {date}")),
        (None, None) => None,
    }
}
