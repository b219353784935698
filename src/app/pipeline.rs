//! The solve stage of `ves invert`, separated from presentation.
//!
//! `app` reads and aggregates the sounding, then hands it here; this module
//! runs the solver and derives residuals so the printing code never touches
//! solver internals directly.

use crate::domain::{InvertConfig, SoundingInput};
use crate::error::AppError;
use crate::fit::{Backend, SolveOutcome, solve_sounding};
use crate::io::AggregatedSounding;
use crate::report::PointResidual;

/// All computed outputs of a single `ves invert` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub input: SoundingInput,
    pub agg: AggregatedSounding,
    pub outcome: SolveOutcome,
    pub residuals: Vec<PointResidual>,
}

/// Solve an aggregated sounding and package the run outputs.
pub fn solve_run(
    input: SoundingInput,
    agg: AggregatedSounding,
    backend: Backend,
    config: &InvertConfig,
) -> Result<RunOutput, AppError> {
    let outcome = solve_sounding(backend, &agg.points, config);
    let residuals = crate::report::compute_residuals(&agg.points, &outcome.result)?;

    Ok(RunOutput {
        input,
        agg,
        outcome,
        residuals,
    })
}
