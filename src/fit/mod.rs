//! Inversion orchestration.
//!
//! Responsibilities:
//!
//! - probe which solver backend this build supports
//! - run the Gauss-Newton inversion when available
//! - degrade to the half-spacing estimate when it is not, or when it fails

pub mod fallback;
pub mod mesh;
#[cfg(feature = "solver")]
pub mod solver;

use crate::domain::{AggregatedPoint, InvertConfig, InversionResult, SolveMethod};
#[cfg(feature = "solver")]
use crate::error::SolveError;

/// Solver backend chosen for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    GaussNewton,
    HalfSpacing,
}

impl Backend {
    /// Probe the backend this build can offer.
    pub fn detect() -> Backend {
        if cfg!(feature = "solver") {
            Backend::GaussNewton
        } else {
            Backend::HalfSpacing
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Backend::GaussNewton => "gauss-newton",
            Backend::HalfSpacing => "half-spacing",
        }
    }
}

/// Why the Gauss-Newton loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every point's relative misfit dropped to the configured target.
    TargetReached,
    /// The iteration cap was exhausted first.
    MaxIterations,
    /// No step length produced a decrease in the objective.
    Stalled,
}

impl Termination {
    pub fn label(self) -> &'static str {
        match self {
            Termination::TargetReached => "target misfit reached",
            Termination::MaxIterations => "iteration cap reached",
            Termination::Stalled => "no descent step found",
        }
    }
}

/// One accepted Gauss-Newton iteration.
#[derive(Debug, Clone)]
pub struct IterationRecord {
    pub iteration: usize,
    pub beta: f64,
    /// Fraction of the proposed step that was accepted.
    pub step: f64,
    pub phi_data: f64,
    pub phi_model: f64,
    /// Relative data RMS after the step.
    pub rms: f64,
}

/// Diagnostics for a completed iterative solve.
#[derive(Debug, Clone)]
pub struct SolveStats {
    pub iterations: usize,
    pub beta0: f64,
    pub initial_rms: f64,
    pub final_rms: f64,
    pub termination: Termination,
    pub history: Vec<IterationRecord>,
}

/// Output of solving one sounding.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub result: InversionResult,
    pub method: SolveMethod,
    /// Present only for the iterative path.
    pub stats: Option<SolveStats>,
    /// Diagnostics worth surfacing to the operator (not part of the result).
    pub notes: Vec<String>,
}

/// Solve one sounding with the requested backend.
///
/// Never fails: any solver error from the iterative path is downgraded to
/// the half-spacing estimate, with a note explaining why. `points` must be
/// non-empty and sorted by spacing.
pub fn solve_sounding(
    backend: Backend,
    points: &[AggregatedPoint],
    config: &InvertConfig,
) -> SolveOutcome {
    match backend {
        Backend::HalfSpacing => half_spacing_outcome(points, Vec::new()),
        Backend::GaussNewton => match run_gauss_newton(points, config) {
            Ok(outcome) => outcome,
            Err(err) => half_spacing_outcome(
                points,
                vec![format!("{err}; using half-spacing estimate")],
            ),
        },
    }
}

fn half_spacing_outcome(points: &[AggregatedPoint], notes: Vec<String>) -> SolveOutcome {
    SolveOutcome {
        result: fallback::estimate(points),
        method: SolveMethod::HalfSpacing,
        stats: None,
        notes,
    }
}

#[cfg(feature = "solver")]
fn run_gauss_newton(
    points: &[AggregatedPoint],
    config: &InvertConfig,
) -> Result<SolveOutcome, SolveError> {
    let (result, stats) = solver::invert(points, config)?;
    Ok(SolveOutcome {
        result,
        method: SolveMethod::GaussNewton,
        stats: Some(stats),
        notes: Vec::new(),
    })
}

#[cfg(not(feature = "solver"))]
fn run_gauss_newton(
    _points: &[AggregatedPoint],
    _config: &InvertConfig,
) -> Result<SolveOutcome, crate::error::SolveError> {
    Err(crate::error::SolveError::Unavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FEET_TO_METERS;

    fn points() -> Vec<AggregatedPoint> {
        [(5.0, 41.0), (10.0, 56.5), (20.0, 92.5)]
            .iter()
            .map(|(a, rho)| AggregatedPoint {
                spacing_ft: *a,
                spacing_m: a * FEET_TO_METERS,
                resistivity: *rho,
                n_readings: 2,
            })
            .collect()
    }

    #[test]
    fn forced_half_spacing_reports_its_method() {
        let outcome = solve_sounding(Backend::HalfSpacing, &points(), &InvertConfig::default());
        assert_eq!(outcome.method, SolveMethod::HalfSpacing);
        assert!(outcome.stats.is_none());
        assert!(outcome.notes.is_empty());
        assert_eq!(outcome.result.fit_curve, vec![41.0, 56.5, 92.5]);
    }

    #[test]
    fn detected_backend_produces_a_result() {
        let outcome = solve_sounding(Backend::detect(), &points(), &InvertConfig::default());
        assert_eq!(outcome.result.depths_m.len(), outcome.result.resistivities.len());
        assert_eq!(outcome.result.fit_curve.len(), 3);
        for rho in &outcome.result.resistivities {
            assert!(rho.is_finite());
            assert!(*rho > 0.0);
        }
    }

    #[cfg(feature = "solver")]
    #[test]
    fn gauss_newton_backend_reports_stats() {
        let outcome = solve_sounding(Backend::GaussNewton, &points(), &InvertConfig::default());
        assert_eq!(outcome.method, SolveMethod::GaussNewton);
        assert!(outcome.stats.is_some());
        assert!(outcome.notes.is_empty());
    }
}
