//! Reporting utilities: per-point residuals and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{AggregatedPoint, InversionResult};
use crate::error::AppError;

/// Observed vs predicted apparent resistivity at one spacing.
#[derive(Debug, Clone)]
pub struct PointResidual {
    pub spacing_ft: f64,
    pub spacing_m: f64,
    pub observed: f64,
    pub predicted: f64,
    /// Signed relative error, `(predicted - observed) / observed`.
    pub rel_error: f64,
}

/// Pair each aggregated point with its fitted prediction.
pub fn compute_residuals(
    points: &[AggregatedPoint],
    result: &InversionResult,
) -> Result<Vec<PointResidual>, AppError> {
    if points.len() != result.fit_curve.len() {
        return Err(AppError::new(
            4,
            format!(
                "Fit curve length mismatch: {} points vs {} predictions",
                points.len(),
                result.fit_curve.len()
            ),
        ));
    }

    let mut out = Vec::with_capacity(points.len());
    for (p, predicted) in points.iter().zip(&result.fit_curve) {
        if !predicted.is_finite() {
            return Err(AppError::new(4, "Non-finite prediction during residual computation."));
        }
        out.push(PointResidual {
            spacing_ft: p.spacing_ft,
            spacing_m: p.spacing_m,
            observed: p.resistivity,
            predicted: *predicted,
            rel_error: (predicted - p.resistivity) / p.resistivity,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FEET_TO_METERS;

    fn point(spacing_ft: f64, resistivity: f64) -> AggregatedPoint {
        AggregatedPoint {
            spacing_ft,
            spacing_m: spacing_ft * FEET_TO_METERS,
            resistivity,
            n_readings: 2,
        }
    }

    #[test]
    fn residuals_pair_points_with_predictions() {
        let points = vec![point(5.0, 40.0), point(10.0, 50.0)];
        let result = InversionResult {
            depths_m: vec![1.0, 2.0],
            resistivities: vec![40.0, 50.0],
            fit_curve: vec![42.0, 49.0],
        };
        let residuals = compute_residuals(&points, &result).unwrap();
        assert_eq!(residuals.len(), 2);
        assert!((residuals[0].rel_error - 0.05).abs() < 1e-12);
        assert!((residuals[1].rel_error + 0.02).abs() < 1e-12);
    }

    #[test]
    fn length_mismatch_is_an_internal_error() {
        let points = vec![point(5.0, 40.0)];
        let result = InversionResult {
            depths_m: vec![1.0],
            resistivities: vec![40.0],
            fit_curve: vec![40.0, 41.0],
        };
        let err = compute_residuals(&points, &result).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
