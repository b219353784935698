//! Closed-form half-spacing estimate.
//!
//! The classical field heuristic for a Wenner sounding: a reading at spacing
//! `a` characterizes the ground down to `a / 2`. Each aggregated point
//! therefore becomes its own layer, and the predicted curve is the
//! observations themselves. Used when the iterative backend is compiled out,
//! fails, or is bypassed on request.

use crate::domain::{AggregatedPoint, InversionResult};
use crate::forward::kernel;

/// Estimate a layered model directly from the aggregated points.
///
/// Depths are `spacing_m / 2`, strictly increasing because the points are
/// sorted and de-duplicated by spacing. The fit is exact by construction.
pub fn estimate(points: &[AggregatedPoint]) -> InversionResult {
    let depths_m = points.iter().map(|p| kernel::median_depth(p.spacing_m)).collect();
    let resistivities: Vec<f64> = points.iter().map(|p| p.resistivity).collect();
    let fit_curve = resistivities.clone();
    InversionResult {
        depths_m,
        resistivities,
        fit_curve,
    }
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
    fn depths_are_half_the_metric_spacing() {
        let points = vec![point(5.0, 41.0), point(10.0, 56.5), point(20.0, 92.5)];
        let result = estimate(&points);
        assert_eq!(result.depths_m.len(), 3);
        assert!((result.depths_m[0] - 0.762).abs() < 1e-9);
        assert!((result.depths_m[1] - 1.524).abs() < 1e-9);
        assert!((result.depths_m[2] - 3.048).abs() < 1e-9);
    }

    #[test]
    fn fit_curve_reproduces_the_observations_exactly() {
        let points = vec![point(5.0, 41.0), point(10.0, 56.5)];
        let result = estimate(&points);
        assert_eq!(result.resistivities, vec![41.0, 56.5]);
        assert_eq!(result.fit_curve, result.resistivities);
    }

    #[test]
    fn depths_stay_strictly_increasing() {
        let points = vec![point(2.5, 30.0), point(7.5, 45.0), point(22.5, 60.0)];
        let result = estimate(&points);
        for pair in result.depths_m.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }
}
