//! Forward model for Wenner soundings over a layered half-space.
//!
//! A reading at spacing `a` is modelled as a sensitivity-weighted average of
//! the layer resistivities, with slab weights taken from the depth-response
//! kernel. The solver relies on two primitive operations:
//!
//! - build the weight row for a given spacing (also the Jacobian skeleton)
//! - predict the apparent resistivity of a model at a set of spacings
//!
//! The weight rows partition unity, so a uniform model of resistivity `rho`
//! predicts exactly `rho` at every spacing.

pub mod kernel;

use crate::domain::LayeredModel;

/// Sensitivity weight of each layer for a reading at `spacing_m`.
///
/// `boundaries` holds the cumulative bottom depth of each layer; the last
/// layer is treated as a half-space extending below its top, so the returned
/// weights always sum to exactly 1. Zero-thickness layers get zero weight.
///
/// # Panics
/// Panics if `boundaries` is empty. Callers validate models and meshes first.
pub fn layer_weights(boundaries: &[f64], spacing_m: f64) -> Vec<f64> {
    let n = boundaries.len();
    assert!(n > 0, "layer_weights requires at least one layer");

    let mut weights = Vec::with_capacity(n);
    let mut above = 0.0;
    for (i, bottom) in boundaries.iter().enumerate() {
        let weight = if i + 1 == n {
            // Basement slab: everything below the previous boundary.
            1.0 - above
        } else {
            let f = kernel::depth_response(*bottom, spacing_m);
            let w = f - above;
            above = f;
            w
        };
        weights.push(weight.max(0.0));
    }
    weights
}

/// Predict one apparent-resistivity reading for explicit layer arrays.
pub fn predict_point(boundaries: &[f64], resistivities: &[f64], spacing_m: f64) -> f64 {
    let weights = layer_weights(boundaries, spacing_m);
    weights
        .iter()
        .zip(resistivities)
        .map(|(w, rho)| w * rho)
        .sum()
}

/// Predict the apparent resistivity of `model` at each spacing, in order.
pub fn predict_apparent(model: &LayeredModel, spacings_m: &[f64]) -> Vec<f64> {
    let boundaries = model.boundaries();
    spacings_m
        .iter()
        .map(|a| predict_point(&boundaries, &model.resistivities, *a))
        .collect()
}
