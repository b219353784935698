//! Inversion mesh construction.
//!
//! The solver discretizes the subsurface into one slab per observed spacing
//! plus a tail of padding slabs.
//!
//! Why tie cell widths to the spacings?
//! - Each reading constrains the ground down to roughly its own spacing, so a
//!   quarter-spacing slab per point keeps every cell touched by data.
//! - Padding below the deepest data-driven slab absorbs the basement without
//!   letting it leak into the constrained cells.

use crate::domain::{AggregatedPoint, InvertConfig};

/// A 1-D layered mesh. `widths` and `depths` are parallel; `depths[i]` is the
/// running bottom depth of cell `i` in metres.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub widths: Vec<f64>,
    pub depths: Vec<f64>,
}

impl Mesh {
    /// Build the mesh for a set of aggregated points.
    ///
    /// One cell of width `spacing_m / 4` per point (points are already sorted
    /// by spacing), then `pad_cells` cells of `pad_width_m` each, widened to
    /// the last data cell if that is larger so widths stay non-decreasing.
    ///
    /// Callers validate `config` and guarantee a non-empty, sorted `points`.
    pub fn from_points(points: &[AggregatedPoint], config: &InvertConfig) -> Mesh {
        let mut widths: Vec<f64> = points.iter().map(|p| p.spacing_m / 4.0).collect();
        let pad = match widths.last() {
            Some(last) => config.pad_width_m.max(*last),
            None => config.pad_width_m,
        };
        widths.extend(std::iter::repeat(pad).take(config.pad_cells));

        let mut depths = Vec::with_capacity(widths.len());
        let mut total = 0.0;
        for w in &widths {
            total += w;
            depths.push(total);
        }
        Mesh { widths, depths }
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}
