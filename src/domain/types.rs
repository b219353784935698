//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during inversion
//! - exported to JSON
//! - reloaded later for forward modelling or comparisons

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// International foot, exactly.
pub const FEET_TO_METERS: f64 = 0.3048;

/// A field sounding document as recorded by the survey crew.
///
/// One entry per electrode spacing, with the two orthogonal traverse readings
/// stored positionally. Readings may be missing (`null`), non-numeric garbage
/// is rejected by the JSON parser, and non-positive values are treated as
/// instrument faults during aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundingInput {
    /// Electrode spacings in feet, in recording order.
    #[serde(default)]
    pub a_ft: Vec<f64>,
    /// North-south apparent resistivity readings (ohm-m), aligned with `a_ft`.
    #[serde(default)]
    pub rho_ns: Vec<Option<f64>>,
    /// West-east apparent resistivity readings (ohm-m), aligned with `a_ft`.
    #[serde(default)]
    pub rho_we: Vec<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// One cleaned measurement point used for inversion.
///
/// `resistivity` is the mean of the valid orientation readings at this
/// spacing; `n_readings` records how many readings contributed.
#[derive(Debug, Clone)]
pub struct AggregatedPoint {
    pub spacing_ft: f64,
    pub spacing_m: f64,
    pub resistivity: f64,
    pub n_readings: usize,
}

/// A layered half-space: `thicknesses_m[i]` paired with `resistivities[i]`.
///
/// The final layer is the basement and extends to infinite depth; its
/// thickness entry is retained only so the arrays stay aligned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayeredModel {
    pub thicknesses_m: Vec<f64>,
    pub resistivities: Vec<f64>,
}

impl LayeredModel {
    /// Validate array alignment and physical plausibility.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.thicknesses_m.is_empty() {
            return Err(AppError::new(2, "model has no layers"));
        }
        if self.thicknesses_m.len() != self.resistivities.len() {
            return Err(AppError::new(
                2,
                format!(
                    "model arrays misaligned: {} thicknesses vs {} resistivities",
                    self.thicknesses_m.len(),
                    self.resistivities.len()
                ),
            ));
        }
        for (i, t) in self.thicknesses_m.iter().enumerate() {
            if !t.is_finite() || *t < 0.0 {
                return Err(AppError::new(
                    2,
                    format!("layer {i}: thickness must be finite and non-negative, got {t}"),
                ));
            }
        }
        for (i, r) in self.resistivities.iter().enumerate() {
            if !r.is_finite() || *r <= 0.0 {
                return Err(AppError::new(
                    2,
                    format!("layer {i}: resistivity must be finite and positive, got {r}"),
                ));
            }
        }
        Ok(())
    }

    /// Cumulative bottom depth of each layer, in metres.
    ///
    /// The last entry is nominal: that layer is treated as a half-space by
    /// the forward model no matter what its thickness says.
    pub fn boundaries(&self) -> Vec<f64> {
        let mut depths = Vec::with_capacity(self.thicknesses_m.len());
        let mut total = 0.0;
        for t in &self.thicknesses_m {
            total += t;
            depths.push(total);
        }
        depths
    }
}

/// Final output of a sounding run: the layered model plus its predicted
/// response at the observed spacings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InversionResult {
    /// Bottom depth of each layer in metres, strictly increasing.
    pub depths_m: Vec<f64>,
    /// Layer resistivities in ohm-m, all finite and positive.
    pub resistivities: Vec<f64>,
    /// Predicted apparent resistivity at each observed spacing, sorted by spacing.
    pub fit_curve: Vec<f64>,
}

/// Which estimator produced an [`InversionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMethod {
    /// Regularized Gauss-Newton inversion on the layered mesh.
    GaussNewton,
    /// Closed-form half-spacing estimate (depth = spacing / 2).
    HalfSpacing,
}

impl SolveMethod {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            SolveMethod::GaussNewton => "Gauss-Newton inversion",
            SolveMethod::HalfSpacing => "half-spacing estimate",
        }
    }
}

/// Predicted response of a known model (output of the forward command).
#[derive(Debug, Clone, Serialize)]
pub struct ForwardResponse {
    pub a_ft: Vec<f64>,
    pub spacing_m: Vec<f64>,
    pub apparent_resistivity: Vec<f64>,
}

/// Inversion tuning knobs as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults). The defaults reproduce the
/// reference survey workflow and rarely need touching.
#[derive(Debug, Clone)]
pub struct InvertConfig {
    /// Hard cap on Gauss-Newton iterations.
    pub max_iterations: usize,
    /// Stop once every point's relative misfit drops to this level.
    pub target_misfit: f64,
    /// Initial trade-off scale: `beta0 = ratio * lambda_data / lambda_reg`.
    pub beta0_ratio: f64,
    /// Divide beta by this factor after each accepted iteration (1.0 holds it fixed).
    pub beta_cooling: f64,
    /// Weight on the smallness term `||m - mref||^2`.
    pub alpha_s: f64,
    /// Weight on the first-difference smoothness term `||Dm||^2`.
    pub alpha_x: f64,
    /// Number of padding cells appended below the data-driven mesh.
    pub pad_cells: usize,
    /// Nominal padding cell width in metres (widened to keep the mesh monotone).
    pub pad_width_m: f64,
}

impl Default for InvertConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            target_misfit: 0.01,
            beta0_ratio: 100.0,
            beta_cooling: 8.0,
            alpha_s: 1.0,
            alpha_x: 1.0,
            pad_cells: 10,
            pad_width_m: 50.0,
        }
    }
}

impl InvertConfig {
    /// Validate the knobs before any mesh or solver work happens.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_iterations == 0 {
            return Err(AppError::new(2, "--max-iterations must be at least 1"));
        }
        if !self.target_misfit.is_finite() || self.target_misfit <= 0.0 {
            return Err(AppError::new(
                2,
                format!("--target-misfit must be finite and positive, got {}", self.target_misfit),
            ));
        }
        if !self.beta0_ratio.is_finite() || self.beta0_ratio <= 0.0 {
            return Err(AppError::new(
                2,
                format!("--beta0-ratio must be finite and positive, got {}", self.beta0_ratio),
            ));
        }
        if !self.beta_cooling.is_finite() || self.beta_cooling < 1.0 {
            return Err(AppError::new(
                2,
                format!("--beta-cooling must be at least 1.0, got {}", self.beta_cooling),
            ));
        }
        if !self.alpha_s.is_finite() || self.alpha_s < 0.0 {
            return Err(AppError::new(
                2,
                format!("--alpha-s must be finite and non-negative, got {}", self.alpha_s),
            ));
        }
        if !self.alpha_x.is_finite() || self.alpha_x < 0.0 {
            return Err(AppError::new(
                2,
                format!("--alpha-x must be finite and non-negative, got {}", self.alpha_x),
            ));
        }
        if self.alpha_s == 0.0 && self.alpha_x == 0.0 {
            return Err(AppError::new(
                2,
                "at least one of --alpha-s / --alpha-x must be positive",
            ));
        }
        if !self.pad_width_m.is_finite() || self.pad_width_m <= 0.0 {
            return Err(AppError::new(
                2,
                format!("--pad-width-m must be finite and positive, got {}", self.pad_width_m),
            ));
        }
        Ok(())
    }
}
