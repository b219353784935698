//! Read/write layered-model JSON files.
//!
//! Model JSON is the portable representation of a layered earth: thickness
//! and resistivity arrays, nothing else. It is what `forward` and `synth`
//! consume, and what `invert --export-model` emits so a recovered model can
//! be fed back through the forward command.

use std::fs::File;
use std::path::Path;

use crate::domain::{InversionResult, LayeredModel};
use crate::error::AppError;

/// Read a model JSON file. Callers validate the model before use.
pub fn read_model_json(path: &Path) -> Result<LayeredModel, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open model JSON '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid model JSON '{}': {e}", path.display())))
}

/// Write a recovered model as model JSON.
///
/// Layer boundaries come back out as thicknesses so the file round-trips
/// through `read_model_json`.
pub fn write_model_json(path: &Path, result: &InversionResult) -> Result<(), AppError> {
    let model = model_from_result(result);
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create model JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, &model)
        .map_err(|e| AppError::new(2, format!("Failed to write model JSON: {e}")))?;
    Ok(())
}

fn model_from_result(result: &InversionResult) -> LayeredModel {
    let mut thicknesses_m = Vec::with_capacity(result.depths_m.len());
    let mut top = 0.0;
    for bottom in &result.depths_m {
        thicknesses_m.push(bottom - top);
        top = *bottom;
    }
    LayeredModel {
        thicknesses_m,
        resistivities: result.resistivities.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depths_convert_back_to_thicknesses() {
        let result = InversionResult {
            depths_m: vec![1.0, 3.5, 13.5],
            resistivities: vec![40.0, 80.0, 200.0],
            fit_curve: vec![50.0],
        };
        let model = model_from_result(&result);
        assert_eq!(model.thicknesses_m.len(), 3);
        assert!((model.thicknesses_m[0] - 1.0).abs() < 1e-12);
        assert!((model.thicknesses_m[1] - 2.5).abs() < 1e-12);
        assert!((model.thicknesses_m[2] - 10.0).abs() < 1e-12);
        let rebuilt = model.boundaries();
        for (a, b) in rebuilt.iter().zip(&result.depths_m) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
