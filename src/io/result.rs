//! Render and write the JSON documents the CLI emits.
//!
//! The stdout contract: every run emits exactly one JSON document. For
//! `invert` that is the [`InversionResult`]; when the sounding is unusable it
//! is a one-field error document instead, so downstream tooling can always
//! parse what it receives. `forward` and `synth` print their own documents
//! through the renderers here.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::domain::{ForwardResponse, InversionResult, SoundingInput};
use crate::error::AppError;

/// Machine-readable failure document, printed in place of a result.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDocument<'a> {
    pub error: &'a str,
}

/// Render the result document for stdout.
pub fn render_result(result: &InversionResult) -> Result<String, AppError> {
    serde_json::to_string_pretty(result)
        .map_err(|e| AppError::new(4, format!("Failed to render result JSON: {e}")))
}

/// Render the failure document for stdout.
///
/// Compact, single line: only result documents get pretty-printed.
///
/// This path must not be able to fail itself, so a formatter error degrades
/// to hand-assembled JSON.
pub fn render_error_document(message: &str) -> String {
    serde_json::to_string(&ErrorDocument { error: message })
        .unwrap_or_else(|_| format!("{{\"error\": \"{message}\"}}"))
}

/// Render the forward-model response document for stdout.
pub fn render_forward(response: &ForwardResponse) -> Result<String, AppError> {
    serde_json::to_string_pretty(response)
        .map_err(|e| AppError::new(4, format!("Failed to render forward response JSON: {e}")))
}

/// Render a synthetic sounding payload for stdout.
pub fn render_sounding(input: &SoundingInput) -> Result<String, AppError> {
    serde_json::to_string_pretty(input)
        .map_err(|e| AppError::new(4, format!("Failed to render sounding JSON: {e}")))
}

/// Write the result document to a file.
pub fn write_result_json(path: &Path, result: &InversionResult) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create result JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, result)
        .map_err(|e| AppError::new(2, format!("Failed to write result JSON: {e}")))?;
    Ok(())
}
