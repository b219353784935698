//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the raw sounding document (`SoundingInput`) and its cleaned form
//!   (`AggregatedPoint`)
//! - layered-earth models (`LayeredModel`) and inversion outputs
//!   (`InversionResult`, `SolveMethod`)
//! - solver configuration (`InvertConfig`)

pub mod types;

pub use types::*;
