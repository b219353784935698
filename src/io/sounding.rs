//! Sounding ingest and measurement aggregation.
//!
//! This module turns a raw field document into the clean, sorted set of
//! `(spacing, resistivity)` points that are safe to invert.
//!
//! Design goals:
//! - **Tolerant ingest**: missing arrays, ragged lengths, and null readings
//!   are survey reality, not errors
//! - **Strict validity**: a reading contributes only if it is finite and
//!   positive, and only at a finite positive spacing
//! - **Deterministic output**: sorted by spacing, duplicates merged, so the
//!   solver sees strictly increasing spacings
//! - **Separation of concerns**: no inversion logic here

use std::fs::File;
use std::path::Path;

use crate::domain::{AggregatedPoint, FEET_TO_METERS, SoundingInput};
use crate::error::{AppError, ValidationError};

/// What aggregation kept and dropped, for diagnostics.
///
/// `readings_dropped` counts readings that were present but unusable: values
/// that are non-finite or non-positive, plus any readings recorded at an
/// invalid spacing. Absent or null readings are not counted; an instrument
/// that wrote nothing is not an anomaly worth flagging.
#[derive(Debug, Clone)]
pub struct AggregationStats {
    pub spacings_read: usize,
    pub readings_used: usize,
    pub readings_dropped: usize,
    pub merged_spacings: usize,
}

/// Aggregation output: cleaned points plus bookkeeping.
#[derive(Debug, Clone)]
pub struct AggregatedSounding {
    pub points: Vec<AggregatedPoint>,
    pub stats: AggregationStats,
}

/// Read a sounding document from disk.
pub fn read_sounding_json(path: &Path) -> Result<SoundingInput, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open sounding '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(file).map_err(|e| {
        AppError::new(2, format!("Failed to parse sounding '{}': {e}", path.display()))
    })
}

enum Reading {
    Valid(f64),
    Invalid,
    Missing,
}

fn classify(values: &[Option<f64>], index: usize) -> Reading {
    match values.get(index) {
        Some(Some(v)) if v.is_finite() && *v > 0.0 => Reading::Valid(*v),
        Some(Some(_)) => Reading::Invalid,
        _ => Reading::Missing,
    }
}

/// Aggregate a sounding into per-spacing measurement points.
///
/// Each point's resistivity is the mean of exactly the valid orientation
/// readings at its spacing. Spacings are converted to metres, sorted, and
/// merged when duplicated (the merge is reading-weighted, so it equals the
/// mean over all valid readings at that spacing).
pub fn aggregate(input: &SoundingInput) -> Result<AggregatedSounding, ValidationError> {
    let mut raw: Vec<AggregatedPoint> = Vec::new();
    let mut readings_used = 0usize;
    let mut readings_dropped = 0usize;

    for (i, &spacing_ft) in input.a_ft.iter().enumerate() {
        let ns = classify(&input.rho_ns, i);
        let we = classify(&input.rho_we, i);

        if !spacing_ft.is_finite() || spacing_ft <= 0.0 {
            for reading in [&ns, &we] {
                if !matches!(reading, Reading::Missing) {
                    readings_dropped += 1;
                }
            }
            continue;
        }

        let mut sum = 0.0;
        let mut count = 0usize;
        for reading in [ns, we] {
            match reading {
                Reading::Valid(v) => {
                    sum += v;
                    count += 1;
                }
                Reading::Invalid => readings_dropped += 1,
                Reading::Missing => {}
            }
        }
        if count == 0 {
            continue;
        }
        readings_used += count;
        raw.push(AggregatedPoint {
            spacing_ft,
            spacing_m: spacing_ft * FEET_TO_METERS,
            resistivity: sum / count as f64,
            n_readings: count,
        });
    }

    if raw.is_empty() {
        return Err(ValidationError);
    }

    raw.sort_by(|a, b| {
        a.spacing_ft
            .partial_cmp(&b.spacing_ft)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut points: Vec<AggregatedPoint> = Vec::new();
    let mut merged_spacings = 0usize;
    for p in raw {
        match points.last_mut() {
            Some(last) if last.spacing_ft == p.spacing_ft => {
                let total = last.n_readings + p.n_readings;
                last.resistivity = (last.resistivity * last.n_readings as f64
                    + p.resistivity * p.n_readings as f64)
                    / total as f64;
                last.n_readings = total;
                merged_spacings += 1;
            }
            _ => points.push(p),
        }
    }

    let stats = AggregationStats {
        spacings_read: input.a_ft.len(),
        readings_used,
        readings_dropped,
        merged_spacings,
    };
    Ok(AggregatedSounding { points, stats })
}
